use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("Parser errors:\n\t{}", .0.join("\n\t"))]
    Parse(Vec<String>),
}
