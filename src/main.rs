use std::process::ExitCode;
use clap::Parser as ClapParser;
use mkc::{Config, Error};

fn main() -> ExitCode {
    let config: Config = Config::parse();
    mkc::util::init_logging(config.verbose);

    match mkc::run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(Error::Io(error)) => {
            eprintln!("Error: {}", error);
            ExitCode::FAILURE
        },
        Err(error) => {
            eprintln!("{}", error);
            ExitCode::FAILURE
        },
    }
}
