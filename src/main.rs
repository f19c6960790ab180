use std::{io::Write, process::ExitCode};

use clap::{error::ErrorKind, CommandFactory};
use log::{info, warn};

use mprfgen::{cli::Args, output, support, Error};

const STDOUT_NAME: &str = "<stdout>";
/// Exit status for command lines clap rejects, shared with configuration errors.
const USAGE_ERROR: u8 = 1;

fn print_usage() -> Result<(), Error> {
    let stdout_error = |error: std::io::Error| Error::Io(STDOUT_NAME.into(), error);
    Args::command().print_help().map_err(stdout_error)?;
    writeln!(std::io::stdout()).map_err(stdout_error)
}

fn run(args: Args) -> Result<(), Error> {
    let config = args.to_config()?;
    let file_name = match &args.output {
        Some(path) => path.display().to_string(),
        None => STDOUT_NAME.to_string(),
    };
    let text = mprfgen::generate(&config, &file_name)?;
    if let Some(directory) = &args.support_dir {
        output::write_all_into(directory, &support::files())?;
    }
    match &args.output {
        Some(path) => {
            output::write_atomic(path, &text)?;
            info!("{} bank instances in {}", config.bank_count(), path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            lock.write_all(text.as_bytes()).map_err(|error| Error::Io(STDOUT_NAME.into(), error))?;
        }
    }
    Ok(())
}

fn report(err: Error) -> ExitCode {
    eprintln!("Error: {err}");
    ExitCode::from(err.exit_code())
}

fn main() -> ExitCode {
    env_logger::init();
    if std::env::args_os().len() < 2 {
        return match print_usage() {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => report(err),
        };
    }
    let args = match mprfgen::cli::parse(std::env::args_os()) {
        Ok(args) => args,
        Err(error) if matches!(error.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => error.exit(),
        Err(error) => {
            if let Err(io_error) = error.print() {
                warn!("can't report command line error: {io_error}");
            }
            return ExitCode::from(USAGE_ERROR);
        }
    };
    if args.usage {
        return match print_usage() {
            Ok(()) => ExitCode::FAILURE,
            Err(err) => report(err),
        };
    }
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report(err),
    }
}
