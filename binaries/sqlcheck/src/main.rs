use {
    clap::{arg, value_parser, Command},
    snafu::prelude::*,
    sqlcheck::cmd::{self, CheckOptions, Error as CheckError, Format},
    std::{env, io, path::PathBuf, process, str::FromStr},
    tracing_subscriber::EnvFilter,
};

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("unknown output format `{format}`, expected `text` or `json`"))]
    UnknownFormat { format: String },

    #[snafu(display("{source}"))]
    ExecuteCommand {
        #[snafu(backtrace)]
        source: CheckError,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

const SQLCHECK_FORMAT: &str = "SQLCHECK_FORMAT";

const CHECK: &str = "check";

fn cli() -> Command {
    let pkg_name = env!("CARGO_PKG_NAME");

    Command::new(pkg_name)
        .bin_name(pkg_name)
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .subcommand_required(true)
        .subcommand(
            Command::new(CHECK)
                .about("check the syntax of SQL files, or of standard input")
                .arg(arg!([FILES] ... "files to check").value_parser(value_parser!(PathBuf)))
                .arg(arg!(--script "accept several statements separated by ';'"))
                .arg(arg!(--bail "stop at the first syntax error"))
                .arg(arg!(-f --format <FORMAT> "output format, `text` or `json`"))
                .arg(arg!(-v --verbose ... "log more, repeat for more detail")),
        )
}

fn init_tracing(verbosity: u8) {
    let directive = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive)),
        )
        .with_writer(io::stderr)
        .init();
}

fn main() {
    match try_main() {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(err) => {
            eprintln!("{}", err);
            process::exit(2);
        }
    }
}

/// Returns whether every input was valid.
fn try_main() -> Result<bool> {
    let matches = cli().get_matches();
    match matches.subcommand() {
        Some((CHECK, sub_matches)) => {
            init_tracing(sub_matches.get_count("verbose"));

            let format = match sub_matches.get_one::<String>("format") {
                Some(format) => Some(format.clone()),
                None => env::var(SQLCHECK_FORMAT).ok(),
            };
            let format = match format {
                Some(format) => {
                    Format::from_str(&format).map_err(|format| Error::UnknownFormat { format })?
                }
                None => Format::default(),
            };

            let options = CheckOptions {
                script: sub_matches.get_flag("script"),
                bail: sub_matches.get_flag("bail"),
            };

            let reports = match sub_matches.get_many::<PathBuf>("FILES") {
                Some(files) => files
                    .map(|path| cmd::check_file(path, &options))
                    .collect::<cmd::Result<Vec<_>>>(),
                None => cmd::check_stdin(&options).map(|report| vec![report]),
            }
            .context(ExecuteCommandSnafu)?;

            cmd::write_reports(&mut io::stdout().lock(), &reports, format)
                .context(ExecuteCommandSnafu)?;

            Ok(reports.iter().all(|report| report.is_valid()))
        }
        _ => unreachable!(),
    }
}
