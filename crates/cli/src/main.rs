//! The CLI application. Seeds a collection of tea ratings and demonstrates sorted reads through
//! find and through aggregation.

use std::path::PathBuf;
use std::process::exit;

use clap::{Parser, ValueHint};
use sort_examples_cli::{
    logging::init_tracing, read_configuration_file, run, Command, ConfigurationFile, Context,
    ExitCode, GlobalOptions,
};

/// The command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "sort-examples", version)]
pub struct Args {
    /// A JSON or YAML file with default settings
    #[arg(
        long = "config",
        short = 'c',
        value_name = "FILE",
        value_hint = ValueHint::FilePath
    )]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub options: GlobalOptions,

    /// The command to invoke.
    #[command(subcommand)]
    pub subcommand: Command,
}

/// The application entrypoint. It pulls information from the environment and then calls the [run]
/// function. The library remains unaware of the environment, so that we can more easily test it.
#[tokio::main]
pub async fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();
    let file = match &args.config {
        Some(path) => match read_configuration_file(path).await {
            Ok(file) => file,
            Err(err) => {
                eprintln!("Could not read configuration file.\n\n{err:#}");
                exit(ExitCode::CouldNotReadConfiguration.into())
            }
        },
        None => ConfigurationFile::default(),
    };
    let context = match Context::resolve(args.options, file) {
        Ok(context) => context,
        Err(err) => {
            eprintln!("Invalid configuration.\n\n{err:#}");
            exit(ExitCode::CouldNotReadConfiguration.into())
        }
    };
    run(args.subcommand, &context).await?;
    Ok(())
}
