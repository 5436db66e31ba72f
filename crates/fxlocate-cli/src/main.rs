//! CLI entry point - the composition root.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use fxlocate_cli::{Cli, CliConfig, CliError, bootstrap, run};

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> ExitCode {
    // Overrides such as COMPLUS_Version may live in a local .env
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = bootstrap(&CliConfig::from(&cli))
        .and_then(|ctx| run(&cli, &ctx, &mut io::stdout().lock()));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            let cli_err = err.chain().find_map(|e| e.downcast_ref::<CliError>());
            if let Some(hresult) = cli_err.and_then(CliError::hresult) {
                eprintln!("hresult: {hresult:#010x}");
            }
            ExitCode::from(cli_err.map_or(1, CliError::exit_code))
        }
    }
}
