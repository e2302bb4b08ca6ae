mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use pvs_config::Config;

use crate::cli::{Cli, Command};
use crate::error::CliError;

fn main() {
    let cli = Cli::parse();

    // The configured log level only applies when -v is absent
    let cfg = config::load(&cli.global);
    let configured = cfg.as_ref().ok().map(|c| c.defaults.log_level.clone());
    init_tracing(cli.global.verbose, configured.as_deref());

    if let Err(err) = run(cli, cfg) {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8, configured: Option<&str>) {
    let filter = match verbosity {
        0 => configured.unwrap_or("warn"),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    // stdout carries command output
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli, cfg: Result<Config, CliError>) -> Result<(), CliError> {
    match cli.command {
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global, cfg),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "pvs", &mut std::io::stdout());
            Ok(())
        }

        // Everything else needs a built graph
        cmd => {
            let cfg = cfg?;
            let format = config::output_format(&cli.global, &cfg)?;
            let graph = commands::build_graph(&cli.global, &cfg)?;

            tracing::debug!(command = ?cmd, "dispatching command");
            commands::dispatch(cmd, &graph, format, &cli.global)
        }
    }
}
