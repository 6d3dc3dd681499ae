/// MCP Server Entry Point
///
/// Parses the command line, resolves configuration (flags, then `LOG_LEVEL`,
/// then defaults), installs logging and starts the selected transport.
///
/// Exit codes:
/// - 0: normal shutdown, `--version` or `--help`
/// - 1: invalid arguments or any startup/transport error

use std::process::ExitCode;

use clap::Parser;
use mcp_server_template::cli::{LaunchArgs, version_line};
use mcp_server_template::core::{config::ServerConfig, logging, server, utils};
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    let args = match LaunchArgs::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let _ = err.print();
            // --help is reported through the error path but is not a failure
            return if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let env_log_level = utils::env_var_opt("LOG_LEVEL");
    let config = args.apply(ServerConfig::default(), env_log_level.as_deref());

    if args.version {
        println!("{}", version_line(&config));
        return ExitCode::SUCCESS;
    }

    if let Err(err) = logging::init_logging(config.log_level, config.debug) {
        eprintln!("{err}");
        return ExitCode::FAILURE;
    }

    info!(
        transport = args.transport.as_str(),
        log_level = config.log_level.directive(),
        "Starting MCP server with {} transport",
        args.transport.as_str()
    );

    match server::run(&config, args.transport).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "Error running server");
            ExitCode::FAILURE
        }
    }
}
