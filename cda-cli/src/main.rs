mod cli;
mod commands;
mod config;
mod error;
mod output;

use crate::{
    cli::{Args, Commands},
    commands::CommandExecutor,
    config::AppConfig,
    error::{CliError, Result},
    output::{OutputManager, write_output},
};
use cda_parser::extractor::ProxyConfig;
use clap::Parser;
#[cfg(feature = "colored-output")]
use colored::*;
use std::{process, time::Duration};
use tracing::{Level, debug, error};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() {
    let result = run().await;

    if let Err(e) = result {
        error!("Application error: {}", e);
        #[cfg(feature = "colored-output")]
        {
            eprintln!("{} {}", "Error:".red().bold(), e);
        }
        #[cfg(not(feature = "colored-output"))]
        {
            eprintln!("Error: {}", e);
        }
        if let Some(hint) = e.hint() {
            eprintln!("Hint: {hint}");
        }
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet)?;

    // Load configuration
    let config = AppConfig::load(args.config.as_deref())?;
    debug!("Loaded configuration: {:?}", config);

    match args.command {
        None => {
            let url = args.url.as_deref().ok_or(CliError::MissingUrl)?;

            let mut resolver = config.resolver;
            if args.lenient_id {
                resolver = resolver.with_identifier_checksum(false);
            }
            if args.lenient_escapes {
                resolver = resolver.with_strict_percent_decoding(false);
            }
            if args.no_manifest_auto_quirk {
                resolver = resolver.with_manifest_auto_quality(false);
            }
            if args.backend.is_some() {
                resolver = resolver.with_rotation_backend(args.backend);
            }

            let output_format = args.output.unwrap_or(config.default_output_format);
            let retries = args.retries.unwrap_or(config.default_retries);
            let timeout = Duration::from_secs(args.timeout.unwrap_or(config.default_timeout));
            let proxy = args.proxy.map(|url| ProxyConfig {
                url,
                username: args.proxy_username,
                password: args.proxy_password,
            });

            let executor = CommandExecutor::new(config, timeout, proxy)?;
            executor
                .resolve_single(
                    url,
                    resolver,
                    output_format,
                    args.output_file.as_deref(),
                    args.quality.as_deref(),
                    retries,
                )
                .await?;
        }

        Some(Commands::Backends { output }) => {
            let content = OutputManager::new(config.colored_output).format_backends(&output)?;
            write_output(&content, None)?;
        }

        Some(Commands::Completions { shell }) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Args::command();
            let bin_name = cmd.get_name().to_string();
            generate(shell, &mut cmd, bin_name, &mut std::io::stdout());
        }

        Some(Commands::Config { show, reset }) => {
            if reset {
                AppConfig::reset(args.config.as_deref())?;
                println!("✓ Configuration reset to defaults");
            } else if show {
                println!("{}", config.show()?);
            } else {
                println!(
                    "Use --show to display current configuration or --reset to reset to defaults"
                );
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: bool, quiet: bool) -> Result<()> {
    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(Level::INFO.into())
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(verbose),
        )
        .with(filter)
        .init();

    Ok(())
}
