//! bundle_test_tool
//!
//! Command-line test tool for the bundle manager service.

use anyhow::Result;
use bundle_test_tool::cli::{
    dispatch, generate_completion, handle_config, handle_health, Cli, Commands,
};
use bundle_test_tool::client::BundleMgrClient;
use bundle_test_tool::config::CliConfig;
use bundle_test_tool::format::{render_output, OutputFormat};
use clap::Parser;
use std::io::Write;
use std::time::Duration;
use tracing::debug;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Priority chain: defaults → file → env → CLI args
    let mut builder = CliConfig::builder();
    builder = builder.with_config_file(!cli.no_config)?;
    builder = builder.with_env_overrides();

    if let Some(ref server) = cli.server {
        builder = builder.with_server_url(server)?;
    }
    if let Some(format) = cli.format {
        builder = builder.with_output_format(format.as_str())?;
    }
    if cli.verbose {
        builder = builder.with_verbose(true);
    }

    let config = match builder.build() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            if cli.verbose {
                eprintln!("Error details: {:?}", e);
            }
            std::process::exit(1);
        }
    };

    init_tracing(config.verbose);

    let output_format = match config.output_format.as_str() {
        "json" => OutputFormat::Json,
        _ => OutputFormat::Text,
    };
    debug!("Server URL: {}, output format: {:?}", config.server_url, output_format);

    let client = match BundleMgrClient::with_config(
        config.server_url.clone(),
        config.timeout,
        3,
        Duration::from_millis(500),
    ) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Tool(command) => match dispatch(&client, command).await {
            Ok(output) => render_output(&output, output_format).map(|rendered| {
                print!("{}", rendered);
                output.is_ok()
            }),
            Err(e) => Err(e),
        },
        Commands::Health => handle_health(&client, output_format).await.map(|_| true),
        Commands::Config { command } => handle_config(command, &config, output_format)
            .await
            .map(|_| true),
        Commands::Completion { shell } => {
            generate_completion(shell);
            Ok(true)
        }
    };
    let _ = std::io::stdout().flush();

    match result {
        Ok(true) => Ok(()),
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            if config.verbose {
                eprintln!("Error details: {:?}", e);
            }
            std::process::exit(1);
        }
    }
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
