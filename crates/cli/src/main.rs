use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use folio_kernel::settings::Settings;

/// Folio books service
#[derive(Debug, Parser)]
#[command(name = "folio", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Print the generated OpenAPI document
    Openapi {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the effective configuration as JSON
    Config,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load().with_context(|| "failed to load Folio settings")?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(settings),
        Command::Openapi { output } => {
            let document = folio_app::bootstrap::openapi_json(&settings)?;
            match output {
                Some(path) => std::fs::write(&path, document)
                    .with_context(|| format!("failed to write {}", path.display())),
                None => {
                    println!("{document}");
                    Ok(())
                }
            }
        }
        Command::Config => {
            let rendered = serde_json::to_string_pretty(&settings)
                .context("failed to serialize settings")?;
            println!("{rendered}");
            Ok(())
        }
    }
}

fn serve(settings: Settings) -> anyhow::Result<()> {
    folio_telemetry::init(&settings.telemetry)?;
    tracing::info!(env = ?settings.environment, "folio serve starting");

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build tokio runtime")?
        .block_on(folio_app::bootstrap::serve(settings))
}
