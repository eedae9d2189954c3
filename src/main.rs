use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cloudshift::cli::{commands, Cli, Commands};
use cloudshift::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    let config = Config::from_env();

    let result = match cli.command {
        Commands::Init { path, language } => {
            commands::InitCommand { path, language }.execute(&config)
        }
        Commands::Analyze { codebase_id, json } => {
            commands::AnalyzeCommand { codebase_id, json }.execute(&config)
        }
        Commands::Plan { codebase_id } => commands::PlanCommand { codebase_id }.execute(&config),
        Commands::Migrate { plan_id, backup } => {
            commands::MigrateCommand { plan_id, backup }
                .execute(&config)
                .await
        }
        Commands::Translate {
            input,
            language,
            service,
            output,
        } => {
            commands::TranslateCommand {
                input,
                language,
                service,
                output,
            }
            .execute(&config)
            .await
        }
        Commands::Catalog { provider } => commands::CatalogCommand { provider }.execute(),
    };

    result?;
    Ok(())
}
