use clap::Parser;
use harvester::{
    cli::{commands, Cli, Commands},
    config::Settings,
    Result,
};
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if it exists
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,harvester=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    if let Err(e) = execute(cli).await {
        if e.is_startup() {
            error!("Startup failed: {}", e.log_safe());
        } else {
            error!("Harvest aborted: {}", e.log_safe());
        }
        std::process::exit(1);
    }
}

async fn execute(cli: Cli) -> Result<()> {
    let mut settings = Settings::from_env()?;

    match cli.command {
        Commands::Harvest {
            output_dir,
            keyword,
        } => {
            if let Some(output_dir) = output_dir {
                settings.harvest.output_dir = output_dir;
            }
            if let Some(keyword) = keyword {
                settings.harvest.keyword = keyword;
            }
            settings.validate()?;

            commands::harvest(&settings).await?;
        }
        Commands::Check => {
            settings.validate()?;
            commands::check(&settings).await?;
        }
    }

    Ok(())
}
