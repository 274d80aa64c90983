use clap::{Parser, Subcommand};

mod depots;
mod favorites;

#[derive(Debug, Parser)]
#[command(name = "agrimap-cli")]
#[command(about = "Rental-depot map pipeline command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch depots, geocode missing coordinates, and render the filtered map set
    Depots(depots::DepotsArgs),
    /// Inspect or toggle the signed-in user's favorites
    Favorites {
        #[command(subcommand)]
        command: favorites::FavoritesCommand,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = agrimap_core::load_app_config_from_env()?;

    match cli.command {
        Commands::Depots(args) => depots::run(&config, args).await,
        Commands::Favorites { command } => favorites::run(&config, command).await,
    }
}
