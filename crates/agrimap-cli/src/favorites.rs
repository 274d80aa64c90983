//! Favorites subcommands against the portal API.

use anyhow::Context;
use clap::Subcommand;

use agrimap_core::AppConfig;
use agrimap_portal::{FavoriteEntry, FavoriteReconciler, PortalClient, FAVORITE_KIND_RENTAL};

#[derive(Debug, Subcommand)]
pub(crate) enum FavoritesCommand {
    /// List the signed-in user's favorites
    List,
    /// Favorite a rental depot by name
    Add {
        name: String,
        #[arg(long, default_value = "")]
        address: String,
    },
    /// Remove a favorited rental depot by name
    Remove { name: String },
    /// Toggle a depot from the live feed, checking membership first
    Toggle { name: String },
}

pub(crate) async fn run(config: &AppConfig, command: FavoritesCommand) -> anyhow::Result<()> {
    let portal = PortalClient::new(
        &config.portal_base_url,
        config.request_timeout_secs,
        &config.user_agent,
    )?;

    match command {
        FavoritesCommand::List => {
            let token = require_token(config)?;
            let favorites = portal
                .favorite_list(token)
                .await
                .context("failed to load favorites")?;
            if favorites.is_empty() {
                println!("No favorites yet");
                return Ok(());
            }
            for entry in favorites {
                println!("  \u{2713} [{}] {:<30} {}", entry.kind, entry.item_name, entry.address);
            }
        }
        FavoritesCommand::Add { name, address } => {
            let token = require_token(config)?;
            let entry = FavoriteEntry::rental(&name, &address);
            portal.favorite_add(token, &entry).await?;
            println!("  \u{2713} favorited {name}");
        }
        FavoritesCommand::Remove { name } => {
            let token = require_token(config)?;
            portal
                .favorite_remove(token, FAVORITE_KIND_RENTAL, &name)
                .await?;
            println!("  \u{2713} unfavorited {name}");
        }
        FavoritesCommand::Toggle { name } => {
            let records = portal
                .rental_locations()
                .await
                .context("failed to load rental locations")?;
            let record = records
                .into_iter()
                .find(|r| r.name == name)
                .with_context(|| format!("no depot named '{name}' in the feed"))?;

            let mut reconciler = FavoriteReconciler::new(config.auth_token.clone());
            // A failed membership check is surfaced but does not block the
            // toggle; the reconciler settles on the safe default.
            if let Err(err) = reconciler.select(&portal, record).await {
                eprintln!("  ! favorite status check failed: {err}");
            }
            let now_favorited = reconciler.toggle(&portal).await?;
            if now_favorited {
                println!("  \u{2713} favorited {name}");
            } else {
                println!("  \u{2713} unfavorited {name}");
            }
        }
    }

    Ok(())
}

fn require_token(config: &AppConfig) -> anyhow::Result<&str> {
    config
        .auth_token
        .as_deref()
        .context("sign-in required: set AGRIMAP_AUTH_TOKEN")
}
