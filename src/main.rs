use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;

use varta::audit::{Auditor, FollowerRecord};
use varta::auth;
use varta::config::Config;
use varta::follows::HttpFollowsProvider;
use varta::output::terminal;
use varta::twitch::client::HelixClient;
use varta::twitch::followers::{self, Follower};
use varta::twitch::users;

/// Varta: follower audit for Twitch channels.
///
/// Fetches your follower list and checks each follower's own follows for
/// Russian-language channels, so you can review and optionally block them.
#[derive(Parser)]
#[command(name = "varta", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Authorize with Twitch and print the captured access token
    Login,

    /// Fetch and list your followers (no analysis)
    Followers,

    /// Fetch your followers and audit each one sequentially
    Audit {
        /// Re-audit followers whose audit already completed
        #[arg(long)]
        force: bool,
    },

    /// Audit a single user by name, without touching the follower list
    Check {
        /// Twitch user name to audit
        user_name: String,
    },

    /// Block a user by login name
    Block {
        /// Login of the user to block
        login: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("varta=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Login => {
            let config = Config::load()?;

            println!("Opening your browser for Twitch authorization...");
            println!("  Redirect listener: {}", config.redirect_url);

            let token = auth::capture_token(&config).await?;

            println!("\n{}", "Token captured.".bold());
            println!("Export it for the other commands:");
            println!("  export TWITCH_ACCESS_TOKEN={token}");
            println!("(or add it to your .env file — see .env.example)");
        }

        Commands::Followers => {
            let config = Config::load()?;
            config.require_token()?;
            let helix = HelixClient::new(&config.helix_url, &config.client_id, &config.access_token)?;

            let me = users::current_user(&helix).await?;
            println!("Fetching followers of {}...", me.display_name.bold());

            let fetched = followers::fetch_all(&helix, &me.id).await;
            let records: Vec<FollowerRecord> =
                fetched.into_iter().map(FollowerRecord::new).collect();

            terminal::display_follower_table(&records);
        }

        Commands::Audit { force } => {
            let config = Config::load()?;
            config.require_token()?;
            let helix = HelixClient::new(&config.helix_url, &config.client_id, &config.access_token)?;

            let me = users::current_user(&helix).await?;
            println!("Authenticated as {}.", me.display_name.bold());
            println!("Fetching followers...");

            let fetched = followers::fetch_all(&helix, &me.id).await;
            if fetched.is_empty() {
                println!("No followers to audit.");
                return Ok(());
            }
            println!("  Got {} followers.", fetched.len());

            let mut records: Vec<FollowerRecord> =
                fetched.into_iter().map(FollowerRecord::new).collect();

            let provider = HttpFollowsProvider::new(&config.follows_api_url)?;
            let auditor = Auditor {
                follows: &provider,
                channels: &helix,
                rules: &config.rules,
            };

            println!("Running full audit ({} followers, one at a time)...", records.len());
            let audited = auditor.audit_all(&mut records, force).await;
            println!("\n{}", "Audit complete.".bold());
            println!("  Audits run: {audited}");

            terminal::display_follower_table(&records);

            for record in &records {
                if record.audit.bad_count > 0 || record.audit.warning_count > 0 {
                    terminal::display_audit_detail(&record.follower.user_name, &record.audit);
                }
            }
        }

        Commands::Check { user_name } => {
            let config = Config::load()?;
            config.require_token()?;
            let helix = HelixClient::new(&config.helix_url, &config.client_id, &config.access_token)?;

            let provider = HttpFollowsProvider::new(&config.follows_api_url)?;
            let auditor = Auditor {
                follows: &provider,
                channels: &helix,
                rules: &config.rules,
            };

            println!("Auditing {}...", user_name.bold());

            let follower = Follower {
                user_name: user_name.clone(),
                user_id: String::new(),
            };
            let audit = auditor.audit(&follower).await?;

            terminal::display_audit_detail(&user_name, &audit);
        }

        Commands::Block { login } => {
            let config = Config::load()?;
            config.require_token()?;
            let helix = HelixClient::new(&config.helix_url, &config.client_id, &config.access_token)?;

            let user = users::user_by_login(&helix, &login)
                .await?
                .ok_or_else(|| anyhow::anyhow!("no Twitch user named {login}"))?;

            users::block_user(&helix, &user.id).await?;
            println!("{} blocked.", user.display_name.bold());
        }
    }

    Ok(())
}
