use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use dashboard_api::config::{ClientConfig, ConfigError};
use dashboard_api::services::{InfluencerSearch, LoginCredentials, PageRequest, Role};
use dashboard_api::{AdminClient, ApiError};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Api(#[from] ApiError),
    #[error("no active session; pass --email and --password or set ADMIN_EMAIL/ADMIN_PASSWORD")]
    NotSignedIn,
    #[error("--brand-id only applies to campaigns, not {0:?}")]
    BrandFilterUnsupported(ResourceKind),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "adminctl", about = "Admin dashboard API CLI")]
struct Cli {
    /// Overrides `ADMIN_API_URL`.
    #[arg(long)]
    base_url: Option<String>,

    #[arg(long, env = "ADMIN_EMAIL")]
    email: Option<String>,

    #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    #[arg(long, env = "ADMIN_ROLE", default_value = "admin")]
    role: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ResourceKind {
    Admins,
    Brands,
    Campaigns,
    Influencers,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and report the session state.
    Login,
    List {
        resource: ResourceKind,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 10)]
        page_size: u32,
        /// Only valid for campaigns.
        #[arg(long)]
        brand_id: Option<u64>,
    },
    Get {
        resource: ResourceKind,
        id: u64,
    },
    Delete {
        resource: ResourceKind,
        id: u64,
    },
    SearchInfluencers {
        #[arg(long)]
        query: Option<String>,
        #[arg(long)]
        platform: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        min_followers: Option<u64>,
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        page_size: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match cli.base_url.as_deref() {
        Some(url) => ClientConfig::parse(url)?,
        None => ClientConfig::from_env()?,
    };
    let client = AdminClient::from_config(&config)?;
    tracing::debug!(api_url = %config.api_url, "client configured");

    sign_in(&client, &cli).await?;

    match cli.command {
        Command::Login => {
            let state = client.session.snapshot().await;
            print_json(&serde_json::json!({
                "authenticated": state.authenticated,
                "role": state.role,
            }))
        }
        Command::List { resource, page, page_size, brand_id } => {
            run_list(&client, resource, PageRequest::new(page, page_size), brand_id).await
        }
        Command::Get { resource, id } => run_get(&client, resource, id).await,
        Command::Delete { resource, id } => {
            match resource {
                ResourceKind::Admins => client.admins.delete(id).await?,
                ResourceKind::Brands => client.brands.delete(id).await?,
                ResourceKind::Campaigns => client.campaigns.delete(id).await?,
                ResourceKind::Influencers => client.influencers.delete(id).await?,
            }
            println!("deleted");
            Ok(())
        }
        Command::SearchInfluencers { query, platform, category, min_followers, page, page_size } => {
            let params = InfluencerSearch { query, platform, category, min_followers, page, page_size };
            print_json(&client.influencers.search(&params).await?)
        }
    }
}

/// Log in with explicit credentials, or fall back to restoring a session.
async fn sign_in(client: &AdminClient, cli: &Cli) -> Result<(), CliError> {
    if let (Some(email), Some(password)) = (&cli.email, &cli.password) {
        let role = Role::parse_admin(&cli.role)?;
        let credentials = LoginCredentials { email: email.clone(), password: password.clone() };
        client.session.login(role, &credentials).await?;
        return Ok(());
    }
    if client.session.check_session().await {
        Ok(())
    } else {
        Err(CliError::NotSignedIn)
    }
}

async fn run_list(
    client: &AdminClient,
    resource: ResourceKind,
    page: PageRequest,
    brand_id: Option<u64>,
) -> Result<(), CliError> {
    match (resource, check_brand_filter(resource, brand_id)?) {
        (ResourceKind::Campaigns, Some(brand_id)) => print_json(&client.campaigns.list_by_brand(brand_id, page).await?),
        (ResourceKind::Campaigns, None) => print_json(&client.campaigns.list(page).await?),
        (ResourceKind::Admins, _) => print_json(&client.admins.list(page).await?),
        (ResourceKind::Brands, _) => print_json(&client.brands.list(page).await?),
        (ResourceKind::Influencers, _) => print_json(&client.influencers.list(page).await?),
    }
}

fn check_brand_filter(resource: ResourceKind, brand_id: Option<u64>) -> Result<Option<u64>, CliError> {
    match (resource, brand_id) {
        (ResourceKind::Campaigns, _) | (_, None) => Ok(brand_id),
        (other, Some(_)) => Err(CliError::BrandFilterUnsupported(other)),
    }
}

async fn run_get(client: &AdminClient, resource: ResourceKind, id: u64) -> Result<(), CliError> {
    match resource {
        ResourceKind::Admins => print_json(&client.admins.get(id).await?),
        ResourceKind::Brands => print_json(&client.brands.get(id).await?),
        ResourceKind::Campaigns => print_json(&client.campaigns.get(id).await?),
        ResourceKind::Influencers => print_json(&client.influencers.get(id).await?),
    }
}

fn print_json(value: &impl Serialize) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
