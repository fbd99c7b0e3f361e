//! Moctezuma CLI binary.
//!
//! A thin consumer of `moctezuma_client`: it wires the HTTP client, a
//! file-backed session store, and the domain services together at the
//! composition root and maps subcommands onto service calls.

pub use self::error::{Error, Result};
mod error;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use cli::{Cli, Commands};
use tokio_util::sync::CancellationToken;
use tracing::debug;

mod cli;

use moctezuma_client::cart_flow::CartCoordinator;
use moctezuma_client::config::ClientConfig;
use moctezuma_client::http::HttpClient;
use moctezuma_client::models::catalog::{ApiId, Record, RecordPage};
use moctezuma_client::models::auth::{Credentials, RegisterInput};
use moctezuma_client::services::{AuthService, CartService, CatalogService};
use moctezuma_client::session::SessionManager;
use moctezuma_client::store::{FileStore, SessionStore};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let args = Cli::parse();

    let config = ClientConfig::from_env();
    debug!(base_url = %config.base_url, "using API origin");

    let http = Arc::new(HttpClient::from_config(&config)?);
    let store: Arc<dyn SessionStore> = Arc::new(FileStore::open(session_path()));
    let auth = AuthService::new(Arc::clone(&http));
    let session = Arc::new(SessionManager::new(auth, Arc::clone(&store)));
    let catalog =
        CatalogService::new(Arc::clone(&http)).with_token_getter(session.token_getter());
    let cart = CartService::new(Arc::clone(&http)).with_token_getter(session.token_getter());
    let coordinator = CartCoordinator::new(cart, Arc::clone(&store));
    let cancel = CancellationToken::new();

    match args.command {
        Commands::Records { page } => {
            let listing = catalog.list(page, &cancel).await?;
            print_page(&listing, page.unwrap_or(1));
        }
        Commands::Search { query, page } => {
            let listing = catalog.search(&query, page, &cancel).await?;
            if listing.results.is_empty() {
                println!("No records matched \"{query}\".");
            } else {
                print_page(&listing, page.unwrap_or(1));
            }
        }
        Commands::Show { slug } => {
            let record = catalog
                .record_by_slug_cached(store.as_ref(), &slug, &cancel)
                .await?;
            print_record(&record);
        }
        Commands::Login { email, password } => {
            session.login(&Credentials { email, password }).await?;
            let name = session.user().map(|u| u.name).unwrap_or_default();
            println!("Logged in as {name}.");
        }
        Commands::Register {
            email,
            username,
            password,
        } => {
            session
                .register(&RegisterInput {
                    email,
                    password,
                    username,
                })
                .await?;
            let name = session.user().map(|u| u.name).unwrap_or_default();
            println!("Account created. Logged in as {name}.");
        }
        Commands::Logout => {
            session.logout();
            println!("Session closed.");
        }
        Commands::Whoami => match session.user() {
            Some(user) => {
                let email = user.email.as_deref().unwrap_or("-");
                println!("{} <{email}>", user.name);
            }
            None => println!("Not logged in."),
        },
        Commands::Cart => {
            require_session(&session)?;
            let carts = coordinator.carts(&cancel).await?;
            match carts.first() {
                Some(active) => {
                    println!("Cart {} — {} item(s)", active.cart_code, active.total_items());
                    for item in &active.cart_items {
                        println!(
                            "  {} x{}  {}",
                            item.record.title,
                            item.quantity,
                            format_price(item.subtotal.as_f64())
                        );
                    }
                    println!("Total: {}", format_price(active.total_price.as_f64()));
                }
                None => println!("Your cart is empty."),
            }
        }
        Commands::CartAdd {
            record_id,
            quantity,
        } => {
            require_session(&session)?;
            let cart = coordinator
                .add_to_cart(parse_record_id(&record_id), quantity, &cancel)
                .await?;
            println!(
                "Added to cart {} ({} item(s) total).",
                cart.cart_code,
                cart.total_items()
            );
        }
    }

    Ok(())
}

/// Path of the persisted session file, under the user config dir when one
/// exists.
fn session_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("moctezuma")
        .join("session.json")
}

fn require_session(session: &SessionManager) -> Result<()> {
    if session.is_authenticated() {
        Ok(())
    } else {
        Err(Error::Custom(
            "not logged in — run `moctezuma login <email> --password <password>` first".into(),
        ))
    }
}

fn parse_record_id(raw: &str) -> ApiId {
    match raw.parse::<i64>() {
        Ok(n) => ApiId::Int(n),
        Err(_) => ApiId::Text(raw.into()),
    }
}

fn format_price(price: Option<f64>) -> String {
    match price {
        Some(p) => format!("${p:.2} MXN"),
        None => "—".into(),
    }
}

fn print_record(record: &Record) {
    println!("{} — {}", record.title, record.artist.name);
    println!("  slug: {}  condition: {}", record.slug, record.condition);
    if record.has_discount() {
        println!(
            "  price: {} (was {})",
            format_price(record.effective_price()),
            format_price(record.price.as_f64())
        );
    } else {
        println!("  price: {}", format_price(record.effective_price()));
    }
    println!("  stock: {}", record.stock);
    if let Some(genre) = record.genre.as_ref().and_then(|g| g.label()) {
        println!("  genre: {genre}");
    }
    if let Some(description) = &record.description {
        println!("  {description}");
    }
}

fn print_page(page: &RecordPage, current: u32) {
    for record in &page.results {
        println!(
            "{:<40} {:<24} {:>12}  stock {}",
            record.title,
            record.artist.name,
            format_price(record.effective_price()),
            record.stock
        );
    }
    println!("— page {current}, {} record(s) total", page.count);
    if page.next.is_some() {
        println!("  more: --page {}", current + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_ids_parse_numeric_and_text() {
        assert_eq!(parse_record_id("42"), ApiId::Int(42));
        assert_eq!(parse_record_id("r1"), ApiId::Text("r1".into()));
    }

    #[test]
    fn prices_format_with_fallback() {
        assert_eq!(format_price(Some(13.491)), "$13.49 MXN");
        assert_eq!(format_price(None), "—");
    }
}
