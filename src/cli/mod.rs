use std::net::SocketAddr;
use std::sync::Arc;

use clap::{Arg, Command};
use tracing::info;

use crate::config::Settings;
use crate::server::{self, AppState};
use crate::services::{GeminiClient, SearchProvider, SerpApiClient};

/// CLI entry point for the tripwise server
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from a .env file
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let matches = Command::new("tripwise")
        .version("0.1.0")
        .about("AI-assisted travel itinerary and flight search backend")
        .arg(
            Arg::new("host")
                .long("host")
                .value_name("ADDR")
                .help("Address to bind the HTTP server to")
                .default_value("127.0.0.1"),
        )
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .value_name("PORT")
                .help("Port to listen on")
                .default_value("8000"),
        )
        .get_matches();

    // GEMINI_API_KEY is fatal here; SERPAPI_KEY only on first dependent use.
    let settings = Settings::from_env()?;

    let generator = Arc::new(GeminiClient::new(settings.generation_api_key.clone())?);
    let search: Option<Arc<dyn SearchProvider>> = match settings.search_api_key.as_deref() {
        Some(key) => Some(Arc::new(SerpApiClient::new(key)?)),
        None => None,
    };

    let host = matches.get_one::<String>("host").unwrap();
    let port: u16 = matches.get_one::<String>("port").unwrap().parse()?;
    let addr: SocketAddr = format!("{host}:{port}").parse()?;

    info!("starting tripwise on {}", addr);
    server::run(addr, AppState::new(generator, search)).await?;
    Ok(())
}
