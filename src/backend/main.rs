/**
 * TeamUp Chat Server Entry Point
 *
 * This is the main entry point for the TeamUp realtime chat server.
 * It loads the configuration, initializes tracing and serves the Axum app.
 */

#[cfg(feature = "ssr")]
use teamup_chat::backend::server::{create_app, ServerConfig};

#[cfg(feature = "ssr")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file if present
    dotenv::dotenv().ok();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=debug"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!("[Server] Server initialization started");

    let config = ServerConfig::from_env()?;
    let port = config.port;

    // Create the Axum app
    let app = create_app(config).await;

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("[Server] Listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(not(feature = "ssr"))]
fn main() {
    eprintln!("Server requires the 'ssr' feature to be enabled.");
    eprintln!("Run with: cargo run --bin teamup-chat-server --features ssr");
    std::process::exit(1);
}
