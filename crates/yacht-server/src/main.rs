use tracing_subscriber::EnvFilter;

use yacht_server::YachtServer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let bind = std::env::var("YACHT_BIND").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let server = YachtServer::builder().bind(&bind).build().await?;
    server.run().await?;
    Ok(())
}
