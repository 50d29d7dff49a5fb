// Blog service server - posts/comments CRUD plus external passthroughs

use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;

use blog_service::{api::create_router, app_state::AppState, config::Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Config::from_env()?;
    let address = config.server_address();

    // Initialize application state (fatal if the database is unreachable)
    let app_state = AppState::new(config).await?;

    let app = create_router(app_state).layer(CorsLayer::permissive());

    info!("Blog service listening on http://{}", address);
    let listener = TcpListener::bind(&address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
