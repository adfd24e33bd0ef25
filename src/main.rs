use std::net::SocketAddr;

use interviews_backend::{
    config::{get_config, init_config},
    database::pool::create_pool,
    middleware::cors::api_cors,
    routes, telemetry, AppState,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_config()?;
    let config = get_config();
    telemetry::init_tracing(config.log_format);

    let pool = create_pool(config).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("Database migrations applied");

    let app_state = AppState::from_pool(pool, config);

    let app = routes::router(app_state)
        .layer(api_cors())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
