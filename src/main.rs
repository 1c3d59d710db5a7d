use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use cart_rs::{
    handlers::create_router, init_logging, repositories::RestCartRepository,
    services::CartService, store::StoreClient, Config,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Local overrides from .env, if present
    dotenvy::dotenv().ok();

    // Configuration must load before anything else; a missing store
    // endpoint or key aborts startup here.
    let config = Config::from_environment()?;

    init_logging(
        &config.observability.service_name,
        &config.observability.log_level,
        config.observability.enable_json_logging,
    )?;

    info!("Starting cart-rs service");
    info!("Store endpoint: {}", config.store.store_url);
    info!("Cart table: {}", config.store.cart_table_name);

    // One store client for the whole process, injected explicitly.
    let store_client = StoreClient::new(&config.store)?;
    let cart_repository = Arc::new(RestCartRepository::new(
        store_client,
        config.store.cart_table_name.clone(),
    ));
    let cart_service = Arc::new(CartService::new(cart_repository));
    info!("Cart service initialized successfully");

    let app = create_router(cart_service).layer(TraceLayer::new_for_http());

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);
    let listener = TcpListener::bind(addr).await?;
    info!("Server listening on {}", addr);

    let shutdown_signal = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install CTRL+C signal handler");
        info!("Shutdown signal received");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
