use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cart_rs::{
    config::StoreConfig, handlers::create_router, repositories::RestCartRepository,
    services::CartService, store::StoreClient,
};

/// Boots the real router against a mock store server.
pub struct TestEnvironment {
    pub client: Client,
    pub base_url: String,
    pub store: MockServer,
}

impl TestEnvironment {
    pub async fn new() -> Self {
        let store = MockServer::start().await;

        let store_config = StoreConfig {
            store_url: store.uri(),
            store_key: "test-key".to_string(),
            cart_table_name: "cart_items".to_string(),
            store_timeout_seconds: 5,
        };

        let store_client = StoreClient::new(&store_config).expect("Failed to build store client");
        let repository = Arc::new(RestCartRepository::new(
            store_client,
            store_config.cart_table_name.clone(),
        ));
        let service = Arc::new(CartService::new(repository));
        let app = create_router(service);

        // Start server
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind listener");
        let addr = listener.local_addr().expect("Failed to get local address");
        let base_url = format!("http://{}", addr);

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Failed to serve app");
        });

        // Wait for server to start
        tokio::time::sleep(Duration::from_millis(50)).await;

        Self {
            client: Client::new(),
            base_url,
            store,
        }
    }

    /// Drop all store expectations between scenario steps.
    pub async fn reset_store(&self) {
        self.store.reset().await;
    }

    /// Mount a select for one user returning the given rows.
    pub async fn given_user_rows(&self, user_id: &str, rows: Value) {
        Mock::given(method("GET"))
            .and(path("/rest/v1/cart_items"))
            .and(query_param("user_id", format!("eq.{}", user_id).as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(rows))
            .mount(&self.store)
            .await;
    }
}

pub fn widget_row(quantity: i64) -> Value {
    json!({
        "user_id": "u1",
        "product_id": "p1",
        "product_name": "Widget",
        "product_image_url": "https://example.com/widget.png",
        "product_price": 9.99,
        "quantity": quantity
    })
}
