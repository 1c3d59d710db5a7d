use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, post, put},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, info, instrument};

use crate::handlers::health_check;
use crate::models::{
    AddItemRequest, ClearCartRequest, ListCartRequest, RemoveItemParams, ServiceError,
    UpdateQuantityRequest,
};
use crate::services::CartService;

/// State shared by the cart handlers
#[derive(Clone)]
pub struct CartHandlerState {
    pub cart_service: Arc<CartService>,
}

/// Create the application router with all endpoints
pub fn create_router(cart_service: Arc<CartService>) -> Router {
    let state = CartHandlerState { cart_service };

    Router::new()
        .route("/health", get(health_check))
        .route("/cart", post(get_cart))
        .route("/cart/add", post(add_to_cart))
        .route("/cart/update", put(update_cart_item))
        .route("/cart/remove", delete(remove_cart_item))
        .route("/cart/clear", post(clear_cart))
        .with_state(state)
}

// Request bodies are extracted as Option<Json<..>>: an absent or
// unparseable body becomes the all-None request, which the service
// rejects as a missing field. Clients never see a framework 422.

/// List the contents of a user's cart
#[instrument(skip(state, request))]
pub async fn get_cart(
    State(state): State<CartHandlerState>,
    request: Option<Json<ListCartRequest>>,
) -> (StatusCode, Json<Value>) {
    let request = request.map(|Json(r)| r).unwrap_or_default();

    match state.cart_service.list(request).await {
        Ok(cart) => {
            info!("Retrieved cart with {} items", cart.items.len());
            (
                StatusCode::OK,
                Json(json!({
                    "exito": true,
                    "user_id": cart.user_id,
                    "items": cart.items,
                })),
            )
        }
        Err(err) => error_response(err),
    }
}

/// Add a product to the cart (merging quantities on repeat adds)
#[instrument(skip(state, request))]
pub async fn add_to_cart(
    State(state): State<CartHandlerState>,
    request: Option<Json<AddItemRequest>>,
) -> (StatusCode, Json<Value>) {
    let request = request.map(|Json(r)| r).unwrap_or_default();

    match state.cart_service.add(request).await {
        Ok(()) => {
            info!("Product added to cart");
            success_message("Producto agregado al carrito")
        }
        Err(err) => error_response(err),
    }
}

/// Replace the quantity of an item already in the cart
#[instrument(skip(state, request))]
pub async fn update_cart_item(
    State(state): State<CartHandlerState>,
    request: Option<Json<UpdateQuantityRequest>>,
) -> (StatusCode, Json<Value>) {
    let request = request.map(|Json(r)| r).unwrap_or_default();

    match state.cart_service.update_quantity(request).await {
        Ok(()) => {
            info!("Cart quantity updated");
            success_message("Cantidad actualizada")
        }
        Err(err) => error_response(err),
    }
}

/// Remove one product from the cart (parameters come from the query
/// string, not the body)
#[instrument(skip(state, params))]
pub async fn remove_cart_item(
    State(state): State<CartHandlerState>,
    params: Option<Query<RemoveItemParams>>,
) -> (StatusCode, Json<Value>) {
    let params = params.map(|Query(p)| p).unwrap_or_default();

    match state.cart_service.remove(params).await {
        Ok(()) => {
            info!("Product removed from cart");
            success_message("Producto eliminado del carrito")
        }
        Err(err) => error_response(err),
    }
}

/// Delete every item in a user's cart
#[instrument(skip(state, request))]
pub async fn clear_cart(
    State(state): State<CartHandlerState>,
    request: Option<Json<ClearCartRequest>>,
) -> (StatusCode, Json<Value>) {
    let request = request.map(|Json(r)| r).unwrap_or_default();

    match state.cart_service.clear(request).await {
        Ok(()) => {
            info!("Cart cleared");
            success_message("Carrito vaciado")
        }
        Err(err) => error_response(err),
    }
}

fn success_message(mensaje: &str) -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({ "exito": true, "mensaje": mensaje })),
    )
}

/// Convert a ServiceError to the error envelope and status code
fn error_response(err: ServiceError) -> (StatusCode, Json<Value>) {
    let status = match &err {
        ServiceError::Validation { .. } => StatusCode::BAD_REQUEST,
        ServiceError::ItemNotFound { .. } => StatusCode::NOT_FOUND,
        ServiceError::Repository { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    };

    error!("Request failed: {}", err);

    (
        status,
        Json(json!({ "exito": false, "error": err.to_string() })),
    )
}
