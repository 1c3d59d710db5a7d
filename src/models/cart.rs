use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One row of the cart table: a product a user intends to purchase.
///
/// Invariant: at most one row exists per `(user_id, product_id)` pair,
/// and `quantity > 0` whenever the row exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub user_id: String,
    pub product_id: String,
    pub product_name: String,
    pub product_image_url: String,
    pub product_price: Decimal,
    pub quantity: i64,
}

/// A user's cart as returned by the list operation: rows verbatim from
/// the store, no ordering guarantee beyond storage default.
#[derive(Debug, Clone, Serialize)]
pub struct CartContents {
    pub user_id: String,
    pub items: Vec<CartItem>,
}

// Request bodies are deserialized with every field optional so that a
// missing or malformed body behaves exactly like a body with no fields;
// presence is checked by the service, not the framework.

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListCartRequest {
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddItemRequest {
    pub user_id: Option<String>,
    pub product_id: Option<String>,
    pub product_name: Option<String>,
    pub product_image_url: Option<String>,
    pub product_price: Option<Decimal>,
    pub quantity: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateQuantityRequest {
    pub user_id: Option<String>,
    pub product_id: Option<String>,
    pub quantity: Option<i64>,
}

/// Remove takes its inputs from query parameters, not the body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RemoveItemParams {
    pub user_id: Option<String>,
    pub product_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClearCartRequest {
    pub user_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_cart_item_round_trips_store_rows() {
        let row = serde_json::json!({
            "user_id": "u1",
            "product_id": "p1",
            "product_name": "Widget",
            "product_image_url": "https://example.com/widget.png",
            "product_price": 9.99,
            "quantity": 2
        });

        let item: CartItem = serde_json::from_value(row).unwrap();
        assert_eq!(item.user_id, "u1");
        assert_eq!(item.product_price, dec!(9.99));
        assert_eq!(item.quantity, 2);
    }

    #[test]
    fn test_cart_item_ignores_extra_store_columns() {
        // Hosted tables usually carry id/created_at columns we never
        // asked for.
        let row = serde_json::json!({
            "id": 42,
            "created_at": "2024-01-01T00:00:00Z",
            "user_id": "u1",
            "product_id": "p1",
            "product_name": "Widget",
            "product_image_url": "img",
            "product_price": 9.99,
            "quantity": 1
        });

        assert!(serde_json::from_value::<CartItem>(row).is_ok());
    }

    #[test]
    fn test_add_item_request_tolerates_missing_fields() {
        let request: AddItemRequest = serde_json::from_str("{}").unwrap();
        assert!(request.user_id.is_none());
        assert!(request.quantity.is_none());

        let request: AddItemRequest =
            serde_json::from_str(r#"{"user_id": "u1", "quantity": 3}"#).unwrap();
        assert_eq!(request.user_id.as_deref(), Some("u1"));
        assert_eq!(request.quantity, Some(3));
        assert!(request.product_price.is_none());
    }

    #[test]
    fn test_update_quantity_request_deserialization() {
        let json = r#"{"user_id": "u1", "product_id": "p1", "quantity": 5}"#;
        let request: UpdateQuantityRequest = serde_json::from_str(json).unwrap();

        assert_eq!(request.user_id.as_deref(), Some("u1"));
        assert_eq!(request.product_id.as_deref(), Some("p1"));
        assert_eq!(request.quantity, Some(5));
    }
}
