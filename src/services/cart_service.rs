use std::sync::Arc;
use tracing::{info, instrument};

use crate::models::{
    AddItemRequest, CartContents, CartItem, ClearCartRequest, ListCartRequest, RemoveItemParams,
    ServiceError, ServiceResult, UpdateQuantityRequest,
};
use crate::repositories::CartRepository;

/// Service implementing the five cart operations.
///
/// Every operation validates its inputs, then issues exactly one
/// persistence call (two for an add that merges into an existing row).
/// No state is shared between calls and nothing spans a transaction.
pub struct CartService {
    repository: Arc<dyn CartRepository>,
}

impl CartService {
    pub fn new(repository: Arc<dyn CartRepository>) -> Self {
        Self { repository }
    }

    /// List a user's cart, rows verbatim from the store.
    #[instrument(skip(self, request))]
    pub async fn list(&self, request: ListCartRequest) -> ServiceResult<CartContents> {
        let user_id = require(request.user_id, "Se requiere user_id")?;

        let items = self.repository.find_items(&user_id).await?;
        info!("Listed {} cart items for user {}", items.len(), user_id);

        Ok(CartContents { user_id, items })
    }

    /// Add a product to the cart, merging quantities if the pair
    /// already has a row.
    ///
    /// Read-before-write with no transaction: two concurrent adds for
    /// the same pair can both observe "not found" and both insert, or
    /// one increment can overwrite the other.
    #[instrument(skip(self, request))]
    pub async fn add(&self, request: AddItemRequest) -> ServiceResult<()> {
        let (
            Some(user_id),
            Some(product_id),
            Some(product_name),
            Some(product_image_url),
            Some(product_price),
            Some(quantity),
        ) = (
            request.user_id,
            request.product_id,
            request.product_name,
            request.product_image_url,
            request.product_price,
            request.quantity,
        )
        else {
            return Err(ServiceError::validation("Datos incompletos"));
        };

        match self.repository.find_item(&user_id, &product_id).await? {
            Some(existing) => {
                let new_quantity = existing.quantity + quantity;
                self.repository
                    .update_quantity(&user_id, &product_id, new_quantity)
                    .await?;
                info!("Merged quantity for {}/{}: {}", user_id, product_id, new_quantity);
            }
            None => {
                let item = CartItem {
                    user_id,
                    product_id,
                    product_name,
                    product_image_url,
                    product_price,
                    quantity,
                };
                self.repository.insert_item(&item).await?;
                info!("Inserted new cart row for {}/{}", item.user_id, item.product_id);
            }
        }

        Ok(())
    }

    /// Replace the quantity on an existing row.
    #[instrument(skip(self, request))]
    pub async fn update_quantity(&self, request: UpdateQuantityRequest) -> ServiceResult<()> {
        let (Some(user_id), Some(product_id), Some(quantity)) =
            (request.user_id, request.product_id, request.quantity)
        else {
            return Err(ServiceError::validation("Datos incompletos"));
        };

        // A quantity of zero rejects rather than deleting the row.
        if quantity <= 0 {
            return Err(ServiceError::validation(
                "La cantidad debe ser mayor a cero",
            ));
        }

        let matched = self
            .repository
            .update_quantity(&user_id, &product_id, quantity)
            .await?;

        if matched == 0 {
            return Err(ServiceError::ItemNotFound {
                user_id,
                product_id,
            });
        }

        info!("Updated quantity for {}/{} to {}", user_id, product_id, quantity);
        Ok(())
    }

    /// Remove one product from the cart. Removing an absent item is
    /// not an error.
    #[instrument(skip(self, params))]
    pub async fn remove(&self, params: RemoveItemParams) -> ServiceResult<()> {
        let message = "Parámetros incompletos. Se requieren user_id y product_id";
        let user_id = require(params.user_id, message)?;
        let product_id = require(params.product_id, message)?;

        self.repository.delete_item(&user_id, &product_id).await?;
        info!("Removed {}/{} from cart", user_id, product_id);
        Ok(())
    }

    /// Delete every row for a user. Clearing an empty cart is not an
    /// error.
    #[instrument(skip(self, request))]
    pub async fn clear(&self, request: ClearCartRequest) -> ServiceResult<()> {
        let user_id = require(request.user_id, "Se requiere user_id")?;

        self.repository.delete_all(&user_id).await?;
        info!("Cleared cart for {}", user_id);
        Ok(())
    }
}

fn require(value: Option<String>, message: &str) -> ServiceResult<String> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ServiceError::validation(message))
}
