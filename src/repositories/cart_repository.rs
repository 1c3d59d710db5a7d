use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{error, info, instrument};

use crate::models::{CartItem, RepositoryError, RepositoryResult};
use crate::store::{StoreClient, StoreError};

/// Trait defining the persistence operations the cart service needs
#[async_trait]
pub trait CartRepository: Send + Sync {
    /// All rows for a user
    async fn find_items(&self, user_id: &str) -> RepositoryResult<Vec<CartItem>>;

    /// The row for one (user, product) pair, if present
    async fn find_item(
        &self,
        user_id: &str,
        product_id: &str,
    ) -> RepositoryResult<Option<CartItem>>;

    /// Insert a full new row
    async fn insert_item(&self, item: &CartItem) -> RepositoryResult<()>;

    /// Set the quantity on an existing row; returns the matched-row
    /// count (the store does not raise on a no-op update)
    async fn update_quantity(
        &self,
        user_id: &str,
        product_id: &str,
        quantity: i64,
    ) -> RepositoryResult<usize>;

    /// Delete one row; deleting an absent row is not an error
    async fn delete_item(&self, user_id: &str, product_id: &str) -> RepositoryResult<()>;

    /// Delete every row for a user
    async fn delete_all(&self, user_id: &str) -> RepositoryResult<()>;
}

/// REST data API implementation of the CartRepository trait
pub struct RestCartRepository {
    client: StoreClient,
    table_name: String,
}

impl RestCartRepository {
    pub fn new(client: StoreClient, table_name: String) -> Self {
        Self { client, table_name }
    }

    /// Get the table name (for testing)
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    fn rows_to_items(&self, rows: Vec<Value>) -> RepositoryResult<Vec<CartItem>> {
        rows.into_iter()
            .map(|row| serde_json::from_value(row).map_err(RepositoryError::from))
            .collect()
    }

    fn map_store_error(&self, error: StoreError) -> RepositoryError {
        error!("Store error: {}", error);
        RepositoryError::Store {
            message: error.to_string(),
        }
    }
}

#[async_trait]
impl CartRepository for RestCartRepository {
    #[instrument(skip(self), fields(table = %self.table_name, user_id = %user_id))]
    async fn find_items(&self, user_id: &str) -> RepositoryResult<Vec<CartItem>> {
        let rows = self
            .client
            .table(&self.table_name)
            .eq("user_id", user_id)
            .select()
            .await
            .map_err(|e| self.map_store_error(e))?;

        let items = self.rows_to_items(rows)?;
        info!("Found {} cart rows", items.len());
        Ok(items)
    }

    #[instrument(skip(self), fields(table = %self.table_name, user_id = %user_id, product_id = %product_id))]
    async fn find_item(
        &self,
        user_id: &str,
        product_id: &str,
    ) -> RepositoryResult<Option<CartItem>> {
        let rows = self
            .client
            .table(&self.table_name)
            .eq("user_id", user_id)
            .eq("product_id", product_id)
            .select()
            .await
            .map_err(|e| self.map_store_error(e))?;

        // At most one row per pair; take the first if the invariant was
        // ever violated by a concurrent insert.
        Ok(self.rows_to_items(rows)?.into_iter().next())
    }

    #[instrument(skip(self, item), fields(table = %self.table_name, user_id = %item.user_id, product_id = %item.product_id))]
    async fn insert_item(&self, item: &CartItem) -> RepositoryResult<()> {
        self.client
            .table(&self.table_name)
            .insert(item)
            .await
            .map_err(|e| self.map_store_error(e))?;

        info!("Cart row inserted");
        Ok(())
    }

    #[instrument(skip(self), fields(table = %self.table_name, user_id = %user_id, product_id = %product_id))]
    async fn update_quantity(
        &self,
        user_id: &str,
        product_id: &str,
        quantity: i64,
    ) -> RepositoryResult<usize> {
        let rows = self
            .client
            .table(&self.table_name)
            .eq("user_id", user_id)
            .eq("product_id", product_id)
            .update(&json!({ "quantity": quantity }))
            .await
            .map_err(|e| self.map_store_error(e))?;

        info!("Quantity update matched {} rows", rows.len());
        Ok(rows.len())
    }

    #[instrument(skip(self), fields(table = %self.table_name, user_id = %user_id, product_id = %product_id))]
    async fn delete_item(&self, user_id: &str, product_id: &str) -> RepositoryResult<()> {
        self.client
            .table(&self.table_name)
            .eq("user_id", user_id)
            .eq("product_id", product_id)
            .delete()
            .await
            .map_err(|e| self.map_store_error(e))?;

        info!("Cart row deleted");
        Ok(())
    }

    #[instrument(skip(self), fields(table = %self.table_name, user_id = %user_id))]
    async fn delete_all(&self, user_id: &str) -> RepositoryResult<()> {
        self.client
            .table(&self.table_name)
            .eq("user_id", user_id)
            .delete()
            .await
            .map_err(|e| self.map_store_error(e))?;

        info!("Cart cleared");
        Ok(())
    }
}
