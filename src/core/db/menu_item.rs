use std::future::Future;

use crate::error::MenuError;

/// A single purchasable item as stored in the `menuitems` table.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct MenuItem {
    pub id: i64,
    pub name: String,
    /// Kept as text so the source formatting survives.
    pub price: String,
    pub description: String,
    /// Filename or URL suffix, resolved by the presentation layer.
    pub image: String,
    pub category: String,
}

pub trait MenuRepository {
    /// Create the storage structure if it does not exist yet.
    fn ensure_schema(&self) -> impl Future<Output = Result<(), MenuError>> + Send;

    /// All stored items, ordered by id.
    fn get_all(&self) -> impl Future<Output = Result<Vec<MenuItem>, MenuError>> + Send;

    /// Insert every item in one transaction. Nothing is committed if any row fails.
    fn bulk_insert(&self, items: &[MenuItem]) -> impl Future<Output = Result<(), MenuError>> + Send;

    /// Items whose name contains `search` and whose category is one of `categories`.
    /// An empty category list yields no items without touching storage.
    fn query(
        &self,
        search: &str,
        categories: &[String],
    ) -> impl Future<Output = Result<Vec<MenuItem>, MenuError>> + Send;
}
