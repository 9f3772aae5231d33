mod menu_item;
mod state;

use std::{path::Path, sync::Arc};

use sqlx::{QueryBuilder, Sqlite};
use state::DbState;
use tracing::debug;

pub use menu_item::{MenuItem, MenuRepository};

use crate::error::MenuError;

const SELECT_COLUMNS: &str = "SELECT id, name, price, description, image, category FROM menuitems";

/// SQLite-backed menu cache.
///
/// Cloning is cheap; every clone shares the same connection pool.
#[derive(Debug, Clone)]
pub struct MenuDb {
    state: Arc<DbState>,
}

impl MenuDb {
    /// Open (or create) the database file. The schema is not touched until
    /// [`MenuRepository::ensure_schema`] runs.
    pub async fn open<P: AsRef<Path>>(db_file: P) -> Result<Self, MenuError> {
        Ok(Self {
            state: Arc::new(DbState::open(db_file).await?),
        })
    }

    pub async fn close(&self) {
        self.state.close().await
    }
}

impl MenuRepository for MenuDb {
    async fn ensure_schema(&self) -> Result<(), MenuError> {
        self.state.migrate().await
    }

    async fn get_all(&self) -> Result<Vec<MenuItem>, MenuError> {
        let items = sqlx::query_as::<_, MenuItem>(&format!("{SELECT_COLUMNS} ORDER BY id ASC"))
            .fetch_all(self.state.pool())
            .await?;
        Ok(items)
    }

    async fn bulk_insert(&self, items: &[MenuItem]) -> Result<(), MenuError> {
        if items.is_empty() {
            return Err(MenuError::InvalidInput(
                "menu items batch must not be empty".to_string(),
            ));
        }

        // Dropping the transaction on an early return rolls it back.
        let mut tx = self.state.pool().begin().await?;
        for item in items {
            sqlx::query(
                r#"INSERT INTO menuitems (id, name, price, description, image, category)
                VALUES ($1, $2, $3, $4, $5, $6)"#,
            )
            .bind(item.id)
            .bind(&item.name)
            .bind(&item.price)
            .bind(&item.description)
            .bind(&item.image)
            .bind(&item.category)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        debug!(count = items.len(), "inserted menu items");
        Ok(())
    }

    async fn query(&self, search: &str, categories: &[String]) -> Result<Vec<MenuItem>, MenuError> {
        if categories.is_empty() {
            return Ok(Vec::new());
        }

        let pattern = format!("%{}%", escape_like(search));
        let mut builder = QueryBuilder::<Sqlite>::new(SELECT_COLUMNS);
        builder
            .push(" WHERE name LIKE ")
            .push_bind(pattern)
            .push(" ESCAPE '\\' AND category IN (");
        let mut separated = builder.separated(", ");
        for category in categories {
            separated.push_bind(category.as_str());
        }
        separated.push_unseparated(") ORDER BY id ASC");

        let items = builder
            .build_query_as::<MenuItem>()
            .fetch_all(self.state.pool())
            .await?;
        Ok(items)
    }
}

/// Escape LIKE wildcards so the search text matches literally.
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
