use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use menu_browser::{MenuDb, MenuError, MenuItem, MenuRepository, MenuSource};

/// Creates a MenuDb backed by a file in a fresh temp directory, schema applied.
/// Returns both the database and the temp directory (which must be kept alive).
pub async fn create_test_db() -> (MenuDb, tempfile::TempDir) {
    let dir = tempfile::TempDir::new().expect("Failed to create temp directory");
    let db = MenuDb::open(dir.path().join("menu.db"))
        .await
        .expect("Failed to open test database");
    db.ensure_schema().await.expect("Failed to create schema");
    (db, dir)
}

pub fn make_item(id: i64, name: &str, category: &str) -> MenuItem {
    MenuItem {
        id,
        name: name.to_string(),
        price: format!("{}.99", id + 4),
        description: format!("{} description", name),
        image: format!("{}.jpg", name.to_lowercase().replace(' ', "_")),
        category: category.to_string(),
    }
}

/// The three-item menu used by the filtering scenarios.
pub fn scenario_menu() -> Vec<MenuItem> {
    vec![
        make_item(1, "Greek Salad", "starters"),
        make_item(2, "Bruschetta", "starters"),
        make_item(3, "Lemon Cake", "desserts"),
    ]
}

pub fn sample_menu() -> Vec<MenuItem> {
    vec![
        make_item(1, "Greek Salad", "starters"),
        make_item(2, "Bruschetta", "starters"),
        make_item(3, "Grilled Fish", "mains"),
        make_item(4, "Pasta", "mains"),
        make_item(5, "Lemon Cake", "desserts"),
    ]
}

pub fn all_categories() -> Vec<String> {
    ["starters", "mains", "desserts"]
        .iter()
        .map(|c| c.to_string())
        .collect()
}

pub fn names(items: &[MenuItem]) -> Vec<&str> {
    items.iter().map(|i| i.name.as_str()).collect()
}

/// Wraps a real MenuDb and counts bulk inserts.
#[derive(Clone)]
pub struct CountingStore {
    pub inner: MenuDb,
    pub bulk_inserts: Arc<AtomicUsize>,
}

impl CountingStore {
    pub fn new(inner: MenuDb) -> Self {
        Self {
            inner,
            bulk_inserts: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn bulk_insert_count(&self) -> usize {
        self.bulk_inserts.load(Ordering::SeqCst)
    }
}

impl MenuRepository for CountingStore {
    async fn ensure_schema(&self) -> Result<(), MenuError> {
        self.inner.ensure_schema().await
    }

    async fn get_all(&self) -> Result<Vec<MenuItem>, MenuError> {
        self.inner.get_all().await
    }

    async fn bulk_insert(&self, items: &[MenuItem]) -> Result<(), MenuError> {
        self.bulk_inserts.fetch_add(1, Ordering::SeqCst);
        self.inner.bulk_insert(items).await
    }

    async fn query(&self, search: &str, categories: &[String]) -> Result<Vec<MenuItem>, MenuError> {
        self.inner.query(search, categories).await
    }
}

/// Menu source serving a fixed list, or failing like an unavailable upstream.
#[derive(Clone, Default)]
pub struct StubLoader {
    pub items: Vec<MenuItem>,
    pub fail: bool,
    pub fetches: Arc<AtomicUsize>,
}

impl StubLoader {
    pub fn serving(items: Vec<MenuItem>) -> Self {
        Self {
            items,
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl MenuSource for StubLoader {
    async fn fetch_menu(&self) -> Result<Vec<MenuItem>, MenuError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(MenuError::UpstreamStatus {
                status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
            });
        }
        Ok(self.items.clone())
    }
}
