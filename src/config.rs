use std::{path::PathBuf, time::Duration};

use crate::core::coordinator::{CoordinatorConfig, DEFAULT_CATEGORIES, DEFAULT_DEBOUNCE};

pub const DEFAULT_MENU_URL: &str =
    "https://raw.githubusercontent.com/Meta-Mobile-Developer-PC/Working-With-Data-API/main/capstone.json";
pub const DEFAULT_IMAGE_BASE_URL: &str =
    "https://github.com/Meta-Mobile-Developer-PC/Working-With-Data-API/blob/main/images";
pub const DEFAULT_DB_FILE: &str = "little_lemon.db";
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Settings owned by the composition root and injected into the core.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub menu_url: String,
    pub image_base_url: String,
    pub fetch_timeout: Duration,
    pub debounce: Duration,
    /// Fixed category vocabulary, in filter-bar order.
    pub categories: Vec<String>,
    /// JSON profile blob; `None` skips the avatar.
    pub profile_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE),
            menu_url: DEFAULT_MENU_URL.to_string(),
            image_base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            debounce: DEFAULT_DEBOUNCE,
            categories: DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect(),
            profile_path: None,
        }
    }
}

impl AppConfig {
    pub fn coordinator_config(&self) -> CoordinatorConfig {
        CoordinatorConfig {
            debounce: self.debounce,
            categories: self.categories.clone(),
        }
    }

    /// Position of `category` in the vocabulary, compared case-insensitively.
    pub fn category_index(&self, category: &str) -> Option<usize> {
        self.categories
            .iter()
            .position(|c| c.eq_ignore_ascii_case(category))
    }
}
