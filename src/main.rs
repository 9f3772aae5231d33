use clap::Parser;
use std::{
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::{error, warn};

use menu_browser::config::{AppConfig, DEFAULT_DB_FILE, DEFAULT_IMAGE_BASE_URL, DEFAULT_MENU_URL};
use menu_browser::core::profile::{Avatar, Profile, ProfileStore};
use menu_browser::{
    HttpMenuLoader, MenuDb, MenuEvent, QueryCoordinator, SectionGroup, initialize, logging,
};

#[derive(Parser)]
#[command(name = "menu-browser")]
#[command(about = "Browse the restaurant menu from a local cache")]
struct Cli {
    /// Path to the SQLite menu cache
    #[arg(long, value_name = "FILE", default_value = DEFAULT_DB_FILE)]
    db: PathBuf,

    /// Menu document used to seed an empty cache
    #[arg(long, value_name = "URL", default_value = DEFAULT_MENU_URL)]
    menu_url: String,

    /// Base URL that menu image names are resolved against
    #[arg(long, value_name = "URL", default_value = DEFAULT_IMAGE_BASE_URL)]
    image_base_url: String,

    /// Only show dishes whose name contains this text
    #[arg(long)]
    search: Option<String>,

    /// Only show this category (repeatable)
    #[arg(long = "category", value_name = "NAME")]
    categories: Vec<String>,

    /// Pause after the last keystroke before searching
    #[arg(long, value_name = "MS", default_value_t = 500)]
    debounce_ms: u64,

    /// Give up on the menu download after this long
    #[arg(long, value_name = "SECS", default_value_t = 10)]
    fetch_timeout_secs: u64,

    /// Stored profile blob used for the avatar
    #[arg(long, value_name = "FILE")]
    profile: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn app_config(&self) -> AppConfig {
        AppConfig {
            db_path: self.db.clone(),
            menu_url: self.menu_url.clone(),
            image_base_url: self.image_base_url.clone(),
            fetch_timeout: Duration::from_secs(self.fetch_timeout_secs),
            debounce: Duration::from_millis(self.debounce_ms),
            profile_path: self.profile.clone(),
            ..AppConfig::default()
        }
    }

    fn has_filters(&self) -> bool {
        self.search.is_some() || !self.categories.is_empty()
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    logging::init_logging(args.verbose)?;
    let config = args.app_config();

    if let Some(path) = &config.profile_path {
        print_avatar(&load_profile(path).await);
    }

    let store = MenuDb::open(&config.db_path).await?;
    let loader = HttpMenuLoader::new(config.menu_url.as_str(), config.fetch_timeout)?;

    let sections = match initialize(&store, &loader).await {
        Ok(sections) => sections,
        Err(e) => {
            error!(kind = %e.kind(), error = %e, "could not load the menu");
            store.close().await;
            return Err(e.into());
        }
    };

    if !args.has_filters() {
        print_sections(&sections, &config.image_base_url);
        store.close().await;
        return Ok(());
    }

    let (handle, mut events) = QueryCoordinator::new(store.clone(), config.coordinator_config())
        .mark_ready()
        .spawn();

    for name in &args.categories {
        match config.category_index(name) {
            Some(index) => handle.category_toggled(index)?,
            None => warn!(category = %name, "unknown category, ignoring"),
        }
    }
    if let Some(text) = &args.search {
        handle.search_text_changed(text.as_str())?;
    }
    handle.settled().await?;

    let mut latest = None;
    while let Ok(event) = events.try_recv() {
        match event {
            MenuEvent::ResultsChanged(groups) => latest = Some(groups),
            MenuEvent::Error { kind, message } => {
                warn!(%kind, %message, "showing previous results");
            }
        }
    }

    print_sections(latest.as_deref().unwrap_or(&sections), &config.image_base_url);
    store.close().await;
    Ok(())
}

/// Falls back to the default profile when the blob cannot be read.
async fn load_profile(path: &Path) -> Profile {
    match ProfileStore::new(path).load().await {
        Ok(profile) => profile,
        Err(e) => {
            warn!(path = ?path, error = %e, "ignoring unreadable profile");
            Profile::default()
        }
    }
}

fn print_avatar(profile: &Profile) {
    match profile.avatar() {
        Avatar::Image(uri) => println!("Avatar: {}", uri),
        Avatar::Initials(initials) if initials.is_empty() => println!("Avatar: (empty)"),
        Avatar::Initials(initials) => println!("Avatar: [{}]", initials),
    }
    println!();
}

fn print_sections(sections: &[SectionGroup], image_base_url: &str) {
    if sections.is_empty() {
        println!("No dishes match.");
        return;
    }

    for section in sections {
        println!("{}", section.name);
        for item in &section.items {
            println!("  {}  ${}", item.name, item.price);
            if !item.description.is_empty() {
                println!("    {}", item.description);
            }
            println!("    {}", item.image_url(image_base_url));
        }
        println!();
    }
}
