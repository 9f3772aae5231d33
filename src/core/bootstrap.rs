use tracing::info;

use crate::{
    core::{
        db::MenuRepository,
        grouping::{SectionGroup, group_by_category},
        remote::MenuSource,
    },
    error::MenuError,
};

/// Cold start: make sure the schema exists, seed an empty cache from the
/// remote source, and group whatever the cache holds.
///
/// The remote source is consulted only when the cache is empty. A failure at
/// any step is returned as-is; the caller decides how to surface it.
pub async fn initialize<S, L>(store: &S, loader: &L) -> Result<Vec<SectionGroup>, MenuError>
where
    S: MenuRepository,
    L: MenuSource,
{
    store.ensure_schema().await?;

    let mut items = store.get_all().await?;
    if items.is_empty() {
        info!("menu cache is empty, seeding from remote");
        items = loader.fetch_menu().await?;
        store.bulk_insert(&items).await?;
        info!(count = items.len(), "menu cache seeded");
    } else {
        info!(count = items.len(), "loaded menu from cache");
    }

    Ok(group_by_category(&items))
}
