pub mod config;
pub mod core;
pub mod error;
pub mod logging;

pub use crate::core::bootstrap::initialize;
pub use crate::core::coordinator::{
    CoordinatorConfig, CoordinatorHandle, MenuEvent, QueryCoordinator, QueryPhase, QueryState,
};
pub use crate::core::db::{MenuDb, MenuItem, MenuRepository};
pub use crate::core::grouping::{SectionGroup, SectionItem, group_by_category};
pub use crate::core::remote::{HttpMenuLoader, MenuSource};
pub use error::{ErrorKind, MenuError};
