mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from menu_browser for tests
pub use menu_browser::{
    CoordinatorConfig, ErrorKind, MenuDb, MenuError, MenuEvent, MenuItem, MenuRepository,
    MenuSource, QueryCoordinator, QueryPhase, SectionGroup,
};
