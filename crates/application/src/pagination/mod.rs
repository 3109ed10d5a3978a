// Incremental offset-based loading guarded by a fetch token

pub mod controller;
pub mod list_items;
pub mod loader;

pub use controller::{LoadOutcome, PageState, PaginationController};
pub use list_items::ListItemsPageLoader;
pub use loader::PageLoader;
