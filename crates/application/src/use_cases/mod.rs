pub mod lists;
pub mod watches;

pub use lists::{AddListItemUseCase, CreateListUseCase, DeleteListUseCase, RemoveListItemUseCase};
pub use watches::{ImportWatchHistoryUseCase, RecordWatchUseCase};
