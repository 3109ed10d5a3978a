mod add_list_item;
mod create_list;
mod delete_list;
mod remove_list_item;

pub use add_list_item::AddListItemUseCase;
pub use create_list::CreateListUseCase;
pub use delete_list::DeleteListUseCase;
pub use remove_list_item::RemoveListItemUseCase;
