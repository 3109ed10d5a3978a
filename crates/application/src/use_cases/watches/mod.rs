mod import_watch_history;
mod record_watch;

pub use import_watch_history::ImportWatchHistoryUseCase;
pub use record_watch::RecordWatchUseCase;
