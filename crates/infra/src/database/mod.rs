//! Database implementations

pub mod account_repository;
pub mod manager;
pub mod meeting_repository;
pub mod sync_state_repository;

pub use account_repository::SqliteAccountRepository;
pub use manager::{DbManager, SqliteConnection, SqlitePool};
pub use meeting_repository::SqliteMeetingRepository;
pub use sync_state_repository::SqliteSyncStateRepository;
