//! PostgreSQL store backends (sqlx).

pub mod connection;
pub mod migration;
pub mod permissions;
pub mod users;

pub use connection::DatabasePool;
pub use permissions::PgPermissionStore;
pub use users::PgUserStore;
