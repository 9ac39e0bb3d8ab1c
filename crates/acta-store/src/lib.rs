//! # acta-store
//!
//! Store interfaces consumed by the authorization core, plus the two
//! shipped backends:
//!
//! - `memory` — tokio `RwLock` fakes for tests and single-node development
//! - `postgres` — sqlx repositories backed by PostgreSQL
//!
//! The core never holds a concrete backend; it is constructed with
//! `Arc<dyn UserStore>` / `Arc<dyn PermissionStore>` so deployments and
//! tests choose the implementation.

pub mod memory;
pub mod postgres;
pub mod traits;

pub use memory::{MemoryPermissionStore, MemoryUserStore};
pub use postgres::{PgPermissionStore, PgUserStore};
pub use traits::{PermissionStore, UserStore};
