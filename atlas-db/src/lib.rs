//! atlas-db: PostgreSQL repositories for atlas
//!
//! One repository per table, each a thin wrapper over a borrowed
//! [`sqlx::PgPool`]. Every operation is a single parameterized statement.
//!
//! # Conventions
//!
//! - Missing rows are `Ok(None)` / `Ok(false)` / an empty `Vec`, never an error
//! - Storage failures (connectivity, constraint violations) surface as [`DbError`]
//! - No cascades: children must be deleted before their parents

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repos;
pub mod repository;

pub use error::DbError;
pub use migrations::MIGRATOR;
pub use pool::{create_lazy_pool, create_pool, create_pool_with_options, ping, PoolSettings};
pub use repos::*;
pub use repository::{NaturalKey, Repository};
