//! Repository contract shared by every single-table repository

use async_trait::async_trait;

use crate::DbError;

/// CRUD over one table keyed by a surrogate `i32` id.
///
/// `Fields` carries every caller-supplied column, i.e. everything except
/// the generated id and any creation/modification timestamps. The same
/// struct is used for `create` and `update`.
#[async_trait]
pub trait Repository: Send + Sync {
    type Record: Send;
    type Fields: Send + Sync;

    /// Exact-match lookup by primary key. `None` when no row matches.
    async fn get_by_id(&self, id: i32) -> Result<Option<Self::Record>, DbError>;

    /// Every row, ordered by id. Empty when the table is empty.
    async fn get_all(&self) -> Result<Vec<Self::Record>, DbError>;

    /// Insert one row and return it as stored.
    async fn create(&self, fields: &Self::Fields) -> Result<Self::Record, DbError>;

    /// Overwrite the row matching `id`. `None` when no row matched.
    async fn update(&self, id: i32, fields: &Self::Fields)
        -> Result<Option<Self::Record>, DbError>;

    /// `true` iff a row was actually removed.
    async fn delete_by_id(&self, id: i32) -> Result<bool, DbError>;
}

/// Lookup by a human-meaningful alternate key (name, code, email).
///
/// Keys are not required to be unique; the lowest id wins.
#[async_trait]
pub trait NaturalKey: Repository {
    type Key: ?Sized + Sync;

    async fn get_by_natural_key(&self, key: &Self::Key) -> Result<Option<Self::Record>, DbError>;
}
