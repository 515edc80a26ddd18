//! Database error type shared by every repository

use sqlx::error::ErrorKind;

/// Storage-layer failure.
///
/// "Not found" is never represented here; repositories return `None` or
/// `false` for that.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("conflict: {resource} violates {constraint}")]
    Conflict {
        resource: &'static str,
        constraint: String,
    },

    #[error("invalid reference: {resource} violates {constraint}")]
    InvalidReference {
        resource: &'static str,
        constraint: String,
    },

    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

impl DbError {
    /// Map a sqlx error raised while writing `resource`, promoting unique
    /// and foreign-key violations to their own variants.
    pub fn classify(resource: &'static str, err: sqlx::Error) -> Self {
        let violation = match &err {
            sqlx::Error::Database(db) => Some((
                db.kind(),
                db.constraint().unwrap_or("unknown constraint").to_owned(),
            )),
            _ => None,
        };

        match violation {
            Some((ErrorKind::UniqueViolation, constraint)) => Self::Conflict {
                resource,
                constraint,
            },
            Some((ErrorKind::ForeignKeyViolation, constraint)) => Self::InvalidReference {
                resource,
                constraint,
            },
            _ => Self::Sqlx(err),
        }
    }

    /// Closure form of [`DbError::classify`] for `map_err`.
    pub(crate) fn on(resource: &'static str) -> impl FnOnce(sqlx::Error) -> Self {
        move |err| Self::classify(resource, err)
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    pub fn is_invalid_reference(&self) -> bool {
        matches!(self, Self::InvalidReference { .. })
    }
}
