//! Login activity repository
//!
//! Append-mostly audit trail of user logins. IP, geolocation and time are
//! all optional because upstream sources do not always provide them.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use crate::{DbError, Repository};

const RESOURCE: &str = "login_activity";

/// Login activity record from database
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginActivity {
    #[sqlx(rename = "LoginActivityID")]
    pub id: i32,
    #[sqlx(rename = "UserID")]
    pub user_id: i32,
    #[sqlx(rename = "LoginActivityIP")]
    pub ip: Option<String>,
    #[sqlx(rename = "LoginActivityGeoLoc")]
    pub geo_location: Option<String>,
    #[sqlx(rename = "LoginActivityDate")]
    pub occurred_at: Option<DateTime<Utc>>,
}

/// Writable login activity columns
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginActivityFields {
    pub user_id: i32,
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub geo_location: Option<String>,
    #[serde(default)]
    pub occurred_at: Option<DateTime<Utc>>,
}

/// Login activity repository
pub struct LoginActivityRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> LoginActivityRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Every login recorded for one user, oldest first.
    ///
    /// Empty for a user with no logins and for an unknown user alike.
    pub async fn list_for_user(&self, user_id: i32) -> Result<Vec<LoginActivity>, DbError> {
        let activities = sqlx::query_as::<_, LoginActivity>(
            r#"
            SELECT "LoginActivityID", "UserID", "LoginActivityIP",
                   "LoginActivityGeoLoc", "LoginActivityDate"
            FROM "LoginActivity"
            WHERE "UserID" = $1
            ORDER BY "LoginActivityID"
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(activities)
    }
}

#[async_trait]
impl<'a> Repository for LoginActivityRepo<'a> {
    type Record = LoginActivity;
    type Fields = LoginActivityFields;

    async fn get_by_id(&self, id: i32) -> Result<Option<LoginActivity>, DbError> {
        let activity = sqlx::query_as::<_, LoginActivity>(
            r#"
            SELECT "LoginActivityID", "UserID", "LoginActivityIP",
                   "LoginActivityGeoLoc", "LoginActivityDate"
            FROM "LoginActivity"
            WHERE "LoginActivityID" = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(activity)
    }

    async fn get_all(&self) -> Result<Vec<LoginActivity>, DbError> {
        let activities = sqlx::query_as::<_, LoginActivity>(
            r#"
            SELECT "LoginActivityID", "UserID", "LoginActivityIP",
                   "LoginActivityGeoLoc", "LoginActivityDate"
            FROM "LoginActivity"
            ORDER BY "LoginActivityID"
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(activities)
    }

    async fn create(&self, fields: &LoginActivityFields) -> Result<LoginActivity, DbError> {
        sqlx::query_as::<_, LoginActivity>(
            r#"
            INSERT INTO "LoginActivity" (
                "UserID", "LoginActivityIP", "LoginActivityGeoLoc", "LoginActivityDate"
            )
            VALUES ($1, $2, $3, $4)
            RETURNING "LoginActivityID", "UserID", "LoginActivityIP",
                      "LoginActivityGeoLoc", "LoginActivityDate"
            "#,
        )
        .bind(fields.user_id)
        .bind(fields.ip.as_deref())
        .bind(fields.geo_location.as_deref())
        .bind(fields.occurred_at)
        .fetch_one(self.pool)
        .await
        .map_err(DbError::on(RESOURCE))
    }

    async fn update(
        &self,
        id: i32,
        fields: &LoginActivityFields,
    ) -> Result<Option<LoginActivity>, DbError> {
        let activity = sqlx::query_as::<_, LoginActivity>(
            r#"
            UPDATE "LoginActivity"
            SET "UserID" = $1,
                "LoginActivityIP" = $2,
                "LoginActivityGeoLoc" = $3,
                "LoginActivityDate" = $4
            WHERE "LoginActivityID" = $5
            RETURNING "LoginActivityID", "UserID", "LoginActivityIP",
                      "LoginActivityGeoLoc", "LoginActivityDate"
            "#,
        )
        .bind(fields.user_id)
        .bind(fields.ip.as_deref())
        .bind(fields.geo_location.as_deref())
        .bind(fields.occurred_at)
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(DbError::on(RESOURCE))?;

        if activity.is_none() {
            tracing::debug!(login_activity_id = id, "update matched no login activity");
        }
        Ok(activity)
    }

    async fn delete_by_id(&self, id: i32) -> Result<bool, DbError> {
        let result =
            sqlx::query(r#"DELETE FROM "LoginActivity" WHERE "LoginActivityID" = $1"#)
                .bind(id)
                .execute(self.pool)
                .await
                .map_err(DbError::on(RESOURCE))?;

        Ok(result.rows_affected() > 0)
    }
}
