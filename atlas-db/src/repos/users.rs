//! User repository
//!
//! - create: `UserCreatedAt` is stamped by the database, `UserModifiedAt` starts NULL
//! - update: overwrites every writable column and stamps `UserModifiedAt = NOW()`
//! - email is the natural key and is UNIQUE in the schema

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use crate::{DbError, NaturalKey, Repository};

const RESOURCE: &str = "user";

/// User record from database
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[sqlx(rename = "UserID")]
    pub id: i32,
    #[sqlx(rename = "GenderID")]
    pub gender_id: i32,
    #[sqlx(rename = "UserEmail")]
    pub email: String,
    #[sqlx(rename = "UserFullName")]
    pub full_name: String,
    /// Stored verbatim; hashing happens before this layer.
    #[sqlx(rename = "UserPassword")]
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[sqlx(rename = "UserBirthdate")]
    pub birthdate: NaiveDate,
    #[sqlx(rename = "UserIsActive")]
    pub is_active: bool,
    #[sqlx(rename = "UserCreatedAt")]
    pub created_at: DateTime<Utc>,
    #[sqlx(rename = "UserModifiedAt")]
    pub modified_at: Option<DateTime<Utc>>,
}

/// Writable user columns
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFields {
    pub gender_id: i32,
    pub email: String,
    pub full_name: String,
    pub password_hash: String,
    pub birthdate: NaiveDate,
    #[serde(default)]
    pub is_active: bool,
}

impl UserFields {
    /// New inactive user.
    pub fn new(
        gender_id: i32,
        email: impl Into<String>,
        full_name: impl Into<String>,
        password_hash: impl Into<String>,
        birthdate: NaiveDate,
    ) -> Self {
        Self {
            gender_id,
            email: email.into(),
            full_name: full_name.into(),
            password_hash: password_hash.into(),
            birthdate,
            is_active: false,
        }
    }

    pub fn active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }
}

/// User repository
pub struct UserRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Look up a user by login email.
    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>, DbError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT "UserID", "GenderID", "UserEmail", "UserFullName", "UserPassword",
                   "UserBirthdate", "UserIsActive", "UserCreatedAt", "UserModifiedAt"
            FROM "User"
            WHERE "UserEmail" = $1
            "#,
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }
}

#[async_trait]
impl<'a> Repository for UserRepo<'a> {
    type Record = User;
    type Fields = UserFields;

    async fn get_by_id(&self, id: i32) -> Result<Option<User>, DbError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT "UserID", "GenderID", "UserEmail", "UserFullName", "UserPassword",
                   "UserBirthdate", "UserIsActive", "UserCreatedAt", "UserModifiedAt"
            FROM "User"
            WHERE "UserID" = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    async fn get_all(&self) -> Result<Vec<User>, DbError> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT "UserID", "GenderID", "UserEmail", "UserFullName", "UserPassword",
                   "UserBirthdate", "UserIsActive", "UserCreatedAt", "UserModifiedAt"
            FROM "User"
            ORDER BY "UserID"
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(users)
    }

    async fn create(&self, fields: &UserFields) -> Result<User, DbError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO "User" (
                "GenderID", "UserEmail", "UserFullName", "UserPassword",
                "UserBirthdate", "UserIsActive", "UserCreatedAt"
            )
            VALUES ($1, $2, $3, $4, $5, $6, NOW())
            RETURNING "UserID", "GenderID", "UserEmail", "UserFullName", "UserPassword",
                      "UserBirthdate", "UserIsActive", "UserCreatedAt", "UserModifiedAt"
            "#,
        )
        .bind(fields.gender_id)
        .bind(&fields.email)
        .bind(&fields.full_name)
        .bind(&fields.password_hash)
        .bind(fields.birthdate)
        .bind(fields.is_active)
        .fetch_one(self.pool)
        .await
        .map_err(DbError::on(RESOURCE))
    }

    async fn update(&self, id: i32, fields: &UserFields) -> Result<Option<User>, DbError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE "User"
            SET "GenderID" = $1,
                "UserEmail" = $2,
                "UserFullName" = $3,
                "UserPassword" = $4,
                "UserBirthdate" = $5,
                "UserIsActive" = $6,
                "UserModifiedAt" = NOW()
            WHERE "UserID" = $7
            RETURNING "UserID", "GenderID", "UserEmail", "UserFullName", "UserPassword",
                      "UserBirthdate", "UserIsActive", "UserCreatedAt", "UserModifiedAt"
            "#,
        )
        .bind(fields.gender_id)
        .bind(&fields.email)
        .bind(&fields.full_name)
        .bind(&fields.password_hash)
        .bind(fields.birthdate)
        .bind(fields.is_active)
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(DbError::on(RESOURCE))?;

        if user.is_none() {
            tracing::debug!(user_id = id, "update matched no user");
        }
        Ok(user)
    }

    async fn delete_by_id(&self, id: i32) -> Result<bool, DbError> {
        let result = sqlx::query(r#"DELETE FROM "User" WHERE "UserID" = $1"#)
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(DbError::on(RESOURCE))?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl<'a> NaturalKey for UserRepo<'a> {
    type Key = str;

    async fn get_by_natural_key(&self, email: &str) -> Result<Option<User>, DbError> {
        self.get_by_email(email).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_is_never_serialized() {
        let user = User {
            id: 1,
            gender_id: 2,
            email: "ana@example.com".into(),
            full_name: "Ana Silva".into(),
            password_hash: "argon2id$secret".into(),
            birthdate: NaiveDate::from_ymd_opt(1990, 4, 12).unwrap(),
            is_active: true,
            created_at: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            modified_at: None,
        };

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["email"], "ana@example.com");
        assert_eq!(json["birthdate"], "1990-04-12");
        assert!(json["modifiedAt"].is_null());
    }

    #[test]
    fn fields_default_to_inactive() {
        let fields: UserFields = serde_json::from_value(serde_json::json!({
            "genderId": 1,
            "email": "ana@example.com",
            "fullName": "Ana Silva",
            "passwordHash": "x",
            "birthdate": "1990-04-12"
        }))
        .unwrap();
        assert!(!fields.is_active);
    }

    #[test]
    fn constructor_matches_deserialized_fields() {
        let birthdate = NaiveDate::from_ymd_opt(1990, 4, 12).unwrap();
        let fields = UserFields::new(1, "ana@example.com", "Ana Silva", "x", birthdate);
        assert!(!fields.is_active);
        assert!(fields.clone().active(true).is_active);

        let parsed: UserFields = serde_json::from_value(serde_json::json!({
            "genderId": 1,
            "email": "ana@example.com",
            "fullName": "Ana Silva",
            "passwordHash": "x",
            "birthdate": "1990-04-12"
        }))
        .unwrap();
        assert_eq!(parsed, fields);
    }
}
