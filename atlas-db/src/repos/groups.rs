//! Group repository
//!
//! Groups collect rules through the `RuleGroup` join table (see
//! [`super::rule_groups`]). A group with attached rules cannot be deleted.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use crate::{DbError, NaturalKey, Repository};

const RESOURCE: &str = "group";

/// Group record from database
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    #[sqlx(rename = "GroupID")]
    pub id: i32,
    #[sqlx(rename = "GroupName")]
    pub name: String,
    #[sqlx(rename = "GroupDescription")]
    pub description: String,
    #[sqlx(rename = "GroupCreatedAt")]
    pub created_at: DateTime<Utc>,
    #[sqlx(rename = "GroupModifiedAt")]
    pub modified_at: Option<DateTime<Utc>>,
}

/// Writable group columns
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupFields {
    pub name: String,
    pub description: String,
}

impl GroupFields {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Group repository
pub struct GroupRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> GroupRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// First group with exactly this name.
    pub async fn get_by_name(&self, name: &str) -> Result<Option<Group>, DbError> {
        let group = sqlx::query_as::<_, Group>(
            r#"
            SELECT "GroupID", "GroupName", "GroupDescription", "GroupCreatedAt", "GroupModifiedAt"
            FROM "Group"
            WHERE "GroupName" = $1
            ORDER BY "GroupID"
            LIMIT 1
            "#,
        )
        .bind(name)
        .fetch_optional(self.pool)
        .await?;

        Ok(group)
    }
}

#[async_trait]
impl<'a> Repository for GroupRepo<'a> {
    type Record = Group;
    type Fields = GroupFields;

    async fn get_by_id(&self, id: i32) -> Result<Option<Group>, DbError> {
        let group = sqlx::query_as::<_, Group>(
            r#"
            SELECT "GroupID", "GroupName", "GroupDescription", "GroupCreatedAt", "GroupModifiedAt"
            FROM "Group"
            WHERE "GroupID" = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(group)
    }

    async fn get_all(&self) -> Result<Vec<Group>, DbError> {
        let groups = sqlx::query_as::<_, Group>(
            r#"
            SELECT "GroupID", "GroupName", "GroupDescription", "GroupCreatedAt", "GroupModifiedAt"
            FROM "Group"
            ORDER BY "GroupID"
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(groups)
    }

    async fn create(&self, fields: &GroupFields) -> Result<Group, DbError> {
        sqlx::query_as::<_, Group>(
            r#"
            INSERT INTO "Group" ("GroupName", "GroupDescription", "GroupCreatedAt")
            VALUES ($1, $2, NOW())
            RETURNING "GroupID", "GroupName", "GroupDescription", "GroupCreatedAt", "GroupModifiedAt"
            "#,
        )
        .bind(&fields.name)
        .bind(&fields.description)
        .fetch_one(self.pool)
        .await
        .map_err(DbError::on(RESOURCE))
    }

    async fn update(&self, id: i32, fields: &GroupFields) -> Result<Option<Group>, DbError> {
        let group = sqlx::query_as::<_, Group>(
            r#"
            UPDATE "Group"
            SET "GroupName" = $1, "GroupDescription" = $2, "GroupModifiedAt" = NOW()
            WHERE "GroupID" = $3
            RETURNING "GroupID", "GroupName", "GroupDescription", "GroupCreatedAt", "GroupModifiedAt"
            "#,
        )
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(DbError::on(RESOURCE))?;

        if group.is_none() {
            tracing::debug!(group_id = id, "update matched no group");
        }
        Ok(group)
    }

    async fn delete_by_id(&self, id: i32) -> Result<bool, DbError> {
        let result = sqlx::query(r#"DELETE FROM "Group" WHERE "GroupID" = $1"#)
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(DbError::on(RESOURCE))?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl<'a> NaturalKey for GroupRepo<'a> {
    type Key = str;

    async fn get_by_natural_key(&self, name: &str) -> Result<Option<Group>, DbError> {
        self.get_by_name(name).await
    }
}
