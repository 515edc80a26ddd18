//! Rule/group membership repository
//!
//! Manages the `RuleGroup` join table. A membership is just the
//! `(RuleID, GroupID)` pair; it has no identity of its own.
//!
//! - attach: plain INSERT, a duplicate pair is rejected by the primary key
//! - list: JOINs against Rule and Group (no N+1)

use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::DbError;

const RESOURCE: &str = "rule_group";

/// Membership row from database
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleGroup {
    #[sqlx(rename = "RuleID")]
    pub rule_id: i32,
    #[sqlx(rename = "GroupID")]
    pub group_id: i32,
}

/// Membership joined with its rule and group for display
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleGroupDetail {
    #[sqlx(rename = "RuleID")]
    pub rule_id: i32,
    #[sqlx(rename = "GroupID")]
    pub group_id: i32,
    #[sqlx(rename = "GroupName")]
    pub group_name: String,
    #[sqlx(rename = "GroupDescription")]
    pub group_description: String,
    #[sqlx(rename = "RuleName")]
    pub rule_name: String,
    #[sqlx(rename = "RuleDescription")]
    pub rule_description: String,
    #[sqlx(rename = "RuleCode")]
    pub rule_code: String,
}

/// Rule/group membership repository
pub struct RuleGroupRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> RuleGroupRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Attach a rule to a group.
    ///
    /// Attaching an already attached pair fails with [`DbError::Conflict`];
    /// an unknown rule or group fails with [`DbError::InvalidReference`].
    pub async fn attach(&self, rule_id: i32, group_id: i32) -> Result<RuleGroup, DbError> {
        sqlx::query_as::<_, RuleGroup>(
            r#"
            INSERT INTO "RuleGroup" ("RuleID", "GroupID")
            VALUES ($1, $2)
            RETURNING "RuleID", "GroupID"
            "#,
        )
        .bind(rule_id)
        .bind(group_id)
        .fetch_one(self.pool)
        .await
        .map_err(DbError::on(RESOURCE))
    }

    /// Detach a rule from a group. `true` iff the pair existed.
    pub async fn detach(&self, rule_id: i32, group_id: i32) -> Result<bool, DbError> {
        let result =
            sqlx::query(r#"DELETE FROM "RuleGroup" WHERE "RuleID" = $1 AND "GroupID" = $2"#)
                .bind(rule_id)
                .bind(group_id)
                .execute(self.pool)
                .await?;

        if result.rows_affected() == 0 {
            tracing::debug!(rule_id, group_id, "detach matched no membership");
        }
        Ok(result.rows_affected() > 0)
    }

    pub async fn membership_exists(&self, rule_id: i32, group_id: i32) -> Result<bool, DbError> {
        let exists: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM "RuleGroup" WHERE "RuleID" = $1 AND "GroupID" = $2
            )
            "#,
        )
        .bind(rule_id)
        .bind(group_id)
        .fetch_one(self.pool)
        .await?;

        Ok(exists.0)
    }

    /// Every rule attached to `group_id`, joined with rule and group columns.
    ///
    /// An unknown group and a group without rules both yield an empty list.
    pub async fn list_rules_for_group(
        &self,
        group_id: i32,
    ) -> Result<Vec<RuleGroupDetail>, DbError> {
        let rows = sqlx::query_as::<_, RuleGroupDetail>(
            r#"
            SELECT rg."RuleID", rg."GroupID",
                   gp."GroupName", gp."GroupDescription",
                   rl."RuleName", rl."RuleDescription", rl."RuleCode"
            FROM "RuleGroup" AS rg
            JOIN "Group" AS gp ON gp."GroupID" = rg."GroupID"
            JOIN "Rule" AS rl ON rl."RuleID" = rg."RuleID"
            WHERE rg."GroupID" = $1
            ORDER BY rg."RuleID"
            "#,
        )
        .bind(group_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Every membership, joined with rule and group columns.
    pub async fn list_all_memberships(&self) -> Result<Vec<RuleGroupDetail>, DbError> {
        let rows = sqlx::query_as::<_, RuleGroupDetail>(
            r#"
            SELECT rg."RuleID", rg."GroupID",
                   gp."GroupName", gp."GroupDescription",
                   rl."RuleName", rl."RuleDescription", rl."RuleCode"
            FROM "RuleGroup" AS rg
            JOIN "Group" AS gp ON gp."GroupID" = rg."GroupID"
            JOIN "Rule" AS rl ON rl."RuleID" = rg."RuleID"
            ORDER BY rg."GroupID", rg."RuleID"
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }
}
