//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::sql_types::BigInt;
use uuid::Uuid;

use super::schema::{tasks, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub theme: String,
    pub default_view: String,
}

/// Insertable struct for registering a user.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub password_hash: &'a str,
    pub theme: &'a str,
    pub default_view: &'a str,
}

/// Changeset for display preference updates.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserSettingsUpdate<'a> {
    pub theme: &'a str,
    pub default_view: &'a str,
    pub updated_at: DateTime<Utc>,
}

/// Row struct for reading from the tasks table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TaskRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub text: String,
    pub description: String,
    pub status: String,
    pub priority: String,
    pub due_date: Option<DateTime<Utc>>,
    pub categories: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for new tasks; `seq` is assigned by the database.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub(crate) struct NewTaskRow<'a> {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub text: &'a str,
    pub description: &'a str,
    pub status: &'a str,
    pub priority: &'a str,
    pub due_date: Option<DateTime<Utc>>,
    pub categories: &'a [String],
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial task update. `None` fields are left untouched; a
/// `due_date` of `Some(None)` writes NULL.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = tasks)]
pub(crate) struct TaskUpdate<'a> {
    pub text: Option<&'a str>,
    pub description: Option<&'a str>,
    pub status: Option<&'a str>,
    pub priority: Option<&'a str>,
    pub due_date: Option<Option<DateTime<Utc>>>,
    pub categories: Option<&'a [String]>,
}

/// Aggregate counters returned by the statistics query.
#[derive(Debug, Clone, Copy, QueryableByName)]
pub(crate) struct TaskStatsRow {
    #[diesel(sql_type = BigInt)]
    pub total: i64,
    #[diesel(sql_type = BigInt)]
    pub completed: i64,
    #[diesel(sql_type = BigInt)]
    pub pending: i64,
    #[diesel(sql_type = BigInt)]
    pub high_priority: i64,
    #[diesel(sql_type = BigInt)]
    pub overdue: i64,
}
