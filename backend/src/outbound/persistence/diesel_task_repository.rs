//! PostgreSQL-backed `TaskRepository` implementation using Diesel ORM.
//!
//! Filters are pushed down to SQL: exact matches for status and priority,
//! array containment for the category and `ILIKE` with escaped wildcards for
//! search. Rows come back in insertion order (`seq`) and the domain
//! [`SortKey`] then orders them, so PostgreSQL and the in-memory store sort
//! identically.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::sql_types::{Array, Text, Timestamptz};
use diesel_async::RunQueryDsl;

use crate::domain::ports::{TaskRepository, TaskRepositoryError};
use crate::domain::{
    NewTask, SortKey, Task, TaskId, TaskPatch, TaskPredicate, TaskStats, TaskText,
    TaskValidationError, UserId,
};

use super::diesel_error_mapping::{DieselFailure, classify_diesel_error};
use super::models::{NewTaskRow, TaskRow, TaskStatsRow, TaskUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::tasks;

diesel::define_sql_function!(fn array_to_string(array: Array<Text>, delimiter: Text) -> Text);
diesel::define_sql_function!(fn greatest(a: Timestamptz, b: Timestamptz) -> Timestamptz);

/// Joins category labels for substring search. A control character keeps
/// matches from spanning two labels.
const CATEGORY_DELIMITER: &str = "\u{1f}";

const STATS_SQL: &str = "\
SELECT COUNT(*) AS total, \
       COUNT(*) FILTER (WHERE status = 'completed') AS completed, \
       COUNT(*) FILTER (WHERE status = 'pending') AS pending, \
       COUNT(*) FILTER (WHERE priority = 'high') AS high_priority, \
       COUNT(*) FILTER (WHERE status = 'pending' AND due_date < $2) AS overdue \
FROM tasks WHERE owner_id = $1";

/// Diesel-backed implementation of the `TaskRepository` port.
#[derive(Clone)]
pub struct DieselTaskRepository {
    pool: DbPool,
}

impl DieselTaskRepository {
    /// Create a repository backed by `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> TaskRepositoryError {
    TaskRepositoryError::connection(error.into_message())
}

fn map_diesel_error(error: diesel::result::Error) -> TaskRepositoryError {
    match classify_diesel_error(error) {
        DieselFailure::Connection(message) => TaskRepositoryError::connection(message),
        DieselFailure::UniqueViolation { .. } => {
            TaskRepositoryError::query("task identifier collision")
        }
        DieselFailure::Query(message) => TaskRepositoryError::query(message),
    }
}

/// Escape `LIKE` metacharacters so user input matches literally.
pub(crate) fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn row_to_task(row: TaskRow) -> Result<Task, TaskRepositoryError> {
    let id = row.id;
    let corrupt = |err: TaskValidationError| {
        TaskRepositoryError::query(format!("stored task {id} is invalid: {err}"))
    };
    Ok(Task {
        id: TaskId::from_uuid(row.id),
        owner_id: UserId::from_uuid(row.owner_id),
        text: TaskText::new(row.text).map_err(corrupt)?,
        description: row.description,
        status: row.status.parse().map_err(corrupt)?,
        priority: row.priority.parse().map_err(corrupt)?,
        due_date: row.due_date,
        categories: row.categories,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn count(value: i64) -> u64 {
    u64::try_from(value).unwrap_or_default()
}

#[async_trait]
impl TaskRepository for DieselTaskRepository {
    async fn insert(
        &self,
        owner: &UserId,
        task: &NewTask,
        now: DateTime<Utc>,
    ) -> Result<Task, TaskRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewTaskRow {
            id: *TaskId::random().as_uuid(),
            owner_id: *owner.as_uuid(),
            text: task.text.as_ref(),
            description: task.description.as_str(),
            status: task.status.as_str(),
            priority: task.priority.as_str(),
            due_date: task.due_date,
            categories: &task.categories,
            created_at: now,
            updated_at: now,
        };

        let inserted = diesel::insert_into(tasks::table)
            .values(&row)
            .returning(TaskRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row_to_task(inserted)
    }

    async fn find_many(
        &self,
        predicate: &TaskPredicate,
        sort: SortKey,
    ) -> Result<Vec<Task>, TaskRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let filter = &predicate.filter;

        let mut query = tasks::table
            .select(TaskRow::as_select())
            .filter(tasks::owner_id.eq(*predicate.owner.as_uuid()))
            .into_boxed();
        if let Some(status) = filter.status {
            query = query.filter(tasks::status.eq(status.as_str()));
        }
        if let Some(priority) = filter.priority {
            query = query.filter(tasks::priority.eq(priority.as_str()));
        }
        if let Some(category) = &filter.category {
            query = query.filter(tasks::categories.contains(vec![category.clone()]));
        }
        if let Some(search) = &filter.search {
            let pattern = format!("%{}%", escape_like(search));
            query = query.filter(
                tasks::text
                    .ilike(pattern.clone())
                    .or(tasks::description.ilike(pattern.clone()))
                    .or(array_to_string(tasks::categories, CATEGORY_DELIMITER).ilike(pattern)),
            );
        }

        let rows: Vec<TaskRow> = query
            .order(tasks::seq.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let mut found = rows
            .into_iter()
            .map(row_to_task)
            .collect::<Result<Vec<_>, _>>()?;
        sort.arrange(&mut found);
        Ok(found)
    }

    async fn update_one(
        &self,
        id: &TaskId,
        owner: &UserId,
        patch: &TaskPatch,
        now: DateTime<Utc>,
    ) -> Result<Option<Task>, TaskRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = TaskUpdate {
            text: patch.text.as_ref().map(AsRef::as_ref),
            description: patch.description.as_deref(),
            status: patch.status.map(|status| status.as_str()),
            priority: patch.priority.map(|priority| priority.as_str()),
            due_date: patch.due_date,
            categories: patch.categories.as_deref(),
        };
        // Matches `TaskPatch::apply` so a clock stepping backwards never
        // trips the `tasks_updated_after_created` check.
        let touched = tasks::updated_at.eq(greatest(tasks::created_at, now));

        let updated: Option<TaskRow> = diesel::update(
            tasks::table
                .filter(tasks::id.eq(id.as_uuid()))
                .filter(tasks::owner_id.eq(owner.as_uuid())),
        )
        .set((&changes, touched))
        .returning(TaskRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;
        updated.map(row_to_task).transpose()
    }

    async fn delete_one(&self, id: &TaskId, owner: &UserId) -> Result<bool, TaskRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(
            tasks::table
                .filter(tasks::id.eq(id.as_uuid()))
                .filter(tasks::owner_id.eq(owner.as_uuid())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn stats(
        &self,
        owner: &UserId,
        now: DateTime<Utc>,
    ) -> Result<TaskStats, TaskRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: TaskStatsRow = diesel::sql_query(STATS_SQL)
            .bind::<diesel::sql_types::Uuid, _>(*owner.as_uuid())
            .bind::<Timestamptz, _>(now)
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(TaskStats {
            total: count(row.total),
            completed: count(row.completed),
            pending: count(row.pending),
            high_priority: count(row.high_priority),
            overdue: count(row.overdue),
        })
    }
}
