//! In-memory task store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::domain::ports::{TaskRepository, TaskRepositoryError};
use crate::domain::{
    NewTask, SortKey, Task, TaskId, TaskPatch, TaskPredicate, TaskStats, UserId,
};

/// Task store keeping records in insertion order.
#[derive(Debug, Default)]
pub struct InMemoryTaskRepository {
    tasks: RwLock<Vec<Task>>,
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn insert(
        &self,
        owner: &UserId,
        task: &NewTask,
        now: DateTime<Utc>,
    ) -> Result<Task, TaskRepositoryError> {
        let created = Task::from_new(TaskId::random(), *owner, task, now);
        self.tasks.write().await.push(created.clone());
        Ok(created)
    }

    async fn find_many(
        &self,
        predicate: &TaskPredicate,
        sort: SortKey,
    ) -> Result<Vec<Task>, TaskRepositoryError> {
        let mut matching: Vec<Task> = self
            .tasks
            .read()
            .await
            .iter()
            .filter(|task| predicate.matches(task))
            .cloned()
            .collect();
        sort.arrange(&mut matching);
        Ok(matching)
    }

    async fn update_one(
        &self,
        id: &TaskId,
        owner: &UserId,
        patch: &TaskPatch,
        now: DateTime<Utc>,
    ) -> Result<Option<Task>, TaskRepositoryError> {
        let mut tasks = self.tasks.write().await;
        Ok(tasks
            .iter_mut()
            .find(|task| task.id == *id && task.owner_id == *owner)
            .map(|task| {
                patch.apply(task, now);
                task.clone()
            }))
    }

    async fn delete_one(&self, id: &TaskId, owner: &UserId) -> Result<bool, TaskRepositoryError> {
        let mut tasks = self.tasks.write().await;
        let before = tasks.len();
        tasks.retain(|task| !(task.id == *id && task.owner_id == *owner));
        Ok(tasks.len() < before)
    }

    async fn stats(
        &self,
        owner: &UserId,
        now: DateTime<Utc>,
    ) -> Result<TaskStats, TaskRepositoryError> {
        let tasks = self.tasks.read().await;
        Ok(TaskStats::tally(
            tasks.iter().filter(|task| task.owner_id == *owner),
            now,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{TaskFilter, TaskPriority, TaskStatus, TaskText};
    use chrono::Duration;
    use rstest::{fixture, rstest};

    #[fixture]
    fn repo() -> InMemoryTaskRepository {
        InMemoryTaskRepository::default()
    }

    fn titled(text: &str) -> NewTask {
        NewTask::titled(TaskText::new(text).expect("valid text"))
    }

    #[rstest]
    #[tokio::test]
    async fn find_many_without_filters_returns_exactly_owned_tasks(repo: InMemoryTaskRepository) {
        let owner = UserId::random();
        let other = UserId::random();
        let now = Utc::now();
        let mine = repo.insert(&owner, &titled("mine"), now).await.expect("insert");
        repo.insert(&other, &titled("theirs"), now)
            .await
            .expect("insert");

        let found = repo
            .find_many(&TaskPredicate::owned_by(owner), SortKey::Created)
            .await
            .expect("find");
        assert_eq!(found, vec![mine]);
    }

    #[rstest]
    #[tokio::test]
    async fn created_task_is_listed_with_identical_fields(repo: InMemoryTaskRepository) {
        let owner = UserId::random();
        let mut new = titled("Buy milk");
        new.description = "semi-skimmed".to_owned();
        new.priority = TaskPriority::High;
        new.categories = vec!["shopping".to_owned()];
        let created = repo.insert(&owner, &new, Utc::now()).await.expect("insert");

        let found = repo
            .find_many(&TaskPredicate::owned_by(owner), SortKey::Created)
            .await
            .expect("find");
        let listed = found.first().expect("listed");
        assert_eq!(listed, &created);
        assert_eq!(listed.text, new.text);
        assert_eq!(listed.description, new.description);
        assert_eq!(listed.priority, new.priority);
        assert_eq!(listed.categories, new.categories);
    }

    #[rstest]
    #[tokio::test]
    async fn ties_keep_insertion_order(repo: InMemoryTaskRepository) {
        let owner = UserId::random();
        let now = Utc::now();
        for text in ["first", "second", "third"] {
            repo.insert(&owner, &titled(text), now).await.expect("insert");
        }

        let found = repo
            .find_many(&TaskPredicate::owned_by(owner), SortKey::Priority)
            .await
            .expect("find");
        let labels: Vec<_> = found.iter().map(|t| t.text.as_ref()).collect();
        assert_eq!(labels, ["first", "second", "third"]);
    }

    #[rstest]
    #[tokio::test]
    async fn update_and_delete_are_owner_scoped(repo: InMemoryTaskRepository) {
        let owner = UserId::random();
        let intruder = UserId::random();
        let now = Utc::now();
        let task = repo.insert(&owner, &titled("private"), now).await.expect("insert");
        let patch = TaskPatch::status(TaskStatus::Completed);

        let foreign_update = repo
            .update_one(&task.id, &intruder, &patch, now)
            .await
            .expect("update");
        assert!(foreign_update.is_none());
        assert!(!repo.delete_one(&task.id, &intruder).await.expect("delete"));

        let updated = repo
            .update_one(&task.id, &owner, &patch, now + Duration::seconds(1))
            .await
            .expect("update")
            .expect("owned task");
        assert_eq!(updated.status, TaskStatus::Completed);
        assert!(repo.delete_one(&task.id, &owner).await.expect("delete"));
        assert!(!repo.delete_one(&task.id, &owner).await.expect("delete"));
    }

    #[rstest]
    #[tokio::test]
    async fn filtered_lookup_applies_predicate(repo: InMemoryTaskRepository) {
        let owner = UserId::random();
        let now = Utc::now();
        let mut errand = titled("Errands");
        errand.categories = vec!["shopping".to_owned()];
        repo.insert(&owner, &errand, now).await.expect("insert");
        repo.insert(&owner, &titled("Call mum"), now)
            .await
            .expect("insert");

        let predicate = TaskPredicate::new(
            owner,
            TaskFilter::default().with_search(Some("SHOP".to_owned())),
        );
        let found = repo
            .find_many(&predicate, SortKey::Created)
            .await
            .expect("find");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].text.as_ref(), "Errands");
    }

    #[rstest]
    #[tokio::test]
    async fn stats_for_owner_without_tasks_are_zero(repo: InMemoryTaskRepository) {
        repo.insert(&UserId::random(), &titled("other"), Utc::now())
            .await
            .expect("insert");
        let stats = repo
            .stats(&UserId::random(), Utc::now())
            .await
            .expect("stats");
        assert_eq!(stats, TaskStats::default());
    }
}
