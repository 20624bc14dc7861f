//! Tests for the snapshot-backed task board.

use super::*;
use crate::client::api::MockTaskApi;
use crate::domain::{TaskText, UserId};
use chrono::{DateTime, Duration, TimeZone, Utc};
use mockall::Sequence;
use rstest::{fixture, rstest};

fn base_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 5, 1, 8, 0, 0)
        .single()
        .expect("valid instant")
}

fn task(text: &str, priority: TaskPriority, minutes: i64) -> Task {
    let mut new = NewTask::titled(TaskText::new(text).expect("text"));
    new.priority = priority;
    Task::from_new(
        TaskId::random(),
        UserId::random(),
        &new,
        base_instant() + Duration::minutes(minutes),
    )
}

#[fixture]
fn tasks() -> Vec<Task> {
    let mut shop = task("Shopping list", TaskPriority::Low, 0);
    shop.categories = vec!["home".into()];
    let mut report = task("Quarterly report", TaskPriority::High, 1);
    report.categories = vec!["work".into()];
    report.description = "numbers for the shop floor".into();
    let mut gym = task("Gym", TaskPriority::Medium, 2);
    gym.status = TaskStatus::Completed;
    let mut taxes = task("Taxes", TaskPriority::High, 3);
    taxes.categories = vec!["home".into(), "admin".into()];
    vec![shop, report, gym, taxes]
}

fn texts(tasks: &[Task]) -> Vec<&str> {
    tasks.iter().map(|task| task.text.as_ref()).collect()
}

fn expect_refresh(api: &mut MockTaskApi, tasks: Vec<Task>, seq: &mut Sequence) {
    api.expect_list_tasks()
        .withf(|filter, sort| filter.is_unconstrained() && *sort == SortKey::Created)
        .times(1)
        .in_sequence(seq)
        .return_once(move |_, _| Ok(tasks));
    api.expect_stats()
        .times(1)
        .in_sequence(seq)
        .return_once(|| Ok(TaskStats::default()));
}

async fn loaded_board(tasks: Vec<Task>) -> TaskBoard<MockTaskApi> {
    let mut api = MockTaskApi::new();
    let mut seq = Sequence::new();
    expect_refresh(&mut api, tasks, &mut seq);
    let mut board = TaskBoard::new(api);
    board.refresh().await.expect("refresh");
    board
}

#[rstest]
fn default_view_shows_newest_first(tasks: Vec<Task>) {
    let visible = ViewState::default().project(&TaskSnapshot::new(tasks));
    assert_eq!(
        texts(&visible),
        vec!["Taxes", "Gym", "Quarterly report", "Shopping list"]
    );
}

#[rstest]
fn search_covers_text_description_and_categories(tasks: Vec<Task>) {
    let view = ViewState {
        filter: TaskFilter::default().with_search(Some("SHOP".into())),
        sort: SortKey::Created,
    };
    let visible = view.project(&TaskSnapshot::new(tasks));
    assert_eq!(texts(&visible), vec!["Quarterly report", "Shopping list"]);
}

#[rstest]
fn filters_combine_and_sort_is_stable(tasks: Vec<Task>) {
    let view = ViewState {
        filter: TaskFilter::default()
            .with_status(Some(TaskStatus::Pending))
            .with_category(Some("home".into())),
        sort: SortKey::Priority,
    };
    let visible = view.project(&TaskSnapshot::new(tasks));
    assert_eq!(texts(&visible), vec!["Taxes", "Shopping list"]);
}

#[rstest]
fn projection_leaves_the_snapshot_untouched(tasks: Vec<Task>) {
    let snapshot = TaskSnapshot::new(tasks.clone());
    let view = ViewState {
        filter: TaskFilter::default().with_priority(Some(TaskPriority::High)),
        sort: SortKey::Priority,
    };
    let _ = view.project(&snapshot);
    assert_eq!(snapshot.tasks(), tasks.as_slice());
}

#[rstest]
fn snapshot_lists_distinct_categories(tasks: Vec<Task>) {
    assert_eq!(
        TaskSnapshot::new(tasks).categories(),
        vec!["admin", "home", "work"]
    );
}

#[rstest]
#[tokio::test]
async fn view_changes_never_call_the_api(tasks: Vec<Task>) {
    // The mock only expects the initial refresh; any further call panics.
    let mut board = loaded_board(tasks).await;

    board.set_status_filter(Some(TaskStatus::Completed));
    assert_eq!(texts(&board.visible()), vec!["Gym"]);

    board.clear_filters();
    board.set_search(Some("  ".into()));
    board.set_sort(SortKey::Priority);
    assert_eq!(
        texts(&board.visible()),
        vec!["Quarterly report", "Taxes", "Gym", "Shopping list"]
    );

    board.set_priority_filter(Some(TaskPriority::Low));
    board.set_category_filter(Some("home".into()));
    assert_eq!(texts(&board.visible()), vec!["Shopping list"]);
}

#[rstest]
#[tokio::test]
async fn create_refetches_snapshot_and_stats(tasks: Vec<Task>) {
    let created = task("New", TaskPriority::Medium, 10);
    let mut after = tasks.clone();
    after.push(created.clone());

    let mut api = MockTaskApi::new();
    let mut seq = Sequence::new();
    expect_refresh(&mut api, tasks, &mut seq);
    let returned = created.clone();
    api.expect_create_task()
        .times(1)
        .in_sequence(&mut seq)
        .return_once(move |_| Ok(returned));
    api.expect_list_tasks()
        .times(1)
        .in_sequence(&mut seq)
        .return_once(move |_, _| Ok(after));
    api.expect_stats().times(1).in_sequence(&mut seq).return_once(|| {
        Ok(TaskStats {
            total: 5,
            ..TaskStats::default()
        })
    });

    let mut board = TaskBoard::new(api);
    board.refresh().await.expect("initial refresh");
    let result = board
        .create(NewTask::titled(TaskText::new("New").expect("text")))
        .await
        .expect("create");

    assert_eq!(result, created);
    assert_eq!(board.snapshot().len(), 5);
    assert_eq!(board.stats().total, 5);
}

#[rstest]
#[tokio::test]
async fn toggle_sends_the_flipped_status(tasks: Vec<Task>) {
    let gym = tasks[2].clone();
    let gym_id = gym.id;
    let mut api = MockTaskApi::new();
    let mut seq = Sequence::new();
    expect_refresh(&mut api, tasks.clone(), &mut seq);
    api.expect_update_task()
        .withf(move |id, patch| *id == gym_id && *patch == TaskPatch::status(TaskStatus::Pending))
        .times(1)
        .in_sequence(&mut seq)
        .return_once(move |_, _| Ok(gym));
    expect_refresh(&mut api, tasks, &mut seq);

    let mut board = TaskBoard::new(api);
    board.refresh().await.expect("initial refresh");
    board.toggle(&gym_id).await.expect("toggle");
}

#[rstest]
#[tokio::test]
async fn toggling_an_unknown_task_fails_locally(tasks: Vec<Task>) {
    let mut board = loaded_board(tasks).await;
    let missing = TaskId::random();

    let err = board.toggle(&missing).await.expect_err("unknown task");
    assert_eq!(err, ClientError::UnknownTask { id: missing });
}

#[rstest]
#[tokio::test]
async fn failed_delete_keeps_the_previous_snapshot(tasks: Vec<Task>) {
    let mut api = MockTaskApi::new();
    let mut seq = Sequence::new();
    expect_refresh(&mut api, tasks.clone(), &mut seq);
    api.expect_delete_task()
        .times(1)
        .in_sequence(&mut seq)
        .return_once(|_| {
            Err(ClientError::Api {
                status: 404,
                code: Some(crate::domain::ErrorCode::NotFound),
                message: "task not found".into(),
            })
        });

    let mut board = TaskBoard::new(api);
    board.refresh().await.expect("initial refresh");
    let err = board.delete(&tasks[0].id).await.expect_err("not found");

    assert_eq!(err.code(), Some(crate::domain::ErrorCode::NotFound));
    assert_eq!(board.snapshot().tasks(), tasks.as_slice());
}

#[rstest]
#[case::sentinel("all")]
#[case::empty("")]
#[case::blank("  ")]
#[case::padded(" home ")]
#[case::exact("home")]
fn board_setters_project_like_server_query_parsing(tasks: Vec<Task>, #[case] raw: &str) {
    let snapshot = TaskSnapshot::new(tasks);
    let server = ViewState {
        filter: TaskFilter::parse(None, None, Some(raw), Some(raw)).expect("valid"),
        sort: SortKey::Created,
    };
    let local = ViewState {
        filter: TaskFilter::default()
            .with_category(Some(raw.to_owned()))
            .with_search(Some(raw.to_owned())),
        sort: SortKey::Created,
    };
    assert_eq!(texts(&local.project(&snapshot)), texts(&server.project(&snapshot)));
}

#[rstest]
#[tokio::test]
async fn category_sentinel_shows_every_task(tasks: Vec<Task>) {
    let mut board = loaded_board(tasks).await;
    board.set_category_filter(Some("all".into()));
    assert_eq!(
        texts(&board.visible()),
        vec!["Taxes", "Gym", "Quarterly report", "Shopping list"]
    );
}

fn transport_failure() -> ClientError {
    ClientError::Transport {
        message: "connection reset".into(),
    }
}

#[rstest]
#[tokio::test]
async fn committed_create_survives_a_failed_refresh(tasks: Vec<Task>) {
    let created = task("New", TaskPriority::Medium, 10);
    let mut api = MockTaskApi::new();
    let mut seq = Sequence::new();
    expect_refresh(&mut api, tasks.clone(), &mut seq);
    let returned = created.clone();
    api.expect_create_task()
        .times(1)
        .in_sequence(&mut seq)
        .return_once(move |_| Ok(returned));
    api.expect_list_tasks()
        .times(1)
        .in_sequence(&mut seq)
        .return_once(|_, _| Err(transport_failure()));

    let mut board = TaskBoard::new(api);
    board.refresh().await.expect("initial refresh");
    let result = board
        .create(NewTask::titled(TaskText::new("New").expect("text")))
        .await
        .expect("create was committed");

    assert_eq!(result, created);
    assert!(board.is_stale());
    assert_eq!(board.snapshot().tasks(), tasks.as_slice());
}

#[rstest]
#[tokio::test]
async fn next_successful_refresh_clears_staleness(tasks: Vec<Task>) {
    let target = tasks[0].id;
    let mut api = MockTaskApi::new();
    let mut seq = Sequence::new();
    expect_refresh(&mut api, tasks.clone(), &mut seq);
    api.expect_delete_task()
        .times(1)
        .in_sequence(&mut seq)
        .return_once(|_| Ok(()));
    api.expect_list_tasks()
        .times(1)
        .in_sequence(&mut seq)
        .return_once(|_, _| Err(transport_failure()));
    expect_refresh(&mut api, tasks[1..].to_vec(), &mut seq);

    let mut board = TaskBoard::new(api);
    board.refresh().await.expect("initial refresh");
    board.delete(&target).await.expect("delete was committed");
    assert!(board.is_stale());
    assert_eq!(board.snapshot().len(), 4);

    board.refresh().await.expect("recovered refresh");
    assert!(!board.is_stale());
    assert_eq!(board.snapshot().len(), 3);
}
