//! Command-line client for a taskdeck server.
//!
//! Listing fetches the full task snapshot once and filters it locally, the
//! same way an interactive front end would.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, eyre};
use tokio::runtime::Builder;

use taskdeck::client::{HttpTaskApi, TaskBoard};
use taskdeck::domain::{
    NewTask, SortKey, Task, TaskFilter, TaskId, TaskPriority, TaskStatus, TaskText,
    UserSettingsPatch, normalize_categories, parse_due_date,
};

/// `taskdeck-cli` arguments.
#[derive(Debug, Parser)]
#[command(name = "taskdeck-cli", about = "Manage tasks on a taskdeck server", version)]
struct CliArgs {
    /// Server base URL.
    #[arg(
        long = "base-url",
        env = "TASKDECK_BASE_URL",
        default_value = "http://localhost:8080"
    )]
    base_url: String,
    /// Bearer token from `login`.
    #[arg(long, env = "TASKDECK_TOKEN", hide_env_values = true)]
    token: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create an account.
    Register(Credentials),
    /// Log in and print a bearer token.
    Login(Credentials),
    /// List tasks, filtered and sorted locally.
    List(ListArgs),
    /// Add a task.
    Add(AddArgs),
    /// Flip a task between pending and completed.
    Toggle { id: String },
    /// Delete a task.
    Delete { id: String },
    /// Print task statistics.
    Stats,
    /// Update display settings.
    Settings {
        #[arg(long)]
        theme: Option<String>,
        #[arg(long = "default-view")]
        default_view: Option<String>,
    },
}

#[derive(Debug, Args)]
struct Credentials {
    #[arg(long)]
    username: String,
    #[arg(long, env = "TASKDECK_PASSWORD", hide_env_values = true)]
    password: String,
}

#[derive(Debug, Args)]
struct ListArgs {
    /// `pending`, `completed` or `all`.
    #[arg(long)]
    status: Option<String>,
    /// `low`, `medium`, `high` or `all`.
    #[arg(long)]
    priority: Option<String>,
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    search: Option<String>,
    /// One of `created`, `dueDate`, `priority`.
    #[arg(long = "sort-by")]
    sort_by: Option<String>,
}

#[derive(Debug, Args)]
struct AddArgs {
    text: String,
    #[arg(long, default_value = "")]
    description: String,
    #[arg(long, value_parser = parse_priority)]
    priority: Option<TaskPriority>,
    /// RFC 3339 timestamp or `YYYY-MM-DD`.
    #[arg(long)]
    due: Option<String>,
    /// Comma-separated labels.
    #[arg(long, value_delimiter = ',')]
    categories: Vec<String>,
}

impl ListArgs {
    /// Build the view filter with the same normalisation the server applies
    /// to query strings.
    fn filter(&self) -> Result<TaskFilter> {
        TaskFilter::parse(
            self.status.as_deref(),
            self.priority.as_deref(),
            self.category.as_deref(),
            self.search.as_deref(),
        )
        .map_err(|error| eyre!("{error}"))
    }
}

fn parse_priority(raw: &str) -> Result<TaskPriority, String> {
    raw.parse().map_err(|error| format!("{error}"))
}

fn parse_task_id(raw: &str) -> Result<TaskId> {
    TaskId::new(raw).map_err(|error| eyre!("{error}"))
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = CliArgs::parse();
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("create Tokio runtime")?;
    runtime.block_on(run(args))
}

async fn run(args: CliArgs) -> Result<()> {
    let mut api = HttpTaskApi::new(&args.base_url)?;
    if let Some(token) = args.token {
        api = api.with_token(token);
    }

    match args.command {
        Command::Register(credentials) => {
            let message = api
                .register(&credentials.username, &credentials.password)
                .await?;
            println!("{message}");
        }
        Command::Login(credentials) => {
            let session = api.login(&credentials.username, &credentials.password).await?;
            println!("{}", session.token);
        }
        Command::Settings {
            theme,
            default_view,
        } => {
            let settings = api
                .update_settings(&UserSettingsPatch {
                    theme,
                    default_view,
                })
                .await?;
            println!("theme={} defaultView={}", settings.theme, settings.default_view);
        }
        command => run_board_command(TaskBoard::new(api), command).await?,
    }
    Ok(())
}

async fn run_board_command(mut board: TaskBoard<HttpTaskApi>, command: Command) -> Result<()> {
    if board.api().token().is_none() {
        return Err(eyre!("a bearer token is required; pass --token or set TASKDECK_TOKEN"));
    }
    board.refresh().await?;

    match command {
        Command::List(list) => {
            board.set_filter(list.filter()?);
            board.set_sort(SortKey::parse(list.sort_by.as_deref()));
            for task in board.visible() {
                println!("{}", render_task(&task));
            }
        }
        Command::Add(add) => {
            let mut task = NewTask::titled(TaskText::new(&add.text).map_err(|e| eyre!("{e}"))?);
            task.description = add.description;
            task.priority = add.priority.unwrap_or_default();
            task.due_date = add
                .due
                .as_deref()
                .map(parse_due_date)
                .transpose()
                .map_err(|e| eyre!("{e}"))?;
            task.categories = normalize_categories(add.categories);
            let created = board.create(task).await?;
            println!("{}", render_task(&created));
        }
        Command::Toggle { id } => {
            let updated = board.toggle(&parse_task_id(&id)?).await?;
            println!("{}", render_task(&updated));
        }
        Command::Delete { id } => {
            let id = parse_task_id(&id)?;
            board.delete(&id).await?;
            println!("deleted {id}");
        }
        Command::Stats => {
            let stats = board.stats();
            println!(
                "total={} completed={} pending={} highPriority={} overdue={}",
                stats.total, stats.completed, stats.pending, stats.high_priority, stats.overdue
            );
        }
        Command::Register(_) | Command::Login(_) | Command::Settings { .. } => {
            return Err(eyre!("account commands do not use the task board"));
        }
    }
    Ok(())
}

fn render_task(task: &Task) -> String {
    let mark = match task.status {
        TaskStatus::Completed => 'x',
        TaskStatus::Pending => ' ',
    };
    let due = task
        .due_date
        .map(|due| format!(" due {}", due.format("%Y-%m-%d")))
        .unwrap_or_default();
    let categories = if task.categories.is_empty() {
        String::new()
    } else {
        format!(" [{}]", task.categories.join(", "))
    };
    format!(
        "{} [{mark}] {:<6} {}{due}{categories}",
        task.id,
        task.priority.as_str(),
        task.text.as_ref()
    )
}
