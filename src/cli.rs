use clap::{Parser, Subcommand};
use thiserror::Error;

use crate::client::{Backend, ClientError, Store};
use crate::insights::ProductivityReport;
use crate::models::{NoteDraft, Priority, Role, TaskDraft, TaskStatus, WellnessDraft, parse_tag_list};
use crate::utils::parse_date;

#[derive(Parser)]
#[command(name = "lifeos")]
#[command(about = "LifeOS - tasks, notes, calendar, wellness and an AI assistant in one dashboard")]
#[command(version)]
pub struct Cli {
    /// Custom config file path
    #[arg(short, long)]
    pub config: Option<String>,

    /// Use development mode (uses separate dev config/database)
    #[arg(long)]
    pub dev: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the REST backend
    Serve {
        /// Address to bind (defaults to the configured host)
        #[arg(long)]
        host: Option<String>,
        /// Port to bind (defaults to the configured port)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Launch the interactive dashboard (default if no subcommand)
    Tui,
    /// Quickly add a new task
    AddTask {
        /// Task title
        title: String,
        /// low, medium or high
        #[arg(long, default_value = "medium")]
        priority: String,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Quickly add a new note
    AddNote {
        /// Note title
        title: String,
        /// Note content
        #[arg(long)]
        content: String,
        /// Comma-separated tags
        #[arg(long)]
        tags: Option<String>,
    },
    /// Record a wellness check-in
    LogMood {
        /// Mood from 1 to 5
        mood: u8,
        /// Focus score from 0 to 100
        #[arg(long)]
        focus: Option<u8>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Send a message to the assistant and print the reply
    Chat {
        message: String,
    },
    /// Assign AI suggestions to pending tasks
    Prioritize,
    /// Show productivity analytics
    Stats,
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    ClientError(#[from] ClientError),
    #[error("Failed to parse date: {0}")]
    DateParseError(String),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Print the store's notice, if an operation left one
fn report<B: Backend>(store: &Store<B>) {
    if let Some(ref notice) = store.state().notice {
        println!("{}", notice.message);
    }
    if store.state().offline {
        println!("(backend unreachable, saved locally)");
    }
}

/// Handle the add-task command
pub fn handle_add_task<B: Backend>(
    title: String,
    priority: String,
    due: Option<String>,
    description: Option<String>,
    store: &mut Store<B>,
) -> Result<(), CliError> {
    let priority = Priority::parse(&priority)
        .ok_or_else(|| CliError::InvalidArgument(format!("unknown priority '{}'", priority)))?;
    let due_date = due
        .map(|due_str| {
            parse_date(&due_str).map_err(|e| {
                CliError::DateParseError(format!("Invalid date format '{}': {}", due_str, e))
            })
        })
        .transpose()?;

    let draft = TaskDraft {
        priority,
        due_date,
        description,
        ..TaskDraft::new(title)
    };
    store.add_task(draft)?;
    report(store);
    Ok(())
}

/// Handle the add-note command
pub fn handle_add_note<B: Backend>(
    title: String,
    content: String,
    tags: Option<String>,
    store: &mut Store<B>,
) -> Result<(), CliError> {
    let draft = NoteDraft {
        tags: tags.as_deref().map(parse_tag_list).unwrap_or_default(),
        ..NoteDraft::new(title, content)
    };
    store.add_note(draft)?;
    report(store);
    Ok(())
}

pub fn handle_log_mood<B: Backend>(
    mood: u8,
    focus: Option<u8>,
    notes: Option<String>,
    store: &mut Store<B>,
) -> Result<(), CliError> {
    store.log_mood(WellnessDraft {
        mood,
        focus_score: focus,
        notes,
    })?;
    report(store);
    Ok(())
}

pub fn handle_chat<B: Backend>(message: String, store: &mut Store<B>) -> Result<(), CliError> {
    store.send_message(&message)?;
    if let Some(reply) = store
        .state()
        .chat
        .iter()
        .rev()
        .find(|m| m.role == Role::Assistant)
    {
        println!("{}", reply.content);
    }
    if store.state().offline {
        println!("(reply generated offline)");
    }
    Ok(())
}

pub fn handle_prioritize<B: Backend>(store: &mut Store<B>) -> Result<(), CliError> {
    store.prioritize_tasks()?;
    report(store);
    for task in store
        .state()
        .tasks
        .iter()
        .filter(|t| t.status == TaskStatus::Pending)
    {
        println!(
            "[{}] {}{}",
            task.priority.as_str(),
            task.title,
            task.ai_suggestion
                .as_ref()
                .map(|s| format!("  (AI: {})", s))
                .unwrap_or_default()
        );
    }
    Ok(())
}

pub fn format_report(report: &ProductivityReport) -> String {
    let mut text = format!(
        "Productivity score: {}\nCompleted: {}/{} ({}%)\nAverage focus: {}% ({:?})\n",
        report.productivity_score,
        report.stats.completed_tasks,
        report.stats.total_tasks,
        report.stats.completion_rate,
        report.stats.avg_focus_score,
        report.focus_trend,
    );
    for insight in &report.insights {
        text.push_str(&format!("- {}\n", insight));
    }
    for recommendation in &report.recommendations {
        text.push_str(&format!("* {}\n", recommendation));
    }
    text
}

pub fn handle_stats<B: Backend>(store: &mut Store<B>) -> Result<(), CliError> {
    let report = store.productivity()?;
    print!("{}", format_report(&report));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{KeyValueStore, LocalBackend};
    use crate::insights::productivity_report;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn store(dir: &std::path::Path) -> Store<LocalBackend> {
        let primary = LocalBackend::with_rng(
            KeyValueStore::open(dir.join("primary")).unwrap(),
            StdRng::seed_from_u64(3),
        );
        let mut store = Store::new(primary, LocalBackend::open(dir.join("fallback")).unwrap());
        store.load();
        store
    }

    #[test]
    fn cli_parses_subcommands() {
        let cli = Cli::try_parse_from(["lifeos", "--dev", "add-task", "Ship it", "--priority", "high"]).unwrap();
        assert!(cli.dev);
        assert!(matches!(cli.command, Some(Commands::AddTask { ref priority, .. }) if priority == "high"));

        let cli = Cli::try_parse_from(["lifeos", "serve", "--port", "4000"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Serve { port: Some(4000), host: None })));

        assert!(Cli::try_parse_from(["lifeos"]).unwrap().command.is_none());
    }

    #[test]
    fn add_task_rejects_bad_input() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store(dir.path());

        let err = handle_add_task("x".into(), "urgent".into(), None, None, &mut store).unwrap_err();
        assert!(matches!(err, CliError::InvalidArgument(_)));

        let err = handle_add_task("x".into(), "low".into(), Some("31/12".into()), None, &mut store)
            .unwrap_err();
        assert!(matches!(err, CliError::DateParseError(_)));

        let err = handle_add_task("  ".into(), "low".into(), None, None, &mut store).unwrap_err();
        assert!(matches!(err, CliError::ClientError(ClientError::Invalid(_))));
    }

    #[test]
    fn add_task_and_note_reach_the_backend() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store(dir.path());
        let tasks = store.state().tasks.len();

        handle_add_task("Plan week".into(), "high".into(), Some("2030-01-07".into()), None, &mut store).unwrap();
        handle_add_note("Ideas".into(), "More sleep".into(), Some("Health, habits".into()), &mut store).unwrap();

        assert_eq!(store.state().tasks.len(), tasks + 1);
        let note = store.state().notes.iter().find(|n| n.title == "Ideas").unwrap();
        assert_eq!(note.tags, vec!["Health".to_string(), "habits".to_string()]);
    }

    #[test]
    fn report_lists_score_and_insights() {
        let text = format_report(&productivity_report(&[], &[]));
        assert!(text.starts_with("Productivity score: "));
        assert!(text.contains("Completed: 0/0"));
    }
}
