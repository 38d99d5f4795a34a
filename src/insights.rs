use chrono::{DateTime, Duration, NaiveTime, Utc};
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::models::{
    EventDraft, EventKind, NoteAnalysis, NoteDraft, NoteKind, Priority, Task, TaskDraft,
    WellnessEntry,
};

/// How many recent wellness entries feed the analytics
pub const ANALYTICS_WELLNESS_WINDOW: usize = 30;

pub const SUGGESTIONS: [&str; 8] = [
    "Best tackled in the morning when you're fresh",
    "Consider breaking this into smaller subtasks",
    "Schedule during your peak productivity hours",
    "Perfect for a focused work session",
    "Good candidate for time-blocking",
    "Try the Pomodoro technique for this one",
    "Delegate if possible to free up your time",
    "Set a specific deadline to maintain urgency",
];

const SUMMARY_PREFIX: &str = "AI-generated summary: ";
const SUMMARY_CHARS: usize = 100;
pub const SUMMARY_TAGS: [&str; 2] = ["ai-processed", "summarized"];

/// Give every task without a suggestion one drawn from [`SUGGESTIONS`].
/// Existing suggestions are never replaced. Returns the ids that changed.
pub fn assign_suggestions<R: Rng + ?Sized>(tasks: &mut [Task], rng: &mut R) -> Vec<String> {
    let mut changed = Vec::new();
    for task in tasks.iter_mut() {
        if task.ai_suggestion.as_deref().is_some_and(|s| !s.is_empty()) {
            continue;
        }
        if let Some(suggestion) = SUGGESTIONS.choose(rng) {
            task.ai_suggestion = Some(suggestion.to_string());
            changed.push(task.id.clone());
        }
    }
    changed
}

/// Stable sort, highest priority first; equal priorities keep their order
pub fn sort_by_priority(tasks: &mut [Task]) {
    tasks.sort_by(|a, b| b.priority.rank().cmp(&a.priority.rank()));
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FocusTrend {
    Improving,
    Stable,
    Declining,
}

impl FocusTrend {
    pub fn from_score(avg_focus: u32) -> Self {
        if avg_focus >= 70 {
            FocusTrend::Improving
        } else if avg_focus >= 50 {
            FocusTrend::Stable
        } else {
            FocusTrend::Declining
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductivityStats {
    pub completed_tasks: usize,
    pub total_tasks: usize,
    pub completion_rate: u32,
    pub avg_focus_score: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductivityReport {
    pub insights: Vec<String>,
    pub recommendations: Vec<String>,
    pub focus_trend: FocusTrend,
    pub productivity_score: u32,
    pub stats: ProductivityStats,
}

fn rounded_percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    (100.0 * part as f64 / whole as f64).round() as u32
}

/// Mean focus score, missing scores count as `missing`; 0 when there are no entries
pub fn average_focus(entries: &[WellnessEntry], missing: u8) -> u32 {
    if entries.is_empty() {
        return 0;
    }
    let sum: u32 = entries
        .iter()
        .map(|e| u32::from(e.focus_score.unwrap_or(missing)))
        .sum();
    (sum as f64 / entries.len() as f64).round() as u32
}

/// Build the productivity report from all tasks and the most recent wellness entries
pub fn productivity_report(tasks: &[Task], wellness: &[WellnessEntry]) -> ProductivityReport {
    let window = &wellness[..wellness.len().min(ANALYTICS_WELLNESS_WINDOW)];

    let completed_tasks = tasks.iter().filter(|t| t.is_completed()).count();
    let total_tasks = tasks.len();
    let completion_rate = rounded_percent(completed_tasks, total_tasks);
    let avg_focus_score = average_focus(window, 0);

    let mut insights = Vec::new();
    let mut recommendations = Vec::new();

    if completion_rate >= 80 {
        insights.push("Excellent task completion rate!");
        recommendations.push("Keep up the great work and maintain your productivity momentum.");
    } else if completion_rate >= 60 {
        insights.push("Good productivity levels with room for improvement.");
        recommendations.push("Consider time-blocking to increase focus on important tasks.");
    } else {
        insights.push("Task completion could be improved.");
        recommendations.push("Try breaking larger tasks into smaller, manageable chunks.");
    }

    if avg_focus_score >= 80 {
        insights.push("High focus scores indicate good concentration levels.");
    } else if avg_focus_score >= 60 {
        insights.push("Focus levels are moderate - consider optimizing your work environment.");
        recommendations.push("Try using the Pomodoro technique for better focus.");
    } else if avg_focus_score > 0 {
        insights.push("Focus scores suggest difficulty maintaining concentration.");
        recommendations.push("Consider eliminating distractions and taking regular breaks.");
    }

    let productivity_score = ((completion_rate + avg_focus_score) as f64 / 2.0).round() as u32;

    ProductivityReport {
        insights: insights.into_iter().map(String::from).collect(),
        recommendations: recommendations.into_iter().map(String::from).collect(),
        focus_trend: FocusTrend::from_score(avg_focus_score),
        productivity_score,
        stats: ProductivityStats {
            completed_tasks,
            total_tasks,
            completion_rate,
            avg_focus_score,
        },
    }
}

/// Simulated summary of a note body
pub fn summarize(content: &str) -> NoteAnalysis {
    let head: String = content.chars().take(SUMMARY_CHARS).collect();
    NoteAnalysis {
        summary: format!("{}{}...", SUMMARY_PREFIX, head),
        tags: SUMMARY_TAGS.iter().map(|t| t.to_string()).collect(),
    }
}

pub fn sample_task_drafts() -> Vec<TaskDraft> {
    vec![
        TaskDraft {
            description: Some("Analyze Q3 performance and set Q4 objectives".into()),
            priority: Priority::High,
            ai_suggestion: Some("Schedule this for early morning when you're most focused".into()),
            ..TaskDraft::new("Review quarterly goals")
        },
        TaskDraft {
            description: Some("Write user guide and technical specifications".into()),
            priority: Priority::Medium,
            ai_suggestion: Some("Break this into smaller 30-minute sessions".into()),
            ..TaskDraft::new("Complete project documentation")
        },
        TaskDraft {
            description: Some("Prepare agenda and talking points for weekly team sync".into()),
            priority: Priority::Medium,
            ai_suggestion: Some("Perfect for a focused morning session".into()),
            ..TaskDraft::new("Team meeting preparation")
        },
    ]
}

pub fn sample_note_drafts() -> Vec<NoteDraft> {
    vec![
        NoteDraft {
            summary: Some("Q4 planning session focused on growth metrics and feature development".into()),
            tags: vec!["meeting".into(), "planning".into(), "q4".into()],
            kind: NoteKind::Note,
            ..NoteDraft::new(
                "Meeting Notes - Q4 Planning",
                "Key objectives for Q4: Increase user engagement by 25%, Launch new feature set, \
                 Improve customer satisfaction scores. Discussed timeline and resource allocation.",
            )
        },
        NoteDraft {
            summary: Some("Comprehensive requirements document for dashboard redesign project".into()),
            tags: vec!["project".into(), "requirements".into(), "dashboard".into()],
            kind: NoteKind::Document,
            ..NoteDraft::new(
                "Project Requirements.pdf",
                "Technical specifications for the new user dashboard including wireframes, \
                 user stories, and acceptance criteria.",
            )
        },
    ]
}

fn day_at(now: DateTime<Utc>, days_ahead: i64, hour: u32) -> DateTime<Utc> {
    let date = (now + Duration::days(days_ahead)).date_naive();
    let time = NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or(NaiveTime::MIN);
    date.and_time(time).and_utc()
}

pub fn sample_event_drafts(now: DateTime<Utc>) -> Vec<EventDraft> {
    let tomorrow = day_at(now, 1, 9);
    let next_week = day_at(now, 7, 14);
    vec![
        EventDraft {
            title: "Team Stand-up".into(),
            description: None,
            start_time: tomorrow,
            end_time: tomorrow + Duration::minutes(30),
            kind: EventKind::Event,
        },
        EventDraft {
            title: "Focus Block: Deep Work".into(),
            description: None,
            start_time: tomorrow + Duration::hours(2),
            end_time: tomorrow + Duration::hours(4),
            kind: EventKind::FocusBlock,
        },
        EventDraft {
            title: "Project Review Meeting".into(),
            description: Some("Weekly project status review and planning session".into()),
            start_time: next_week,
            end_time: next_week + Duration::minutes(60),
            kind: EventKind::AiSuggested,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TaskPatch, TaskStatus};
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn task(id: &str, priority: Priority) -> Task {
        Task::from_draft(
            TaskDraft { priority, ..TaskDraft::new(id) },
            id.to_string(),
            Utc::now(),
        )
    }

    fn wellness(score: Option<u8>) -> WellnessEntry {
        WellnessEntry {
            id: crate::models::new_id(),
            mood: 3,
            focus_score: score,
            notes: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn existing_suggestions_are_left_alone() {
        let mut tasks = vec![task("a", Priority::Low), task("b", Priority::High)];
        tasks[0].ai_suggestion = Some("keep me".into());
        let mut rng = StdRng::seed_from_u64(1);

        let changed = assign_suggestions(&mut tasks, &mut rng);

        assert_eq!(changed, vec!["b".to_string()]);
        assert_eq!(tasks[0].ai_suggestion.as_deref(), Some("keep me"));
        let assigned = tasks[1].ai_suggestion.as_deref().unwrap();
        assert!(SUGGESTIONS.contains(&assigned));
    }

    #[test]
    fn priority_sort_is_stable() {
        let mut tasks = vec![
            task("m1", Priority::Medium),
            task("l1", Priority::Low),
            task("h1", Priority::High),
            task("m2", Priority::Medium),
            task("h2", Priority::High),
            task("l2", Priority::Low),
        ];
        sort_by_priority(&mut tasks);
        let order: Vec<_> = tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(order, vec!["h1", "h2", "m1", "m2", "l1", "l2"]);
    }

    #[test]
    fn analytics_matches_reference_numbers() {
        let mut tasks: Vec<Task> = (0..7).map(|i| task(&format!("t{i}"), Priority::Medium)).collect();
        for t in tasks.iter_mut().take(4) {
            t.apply(TaskPatch::status(TaskStatus::Completed), Utc::now());
        }
        let entries = vec![wellness(Some(80)), wellness(Some(60)), wellness(Some(70))];

        let report = productivity_report(&tasks, &entries);

        assert_eq!(report.stats.completion_rate, 57);
        assert_eq!(report.stats.avg_focus_score, 70);
        assert_eq!(report.productivity_score, 64);
        assert_eq!(report.focus_trend, FocusTrend::Improving);
        assert_eq!(
            report.insights,
            vec![
                "Task completion could be improved.".to_string(),
                "Focus levels are moderate - consider optimizing your work environment.".to_string(),
            ]
        );
    }

    #[test]
    fn focus_trend_bands() {
        assert_eq!(FocusTrend::from_score(70), FocusTrend::Improving);
        assert_eq!(FocusTrend::from_score(69), FocusTrend::Stable);
        assert_eq!(FocusTrend::from_score(50), FocusTrend::Stable);
        assert_eq!(FocusTrend::from_score(49), FocusTrend::Declining);
    }

    #[test]
    fn empty_inputs_score_zero() {
        let report = productivity_report(&[], &[]);
        assert_eq!(report.stats.completion_rate, 0);
        assert_eq!(report.stats.avg_focus_score, 0);
        assert_eq!(report.productivity_score, 0);
        assert_eq!(report.focus_trend, FocusTrend::Declining);
        // no focus insight when there is no focus data
        assert_eq!(report.insights.len(), 1);
    }

    #[test]
    fn missing_focus_scores_count_as_zero() {
        let entries = vec![wellness(Some(90)), wellness(None)];
        assert_eq!(average_focus(&entries, 0), 45);
        assert_eq!(average_focus(&entries, 75), 83);
    }

    #[test]
    fn only_thirty_entries_are_considered() {
        let mut entries: Vec<_> = (0..30).map(|_| wellness(Some(100))).collect();
        entries.extend((0..10).map(|_| wellness(Some(0))));
        let report = productivity_report(&[], &entries);
        assert_eq!(report.stats.avg_focus_score, 100);
    }

    #[test]
    fn summary_takes_first_hundred_chars() {
        let body = "x".repeat(150);
        let analysis = summarize(&body);
        assert_eq!(analysis.summary, format!("AI-generated summary: {}...", "x".repeat(100)));
        assert_eq!(analysis.tags, vec!["ai-processed", "summarized"]);
    }

    #[test]
    fn sample_events_start_in_the_future() {
        let now = Utc::now();
        for draft in sample_event_drafts(now) {
            assert!(draft.start_time > now);
            assert!(draft.end_time > draft.start_time);
        }
    }
}
