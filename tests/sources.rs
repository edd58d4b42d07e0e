//! Source chain tests against captured task-master output.
//!
//! A scripted runner stands in for the external tool so each test can decide
//! which commands succeed.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use pretty_assertions::assert_eq;

use task_monitor::io::command::CommandRunner;
use task_monitor::io::sources::{SourceError, lookup_subtasks};
use task_monitor::io::task_file::parse_task_file;
use task_monitor::model::config::SourceConfig;
use task_monitor::model::recommendation::{Recommendation, RecommendationOrigin};
use task_monitor::model::snapshot::SourceKind;
use task_monitor::model::task::{Priority, Status};
use task_monitor::ops::resolve::SourceResolver;
use task_monitor::parse::{parse_recommendation_section, parse_subtasks, parse_summary, parse_table};

fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    std::fs::read_to_string(path).unwrap()
}

/// Answers `<subcommand>` with canned text; anything else is a missing tool
struct ScriptedRunner {
    outputs: HashMap<&'static str, String>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedRunner {
    fn new(outputs: &[(&'static str, &str)]) -> Arc<Self> {
        Arc::new(ScriptedRunner {
            outputs: outputs
                .iter()
                .map(|(cmd, name)| (*cmd, fixture(name)))
                .collect(),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(&self, args: &[&str], _limit: Duration) -> Result<String, SourceError> {
        self.calls.lock().unwrap().push(args.join(" "));
        self.outputs
            .get(args[0])
            .cloned()
            .ok_or_else(|| SourceError::MissingProgram {
                program: "task-master".to_string(),
            })
    }

    fn program(&self) -> &str {
        "task-master"
    }
}

fn config_with_files(files: Vec<PathBuf>) -> SourceConfig {
    SourceConfig {
        task_files: files,
        ..SourceConfig::default()
    }
}

fn missing_file() -> Vec<PathBuf> {
    vec![PathBuf::from("/nonexistent/tmon-test/tasks.json")]
}

#[test]
fn listing_fixture_parses_rows_and_summary() {
    let text = fixture("task_master_list.txt");
    let tasks = parse_table(&text);
    assert_eq!(
        tasks.iter().map(|t| t.id.as_str()).collect::<Vec<_>>(),
        vec!["1", "2", "3", "4", "5"]
    );
    assert_eq!(tasks[2].status, Status::InProgress);
    assert_eq!(tasks[3].complexity, None);
    assert_eq!(tasks[4].priority, Priority::Low);

    let progress = parse_summary(&text);
    assert_eq!(progress.tasks.percentage, Some(40));
    assert_eq!(progress.tasks.counts.map(|c| c.total()), Some(5));
    assert_eq!(progress.subtasks.counts.map(|c| (c.completed, c.total)), Some((1, 3)));
}

#[test]
fn next_fixture_parses_recommendation() {
    let rec = parse_recommendation_section(&fixture("next.txt")).unwrap();
    assert_eq!(rec.id.as_deref(), Some("19"));
    assert_eq!(rec.dependencies.as_deref(), Some("18"));
    assert!(rec.description.unwrap().ends_with("critical errors."));
}

#[test]
fn show_fixture_parses_subtasks_only_inside_section() {
    let subs = parse_subtasks(&fixture("show.txt"));
    assert_eq!(
        subs.iter().map(|t| (t.id.as_str(), t.status)).collect::<Vec<_>>(),
        vec![
            ("3.1", Status::Done),
            ("3.2", Status::InProgress),
            ("3.3", Status::Pending),
        ]
    );
}

#[test]
fn structured_fixture_uses_master_tag() {
    let tasks = parse_task_file(&fixture("tasks.json")).unwrap();
    assert_eq!(tasks.len(), 4);
    assert_eq!(tasks[1].subtasks[1].id, "2.2");
    assert!(tasks[1].subtasks[1].dependencies.contains("2.1"));
    assert_eq!(tasks[2].complexity.as_deref(), Some("6"));
}

#[tokio::test]
async fn structured_file_wins_without_running_the_tool() {
    let file = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/tasks.json");
    let runner = ScriptedRunner::new(&[("list", "task_master_list.txt")]);
    let resolver = SourceResolver::from_config(&config_with_files(vec![file.clone()]), runner.clone());

    let snapshot = resolver.resolve(1).await;
    assert_eq!(snapshot.source, SourceKind::TaskFile(file));
    assert!(runner.calls().is_empty());

    // 1 of 4 done, 1 of 2 subtasks done
    assert_eq!(snapshot.progress.tasks.percentage, Some(25));
    assert_eq!(snapshot.progress.subtasks.percentage, Some(50));
    match snapshot.recommendation {
        Recommendation::Task { task, origin } => {
            assert_eq!(origin, RecommendationOrigin::Computed);
            assert_eq!(task.id.as_deref(), Some("2"));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn listing_supplies_tasks_progress_and_recommendation() {
    let runner = ScriptedRunner::new(&[("list", "task_master_list.txt"), ("next", "next.txt")]);
    let resolver = SourceResolver::from_config(&config_with_files(missing_file()), runner.clone());

    let snapshot = resolver.resolve(2).await;
    assert_eq!(snapshot.source, SourceKind::ListCommand);
    assert_eq!(snapshot.tasks.len(), 5);
    assert_eq!(snapshot.progress.tasks.percentage, Some(40));
    assert_eq!(runner.calls(), vec!["list".to_string()]);
    match snapshot.recommendation {
        Recommendation::Task { task, origin } => {
            assert_eq!(origin, RecommendationOrigin::Reported);
            assert_eq!(task.id.as_deref(), Some("3"));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn next_report_is_shown_beside_demo_tasks() {
    let runner = ScriptedRunner::new(&[("next", "next.txt")]);
    let resolver = SourceResolver::from_config(&config_with_files(missing_file()), runner.clone());

    let snapshot = resolver.resolve(3).await;
    assert_eq!(snapshot.source, SourceKind::Demo);
    assert_eq!(runner.calls(), vec!["list".to_string(), "next".to_string()]);
    match snapshot.recommendation {
        Recommendation::Task { task, origin } => {
            assert_eq!(origin, RecommendationOrigin::Reported);
            assert_eq!(task.id.as_deref(), Some("19"));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn missing_tool_falls_back_to_demo() {
    let runner = ScriptedRunner::new(&[]);
    let resolver = SourceResolver::from_config(&config_with_files(missing_file()), runner);

    let snapshot = resolver.resolve(4).await;
    assert_eq!(snapshot.source, SourceKind::Demo);
    assert!(!snapshot.tasks.is_empty());
    assert!(snapshot.recommendation.is_demo());
    assert_eq!(snapshot.progress.tasks.counts.map(|c| c.total()), Some(snapshot.tasks.len()));
}

#[tokio::test]
async fn subtask_lookup_runs_show_for_the_task() {
    let runner = ScriptedRunner::new(&[("show", "show.txt")]);
    let subs = lookup_subtasks(runner.as_ref(), "3", Duration::from_secs(1))
        .await
        .unwrap();
    assert_eq!(subs.len(), 3);
    assert_eq!(runner.calls(), vec!["show 3".to_string()]);
}

#[tokio::test]
async fn listing_without_recommendation_asks_next() {
    let runner = ScriptedRunner::new(&[("list", "task_master_list_plain.txt"), ("next", "next.txt")]);
    let resolver = SourceResolver::from_config(&config_with_files(missing_file()), runner.clone());

    let snapshot = resolver.resolve(5).await;
    assert_eq!(snapshot.source, SourceKind::ListCommand);
    assert_eq!(snapshot.tasks.len(), 5);
    assert_eq!(runner.calls(), vec!["list".to_string(), "next".to_string()]);
    match snapshot.recommendation {
        Recommendation::Task { task, origin } => {
            assert_eq!(origin, RecommendationOrigin::Reported);
            assert_eq!(task.id.as_deref(), Some("19"));
        }
        other => panic!("unexpected {other:?}"),
    }
}
