use std::sync::Arc;

use crate::io::command::CommandRunner;
use crate::io::sources::{
    DemoSource, ListCommandSource, NextCommandSource, SourceOutput, TaskFileSource, TaskSource,
};
use crate::model::config::SourceConfig;
use crate::model::recommendation::{Recommendation, RecommendationOrigin, RecommendedTask};
use crate::model::snapshot::{SourceKind, Snapshot};
use crate::ops::demo::demo_recommendation;
use crate::ops::progress::aggregate;
use crate::ops::recommend::recommend;

/// Walks the ordered source chain and builds one snapshot per call.
pub struct SourceResolver {
    sources: Vec<Box<dyn TaskSource>>,
}

impl SourceResolver {
    pub fn new(sources: Vec<Box<dyn TaskSource>>) -> Self {
        SourceResolver { sources }
    }

    /// task file → list command → next command → demo data
    pub fn from_config(config: &SourceConfig, runner: Arc<dyn CommandRunner>) -> Self {
        SourceResolver::new(vec![
            Box::new(TaskFileSource::new(config.task_files.clone())),
            Box::new(ListCommandSource::new(runner.clone(), config.list_timeout())),
            Box::new(NextCommandSource::new(runner, config.lookup_timeout())),
            Box::new(DemoSource),
        ])
    }

    /// Resolve a snapshot stamped with `generation`. Never fails.
    ///
    /// The first source to yield tasks wins. The first explicit recommendation
    /// seen along the way is kept even if that source had no tasks. A list
    /// command result without one falls through to the later
    /// recommendation-only sources before computing one locally.
    pub async fn resolve(&self, generation: u64) -> Snapshot {
        let mut reported: Option<RecommendedTask> = None;
        let mut chosen: Option<(usize, SourceOutput)> = None;

        for (index, source) in self.sources.iter().enumerate() {
            match source.try_resolve().await {
                Ok(mut output) => {
                    if reported.is_none() {
                        reported = output.recommendation.take();
                    }
                    if !output.tasks.is_empty() {
                        tracing::debug!(
                            source = source.name(),
                            tasks = output.tasks.len(),
                            generation,
                            "source resolved"
                        );
                        chosen = Some((index, output));
                        break;
                    }
                }
                Err(e) => {
                    tracing::debug!(source = source.name(), error = %e, "source unavailable");
                }
            }
        }

        let output = match chosen {
            Some((index, output)) => {
                if reported.is_none() && output.kind == SourceKind::ListCommand {
                    reported = self.ask_recommenders(index + 1).await;
                }
                output
            }
            None => {
                tracing::warn!("all sources unavailable, showing demo data");
                DemoSource::output()
            }
        };
        build_snapshot(generation, output, reported)
    }

    async fn ask_recommenders(&self, from: usize) -> Option<RecommendedTask> {
        for source in self.sources.iter().skip(from).filter(|s| s.recommends_only()) {
            match source.try_resolve().await {
                Ok(output) if output.recommendation.is_some() => return output.recommendation,
                Ok(_) => {}
                Err(e) => {
                    tracing::debug!(source = source.name(), error = %e, "no recommendation");
                }
            }
        }
        None
    }
}

fn build_snapshot(
    generation: u64,
    output: SourceOutput,
    reported: Option<RecommendedTask>,
) -> Snapshot {
    let progress = output.progress.unwrap_or_else(|| aggregate(&output.tasks));
    let recommendation = match reported {
        Some(task) => Recommendation::Task {
            task,
            origin: RecommendationOrigin::Reported,
        },
        None if output.kind == SourceKind::Demo => Recommendation::Demo(demo_recommendation()),
        None => match recommend(&output.tasks) {
            Some(task) => Recommendation::Task {
                task: RecommendedTask::from_task(task),
                origin: RecommendationOrigin::Computed,
            },
            None => Recommendation::AllComplete,
        },
    };

    Snapshot {
        generation,
        source: output.kind,
        tasks: output.tasks,
        progress,
        recommendation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use crate::io::sources::SourceError;
    use crate::model::task::{Priority, Status, Task};

    struct Fixed(Result<SourceOutput, &'static str>, Arc<AtomicUsize>);

    #[async_trait]
    impl TaskSource for Fixed {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn try_resolve(&self) -> Result<SourceOutput, SourceError> {
            self.1.fetch_add(1, Ordering::SeqCst);
            self.0.clone().map_err(SourceError::Empty)
        }
    }

    /// Stands in for the "next" report
    struct Recommender(Option<&'static str>, Arc<AtomicUsize>);

    #[async_trait]
    impl TaskSource for Recommender {
        fn name(&self) -> &'static str {
            "recommender"
        }

        async fn try_resolve(&self) -> Result<SourceOutput, SourceError> {
            self.1.fetch_add(1, Ordering::SeqCst);
            let id = self.0.ok_or(SourceError::NoRecommendation("next".to_string()))?;
            Ok(SourceOutput {
                kind: SourceKind::NextCommand,
                tasks: vec![],
                progress: None,
                recommendation: Some(RecommendedTask {
                    id: Some(id.to_string()),
                    ..Default::default()
                }),
            })
        }

        fn recommends_only(&self) -> bool {
            true
        }
    }

    fn recommender(id: Option<&'static str>) -> (Box<dyn TaskSource>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (Box::new(Recommender(id, calls.clone())), calls)
    }

    fn pending(id: &str) -> Task {
        Task::new(id, format!("Task {id}"), Status::Pending, Priority::High)
    }

    fn ok(kind: SourceKind, tasks: Vec<Task>) -> Result<SourceOutput, &'static str> {
        Ok(SourceOutput {
            kind,
            tasks,
            progress: None,
            recommendation: None,
        })
    }

    fn fixed(result: Result<SourceOutput, &'static str>) -> (Box<dyn TaskSource>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (Box::new(Fixed(result, calls.clone())), calls)
    }

    #[tokio::test]
    async fn first_source_with_tasks_wins_and_later_ones_are_skipped() {
        let (a, a_calls) = fixed(Err("a"));
        let (b, _) = fixed(ok(
            SourceKind::ListCommand,
            vec![Task::new("1", "One", Status::Pending, Priority::High)],
        ));
        let (c, c_calls) = fixed(ok(SourceKind::Demo, vec![]));
        let snapshot = SourceResolver::new(vec![a, b, c]).resolve(7).await;

        assert_eq!(snapshot.generation, 7);
        assert_eq!(snapshot.source, SourceKind::ListCommand);
        assert_eq!(a_calls.load(Ordering::SeqCst), 1);
        assert_eq!(c_calls.load(Ordering::SeqCst), 0);
        match &snapshot.recommendation {
            Recommendation::Task { task, origin } => {
                assert_eq!(task.id.as_deref(), Some("1"));
                assert_eq!(*origin, RecommendationOrigin::Computed);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn single_done_task_from_file_aggregates_to_full_progress() {
        let (file, _) = fixed(ok(
            SourceKind::TaskFile("tasks.json".into()),
            vec![Task::new("1", "Only", Status::Done, Priority::Medium)],
        ));
        let snapshot = SourceResolver::new(vec![file]).resolve(1).await;
        let counts = snapshot.progress.tasks.counts.unwrap();
        assert_eq!((counts.done, counts.in_progress, counts.pending), (1, 0, 0));
        assert_eq!(snapshot.progress.tasks.percentage, Some(100));
        assert_eq!(snapshot.recommendation, Recommendation::AllComplete);
    }

    #[tokio::test]
    async fn everything_failing_shows_demo_with_indicator() {
        let (a, _) = fixed(Err("file"));
        let (b, _) = fixed(Err("list"));
        let (c, _) = fixed(Err("next"));
        let snapshot = SourceResolver::new(vec![a, b, c, Box::new(DemoSource)])
            .resolve(2)
            .await;
        assert_eq!(snapshot.source, SourceKind::Demo);
        assert_eq!(
            snapshot.tasks.iter().map(|t| t.id.clone()).collect::<Vec<_>>(),
            crate::ops::demo::demo_tasks()
                .into_iter()
                .map(|t| t.id)
                .collect::<Vec<_>>()
        );
        assert!(snapshot.recommendation.is_demo());
    }

    #[tokio::test]
    async fn exhausted_chain_still_yields_demo_data() {
        let (a, _) = fixed(Err("only"));
        let snapshot = SourceResolver::new(vec![a]).resolve(3).await;
        assert_eq!(snapshot.source, SourceKind::Demo);
        assert!(!snapshot.tasks.is_empty());
    }

    #[tokio::test]
    async fn reported_recommendation_survives_fallback() {
        let (a, _) = fixed(Err("file"));
        let next = SourceOutput {
            kind: SourceKind::NextCommand,
            tasks: vec![],
            progress: None,
            recommendation: Some(RecommendedTask {
                id: Some("42".to_string()),
                title: Some("Real work".to_string()),
                ..Default::default()
            }),
        };
        let (b, _) = fixed(Ok(next));
        let snapshot = SourceResolver::new(vec![a, b, Box::new(DemoSource)])
            .resolve(4)
            .await;
        assert_eq!(snapshot.source, SourceKind::Demo);
        match snapshot.recommendation {
            Recommendation::Task { task, origin } => {
                assert_eq!(task.id.as_deref(), Some("42"));
                assert_eq!(origin, RecommendationOrigin::Reported);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn source_reported_progress_is_kept() {
        let mut output = ok(
            SourceKind::ListCommand,
            vec![Task::new("1", "One", Status::Done, Priority::Low)],
        )
        .unwrap();
        output.progress = Some(crate::model::progress::ProjectProgress::unknown());
        let (list, _) = fixed(Ok(output));
        let snapshot = SourceResolver::new(vec![list]).resolve(5).await;
        assert_eq!(snapshot.progress.tasks.percentage, None);
    }

    #[tokio::test]
    async fn list_without_recommendation_asks_the_next_report() {
        let (list, _) = fixed(ok(SourceKind::ListCommand, vec![pending("2"), pending("3")]));
        let (next, next_calls) = recommender(Some("3"));
        let snapshot = SourceResolver::new(vec![list, next, Box::new(DemoSource)])
            .resolve(1)
            .await;

        assert_eq!(next_calls.load(Ordering::SeqCst), 1);
        assert_eq!(snapshot.source, SourceKind::ListCommand);
        match snapshot.recommendation {
            Recommendation::Task { task, origin } => {
                assert_eq!(task.id.as_deref(), Some("3"));
                assert_eq!(origin, RecommendationOrigin::Reported);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn failing_next_report_falls_back_to_computed() {
        let (list, _) = fixed(ok(SourceKind::ListCommand, vec![pending("2"), pending("3")]));
        let (next, next_calls) = recommender(None);
        let snapshot = SourceResolver::new(vec![list, next]).resolve(1).await;

        assert_eq!(next_calls.load(Ordering::SeqCst), 1);
        match snapshot.recommendation {
            Recommendation::Task { task, origin } => {
                assert_eq!(task.id.as_deref(), Some("2"));
                assert_eq!(origin, RecommendationOrigin::Computed);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn list_recommendation_and_task_file_skip_the_next_report() {
        let mut output = ok(SourceKind::ListCommand, vec![pending("2")]).unwrap();
        output.recommendation = Some(RecommendedTask {
            id: Some("2".to_string()),
            ..Default::default()
        });
        let (list, _) = fixed(Ok(output));
        let (next, next_calls) = recommender(Some("9"));
        SourceResolver::new(vec![list, next]).resolve(1).await;
        assert_eq!(next_calls.load(Ordering::SeqCst), 0);

        let (file, _) = fixed(ok(SourceKind::TaskFile("tasks.json".into()), vec![pending("2")]));
        let (next, next_calls) = recommender(Some("9"));
        SourceResolver::new(vec![file, next]).resolve(1).await;
        assert_eq!(next_calls.load(Ordering::SeqCst), 0);
    }
}
