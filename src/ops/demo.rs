use crate::model::recommendation::RecommendedTask;
use crate::model::task::{Priority, Status, Task};

/// Demonstration tasks shown when no real source is available
pub fn demo_tasks() -> Vec<Task> {
    [
        ("1", "Improve Website UI", Status::Done, Priority::High),
        ("2", "Optimize Database", Status::Done, Priority::Medium),
        ("3", "Write API Documentation", Status::InProgress, Priority::Low),
        ("4", "Write Test Code", Status::InProgress, Priority::High),
        ("5", "Create Deployment Script", Status::InProgress, Priority::Medium),
        ("6", "Security Review", Status::Pending, Priority::High),
        ("7", "Performance Optimization", Status::Pending, Priority::Medium),
        ("8", "Write User Manual", Status::Pending, Priority::Low),
        ("19", "Implement Monitoring System", Status::Pending, Priority::Medium),
    ]
    .into_iter()
    .map(|(id, title, status, priority)| Task::new(id, title, status, priority))
    .collect()
}

/// The recommendation paired with the demonstration tasks
pub fn demo_recommendation() -> RecommendedTask {
    RecommendedTask {
        id: Some("19".to_string()),
        title: Some("Implement Monitoring System".to_string()),
        priority: Some(Priority::Medium),
        status: Some(Status::Pending),
        dependencies: Some("18".to_string()),
        description: Some(
            "Create a monitoring and alerting system to track system health, performance, and critical errors."
                .to_string(),
        ),
        complexity: Some("8".to_string()),
    }
}
