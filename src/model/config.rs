use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

/// Configuration from `.tmon.toml`. Every key is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonitorConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub ui: UiConfig,
    /// Where tracing output goes while the TUI owns the terminal
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Candidate structured task files, first existing one wins
    #[serde(default = "default_task_files")]
    pub task_files: Vec<PathBuf>,
    /// External task tool binary
    #[serde(default = "default_program")]
    pub program: String,
    #[serde(default = "default_list_timeout")]
    pub list_timeout_secs: u64,
    #[serde(default = "default_lookup_timeout")]
    pub lookup_timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig {
            task_files: default_task_files(),
            program: default_program(),
            list_timeout_secs: default_list_timeout(),
            lookup_timeout_secs: default_lookup_timeout(),
        }
    }
}

impl SourceConfig {
    pub fn list_timeout(&self) -> Duration {
        Duration::from_secs(self.list_timeout_secs)
    }

    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.lookup_timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,
    /// Title column width in the task list
    #[serde(default = "default_title_width")]
    pub title_width: usize,
    /// Hex overrides for theme colors, e.g. `highlight = "#FB4196"`
    #[serde(default)]
    pub colors: HashMap<String, String>,
    #[serde(default = "default_true")]
    pub mouse: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            refresh_interval_secs: default_refresh_interval(),
            title_width: default_title_width(),
            colors: HashMap::new(),
            mouse: true,
        }
    }
}

impl UiConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs.max(1))
    }
}

fn default_task_files() -> Vec<PathBuf> {
    vec![
        PathBuf::from(".taskmaster/tasks/tasks.json"),
        PathBuf::from("tasks/tasks.json"),
        PathBuf::from("tasks.json"),
    ]
}

fn default_program() -> String {
    "task-master".to_string()
}

fn default_list_timeout() -> u64 {
    10
}

fn default_lookup_timeout() -> u64 {
    5
}

fn default_refresh_interval() -> u64 {
    30
}

fn default_title_width() -> usize {
    60
}

fn default_true() -> bool {
    true
}
