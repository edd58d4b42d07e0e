pub mod command;
pub mod config_io;
pub mod sources;
pub mod task_file;
pub mod watcher;
