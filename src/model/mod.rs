pub mod config;
pub mod progress;
pub mod recommendation;
pub mod snapshot;
pub mod task;

pub use config::*;
pub use progress::*;
pub use recommendation::*;
pub use snapshot::*;
pub use task::*;
