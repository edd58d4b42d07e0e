pub mod app;
pub mod format;
pub mod input;
pub mod refresh;
pub mod render;
pub mod theme;
pub mod view_model;
pub mod viewport;

pub use app::run;
