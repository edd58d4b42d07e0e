pub mod demo;
pub mod progress;
pub mod recommend;
pub mod resolve;
