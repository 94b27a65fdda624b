#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod cli;
pub mod components;
pub mod headless;
pub mod metrics;
pub mod model;
pub mod notify;
pub mod process;
pub use app::UsageApp;
pub use model::UsageModel;
