pub mod process_selector;
pub mod settings;
pub mod usage_view;
