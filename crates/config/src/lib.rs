// Configuration loading

pub mod settings;

pub use settings::{expand_home, Overrides, Settings, DEFAULT_OUTPUT_NAME};
