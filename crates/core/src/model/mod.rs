pub mod config;
pub mod value;

pub use config::{ConfigError, MomentumConfig, PickerConfig};
pub use value::{PickerValue, ValueError, ValueList};
