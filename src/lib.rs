pub mod config;
pub mod domain;
pub mod error;
pub mod orchestration;
pub mod resolver;
pub mod scheme;
pub mod source;
pub mod ui;

pub use error::{BumperError, Result};
pub use orchestration::{BumpPlan, Bumper};
