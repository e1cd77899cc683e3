pub mod config;
pub mod error;
pub mod io;
pub mod nav;
pub mod paths;
pub mod resolver;
pub mod stage_def;
pub mod theme;
pub mod transition;
pub mod types;
pub mod user;

pub use error::{OnboardError, Result};
