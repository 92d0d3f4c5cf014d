pub use crate::diagnostics::{HarnessError, HarnessResult};

pub mod case;
pub mod cli;
pub mod config;
pub mod definition;
pub mod diagnostics;
pub mod executor;
pub mod header;
pub mod registry;
pub mod report;
pub mod suite;
pub mod validators;
