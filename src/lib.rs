// src/lib.rs

pub mod config;
pub mod core;
pub mod errors;
pub mod evaluation;
pub mod learning;
pub mod persistence;
pub mod report;
pub mod run;

pub use crate::config::RunConfig;
pub use crate::core::engine::{EngineSettings, ModelState, SegmentationEngine};
pub use crate::errors::{Result, WordbreakError};
pub use crate::run::SegmentationRun;
