pub mod config;
pub mod core;
pub mod error;
pub mod persistence;
pub mod render;

pub use crate::core::engine::StudyEngine;
pub use crate::error::{Result, StudyError};
