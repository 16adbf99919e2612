//! VM Studio: generation orchestration and session state for AI fashion
//! styling photos.
//!
//! The engine composes pose-specific prompts, fans generation requests out
//! to the Gemini image service, classifies the results and records
//! successful batches as browsable sessions.

pub mod config;
pub mod db;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod gemini;
pub mod images;
pub mod models;
pub mod paths;
pub mod poses;
pub mod prompts;
pub mod request;
pub mod state;
pub mod store;
