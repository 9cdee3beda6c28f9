//! documind - chat with your documents from the command line
//!
//! This crate provides:
//! - A typed HTTP client for the DocuMind document QA backend
//! - The client-side conversation and corpus state machine
//! - CLI commands for uploading, scoping, and asking

pub mod backend;
pub mod commands;
pub mod config;
pub mod corpus;
pub mod error;
pub mod session;
pub mod transcript;

pub use config::Config;
pub use error::{Error, Result};
