//! Task Reminder Service Library
//!
//! This module exports the core components for testing and integration.

pub mod config;
pub mod db;
pub mod error;
pub mod notify;
pub mod scanner;
pub mod types;
