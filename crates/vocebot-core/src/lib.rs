//! Core domain + application logic for vocebot.
//!
//! This crate is intentionally framework-agnostic. Telegram lives behind the
//! `MessagingPort` trait implemented in the adapter crate, so the policy
//! evaluator and the settings manager can be tested without a network.

pub mod commands;
pub mod domain;
pub mod errors;
pub mod formatting;
pub mod logging;
pub mod manager;
pub mod messaging;
pub mod moderation;
pub mod policy;
pub mod scheduler;
pub mod settings;
pub mod ui;

pub use errors::{Error, Result};
