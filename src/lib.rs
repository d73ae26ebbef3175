//! Terminal admin console for the email service.
//!
//! - `mail`: email log entries, the filter query language and sorting
//! - `compose`: test email form, validation and timezone conversion
//! - `service`: blocking HTTP client for the email service
//! - `app`: console state and the commands the key loop dispatches to
//! - `ui`: ratatui renderers
//! - `config`, `logging`: ambient setup

pub mod app;
pub mod compose;
pub mod config;
pub mod logging;
pub mod mail;
pub mod service;
pub mod ui;
