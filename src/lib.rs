//! Inbox viewer for an HTTP email-listing service.
//!
//! [`controller`] owns the view state and talks to an [`api::InboxApi`];
//! [`format`] turns raw fields into display strings; [`terminal`] is the TUI.

pub mod api;
pub mod config;
pub mod controller;
pub mod domain;
pub mod format;
pub mod terminal;
