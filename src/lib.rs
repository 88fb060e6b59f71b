//! Mindstone - self-assessment quiz engine
//!
//! A six-question intake classifies the user into one of six
//! psychological-state archetypes; an optional 50-item extended
//! questionnaire collects answers page by page with per-user
//! auto-save and resume. This library exposes the scoring and
//! session-progression core for the `mindstone` binary and for
//! integration testing.

pub mod answers;
pub mod auth;
pub mod config;
pub mod content;
pub mod extended;
pub mod logging;
pub mod persistence;
pub mod report;
pub mod scoring;
pub mod session;
pub mod ui;
