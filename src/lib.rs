//! Terminal dashboard for a remote credential vault.
//!
//! The session state lives in [`dashboard::Dashboard`]; [`view`] projects it
//! into a screen model and [`ui`] draws that with ratatui. Network calls go
//! through the [`api::CredentialApi`] trait.

pub mod api;
pub mod app;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod filter;
pub mod guard;
pub mod logging;
pub mod modal;
pub mod models;
pub mod reveal;
pub mod store;
pub mod strength;
pub mod sync;
pub mod ui;
pub mod view;
