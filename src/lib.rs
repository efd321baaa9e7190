//! Activity sign-up server
//!
//! Serves the extracurricular activity catalog over HTTP: a JSON API for
//! listing activities and managing sign-ups, plus the static sign-up page.

pub mod api;
pub mod catalog;
pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
