//! Owner-scoped notes API with on-demand AI summaries.
//!
//! Requests pass the access gate ([`auth`]) before the [`summarizer`] picks a
//! provider adapter and makes a single outbound call.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod store;
pub mod summarizer;
