//! Call-center quality dashboard: filter store, feedback aggregation,
//! display formatting and the Leptos views built on them.

pub mod api;
pub mod app;
pub mod components;
pub mod config;
pub mod error;
pub mod feedback;
pub mod filters;
pub mod format;
mod lenient;
pub mod logging;
pub mod pages;
pub mod session;
pub mod sync;
