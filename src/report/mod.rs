//! Server-rendered dashboard pages.

pub mod dashboard;

pub use dashboard::{render_dashboard, render_index};
