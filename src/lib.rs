//! Per-species least-squares fits of sepal length against petal length,
//! rendered as PNG scatter plots.
//!
//! ```text
//!  loader → filter (per species) → regression → plot
//! ```

pub mod app;
pub mod cli;
pub mod color;
pub mod config;
pub mod data;
pub mod fonts;
pub mod plot;
pub mod regression;
