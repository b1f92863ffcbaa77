//! greenbench-core - Shared types, normalization and rendering for greenbench
//!
//! This crate contains WASM-compatible code that is shared between
//! the CLI and the dashboard.
//!
//! # Features
//!
//! - Normalize benchmark service responses (tolerating every known log shape)
//! - Bounded result history on top of any key/value store
//! - Dual-axis CPU/memory chart as pure draw commands, with hover lookup
//! - Energy and carbon figures derived from a result
//! - eGRID region and CPU power presets for submissions
//! - Dashboard state machine shared by every front end

pub mod chart;
pub mod controller;
pub mod cpu_models;
pub mod data;
pub mod error;
pub mod events;
pub mod history;
pub mod metrics;
pub mod normalize;
pub mod regions;
pub mod svg;
pub mod validation;
pub mod views;

pub use chart::{hover_at, render, ChartData, ChartSurface, DrawCommand, HoverPoint};
pub use controller::{Dashboard, ViewState};
pub use cpu_models::{find_cpu_model, CpuModel, CPU_MODELS};
pub use data::{
    BenchmarkResult, FormData, HistoryEntry, PowerAssumptions, RunMetrics, Sample,
    SubmissionContext, SubmissionRequest,
};
pub use error::{Error, Result};
pub use events::{BenchmarkUpdated, Notifier, Subscription};
pub use history::{HistoryStore, MemoryStore, StateStore};
pub use normalize::{extract_logs, normalize, LogSource};
pub use regions::{find_region, GridRegion, DEFAULT_REGION, EGRID_REGIONS};
pub use views::Tab;
