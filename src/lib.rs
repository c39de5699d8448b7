//! ocr-router - health-aware orchestrator for OCR backends
//!
//! Accepts image and PDF uploads, forwards them to one registered OCR backend
//! (or all of them in compare mode) and returns a single normalized result
//! shape regardless of which backend family produced it.
//!
//! The pieces, bottom-up:
//!
//! - [`registry`] - static backend descriptors, fixed at startup
//! - [`transport`] - the HTTP seam used for probes and OCR calls
//! - [`health`] - background probing with debounced status transitions
//! - [`normalize`] - per-family reshaping into [`normalize::UnifiedResult`]
//! - [`routing`] - selection, health gating, timeout and compare fan-out
//! - [`api`] - the axum surface

pub mod api;
pub mod cli;
pub mod config;
pub mod health;
pub mod logging;
pub mod metrics;
pub mod normalize;
pub mod registry;
pub mod routing;
pub mod transport;
