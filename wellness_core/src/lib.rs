#![forbid(unsafe_code)]

//! Core domain model and request handling for the wellness calculators.
//!
//! This crate provides:
//! - Domain types (metric inputs, categories, recommendation keys)
//! - Metric normalization from raw request payloads
//! - Classifiers (BMI, lung health, diet intake, recovery)
//! - Recommendation resolution against a record store
//! - Response envelopes and endpoint handlers
//! - Record stores (in-memory, JSONL) and question import

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod normalize;
pub mod bmi;
pub mod lung;
pub mod diet;
pub mod recovery;
pub mod store;
pub mod jsonl;
pub mod resolver;
pub mod envelope;
pub mod questions;
pub mod accounts;
pub mod handlers;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use store::{MemoryStore, Record, RecordSink, RecordStore};
pub use jsonl::JsonlStore;
pub use resolver::{resolve, resolve_diet_report, DietReport, FALLBACK_TEXT};
pub use envelope::{Cors, Envelope};
pub use accounts::{LogNotifier, Notification, Notifier};
