//! Gneiss Core - bounded-concurrency batch job engine.
//!
//! This crate provides the core batch functionality for Gneiss:
//! - Adaptive worker-pool sizing from host resource signals
//! - Input validation with partial-skip semantics
//! - Deterministic output derivation with skip-existing idempotence
//! - Fan-out/fan-in dispatch with per-item error isolation
//!
//! # Example
//!
//! ```rust,no_run
//! use gneiss_core::{BatchEngine, BatchOptions, FsByteStore};
//!
//! #[tokio::main]
//! async fn main() -> gneiss_core::Result<()> {
//!     let engine = BatchEngine::new(FsByteStore);
//!     let items = vec!["photos/a.png".into(), "photos/b.png".into()];
//!     let options = BatchOptions { output_dir: Some("out".into()), ..BatchOptions::default() };
//!     let report = engine.run(&items, Ok, &options).await?;
//!     println!("{} succeeded", report.summary.succeeded);
//!     Ok(())
//! }
//! ```

pub mod batch;
pub mod error;

pub use batch::{
    ArtifactStore, BatchEngine, BatchError, BatchOptions, BatchReport, BatchSummary, FsByteStore,
    ItemResult, JobError, JobErrorKind, ProgressCallback, SizerConfig,
};
pub use error::{GneissError, Result};
