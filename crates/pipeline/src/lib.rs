//! `ventas-pipeline`: sales consolidation engine.
//!
//! Pure engine crate: receives sheets already read from disk, returns the
//! consolidated rows plus a run summary. No CLI or file IO.

pub mod engine;
pub mod error;
pub mod filter;
pub mod homologate;
pub mod load;
pub mod model;
pub mod normalize;
pub mod reference;
pub mod remap;
pub mod schema;
pub mod text;

pub use engine::run;
pub use error::PipelineError;
pub use load::{load_sources, SheetSource};
pub use model::{Outcome, RawSheet, RawValue, RunSummary, SalesRecord, StopReason};
