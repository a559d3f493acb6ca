//! streelity - request pipelines for a location-services backend
//!
//! Handlers for ATMs, fuel stations, toilets and maintenance points all
//! validate their input the same way: build a tree of [`Stage`]s over the
//! request [`Params`], run it through a [`Pipeline`], and read the typed
//! values it produced before touching the store or the spatial index.
//!
//! # Modules
//!
//! - `pipeline`: stages, the field store and the executor
//! - `params`: request parameters and required/parse helpers
//! - `stages`: validation stages shared across resources
//! - `config`, `error`, `logger`: ambient plumbing

pub mod config;
pub mod error;
pub mod logger;
pub mod params;
pub mod pipeline;
pub mod stages;

pub use config::PipelineConfig;
pub use error::{StreelityError, StreelityResult};
pub use params::Params;
pub use pipeline::{FieldStore, FieldValue, Pipeline, PipelineStage, Record, Stage};
