//! Staged request-processing pipeline
//!
//! Handlers validate and extract request input through a tree of stages
//! before running any business logic. Each stage is a closure over the
//! request that returns a [`Record`] of named values (or an error). The
//! [`Pipeline`] runs the tree depth-first, stops at the first error, and
//! collects every contributed value into a [`FieldStore`] that the handler
//! then reads by name.
//!
//! # Example
//! ```
//! use streelity::params::Params;
//! use streelity::pipeline::{Pipeline, Record, Stage};
//!
//! let params = Params::from_query("id=42");
//!
//! let stage = Stage::new(|| {
//!     let id = params.required_int("id")?;
//!     Ok::<_, streelity::StreelityError>(Record::new().with("Id", id))
//! });
//!
//! let mut pipeline = Pipeline::builder("upvote").first(stage).build();
//! pipeline.run()?;
//!
//! assert_eq!(pipeline.get_int_first_or_default("Id"), 42);
//! # Ok::<(), streelity::StreelityError>(())
//! ```

pub mod context;
pub mod core;
pub mod executor;
pub mod value;

// Re-export main types
pub use context::FieldStore;
pub use core::{PipelineResult, PipelineStage, Stage, StageResult};
pub use executor::{Pipeline, PipelineBuilder};
pub use value::{FieldKind, FieldValue, IntoRecord, Record};
