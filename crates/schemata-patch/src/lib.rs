//! Patch generation for Schemata.
//!
//! Turns the coalesced changes between two schema tree snapshots into an
//! ordered RFC 6902 patch that transforms the base schema document into the
//! current one, then appends default-value data operations for newly added
//! fields.
//!
//! # Key Types
//!
//! - [`PatchOperation`] / [`PatchBuilder`] -- Validated add/remove/replace/move operations
//! - [`PatchGenerator`] -- Ordered schema operations from coalesced changes
//! - [`PatchEnricher`] -- Default-value data operations for added nodes
//! - [`SchemaPatcher`] / [`PatchConfig`] -- The configured pipeline
//! - [`Patch`] -- The output artifact

pub mod apply;
pub mod builder;
pub mod config;
pub mod engine;
pub mod enricher;
pub mod error;
pub mod generator;
pub mod operation;
pub mod order;
pub mod patch;

pub use apply::{apply_operation, apply_patch, apply_to_tree};
pub use builder::PatchBuilder;
pub use config::PatchConfig;
pub use engine::{compute_patch, SchemaPatcher};
pub use enricher::PatchEnricher;
pub use error::{PatchError, PatchResult};
pub use generator::PatchGenerator;
pub use operation::{OperationKind, PatchOperation};
pub use patch::Patch;
