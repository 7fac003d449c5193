//! Generation domain module - turns a parsed specification into artifacts
//!
//! The pipeline selects eligible endpoints, merges and validates their
//! parameters, derives identifiers from their paths, then renders and writes
//! one code artifact plus an optional doc stub per endpoint. Rendering and
//! persistence sit behind the ports in [`traits`].

pub mod context;
pub mod filter;
pub mod naming;
pub mod orchestrator;
pub mod resolver;
pub mod sanitizers;
pub mod traits;
pub mod types;

pub use context::*;
pub use filter::{EligibilityPolicy, Selection};
pub use naming::DerivedNames;
pub use orchestrator::*;
pub use traits::*;
pub use types::*;
