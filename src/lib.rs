//! providergen generates Terraform provider resources, data sources and
//! documentation stubs from a Vault OpenAPI document.
//!
//! The crate is layered the same way top to bottom:
//! - [`application`] wires concrete adapters into the generation use case
//! - [`generation`] holds the domain: endpoint selection, parameter
//!   resolution, naming and the pipeline, with rendering and output behind
//!   ports
//! - [`infrastructure`] implements those ports with the filesystem and Tera
//! - [`core`] provides errors, configuration and path helpers
//!
//! ```no_run
//! use providergen::application::GenerateProviderUseCase;
//! use providergen::core::Config;
//! use std::path::Path;
//!
//! # fn main() -> providergen::core::Result<()> {
//! let use_case = GenerateProviderUseCase::from_config(&Config::default())?;
//! let report = use_case.execute(Path::new("openapi.json"))?;
//! println!("wrote {} files", report.written.len());
//! # Ok(())
//! # }
//! ```
#![deny(unsafe_code)]

pub mod application;
pub mod core;
pub mod generation;
pub mod infrastructure;
