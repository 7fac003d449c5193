//! OpenAPI loading implementations

pub mod file_loader;
pub mod parser;

pub use file_loader::FileSpecLoader;
pub use parser::OpenApiParser;
