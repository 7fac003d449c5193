//! Application layer - wires infrastructure into the generation use case

pub mod generate_provider;

pub use generate_provider::GenerateProviderUseCase;
