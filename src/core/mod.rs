pub mod engine;
pub mod normalizer;
pub mod types;
