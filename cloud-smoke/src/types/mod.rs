/// Environment configuration for different deployment stages
pub mod environment;

pub use environment::Environment;
