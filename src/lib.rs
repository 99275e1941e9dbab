// Library exports for testing
pub mod accuracy;
pub mod config;
pub mod constants;
pub mod matcher;
pub mod normalizer;
pub mod report;
pub mod text_diff;
