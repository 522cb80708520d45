// src/lib.rs
pub mod environment;
pub mod error;
pub mod extractor;
pub mod fetcher;
pub mod models;
pub mod normalizer;
pub mod notion;
pub mod pipeline;
pub mod sanitizer;
pub mod web;

pub use environment::AppConfig;
pub use error::PipelineError;
pub use models::JobData;
pub use web::start_web_server;
