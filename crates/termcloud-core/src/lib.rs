//! Termcloud Core — error type, engine configuration, request/result model.

pub mod config;
pub mod error;
pub mod types;

pub use config::EngineConfig;
pub use error::{Error, Result};
pub use types::{
    AnalysisMode, DateRange, SentimentTag, TenantInfo, WordCloudRequest, WordCloudResult,
    WordRecord,
};
