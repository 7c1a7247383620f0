//! AI face reader: a Gemini-backed proxy that reads a face photo three ways
//! (face-reading report, celebrity look-alike, compatibility match), plus the
//! client and UI state used to drive it.

pub mod client;
pub mod config;
pub mod encoder;
pub mod gemini;
pub mod messages;
pub mod mode;
pub mod offline_cache;
pub mod presentation;
pub mod prompts;
pub mod proxy;
pub mod render;
pub mod result;
pub mod server;

pub use client::{AnalysisClient, Analyzer, ClientError};
pub use config::{Config, ConfigError};
pub use messages::Locale;
pub use mode::AnalysisMode;
pub use presentation::{AnalysisState, Session};
pub use proxy::{ProxyError, ProxyService};
pub use result::AnalysisResult;
