//! Generative-model moment discovery.
//!
//! This crate turns a video reference (and optionally a free-text
//! instruction) into validated [`clipscout_models::MomentRecord`]s by
//! prompting a Gemini model and recovering structured output from its
//! free-form text response.
//!
//! The two discovery paths fail differently on purpose: bulk discovery
//! degrades to a canned fallback list because it is often the first
//! interaction of a session, while targeted discovery surfaces a typed
//! error because a generic answer to a specific request is worse than a
//! visible failure.

pub mod config;
pub mod gemini;
pub mod prompt;
pub mod response;
pub mod service;

pub use config::{GeminiConfig, SamplingParams};
pub use gemini::{GeminiClient, GeminiError};
pub use response::{extract_json, UnparsableResponse};
pub use service::{DiscoveryError, MomentDiscoveryService};
