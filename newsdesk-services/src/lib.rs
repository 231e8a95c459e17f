//! Orchestration services for the team newsdesk
//!
//! This crate provides the service layer on top of `newsdesk-feed`:
//! the aggregation pipeline that produces one ordered, deduplicated,
//! classified [`newsdesk_core::NewsCollection`]; a TTL cache owned by the
//! host; and the optional batched remote-model classification pass.

pub mod aggregator;
pub mod ai_classifier;
pub mod cache;

pub use aggregator::{AggregatorConfig, NewsAggregator};
pub use ai_classifier::{AiClassifier, AiClassifierConfig};
pub use cache::NewsCache;
