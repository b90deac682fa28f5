//! Recommendation engine.
//!
//! Threshold rules over holdings and assets: cash drag, per-type
//! concentration, and short-term lots about to turn long-term. Every rule is
//! a pure function of the supplied data.

mod recommendations_engine;
mod recommendations_model;
mod recommendations_traits;
pub mod rules;


pub use recommendations_engine::RecommendationEngine;
pub use recommendations_model::{
    Recommendation, RecommendationConfig, RecommendationType, Severity,
};
pub use recommendations_traits::{RecommendationContext, RecommendationRule};
