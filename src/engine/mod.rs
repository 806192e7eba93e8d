//! Evaluation engine.
//!
//! Provides rule group orchestration, result accumulation, and the
//! ordering shared by every renderer.

pub mod order;
pub mod orchestrator;
pub mod result;
