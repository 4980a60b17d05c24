//! Deterministic keyword matching of resumes against role requirements.

pub mod aggregate;
pub mod engine;
pub mod handlers;
pub mod models;
pub mod normalize;
pub mod requirements;
pub mod scorers;
pub mod terms;
