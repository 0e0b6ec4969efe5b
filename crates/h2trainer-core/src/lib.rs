//! h2trainer-core: Question bank, quiz engine, grading and recommendations.
//!
//! This crate defines the question model, loads and validates question banks,
//! drives a quiz session, and derives the results (score, pass/fail,
//! topic recommendations) that the report and CLI crates consume.

pub mod bank;
pub mod engine;
pub mod error;
pub mod grading;
pub mod model;
pub mod recommend;
pub mod session;
pub mod tips;
