//! tutor-core — Scoring evaluator, rubrics, and assistant orchestration.
//!
//! This crate defines the data model, the playbook scoring logic, the
//! provider trait used for hints and solutions, and the mock terminal.

pub mod assistant;
pub mod error;
pub mod model;
pub mod parser;
pub mod scoring;
pub mod terminal;
pub mod traits;

pub use model::{Check, EvaluationResult, HintMode, Rubric};
pub use scoring::evaluate;
