//! Common types and utilities for the goindex whole-program analyzer.
//!
//! This crate provides foundational types used across the input and core
//! crates:
//! - Source spans and line/column positions (`Span`, `Position`, `Location`)
//! - Diagnostic categories and messages (`Diagnostic`, `DiagnosticCategory`)
//! - Centralized limits and thresholds
//! - `tracing` subscriber setup shared by the CLI and tests

pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticCategory};

pub mod span;
pub use span::{Position, Span};

pub mod limits;

pub mod trace;
