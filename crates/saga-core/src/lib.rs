//! Core types for repo-saga.
//!
//! Provides the codebase map model ([`graph::Graph`]), narrative panels
//! ([`script::Script`]), starter tasks, the aggregated [`bundle::SagaBundle`]
//! handed to the presentation layer, configuration, and the static demo
//! [`fallback`] bundle.

pub mod bundle;
pub mod config;
pub mod fallback;
pub mod graph;
pub mod script;
pub mod tasks;
