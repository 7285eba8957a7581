//! Core library for the `serprobe` CLI.
//!
//! This crate provides the internal building blocks used by the binary: CLI
//! argument types, the target catalog, request execution and dispatch,
//! response classification, metrics aggregation, and output sinks. The
//! primary user-facing interface is the `serprobe` command-line application;
//! library APIs may evolve as the CLI grows.
pub mod app;
pub mod args;
pub mod classify;
pub mod clock;
pub mod config;
pub mod error;
pub mod http;
pub mod metrics;
pub mod sinks;
pub mod system;
