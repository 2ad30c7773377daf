//! notecheck - conformance harness library for a note-taking CLI
//!
//! Exposes the harness building blocks so the binaries and the
//! integration tests can drive them directly: the profile codec, the
//! schema/invariant validators, the comparators, the command runner and
//! the suite runner.

#![forbid(unsafe_code)]

pub mod cli;
pub mod codec;
pub mod compare;
pub mod constants;
pub mod exec;
pub mod models;
pub mod output;
pub mod suite;
pub mod validate;
