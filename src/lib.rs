// Library target exists for integration tests and benchmarks.
// The binary entry point is main.rs; this file re-declares the core module
// tree so that tests can import types via `neonquiz::session::*` etc.
// Some items are only exercised through the binary, so suppress dead_code warnings.
#![allow(dead_code)]

pub mod config;
pub mod content;
pub mod session;
pub mod store;
