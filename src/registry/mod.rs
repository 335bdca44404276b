//! # Registry Module
//!
//! The seam to the external procedure registry: parameter validation,
//! invocation, and result validation, all keyed by procedure name. The
//! bundled [`InMemoryRegistry`] is a startup-built lookup table from name to
//! a typed descriptor (compiled JSON Schemas plus an invoker function) — no
//! reflection or string-based dispatch happens at call time beyond the single
//! map lookup.

mod core;

pub use core::{InMemoryRegistry, Invoker, ProcedureRegistry};
