//! # Precheck Module
//!
//! Per-route preconditions evaluated before the dispatch pipeline runs. A
//! precheck returning a response terminates the request without the bound
//! procedure ever being invoked.

mod core;

pub use core::{evaluate, FnPrecheck, Precheck};
