//! # Router Module
//!
//! Route declaration and resolution. Patterns are plain regular expressions
//! with capture groups, anchored at both ends and tried in declaration order;
//! the first full-path match wins and its capture groups become the initial
//! pipeline arguments.
//!
//! There is no routing DSL beyond pattern + capture groups: a route table is
//! an ordered `Vec<Route>` declared by the host.

mod core;

pub use core::{Route, RouteArgs, Router, MAX_INLINE_ARGS};
