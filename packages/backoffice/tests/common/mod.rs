#![allow(dead_code)]

// Common test utilities

pub mod contention;
pub mod fixtures;
pub mod harness;

#[allow(unused_imports)]
pub use fixtures::*;
pub use contention::*;
pub use harness::*;
