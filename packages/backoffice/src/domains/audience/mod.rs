//! Audience domain - who an announcement is meant to reach
//!
//! Resolves an `AudienceDescriptor` into an estimated recipient count at
//! authoring time and into a visibility predicate at read time, both in
//! memory and pushed down into listing SQL.

pub mod models;

pub use models::{
    push_visibility_predicate, AudienceDescriptor, AudienceEstimates, TargetType, Viewer,
};
