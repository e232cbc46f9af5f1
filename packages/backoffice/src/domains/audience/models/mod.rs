pub mod descriptor;
pub mod predicate;

pub use descriptor::*;
pub use predicate::push_visibility_predicate;
