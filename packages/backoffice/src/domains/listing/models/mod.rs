pub mod filter;
pub mod query;

pub use filter::{ListFilter, Sort, SortDirection, SortKey};
