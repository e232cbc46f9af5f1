pub mod reconcile;

pub use reconcile::{reconcile_all, reconcile_expired, settle};
