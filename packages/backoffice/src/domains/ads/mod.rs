pub mod models;

pub use models::{Ad, CreateAd};
