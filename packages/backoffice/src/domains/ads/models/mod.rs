pub mod ad;

pub use ad::{Ad, CreateAd};
