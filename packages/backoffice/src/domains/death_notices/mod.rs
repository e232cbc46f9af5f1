pub mod models;

pub use models::{CreateDeathNotice, DeathNotice};
