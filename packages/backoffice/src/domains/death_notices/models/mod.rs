pub mod death_notice;

pub use death_notice::{CreateDeathNotice, DeathNotice};
