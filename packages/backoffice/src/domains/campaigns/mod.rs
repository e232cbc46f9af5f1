pub mod models;

pub use models::{Campaign, CreateCampaign};
