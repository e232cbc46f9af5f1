pub mod announcement;

pub use announcement::{Announcement, CreateAnnouncement, Priority};
