//! Archival domain - derived, time-triggered archive deadlines
//!
//! `archive_at` is a pure function of an item's domain date. Nothing runs on
//! a timer: expiry is evaluated whenever an item is read, and approved items
//! past their deadline are archived at that moment. An item nobody reads
//! keeps showing `approved` in storage until the next read or a forced
//! `reconcile_expired`.

pub mod activities;
pub mod scheduler;

pub use activities::{reconcile_all, reconcile_expired, settle};
pub use scheduler::{compute_archive_at, is_expired, ArchivalPolicy};
