pub mod deps;

pub use deps::BackofficeDeps;
