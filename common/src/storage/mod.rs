pub mod index;
pub mod registry;
pub mod types;
