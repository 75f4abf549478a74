pub mod handler;
pub mod registry;
pub mod store;
