pub mod backend;
pub mod memory;
pub mod mongodb;
pub mod store;
