pub mod cleanup;
pub mod env_init;
pub mod errors;
pub mod manifest;
pub mod project;
pub mod readme;
pub mod report;
pub mod server;
pub mod tracker;
