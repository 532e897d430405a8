pub mod connection;
pub mod repositories;
