pub mod coordinator;
pub mod service;
pub mod transfer;
