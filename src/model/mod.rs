pub mod commands;
pub mod event;
pub mod participant;
pub mod role;
pub mod types;
