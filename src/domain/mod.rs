pub mod error;
pub mod events;
pub mod models;
pub mod repositories;
pub mod services;
