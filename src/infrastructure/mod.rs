pub mod argon2_password_encoder;
pub mod encoder_factory;
pub mod entity;
pub mod in_memory_user_repository;
pub mod lifecycle_dispatcher;
pub mod tracking_unit_of_work;
pub mod user_repository;
