pub mod unit_of_work;
pub mod user_repository;
