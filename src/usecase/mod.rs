pub mod login_usecase;
pub mod password_recovery_usecase;
pub mod register_user_usecase;
