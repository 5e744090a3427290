pub mod password_hash_listener;
