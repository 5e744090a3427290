//! Rehashes staged plain passwords when users are saved.
//!
//! [`listener::password_hash_listener::PasswordHashListener`] hooks into the
//! pre-insert and pre-update steps of the persistence layer, encodes the new
//! password with the salt of the user and erases the transient secrets.

pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod listener;
pub mod usecase;

#[cfg(test)]
mod test_support;
