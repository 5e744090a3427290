use argon2::{
    Algorithm, Argon2, Params, PasswordHash as Argon2Hash, Version,
    password_hash::{PasswordHasher as Argon2Hasher, PasswordVerifier, SaltString},
};

use crate::{
    config::EncoderConfig,
    domain::{
        error::DomainError, models::credential::HashedPassword,
        services::password_service::PasswordEncoder,
    },
};

// salt bytes accepted by argon2 and by the PHC salt encoding
const MIN_SALT_LEN: usize = 8;
const MAX_SALT_LEN: usize = 48;

/// Argon2id encoder producing PHC strings salted with the entity salt
#[derive(Clone)]
pub struct Argon2PasswordEncoder {
    argon2: Argon2<'static>,
    min_password_length: usize,
}

impl Argon2PasswordEncoder {
    pub fn new(config: &EncoderConfig) -> Result<Self, DomainError> {
        let params = Params::new(
            config.memory_cost_kib,
            config.iterations,
            config.parallelism,
            None,
        )
        .map_err(|e| DomainError::Encoding(e.to_string()))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
            min_password_length: config.min_password_length,
        })
    }
}

impl Default for Argon2PasswordEncoder {
    fn default() -> Self {
        Self {
            argon2: Argon2::default(),
            min_password_length: EncoderConfig::default().min_password_length,
        }
    }
}

impl PasswordEncoder for Argon2PasswordEncoder {
    fn encode_password(&self, raw: &str, salt: &str) -> Result<HashedPassword, DomainError> {
        // Validate password strength
        if raw.chars().count() < self.min_password_length {
            return Err(DomainError::WeakPassword(self.min_password_length));
        }
        if !(MIN_SALT_LEN..=MAX_SALT_LEN).contains(&salt.len()) {
            return Err(DomainError::InvalidSalt);
        }

        let salt = SaltString::encode_b64(salt.as_bytes()).map_err(|_| DomainError::InvalidSalt)?;
        let hash = self
            .argon2
            .hash_password(raw.as_bytes(), &salt)
            .map_err(|e| DomainError::Encoding(e.to_string()))?
            .to_string();

        Ok(HashedPassword::new(hash))
    }

    fn is_password_valid(
        &self,
        encoded: &HashedPassword,
        raw: &str,
        _salt: &str,
    ) -> Result<bool, DomainError> {
        // the PHC string carries its own salt and parameters
        let parsed_hash =
            Argon2Hash::new(encoded.as_str()).map_err(|e| DomainError::Encoding(e.to_string()))?;

        Ok(self
            .argon2
            .verify_password(raw.as_bytes(), &parsed_hash)
            .is_ok())
    }
}
