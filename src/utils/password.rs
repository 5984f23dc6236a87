use crate::config::AppConfig;
use crate::errors::TutorHubError;
use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};

/// 哈希密码
pub fn hash_password(password: &str) -> Result<String, TutorHubError> {
    let config = AppConfig::get();
    let params = Params::new(
        config.argon2.memory_cost,
        config.argon2.time_cost,
        config.argon2.parallelism,
        None,
    )
    .map_err(|e| TutorHubError::validation(format!("Invalid argon2 params: {e}")))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
    let salt = SaltString::generate(&mut OsRng);
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| TutorHubError::validation(format!("Password hashing failed: {e}")))?;
    Ok(hash.to_string())
}

/// 验证密码（参数从哈希串中解析）
pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed_hash) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("Tutor2025ok").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("Tutor2025ok", &hash));
        assert!(!verify_password("tutor2025ok", &hash));
    }

    #[test]
    fn test_verify_garbage_hash() {
        assert!(!verify_password("anything", "not-a-hash"));
    }
}
