//! 敏感字段加密
//!
//! 学生/导师/管理员档案中的电话、住址、证件号等字段以 AES-256-GCM 加密后落库。
//! 存储格式为 `base64(nonce || ciphertext)`，每次加密使用随机 nonce，
//! 因此同一明文两次加密的结果不同，这些列不能用于等值查询。

use std::sync::OnceLock;

use aes_gcm::aead::consts::U12;
use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::config::AppConfig;
use crate::errors::{Result, TutorHubError};

const NONCE_LEN: usize = 12;
const KEY_LEN: usize = 32;

static FIELD_CIPHER: OnceLock<std::result::Result<FieldCipher, String>> = OnceLock::new();

pub struct FieldCipher {
    cipher: Aes256Gcm,
}

impl FieldCipher {
    /// 从 base64 编码的 32 字节密钥构建
    pub fn from_base64_key(key: &str) -> Result<Self> {
        let bytes = STANDARD
            .decode(key.trim())
            .map_err(|e| TutorHubError::crypto(format!("Field key is not valid base64: {e}")))?;
        if bytes.len() != KEY_LEN {
            return Err(TutorHubError::crypto(format!(
                "Field key must be {KEY_LEN} bytes, got {}",
                bytes.len()
            )));
        }
        let key = Key::<Aes256Gcm>::from_slice(&bytes);
        Ok(Self {
            cipher: Aes256Gcm::new(key),
        })
    }

    /// 全局实例，密钥来自 `crypto.field_key`
    pub fn global() -> Result<&'static FieldCipher> {
        FIELD_CIPHER
            .get_or_init(|| {
                Self::from_base64_key(&AppConfig::get().crypto.field_key)
                    .map_err(|e| e.message().to_string())
            })
            .as_ref()
            .map_err(|e| TutorHubError::crypto(e.clone()))
    }

    pub fn encrypt(&self, plaintext: &str) -> Result<String> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|e| TutorHubError::crypto(format!("Encryption failed: {e}")))?;

        let mut payload = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        payload.extend_from_slice(nonce.as_slice());
        payload.extend_from_slice(&ciphertext);
        Ok(STANDARD.encode(payload))
    }

    pub fn decrypt(&self, encoded: &str) -> Result<String> {
        let payload = STANDARD
            .decode(encoded)
            .map_err(|e| TutorHubError::crypto(format!("Encrypted value is not base64: {e}")))?;
        if payload.len() <= NONCE_LEN {
            return Err(TutorHubError::crypto("Encrypted value is too short"));
        }

        let (nonce, ciphertext) = payload.split_at(NONCE_LEN);
        let plaintext = self
            .cipher
            .decrypt(Nonce::<U12>::from_slice(nonce), ciphertext)
            .map_err(|e| TutorHubError::crypto(format!("Decryption failed: {e}")))?;

        String::from_utf8(plaintext)
            .map_err(|e| TutorHubError::crypto(format!("Decrypted value is not UTF-8: {e}")))
    }

    pub fn encrypt_opt(&self, value: Option<String>) -> Result<Option<String>> {
        value.map(|v| self.encrypt(&v)).transpose()
    }

    pub fn decrypt_opt(&self, value: Option<String>) -> Result<Option<String>> {
        value.map(|v| self.decrypt(&v)).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_KEY: &str = "MDEyMzQ1Njc4OWFiY2RlZjAxMjM0NTY3ODlhYmNkZWY=";

    #[test]
    fn test_encrypt_decrypt() {
        let cipher = FieldCipher::from_base64_key(TEST_KEY).unwrap();
        let sealed = cipher.encrypt("+8801711000000").unwrap();
        assert!(!sealed.contains("8801711000000"));
        assert_eq!(cipher.decrypt(&sealed).unwrap(), "+8801711000000");
    }

    #[test]
    fn test_random_nonce() {
        let cipher = FieldCipher::from_base64_key(TEST_KEY).unwrap();
        let a = cipher.encrypt("Dhanmondi 27").unwrap();
        let b = cipher.encrypt("Dhanmondi 27").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_tampered_value_rejected() {
        let cipher = FieldCipher::from_base64_key(TEST_KEY).unwrap();
        let sealed = cipher.encrypt("secret").unwrap();
        let mut raw = STANDARD.decode(&sealed).unwrap();
        let last = raw.len() - 1;
        raw[last] ^= 0x01;
        assert!(cipher.decrypt(&STANDARD.encode(raw)).is_err());
        assert!(cipher.decrypt("c2hvcnQ=").is_err());
    }

    #[test]
    fn test_bad_key_length() {
        assert!(FieldCipher::from_base64_key("c2hvcnQ=").is_err());
        assert!(FieldCipher::from_base64_key("!!!").is_err());
    }

    #[test]
    fn test_optional_values() {
        let cipher = FieldCipher::from_base64_key(TEST_KEY).unwrap();
        assert_eq!(cipher.encrypt_opt(None).unwrap(), None);
        let sealed = cipher.encrypt_opt(Some("x".into())).unwrap();
        assert_eq!(cipher.decrypt_opt(sealed).unwrap(), Some("x".to_string()));
    }
}
