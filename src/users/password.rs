use argon2::{
    password_hash::{Error as HashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("error hashing password: {0}")]
    Hashing(String),
    #[error("error comparing password: {0}")]
    Verification(String),
}

/// Argon2id with the crate's default parameters (19 MiB, 2 passes, 1 lane).
/// Every digest carries its own random salt and the parameters it was made with.
fn hasher() -> Argon2<'static> {
    Argon2::default()
}

pub fn hash_password(plain: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = hasher()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            PasswordError::Hashing(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

/// Returns `Ok(false)` for a wrong password; `Err` only when the digest is
/// unusable or the primitive itself fails.
pub fn verify_password(plain: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        error!(error = %e, "argon2 parse hash error");
        PasswordError::Verification(e.to_string())
    })?;
    match hasher().verify_password(plain.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(HashError::Password) => Ok(false),
        Err(e) => {
            error!(error = %e, "argon2 verify_password error");
            Err(PasswordError::Verification(e.to_string()))
        }
    }
}

// Hashing is CPU bound, so the async entry points hop onto the blocking pool.

pub async fn hash(plain: String) -> Result<String, PasswordError> {
    tokio::task::spawn_blocking(move || hash_password(&plain))
        .await
        .map_err(|e| PasswordError::Hashing(e.to_string()))?
}

pub async fn verify(plain: String, hash: String) -> Result<bool, PasswordError> {
    tokio::task::spawn_blocking(move || verify_password(&plain, &hash))
        .await
        .map_err(|e| PasswordError::Verification(e.to_string()))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_verifies_only_its_own_password() {
        let digest = hash_password("longenough").unwrap();
        assert!(verify_password("longenough", &digest).unwrap());
        assert!(!verify_password("longenougH", &digest).unwrap());
        assert!(!verify_password("", &digest).unwrap());
    }

    #[test]
    fn same_password_gets_distinct_salted_digests() {
        let first = hash_password("longenough").unwrap();
        let second = hash_password("longenough").unwrap();
        assert_ne!(first, second);
        assert!(verify_password("longenough", &first).unwrap());
        assert!(verify_password("longenough", &second).unwrap());
    }

    #[test]
    fn digest_never_contains_plaintext() {
        let hash = hash_password("plaintext-secret").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(!hash.contains("plaintext-secret"));
    }

    #[test]
    fn verify_errors_on_malformed_hash() {
        let err = verify_password("anything", "not-a-valid-hash").unwrap_err();
        assert!(matches!(err, PasswordError::Verification(_)));
    }

    #[tokio::test]
    async fn async_helpers_run_off_the_executor() {
        let hash = hash("longenough".to_string()).await.unwrap();
        assert!(verify("longenough".to_string(), hash.clone()).await.unwrap());
        assert!(!verify("different1".to_string(), hash).await.unwrap());
    }
}
