//! Hashing de contraseñas con Argon2id (formato PHC, cabe en VARCHAR(255)).

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};

use crate::DomainError;

// ~19 MiB, 2 iteraciones, 1 hilo.
const M_COST_KIB: u32 = 19_456;
const T_COST: u32 = 2;
const P_COST: u32 = 1;

fn argon2() -> Result<Argon2<'static>, DomainError> {
    let params = Params::new(M_COST_KIB, T_COST, P_COST, None).map_err(|e| DomainError::Hashing(e.to_string()))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

pub fn hash_password(password: &str) -> Result<String, DomainError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = argon2()?.hash_password(password.as_bytes(), &salt)
                        .map_err(|e| DomainError::Hashing(e.to_string()))?;
    Ok(hash.to_string())
}

/// Devuelve `false` tanto si la contraseña no coincide como si el hash
/// almacenado no es un PHC válido (p. ej. hashes heredados de otro formato).
pub fn verify_password(stored_hash: &str, password: &str) -> Result<bool, DomainError> {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        log::warn!("stored password hash is not a PHC string; treating as mismatch");
        return Ok(false);
    };
    Ok(argon2()?.verify_password(password.as_bytes(), &parsed).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let hash = hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password(&hash, "correct horse").unwrap());
        assert!(!verify_password(&hash, "battery staple").unwrap());
    }

    #[test]
    fn salts_differ_between_hashes() {
        assert_ne!(hash_password("pw").unwrap(), hash_password("pw").unwrap());
    }

    #[test]
    fn legacy_hash_does_not_verify() {
        let legacy = "pbkdf2:sha256:600000$abc$def";
        assert!(!verify_password(legacy, "pw").unwrap());
    }
}
