//! Casos de uso de cuentas: alta (por administrador), login, rotación de
//! contraseña y baja.

use crate::password::{hash_password, verify_password};
use crate::repo::UserRepository;
use crate::user::{validate_username, NewUser, User, UserId};
use crate::{DomainError, StoreError};

pub fn register<R>(users: &R, username: &str, password: &str) -> Result<User, DomainError>
    where R: UserRepository + ?Sized
{
    if username.is_empty() || password.is_empty() {
        return Err(DomainError::ValidationError("username y password son obligatorios".to_string()));
    }
    validate_username(username)?;
    let new_user = NewUser::new(username, &hash_password(password)?)?;
    match users.create(&new_user) {
        Ok(user) => {
            log::info!("user registered user_id={} username={}", user.user_id, user.username);
            Ok(user)
        }
        Err(StoreError::UniqueViolation(_)) => Err(DomainError::UsernameTaken(username.to_string())),
        Err(e) => Err(e.into()),
    }
}

/// Usuario inexistente y contraseña incorrecta producen el mismo error.
pub fn authenticate<R>(users: &R, username: &str, password: &str) -> Result<User, DomainError>
    where R: UserRepository + ?Sized
{
    let Some(user) = users.find_by_username(username)? else {
        return Err(DomainError::InvalidCredentials);
    };
    if !verify_password(&user.password_hash, password)? {
        return Err(DomainError::InvalidCredentials);
    }
    Ok(user)
}

pub fn rotate_password<R>(users: &R, user_id: UserId, new_password: &str) -> Result<(), DomainError>
    where R: UserRepository + ?Sized
{
    if new_password.is_empty() {
        return Err(DomainError::ValidationError("password no puede estar vacío".to_string()));
    }
    let hash = hash_password(new_password)?;
    match users.update_password_hash(user_id, &hash) {
        Ok(()) => Ok(()),
        Err(StoreError::NotFound) => Err(DomainError::NotFound(format!("user {user_id}"))),
        Err(e) => Err(e.into()),
    }
}

/// Borra la cuenta; los items del usuario caen en cascada.
pub fn delete_account<R>(users: &R, user_id: UserId) -> Result<(), DomainError>
    where R: UserRepository + ?Sized
{
    if !users.delete(user_id)? {
        return Err(DomainError::NotFound(format!("user {user_id}")));
    }
    log::info!("user deleted user_id={user_id}");
    Ok(())
}
