use diesel::prelude::*;
use log::debug;
use trek_domain::{NewUser, StoreError, User, UserId, UserRepository};

use super::{with_checkout_retry, with_retry, ConnectionProvider};
use crate::error::PersistenceError;
use crate::models::{NewUserRow, UserRow};
use crate::schema::users;

/// Implementación Postgres de `UserRepository`.
///
/// El borrado confía en `ON DELETE CASCADE` de `media_items.user_id`.
pub struct PgUserRepository<P: ConnectionProvider> {
    pub provider: P,
}

impl<P: ConnectionProvider> PgUserRepository<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }
}

impl<P: ConnectionProvider> UserRepository for PgUserRepository<P> {
    fn create(&self, new_user: &NewUser) -> Result<User, StoreError> {
        debug!("users.create:start username={}", new_user.username());
        let row: UserRow = with_checkout_retry(|| self.provider.connection(), |conn| {
            diesel::insert_into(users::table)
                .values(NewUserRow { username: new_user.username(),
                                     password_hash: new_user.password_hash() })
                .returning(UserRow::as_returning())
                .get_result(conn)
                .map_err(PersistenceError::from)
        })?;
        debug!("users.create:done user_id={}", row.user_id);
        Ok(row.into())
    }

    fn find_by_id(&self, user_id: UserId) -> Result<Option<User>, StoreError> {
        let row: Option<UserRow> = with_retry(|| {
            let mut conn = self.provider.connection()?;
            users::table.find(user_id)
                        .select(UserRow::as_select())
                        .first(&mut conn)
                        .optional()
                        .map_err(PersistenceError::from)
        })?;
        Ok(row.map(User::from))
    }

    fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let row: Option<UserRow> = with_retry(|| {
            let mut conn = self.provider.connection()?;
            users::table.filter(users::username.eq(username))
                        .select(UserRow::as_select())
                        .first(&mut conn)
                        .optional()
                        .map_err(PersistenceError::from)
        })?;
        Ok(row.map(User::from))
    }

    fn update_password_hash(&self, user_id: UserId, password_hash: &str) -> Result<(), StoreError> {
        let updated = with_retry(|| {
            let mut conn = self.provider.connection()?;
            diesel::update(users::table.find(user_id))
                .set(users::password_hash.eq(password_hash))
                .execute(&mut conn)
                .map_err(PersistenceError::from)
        })?;
        if updated == 0 {
            return Err(StoreError::NotFound);
        }
        debug!("users.update_password_hash user_id={user_id}");
        Ok(())
    }

    fn delete(&self, user_id: UserId) -> Result<bool, StoreError> {
        let deleted = with_retry(|| {
            let mut conn = self.provider.connection()?;
            diesel::delete(users::table.find(user_id)).execute(&mut conn)
                                                      .map_err(PersistenceError::from)
        })?;
        debug!("users.delete user_id={user_id} deleted={deleted}");
        Ok(deleted > 0)
    }
}
