//! Administrative operations behind `ridegate-cli`.

use std::fmt;

use validator::Validate;

use ridegate_core::PasswordHasher;
use ridegate_db::UserRepository;
use ridegate_models::{NewUser, Role, User};

/// An admin account to create. Admins cannot self-register over HTTP.
#[derive(Clone, Validate)]
pub struct NewAdmin {
    #[validate(
        length(min = 3, max = 50, message = "username must be between 3 and 50 characters"),
        custom(function = "ridegate_models::auth::validate_username_charset")
    )]
    pub username: String,
    #[validate(email(message = "email must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 7, max = 20, message = "phone must be between 7 and 20 characters"))]
    pub phone: Option<String>,
    #[validate(length(min = 8, max = 72, message = "password must be between 8 and 72 characters"))]
    pub password: String,
}

impl fmt::Debug for NewAdmin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewAdmin")
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

pub async fn create_admin(
    users: &dyn UserRepository,
    hasher: &dyn PasswordHasher,
    admin: NewAdmin,
) -> anyhow::Result<User> {
    admin.validate()?;

    if users.exists_by_username(&admin.username).await? {
        anyhow::bail!("Username already exists");
    }
    if users.exists_by_email(&admin.email).await? {
        anyhow::bail!("Email already exists");
    }

    let password_hash = hasher.hash(&admin.password)?;

    let user = users
        .create(NewUser {
            username: admin.username,
            password_hash,
            email: admin.email,
            phone: admin.phone,
            role: Role::Admin,
        })
        .await?;

    Ok(user)
}
