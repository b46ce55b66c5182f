//! Account commands: register, login, logout, whoami.

use secrecy::SecretString;
use tracing::info;

use super::{CliError, Context};

pub async fn register(
    ctx: &mut Context,
    name: &str,
    email: &str,
    password: String,
) -> Result<(), CliError> {
    let password = SecretString::from(password);
    let state = ctx
        .store
        .auth_mut()
        .register_user(name, email, &password)
        .await;

    match (&state.user, &state.error) {
        (Some(user), _) => {
            info!("Registered and logged in as {} <{}>", user.name, user.email);
            Ok(())
        }
        (None, error) => Err(CliError::Auth(
            error.clone().unwrap_or_else(|| "Registration failed".to_string()),
        )),
    }
}

pub async fn login(ctx: &mut Context, email: &str, password: String) -> Result<(), CliError> {
    let password = SecretString::from(password);
    let state = ctx.store.auth_mut().login_user(email, &password).await;

    match (&state.user, &state.error) {
        (Some(user), _) => {
            info!("Logged in as {} <{}>", user.name, user.email);
            Ok(())
        }
        (None, error) => Err(CliError::Auth(
            error.clone().unwrap_or_else(|| "Login failed".to_string()),
        )),
    }
}

pub fn logout(ctx: &mut Context) {
    ctx.store.auth_mut().logout();
    info!("You have been logged out");
}

pub fn whoami(ctx: &Context) {
    match &ctx.store.auth().user {
        Some(user) => info!("{} <{}> ({})", user.name, user.email, user.id),
        None => info!("Not logged in"),
    }
}
