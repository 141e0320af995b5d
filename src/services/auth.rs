//! Login and logout flows.
//!
//! Login only touches the session store after the identity service has
//! confirmed the freshly issued token, so a refused or half-finished exchange
//! leaves the current session exactly as it was.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use crate::nav::Route;
use crate::net::Authenticator;
use crate::notice::Notice;
use crate::state::session::SessionStore;

/// The login form may only be submitted with both fields filled in.
#[must_use]
pub fn can_submit(email: &str, password: &str) -> bool {
    !email.is_empty() && !password.is_empty()
}

fn login_failed() -> Notice {
    Notice::error("Authentication failed").with_text("Check your login details and try again.")
}

/// Exchange credentials for a token, confirm it, then adopt the identity.
pub async fn login(auth: &dyn Authenticator, store: &SessionStore, email: &str, password: &str) -> Notice {
    if !can_submit(email, password) {
        return Notice::error("Authentication failed").with_text("Email and password are required.");
    }

    let token = match auth.login(email, password).await {
        Ok(Some(token)) => token,
        Ok(None) => {
            tracing::info!(email, "login refused");
            return login_failed();
        }
        Err(e) => {
            tracing::warn!(error = %e, "login request failed");
            return Notice::error("Authentication failed").with_text("Something went wrong");
        }
    };

    match auth.fetch_identity(&token).await {
        Ok(Some(identity)) => {
            store.set(&token, &identity.id, identity.is_admin);
            Notice::success("Login Successful").with_text("Welcome to the Blog App!")
        }
        Ok(None) => {
            tracing::warn!("identity endpoint returned no user for a fresh token");
            login_failed()
        }
        Err(e) => {
            tracing::warn!(error = %e, "failed to load user details after login");
            Notice::error("Authentication failed").with_text("Unable to load your account details.")
        }
    }
}

/// End the session and return where to navigate next.
pub fn logout(store: &SessionStore) -> Route {
    store.clear();
    Route::Login
}
