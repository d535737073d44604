use chrono::Utc;

use crate::events::{GuardEvent, dispatch};
use crate::session::{Credentials, SessionProvider};
use crate::user::UserRecord;
use crate::GuardError;

/// Signs a user in with the backend and loads the resulting session.
pub struct LoginAction {
    session: SessionProvider,
}

impl LoginAction {
    pub fn new(session: SessionProvider) -> Self {
        LoginAction { session }
    }

    /// Authenticates with `credentials`, then re-validates so the local
    /// session holds the backend's view of the user.
    ///
    /// # Returns
    ///
    /// - `Ok(user)` - signed in, session authenticated
    /// - `Err(GuardError::InvalidCredentials)` - backend refused the credentials
    /// - `Err(GuardError::SessionInvalid(_))` - accepted, but no session followed
    /// - `Err(_)` - transport or backend errors
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "login", skip_all, err)
    )]
    pub async fn execute(&self, credentials: &Credentials) -> Result<UserRecord, GuardError> {
        let result = self.sign_in(credentials).await;

        match &result {
            Ok(user) => {
                dispatch(GuardEvent::LoginSucceeded {
                    user_id: user.id.clone(),
                    email: user.email.clone(),
                    at: Utc::now(),
                })
                .await;
                log::info!(
                    target: "waypost::session",
                    "msg=\"login success\" user_id=\"{}\"",
                    user.id
                );
            }
            Err(e) => {
                dispatch(GuardEvent::LoginFailed {
                    email: credentials.email.clone(),
                    reason: e.to_string(),
                    at: Utc::now(),
                })
                .await;
                log::info!(
                    target: "waypost::session",
                    "msg=\"login failed\" error=\"{e}\""
                );
            }
        }

        result
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<UserRecord, GuardError> {
        self.session.client().authenticate(credentials).await?;
        Ok(self.session.revalidate().await?)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::session::{MockBackendClient, SessionState};

    fn login(client: &MockBackendClient) -> (LoginAction, SessionState) {
        let state = SessionState::new();
        let session = SessionProvider::new(Arc::new(client.clone()), state.clone());
        (LoginAction::new(session), state)
    }

    #[tokio::test]
    async fn test_login_action() {
        let client = MockBackendClient::new();
        client.add_account(
            "user@email.com",
            "securepassword",
            UserRecord::new("7", "user@email.com"),
        );
        let (login, state) = login(&client);

        let user = login
            .execute(&Credentials::new("user@email.com", "securepassword"))
            .await
            .unwrap();
        assert_eq!(user.id, "7");
        assert!(state.is_authenticated());
        assert_eq!(state.user().unwrap().email, "user@email.com");
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let client = MockBackendClient::new();
        client.add_account("user@email.com", "securepassword", UserRecord::new("7", "user@email.com"));
        let (login, state) = login(&client);

        let err = login
            .execute(&Credentials::new("user@email.com", "wrongpassword"))
            .await
            .unwrap_err();
        assert_eq!(err, GuardError::InvalidCredentials);
        assert!(!state.is_authenticated());
        assert_eq!(client.revalidate_calls(), 0);
    }

    #[tokio::test]
    async fn test_login_backend_down() {
        let client = MockBackendClient::new();
        client.fail_with(GuardError::Unavailable("connection refused".to_owned()));
        let (login, _) = login(&client);

        let err = login
            .execute(&Credentials::new("user@email.com", "securepassword"))
            .await
            .unwrap_err();
        assert!(matches!(err, GuardError::Unavailable(_)));
    }
}
