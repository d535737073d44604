use std::sync::Arc;

use chrono::Utc;

use super::{BackendClient, SessionInvalid, SessionInvalidKind, SessionState};
use crate::events::{GuardEvent, dispatch};
use crate::user::UserRecord;
use crate::GuardError;

const DEFAULT_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

/// Re-validates the session against the backend and records the result.
///
/// No retries happen here; a failed check simply leaves the session
/// anonymous until the next navigation asks again.
#[derive(Clone)]
pub struct SessionProvider {
    client: Arc<dyn BackendClient>,
    state: SessionState,
    timeout: std::time::Duration,
}

impl SessionProvider {
    pub fn new(client: Arc<dyn BackendClient>, state: SessionState) -> Self {
        Self {
            client,
            state,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Bounds each backend call; non-positive durations keep the default.
    #[must_use]
    pub fn with_timeout(mut self, timeout: chrono::Duration) -> Self {
        if let Ok(timeout) = timeout.to_std() {
            if !timeout.is_zero() {
                self.timeout = timeout;
            }
        }
        self
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn client(&self) -> &Arc<dyn BackendClient> {
        &self.client
    }

    /// Asks the backend for the current user.
    ///
    /// Success marks the session authenticated with the returned record; any
    /// failure, timeout included, marks it anonymous and returns
    /// [`SessionInvalid`].
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "revalidate_session", skip_all, err)
    )]
    pub async fn revalidate(&self) -> Result<UserRecord, SessionInvalid> {
        let result = tokio::time::timeout(self.timeout, self.client.revalidate_session()).await;

        let invalid = match result {
            Ok(Ok(user)) => {
                self.state.replace(Some(user.clone()));
                log::debug!(
                    target: "waypost::session",
                    "msg=\"session valid\" user_id=\"{}\"",
                    user.id
                );
                return Ok(user);
            }
            Ok(Err(err)) => classify(err),
            Err(_) => SessionInvalid::unavailable(GuardError::Timeout.to_string()),
        };

        self.state.replace(None);

        match invalid.kind {
            SessionInvalidKind::Rejected => log::debug!(
                target: "waypost::session",
                "msg=\"session rejected\" reason=\"{}\"",
                invalid.reason
            ),
            SessionInvalidKind::Unavailable => log::warn!(
                target: "waypost::session",
                "msg=\"session check failed\" reason=\"{}\"",
                invalid.reason
            ),
        }

        dispatch(GuardEvent::SessionInvalidated {
            kind: invalid.kind,
            reason: invalid.reason.clone(),
            at: Utc::now(),
        })
        .await;

        Err(invalid)
    }

    /// Drops the local session without contacting the backend.
    pub(crate) fn clear(&self) {
        self.state.replace(None);
    }
}

fn classify(err: GuardError) -> SessionInvalid {
    match err {
        GuardError::SessionInvalid(invalid) => invalid,
        GuardError::InvalidCredentials => SessionInvalid::rejected(err.to_string()),
        other => SessionInvalid::unavailable(other.to_string()),
    }
}
