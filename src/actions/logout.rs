use chrono::Utc;

use crate::config::GuardConfig;
use crate::events::{GuardEvent, dispatch};
use crate::redirect::RedirectMemory;
use crate::session::SessionProvider;

/// Ends the session with the backend and forgets everything local.
pub struct LogoutAction<'a> {
    session: SessionProvider,
    memory: RedirectMemory,
    config: &'a GuardConfig,
}

impl<'a> LogoutAction<'a> {
    pub fn new(session: SessionProvider, memory: RedirectMemory, config: &'a GuardConfig) -> Self {
        LogoutAction {
            session,
            memory,
            config,
        }
    }

    /// Logs the user out and returns where to navigate next.
    ///
    /// A backend failure is logged; the local session and the remembered
    /// redirect are cleared either way.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "logout", skip_all)
    )]
    pub async fn execute(&self) -> String {
        let user_id = self.session.state().user().map(|user| user.id);

        if let Err(e) = self.session.client().end_session().await {
            log::warn!(
                target: "waypost::session",
                "msg=\"backend logout failed\" error=\"{e}\""
            );
        }

        self.session.clear();
        self.memory.clear().await;

        dispatch(GuardEvent::LoggedOut {
            user_id,
            at: Utc::now(),
        })
        .await;

        log::info!(
            target: "waypost::session",
            "msg=\"logout success\""
        );

        self.config.after_logout_path.clone()
    }
}
