#![allow(clippy::unwrap_used)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{BackendClient, Credentials, SessionInvalid};
use crate::user::UserRecord;
use crate::GuardError;

struct Account {
    email: String,
    password: String,
    user: UserRecord,
}

/// In-memory backend for tests and demos.
#[derive(Clone, Default)]
pub struct MockBackendClient {
    current: Arc<Mutex<Option<UserRecord>>>,
    accounts: Arc<Mutex<Vec<Account>>>,
    failure: Arc<Mutex<Option<GuardError>>>,
    delay: Arc<Mutex<Option<std::time::Duration>>>,
    revalidate_calls: Arc<AtomicUsize>,
}

impl MockBackendClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend that already has `user` signed in.
    pub fn signed_in(user: UserRecord) -> Self {
        let client = Self::new();
        *client.current.lock().unwrap() = Some(user);
        client
    }

    /// Adds an account that `authenticate` accepts.
    pub fn add_account(&self, email: &str, password: &str, user: UserRecord) {
        self.accounts.lock().unwrap().push(Account {
            email: email.to_owned(),
            password: password.to_owned(),
            user,
        });
    }

    pub fn sign_in(&self, user: UserRecord) {
        *self.current.lock().unwrap() = Some(user);
    }

    pub fn sign_out(&self) {
        *self.current.lock().unwrap() = None;
    }

    /// Every following call fails with `err` until [`recover`](Self::recover).
    pub fn fail_with(&self, err: GuardError) {
        *self.failure.lock().unwrap() = Some(err);
    }

    pub fn recover(&self) {
        *self.failure.lock().unwrap() = None;
    }

    pub fn set_delay(&self, delay: std::time::Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub fn revalidate_calls(&self) -> usize {
        self.revalidate_calls.load(Ordering::SeqCst)
    }

    async fn pause(&self) {
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }

    fn failure(&self) -> Option<GuardError> {
        self.failure.lock().unwrap().clone()
    }
}

#[async_trait]
impl BackendClient for MockBackendClient {
    async fn revalidate_session(&self) -> Result<UserRecord, GuardError> {
        self.revalidate_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        if let Some(err) = self.failure() {
            return Err(err);
        }
        self.current
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| SessionInvalid::rejected("no active session").into())
    }

    async fn authenticate(&self, credentials: &Credentials) -> Result<(), GuardError> {
        self.pause().await;
        if let Some(err) = self.failure() {
            return Err(err);
        }
        let user = self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.email == credentials.email && a.password == credentials.password)
            .map(|a| a.user.clone())
            .ok_or(GuardError::InvalidCredentials)?;
        *self.current.lock().unwrap() = Some(user);
        Ok(())
    }

    async fn end_session(&self) -> Result<(), GuardError> {
        if let Some(err) = self.failure() {
            return Err(err);
        }
        *self.current.lock().unwrap() = None;
        Ok(())
    }
}
