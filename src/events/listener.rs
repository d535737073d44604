use async_trait::async_trait;

use super::GuardEvent;

/// Receives every dispatched [`GuardEvent`].
///
/// Handlers run inline with the navigation that fired the event, so keep
/// them short or hand the work off.
#[async_trait]
pub trait Listener: Send + Sync + 'static {
    async fn handle(&self, event: &GuardEvent);
}
