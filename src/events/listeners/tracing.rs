use async_trait::async_trait;

use crate::events::{GuardEvent, Listener};

/// Emits events through `tracing`. Needs the `tracing` feature.
pub struct TracingListener;

#[async_trait]
impl Listener for TracingListener {
    async fn handle(&self, event: &GuardEvent) {
        tracing::info!(
            target: "waypost::events",
            event_name = event.name(),
            ?event,
            "guard event"
        );
    }
}
