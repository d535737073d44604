//! Guard and session events.
//!
//! Every redirect decision and session change fires a [`GuardEvent`]. With no
//! listeners registered, dispatch does nothing.
//!
//! ```rust,ignore
//! use waypost::register_event_listeners;
//! use waypost::events::listeners::LoggingListener;
//!
//! register_event_listeners(|registry| {
//!     registry.listen(LoggingListener::new());
//! });
//! ```
//!
//! Implement [`Listener`] for anything else (metrics, audit trails):
//!
//! ```rust,ignore
//! use waypost::events::{GuardEvent, Listener};
//! use async_trait::async_trait;
//!
//! struct DeniedCounter;
//!
//! #[async_trait]
//! impl Listener for DeniedCounter {
//!     async fn handle(&self, event: &GuardEvent) {
//!         if let GuardEvent::AccessDenied { path, .. } = event {
//!             // count denials per path
//!         }
//!     }
//! }
//! ```

mod event;
mod listener;
mod registry;

pub mod listeners;

pub use event::GuardEvent;
pub use listener::Listener;
pub use registry::{EventRegistry, dispatch, register_event_listeners};
