//! Gateway Client
//!
//! The boundary to the real-time messaging platform. [`ChatClient`] is the
//! interface the bot consumes; [`LocalGateway`] is an in-process
//! implementation that feeds events through a channel and records outbound
//! sends, standing in for the remote platform.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use tokio::sync::mpsc;

use crate::shared::error::AppError;
use super::events::{ChatEvent, Credentials, EventHandlers};

/// Outbound platform operations available to handler bodies.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Open a session with the platform.
    async fn connect(&self, credentials: &Credentials) -> Result<(), AppError>;

    /// Send a message to a channel. Non-blocking; delivery is the
    /// platform's concern.
    fn send(&self, channel: &str, text: &str) -> Result<(), AppError>;
}

/// A message handed to `send`, retained for inspection.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundMessage {
    pub channel: String,
    pub text: String,
}

/// In-process gateway: events are pushed with [`feed`](Self::feed) (or
/// [`feed_json`](Self::feed_json) in wire form) and dispatched one at a time
/// to the registered handler proxies.
pub struct LocalGateway {
    handlers: RwLock<EventHandlers>,
    inbound_tx: Mutex<Option<mpsc::UnboundedSender<ChatEvent>>>,
    inbound_rx: Mutex<Option<mpsc::UnboundedReceiver<ChatEvent>>>,
    outbound: Mutex<Vec<OutboundMessage>>,
    connected: AtomicBool,
}

impl LocalGateway {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            handlers: RwLock::new(EventHandlers::default()),
            inbound_tx: Mutex::new(Some(tx)),
            inbound_rx: Mutex::new(Some(rx)),
            outbound: Mutex::new(Vec::new()),
            connected: AtomicBool::new(false),
        }
    }

    /// Register the bot's event callbacks.
    pub fn set_handlers(&self, handlers: EventHandlers) {
        *self.handlers.write() = handlers;
    }

    /// Push one event into the session, as the platform would.
    pub fn feed(&self, event: ChatEvent) -> Result<(), AppError> {
        let tx = self.inbound_tx.lock();
        let tx = tx
            .as_ref()
            .ok_or_else(|| AppError::Gateway("session closed".into()))?;
        tx.send(event)
            .map_err(|_| AppError::Gateway("event loop stopped".into()))
    }

    /// Push one event in its wire form.
    pub fn feed_json(&self, payload: &str) -> Result<(), AppError> {
        let event: ChatEvent = serde_json::from_str(payload)
            .map_err(|e| AppError::Gateway(format!("malformed event payload: {}", e)))?;
        self.feed(event)
    }

    /// Close the inbound side; the dispatch loop drains and stops.
    pub fn close(&self) {
        self.inbound_tx.lock().take();
    }

    /// Dispatch events until the session is closed. Callbacks run one at a
    /// time, in arrival order.
    pub async fn run(&self) -> Result<(), AppError> {
        let mut rx = self
            .inbound_rx
            .lock()
            .take()
            .ok_or_else(|| AppError::Gateway("event loop already running".into()))?;
        while let Some(event) = rx.recv().await {
            self.dispatch(&event);
        }
        tracing::info!("gateway session ended");
        Ok(())
    }

    /// Messages handed to `send` so far, draining the record.
    pub fn take_outbound(&self) -> Vec<OutboundMessage> {
        std::mem::take(&mut *self.outbound.lock())
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn dispatch(&self, event: &ChatEvent) {
        let handler = self.handlers.read().for_event(event).cloned();
        let Some(handler) = handler else {
            tracing::debug!(event = event.event_name(), "no handler registered");
            return;
        };
        // Handler failures are the handler's own; the event loop keeps going.
        if let Err(e) = handler.invoke(&event.call_args()) {
            tracing::error!(event = event.event_name(), error = %e, "event handler failed");
        }
    }
}

impl Default for LocalGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatClient for LocalGateway {
    async fn connect(&self, credentials: &Credentials) -> Result<(), AppError> {
        if credentials.token.is_empty() {
            return Err(AppError::Gateway("missing token".into()));
        }
        self.connected.store(true, Ordering::SeqCst);
        tracing::info!("gateway session opened");
        // The platform acknowledges a new session with READY.
        self.feed(ChatEvent::Ready)
    }

    fn send(&self, channel: &str, text: &str) -> Result<(), AppError> {
        if !self.is_connected() {
            return Err(AppError::Gateway("not connected".into()));
        }
        tracing::info!(channel = %channel, "message sent");
        self.outbound.lock().push(OutboundMessage {
            channel: channel.to_string(),
            text: text.to_string(),
        });
        Ok(())
    }
}
