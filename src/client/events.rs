//! Chat Platform Events
//!
//! Wire-shaped events and the handler registration surface. The platform
//! itself is a black box; only these shapes are normative.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::trace::{CallArgs, CallableProxy};

/// Credentials passed through to the platform on connect. No authentication
/// logic lives here beyond carrying the token.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub token: String,
}

/// One chat message as delivered by the platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub content: String,
    pub author: String,
    pub channel: String,
}

/// Events the platform pushes to the bot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", content = "d")]
pub enum ChatEvent {
    #[serde(rename = "READY")]
    Ready,
    #[serde(rename = "MESSAGE_CREATE")]
    Message(ChatMessage),
    #[serde(rename = "TYPING_START")]
    Typing {
        channel: String,
        user: String,
        timestamp: i64,
    },
}

impl ChatEvent {
    /// Event name for dispatch and diagnostics.
    pub fn event_name(&self) -> &'static str {
        match self {
            ChatEvent::Ready => "READY",
            ChatEvent::Message(_) => "MESSAGE_CREATE",
            ChatEvent::Typing { .. } => "TYPING_START",
        }
    }

    /// Convert the payload into the dynamic arguments the handler proxies
    /// accept: messages as keyword arguments, typing as positional.
    pub fn call_args(&self) -> CallArgs {
        match self {
            ChatEvent::Ready => CallArgs::new(),
            ChatEvent::Message(message) => CallArgs::new()
                .kwarg("content", message.content.as_str())
                .kwarg("author", message.author.as_str())
                .kwarg("channel", message.channel.as_str()),
            ChatEvent::Typing {
                channel,
                user,
                timestamp,
            } => CallArgs::new()
                .arg(channel.as_str())
                .arg(user.as_str())
                .arg(*timestamp),
        }
    }
}

/// Registered event callbacks, each a (usually trace-wrapped) proxy.
#[derive(Clone, Default)]
pub struct EventHandlers {
    pub on_ready: Option<Arc<CallableProxy>>,
    pub on_message: Option<Arc<CallableProxy>>,
    pub on_typing: Option<Arc<CallableProxy>>,
}

impl EventHandlers {
    /// The handler registered for an event, if any.
    pub fn for_event(&self, event: &ChatEvent) -> Option<&Arc<CallableProxy>> {
        match event {
            ChatEvent::Ready => self.on_ready.as_ref(),
            ChatEvent::Message(_) => self.on_message.as_ref(),
            ChatEvent::Typing { .. } => self.on_typing.as_ref(),
        }
    }
}
