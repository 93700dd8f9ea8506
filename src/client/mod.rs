//! Chat Platform Boundary
//!
//! Event shapes, the client interface handler bodies consume, and the
//! in-process gateway implementation.

pub mod events;
pub mod gateway;

pub use events::{ChatEvent, ChatMessage, Credentials, EventHandlers};
pub use gateway::{ChatClient, LocalGateway, OutboundMessage};
