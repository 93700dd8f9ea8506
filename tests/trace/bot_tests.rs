//! Bot Wiring Tests
//!
//! The full loop: gateway session delivering events to trace-wrapped,
//! instance-bound handlers, with outbound sends and trace lines observable.

use std::sync::Arc;

use pretty_assertions::assert_eq;

use chat_bot::bot::{traced_handlers, Bot};
use chat_bot::client::{ChatClient, ChatEvent, ChatMessage, Credentials, LocalGateway};
use chat_bot::trace::Receiver;

use crate::common::TraceHarness;

struct Wired {
    harness: TraceHarness,
    gateway: Arc<LocalGateway>,
    bot: Arc<Bot>,
}

fn wire_bot() -> Wired {
    let harness = TraceHarness::new();
    let gateway = Arc::new(LocalGateway::new());
    let bot = Bot::new(
        "salbot",
        "rust-hangout",
        "general",
        Arc::clone(&gateway) as Arc<dyn ChatClient>,
    );
    gateway.set_handlers(traced_handlers(&bot, &harness.tracer));
    Wired {
        harness,
        gateway,
        bot,
    }
}

/// Connect, receive a message and a typing notice, and drain the session:
/// the bot greets once, echoes once, and every callback leaves trace lines.
#[tokio::test]
async fn test_session_greets_and_echoes() {
    let wired = wire_bot();

    wired
        .gateway
        .connect(&Credentials {
            token: "secret".into(),
        })
        .await
        .unwrap();
    wired
        .gateway
        .feed(ChatEvent::Message(ChatMessage {
            content: "ping".into(),
            author: "alice".into(),
            channel: "general".into(),
        }))
        .unwrap();
    wired
        .gateway
        .feed(ChatEvent::Typing {
            channel: "general".into(),
            user: "alice".into(),
            timestamp: 1700000000,
        })
        .unwrap();
    wired.gateway.close();
    wired.gateway.run().await.unwrap();

    let sent = wired.gateway.take_outbound();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].text, "hi rust-hangout");
    assert_eq!(sent[1].text, "ping");

    let log = wired.harness.messages().join("\n");
    assert!(log.contains("-> Bot.on_ready(self=<Bot 'salbot'>)"));
    assert!(log.contains("<- Bot.on_ready() ==> hi rust-hangout"));
    assert!(log.contains("-> Bot.on_message(self=<Bot 'salbot'>, kwargs={'author': 'alice', 'channel': 'general', 'content': 'ping'}"));
    assert!(log.contains("<- Bot.on_message() ==> ping"));
    assert!(log.contains("-> Bot.on_typing"));
}

/// Wire-form events reach the handlers the same way.
#[tokio::test]
async fn test_wire_payload_dispatch() {
    let wired = wire_bot();

    wired
        .gateway
        .connect(&Credentials {
            token: "secret".into(),
        })
        .await
        .unwrap();
    wired
        .gateway
        .feed_json(
            r#"{"t":"MESSAGE_CREATE","d":{"content":"!hello","author":"bob","channel":"general"}}"#,
        )
        .unwrap();
    wired.gateway.close();
    wired.gateway.run().await.unwrap();

    let sent = wired.gateway.take_outbound();
    assert_eq!(sent.last().unwrap().text, "hi bob");
}

/// A handler failure is contained: the loop keeps dispatching, the depth
/// counter stays balanced. The failure here is a dead receiver: the bot was
/// dropped, so the bound proxies cannot upgrade their weak reference.
#[tokio::test]
async fn test_handler_failure_does_not_stop_the_loop() {
    let harness = TraceHarness::new();
    let gateway = Arc::new(LocalGateway::new());
    {
        let bot = Bot::new(
            "salbot",
            "rust-hangout",
            "general",
            Arc::clone(&gateway) as Arc<dyn ChatClient>,
        );
        gateway.set_handlers(traced_handlers(&bot, &harness.tracer));
        // bot dropped here; the handlers hold it weakly
    }

    gateway
        .connect(&Credentials {
            token: "secret".into(),
        })
        .await
        .unwrap();
    gateway
        .feed(ChatEvent::Message(ChatMessage {
            content: "anyone?".into(),
            author: "alice".into(),
            channel: "general".into(),
        }))
        .unwrap();
    gateway.close();
    gateway.run().await.unwrap();

    assert_eq!(harness.sinks.current_depth(), 0);
    assert!(gateway.take_outbound().is_empty());
}

/// Handler proxies are instance-bound to the bot and re-binding against the
/// same instance is identity-preserving.
#[test]
fn test_handler_binding_is_idempotent() {
    let wired = wire_bot();
    let handlers = traced_handlers(&wired.bot, &wired.harness.tracer);
    let on_message = handlers.on_message.unwrap();

    let receiver: Arc<dyn Receiver> = Arc::clone(&wired.bot) as Arc<dyn Receiver>;
    let rebound = on_message.resolve_binding(Some(&receiver), Bot::TYPE_NAME);
    assert!(Arc::ptr_eq(&on_message, &rebound));
}
