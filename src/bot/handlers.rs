//! Bot Event Handlers
//!
//! The bot's business logic: greet on connect, echo messages, note typing.
//! Handlers are registered as trace-wrapped proxies bound to the bot
//! instance, so every callback invocation is recorded by the call tracer.

use std::sync::Arc;

use crate::client::{ChatClient, EventHandlers};
use crate::shared::error::AppError;
use crate::trace::{CallArgs, CallTarget, CallTracer, Receiver, Value};

/// Build a greeting for a name.
pub fn greet(name: &str) -> String {
    format!("hi {}", name)
}

/// The chat bot: holds the configured guild and the client it sends through.
pub struct Bot {
    name: String,
    guild: String,
    home_channel: String,
    client: Arc<dyn ChatClient>,
}

impl Bot {
    /// Owner type name used when binding handler proxies.
    pub const TYPE_NAME: &'static str = "Bot";

    pub fn new(
        name: impl Into<String>,
        guild: impl Into<String>,
        home_channel: impl Into<String>,
        client: Arc<dyn ChatClient>,
    ) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            guild: guild.into(),
            home_channel: home_channel.into(),
            client,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn guild(&self) -> &str {
        &self.guild
    }

    /// Session is open: announce the connection and greet the guild.
    fn handle_ready(&self) -> Result<Value, AppError> {
        tracing::info!(bot = %self.name, guild = %self.guild, "connected");
        let greeting = greet(&self.guild);
        self.client.send(&self.home_channel, &greeting)?;
        Ok(Value::Str(greeting))
    }

    /// Echo a message back to its channel. The bot's own messages are
    /// ignored so the echo does not feed itself; `!hello` gets a greeting
    /// instead of an echo.
    fn handle_message(&self, args: &CallArgs) -> Result<Value, AppError> {
        let content = required_kwarg(args, "content")?;
        let author = required_kwarg(args, "author")?;
        let channel = required_kwarg(args, "channel")?;

        if author == self.name {
            return Ok(Value::None);
        }

        let reply = if content == "!hello" {
            greet(author)
        } else {
            content.to_string()
        };
        self.client.send(channel, &reply)?;
        Ok(Value::Str(reply))
    }

    /// Someone started typing; note it and move on.
    fn handle_typing(&self, args: &CallArgs) -> Result<Value, AppError> {
        let channel = args
            .str_at(0)
            .ok_or_else(|| AppError::Gateway("typing event missing channel".into()))?;
        let user = args
            .str_at(1)
            .ok_or_else(|| AppError::Gateway("typing event missing user".into()))?;
        tracing::debug!(channel = %channel, user = %user, "typing");
        Ok(Value::None)
    }
}

impl Receiver for Bot {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn render(&self) -> String {
        format!("<Bot '{}'>", self.name)
    }

    fn call_method(&self, name: &str, args: &CallArgs) -> Result<Value, AppError> {
        match name {
            "on_ready" => self.handle_ready(),
            "on_message" => self.handle_message(args),
            "on_typing" => self.handle_typing(args),
            other => Err(AppError::UnboundCall(format!("Bot.{}", other))),
        }
    }
}

fn required_kwarg<'a>(args: &'a CallArgs, name: &str) -> Result<&'a str, AppError> {
    args.str_kwarg(name)
        .ok_or_else(|| AppError::Gateway(format!("message event missing '{}'", name)))
}

/// Wrap the bot's callbacks in the tracer and bind them to the instance.
/// The returned proxies hold the bot weakly; the caller keeps it alive.
pub fn traced_handlers(bot: &Arc<Bot>, tracer: &Arc<CallTracer>) -> EventHandlers {
    let receiver: Arc<dyn Receiver> = Arc::clone(bot) as Arc<dyn Receiver>;
    let bind = |name: &'static str| {
        tracer
            .wrap(CallTarget::method(name))
            .resolve_binding(Some(&receiver), Bot::TYPE_NAME)
    };
    EventHandlers {
        on_ready: Some(bind("on_ready")),
        on_message: Some(bind("on_message")),
        on_typing: Some(bind("on_typing")),
    }
}
