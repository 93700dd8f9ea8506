//! Application Startup
//!
//! Composition root: owns the sink manager, the single-call gate, the bot,
//! and the gateway session, and wires the traced handlers together.

use std::sync::Arc;

use anyhow::{anyhow, Result};

use crate::bot::{traced_handlers, Bot};
use crate::client::{ChatClient, Credentials, LocalGateway};
use crate::config::Settings;
use crate::trace::{
    CallArgs, CallTarget, CallTracer, SingleCallGate, SingleCallGuard, SinkManager,
};

/// Application instance
pub struct Application {
    bot: Arc<Bot>,
    gateway: Arc<LocalGateway>,
    sinks: Arc<SinkManager>,
    credentials: Credentials,
}

impl Application {
    /// Build the application from settings
    pub fn build(settings: Settings) -> Result<Self> {
        let sinks = Arc::new(SinkManager::new());
        let gate = Arc::new(SingleCallGate::new());

        // Trace-log initialization goes through the single-call guard, so a
        // repeated build within one process skips instead of re-clearing the
        // log directory.
        let sink_config = settings.logging.sink_config();
        let init_sinks = Arc::clone(&sinks);
        let init_logging = SingleCallGuard::new(gate).wrap(
            CallTarget::function("init_logging", move |_| {
                init_sinks
                    .initialize_global(sink_config.clone())
                    .map(|_| crate::trace::Value::Bool(true))
            })
            .with_doc("Open the shared trace sink and clear old log files."),
        );
        init_logging
            .invoke(&CallArgs::new())
            .map_err(|e| anyhow!("trace log initialization failed: {}", e))?;
        tracing::info!(directory = %settings.logging.directory, "trace sinks ready");

        let tracer = Arc::new(CallTracer::new(Arc::clone(&sinks)));
        let gateway = Arc::new(LocalGateway::new());
        let bot = Bot::new(
            settings.bot.name.clone(),
            settings.bot.guild.clone(),
            settings.bot.home_channel.clone(),
            Arc::clone(&gateway) as Arc<dyn ChatClient>,
        );
        gateway.set_handlers(traced_handlers(&bot, &tracer));

        Ok(Self {
            bot,
            gateway,
            sinks,
            credentials: Credentials {
                token: settings.bot.token,
            },
        })
    }

    /// Connect and dispatch events until the session ends or the process is
    /// interrupted.
    pub async fn run_until_stopped(self) -> Result<()> {
        self.gateway.connect(&self.credentials).await?;
        tracing::info!(bot = %self.bot.name(), guild = %self.bot.guild(), "session running");

        tokio::select! {
            result = self.gateway.run() => result?,
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("interrupt received, shutting down");
                self.gateway.close();
            }
        }

        self.sinks.teardown_global();
        Ok(())
    }

    /// The gateway session, exposed so embedding code can feed events.
    pub fn gateway(&self) -> &Arc<LocalGateway> {
        &self.gateway
    }
}
