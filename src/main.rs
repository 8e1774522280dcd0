#![recursion_limit = "256"]
//! # Main Entry Point
//!
//! Initializes the application:
//! - Domain: Configuration and Types
//! - Infrastructure: Matrix, SHKeeper
//! - Application: Ledger, Registry, Dispatcher, Payment Monitor
//! - Interface: Command Handlers

mod application;
mod domain;
mod infrastructure;
mod interface;
mod strings;

use anyhow::{Context, Result};
use clap::Parser;
use matrix_sdk::{
    Client,
    config::SyncSettings,
    room::Room,
    ruma::events::room::{
        member::{MembershipState, StrippedRoomMemberEvent},
        message::{MessageType, SyncRoomMessageEvent},
    },
};
use std::path::PathBuf;
use std::sync::Arc;

use crate::application::dispatcher::Dispatcher;
use crate::application::ledger::Ledger;
use crate::application::monitor::PaymentMonitor;
use crate::application::pricing::HeuristicPricer;
use crate::domain::config::AppConfig;
use crate::domain::traits::{ChatProvider, MarketData, NoMarketData, PaymentProvider, Pricer};
use crate::infrastructure::matrix::MatrixService;
use crate::infrastructure::shkeeper::ShkeeperClient;

#[derive(Parser)]
#[command(name = "barter", about = "A merchant agent for Matrix rooms")]
struct Cli {
    /// Path to config.yaml (defaults to ./config.yaml, then the user config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1. Load Configuration (fatal on error)
    let config = AppConfig::load(cli.config.as_deref())?;

    // 2. Logging Setup
    let data_dir = std::path::Path::new(&config.system.data_dir);
    if !data_dir.exists() {
        std::fs::create_dir_all(data_dir).context("Failed to create data directory")?;
    }

    let file_appender = tracing_appender::rolling::never(data_dir, "session.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.system.log_filter));

    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .init();

    tracing::info!("Starting barter...");

    // 3. Collaborators
    let ledger = Arc::new(Ledger::new(&config.treasury));
    let payments: Arc<dyn PaymentProvider> =
        Arc::new(ShkeeperClient::new(&config.services.shkeeper)?);
    let pricer: Arc<dyn Pricer> = Arc::new(HeuristicPricer::new(ledger.per_transaction_limit()));
    let market: Arc<dyn MarketData> = Arc::new(NoMarketData);
    let monitor = Arc::new(PaymentMonitor::new(
        payments.clone(),
        ledger.clone(),
        &config.monitor,
    ));
    let registry = Arc::new(interface::commands::build_registry(&config)?);

    // 4. Matrix Setup
    let client = Client::builder()
        .homeserver_url(&config.services.matrix.homeserver)
        .build()
        .await?;

    client
        .matrix_auth()
        .login_username(
            &config.services.matrix.username,
            &config.services.matrix.password,
        )
        .send()
        .await?;

    tracing::info!("Logged in as {}", config.services.matrix.username);

    if let Some(name) = &config.services.matrix.display_name {
        if let Err(e) = client.account().set_display_name(Some(name.as_str())).await {
            tracing::warn!(error = %e, "failed to set display name");
        }
    }

    let bot_user_id = client
        .user_id()
        .map(|id| id.to_string())
        .context("logged-in client has no user id")?;

    let dispatcher = Arc::new(Dispatcher::new(
        registry,
        bot_user_id,
        ledger.clone(),
        payments,
        pricer,
        market,
        monitor.clone(),
    ));

    // 5. Event Handlers
    let start_time = std::time::SystemTime::now();
    let message_dispatcher = dispatcher.clone();

    client.add_event_handler(move |ev: SyncRoomMessageEvent, room: Room| {
        let dispatcher = message_dispatcher.clone();
        async move {
            let Some(original) = ev.as_original() else {
                return;
            };

            // Ignore history replayed by the initial sync
            let ts = ev.origin_server_ts();
            let event_time =
                std::time::UNIX_EPOCH + std::time::Duration::from_millis(ts.get().into());
            if event_time < start_time {
                return;
            }

            if let MessageType::Text(text) = &original.content.msgtype {
                let chat: Arc<dyn ChatProvider> = Arc::new(MatrixService::new(room));
                let _ = dispatcher.dispatch(chat, original.sender.as_str(), &text.body);
            }
        }
    });

    // Auto-join on invite, then introduce ourselves
    client.add_event_handler(
        |ev: StrippedRoomMemberEvent, room: Room, client: Client| async move {
            let Some(our_id) = client.user_id() else {
                return;
            };
            if ev.state_key.as_str() != our_id.as_str() {
                return;
            }
            if ev.content.membership != MembershipState::Invite {
                return;
            }

            tracing::info!(room = %room.room_id(), "auto-joining room");
            if let Err(e) = room.join().await {
                tracing::error!(error = %e, "failed to join room");
                return;
            }
            let chat = MatrixService::new(room);
            let _ = chat.send_message(strings::messages::WELCOME).await;
        },
    );

    // 6. Sync until shutdown
    let sync_client = client.clone();
    let sync_handle = tokio::spawn(async move { sync_client.sync(SyncSettings::default()).await });

    tokio::select! {
        result = sync_handle => {
            match result {
                Ok(Err(e)) => tracing::error!(error = %e, "Matrix sync ended"),
                Err(e) => tracing::error!(error = %e, "Matrix sync panicked"),
                Ok(Ok(())) => {}
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutting down...");
        }
    }

    monitor.shutdown();
    ledger.log_summary();
    Ok(())
}
