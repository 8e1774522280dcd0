//! # Matrix Service Adapter
//!
//! Implements the `ChatProvider` trait for the Matrix protocol using the
//! `matrix_sdk`. This module is the bridge between the generic `ChatProvider`
//! interface used by the bot's core logic and the Matrix SDK specifics.

use anyhow::{Context, Result};
use async_trait::async_trait;
use matrix_sdk::room::Room;
use matrix_sdk::ruma::events::room::message::RoomMessageEventContent;

use crate::domain::traits::ChatProvider;

#[derive(Clone)]
pub struct MatrixService {
    room: Room,
}

impl MatrixService {
    pub fn new(room: Room) -> Self {
        Self { room }
    }
}

#[async_trait]
impl ChatProvider for MatrixService {
    fn room_id(&self) -> String {
        self.room.room_id().as_str().to_string()
    }

    async fn send_message(&self, content: &str) -> Result<()> {
        tracing::debug!(room = %self.room_id(), "sending message");
        self.room
            .send(RoomMessageEventContent::text_markdown(content))
            .await
            .context("failed to send Matrix message")?;
        Ok(())
    }

    async fn send_notification(&self, content: &str) -> Result<()> {
        // Notifications are plain markdown messages for now.
        self.send_message(content).await
    }

    async fn typing(&self, active: bool) -> Result<()> {
        self.room
            .typing_notice(active)
            .await
            .context("failed to send typing notice")?;
        Ok(())
    }
}
