//! # Interface Layer
//!
//! The command surface exposed to chat users.

pub mod commands;
