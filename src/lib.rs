//! ytscript - YouTube script extraction and Korean translation
//!
//! Turns a YouTube link into a text script: published captions when the
//! video has them, local speech recognition when it does not. English
//! scripts are translated to Korean and both are saved next to each other.

pub mod acquire;
pub mod artifacts;
pub mod channel;
pub mod cli;
pub mod config;
pub mod error;
pub mod language;
pub mod media;
pub mod player;
pub mod setup;
pub mod text;
pub mod transcribe;
pub mod transcript;
pub mod translate;
pub mod video;
pub mod workflow;
