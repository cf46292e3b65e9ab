//! # Audio Module
//!
//! Queue and playback coordination for Radio Bot.
//!
//! Decoding and streaming happen on a Lavalink node; this module decides
//! *what* plays and keeps one queue per guild consistent while commands and
//! backend events arrive concurrently.
//!
//! ## Architecture
//!
//! ### [`track`] - Track Record
//! - A Lavalink track plus the requester and enqueue time
//! - Shared as `Arc` so the sequential and shuffled lists hold the same record
//!
//! ### [`queue`] - Queue Management
//! - Sequential list, shuffled projection and the "current track" cursor
//! - Loop-one, loop-queue and shuffle modes
//! - Navigation (next, previous, skip-to, remove, move) and pagination
//!
//! ### [`session`] - Playback Session boundary
//! - `PlaybackSession` trait: load, play, pause, resume, stop, disconnect
//! - Error kinds surfaced to the command layer
//!
//! ### [`player`] - Guild Players
//! - `GuildPlayer` serializes every queue step behind one async mutex
//! - Track-end state machine (finished, load failed, stopped, replaced)
//! - `AudioPlayer` registry keyed by guild
//!
//! ### [`lavalink`] - Lavalink adapter
//! - Node list, voice join through songbird, event hooks
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use radio_bot::audio::{player::AudioPlayer, track::QueuedTrack};
//! use serenity::all::{GuildId, UserId};
//!
//! # async fn example(players: AudioPlayer) -> anyhow::Result<()> {
//! let guild_id = GuildId::new(123456789);
//! if let Some(player) = players.get(guild_id) {
//!     let resolved = player.resolve("daft punk one more time", UserId::new(1)).await?;
//!     player.enqueue(resolved.tracks).await?;
//!     player.skip().await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod lavalink;
pub mod player;
pub mod queue;
pub mod session;
pub mod track;
