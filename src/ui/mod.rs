//! Embeds and message components shown by the bot.

pub mod buttons;
pub mod embeds;
