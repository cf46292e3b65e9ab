//! # Bot Module
//!
//! Discord side of Radio Bot.
//!
//! This module contains:
//! - Command registration and dispatch
//! - Button and select-menu handling
//! - Voice state tracking (idle disconnect, external disconnects)
//! - Announcements posted on behalf of the guild players
//!
//! ## Architecture
//!
//! [`RadioBot`] implements Serenity's [`EventHandler`]. Per-guild playback
//! state lives in the shared [`AudioPlayer`]; the Lavalink client is stored in
//! the context data under [`LavalinkManager`].
//!
//! ## Example
//!
//! ```rust,ignore
//! use radio_bot::{audio::player::AudioPlayer, bot::RadioBot, config::Config};
//! use std::sync::Arc;
//!
//! let config = Config::load()?;
//! let player = Arc::new(AudioPlayer::new(config.max_queue_size));
//! let bot = RadioBot::new(config, player);
//! ```

use anyhow::{Context as _, Result};
use serenity::{
    all::{ChannelId, Context, EventHandler, GuildId, Interaction, Ready, VoiceState},
    async_trait,
};
use std::sync::Arc;
use tracing::{error, info, warn};

pub mod commands;
pub mod events;
pub mod handlers;
pub mod idle;
pub mod search;

use idle::IdleTimers;

use crate::{
    audio::{
        lavalink::LavalinkManager,
        player::{AudioPlayer, GuildPlayer},
    },
    config::Config,
    ui::embeds::Status,
};

/// Main Discord bot handler for Radio Bot.
///
/// ## Fields
///
/// - `config`: Bot configuration (tokens, limits, timers)
/// - `player`: Registry of per-guild players
/// - `idle_timers`: Pending idle-disconnect tasks per guild
pub struct RadioBot {
    config: Arc<Config>,
    pub player: Arc<AudioPlayer>,
    idle_timers: IdleTimers,
}

impl RadioBot {
    pub fn new(config: Config, player: Arc<AudioPlayer>) -> Self {
        Self {
            config: Arc::new(config),
            player,
            idle_timers: IdleTimers::default(),
        }
    }

    /// Registers slash commands with Discord.
    ///
    /// Guild commands (when `GUILD_ID` is set) propagate almost instantly;
    /// global commands can take up to an hour.
    async fn register_commands(&self, ctx: &Context) -> Result<()> {
        info!("📝 Registrando comandos slash...");
        info!("🔧 Application ID: {}", self.config.application_id);

        match self.config.guild_id {
            Some(guild_id) => {
                let guild_id = GuildId::new(guild_id);
                info!("🏠 Registrando comandos para guild específica: {}", guild_id);

                if !ctx.cache.guilds().contains(&guild_id) {
                    warn!("⚠️ El bot no está en la guild especificada: {}", guild_id);
                    return Ok(());
                }

                commands::register_guild_commands(ctx, guild_id)
                    .await
                    .context("No se pudieron registrar comandos de guild")?;
                info!("✅ Comandos de guild registrados para: {}", guild_id);
            }
            None => {
                info!("🌐 Registrando comandos globalmente");
                commands::register_global_commands(ctx)
                    .await
                    .context("No se pudieron registrar comandos globales")?;
                info!("✅ Comandos globales registrados");
            }
        }

        Ok(())
    }

    /// Cliente Lavalink guardado en los datos del contexto
    pub async fn lavalink(&self, ctx: &Context) -> Result<Arc<LavalinkManager>> {
        ctx.data
            .read()
            .await
            .get::<LavalinkManager>()
            .cloned()
            .context("Lavalink no inicializado")
    }

    /// Reproductor del servidor, entrando al canal de voz si hace falta
    pub async fn connect_player(
        &self,
        ctx: &Context,
        guild_id: GuildId,
        voice_channel: ChannelId,
        text_channel: ChannelId,
    ) -> Result<Arc<GuildPlayer>> {
        let lavalink = self.lavalink(ctx).await?;
        lavalink
            .connect(ctx, &self.player, guild_id, voice_channel, text_channel)
            .await
    }

    /// Limpia la cola, sale del canal y olvida el reproductor del servidor
    pub async fn leave(&self, guild_id: GuildId) -> Result<bool> {
        self.idle_timers.cancel(guild_id);

        let Some(player) = self.player.remove(guild_id) else {
            return Ok(false);
        };
        player.stop().await?;

        info!("👋 Desconectado del canal de voz en guild {}", guild_id);
        Ok(true)
    }

    fn schedule_idle_disconnect(&self, ctx: &Context, guild_id: GuildId) {
        let ctx = ctx.clone();
        let players = Arc::clone(&self.player);
        let timeout = self.config.idle_timeout;

        let scheduled = self.idle_timers.schedule(guild_id, timeout, async move {
            let Some(player) = players.get(guild_id) else {
                return;
            };
            if listeners(&ctx, guild_id, player.voice_channel()) > 0 {
                return;
            }

            players.remove(guild_id);
            if let Err(e) = player.stop().await {
                error!("Error al desconectar por inactividad: {:?}", e);
            }
            events::send_status(&ctx.http, player.text_channel(), Status::Inactivity).await;
            info!("💤 Desconectado por inactividad en guild {}", guild_id);
        });

        if scheduled {
            info!(
                "🚪 Programando auto-desconexión por inactividad en guild {} ({})",
                guild_id,
                humantime::format_duration(timeout)
            );
        }
    }
}

/// Usuarios (sin contar al bot) conectados a un canal de voz
fn listeners(ctx: &Context, guild_id: GuildId, channel: ChannelId) -> usize {
    let bot_id = ctx.cache.current_user().id;

    ctx.cache
        .guild(guild_id)
        .map(|guild| {
            guild
                .voice_states
                .values()
                .filter(|state| state.channel_id == Some(channel) && state.user_id != bot_id)
                .count()
        })
        .unwrap_or(0)
}

#[async_trait]
impl EventHandler for RadioBot {
    /// Called when the bot is ready and connected to Discord.
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("🤖 {} está en línea!", ready.user.name);
        info!("📊 Conectado a {} servidores", ready.guilds.len());

        if let Err(e) = self.register_commands(&ctx).await {
            error!("Error al registrar comandos: {:?}", e);
        }
    }

    /// Handles slash commands, button clicks and select menus.
    ///
    /// Errors are logged but don't crash the bot.
    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        match interaction {
            Interaction::Command(command_interaction) => {
                if let Err(e) = handlers::handle_command(&ctx, command_interaction, self).await {
                    error!("Error manejando comando: {:?}", e);
                }
            }
            Interaction::Component(component_interaction) => {
                if let Err(e) = handlers::handle_component(&ctx, component_interaction, self).await
                {
                    error!("Error manejando componente: {:?}", e);
                }
            }
            _ => {}
        }
    }

    /// Handles voice state updates for users and the bot.
    ///
    /// - **Bot disconnected**: drops the guild player
    /// - **Bot alone**: schedules an idle disconnect
    /// - **Someone joins back**: cancels it
    async fn voice_state_update(&self, ctx: Context, old: Option<VoiceState>, new: VoiceState) {
        let Some(guild_id) = new.guild_id else {
            return;
        };

        let current_user_id = ctx.cache.current_user().id;
        if new.user_id == current_user_id && old.is_some() && new.channel_id.is_none() {
            info!("🔌 Bot desconectado en guild {}", guild_id);
            if let Err(e) = self.leave(guild_id).await {
                error!("Error al limpiar tras la desconexión: {:?}", e);
            }
            return;
        }

        let Some(player) = self.player.get(guild_id) else {
            return;
        };

        if listeners(&ctx, guild_id, player.voice_channel()) == 0 {
            self.schedule_idle_disconnect(&ctx, guild_id);
        } else {
            self.idle_timers.cancel(guild_id);
        }
    }
}
