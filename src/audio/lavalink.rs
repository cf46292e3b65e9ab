use anyhow::{Context as _, Result};
use async_trait::async_trait;
use lavalink_rs::{
    client::LavalinkClient,
    hook,
    model::{
        events,
        player::ConnectionInfo,
        track::{TrackData, TrackLoadData, TrackLoadType},
        GuildId as LavalinkGuildId, UserId as LavalinkUserId,
    },
    node::NodeBuilder,
    player_context::PlayerContext,
    prelude::NodeDistributionStrategy,
};
use serenity::{
    http::Http,
    model::id::{ChannelId, GuildId, UserId},
    prelude::{Context, TypeMapKey},
};
use songbird::Songbird;
use std::{future::Future, sync::Arc, time::Duration};
use tracing::{debug, error, info, warn};

use super::{
    player::{AudioPlayer, GuildPlayer},
    session::{LoadResult, PlaybackSession, PlayerError, TrackEndReason},
};
use crate::{bot::events as announce, config::Config};

/// Datos compartidos con los hooks de eventos de Lavalink
struct HookData {
    player: Arc<AudioPlayer>,
    http: Arc<Http>,
    status_ttl: Duration,
}

/// Cliente Lavalink del bot.
pub struct LavalinkManager {
    client: LavalinkClient,
    default_volume: u16,
}

impl TypeMapKey for LavalinkManager {
    type Value = Arc<LavalinkManager>;
}

impl LavalinkManager {
    pub async fn new(
        config: &Config,
        user_id: UserId,
        player: Arc<AudioPlayer>,
        http: Arc<Http>,
    ) -> Result<Self> {
        let nodes: Vec<NodeBuilder> = config
            .lavalink_nodes
            .iter()
            .map(|node| {
                info!("Conectando a Lavalink en {}", node.address());
                NodeBuilder {
                    hostname: node.address(),
                    is_ssl: config.lavalink_secure,
                    events: events::Events::default(),
                    password: config.lavalink_password.clone(),
                    user_id: LavalinkUserId(user_id.get()),
                    session_id: None,
                }
            })
            .collect();

        if nodes.is_empty() {
            anyhow::bail!("No hay nodos Lavalink configurados");
        }

        let hooks = events::Events {
            ready: Some(ready),
            track_start: Some(track_start),
            track_end: Some(track_end),
            track_exception: Some(track_exception),
            ..Default::default()
        };

        let data = Arc::new(HookData {
            player,
            http,
            status_ttl: config.status_message_ttl,
        });

        let client = LavalinkClient::new_with_data(
            hooks,
            nodes,
            NodeDistributionStrategy::round_robin(),
            data,
        )
        .await;

        Ok(Self {
            client,
            default_volume: config.default_volume,
        })
    }

    /// Entra al canal de voz y devuelve el reproductor del servidor
    pub async fn connect(
        &self,
        ctx: &Context,
        players: &AudioPlayer,
        guild_id: GuildId,
        voice_channel: ChannelId,
        text_channel: ChannelId,
    ) -> Result<Arc<GuildPlayer>> {
        if let Some(player) = players.get(guild_id) {
            return Ok(player);
        }

        let songbird = songbird::get(ctx)
            .await
            .context("Songbird no está registrado")?;

        let (info, _call) = songbird
            .join_gateway(guild_id, voice_channel)
            .await
            .context("Error al unirse al canal de voz")?;

        let connection = ConnectionInfo {
            endpoint: info.endpoint,
            token: info.token,
            session_id: info.session_id,
        };

        let context = self
            .client
            .create_player_context(LavalinkGuildId(guild_id.get()), connection)
            .await
            .context("Error al crear el reproductor en Lavalink")?;

        if self.default_volume != 100 {
            context
                .set_volume(self.default_volume)
                .await
                .context("Error al ajustar el volumen")?;
        }

        info!("Guild {} | 🔊 Conectado a {}", guild_id, voice_channel);

        let session = Arc::new(LavalinkSession {
            client: self.client.clone(),
            guild_id,
            songbird,
        });

        Ok(players.connect(guild_id, session, text_channel, voice_channel))
    }
}

/// Sesión de voz de un servidor sobre Lavalink.
pub struct LavalinkSession {
    client: LavalinkClient,
    guild_id: GuildId,
    songbird: Arc<Songbird>,
}

impl LavalinkSession {
    fn lavalink_guild(&self) -> LavalinkGuildId {
        LavalinkGuildId(self.guild_id.get())
    }

    fn context(&self) -> Result<PlayerContext, PlayerError> {
        self.client
            .get_player_context(self.lavalink_guild())
            .ok_or(PlayerError::NoSession)
    }
}

fn backend<E: std::fmt::Display>(e: E) -> PlayerError {
    PlayerError::Backend(e.to_string())
}

#[async_trait]
impl PlaybackSession for LavalinkSession {
    async fn load_tracks(&self, query: &str) -> Result<LoadResult, PlayerError> {
        let loaded = self
            .client
            .load_tracks(self.lavalink_guild(), query)
            .await
            .map_err(backend)?;

        let result = match loaded.data {
            Some(TrackLoadData::Track(track)) => LoadResult::Track(track),
            Some(TrackLoadData::Search(tracks)) => LoadResult::Search(tracks),
            Some(TrackLoadData::Playlist(playlist)) => LoadResult::Playlist {
                name: playlist.info.name,
                tracks: playlist.tracks,
            },
            Some(TrackLoadData::Error(error)) => LoadResult::Error(error.message),
            None if matches!(loaded.load_type, TrackLoadType::Empty) => LoadResult::Empty,
            None => return Err(PlayerError::InvalidResult(query.to_string())),
        };

        Ok(result)
    }

    async fn play(&self, track: &TrackData) -> Result<(), PlayerError> {
        self.context()?.play_now(track).await.map_err(backend)?;
        Ok(())
    }

    async fn pause(&self) -> Result<(), PlayerError> {
        self.context()?.set_pause(true).await.map_err(backend)?;
        Ok(())
    }

    async fn resume(&self) -> Result<(), PlayerError> {
        self.context()?.set_pause(false).await.map_err(backend)?;
        Ok(())
    }

    async fn stop(&self) -> Result<(), PlayerError> {
        self.context()?.stop_now().await.map_err(backend)?;
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), PlayerError> {
        release_voice(
            self.guild_id,
            async { self.client.delete_player(self.lavalink_guild()).await.map_err(backend) },
            self.songbird.remove(self.guild_id),
        )
        .await
    }
}

/// Borra el reproductor de Lavalink y sale de la llamada de voz.
///
/// Se sale de la llamada aunque Lavalink falle; el error que se devuelve es
/// el del borrado.
async fn release_voice<D, L, E>(
    guild_id: GuildId,
    delete_player: D,
    leave_call: L,
) -> Result<(), PlayerError>
where
    D: Future<Output = Result<(), PlayerError>>,
    L: Future<Output = Result<(), E>>,
    E: std::fmt::Display,
{
    let deleted = delete_player.await;
    if let Err(e) = &deleted {
        warn!("Guild {} | No se pudo borrar el reproductor de Lavalink: {}", guild_id, e);
    }

    if let Err(e) = leave_call.await {
        debug!("Guild {} | Songbird ya estaba desconectado: {}", guild_id, e);
    }

    deleted
}

fn end_reason(reason: &events::TrackEndReason) -> TrackEndReason {
    match reason {
        events::TrackEndReason::Finished => TrackEndReason::Finished,
        events::TrackEndReason::LoadFailed => TrackEndReason::LoadFailed,
        events::TrackEndReason::Stopped => TrackEndReason::Stopped,
        events::TrackEndReason::Replaced => TrackEndReason::Replaced,
        events::TrackEndReason::Cleanup => TrackEndReason::Cleanup,
    }
}

#[hook]
async fn ready(_client: LavalinkClient, session_id: String, _event: &events::Ready) {
    info!("✅ Lavalink listo (sesión {})", session_id);
}

#[hook]
async fn track_start(client: LavalinkClient, _session_id: String, event: &events::TrackStart) {
    let Ok(data) = client.data::<HookData>() else {
        error!("Datos de Lavalink no disponibles");
        return;
    };

    let guild_id = GuildId::new(event.guild_id.0);
    match data.player.get(guild_id) {
        Some(player) => announce::announce_now_playing(&data.http, &player).await,
        None => debug!("Guild {} | Track iniciado sin reproductor", guild_id),
    }
}

#[hook]
async fn track_end(client: LavalinkClient, _session_id: String, event: &events::TrackEnd) {
    let Ok(data) = client.data::<HookData>() else {
        error!("Datos de Lavalink no disponibles");
        return;
    };

    let guild_id = GuildId::new(event.guild_id.0);
    let Some(player) = data.player.get(guild_id) else {
        debug!("Guild {} | Track terminado sin reproductor", guild_id);
        return;
    };

    match player.handle_track_end(end_reason(&event.reason)).await {
        Ok(outcome) => {
            announce::announce_track_end(&data.http, &player, outcome, data.status_ttl).await
        }
        Err(e) => error!("Guild {} | Error al avanzar la cola: {}", guild_id, e),
    }
}

#[hook]
async fn track_exception(_client: LavalinkClient, _session_id: String, event: &events::TrackException) {
    warn!(
        "Guild {} | ⚠️ Excepción en {}: {:?}",
        event.guild_id.0, event.track.info.title, event.exception
    );
}
