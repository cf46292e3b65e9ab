use serenity::{
    builder::CreateMessage,
    http::Http,
    model::{channel::Message, id::ChannelId},
};
use std::{sync::Arc, time::Duration};
use tracing::{debug, error, info};

use crate::{
    audio::player::{GuildPlayer, TrackEndOutcome},
    ui::{
        buttons,
        embeds::{self, Status},
    },
};

/// Publica el mensaje "Reproduciendo Ahora" con sus controles
pub async fn announce_now_playing(http: &Arc<Http>, player: &GuildPlayer) {
    let snapshot = player.snapshot().await;
    let Some(track) = snapshot.current.clone() else {
        debug!("Guild {} | Track iniciado con la cola vacía", player.guild_id());
        return;
    };

    info!(
        "Guild {} | ▶️ Reproduciendo: {}",
        player.guild_id(),
        track.title()
    );

    let message = CreateMessage::new()
        .embed(embeds::create_now_playing_embed(&track, &snapshot))
        .components(vec![buttons::create_player_controls(snapshot.paused, snapshot.loop_one)]);

    if let Err(e) = player.text_channel().send_message(http, message).await {
        error!("Error al enviar mensaje now playing: {:?}", e);
    }
}

/// Publica lo que pasó al terminar un track
pub async fn announce_track_end(
    http: &Arc<Http>,
    player: &GuildPlayer,
    outcome: TrackEndOutcome,
    status_ttl: Duration,
) {
    match outcome {
        // el siguiente se anuncia cuando Lavalink avise que empezó
        TrackEndOutcome::Nothing | TrackEndOutcome::Advanced(_) => {}
        TrackEndOutcome::QueueEnded => {
            send_expiring_status(http, player.text_channel(), Status::QueueEnd, status_ttl).await;
        }
        TrackEndOutcome::LoadFailed { failed, next } => {
            let description = match next {
                Some(next) => format!(
                    "No se pudo reproducir **{}**. Pasando a **{}**",
                    failed,
                    next.title()
                ),
                None => format!("No se pudo reproducir **{}**", failed),
            };
            let message = CreateMessage::new()
                .embed(embeds::create_error_embed("Error de Carga", &description));

            if let Err(e) = player.text_channel().send_message(http, message).await {
                error!("Error al enviar aviso de carga fallida: {:?}", e);
            }
        }
    }
}

/// Envía un aviso de estado al canal
pub async fn send_status(http: &Arc<Http>, channel: ChannelId, status: Status) -> Option<Message> {
    let message = CreateMessage::new().embed(embeds::create_status_embed(status));

    match channel.send_message(http, message).await {
        Ok(message) => Some(message),
        Err(e) => {
            error!("Error al enviar aviso {:?}: {:?}", status, e);
            None
        }
    }
}

/// Envía un aviso de estado que se borra solo después de `ttl`
pub async fn send_expiring_status(
    http: &Arc<Http>,
    channel: ChannelId,
    status: Status,
    ttl: Duration,
) {
    let Some(message) = send_status(http, channel, status).await else {
        return;
    };

    let http = Arc::clone(http);
    tokio::spawn(async move {
        tokio::time::sleep(ttl).await;
        if let Err(e) = message.delete(&http).await {
            debug!("No se pudo borrar el aviso {}: {:?}", message.id, e);
        }
    });
}
