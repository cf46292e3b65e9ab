use anyhow::{anyhow, Result};
use serenity::{
    builder::{
        CreateActionRow, CreateEmbed, CreateInteractionResponse, CreateInteractionResponseMessage,
        EditInteractionResponse,
    },
    model::{
        application::{CommandInteraction, ComponentInteraction},
        id::{ChannelId, GuildId, UserId},
    },
    prelude::Context,
};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::{
    audio::{
        player::{GuildPlayer, QueueSnapshot},
        queue::QueuePage,
        session::PlayerError,
        track::QueuedTrack,
    },
    bot::RadioBot,
    ui::{
        buttons::{self, button_ids},
        embeds::{self, Status},
    },
};

/// Respuesta de un comando que opera sobre el reproductor
struct Reply {
    embed: CreateEmbed,
    components: Vec<CreateActionRow>,
}

impl Reply {
    fn embed(embed: CreateEmbed) -> Self {
        Self {
            embed,
            components: Vec::new(),
        }
    }
}

/// Respuesta a un botón: o se edita el mensaje o se avisa solo al usuario
enum ComponentReply {
    Update {
        embed: Option<CreateEmbed>,
        components: Vec<CreateActionRow>,
    },
    Notice(CreateEmbed),
}

/// Maneja comandos slash
pub async fn handle_command(
    ctx: &Context,
    command: CommandInteraction,
    bot: &RadioBot,
) -> Result<()> {
    let guild_id = command
        .guild_id
        .ok_or_else(|| anyhow!("Comando usado fuera de un servidor"))?;

    info!(
        "📝 Comando /{} usado por {} en guild {}",
        command.data.name, command.user.name, guild_id
    );

    match command.data.name.as_str() {
        "ping" => {
            reply(
                ctx,
                &command,
                embeds::create_info_embed("🏓 ¡Pong!", "El bot está respondiendo"),
                false,
            )
            .await?
        }
        "play" => handle_play(ctx, &command, bot, guild_id).await?,
        "search" => super::search::handle_search_command(ctx, &command, bot).await?,
        "stop" | "leave" => handle_leave(ctx, &command, bot, guild_id).await?,
        name => {
            let player = match listener_player(ctx, bot, guild_id, command.user.id) {
                Ok(player) => player,
                Err(embed) => return reply(ctx, &command, embed, true).await,
            };

            match run_player_command(name, &command, &player).await {
                Ok(response) => {
                    command
                        .create_response(
                            &ctx.http,
                            CreateInteractionResponse::Message(
                                CreateInteractionResponseMessage::new()
                                    .embed(response.embed)
                                    .components(response.components),
                            ),
                        )
                        .await?
                }
                Err(e) => {
                    warn!("Guild {} | /{} falló: {}", guild_id, name, e);
                    reply(ctx, &command, embeds::create_player_error_embed(&e), true).await?
                }
            }
        }
    }

    Ok(())
}

async fn run_player_command(
    name: &str,
    command: &CommandInteraction,
    player: &GuildPlayer,
) -> Result<Reply, PlayerError> {
    let reply = match name {
        "pause" => {
            player.pause().await?;
            Reply::embed(embeds::create_success_embed("⏸️ Pausado", "Reproducción pausada"))
        }
        "resume" => {
            player.resume().await?;
            Reply::embed(embeds::create_success_embed("▶️ Reanudado", "Reproducción reanudada"))
        }
        "skip" => match player.skip().await? {
            Some(track) => Reply::embed(skipped_embed(&track)),
            None => Reply::embed(embeds::create_status_embed(Status::QueueEnd)),
        },
        "prev" => {
            let track = player.previous().await?;
            Reply::embed(embeds::create_success_embed(
                "⏮️ Anterior",
                &format!("Volviendo a **{}**", track.title()),
            ))
        }
        "skipto" => {
            let index = option_index(command, "index")?;
            let track = player.skip_to(index).await?;
            Reply::embed(embeds::create_success_embed(
                "⏭️ Saltado",
                &format!("Saltando a **{}** (#{})", track.title(), index),
            ))
        }
        "remove" => {
            let track = player.remove(option_index(command, "index")?).await?;
            Reply::embed(embeds::create_success_embed(
                "➖ Eliminado",
                &format!("Se quitó **{}** de la cola", track.title()),
            ))
        }
        "move" => {
            let from = option_index(command, "from")?;
            let to = option_index(command, "to")?;
            let track = player.move_track(from, to).await?;
            Reply::embed(embeds::create_success_embed(
                "↕️ Movido",
                &format!("**{}** ahora está en la posición {}", track.title(), to),
            ))
        }
        "queue" => {
            let page = option_int(command, "page").unwrap_or(0);
            let (page, snapshot) = player.queue_page(page).await?;
            queue_view(&page, &snapshot)
        }
        "nowplaying" => {
            let snapshot = player.snapshot().await;
            let track = snapshot.current.clone().ok_or(PlayerError::QueueEmpty)?;
            Reply {
                embed: embeds::create_now_playing_embed(&track, &snapshot),
                components: vec![buttons::create_player_controls(
                    snapshot.paused,
                    snapshot.loop_one,
                )],
            }
        }
        "loop" => {
            let enabled = player.toggle_loop_one().await;
            Reply::embed(toggle_embed("🔂 Repetir canción", enabled))
        }
        "loopq" => {
            let enabled = player.toggle_loop_queue().await;
            Reply::embed(toggle_embed("🔁 Repetir cola", enabled))
        }
        "shuffle" => {
            let enabled = player.toggle_shuffle().await;
            Reply::embed(toggle_embed("🔀 Modo aleatorio", enabled))
        }
        "clear" => {
            player.clear().await?;
            Reply::embed(embeds::create_status_embed(Status::ClearQueue))
        }
        _ => Reply::embed(embeds::create_error_embed(
            "Comando Desconocido",
            "❌ Comando no reconocido",
        )),
    };

    Ok(reply)
}

/// Maneja interacciones con componentes (botones y menús)
pub async fn handle_component(
    ctx: &Context,
    component: ComponentInteraction,
    bot: &RadioBot,
) -> Result<()> {
    let guild_id = component
        .guild_id
        .ok_or_else(|| anyhow!("Componente usado fuera de un servidor"))?;

    info!(
        "🔘 Componente {} usado por {} en guild {}",
        component.data.custom_id, component.user.name, guild_id
    );

    if component.data.custom_id == button_ids::SEARCH_SELECT {
        return super::search::handle_track_selection(ctx, &component, bot).await;
    }

    let player = match listener_player(ctx, bot, guild_id, component.user.id) {
        Ok(player) => player,
        Err(embed) => {
            return send_component_reply(ctx, &component, ComponentReply::Notice(embed)).await
        }
    };

    let response = if component.data.custom_id == button_ids::PLAYER_STOP {
        bot.leave(guild_id).await?;
        ComponentReply::Update {
            embed: Some(embeds::create_status_embed(Status::Disconnect)),
            components: Vec::new(),
        }
    } else {
        match run_component(&component.data.custom_id, &player).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Guild {} | Botón {} falló: {}", guild_id, component.data.custom_id, e);
                ComponentReply::Notice(embeds::create_player_error_embed(&e))
            }
        }
    };

    send_component_reply(ctx, &component, response).await
}

async fn run_component(custom_id: &str, player: &GuildPlayer) -> Result<ComponentReply, PlayerError> {
    let response = match custom_id {
        button_ids::PLAYER_PAUSE | button_ids::PLAYER_RESUME | button_ids::PLAYER_LOOP => {
            match custom_id {
                button_ids::PLAYER_PAUSE => player.pause().await?,
                button_ids::PLAYER_RESUME => player.resume().await?,
                _ => {
                    player.toggle_loop_one().await;
                }
            }
            let snapshot = player.snapshot().await;
            ComponentReply::Update {
                embed: snapshot
                    .current
                    .as_ref()
                    .map(|track| embeds::create_now_playing_embed(track, &snapshot)),
                components: vec![buttons::create_player_controls(
                    snapshot.paused,
                    snapshot.loop_one,
                )],
            }
        }
        button_ids::PLAYER_SKIP => match player.skip().await? {
            Some(track) => ComponentReply::Notice(skipped_embed(&track)),
            None => ComponentReply::Notice(embeds::create_status_embed(Status::QueueEnd)),
        },
        button_ids::PLAYER_PREVIOUS => {
            let track = player.previous().await?;
            ComponentReply::Notice(embeds::create_success_embed(
                "⏮️ Anterior",
                &format!("Volviendo a **{}**", track.title()),
            ))
        }
        button_ids::QUEUE_PREVIOUS_PAGE => {
            let (page, snapshot) = player.jump_queue_page(-1).await?;
            queue_update(&page, &snapshot)
        }
        button_ids::QUEUE_NEXT_PAGE => {
            let (page, snapshot) = player.jump_queue_page(1).await?;
            queue_update(&page, &snapshot)
        }
        button_ids::QUEUE_LOOP | button_ids::QUEUE_SHUFFLE => {
            if custom_id == button_ids::QUEUE_LOOP {
                player.toggle_loop_queue().await;
            } else {
                player.toggle_shuffle().await;
            }
            let (page, snapshot) = player.jump_queue_page(0).await?;
            queue_update(&page, &snapshot)
        }
        button_ids::QUEUE_CLEAR => {
            player.clear().await?;
            ComponentReply::Update {
                embed: Some(embeds::create_status_embed(Status::ClearQueue)),
                components: Vec::new(),
            }
        }
        _ => ComponentReply::Notice(embeds::create_error_embed(
            "Acción Desconocida",
            "❌ Acción no reconocida",
        )),
    };

    Ok(response)
}

async fn send_component_reply(
    ctx: &Context,
    component: &ComponentInteraction,
    response: ComponentReply,
) -> Result<()> {
    let response = match response {
        ComponentReply::Update { embed, components } => {
            let mut message = CreateInteractionResponseMessage::new().components(components);
            if let Some(embed) = embed {
                message = message.embed(embed);
            }
            CreateInteractionResponse::UpdateMessage(message)
        }
        ComponentReply::Notice(embed) => CreateInteractionResponse::Message(
            CreateInteractionResponseMessage::new()
                .embed(embed)
                .ephemeral(true),
        ),
    };

    component.create_response(&ctx.http, response).await?;
    Ok(())
}

// Handlers específicos

async fn handle_play(
    ctx: &Context,
    command: &CommandInteraction,
    bot: &RadioBot,
    guild_id: GuildId,
) -> Result<()> {
    let query = option_str(command, "query").ok_or_else(|| anyhow!("Query no proporcionado"))?;

    command
        .create_response(
            &ctx.http,
            CreateInteractionResponse::Defer(CreateInteractionResponseMessage::new()),
        )
        .await?;

    let player = match join_listener(ctx, bot, guild_id, command.user.id, command.channel_id).await
    {
        Ok(player) => player,
        Err(embed) => {
            command
                .edit_response(&ctx.http, EditInteractionResponse::new().embed(embed))
                .await?;
            return Ok(());
        }
    };

    info!("🎵 /play de {}: {}", command.user.name, query);

    let embed = match play_query(&player, query, command.user.id).await {
        Ok(embed) => embed,
        Err(e) => {
            warn!("Guild {} | No se pudo reproducir '{}': {}", guild_id, query, e);
            embeds::create_player_error_embed(&e)
        }
    };

    command
        .edit_response(&ctx.http, EditInteractionResponse::new().embed(embed))
        .await?;

    Ok(())
}

async fn handle_leave(
    ctx: &Context,
    command: &CommandInteraction,
    bot: &RadioBot,
    guild_id: GuildId,
) -> Result<()> {
    if let Err(embed) = listener_player(ctx, bot, guild_id, command.user.id) {
        return reply(ctx, command, embed, true).await;
    }

    bot.leave(guild_id).await?;
    reply(ctx, command, embeds::create_status_embed(Status::Disconnect), false).await
}

/// Resuelve una consulta, la encola y describe lo que se agregó
pub(super) async fn play_query(
    player: &GuildPlayer,
    query: &str,
    requester: UserId,
) -> Result<CreateEmbed, PlayerError> {
    let resolved = player.resolve(query, requester).await?;
    let outcome = player.enqueue(resolved.tracks).await?;

    let embed = match (resolved.playlist, outcome.first) {
        (Some(name), _) => embeds::create_playlist_added_embed(&name, outcome.added),
        (None, Some((position, track))) => embeds::create_track_added_embed(&track, position),
        (None, None) => embeds::create_info_embed("Cola", "No se agregó ninguna canción"),
    };

    Ok(embed)
}

/// Reproductor del servidor, conectándolo al canal de voz del usuario si hace falta
pub(super) async fn join_listener(
    ctx: &Context,
    bot: &RadioBot,
    guild_id: GuildId,
    user_id: UserId,
    text_channel: ChannelId,
) -> Result<Arc<GuildPlayer>, CreateEmbed> {
    let voice_channel = get_user_voice_channel(ctx, guild_id, user_id).ok_or_else(not_in_voice)?;

    if let Some(player) = bot.player.get(guild_id) {
        if player.voice_channel() != voice_channel {
            return Err(wrong_channel(player.voice_channel()));
        }
        return Ok(player);
    }

    bot.connect_player(ctx, guild_id, voice_channel, text_channel)
        .await
        .map_err(|e| {
            error!("Error al conectar al canal de voz: {:?}", e);
            embeds::create_error_embed(
                "Error de Conexión",
                "No pude conectarme al canal de voz o al servidor de audio",
            )
        })
}

/// Reproductor del servidor, solo si el usuario escucha en el mismo canal
fn listener_player(
    ctx: &Context,
    bot: &RadioBot,
    guild_id: GuildId,
    user_id: UserId,
) -> Result<Arc<GuildPlayer>, CreateEmbed> {
    let voice_channel = get_user_voice_channel(ctx, guild_id, user_id).ok_or_else(not_in_voice)?;
    let player = bot
        .player
        .get(guild_id)
        .ok_or_else(|| embeds::create_player_error_embed(&PlayerError::NoSession))?;

    if player.voice_channel() != voice_channel {
        return Err(wrong_channel(player.voice_channel()));
    }
    Ok(player)
}

// Funciones auxiliares

fn get_user_voice_channel(ctx: &Context, guild_id: GuildId, user_id: UserId) -> Option<ChannelId> {
    let guild = guild_id.to_guild_cached(&ctx.cache)?;
    let channel_id = guild
        .voice_states
        .get(&user_id)
        .and_then(|voice_state| voice_state.channel_id);
    channel_id
}

fn not_in_voice() -> CreateEmbed {
    embeds::create_error_embed("Sin Canal de Voz", "Debes estar en un canal de voz")
}

fn wrong_channel(channel: ChannelId) -> CreateEmbed {
    embeds::create_error_embed(
        "Canal Equivocado",
        &format!("Tienes que estar en <#{}> para controlar la música", channel),
    )
}

fn option_str<'a>(command: &'a CommandInteraction, name: &str) -> Option<&'a str> {
    command
        .data
        .options
        .iter()
        .find(|opt| opt.name == name)
        .and_then(|opt| opt.value.as_str())
}

fn option_int(command: &CommandInteraction, name: &str) -> Option<usize> {
    command
        .data
        .options
        .iter()
        .find(|opt| opt.name == name)
        .and_then(|opt| opt.value.as_i64())
        .and_then(|value| usize::try_from(value).ok())
}

/// Posición 1-based obligatoria
fn option_index(command: &CommandInteraction, name: &str) -> Result<usize, PlayerError> {
    option_int(command, name)
        .filter(|index| *index >= 1)
        .ok_or(PlayerError::IndexOutOfRange)
}

fn queue_view(page: &QueuePage, snapshot: &QueueSnapshot) -> Reply {
    let components = if page.entries.is_empty() {
        Vec::new()
    } else {
        vec![buttons::create_queue_controls(page, snapshot)]
    };

    Reply {
        embed: embeds::create_queue_embed(page, snapshot),
        components,
    }
}

fn queue_update(page: &QueuePage, snapshot: &QueueSnapshot) -> ComponentReply {
    let view = queue_view(page, snapshot);
    ComponentReply::Update {
        embed: Some(view.embed),
        components: view.components,
    }
}

fn toggle_embed(title: &str, enabled: bool) -> CreateEmbed {
    let state = if enabled { "activado ✅" } else { "desactivado ❌" };
    embeds::create_success_embed(title, &format!("{} {}", title, state))
}

fn skipped_embed(track: &QueuedTrack) -> CreateEmbed {
    embeds::create_success_embed("⏭️ Saltado", &format!("Ahora suena **{}**", track.title()))
}

async fn reply(
    ctx: &Context,
    command: &CommandInteraction,
    embed: CreateEmbed,
    ephemeral: bool,
) -> Result<()> {
    command
        .create_response(
            &ctx.http,
            CreateInteractionResponse::Message(
                CreateInteractionResponseMessage::new()
                    .embed(embed)
                    .ephemeral(ephemeral),
            ),
        )
        .await?;
    Ok(())
}
