use anyhow::{anyhow, Result};
use serenity::{
    builder::{CreateInteractionResponse, CreateInteractionResponseMessage, EditInteractionResponse},
    model::application::{CommandInteraction, ComponentInteraction, ComponentInteractionDataKind},
    prelude::Context,
};
use tracing::{info, warn};

use super::handlers::{join_listener, play_query};
use crate::{
    bot::RadioBot,
    ui::{buttons, embeds},
};

/// Maneja el comando de búsqueda con selección de resultados
pub async fn handle_search_command(
    ctx: &Context,
    command: &CommandInteraction,
    bot: &RadioBot,
) -> Result<()> {
    let guild_id = command
        .guild_id
        .ok_or_else(|| anyhow!("Comando usado fuera de un servidor"))?;

    let query = command
        .data
        .options
        .iter()
        .find(|opt| opt.name == "query")
        .and_then(|opt| opt.value.as_str())
        .ok_or_else(|| anyhow!("Query no proporcionado"))?;

    command
        .create_response(
            &ctx.http,
            CreateInteractionResponse::Defer(CreateInteractionResponseMessage::new()),
        )
        .await?;

    info!("🔍 Búsqueda iniciada por {}: {}", command.user.name, query);

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

    let response = match player.search(query).await {
        Ok(results) => EditInteractionResponse::new()
            .embed(embeds::create_search_results_embed(query, &results))
            .components(vec![buttons::create_search_menu(&results)]),
        Err(e) => {
            warn!("Guild {} | Búsqueda '{}' sin resultados: {}", guild_id, query, e);
            EditInteractionResponse::new().embed(embeds::create_player_error_embed(&e))
        }
    };

    command.edit_response(&ctx.http, response).await?;
    Ok(())
}

/// Maneja la canción elegida en el menú de resultados
pub async fn handle_track_selection(
    ctx: &Context,
    interaction: &ComponentInteraction,
    bot: &RadioBot,
) -> Result<()> {
    let guild_id = interaction
        .guild_id
        .ok_or_else(|| anyhow!("Interacción fuera de un servidor"))?;

    // el valor de cada opción es la URI del track
    let uri = match &interaction.data.kind {
        ComponentInteractionDataKind::StringSelect { values } => values.first().cloned(),
        _ => None,
    }
    .ok_or_else(|| anyhow!("Selección vacía"))?;

    interaction.defer(&ctx.http).await?;

    info!("✅ Canción seleccionada por {}: {}", interaction.user.name, uri);

    let player = match join_listener(
        ctx,
        bot,
        guild_id,
        interaction.user.id,
        interaction.channel_id,
    )
    .await
    {
        Ok(player) => player,
        Err(embed) => {
            interaction
                .edit_response(
                    &ctx.http,
                    EditInteractionResponse::new()
                        .embed(embed)
                        .components(Vec::new()),
                )
                .await?;
            return Ok(());
        }
    };

    let embed = match play_query(&player, &uri, interaction.user.id).await {
        Ok(embed) => embed,
        Err(e) => {
            warn!("Guild {} | No se pudo encolar {}: {}", guild_id, uri, e);
            embeds::create_player_error_embed(&e)
        }
    };

    interaction
        .edit_response(
            &ctx.http,
            EditInteractionResponse::new()
                .embed(embed)
                .components(Vec::new()),
        )
        .await?;

    Ok(())
}
