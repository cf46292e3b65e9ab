use anyhow::Result;
use serenity::{
    builder::{CreateCommand, CreateCommandOption},
    model::{application::Command, application::CommandOptionType, id::GuildId},
    prelude::Context,
};

fn all_commands() -> Vec<CreateCommand> {
    vec![
        play_command(),
        search_command(),
        pause_command(),
        resume_command(),
        skip_command(),
        prev_command(),
        skipto_command(),
        remove_command(),
        move_command(),
        queue_command(),
        nowplaying_command(),
        loop_command(),
        loopq_command(),
        shuffle_command(),
        clear_command(),
        stop_command(),
        leave_command(),
        ping_command(),
    ]
}

/// Registra comandos globales
pub async fn register_global_commands(ctx: &Context) -> Result<()> {
    Command::set_global_commands(&ctx.http, all_commands()).await?;
    Ok(())
}

/// Registra comandos para una guild específica (desarrollo)
pub async fn register_guild_commands(ctx: &Context, guild_id: GuildId) -> Result<()> {
    guild_id.set_commands(&ctx.http, all_commands()).await?;
    Ok(())
}

fn position_option(name: &str, description: &str) -> CreateCommandOption {
    CreateCommandOption::new(CommandOptionType::Integer, name, description)
        .required(true)
        .min_int_value(1)
}

// Comandos de reproducción

fn play_command() -> CreateCommand {
    CreateCommand::new("play")
        .description("Reproduce una canción o playlist")
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::String,
                "query",
                "URL o término de búsqueda",
            )
            .required(true),
        )
}

fn search_command() -> CreateCommand {
    CreateCommand::new("search")
        .description("Busca en YouTube y elige qué reproducir")
        .add_option(
            CreateCommandOption::new(CommandOptionType::String, "query", "Término de búsqueda")
                .required(true),
        )
}

fn pause_command() -> CreateCommand {
    CreateCommand::new("pause").description("Pausa la reproducción actual")
}

fn resume_command() -> CreateCommand {
    CreateCommand::new("resume").description("Reanuda la reproducción")
}

fn skip_command() -> CreateCommand {
    CreateCommand::new("skip").description("Salta a la siguiente canción")
}

fn prev_command() -> CreateCommand {
    CreateCommand::new("prev").description("Vuelve a la canción anterior")
}

fn skipto_command() -> CreateCommand {
    CreateCommand::new("skipto")
        .description("Salta a una canción de la cola")
        .add_option(position_option("index", "Posición en la cola"))
}

fn stop_command() -> CreateCommand {
    CreateCommand::new("stop").description("Detiene la música, limpia la cola y sale del canal")
}

// Comandos de cola

fn remove_command() -> CreateCommand {
    CreateCommand::new("remove")
        .description("Quita una canción de la cola")
        .add_option(position_option("index", "Posición en la cola"))
}

fn move_command() -> CreateCommand {
    CreateCommand::new("move")
        .description("Mueve una canción a otra posición")
        .add_option(position_option("from", "Posición actual"))
        .add_option(position_option("to", "Nueva posición"))
}

fn queue_command() -> CreateCommand {
    CreateCommand::new("queue")
        .description("Muestra la cola de reproducción")
        .add_option(
            CreateCommandOption::new(CommandOptionType::Integer, "page", "Número de página")
                .required(false)
                .min_int_value(1),
        )
}

fn nowplaying_command() -> CreateCommand {
    CreateCommand::new("nowplaying").description("Muestra la canción actual")
}

fn loop_command() -> CreateCommand {
    CreateCommand::new("loop").description("Activa/desactiva repetir la canción actual")
}

fn loopq_command() -> CreateCommand {
    CreateCommand::new("loopq").description("Activa/desactiva repetir la cola")
}

fn shuffle_command() -> CreateCommand {
    CreateCommand::new("shuffle").description("Activa/desactiva el modo aleatorio")
}

fn clear_command() -> CreateCommand {
    CreateCommand::new("clear").description("Limpia la cola de reproducción")
}

// Comandos de utilidad

fn leave_command() -> CreateCommand {
    CreateCommand::new("leave").description("Desconecta el bot del canal de voz")
}

fn ping_command() -> CreateCommand {
    CreateCommand::new("ping").description("Comprueba que el bot responde")
}
