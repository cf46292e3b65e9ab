use lavalink_rs::model::track::TrackData;
use serenity::{
    all::Timestamp,
    builder::{CreateEmbed, CreateEmbedFooter},
};
use std::{fmt::Write as _, time::Duration};

use crate::audio::{
    player::QueueSnapshot,
    queue::{QueueError, QueuePage},
    session::PlayerError,
    track::{format_duration, QueuedTrack},
};

/// Paleta de colores estandarizada para el bot
pub mod colors {
    use serenity::all::Colour;

    pub const SUCCESS_GREEN: Colour = Colour::from_rgb(67, 181, 129);
    pub const ERROR_RED: Colour = Colour::from_rgb(220, 53, 69);
    pub const WARNING_ORANGE: Colour = Colour::from_rgb(255, 193, 7);
    pub const INFO_BLUE: Colour = Colour::from_rgb(52, 144, 220);
    pub const MUSIC_PURPLE: Colour = Colour::from_rgb(138, 43, 226);
    pub const NEUTRAL_GRAY: Colour = Colour::from_rgb(108, 117, 125);
}

/// Footer estandarizado para todos los embeds
const STANDARD_FOOTER: &str = "📻 Radio Bot";

/// Avisos que el bot publica por su cuenta
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Disconnect,
    QueueEnd,
    Inactivity,
    ClearQueue,
}

fn duration_label(track: &QueuedTrack) -> String {
    if track.is_stream() {
        "🔴 En vivo".to_string()
    } else {
        format_duration(track.duration())
    }
}

fn linked_title(track: &QueuedTrack) -> String {
    match track.uri() {
        Some(uri) => format!("[{}]({})", track.title(), uri),
        None => track.title().to_string(),
    }
}

fn modes_line(snapshot: &QueueSnapshot) -> String {
    let mut modes = Vec::new();
    if snapshot.loop_one {
        modes.push("🔂 Repetir canción");
    }
    if snapshot.loop_queue {
        modes.push("🔁 Repetir cola");
    }
    if snapshot.shuffle {
        modes.push("🔀 Aleatorio");
    }

    if modes.is_empty() {
        "▶️ Normal".to_string()
    } else {
        modes.join(" • ")
    }
}

/// Crea un embed para mostrar la canción actual
pub fn create_now_playing_embed(track: &QueuedTrack, snapshot: &QueueSnapshot) -> CreateEmbed {
    let mut embed = CreateEmbed::default()
        .title("🎵 Reproduciendo Ahora")
        .description(format!("**{}**", linked_title(track)))
        .color(colors::SUCCESS_GREEN)
        .field("🎤 Artista", track.author(), true)
        .field("⏱️ Duración", duration_label(track), true)
        .field("👤 Solicitado por", format!("<@{}>", track.requested_by), true);

    if let Some(position) = snapshot.position {
        embed = embed.field("📋 Posición", format!("{}/{}", position, snapshot.count), true);
    }

    embed = embed.field("Modo", modes_line(snapshot), true);

    if let Some(thumbnail) = track.thumbnail() {
        embed = embed.thumbnail(thumbnail);
    }

    embed
        .timestamp(Timestamp::now())
        .footer(CreateEmbedFooter::new(STANDARD_FOOTER))
}

/// Crea un embed cuando se agrega una canción
pub fn create_track_added_embed(track: &QueuedTrack, position: usize) -> CreateEmbed {
    let mut embed = CreateEmbed::default()
        .title("➕ Agregado a la Cola")
        .description(format!("**{}**", linked_title(track)))
        .color(colors::MUSIC_PURPLE)
        .field("🎤 Artista", track.author(), true)
        .field("⏱️ Duración", duration_label(track), true)
        .field("📋 Posición", format!("#{}", position), true);

    if let Some(thumbnail) = track.thumbnail() {
        embed = embed.thumbnail(thumbnail);
    }

    // hora en que se encoló, no la del mensaje
    let queued_at = Timestamp::from_unix_timestamp(track.queued_at.timestamp())
        .unwrap_or_else(|_| Timestamp::now());

    embed
        .timestamp(queued_at)
        .footer(CreateEmbedFooter::new(STANDARD_FOOTER))
}

/// Crea un embed cuando se agrega una playlist
pub fn create_playlist_added_embed(name: &str, added: usize) -> CreateEmbed {
    CreateEmbed::default()
        .title("📃 Playlist Agregada")
        .description(format!("**{}**\n{} canciones agregadas a la cola", name, added))
        .color(colors::MUSIC_PURPLE)
        .timestamp(Timestamp::now())
        .footer(CreateEmbedFooter::new(STANDARD_FOOTER))
}

/// Una línea por canción; la actual va en negrita
pub fn format_queue_page(page: &QueuePage) -> String {
    let mut listing = String::new();

    for entry in &page.entries {
        let track = &entry.track;
        let line = format!(
            "`{}.` {} - {} (`{}`) - <@{}>",
            entry.position,
            linked_title(track),
            track.author(),
            duration_label(track),
            track.requested_by
        );

        if entry.is_current {
            let _ = writeln!(listing, "**{}**", line);
        } else {
            let _ = writeln!(listing, "{}", line);
        }
    }

    listing
}

/// Crea un embed para mostrar la cola de reproducción
pub fn create_queue_embed(page: &QueuePage, snapshot: &QueueSnapshot) -> CreateEmbed {
    let embed = CreateEmbed::default()
        .title("📋 Cola de Reproducción")
        .color(colors::INFO_BLUE);

    if page.entries.is_empty() {
        return embed
            .description("😴 **La cola está vacía**\n\n💡 Usa `/play <canción>` para agregar música")
            .color(colors::NEUTRAL_GRAY)
            .footer(CreateEmbedFooter::new(STANDARD_FOOTER))
            .timestamp(Timestamp::now());
    }

    let mut total = format_duration(snapshot.total_duration);
    if snapshot.total_duration == Duration::ZERO {
        total = "🔴 En vivo".to_string();
    }

    embed
        .description(format_queue_page(page))
        .field("Total de canciones", snapshot.count.to_string(), true)
        .field("Duración total", total, true)
        .field("Modo", modes_line(snapshot), true)
        .footer(CreateEmbedFooter::new(format!(
            "Página {}/{} • Radio Bot",
            page.current_page, page.page_count
        )))
        .timestamp(Timestamp::now())
}

/// Crea embed con resultados de búsqueda
pub fn create_search_results_embed(query: &str, results: &[TrackData]) -> CreateEmbed {
    let mut listing = String::new();
    for (i, track) in results.iter().enumerate() {
        let duration = if track.info.is_stream {
            "En vivo".to_string()
        } else {
            format_duration(Duration::from_millis(track.info.length))
        };
        let _ = writeln!(
            listing,
            "**{}**. {} - {} `[{}]`",
            i + 1,
            track.info.title,
            track.info.author,
            duration
        );
    }

    CreateEmbed::default()
        .title("🔍 Resultados de Búsqueda")
        .description(format!(
            "Búsqueda: **{}**\nSelecciona una canción del menú inferior:\n\n{}",
            query, listing
        ))
        .color(colors::INFO_BLUE)
        .footer(CreateEmbedFooter::new(STANDARD_FOOTER))
}

/// Crea un embed de error
pub fn create_error_embed(title: &str, description: &str) -> CreateEmbed {
    CreateEmbed::default()
        .title(format!("❌ {}", title))
        .description(description)
        .color(colors::ERROR_RED)
        .timestamp(Timestamp::now())
        .footer(CreateEmbedFooter::new(STANDARD_FOOTER))
}

/// Traduce un error del reproductor a un mensaje para el usuario
pub fn create_player_error_embed(error: &PlayerError) -> CreateEmbed {
    let (title, description) = match error {
        PlayerError::NoMatches(query) => (
            "Sin Resultados",
            format!("No se encontraron canciones para: **{}**", query),
        ),
        PlayerError::LoadFailed(message) => {
            ("Error de Carga", format!("No se pudo cargar el track: {}", message))
        }
        PlayerError::InvalidResult(_) => (
            "Respuesta Inválida",
            "El servidor de audio devolvió una respuesta inesperada".to_string(),
        ),
        PlayerError::NoSession => (
            "Sin Conexión",
            "No estoy conectado a un canal de voz. Usa `/play` primero".to_string(),
        ),
        PlayerError::QueueEmpty => ("Cola Vacía", "No hay nada reproduciéndose".to_string()),
        PlayerError::IndexOutOfRange => (
            "Índice Inválido",
            "Ese número no corresponde a ninguna canción de la cola".to_string(),
        ),
        PlayerError::Backend(message) => ("Error de Audio", message.clone()),
        PlayerError::Queue(QueueError::Full(max)) => (
            "Cola Llena",
            format!("La cola admite como máximo {} canciones", max),
        ),
        PlayerError::Queue(e) => ("Cola", e.to_string()),
    };

    create_error_embed(title, &description)
}

/// Crea un embed de éxito
pub fn create_success_embed(title: &str, description: &str) -> CreateEmbed {
    CreateEmbed::default()
        .title(format!("✅ {}", title))
        .description(description)
        .color(colors::SUCCESS_GREEN)
        .timestamp(Timestamp::now())
        .footer(CreateEmbedFooter::new(STANDARD_FOOTER))
}

/// Crea un embed de información
pub fn create_info_embed(title: &str, description: &str) -> CreateEmbed {
    CreateEmbed::default()
        .title(format!("ℹ️ {}", title))
        .description(description)
        .color(colors::INFO_BLUE)
        .timestamp(Timestamp::now())
        .footer(CreateEmbedFooter::new(STANDARD_FOOTER))
}

pub fn create_status_embed(status: Status) -> CreateEmbed {
    let (title, description, color) = match status {
        Status::Disconnect => ("👋 ¡Chao!", "Me desconecté del canal de voz", colors::NEUTRAL_GRAY),
        Status::QueueEnd => ("🏁 Fin de la Cola", "No quedan canciones por reproducir", colors::INFO_BLUE),
        Status::Inactivity => (
            "💤 Inactividad",
            "Me quedé solo en el canal, así que me voy",
            colors::WARNING_ORANGE,
        ),
        Status::ClearQueue => ("🗑️ Cola Limpiada", "Se eliminaron todas las canciones", colors::SUCCESS_GREEN),
    };

    CreateEmbed::default()
        .title(title)
        .description(description)
        .color(color)
        .timestamp(Timestamp::now())
        .footer(CreateEmbedFooter::new(STANDARD_FOOTER))
}
