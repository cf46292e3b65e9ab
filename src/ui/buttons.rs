use lavalink_rs::model::track::TrackData;
use serenity::{
    all::ButtonStyle,
    builder::{
        CreateActionRow, CreateButton, CreateSelectMenu, CreateSelectMenuKind,
        CreateSelectMenuOption,
    },
};
use std::time::Duration;

use crate::audio::{player::QueueSnapshot, queue::QueuePage, track::format_duration};

/// IDs personalizados para los componentes
pub mod button_ids {
    pub const PLAYER_PREVIOUS: &str = "player_previous";
    pub const PLAYER_PAUSE: &str = "player_pause";
    pub const PLAYER_RESUME: &str = "player_resume";
    pub const PLAYER_SKIP: &str = "player_skip";
    pub const PLAYER_STOP: &str = "player_stop";
    pub const PLAYER_LOOP: &str = "player_loop";

    pub const QUEUE_PREVIOUS_PAGE: &str = "queue_previous_page";
    pub const QUEUE_NEXT_PAGE: &str = "queue_next_page";
    pub const QUEUE_LOOP: &str = "queue_loop";
    pub const QUEUE_SHUFFLE: &str = "queue_shuffle";
    pub const QUEUE_CLEAR: &str = "queue_clear";

    pub const SEARCH_SELECT: &str = "search_select";
}

fn toggle_style(active: bool) -> ButtonStyle {
    if active {
        ButtonStyle::Success
    } else {
        ButtonStyle::Secondary
    }
}

/// Controles del mensaje "Reproduciendo Ahora"
pub fn create_player_controls(paused: bool, loop_one: bool) -> CreateActionRow {
    let pause_btn = if paused {
        CreateButton::new(button_ids::PLAYER_RESUME)
            .emoji('▶')
            .style(ButtonStyle::Success)
    } else {
        CreateButton::new(button_ids::PLAYER_PAUSE)
            .emoji('⏸')
            .style(ButtonStyle::Primary)
    };

    CreateActionRow::Buttons(vec![
        CreateButton::new(button_ids::PLAYER_PREVIOUS)
            .emoji('⏮')
            .style(ButtonStyle::Secondary),
        pause_btn,
        CreateButton::new(button_ids::PLAYER_SKIP)
            .emoji('⏭')
            .style(ButtonStyle::Secondary),
        CreateButton::new(button_ids::PLAYER_STOP)
            .emoji('⏹')
            .style(ButtonStyle::Danger),
        CreateButton::new(button_ids::PLAYER_LOOP)
            .emoji('🔂')
            .style(toggle_style(loop_one)),
    ])
}

/// Controles de paginación y modos de la cola
pub fn create_queue_controls(page: &QueuePage, snapshot: &QueueSnapshot) -> CreateActionRow {
    CreateActionRow::Buttons(vec![
        CreateButton::new(button_ids::QUEUE_PREVIOUS_PAGE)
            .emoji('◀')
            .style(ButtonStyle::Primary)
            .disabled(page.current_page <= 1),
        CreateButton::new(button_ids::QUEUE_NEXT_PAGE)
            .emoji('▶')
            .style(ButtonStyle::Primary)
            .disabled(page.current_page >= page.page_count),
        CreateButton::new(button_ids::QUEUE_LOOP)
            .emoji('🔁')
            .style(toggle_style(snapshot.loop_queue)),
        CreateButton::new(button_ids::QUEUE_SHUFFLE)
            .emoji('🔀')
            .style(toggle_style(snapshot.shuffle)),
        CreateButton::new(button_ids::QUEUE_CLEAR)
            .emoji('🗑')
            .style(ButtonStyle::Danger)
            .disabled(snapshot.count == 0),
    ])
}

/// Corta un texto al límite de Discord sin partir caracteres
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", cut)
}

/// Menú para elegir uno de los resultados de búsqueda.
///
/// El valor de cada opción es la URI del track, que se vuelve a cargar al
/// elegirla.
pub fn create_search_menu(results: &[TrackData]) -> CreateActionRow {
    let options = results
        .iter()
        .filter_map(|track| {
            let uri = track.info.uri.as_ref()?;
            let duration = if track.info.is_stream {
                "En vivo".to_string()
            } else {
                format_duration(Duration::from_millis(track.info.length))
            };

            Some(
                CreateSelectMenuOption::new(truncate(&track.info.title, 100), truncate(uri, 100))
                    .description(truncate(
                        &format!("{} • {}", track.info.author, duration),
                        100,
                    )),
            )
        })
        .collect();

    CreateActionRow::SelectMenu(
        CreateSelectMenu::new(button_ids::SEARCH_SELECT, CreateSelectMenuKind::String { options })
            .placeholder("Selecciona una canción para reproducir...")
            .min_values(1)
            .max_values(1),
    )
}
