use async_trait::async_trait;
use lavalink_rs::model::track::TrackData;
use thiserror::Error;
use url::Url;

use super::queue::QueueError;

/// Resultado de pedirle tracks al backend de audio.
#[derive(Debug, Clone)]
pub enum LoadResult {
    Track(TrackData),
    Playlist { name: String, tracks: Vec<TrackData> },
    Search(Vec<TrackData>),
    Empty,
    Error(String),
}

/// Motivo por el que el backend terminó un track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackEndReason {
    Finished,
    LoadFailed,
    Stopped,
    Replaced,
    Cleanup,
}

#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("no se encontraron resultados para `{0}`")]
    NoMatches(String),
    #[error("el backend no pudo cargar el track: {0}")]
    LoadFailed(String),
    #[error("respuesta de carga inesperada para `{0}`")]
    InvalidResult(String),
    #[error("no hay sesión de reproducción activa")]
    NoSession,
    #[error("no hay nada en la cola")]
    QueueEmpty,
    #[error("índice fuera de rango")]
    IndexOutOfRange,
    #[error("error del backend de audio: {0}")]
    Backend(String),
    #[error(transparent)]
    Queue(#[from] QueueError),
}

/// Conexión de voz de un servidor con el backend de audio.
///
/// `play` reemplaza lo que esté sonando. El fin de cada track llega aparte,
/// como evento, y se entrega a [`GuildPlayer::handle_track_end`].
///
/// [`GuildPlayer::handle_track_end`]: super::player::GuildPlayer::handle_track_end
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlaybackSession: Send + Sync {
    async fn load_tracks(&self, query: &str) -> Result<LoadResult, PlayerError>;
    async fn play(&self, track: &TrackData) -> Result<(), PlayerError>;
    async fn pause(&self) -> Result<(), PlayerError>;
    async fn resume(&self) -> Result<(), PlayerError>;
    async fn stop(&self) -> Result<(), PlayerError>;
    async fn disconnect(&self) -> Result<(), PlayerError>;
}

/// Convierte lo que escribió el usuario en un identificador para Lavalink.
///
/// Las URLs pasan tal cual; cualquier otra cosa se busca en YouTube.
pub fn build_query(input: &str) -> String {
    let input = input.trim();
    match Url::parse(input) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => input.to_string(),
        _ => format!("ytsearch:{}", input),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_build_query() {
        assert_eq!(
            build_query("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ"
        );
        assert_eq!(
            build_query(" https://open.spotify.com/track/abc "),
            "https://open.spotify.com/track/abc"
        );
        assert_eq!(build_query("never gonna give you up"), "ytsearch:never gonna give you up");
        assert_eq!(build_query("artist: song"), "ytsearch:artist: song");
    }
}
