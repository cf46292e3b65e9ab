use chrono::{DateTime, Utc};
use lavalink_rs::model::track::TrackData;
use serenity::model::id::UserId;
use std::time::Duration;

/// Canción en cola: el track resuelto por Lavalink más quién lo pidió.
///
/// La cola guarda `Arc<QueuedTrack>`; dos entradas son la misma sólo si
/// apuntan al mismo registro (`Arc::ptr_eq`), aunque sean la misma canción.
#[derive(Debug, Clone)]
pub struct QueuedTrack {
    pub track: TrackData,
    pub requested_by: UserId,
    pub queued_at: DateTime<Utc>,
}

impl QueuedTrack {
    pub fn new(track: TrackData, requested_by: UserId) -> Self {
        Self {
            track,
            requested_by,
            queued_at: Utc::now(),
        }
    }

    pub fn title(&self) -> &str {
        &self.track.info.title
    }

    pub fn author(&self) -> &str {
        &self.track.info.author
    }

    pub fn uri(&self) -> Option<&str> {
        self.track.info.uri.as_deref()
    }

    pub fn is_stream(&self) -> bool {
        self.track.info.is_stream
    }

    /// Duración del track; los streams no tienen duración útil.
    pub fn duration(&self) -> Duration {
        if self.is_stream() {
            Duration::ZERO
        } else {
            Duration::from_millis(self.track.info.length)
        }
    }

    /// Miniatura del track (artwork de Lavalink o la de YouTube)
    pub fn thumbnail(&self) -> Option<String> {
        if let Some(artwork) = &self.track.info.artwork_url {
            return Some(artwork.clone());
        }

        (self.track.info.source_name == "youtube").then(|| {
            format!(
                "https://img.youtube.com/vi/{}/hqdefault.jpg",
                self.track.info.identifier
            )
        })
    }
}

/// Formatea una duración como `m:ss` o `h:mm:ss`.
pub fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.as_secs();
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

/// Construye tracks de Lavalink para las pruebas.
#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use serde_json::json;

    pub fn track_data(title: &str, secs: u64) -> TrackData {
        let identifier = title.to_lowercase().replace(' ', "-");
        serde_json::from_value(json!({
            "encoded": format!("QAAA{}", identifier),
            "info": {
                "identifier": identifier,
                "isSeekable": true,
                "author": "Test Artist",
                "length": secs * 1000,
                "isStream": false,
                "position": 0,
                "title": title,
                "uri": format!("https://www.youtube.com/watch?v={}", identifier),
                "artworkUrl": null,
                "isrc": null,
                "sourceName": "youtube"
            },
            "pluginInfo": {},
            "userData": {}
        }))
        .expect("fixture track data")
    }

    pub fn queued(title: &str, secs: u64) -> QueuedTrack {
        QueuedTrack::new(track_data(title, secs), UserId::new(42))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(0)), "0:00");
        assert_eq!(format_duration(Duration::from_secs(65)), "1:05");
        assert_eq!(format_duration(Duration::from_secs(600)), "10:00");
        assert_eq!(format_duration(Duration::from_secs(3725)), "1:02:05");
    }

    #[test]
    fn test_accessors_read_track_info() {
        let track = fixtures::queued("Blue Monday", 448);
        assert_eq!(track.title(), "Blue Monday");
        assert_eq!(track.author(), "Test Artist");
        assert_eq!(track.duration(), Duration::from_secs(448));
        assert_eq!(track.uri(), Some("https://www.youtube.com/watch?v=blue-monday"));
        assert_eq!(
            track.thumbnail().as_deref(),
            Some("https://img.youtube.com/vi/blue-monday/hqdefault.jpg")
        );
    }

    #[test]
    fn test_streams_have_no_duration() {
        let mut track = fixtures::queued("Radio", 0);
        track.track.info.is_stream = true;
        track.track.info.length = u64::MAX;
        assert_eq!(track.duration(), Duration::ZERO);
    }
}
