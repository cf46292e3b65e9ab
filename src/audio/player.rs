use dashmap::DashMap;
use lavalink_rs::model::track::TrackData;
use serenity::model::id::{ChannelId, GuildId, UserId};
use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::{
    queue::{QueueManager, QueuePage},
    session::{build_query, LoadResult, PlaybackSession, PlayerError, TrackEndReason},
    track::QueuedTrack,
};

/// Máximo de resultados que se ofrecen en una búsqueda
pub const SEARCH_LIMIT: usize = 10;

/// Tracks listos para encolar.
#[derive(Debug)]
pub struct Resolved {
    pub tracks: Vec<QueuedTrack>,
    /// Nombre de la playlist si la consulta era una
    pub playlist: Option<String>,
}

#[derive(Debug)]
pub struct EnqueueOutcome {
    pub added: usize,
    /// Primer track agregado y su posición 1-based
    pub first: Option<(usize, Arc<QueuedTrack>)>,
    /// Track que empezó a sonar por este encolado
    pub started: Option<Arc<QueuedTrack>>,
}

/// Lo que hay que anunciar tras el fin de un track.
#[derive(Debug)]
pub enum TrackEndOutcome {
    Nothing,
    Advanced(Arc<QueuedTrack>),
    QueueEnded,
    LoadFailed {
        failed: String,
        next: Option<Arc<QueuedTrack>>,
    },
}

/// Estado de la cola para los embeds.
#[derive(Debug, Clone)]
pub struct QueueSnapshot {
    pub current: Option<Arc<QueuedTrack>>,
    pub position: Option<usize>,
    pub count: usize,
    pub total_duration: Duration,
    pub loop_one: bool,
    pub loop_queue: bool,
    pub shuffle: bool,
    pub is_playing: bool,
    pub paused: bool,
}

/// Reproductor de un servidor: su cola más su sesión de audio.
///
/// Cada operación toma el lock de la cola una sola vez y lo mantiene mientras
/// espera al backend, así los comandos y los eventos de fin de track nunca se
/// intercalan a mitad de un paso.
pub struct GuildPlayer {
    guild_id: GuildId,
    queue: Mutex<QueueManager>,
    session: Arc<dyn PlaybackSession>,
    text_channel: ChannelId,
    voice_channel: ChannelId,
    paused: AtomicBool,
}

impl GuildPlayer {
    pub fn new(
        guild_id: GuildId,
        session: Arc<dyn PlaybackSession>,
        text_channel: ChannelId,
        voice_channel: ChannelId,
        max_queue_size: usize,
    ) -> Self {
        Self {
            guild_id,
            queue: Mutex::new(QueueManager::new(max_queue_size)),
            session,
            text_channel,
            voice_channel,
            paused: AtomicBool::new(false),
        }
    }

    pub fn guild_id(&self) -> GuildId {
        self.guild_id
    }

    pub fn text_channel(&self) -> ChannelId {
        self.text_channel
    }

    pub fn voice_channel(&self) -> ChannelId {
        self.voice_channel
    }

    fn snapshot_of(&self, queue: &QueueManager) -> QueueSnapshot {
        QueueSnapshot {
            current: queue.current_track(),
            position: queue.current_index().map(|i| i + 1),
            count: queue.count(),
            total_duration: queue.total_duration(),
            loop_one: queue.loop_one(),
            loop_queue: queue.loop_queue(),
            shuffle: queue.shuffle(),
            is_playing: queue.is_playing(),
            paused: self.paused.load(Ordering::Relaxed),
        }
    }

    /// Marca la cola como sonando y manda el track al backend
    async fn start(
        &self,
        queue: &mut QueueManager,
        track: &Arc<QueuedTrack>,
    ) -> Result<(), PlayerError> {
        queue.set_playing(true);
        if let Err(e) = self.session.play(&track.track).await {
            queue.set_playing(false);
            return Err(e);
        }

        info!("Guild {} | 🎵 Reproduciendo: {}", self.guild_id, track.title());
        Ok(())
    }

    /// Resuelve lo que pidió el usuario: URL, búsqueda o playlist
    pub async fn resolve(&self, input: &str, requester: UserId) -> Result<Resolved, PlayerError> {
        let (tracks, playlist) = match self.session.load_tracks(&build_query(input)).await? {
            LoadResult::Track(track) => (vec![track], None),
            LoadResult::Search(results) => match results.into_iter().next() {
                Some(first) => (vec![first], None),
                None => return Err(PlayerError::NoMatches(input.to_string())),
            },
            LoadResult::Playlist { tracks, .. } if tracks.is_empty() => {
                return Err(PlayerError::NoMatches(input.to_string()))
            }
            LoadResult::Playlist { name, tracks } => (tracks, Some(name)),
            LoadResult::Empty => return Err(PlayerError::NoMatches(input.to_string())),
            LoadResult::Error(message) => return Err(PlayerError::LoadFailed(message)),
        };

        debug!("Guild {} | {} tracks resueltos para '{}'", self.guild_id, tracks.len(), input);

        Ok(Resolved {
            tracks: tracks
                .into_iter()
                .map(|track| QueuedTrack::new(track, requester))
                .collect(),
            playlist,
        })
    }

    /// Resultados de búsqueda para que el usuario elija uno
    pub async fn search(&self, input: &str) -> Result<Vec<TrackData>, PlayerError> {
        let mut results = match self.session.load_tracks(&build_query(input)).await? {
            LoadResult::Track(track) => vec![track],
            LoadResult::Search(results) => results,
            LoadResult::Playlist { tracks, .. } => tracks,
            LoadResult::Empty => Vec::new(),
            LoadResult::Error(message) => return Err(PlayerError::LoadFailed(message)),
        };

        if results.is_empty() {
            return Err(PlayerError::NoMatches(input.to_string()));
        }
        results.truncate(SEARCH_LIMIT);
        Ok(results)
    }

    /// Encola los tracks y arranca la reproducción si no había nada sonando
    pub async fn enqueue(&self, tracks: Vec<QueuedTrack>) -> Result<EnqueueOutcome, PlayerError> {
        let mut queue = self.queue.lock().await;

        let before = queue.tracks().len();
        let added = queue.add_all(tracks)?;
        let first = queue.get_track(before + 1).map(|track| (before + 1, track));

        let mut started = None;
        if !queue.is_playing() {
            if let Some(track) = queue.next(false) {
                self.start(&mut queue, &track).await?;
                started = Some(track);
            }
        }

        Ok(EnqueueOutcome {
            added,
            first,
            started,
        })
    }

    /// Pasa al siguiente track; `None` si la cola se terminó
    pub async fn skip(&self) -> Result<Option<Arc<QueuedTrack>>, PlayerError> {
        let mut queue = self.queue.lock().await;
        if queue.current_track().is_none() {
            return Err(PlayerError::QueueEmpty);
        }

        match queue.next(true) {
            Some(track) => {
                self.start(&mut queue, &track).await?;
                Ok(Some(track))
            }
            None => {
                self.session.stop().await?;
                Ok(None)
            }
        }
    }

    pub async fn previous(&self) -> Result<Arc<QueuedTrack>, PlayerError> {
        let mut queue = self.queue.lock().await;
        if queue.current_track().is_none() {
            return Err(PlayerError::QueueEmpty);
        }

        let track = queue.previous().ok_or(PlayerError::QueueEmpty)?;
        self.start(&mut queue, &track).await?;
        Ok(track)
    }

    pub async fn skip_to(&self, index: usize) -> Result<Arc<QueuedTrack>, PlayerError> {
        let mut queue = self.queue.lock().await;
        if queue.current_track().is_none() {
            return Err(PlayerError::QueueEmpty);
        }

        let track = queue.skip_to(index).ok_or(PlayerError::IndexOutOfRange)?;
        self.start(&mut queue, &track).await?;
        Ok(track)
    }

    /// Quita un track; si era el actual suena el que quedó en su lugar
    pub async fn remove(&self, index: usize) -> Result<Arc<QueuedTrack>, PlayerError> {
        let mut queue = self.queue.lock().await;
        if queue.get_track(index).is_none() {
            return Err(PlayerError::IndexOutOfRange);
        }

        let was_current = queue.current_index() == Some(index - 1);
        let removed = queue.remove(index).ok_or(PlayerError::IndexOutOfRange)?;

        if was_current {
            match queue.current_track() {
                Some(track) => self.start(&mut queue, &track).await?,
                None => self.session.stop().await?,
            }
        }

        Ok(removed)
    }

    pub async fn move_track(&self, from: usize, to: usize) -> Result<Arc<QueuedTrack>, PlayerError> {
        let mut queue = self.queue.lock().await;
        let track = queue.get_track(from).ok_or(PlayerError::IndexOutOfRange)?;

        if !queue.move_track(from, to) {
            return Err(PlayerError::IndexOutOfRange);
        }
        Ok(track)
    }

    /// Vacía la cola y corta lo que esté sonando, sin salir del canal
    pub async fn clear(&self) -> Result<(), PlayerError> {
        let mut queue = self.queue.lock().await;
        queue.clear();
        self.session.stop().await
    }

    /// Vacía la cola y se desconecta del canal de voz
    pub async fn stop(&self) -> Result<(), PlayerError> {
        let mut queue = self.queue.lock().await;
        queue.clear();
        info!("Guild {} | 👋 Desconectando", self.guild_id);
        self.session.disconnect().await
    }

    pub async fn pause(&self) -> Result<(), PlayerError> {
        let queue = self.queue.lock().await;
        if queue.current_track().is_none() {
            return Err(PlayerError::QueueEmpty);
        }
        self.session.pause().await?;
        self.paused.store(true, Ordering::Relaxed);
        Ok(())
    }

    pub async fn resume(&self) -> Result<(), PlayerError> {
        let queue = self.queue.lock().await;
        if queue.current_track().is_none() {
            return Err(PlayerError::QueueEmpty);
        }
        self.session.resume().await?;
        self.paused.store(false, Ordering::Relaxed);
        Ok(())
    }

    pub async fn toggle_loop_one(&self) -> bool {
        self.queue.lock().await.toggle_loop_one()
    }

    pub async fn toggle_loop_queue(&self) -> bool {
        self.queue.lock().await.toggle_loop_queue()
    }

    pub async fn toggle_shuffle(&self) -> bool {
        self.queue.lock().await.toggle_shuffle()
    }

    pub async fn now_playing(&self) -> Option<Arc<QueuedTrack>> {
        self.queue.lock().await.current_track()
    }

    pub async fn snapshot(&self) -> QueueSnapshot {
        let queue = self.queue.lock().await;
        self.snapshot_of(&queue)
    }

    /// Página de la cola (0 = la del track actual)
    pub async fn queue_page(&self, page: usize) -> Result<(QueuePage, QueueSnapshot), PlayerError> {
        let mut queue = self.queue.lock().await;
        let page = queue.paginate(page)?;
        Ok((page, self.snapshot_of(&queue)))
    }

    /// Cambia de página relativo a la que se mostró por última vez
    pub async fn jump_queue_page(
        &self,
        delta: isize,
    ) -> Result<(QueuePage, QueueSnapshot), PlayerError> {
        let mut queue = self.queue.lock().await;
        let page = queue.jump_page(delta)?;
        Ok((page, self.snapshot_of(&queue)))
    }

    /// Reacciona al fin de un track según el motivo que reporta el backend
    pub async fn handle_track_end(
        &self,
        reason: TrackEndReason,
    ) -> Result<TrackEndOutcome, PlayerError> {
        let mut queue = self.queue.lock().await;
        debug!("Guild {} | Track terminado: {:?}", self.guild_id, reason);

        match reason {
            TrackEndReason::Stopped | TrackEndReason::Cleanup => {
                queue.set_playing(false);
                Ok(TrackEndOutcome::Nothing)
            }
            TrackEndReason::Replaced => {
                queue.set_playing(true);
                Ok(TrackEndOutcome::Nothing)
            }
            TrackEndReason::LoadFailed => {
                let failed = queue
                    .current_track()
                    .map(|track| track.title().to_string())
                    .unwrap_or_default();
                warn!("Guild {} | ❌ No se pudo cargar: {}", self.guild_id, failed);

                queue.set_playing(true);
                let next = queue.next(false);
                if let Some(track) = &next {
                    self.start(&mut queue, track).await?;
                }
                Ok(TrackEndOutcome::LoadFailed { failed, next })
            }
            TrackEndReason::Finished => {
                queue.set_playing(false);
                match queue.next(false) {
                    Some(track) => {
                        self.start(&mut queue, &track).await?;
                        Ok(TrackEndOutcome::Advanced(track))
                    }
                    None => {
                        info!("Guild {} | 🏁 Cola terminada", self.guild_id);
                        Ok(TrackEndOutcome::QueueEnded)
                    }
                }
            }
        }
    }
}

/// Registro de reproductores por servidor.
pub struct AudioPlayer {
    players: DashMap<GuildId, Arc<GuildPlayer>>,
    max_queue_size: usize,
}

impl AudioPlayer {
    pub fn new(max_queue_size: usize) -> Self {
        Self {
            players: DashMap::new(),
            max_queue_size,
        }
    }

    /// Reproductor del servidor, creándolo en la primera conexión de voz
    pub fn connect(
        &self,
        guild_id: GuildId,
        session: Arc<dyn PlaybackSession>,
        text_channel: ChannelId,
        voice_channel: ChannelId,
    ) -> Arc<GuildPlayer> {
        self.players
            .entry(guild_id)
            .or_insert_with(|| {
                info!("Guild {} | 🔊 Nuevo reproductor en canal {}", guild_id, voice_channel);
                Arc::new(GuildPlayer::new(
                    guild_id,
                    session,
                    text_channel,
                    voice_channel,
                    self.max_queue_size,
                ))
            })
            .value()
            .clone()
    }

    pub fn get(&self, guild_id: GuildId) -> Option<Arc<GuildPlayer>> {
        self.players.get(&guild_id).map(|player| player.value().clone())
    }

    pub fn remove(&self, guild_id: GuildId) -> Option<Arc<GuildPlayer>> {
        let removed = self.players.remove(&guild_id).map(|(_, player)| player);
        if removed.is_some() {
            debug!("Guild {} | Reproductor eliminado", guild_id);
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{
        session::MockPlaybackSession,
        track::fixtures::{queued, track_data},
    };
    use mockall::predicate::eq;
    use pretty_assertions::assert_eq;

    fn player_with(session: MockPlaybackSession) -> GuildPlayer {
        GuildPlayer::new(
            GuildId::new(1),
            Arc::new(session),
            ChannelId::new(2),
            ChannelId::new(3),
            100,
        )
    }

    fn expect_play(session: &mut MockPlaybackSession, title: &'static str) {
        session
            .expect_play()
            .withf(move |track| track.info.title == title)
            .times(1)
            .returning(|_| Ok(()));
    }

    /// Cola con T1..Tn sonando desde T1, sin pasar por el backend
    async fn seed(player: &GuildPlayer, titles: &[&str]) {
        let mut queue = player.queue.lock().await;
        for title in titles {
            queue.add(queued(title, 60)).unwrap();
        }
        queue.next(false);
        queue.set_playing(true);
    }

    #[tokio::test]
    async fn test_enqueue_starts_playback_once() {
        let mut session = MockPlaybackSession::new();
        expect_play(&mut session, "T1");
        let player = player_with(session);

        let outcome = player.enqueue(vec![queued("T1", 60)]).await.unwrap();
        assert_eq!(outcome.started.unwrap().title(), "T1");

        // ya está sonando: sólo se encola
        let outcome = player
            .enqueue(vec![queued("T2", 60), queued("T3", 60)])
            .await
            .unwrap();
        assert_eq!(outcome.added, 2);
        assert!(outcome.started.is_none());
        assert_eq!(outcome.first.map(|(position, _)| position), Some(2));
    }

    #[tokio::test]
    async fn test_enqueue_play_failure_leaves_player_idle() {
        let mut session = MockPlaybackSession::new();
        session
            .expect_play()
            .returning(|_| Err(PlayerError::Backend("node down".into())));
        let player = player_with(session);

        let result = player.enqueue(vec![queued("T1", 60)]).await;

        assert!(matches!(result, Err(PlayerError::Backend(_))));
        assert!(!player.snapshot().await.is_playing);
    }

    #[tokio::test]
    async fn test_track_finished_advances() {
        let mut session = MockPlaybackSession::new();
        expect_play(&mut session, "T2");
        let player = player_with(session);
        seed(&player, &["T1", "T2"]).await;

        let outcome = player.handle_track_end(TrackEndReason::Finished).await.unwrap();

        assert!(matches!(outcome, TrackEndOutcome::Advanced(ref t) if t.title() == "T2"));
        assert!(player.snapshot().await.is_playing);
    }

    #[tokio::test]
    async fn test_track_finished_at_end_reports_queue_end() {
        let player = player_with(MockPlaybackSession::new());
        seed(&player, &["T1"]).await;

        let outcome = player.handle_track_end(TrackEndReason::Finished).await.unwrap();

        assert!(matches!(outcome, TrackEndOutcome::QueueEnded));
        let snapshot = player.snapshot().await;
        assert_eq!(snapshot.count, 0);
        assert!(!snapshot.is_playing);
    }

    #[tokio::test]
    async fn test_track_finished_with_loop_one_replays() {
        let mut session = MockPlaybackSession::new();
        session
            .expect_play()
            .withf(|track| track.info.title == "T1")
            .times(2)
            .returning(|_| Ok(()));
        let player = player_with(session);
        seed(&player, &["T1", "T2"]).await;
        player.toggle_loop_one().await;

        for _ in 0..2 {
            let outcome = player.handle_track_end(TrackEndReason::Finished).await.unwrap();
            assert!(matches!(outcome, TrackEndOutcome::Advanced(ref t) if t.title() == "T1"));
        }
    }

    #[tokio::test]
    async fn test_stopped_and_replaced_do_not_advance() {
        let player = player_with(MockPlaybackSession::new());
        seed(&player, &["T1", "T2"]).await;

        player.handle_track_end(TrackEndReason::Stopped).await.unwrap();
        assert!(!player.snapshot().await.is_playing);

        player.handle_track_end(TrackEndReason::Replaced).await.unwrap();
        assert!(player.snapshot().await.is_playing);

        player.handle_track_end(TrackEndReason::Cleanup).await.unwrap();
        let snapshot = player.snapshot().await;
        assert!(!snapshot.is_playing);
        assert_eq!(snapshot.position, Some(1));
    }

    #[tokio::test]
    async fn test_load_failed_advances_to_next() {
        let mut session = MockPlaybackSession::new();
        expect_play(&mut session, "T2");
        let player = player_with(session);
        seed(&player, &["T1", "T2"]).await;

        let outcome = player.handle_track_end(TrackEndReason::LoadFailed).await.unwrap();

        match outcome {
            TrackEndOutcome::LoadFailed { failed, next } => {
                assert_eq!(failed, "T1");
                assert_eq!(next.unwrap().title(), "T2");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_load_failed_with_loop_one_replays_same_track() {
        let mut session = MockPlaybackSession::new();
        expect_play(&mut session, "T1");
        let player = player_with(session);
        seed(&player, &["T1", "T2"]).await;
        player.toggle_loop_one().await;

        let outcome = player.handle_track_end(TrackEndReason::LoadFailed).await.unwrap();

        match outcome {
            TrackEndOutcome::LoadFailed { failed, next } => {
                assert_eq!(failed, "T1");
                assert_eq!(next.unwrap().title(), "T1");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        let snapshot = player.snapshot().await;
        assert_eq!(snapshot.position, Some(1));
        assert!(snapshot.is_playing);
    }

    #[tokio::test]
    async fn test_load_failed_on_last_track_empties_queue() {
        // sin expect_play: llamar a play haría fallar el mock
        let player = player_with(MockPlaybackSession::new());
        seed(&player, &["T1"]).await;

        let outcome = player.handle_track_end(TrackEndReason::LoadFailed).await.unwrap();

        match outcome {
            TrackEndOutcome::LoadFailed { failed, next } => {
                assert_eq!(failed, "T1");
                assert!(next.is_none());
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        let snapshot = player.snapshot().await;
        assert_eq!(snapshot.count, 0);
        assert!(!snapshot.is_playing);
        assert!(snapshot.current.is_none());
    }

    #[tokio::test]
    async fn test_skip() {
        let mut session = MockPlaybackSession::new();
        expect_play(&mut session, "T2");
        session.expect_stop().times(1).returning(|| Ok(()));
        let player = player_with(session);

        assert!(matches!(player.skip().await, Err(PlayerError::QueueEmpty)));

        seed(&player, &["T1", "T2"]).await;
        assert_eq!(player.skip().await.unwrap().unwrap().title(), "T2");
        assert!(player.skip().await.unwrap().is_none());
        assert_eq!(player.snapshot().await.count, 0);
    }

    #[tokio::test]
    async fn test_previous_and_skip_to() {
        let mut session = MockPlaybackSession::new();
        expect_play(&mut session, "T3");
        expect_play(&mut session, "T2");
        let player = player_with(session);
        seed(&player, &["T1", "T2", "T3"]).await;

        assert!(matches!(player.skip_to(4).await, Err(PlayerError::IndexOutOfRange)));
        assert_eq!(player.skip_to(3).await.unwrap().title(), "T3");
        assert_eq!(player.previous().await.unwrap().title(), "T2");
    }

    #[tokio::test]
    async fn test_remove_current_plays_replacement() {
        let mut session = MockPlaybackSession::new();
        expect_play(&mut session, "T2");
        let player = player_with(session);
        seed(&player, &["T1", "T2"]).await;

        let removed = player.remove(1).await.unwrap();

        assert_eq!(removed.title(), "T1");
        assert_eq!(player.now_playing().await.unwrap().title(), "T2");
        assert!(matches!(player.remove(5).await, Err(PlayerError::IndexOutOfRange)));
    }

    #[tokio::test]
    async fn test_remove_last_current_stops_session() {
        let mut session = MockPlaybackSession::new();
        session.expect_stop().times(1).returning(|| Ok(()));
        let player = player_with(session);
        seed(&player, &["T1"]).await;

        player.remove(1).await.unwrap();

        assert!(player.now_playing().await.is_none());
    }

    #[tokio::test]
    async fn test_remove_other_track_keeps_playing() {
        let player = player_with(MockPlaybackSession::new());
        seed(&player, &["T1", "T2", "T3"]).await;

        assert_eq!(player.remove(3).await.unwrap().title(), "T3");
        assert_eq!(player.now_playing().await.unwrap().title(), "T1");
    }

    #[tokio::test]
    async fn test_move_track_validates_indices() {
        let player = player_with(MockPlaybackSession::new());
        seed(&player, &["T1", "T2", "T3"]).await;

        assert_eq!(player.move_track(3, 1).await.unwrap().title(), "T3");
        assert!(matches!(player.move_track(1, 9).await, Err(PlayerError::IndexOutOfRange)));
        assert_eq!(player.snapshot().await.position, Some(2));
    }

    #[tokio::test]
    async fn test_clear_and_stop() {
        let mut session = MockPlaybackSession::new();
        session.expect_stop().times(1).returning(|| Ok(()));
        session.expect_disconnect().times(1).returning(|| Ok(()));
        let player = player_with(session);

        seed(&player, &["T1"]).await;
        player.toggle_loop_queue().await;
        player.clear().await.unwrap();
        let snapshot = player.snapshot().await;
        assert_eq!(snapshot.count, 0);
        assert!(!snapshot.loop_queue);

        seed(&player, &["T1"]).await;
        player.stop().await.unwrap();
        assert_eq!(player.snapshot().await.count, 0);
    }

    #[tokio::test]
    async fn test_pause_requires_current_track() {
        let mut session = MockPlaybackSession::new();
        session.expect_pause().times(1).returning(|| Ok(()));
        session.expect_resume().times(1).returning(|| Ok(()));
        let player = player_with(session);

        assert!(matches!(player.pause().await, Err(PlayerError::QueueEmpty)));

        seed(&player, &["T1"]).await;
        player.pause().await.unwrap();
        assert!(player.snapshot().await.paused);
        player.resume().await.unwrap();
        assert!(!player.snapshot().await.paused);
    }

    #[tokio::test]
    async fn test_resolve_maps_load_results() {
        let mut session = MockPlaybackSession::new();
        session
            .expect_load_tracks()
            .with(eq("ytsearch:blue monday"))
            .returning(|_| {
                Ok(LoadResult::Search(vec![
                    track_data("Blue Monday", 448),
                    track_data("Blue Monday 88", 250),
                ]))
            });
        session
            .expect_load_tracks()
            .with(eq("https://example.com/list"))
            .returning(|_| {
                Ok(LoadResult::Playlist {
                    name: "Mix".into(),
                    tracks: vec![track_data("A", 1), track_data("B", 2)],
                })
            });
        session
            .expect_load_tracks()
            .with(eq("ytsearch:nothing"))
            .returning(|_| Ok(LoadResult::Empty));
        session
            .expect_load_tracks()
            .with(eq("ytsearch:broken"))
            .returning(|_| Ok(LoadResult::Error("blocked".into())));
        let player = player_with(session);
        let user = UserId::new(7);

        let resolved = player.resolve("blue monday", user).await.unwrap();
        assert_eq!(resolved.tracks.len(), 1);
        assert_eq!(resolved.tracks[0].title(), "Blue Monday");
        assert_eq!(resolved.tracks[0].requested_by, user);

        let resolved = player.resolve("https://example.com/list", user).await.unwrap();
        assert_eq!(resolved.playlist.as_deref(), Some("Mix"));
        assert_eq!(resolved.tracks.len(), 2);

        assert!(matches!(
            player.resolve("nothing", user).await,
            Err(PlayerError::NoMatches(_))
        ));
        assert!(matches!(
            player.resolve("broken", user).await,
            Err(PlayerError::LoadFailed(_))
        ));
    }

    #[tokio::test]
    async fn test_search_truncates_results() {
        let mut session = MockPlaybackSession::new();
        session.expect_load_tracks().returning(|_| {
            Ok(LoadResult::Search(
                (0..15).map(|i| track_data(&format!("Song {}", i), 60)).collect(),
            ))
        });
        let player = player_with(session);

        assert_eq!(player.search("song").await.unwrap().len(), SEARCH_LIMIT);
    }

    #[tokio::test]
    async fn test_queue_page_reports_state() {
        let player = player_with(MockPlaybackSession::new());
        let titles: Vec<String> = (1..=12).map(|i| format!("T{}", i)).collect();
        let titles: Vec<&str> = titles.iter().map(String::as_str).collect();
        seed(&player, &titles).await;

        let (page, snapshot) = player.queue_page(0).await.unwrap();
        assert_eq!((page.current_page, page.page_count), (1, 2));
        assert_eq!(snapshot.count, 12);

        let (page, _) = player.jump_queue_page(1).await.unwrap();
        assert_eq!(page.entries.len(), 2);
        assert!(matches!(player.queue_page(3).await, Err(PlayerError::Queue(_))));
    }

    #[test]
    fn test_registry_reuses_guild_player() {
        let registry = AudioPlayer::new(10);
        let guild = GuildId::new(9);

        let first = registry.connect(
            guild,
            Arc::new(MockPlaybackSession::new()),
            ChannelId::new(1),
            ChannelId::new(2),
        );
        let second = registry.connect(
            guild,
            Arc::new(MockPlaybackSession::new()),
            ChannelId::new(1),
            ChannelId::new(2),
        );

        assert!(Arc::ptr_eq(&first, &second));
        assert!(registry.get(guild).is_some());
        assert!(registry.remove(guild).is_some());
        assert!(registry.get(guild).is_none());
    }
}
