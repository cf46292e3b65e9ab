use rand::{seq::SliceRandom, Rng};
use std::{sync::Arc, time::Duration};
use thiserror::Error;
use tracing::{debug, info};

use super::track::QueuedTrack;

/// Canciones por página en la vista de la cola
pub const PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueueError {
    #[error("la cola está llena (máximo {0} canciones)")]
    Full(usize),
    #[error("la cola está vacía")]
    Empty,
    #[error("la página {page} no existe (hay {page_count})")]
    PageOutOfRange { page: usize, page_count: usize },
}

/// Una línea de la vista paginada.
#[derive(Debug, Clone)]
pub struct QueueEntry {
    /// Posición 1-based en la lista activa
    pub position: usize,
    pub track: Arc<QueuedTrack>,
    pub is_current: bool,
}

#[derive(Debug, Clone)]
pub struct QueuePage {
    pub entries: Vec<QueueEntry>,
    pub current_page: usize,
    pub page_count: usize,
}

/// Cola de reproducción de un servidor.
///
/// `playlist` guarda el orden de llegada y es la fuente de verdad. Mientras
/// shuffle está activo, `shuffled` es una permutación de `playlist` y es la
/// lista "activa": el cursor y los índices 1-based se refieren a ella.
#[derive(Debug)]
pub struct QueueManager {
    playlist: Vec<Arc<QueuedTrack>>,
    shuffled: Vec<Arc<QueuedTrack>>,
    cursor: Option<usize>,
    loop_one: bool,
    loop_queue: bool,
    shuffle: bool,
    is_playing: bool,
    page_current: usize,
    page_count: usize,
    max_size: usize,
}

impl QueueManager {
    pub fn new(max_size: usize) -> Self {
        Self {
            playlist: Vec::new(),
            shuffled: Vec::new(),
            cursor: None,
            loop_one: false,
            loop_queue: false,
            shuffle: false,
            is_playing: false,
            page_current: 0,
            page_count: 0,
            max_size,
        }
    }

    fn active(&self) -> &[Arc<QueuedTrack>] {
        if self.shuffle {
            &self.shuffled
        } else {
            &self.playlist
        }
    }

    fn active_mut(&mut self) -> &mut Vec<Arc<QueuedTrack>> {
        if self.shuffle {
            &mut self.shuffled
        } else {
            &mut self.playlist
        }
    }

    fn in_range(&self, index: usize) -> bool {
        (1..=self.active().len()).contains(&index)
    }

    /// Agrega un track al final de la cola
    pub fn add(&mut self, track: QueuedTrack) -> Result<Arc<QueuedTrack>, QueueError> {
        if self.playlist.len() >= self.max_size {
            return Err(QueueError::Full(self.max_size));
        }

        let track = Arc::new(track);
        if self.shuffle {
            self.shuffled.push(Arc::clone(&track));
        }
        self.playlist.push(Arc::clone(&track));

        info!("➕ Agregado a la cola: {} (#{})", track.title(), self.playlist.len());
        Ok(track)
    }

    /// Agrega varios tracks en orden; devuelve cuántos cupieron
    pub fn add_all(
        &mut self,
        tracks: impl IntoIterator<Item = QueuedTrack>,
    ) -> Result<usize, QueueError> {
        let mut added = 0;
        let mut skipped = 0;

        for track in tracks {
            match self.add(track) {
                Ok(_) => added += 1,
                Err(QueueError::Full(_)) => skipped += 1,
                Err(e) => return Err(e),
            }
        }

        if added == 0 && skipped > 0 {
            return Err(QueueError::Full(self.max_size));
        }
        if skipped > 0 {
            info!("⚠️ Cola llena: {} canciones descartadas", skipped);
        }

        Ok(added)
    }

    /// Quita el track en la posición `index` (1-based) de la lista activa.
    ///
    /// Si era el track actual, el cursor pasa al track que ocupa ahora ese
    /// lugar (o la cola termina si era el último).
    pub fn remove(&mut self, index: usize) -> Option<Arc<QueuedTrack>> {
        if !self.in_range(index) {
            debug!("remove({}) fuera de rango, ignorado", index);
            return None;
        }
        let position = index - 1;

        let removed = if self.shuffle {
            let removed = self.shuffled.remove(position);
            if let Some(seq) = self.playlist.iter().position(|t| Arc::ptr_eq(t, &removed)) {
                self.playlist.remove(seq);
            }
            removed
        } else {
            self.playlist.remove(position)
        };

        info!("➖ Eliminado de la cola: {}", removed.title());

        match self.cursor {
            Some(cursor) if cursor == position => {
                self.cursor = position.checked_sub(1);
                self.next(true);
                debug!("cursor reubicado en {:?} tras quitar el track actual", self.cursor);
            }
            Some(cursor) if cursor > position => {
                self.cursor = Some(cursor - 1);
                debug!("cursor desplazado a {}", cursor - 1);
            }
            _ => {}
        }

        Some(removed)
    }

    /// Mueve un track de `from` a `to` (1-based) dentro de la lista activa
    pub fn move_track(&mut self, from: usize, to: usize) -> bool {
        if !self.in_range(from) || !self.in_range(to) {
            debug!("move({}, {}) fuera de rango, ignorado", from, to);
            return false;
        }
        let (from, to) = (from - 1, to - 1);

        let list = self.active_mut();
        let track = list.remove(from);
        list.insert(to, track);

        if let Some(cursor) = self.cursor {
            let adjusted = if cursor == from {
                to
            } else if from < cursor && cursor <= to {
                cursor - 1
            } else if to <= cursor && cursor < from {
                cursor + 1
            } else {
                cursor
            };
            if adjusted != cursor {
                debug!("cursor {} -> {} tras mover", cursor, adjusted);
            }
            self.cursor = Some(adjusted);
        }

        info!("↕️ Movido de {} a {}", from + 1, to + 1);
        true
    }

    /// Track que debe sonar a continuación.
    ///
    /// Con `skip` se ignora loop-one. Al pasar el final sin loop-queue la
    /// cola se vacía y devuelve `None`.
    pub fn next(&mut self, skip: bool) -> Option<Arc<QueuedTrack>> {
        let len = self.active().len();
        if len == 0 {
            return None;
        }

        if self.loop_one && !skip {
            if let Some(current) = self.current_track() {
                debug!("🔂 Repitiendo: {}", current.title());
                return Some(current);
            }
        }

        let next = self.cursor.map_or(0, |cursor| cursor + 1);
        if next >= len {
            if !self.loop_queue {
                info!("🏁 Fin de la cola");
                self.clear();
                return None;
            }
            debug!("🔁 Fin de la cola, volviendo al inicio");
            self.cursor = Some(0);
        } else {
            self.cursor = Some(next);
        }

        self.current_track()
    }

    /// Retrocede un track; no pasa del primero
    pub fn previous(&mut self) -> Option<Arc<QueuedTrack>> {
        if self.active().is_empty() {
            return None;
        }

        self.cursor = Some(self.cursor.map_or(0, |cursor| cursor.saturating_sub(1)));
        self.current_track()
    }

    /// Salta directamente al track `index` (1-based)
    pub fn skip_to(&mut self, index: usize) -> Option<Arc<QueuedTrack>> {
        if !self.in_range(index) {
            return None;
        }

        self.cursor = Some(index - 1);
        self.current_track()
    }

    pub fn current_track(&self) -> Option<Arc<QueuedTrack>> {
        self.cursor.and_then(|cursor| self.active().get(cursor).cloned())
    }

    /// Track en la posición `index` (1-based) de la lista activa
    pub fn get_track(&self, index: usize) -> Option<Arc<QueuedTrack>> {
        index
            .checked_sub(1)
            .and_then(|position| self.active().get(position).cloned())
    }

    /// Vacía la cola y apaga todos los modos
    pub fn clear(&mut self) {
        self.playlist.clear();
        self.shuffled.clear();
        self.cursor = None;
        self.loop_one = false;
        self.loop_queue = false;
        self.shuffle = false;
        self.is_playing = false;
        self.page_current = 0;
        self.page_count = 0;

        info!("🗑️ Cola limpiada");
    }

    pub fn count(&self) -> usize {
        self.playlist.len()
    }

    pub fn is_empty(&self) -> bool {
        self.playlist.is_empty()
    }

    /// Lista en el orden en que se reproduce
    pub fn tracks(&self) -> &[Arc<QueuedTrack>] {
        self.active()
    }

    pub fn total_duration(&self) -> Duration {
        self.active()
            .iter()
            .fold(Duration::ZERO, |total, track| total.saturating_add(track.duration()))
    }

    /// Página `page` de la cola; 0 es la página del track actual
    pub fn paginate(&mut self, page: usize) -> Result<QueuePage, QueueError> {
        let len = self.active().len();
        self.page_count = len.div_ceil(PAGE_SIZE);

        if len == 0 {
            self.page_current = 0;
            return if page == 0 {
                Ok(QueuePage {
                    entries: Vec::new(),
                    current_page: 0,
                    page_count: 0,
                })
            } else {
                Err(QueueError::Empty)
            };
        }

        let page = if page == 0 {
            self.cursor.map_or(1, |cursor| cursor / PAGE_SIZE + 1)
        } else {
            page
        };

        if page > self.page_count {
            return Err(QueueError::PageOutOfRange {
                page,
                page_count: self.page_count,
            });
        }

        let start = (page - 1) * PAGE_SIZE;
        let end = (start + PAGE_SIZE).min(len);
        let entries = self.active()[start..end]
            .iter()
            .enumerate()
            .map(|(offset, track)| QueueEntry {
                position: start + offset + 1,
                track: Arc::clone(track),
                is_current: self.cursor == Some(start + offset),
            })
            .collect();

        self.page_current = page;
        Ok(QueuePage {
            entries,
            current_page: page,
            page_count: self.page_count,
        })
    }

    /// Avanza o retrocede `delta` páginas desde la actual, sin salirse
    pub fn jump_page(&mut self, delta: isize) -> Result<QueuePage, QueueError> {
        let page_count = self.active().len().div_ceil(PAGE_SIZE);
        if page_count == 0 {
            return self.paginate(0);
        }

        let target = (self.page_current as isize + delta).clamp(1, page_count as isize);
        self.paginate(target as usize)
    }

    pub fn toggle_loop_one(&mut self) -> bool {
        self.loop_one = !self.loop_one;
        info!("🔂 Repetir canción: {}", self.loop_one);
        self.loop_one
    }

    pub fn toggle_loop_queue(&mut self) -> bool {
        self.loop_queue = !self.loop_queue;
        info!("🔁 Repetir cola: {}", self.loop_queue);
        self.loop_queue
    }

    pub fn toggle_shuffle(&mut self) -> bool {
        self.toggle_shuffle_with(&mut rand::thread_rng())
    }

    /// Activa o desactiva shuffle sin cortar el track actual.
    ///
    /// Al activar, el track actual queda primero y el resto se mezcla; al
    /// desactivar, el cursor vuelve a la posición de ese mismo registro.
    pub fn toggle_shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        if self.shuffle {
            self.cursor = self.current_track().and_then(|current| {
                self.playlist.iter().position(|t| Arc::ptr_eq(t, &current))
            });
            self.shuffled.clear();
            self.shuffle = false;
        } else {
            let current = self.current_track();
            let mut shuffled: Vec<_> = self
                .playlist
                .iter()
                .filter(|t| current.as_ref().map_or(true, |c| !Arc::ptr_eq(*t, c)))
                .cloned()
                .collect();
            shuffled.shuffle(rng);

            if let Some(current) = current {
                shuffled.insert(0, current);
                self.cursor = Some(0);
            }
            self.shuffled = shuffled;
            self.shuffle = true;
        }

        info!("🔀 Shuffle: {}", self.shuffle);
        self.shuffle
    }

    pub fn current_index(&self) -> Option<usize> {
        self.cursor
    }

    pub fn loop_one(&self) -> bool {
        self.loop_one
    }

    pub fn loop_queue(&self) -> bool {
        self.loop_queue
    }

    pub fn shuffle(&self) -> bool {
        self.shuffle
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn set_playing(&mut self, playing: bool) {
        self.is_playing = playing;
    }

    pub fn page_current(&self) -> usize {
        self.page_current
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::track::fixtures::queued;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn queue_of(titles: &[&str]) -> QueueManager {
        let mut queue = QueueManager::new(1000);
        for title in titles {
            queue.add(queued(title, 60)).unwrap();
        }
        queue
    }

    fn titles(tracks: &[Arc<QueuedTrack>]) -> Vec<&str> {
        tracks.iter().map(|t| t.title()).collect()
    }

    fn current_title(queue: &QueueManager) -> Option<String> {
        queue.current_track().map(|t| t.title().to_string())
    }

    #[test]
    fn test_add_and_get_track() {
        let mut queue = queue_of(&["T1", "T2"]);
        let added = queue.add(queued("T3", 30)).unwrap();

        assert_eq!(queue.count(), 3);
        assert!(Arc::ptr_eq(&queue.get_track(3).unwrap(), &added));
        assert!(queue.get_track(0).is_none());
        assert!(queue.get_track(4).is_none());
        assert!(queue.current_track().is_none());
    }

    #[test]
    fn test_add_respects_max_size() {
        let mut queue = QueueManager::new(2);
        let added = queue
            .add_all(vec![queued("T1", 1), queued("T2", 1), queued("T3", 1)])
            .unwrap();

        assert_eq!(added, 2);
        assert_eq!(queue.add(queued("T4", 1)).unwrap_err(), QueueError::Full(2));
        assert_eq!(queue.add_all(vec![queued("T5", 1)]).unwrap_err(), QueueError::Full(2));
    }

    #[test]
    fn test_scenario_move_last_to_first() {
        let mut queue = QueueManager::new(100);
        queue
            .add_all(vec![queued("T1", 60), queued("T2", 90), queued("T3", 30)])
            .unwrap();

        assert_eq!(current_title(&queue), None);
        assert_eq!(queue.next(false).unwrap().title(), "T1");
        assert_eq!(queue.current_index(), Some(0));
        assert_eq!(queue.next(false).unwrap().title(), "T2");

        assert!(queue.move_track(3, 1));
        assert_eq!(titles(queue.tracks()), vec!["T3", "T1", "T2"]);
        assert_eq!(current_title(&queue).as_deref(), Some("T2"));
        assert_eq!(queue.total_duration(), Duration::from_secs(180));
    }

    #[test]
    fn test_scenario_loop_queue_wraps() {
        let mut queue = queue_of(&["T1", "T2"]);
        queue.toggle_loop_queue();
        queue.skip_to(2);

        assert_eq!(queue.next(false).unwrap().title(), "T1");
        assert_eq!(queue.current_index(), Some(0));
    }

    #[test]
    fn test_scenario_shuffle_keeps_current_first() {
        let mut queue = queue_of(&["T1", "T2", "T3"]);
        let t2 = queue.skip_to(2).unwrap();

        assert!(queue.toggle_shuffle_with(&mut StdRng::seed_from_u64(7)));
        assert_eq!(queue.current_index(), Some(0));
        assert!(Arc::ptr_eq(&queue.shuffled[0], &t2));
        assert_eq!(titles(&queue.playlist), vec!["T1", "T2", "T3"]);
        assert_eq!(queue.shuffled.len(), 3);
    }

    #[test]
    fn test_shuffle_round_trip_restores_cursor() {
        let names: Vec<String> = (1..=12).map(|i| format!("T{}", i)).collect();
        let names: Vec<&str> = names.iter().map(String::as_str).collect();

        for index in 1..=names.len() {
            let mut queue = queue_of(&names);
            let before = queue.skip_to(index).unwrap();

            queue.toggle_shuffle_with(&mut StdRng::seed_from_u64(index as u64));
            assert!(!queue.toggle_shuffle());

            assert_eq!(queue.current_index(), Some(index - 1));
            assert!(Arc::ptr_eq(&queue.current_track().unwrap(), &before));
            assert!(queue.shuffled.is_empty());
        }
    }

    #[test]
    fn test_shuffle_round_trip_with_duplicate_songs() {
        let mut queue = queue_of(&["Same", "Same", "Same"]);
        let before = queue.skip_to(3).unwrap();

        queue.toggle_shuffle();
        queue.toggle_shuffle();

        assert_eq!(queue.current_index(), Some(2));
        assert!(Arc::ptr_eq(&queue.current_track().unwrap(), &before));
    }

    #[test]
    fn test_loop_one_repeats_same_record() {
        let mut queue = queue_of(&["T1", "T2", "T3"]);
        let first = queue.next(false).unwrap();
        queue.toggle_loop_one();

        for _ in 0..5 {
            assert!(Arc::ptr_eq(&queue.next(false).unwrap(), &first));
        }

        // skip ignora loop-one
        assert_eq!(queue.next(true).unwrap().title(), "T2");
    }

    #[test]
    fn test_exhaustion_clears_state() {
        let mut queue = queue_of(&["T1", "T2", "T3"]);
        queue.toggle_loop_one();
        queue.toggle_loop_one();
        queue.toggle_shuffle();
        queue.set_playing(true);

        for _ in 0..3 {
            assert!(queue.next(false).is_some());
        }
        assert!(queue.next(false).is_none());

        assert_eq!(queue.count(), 0);
        assert_eq!(queue.current_index(), None);
        assert!(!queue.loop_one());
        assert!(!queue.loop_queue());
        assert!(!queue.shuffle());
        assert!(!queue.is_playing());
    }

    #[test]
    fn test_remove_current_advances() {
        let mut queue = queue_of(&["T1", "T2", "T3"]);
        queue.skip_to(2);

        let removed = queue.remove(2).unwrap();

        assert_eq!(removed.title(), "T2");
        assert_eq!(queue.count(), 2);
        assert_eq!(current_title(&queue).as_deref(), Some("T3"));
    }

    #[test]
    fn test_remove_current_last_track_ends_queue() {
        let mut queue = queue_of(&["T1", "T2"]);
        queue.skip_to(2);
        queue.remove(2);

        assert!(queue.is_empty());
        assert_eq!(queue.current_index(), None);
    }

    #[test]
    fn test_remove_current_last_track_with_loop_queue_wraps() {
        let mut queue = queue_of(&["T1", "T2"]);
        queue.toggle_loop_queue();
        queue.skip_to(2);
        queue.remove(2);

        assert_eq!(current_title(&queue).as_deref(), Some("T1"));
    }

    #[test]
    fn test_remove_before_cursor_keeps_current() {
        let mut queue = queue_of(&["T1", "T2", "T3"]);
        queue.skip_to(3);
        queue.remove(1);

        assert_eq!(queue.current_index(), Some(1));
        assert_eq!(current_title(&queue).as_deref(), Some("T3"));
    }

    #[test]
    fn test_remove_out_of_range_is_noop() {
        let mut queue = queue_of(&["T1"]);
        assert!(queue.remove(0).is_none());
        assert!(queue.remove(2).is_none());
        assert_eq!(queue.count(), 1);
    }

    #[test]
    fn test_remove_while_shuffled_removes_same_record() {
        let mut queue = queue_of(&["Same", "Same", "Other"]);
        queue.skip_to(1);
        queue.toggle_shuffle_with(&mut StdRng::seed_from_u64(3));

        let target = Arc::clone(&queue.shuffled[2]);
        let removed = queue.remove(3).unwrap();

        assert!(Arc::ptr_eq(&removed, &target));
        assert_eq!(queue.playlist.len(), 2);
        assert!(!queue.playlist.iter().any(|t| Arc::ptr_eq(t, &target)));
        assert!(queue
            .shuffled
            .iter()
            .all(|s| queue.playlist.iter().any(|p| Arc::ptr_eq(p, s))));
    }

    #[test]
    fn test_move_adjusts_cursor() {
        // el actual se mueve
        let mut queue = queue_of(&["T1", "T2", "T3", "T4"]);
        queue.skip_to(1);
        queue.move_track(1, 3);
        assert_eq!(titles(queue.tracks()), vec!["T2", "T3", "T1", "T4"]);
        assert_eq!(queue.current_index(), Some(2));

        // el actual queda entre from y to, hacia adelante
        let mut queue = queue_of(&["T1", "T2", "T3", "T4"]);
        queue.skip_to(3);
        queue.move_track(2, 4);
        assert_eq!(current_title(&queue).as_deref(), Some("T3"));
        assert_eq!(queue.current_index(), Some(1));

        // fuera del rango movido
        let mut queue = queue_of(&["T1", "T2", "T3", "T4"]);
        queue.skip_to(4);
        queue.move_track(1, 2);
        assert_eq!(queue.current_index(), Some(3));

        assert!(!queue.move_track(0, 2));
        assert!(!queue.move_track(1, 5));
    }

    #[test]
    fn test_move_while_shuffled_only_touches_active_list() {
        let mut queue = queue_of(&["T1", "T2", "T3"]);
        queue.toggle_shuffle_with(&mut StdRng::seed_from_u64(1));
        let before: Vec<_> = titles(&queue.playlist).iter().map(|s| s.to_string()).collect();

        queue.move_track(1, 3);

        assert_eq!(titles(&queue.playlist), before);
    }

    /// Comportamiento actual: retroceder no da la vuelta aunque loop-queue esté activo
    #[test]
    fn test_previous_clamps_at_start() {
        let mut queue = queue_of(&["T1", "T2"]);
        queue.toggle_loop_queue();
        queue.skip_to(1);

        assert_eq!(queue.previous().unwrap().title(), "T1");
        assert_eq!(queue.current_index(), Some(0));

        queue.skip_to(2);
        assert_eq!(queue.previous().unwrap().title(), "T1");
        assert!(QueueManager::new(10).previous().is_none());
    }

    #[test]
    fn test_skip_to_out_of_range() {
        let mut queue = queue_of(&["T1", "T2"]);
        assert!(queue.skip_to(3).is_none());
        assert!(queue.skip_to(0).is_none());
        assert_eq!(queue.current_index(), None);
    }

    #[test]
    fn test_clear_resets_flags() {
        let mut queue = queue_of(&["T1"]);
        queue.toggle_loop_one();
        queue.toggle_loop_queue();
        queue.toggle_shuffle();
        queue.set_playing(true);

        queue.clear();

        assert!(queue.is_empty());
        assert!(!queue.loop_one() && !queue.loop_queue() && !queue.shuffle() && !queue.is_playing());
    }

    #[test]
    fn test_paginate_defaults_to_current_page() {
        let names: Vec<String> = (1..=25).map(|i| format!("T{}", i)).collect();
        let names: Vec<&str> = names.iter().map(String::as_str).collect();
        let mut queue = queue_of(&names);

        let page = queue.paginate(0).unwrap();
        assert_eq!((page.current_page, page.page_count), (1, 3));

        queue.skip_to(13);
        let page = queue.paginate(0).unwrap();
        assert_eq!(page.current_page, 2);
        assert_eq!(page.entries.len(), 10);
        assert_eq!(page.entries[0].position, 11);
        assert!(page.entries[2].is_current);
        assert_eq!(page.entries.iter().filter(|e| e.is_current).count(), 1);

        let last = queue.paginate(3).unwrap();
        assert_eq!(last.entries.len(), 5);
        assert_eq!(
            queue.paginate(4).unwrap_err(),
            QueueError::PageOutOfRange { page: 4, page_count: 3 }
        );
        assert_eq!(queue.page_current(), 3);
    }

    #[test]
    fn test_paginate_empty_queue() {
        let mut queue = QueueManager::new(10);
        assert_eq!(queue.paginate(0).unwrap().entries.len(), 0);
        assert_eq!(queue.paginate(1).unwrap_err(), QueueError::Empty);
    }

    #[test]
    fn test_jump_page_clamps() {
        let names: Vec<String> = (1..=15).map(|i| format!("T{}", i)).collect();
        let names: Vec<&str> = names.iter().map(String::as_str).collect();
        let mut queue = queue_of(&names);

        assert_eq!(queue.jump_page(-1).unwrap().current_page, 1);
        assert_eq!(queue.jump_page(1).unwrap().current_page, 2);
        assert_eq!(queue.jump_page(1).unwrap().current_page, 2);
        assert_eq!(queue.page_count(), 2);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add,
        Remove(usize),
        Move(usize, usize),
        Next(bool),
        Previous,
        SkipTo(usize),
        ToggleShuffle,
        ToggleLoopOne,
        ToggleLoopQueue,
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            3 => Just(Op::Add),
            2 => (0usize..10).prop_map(Op::Remove),
            2 => (0usize..10, 0usize..10).prop_map(|(from, to)| Op::Move(from, to)),
            2 => any::<bool>().prop_map(Op::Next),
            1 => Just(Op::Previous),
            1 => (0usize..10).prop_map(Op::SkipTo),
            1 => Just(Op::ToggleShuffle),
            1 => Just(Op::ToggleLoopOne),
            1 => Just(Op::ToggleLoopQueue),
        ]
    }

    proptest! {
        #[test]
        fn cursor_stays_within_active_list(ops in prop::collection::vec(op_strategy(), 0..80)) {
            let mut queue = QueueManager::new(1000);

            for (step, op) in ops.into_iter().enumerate() {
                match op {
                    Op::Add => { queue.add(queued(&format!("T{}", step), 60)).unwrap(); }
                    Op::Remove(i) => { queue.remove(i); }
                    Op::Move(from, to) => { queue.move_track(from, to); }
                    Op::Next(skip) => { queue.next(skip); }
                    Op::Previous => { queue.previous(); }
                    Op::SkipTo(i) => { queue.skip_to(i); }
                    Op::ToggleShuffle => { queue.toggle_shuffle(); }
                    Op::ToggleLoopOne => { queue.toggle_loop_one(); }
                    Op::ToggleLoopQueue => { queue.toggle_loop_queue(); }
                }

                if let Some(cursor) = queue.current_index() {
                    prop_assert!(cursor < queue.tracks().len());
                }
                if queue.shuffle() {
                    prop_assert_eq!(queue.shuffled.len(), queue.playlist.len());
                    prop_assert!(queue
                        .shuffled
                        .iter()
                        .all(|s| queue.playlist.iter().any(|p| Arc::ptr_eq(p, s))));
                } else {
                    prop_assert!(queue.shuffled.is_empty());
                }
            }
        }
    }
}
