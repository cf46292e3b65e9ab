use dashmap::{mapref::entry::Entry, DashMap};
use serenity::model::id::GuildId;
use std::{future::Future, sync::Arc, time::Duration};
use tokio::task::JoinHandle;
use tracing::debug;

/// Temporizadores de auto-desconexión, uno por servidor.
///
/// Cuando vence el plazo la tarea se quita del mapa antes de correr su acción,
/// así los eventos de voz que esa misma acción provoca ya no la cancelan.
#[derive(Clone, Default)]
pub struct IdleTimers {
    timers: Arc<DashMap<GuildId, JoinHandle<()>>>,
}

impl IdleTimers {
    /// Corre `action` tras `timeout`; `false` si ya había uno pendiente
    pub fn schedule<F>(&self, guild_id: GuildId, timeout: Duration, action: F) -> bool
    where
        F: Future<Output = ()> + Send + 'static,
    {
        match self.timers.entry(guild_id) {
            Entry::Occupied(timer) if !timer.get().is_finished() => false,
            entry => {
                let timers = Arc::clone(&self.timers);
                let timer = tokio::spawn(async move {
                    tokio::time::sleep(timeout).await;
                    timers.remove(&guild_id);
                    action.await;
                });
                entry.insert(timer);
                true
            }
        }
    }

    /// Cancela el temporizador pendiente del servidor
    pub fn cancel(&self, guild_id: GuildId) -> bool {
        match self.timers.remove(&guild_id) {
            Some((_, timer)) => {
                timer.abort();
                debug!("Auto-desconexión cancelada en guild {}", guild_id);
                true
            }
            None => false,
        }
    }

    pub fn is_pending(&self, guild_id: GuildId) -> bool {
        self.timers
            .get(&guild_id)
            .is_some_and(|timer| !timer.is_finished())
    }
}
