use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::info;
use uuid::Uuid;

use super::pipeline::VoicePipeline;

struct SessionEntry {
    pipeline: Arc<Mutex<VoicePipeline>>,
    touched: Instant,
}

/// Live voice-input sessions. Each pipeline sits behind its own mutex, so
/// segments for one session are folded in strictly one at a time.
#[derive(Clone, Default)]
pub struct VoiceSessions {
    sessions: Arc<RwLock<HashMap<Uuid, SessionEntry>>>,
}

impl VoiceSessions {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, pipeline: VoicePipeline) -> Uuid {
        let id = Uuid::new_v4();
        let entry = SessionEntry {
            pipeline: Arc::new(Mutex::new(pipeline)),
            touched: Instant::now(),
        };
        self.sessions.write().await.insert(id, entry);
        id
    }

    /// Looks a session up and marks it as used.
    pub async fn get(&self, id: &Uuid) -> Option<Arc<Mutex<VoicePipeline>>> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(id)?;
        entry.touched = Instant::now();
        Some(entry.pipeline.clone())
    }

    pub async fn remove(&self, id: &Uuid) -> Option<Arc<Mutex<VoicePipeline>>> {
        self.sessions.write().await.remove(id).map(|entry| entry.pipeline)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drops sessions untouched for at least `ttl`. A session whose pipeline
    /// is locked is mid-request and stays.
    pub async fn sweep(&self, ttl: Duration) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();

        sessions.retain(|_, entry| {
            now.duration_since(entry.touched) < ttl || entry.pipeline.try_lock().is_err()
        });

        before - sessions.len()
    }

    pub fn spawn_sweeper(&self, ttl: Duration) -> JoinHandle<()> {
        let sessions = self.clone();
        let period = (ttl / 2).max(Duration::from_secs(1));

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // The first tick completes immediately.
            ticker.tick().await;

            loop {
                ticker.tick().await;
                let removed = sessions.sweep(ttl).await;
                if removed > 0 {
                    info!(removed, "expired idle voice sessions");
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(60);

    #[tokio::test]
    async fn insert_get_remove() {
        let sessions = VoiceSessions::new();
        let id = sessions.insert(VoicePipeline::new()).await;

        assert_eq!(sessions.len().await, 1);
        assert!(sessions.get(&id).await.is_some());
        assert!(sessions.remove(&id).await.is_some());
        assert!(sessions.get(&id).await.is_none());
        assert_eq!(sessions.len().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn sweep_drops_only_idle_sessions() {
        let sessions = VoiceSessions::new();
        let idle = sessions.insert(VoicePipeline::new()).await;
        let active = sessions.insert(VoicePipeline::new()).await;

        tokio::time::advance(TTL / 2).await;
        assert!(sessions.get(&active).await.is_some());
        tokio::time::advance(TTL / 2 + Duration::from_secs(1)).await;

        assert_eq!(sessions.sweep(TTL).await, 1);
        assert!(sessions.get(&idle).await.is_none());
        assert!(sessions.get(&active).await.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn sweep_keeps_a_session_in_use() {
        let sessions = VoiceSessions::new();
        let id = sessions.insert(VoicePipeline::new()).await;
        let pipeline = sessions.get(&id).await.unwrap();
        let _guard = pipeline.lock().await;

        tokio::time::advance(TTL * 2).await;

        assert_eq!(sessions.sweep(TTL).await, 0);
        assert_eq!(sessions.len().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn sweeper_expires_abandoned_sessions() {
        let sessions = VoiceSessions::new();
        sessions.insert(VoicePipeline::new()).await;
        let sweeper = sessions.spawn_sweeper(TTL);

        tokio::time::sleep(TTL * 2).await;

        assert_eq!(sessions.len().await, 0);
        sweeper.abort();
    }
}
