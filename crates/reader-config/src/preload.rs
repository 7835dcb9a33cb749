//! Background loading of downloadable typefaces
//!
//! Typefaces other than the system one have to be registered before text
//! can be rendered with them. When a previous session downloaded one,
//! [`ReaderDisplayConfig::initialize`](crate::ReaderDisplayConfig::initialize)
//! schedules a preload task per typeface. Tasks are held back until the
//! returned [`PreloadHandle`] is awaited, detached or dropped, which can only
//! happen in the caller after `initialize` has returned. Each task reports
//! completion through [`ConfigEvent::TypefaceReady`] and never touches the
//! selected font.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::{ConfigError, Result};
use crate::events::ConfigEvent;
use crate::typography::ReaderFont;

/// Set of typefaces that can be rendered right now
pub type ReadyTypefaces = Arc<RwLock<HashSet<ReaderFont>>>;

/// Loads a typeface resource so it can be used for rendering
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TypefaceLoader: Send + Sync {
    /// Load `font`, failing if the resource is missing or unusable
    async fn load(&self, font: ReaderFont) -> anyhow::Result<()>;
}

/// Handle to the preload tasks scheduled by one `initialize` call
///
/// The tasks start when the handle is awaited with [`wait`](Self::wait),
/// released with [`detach`](Self::detach), or dropped.
#[derive(Debug, Default)]
pub struct PreloadHandle {
    tasks: Vec<(ReaderFont, JoinHandle<Result<()>>)>,
    gate: Option<PreloadGate>,
}

impl PreloadHandle {
    /// Number of typefaces being preloaded
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// True when nothing was scheduled
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Typefaces being preloaded, in scheduling order
    pub fn fonts(&self) -> Vec<ReaderFont> {
        self.tasks.iter().map(|(font, _)| *font).collect()
    }

    /// Let the preloads run without tracking them
    pub fn detach(self) {
        if let Some(gate) = self.gate {
            gate.open();
        }
    }

    /// Start the preloads, wait for each and return the per-typeface outcome
    pub async fn wait(self) -> Vec<(ReaderFont, Result<()>)> {
        let PreloadHandle { tasks, gate } = self;
        if let Some(gate) = gate {
            gate.open();
        }

        let mut outcomes = Vec::with_capacity(tasks.len());
        for (font, task) in tasks {
            let outcome = match task.await {
                Ok(result) => result,
                Err(join_err) => {
                    Err(ConfigError::PreloadFailed { font, reason: join_err.to_string() })
                }
            };
            outcomes.push((font, outcome));
        }
        outcomes
    }
}

/// Holds preload tasks back until it is opened or dropped
#[derive(Debug)]
struct PreloadGate {
    release: watch::Sender<bool>,
}

impl PreloadGate {
    fn open(self) {
        self.release.send_replace(true);
    }
}

/// Schedule one preload task per font on the ambient tokio runtime
///
/// Without a runtime nothing is scheduled and the typefaces stay unavailable.
pub(crate) fn spawn_preloads(
    loader: Arc<dyn TypefaceLoader>,
    fonts: Vec<ReaderFont>,
    ready: ReadyTypefaces,
    events: broadcast::Sender<ConfigEvent>,
) -> PreloadHandle {
    if fonts.is_empty() {
        return PreloadHandle::default();
    }

    let runtime = match tokio::runtime::Handle::try_current() {
        Ok(runtime) => runtime,
        Err(_) => {
            warn!(count = fonts.len(), "No async runtime available, skipping typeface preload");
            return PreloadHandle::default();
        }
    };

    let (release, gate_rx) = watch::channel(false);
    let tasks = fonts
        .into_iter()
        .map(|font| {
            let loader = Arc::clone(&loader);
            let ready = Arc::clone(&ready);
            let events = events.clone();
            let mut gate_rx = gate_rx.clone();

            let task = runtime.spawn(async move {
                // A dropped gate also releases the task.
                let _ = gate_rx.wait_for(|released| *released).await;
                preload_one(loader.as_ref(), font, &ready, &events).await
            });
            (font, task)
        })
        .collect();

    PreloadHandle { tasks, gate: Some(PreloadGate { release }) }
}

async fn preload_one(
    loader: &dyn TypefaceLoader,
    font: ReaderFont,
    ready: &ReadyTypefaces,
    events: &broadcast::Sender<ConfigEvent>,
) -> Result<()> {
    match loader.load(font).await {
        Ok(()) => {
            ready.write().insert(font);
            debug!(font = %font, "Typeface preloaded");
            let _ = events.send(ConfigEvent::TypefaceReady(font));
            Ok(())
        }
        Err(err) => {
            warn!(font = %font, error = %err, "Typeface preload failed");
            Err(ConfigError::PreloadFailed { font, reason: format!("{err:#}") })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;

    fn ready_set() -> ReadyTypefaces {
        Arc::new(RwLock::new(HashSet::new()))
    }

    #[tokio::test]
    async fn test_successful_preload_marks_ready() {
        let mut loader = MockTypefaceLoader::new();
        loader.expect_load().with(eq(ReaderFont::Kaiti)).times(1).returning(|_| Ok(()));

        let ready = ready_set();
        let (events, mut rx) = broadcast::channel(8);
        let handle =
            spawn_preloads(Arc::new(loader), vec![ReaderFont::Kaiti], Arc::clone(&ready), events);
        assert_eq!(handle.fonts(), vec![ReaderFont::Kaiti]);

        let outcomes = handle.wait().await;
        assert_eq!(outcomes.len(), 1);
        assert!(outcomes[0].1.is_ok());
        assert!(ready.read().contains(&ReaderFont::Kaiti));
        assert_eq!(rx.try_recv().unwrap(), ConfigEvent::TypefaceReady(ReaderFont::Kaiti));
    }

    #[tokio::test]
    async fn test_failed_preload_is_reported() {
        let mut loader = MockTypefaceLoader::new();
        loader
            .expect_load()
            .returning(|_| Err(anyhow::anyhow!("resource missing")));

        let ready = ready_set();
        let (events, mut rx) = broadcast::channel(8);
        let handle =
            spawn_preloads(Arc::new(loader), vec![ReaderFont::Song], Arc::clone(&ready), events);

        let outcomes = handle.wait().await;
        match &outcomes[0].1 {
            Err(ConfigError::PreloadFailed { font, reason }) => {
                assert_eq!(*font, ReaderFont::Song);
                assert!(reason.contains("resource missing"));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(ready.read().is_empty());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_tasks_held_until_handle_released() {
        let mut loader = MockTypefaceLoader::new();
        loader.expect_load().returning(|_| Ok(()));

        let ready = ready_set();
        let (events, _rx) = broadcast::channel(8);
        let handle =
            spawn_preloads(Arc::new(loader), vec![ReaderFont::Yuanti], Arc::clone(&ready), events);

        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert!(ready.read().is_empty());

        handle.wait().await;
        assert!(ready.read().contains(&ReaderFont::Yuanti));
    }

    #[tokio::test]
    async fn test_detached_preload_still_completes() {
        let mut loader = MockTypefaceLoader::new();
        loader.expect_load().returning(|_| Ok(()));

        let ready = ready_set();
        let (events, mut rx) = broadcast::channel(8);
        spawn_preloads(Arc::new(loader), vec![ReaderFont::Song], Arc::clone(&ready), events)
            .detach();

        assert_eq!(rx.recv().await.unwrap(), ConfigEvent::TypefaceReady(ReaderFont::Song));
        assert!(ready.read().contains(&ReaderFont::Song));
    }

    #[tokio::test]
    async fn test_dropped_handle_releases_tasks() {
        let mut loader = MockTypefaceLoader::new();
        loader.expect_load().returning(|_| Ok(()));

        let (events, mut rx) = broadcast::channel(8);
        drop(spawn_preloads(Arc::new(loader), vec![ReaderFont::Kaiti], ready_set(), events));

        assert_eq!(rx.recv().await.unwrap(), ConfigEvent::TypefaceReady(ReaderFont::Kaiti));
    }

    #[test]
    fn test_no_runtime_skips_preload() {
        let loader = MockTypefaceLoader::new();
        let (events, _rx) = broadcast::channel(8);
        let handle = spawn_preloads(Arc::new(loader), vec![ReaderFont::Song], ready_set(), events);
        assert!(handle.is_empty());
    }
}
