use crate::feed::FeedAccumulator;
use crate::models::Cat;
use crate::source::CatSourceClient;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// Async driver for the feed accumulator.
///
/// The accumulator itself is synchronous; this controller owns it inside a
/// signal, runs the actual fetches on the event loop, and feeds results
/// back in. The accumulator's `Loading` phase guarantees at most one fetch
/// in flight, so a scroll trigger and a resize trigger racing each other
/// collapse into a single request.
#[derive(Clone)]
pub(crate) struct FeedController {
    source: CatSourceClient,
    state: RwSignal<FeedAccumulator>,

    /// Stamped onto every request; bumped by `reset()`. A response carrying
    /// a stale stamp belongs to a torn-down view and is discarded.
    epoch: RwSignal<u64>,
}

impl FeedController {
    pub fn new(source: CatSourceClient) -> Self {
        Self {
            source,
            state: RwSignal::new(FeedAccumulator::new()),
            epoch: RwSignal::new(0),
        }
    }

    pub fn items(&self) -> Vec<Cat> {
        self.state.with(|s| s.items().to_vec())
    }

    pub fn is_loading(&self) -> bool {
        self.state.with(|s| s.is_loading())
    }

    pub fn is_exhausted(&self) -> bool {
        self.state.with(|s| s.is_exhausted())
    }

    pub fn last_error(&self) -> Option<String> {
        self.state.with(|s| s.last_error().map(str::to_string))
    }

    /// Requests the next page. No-op unless the accumulator is idle.
    pub fn load_next_page(&self) {
        let Some(cursor) = self.state.try_update(|s| s.begin_load()).flatten() else {
            return;
        };

        let stamped = self.epoch.get_untracked();
        let s2 = self.clone();
        spawn_local(async move {
            let result = s2.source.fetch_page(cursor).await;

            if s2.epoch.get_untracked() != stamped {
                // The feed was reset while this fetch was in flight.
                return;
            }

            s2.state.update(|s| match result {
                Ok(batch) => s.apply_batch(batch),
                Err(e) => s.apply_failure(e.to_string()),
            });
        });
    }

    /// Forgets all loaded items and invalidates in-flight responses.
    /// Called when the feed view unmounts; the next mount starts from page 1.
    pub fn reset(&self) {
        self.epoch.update(|e| *e += 1);
        self.state.set(FeedAccumulator::new());
    }
}
