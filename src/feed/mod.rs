use crate::models::Cat;
use crate::source::CatBatch;
use std::collections::HashSet;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum FeedPhase {
    Idle,
    Loading,
    /// Terminal: a batch came back shorter than requested, nothing more upstream.
    Exhausted,
}

/// Accumulates pages of the feed into one ordered, duplicate-free list.
///
/// Page-index pagination against a live external source can return
/// overlapping items across requests, so merging filters every id already
/// seen. The `Loading` phase doubles as the single-flight guard: a second
/// `begin_load` while one fetch is outstanding yields nothing.
///
/// The accumulator is synchronous on purpose; the async fetch lives in
/// `FeedController`, which feeds results back through `apply_batch` /
/// `apply_failure`.
#[derive(Clone, Debug)]
pub(crate) struct FeedAccumulator {
    items: Vec<Cat>,
    seen: HashSet<String>,

    /// 1-based page to request next. Advances only on a successful batch.
    page: u32,
    phase: FeedPhase,
    last_error: Option<String>,
}

impl FeedAccumulator {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            seen: HashSet::new(),
            page: 1,
            phase: FeedPhase::Idle,
            last_error: None,
        }
    }

    pub fn items(&self) -> &[Cat] {
        &self.items
    }

    pub fn is_loading(&self) -> bool {
        self.phase == FeedPhase::Loading
    }

    pub fn is_exhausted(&self) -> bool {
        self.phase == FeedPhase::Exhausted
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Starts a load if the feed is idle, returning the cursor to fetch.
    /// `None` while loading or exhausted; callers just drop the request.
    pub fn begin_load(&mut self) -> Option<u32> {
        if self.phase != FeedPhase::Idle {
            return None;
        }

        self.phase = FeedPhase::Loading;
        self.last_error = None;
        Some(self.page)
    }

    /// Merges a fetched batch: new items append in arrival order, ids
    /// already present are dropped, the cursor advances by one page. A
    /// short batch is the end-of-source signal and parks the feed for good.
    pub fn apply_batch(&mut self, batch: CatBatch) {
        debug_assert_eq!(self.phase, FeedPhase::Loading);

        let short = batch.cats.len() < batch.requested;

        for cat in batch.cats {
            if self.seen.insert(cat.id.clone()) {
                self.items.push(cat);
            }
        }

        self.page += 1;
        self.phase = if short {
            FeedPhase::Exhausted
        } else {
            FeedPhase::Idle
        };
    }

    /// A failed fetch keeps the cursor where it was; the next `begin_load`
    /// retries the same page.
    pub fn apply_failure(&mut self, message: String) {
        debug_assert_eq!(self.phase, FeedPhase::Loading);

        self.last_error = Some(message);
        self.phase = FeedPhase::Idle;
    }
}
