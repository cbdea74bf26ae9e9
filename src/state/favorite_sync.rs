use crate::api::{ApiClient, ApiError, ApiErrorKind};
use crate::favorites::{FavoriteSet, LoadState, PendingOp};
use crate::models::Cat;
use crate::source::{CatSourceClient, SourceError};
use futures::future::join_all;
use leptos::logging;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// Looks all ids up concurrently, keeping input order; an id that fails to
/// resolve is logged and dropped, never fatal for the rest.
async fn resolve_cats<F, Fut>(ids: &[String], lookup: F) -> Vec<Cat>
where
    F: Fn(String) -> Fut,
    Fut: std::future::Future<Output = Result<Cat, SourceError>>,
{
    let lookups = ids.iter().map(|id| {
        let fut = lookup(id.clone());
        async move {
            match fut.await {
                Ok(cat) => Some(cat),
                Err(e) => {
                    logging::warn!("skipping favorite {id}: {e}");
                    None
                }
            }
        }
    });

    join_all(lookups).await.into_iter().flatten().collect()
}

/// Reconciles the local favorite set against the likes backend.
///
/// Toggles apply optimistically through `FavoriteSet` and are settled by
/// the mutation response; after every successful mutation the authoritative
/// set is re-fetched so partial or duplicate server state cannot linger.
/// That reconciliation fetch is best-effort: its failure is logged and the
/// locally-confirmed state stands until the next load.
#[derive(Clone)]
pub(crate) struct FavoritesController {
    api_client: RwSignal<ApiClient>,
    set: RwSignal<FavoriteSet>,
    last_error: RwSignal<Option<String>>,

    /// Session epoch, bumped when the credential is invalidated. Responses
    /// stamped under an older epoch must not touch the cleared set.
    epoch: RwSignal<u64>,
}

impl FavoritesController {
    pub fn new(api_client: RwSignal<ApiClient>) -> Self {
        Self {
            api_client,
            set: RwSignal::new(FavoriteSet::new()),
            last_error: RwSignal::new(None),
            epoch: RwSignal::new(0),
        }
    }

    pub fn is_favorited(&self, id: &str) -> bool {
        self.set.with(|s| s.is_favorited(id))
    }

    pub fn load_state(&self) -> LoadState {
        self.set.with(|s| s.load_state())
    }

    pub fn last_error(&self) -> Option<String> {
        self.last_error.get()
    }

    /// The rejected credential and everything cached under it go away
    /// together; showing stale "favorited" flags under an invalid identity
    /// is worse than showing none.
    pub fn invalidate_session(&self) {
        self.epoch.update(|e| *e += 1);
        self.api_client.update(|c| c.logout());
        self.set.update(|s| s.clear_unauthenticated());
    }

    fn handle_api_error(&self, e: &ApiError) {
        match e.kind {
            ApiErrorKind::SessionExpired => self.invalidate_session(),
            ApiErrorKind::Unauthenticated => {
                self.set.update(|s| s.clear_unauthenticated());
            }
            _ => {}
        }
        self.last_error.set(Some(e.to_string()));
    }

    /// Fetches the authoritative favorite set and replaces the local one.
    /// Without a credential this fails locally, clears the set, and never
    /// reaches the network.
    pub fn load_favorites(&self) {
        let api = self.api_client.get_untracked();
        if !api.is_authenticated() {
            self.handle_api_error(&ApiError::unauthenticated());
            return;
        }

        let stamped = self.epoch.get_untracked();
        let s2 = self.clone();
        spawn_local(async move {
            match api.list_likes().await {
                Ok(ids) => {
                    if s2.epoch.get_untracked() != stamped {
                        return;
                    }
                    s2.set.update(|s| s.replace_all(ids));
                    s2.last_error.set(None);
                }
                Err(e) => {
                    if s2.epoch.get_untracked() == stamped {
                        s2.handle_api_error(&e);
                    }
                }
            }
        });
    }

    /// Flips the favorite state of one item.
    ///
    /// The optimistic flip is visible immediately; the matching create or
    /// delete goes out in the background. A second toggle on the same id
    /// while the first is unresolved is dropped by `begin_toggle`, so the
    /// backend never sees a create/delete race for one pair.
    pub fn toggle(&self, cat_id: &str) {
        let api = self.api_client.get_untracked();
        if !api.is_authenticated() {
            self.handle_api_error(&ApiError::unauthenticated());
            return;
        }

        let Some(op) = self.set.try_update(|s| s.begin_toggle(cat_id)).flatten() else {
            return;
        };

        let stamped = self.epoch.get_untracked();
        let id = cat_id.to_string();
        let s2 = self.clone();
        spawn_local(async move {
            let result = match op {
                PendingOp::Adding => api.create_like(&id).await,
                PendingOp::Removing => api.remove_like(&id).await,
            };

            if s2.epoch.get_untracked() != stamped {
                // Session was invalidated mid-flight; the set is already cleared.
                return;
            }

            match result {
                Ok(()) => {
                    s2.set.update(|s| s.confirm(&id));
                    s2.last_error.set(None);

                    // Reconcile against authoritative state. One extra round
                    // trip, but duplicate or partial rows on the server can
                    // never leave the local view wrong past this point.
                    match api.list_likes().await {
                        Ok(ids) => {
                            if s2.epoch.get_untracked() == stamped {
                                s2.set.update(|s| s.replace_all(ids));
                            }
                        }
                        Err(e) => {
                            logging::warn!("favorites reconciliation failed: {e}");
                        }
                    }
                }
                Err(e) => {
                    s2.set.update(|s| s.revert(&id));
                    s2.handle_api_error(&e);
                }
            }
        });
    }

    /// Resolves the favorite set to displayable cats for the favorites view.
    ///
    /// Re-fetches the authoritative ids first, then looks each image up at
    /// the source; a single unresolvable image is skipped, not fatal.
    pub async fn fetch_favorite_cats(&self, source: &CatSourceClient) -> Result<Vec<Cat>, ApiError> {
        let api = self.api_client.get_untracked();
        if !api.is_authenticated() {
            self.handle_api_error(&ApiError::unauthenticated());
            return Err(ApiError::unauthenticated());
        }

        let stamped = self.epoch.get_untracked();
        let ids = match api.list_likes().await {
            Ok(ids) => ids,
            Err(e) => {
                if self.epoch.get_untracked() == stamped {
                    self.handle_api_error(&e);
                }
                return Err(e);
            }
        };

        if self.epoch.get_untracked() == stamped {
            self.set.update(|s| s.replace_all(ids.clone()));
            self.last_error.set(None);
        }

        let cats = resolve_cats(&ids, |id| {
            let source = source.clone();
            async move { source.fetch_by_id(&id).await }
        })
        .await;

        Ok(cats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceErrorKind;

    #[test]
    fn test_load_and_toggle_without_token_stay_local() {
        let owner = Owner::new();
        owner.set();

        let api_client = RwSignal::new(ApiClient::new("/api".to_string()));
        let controller = FavoritesController::new(api_client);

        controller.load_favorites();
        assert_eq!(controller.load_state(), LoadState::Unauthenticated);
        assert!(controller.last_error().is_some());

        // Rejected before any pending op is marked; an optimistic add would
        // make the predicate true here.
        controller.toggle("a");
        assert!(!controller.is_favorited("a"));
        assert_eq!(controller.load_state(), LoadState::Unauthenticated);
    }

    #[test]
    fn test_resolve_cats_skips_failures_and_keeps_order() {
        let ids = vec!["a".to_string(), "b".to_string(), "c".to_string()];

        let cats = futures::executor::block_on(resolve_cats(&ids, |id| async move {
            if id == "b" {
                Err(SourceError {
                    kind: SourceErrorKind::Http,
                    message: "gone".to_string(),
                })
            } else {
                Ok(Cat {
                    url: format!("https://cdn/{id}.jpg"),
                    id,
                })
            }
        }));

        let resolved: Vec<&str> = cats.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(resolved, vec!["a", "c"]);
    }
}
