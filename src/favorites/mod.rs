use std::collections::{HashMap, HashSet};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PendingOp {
    Adding,
    Removing,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum LoadState {
    /// Never fetched in this session.
    NotLoaded,
    /// `confirmed` mirrors the backend as of the last successful fetch.
    Loaded,
    /// Fetch refused for lack of a credential; the set is known-empty,
    /// which is not the same as "not yet tried".
    Unauthenticated,
}

/// Local view of the per-user favorite set, reconciled against the backend.
///
/// Every id is in exactly one of three states: confirmed-favorited,
/// confirmed-not-favorited, or pending. A pending op is an optimistic
/// mutation whose network call is still in flight; it wins over the
/// confirmed state for display and is cleared only by `confirm` (server
/// said yes) or `revert` (server said no, view snaps back).
#[derive(Clone, Debug)]
pub(crate) struct FavoriteSet {
    confirmed: HashSet<String>,
    pending: HashMap<String, PendingOp>,
    load_state: LoadState,
}

impl FavoriteSet {
    pub fn new() -> Self {
        Self {
            confirmed: HashSet::new(),
            pending: HashMap::new(),
            load_state: LoadState::NotLoaded,
        }
    }

    pub fn load_state(&self) -> LoadState {
        self.load_state
    }

    /// The rendered predicate: pending wins, confirmed is the fallback.
    pub fn is_favorited(&self, id: &str) -> bool {
        match self.pending.get(id) {
            Some(PendingOp::Adding) => true,
            Some(PendingOp::Removing) => false,
            None => self.confirmed.contains(id),
        }
    }

    /// Decides the mutation for a toggle and marks it pending.
    ///
    /// The target action comes from the confirmed state only. While the same
    /// id already has an op in flight the toggle is rejected (`None`);
    /// firing a second create/delete concurrently could leave the backend
    /// pair and the local view disagreeing.
    pub fn begin_toggle(&mut self, id: &str) -> Option<PendingOp> {
        if self.pending.contains_key(id) {
            return None;
        }

        let op = if self.confirmed.contains(id) {
            PendingOp::Removing
        } else {
            PendingOp::Adding
        };

        self.pending.insert(id.to_string(), op);
        Some(op)
    }

    /// Mutation acknowledged: fold the pending op into the confirmed set.
    pub fn confirm(&mut self, id: &str) {
        match self.pending.remove(id) {
            Some(PendingOp::Adding) => {
                self.confirmed.insert(id.to_string());
            }
            Some(PendingOp::Removing) => {
                self.confirmed.remove(id);
            }
            None => {}
        }
    }

    /// Mutation failed: drop the pending op, confirmed state untouched, so
    /// the displayed flag returns to its pre-toggle value.
    pub fn revert(&mut self, id: &str) {
        self.pending.remove(id);
    }

    /// Wholesale replacement with the backend's authoritative set
    /// (last-fetch-wins). In-flight pending ops survive the swap; their own
    /// responses will settle them.
    pub fn replace_all(&mut self, ids: impl IntoIterator<Item = String>) {
        self.confirmed = ids.into_iter().collect();
        self.load_state = LoadState::Loaded;
    }

    /// Auth is gone (no token, or the backend rejected it): drop everything
    /// so no stale "favorited" flag is shown under an invalid identity.
    pub fn clear_unauthenticated(&mut self) {
        self.confirmed.clear();
        self.pending.clear();
        self.load_state = LoadState::Unauthenticated;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_set_is_not_loaded_and_empty() {
        let set = FavoriteSet::new();
        assert_eq!(set.load_state(), LoadState::NotLoaded);
        assert!(!set.is_favorited("a"));
    }

    #[test]
    fn test_toggle_unfavorited_id_is_adding_and_optimistically_visible() {
        let mut set = FavoriteSet::new();
        assert_eq!(set.begin_toggle("a"), Some(PendingOp::Adding));
        // Visible as favorited before the server confirms.
        assert!(set.is_favorited("a"));
    }

    #[test]
    fn test_toggle_favorited_id_is_removing_and_optimistically_hidden() {
        let mut set = FavoriteSet::new();
        set.replace_all(vec!["a".to_string()]);

        assert_eq!(set.begin_toggle("a"), Some(PendingOp::Removing));
        assert!(!set.is_favorited("a"));
    }

    #[test]
    fn test_second_toggle_while_pending_is_rejected() {
        let mut set = FavoriteSet::new();
        assert_eq!(set.begin_toggle("a"), Some(PendingOp::Adding));
        // Rapid double click: no second mutation for the same id.
        assert_eq!(set.begin_toggle("a"), None);
        assert_eq!(set.begin_toggle("a"), None);
    }

    #[test]
    fn test_different_ids_may_be_pending_concurrently() {
        let mut set = FavoriteSet::new();
        assert_eq!(set.begin_toggle("a"), Some(PendingOp::Adding));
        assert_eq!(set.begin_toggle("b"), Some(PendingOp::Adding));
        assert!(set.is_favorited("a"));
        assert!(set.is_favorited("b"));
    }

    #[test]
    fn test_confirm_folds_pending_into_confirmed() {
        let mut set = FavoriteSet::new();
        set.begin_toggle("a");
        set.confirm("a");

        assert!(set.is_favorited("a"));
        // Settled: the id can be toggled again, now as a removal.
        assert_eq!(set.begin_toggle("a"), Some(PendingOp::Removing));
        set.confirm("a");
        assert!(!set.is_favorited("a"));
    }

    #[test]
    fn test_revert_restores_pre_toggle_value() {
        let mut set = FavoriteSet::new();
        set.replace_all(vec!["a".to_string()]);

        set.begin_toggle("a"); // optimistic removal
        assert!(!set.is_favorited("a"));

        set.revert("a"); // delete failed
        assert!(set.is_favorited("a"));

        set.begin_toggle("b"); // optimistic add
        set.revert("b"); // create failed
        assert!(!set.is_favorited("b"));
    }

    #[test]
    fn test_replace_all_is_last_fetch_wins() {
        let mut set = FavoriteSet::new();
        set.replace_all(vec!["a".to_string(), "b".to_string()]);
        set.replace_all(vec!["c".to_string()]);

        assert!(!set.is_favorited("a"));
        assert!(!set.is_favorited("b"));
        assert!(set.is_favorited("c"));
        assert_eq!(set.load_state(), LoadState::Loaded);
    }

    #[test]
    fn test_replace_all_keeps_unrelated_pending_op_winning() {
        let mut set = FavoriteSet::new();
        set.begin_toggle("a");

        // Reconciliation lands while `a` is still in flight and does not
        // include it yet; the pending op still wins visually.
        set.replace_all(vec!["b".to_string()]);
        assert!(set.is_favorited("a"));
        assert!(set.is_favorited("b"));

        set.confirm("a");
        assert!(set.is_favorited("a"));
    }

    #[test]
    fn test_clear_unauthenticated_drops_everything() {
        let mut set = FavoriteSet::new();
        set.replace_all(vec!["a".to_string()]);
        set.begin_toggle("b");

        set.clear_unauthenticated();

        assert_eq!(set.load_state(), LoadState::Unauthenticated);
        assert!(!set.is_favorited("a"));
        assert!(!set.is_favorited("b"));
        // Nothing pending anymore; a later toggle (after re-auth) starts clean.
        assert_eq!(set.begin_toggle("b"), Some(PendingOp::Adding));
    }
}
