pub(crate) mod favorite_sync;
pub(crate) mod feed_sync;

use crate::api::ApiClient;
use crate::source::CatSourceClient;
use crate::state::favorite_sync::FavoritesController;
use crate::state::feed_sync::FeedController;
use leptos::prelude::*;

#[derive(Clone)]
pub(crate) struct AppState {
    /// Holds the current bearer credential; replaced wholesale on login
    /// elsewhere and cleared when the backend rejects it.
    pub api_client: RwSignal<ApiClient>,

    pub source: CatSourceClient,
    pub feed: FeedController,
    pub favorites: FavoritesController,
}

impl AppState {
    pub fn new() -> Self {
        let api_client = RwSignal::new(ApiClient::load_from_storage());
        let source = CatSourceClient::from_env();

        Self {
            api_client,
            source: source.clone(),
            feed: FeedController::new(source),
            favorites: FavoritesController::new(api_client),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
pub(crate) struct AppContext(pub AppState);
