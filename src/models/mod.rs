use serde::{Deserialize, Serialize};

/// A single image from the cat API.
///
/// The search endpoint returns more fields (breeds, dimensions, ...);
/// only `id` and `url` are consumed, everything else is dropped at decode.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Cat {
    pub id: String,
    pub url: String,
}

/// One like row as the backend returns it under `data`.
///
/// The backend row also carries `user_id` and timestamps; the pair
/// `(user, cat_id)` is unique server-side, so only `cat_id` matters here.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct Like {
    pub cat_id: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct LikesResponse {
    pub data: Vec<Like>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct CreateLikeRequest {
    pub cat_id: String,
}
