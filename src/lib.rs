mod api;
mod app;
mod components;
mod favorites;
mod feed;
mod models;
mod pages;
mod source;
mod state;
mod storage;

use crate::app::App;
use leptos::prelude::*;

// Needed for `#[wasm_bindgen(start)]` on the wasm entrypoint.
#[cfg(all(target_arch = "wasm32", not(test)))]
use wasm_bindgen::prelude::wasm_bindgen;

// WASM-only tests (run with `cargo test --target wasm32-unknown-unknown` + wasm-bindgen-test-runner)
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use crate::api::ApiClient;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_token_storage_roundtrip() {
        ApiClient::clear_storage();
        assert!(!ApiClient::load_from_storage().is_authenticated());

        let mut c = ApiClient::new("/api".to_string());
        c.set_token("t1".to_string());
        c.save_to_storage();

        let c2 = ApiClient::load_from_storage();
        assert!(c2.is_authenticated());
        assert_eq!(c2.token.as_deref(), Some("t1"));

        ApiClient::clear_storage();
        assert!(!ApiClient::load_from_storage().is_authenticated());
    }
}

// Only register the WASM start function for normal builds (not for tests),
// otherwise wasm-bindgen-test will end up with multiple entry symbols.
#[cfg_attr(all(target_arch = "wasm32", not(test)), wasm_bindgen(start))]
pub fn main() {
    console_error_panic_hook::set_once();
    mount_to_body(App);
}
