use crate::pages::{FavoritesPage, FeedPage};
use crate::state::{AppContext, AppState};
use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes};
use leptos_router::hooks::use_location;
use leptos_router::path;

fn tab_class(current: &str, target: &str) -> &'static str {
    if current == target {
        "tab active"
    } else {
        "tab"
    }
}

// Split out so `use_location` runs under the <Router> context.
#[component]
fn HeaderTabs() -> impl IntoView {
    let pathname = use_location().pathname;

    view! {
        <header class="main-header">
            <nav class="tabs">
                <a class=move || tab_class(&pathname.get(), "/") href="/">"All cats"</a>
                <a class=move || tab_class(&pathname.get(), "/favorites") href="/favorites">
                    "Favorites"
                </a>
            </nav>
        </header>
    }
}

#[component]
pub fn App() -> impl IntoView {
    provide_context(AppContext(AppState::new()));

    // IMPORTANT:
    // - Leptos CSR requires the `csr` feature on `leptos`.
    // - router hooks require a <Router> context.
    view! {
        <Router>
            <HeaderTabs />
            <div class="container">
                <main>
                    <Routes fallback=|| view! { <div class="empty">"Not found"</div> }>
                        <Route path=path!("favorites") view=FavoritesPage />
                        <Route path=path!("") view=FeedPage />
                    </Routes>
                </main>
            </div>
        </Router>
    }
}
