use crate::components::hooks::use_near_end;
use crate::favorites::LoadState;
use crate::models::Cat;
use crate::state::favorite_sync::FavoritesController;
use crate::state::AppContext;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// One card in either grid: the image plus its heart toggle. The heart
/// tracks the live favorite predicate, so an optimistic flip (and a revert
/// after a failed mutation) shows up without any page-level bookkeeping.
#[component]
fn CatCard(cat: Cat, favorites: FavoritesController) -> impl IntoView {
    let Cat { id, url } = cat;

    let favorited = {
        let favorites = favorites.clone();
        let id = id.clone();
        Signal::derive(move || favorites.is_favorited(&id))
    };

    let on_toggle = {
        let favorites = favorites.clone();
        let id = id.clone();
        move |_| favorites.toggle(&id)
    };

    view! {
        <div class="cat-card">
            <img src=url alt="cat" loading="lazy" />
            <button
                class=move || if favorited.get() { "favorite active" } else { "favorite" }
                aria-label=move || {
                    if favorited.get() { "Remove from favorites" } else { "Add to favorites" }
                }
                on:click=on_toggle
            >
                "\u{2665}"
            </button>
        </div>
    }
}

#[component]
fn ErrorBanner(#[prop(into)] message: Signal<Option<String>>) -> impl IntoView {
    view! {
        <Show when=move || message.get().is_some() fallback=|| ().into_view()>
            {move || message.get().map(|e| view! { <div class="error">{e}</div> })}
        </Show>
    }
}

/// Endless feed of all cats with per-card favorite toggles.
#[component]
pub fn FeedPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let feed = app_state.0.feed.clone();
    let favorites = app_state.0.favorites.clone();

    // Favorites first so hearts render correctly, then the first page.
    favorites.load_favorites();
    feed.load_next_page();

    let active = {
        let feed = feed.clone();
        Signal::derive(move || !feed.is_loading() && !feed.is_exhausted())
    };
    let exhausted = {
        let feed = feed.clone();
        Signal::derive(move || feed.is_exhausted())
    };

    let check_fill = use_near_end(active, exhausted, {
        let feed = feed.clone();
        move || feed.load_next_page()
    });

    // After every batch, keep fetching until the grid overflows the
    // viewport; 15 cards may not produce a scrollbar on a large screen.
    {
        let feed = feed.clone();
        Effect::new(move |_| {
            let _count = feed.items().len();
            check_fill();
        });
    }

    // The feed dies with the view; its in-flight responses are discarded.
    {
        let feed = feed.clone();
        on_cleanup(move || feed.reset());
    }

    let error = {
        let feed = feed.clone();
        let favorites = favorites.clone();
        Signal::derive(move || feed.last_error().or_else(|| favorites.last_error()))
    };

    let items = {
        let feed = feed.clone();
        move || feed.items()
    };
    let loading = {
        let feed = feed.clone();
        move || feed.is_loading()
    };
    let done = move || feed.is_exhausted();

    view! {
        <div class="cat-list">
            <For each=items key=|cat| cat.id.clone() children=move |cat: Cat| {
                view! { <CatCard cat favorites=favorites.clone() /> }
            } />
        </div>

        <ErrorBanner message=error />

        <Show when=loading fallback=|| ().into_view()>
            <div class="loading">"Loading more cats..."</div>
        </Show>

        <Show when=done fallback=|| ().into_view()>
            <div class="empty">"No more cats"</div>
        </Show>
    }
}

/// The user's favorited cats, resolved back to images through the source.
#[component]
pub fn FavoritesPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let favorites = app_state.0.favorites.clone();
    let source = app_state.0.source.clone();

    let cats: RwSignal<Vec<Cat>> = RwSignal::new(vec![]);
    let loading: RwSignal<bool> = RwSignal::new(true);
    let error: RwSignal<Option<String>> = RwSignal::new(None);

    // The view can unmount while the resolution chain is still running.
    let alive = StoredValue::new(true);
    on_cleanup(move || alive.set_value(false));

    {
        let favorites = favorites.clone();
        spawn_local(async move {
            let result = favorites.fetch_favorite_cats(&source).await;
            if !alive.get_value() {
                return;
            }
            match result {
                Ok(list) => cats.set(list),
                Err(e) => error.set(Some(e.to_string())),
            }
            loading.set(false);
        });
    }

    // Filtering by the live predicate makes removal optimistic here too:
    // the card vanishes on click and comes back if the delete fails.
    let visible = {
        let favorites = favorites.clone();
        move || {
            cats.get()
                .into_iter()
                .filter(|c| favorites.is_favorited(&c.id))
                .collect::<Vec<_>>()
        }
    };

    let empty = {
        let favorites = favorites.clone();
        let visible = visible.clone();
        move || {
            !loading.get()
                && visible().is_empty()
                && favorites.load_state() != LoadState::Unauthenticated
        }
    };

    view! {
        <Show when=move || loading.get() fallback=|| ().into_view()>
            <div class="loading">"Loading..."</div>
        </Show>

        <div class="cat-list">
            <For each=visible key=|cat| cat.id.clone() children=move |cat: Cat| {
                view! { <CatCard cat favorites=favorites.clone() /> }
            } />
        </div>

        <Show when=empty fallback=|| ().into_view()>
            <div class="empty">"No favorite cats yet"</div>
        </Show>

        <ErrorBanner message=error />
    }
}
