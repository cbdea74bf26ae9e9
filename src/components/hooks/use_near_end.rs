use leptos::ev;
use leptos::prelude::*;
use leptos_dom::helpers::{window_event_listener, WindowListenerHandle};

/// Unscrolled distance (px) below the viewport at which the next page is
/// requested.
const NEAR_END_PX: f64 = 200.0;

/// Slack (px) when deciding whether the loaded content fills the viewport.
const FILL_SLACK_PX: f64 = 20.0;

fn scroll_metrics() -> Option<(f64, f64, f64)> {
    let win = web_sys::window()?;
    let doc_el = win.document()?.document_element()?;
    let scroll_y = win.scroll_y().ok()?;
    let viewport = win.inner_height().ok()?.as_f64()?;
    let doc_height = f64::from(doc_el.scroll_height());
    Some((scroll_y, viewport, doc_height))
}

fn near_end() -> bool {
    scroll_metrics()
        .map(|(y, vh, dh)| dh - (y + vh) < NEAR_END_PX)
        .unwrap_or(false)
}

fn fills_viewport() -> bool {
    scroll_metrics()
        .map(|(_, vh, dh)| dh > vh + FILL_SLACK_PX)
        .unwrap_or(true)
}

/// Window-level "near end of content" observer.
///
/// Calls `on_near_end` when the remaining unscrolled distance drops under
/// the threshold (scroll), or when the viewport grows past the loaded
/// content (resize). `active` short-circuits both while a page is already
/// loading or the feed is exhausted; the accumulator has its own guard,
/// this merely skips pointless handler work.
///
/// The listener handles are released when the owner is disposed (view
/// unmount) and as soon as `exhausted` turns true; a window listener that
/// outlives the list would leak.
///
/// Returns a backfill check for the caller to run after each batch lands:
/// it keeps requesting pages while the content does not overflow the
/// viewport, since a short first page on a large screen never produces a
/// scroll event.
pub(crate) fn use_near_end(
    active: Signal<bool>,
    exhausted: Signal<bool>,
    on_near_end: impl Fn() + Clone + 'static,
) -> impl Fn() + Clone {
    let scroll_handle: StoredValue<Option<WindowListenerHandle>> = StoredValue::new(None);
    let resize_handle: StoredValue<Option<WindowListenerHandle>> = StoredValue::new(None);

    let cb = on_near_end.clone();
    scroll_handle.set_value(Some(window_event_listener(ev::scroll, move |_ev| {
        if active.get_untracked() && near_end() {
            cb();
        }
    })));

    let cb = on_near_end.clone();
    resize_handle.set_value(Some(window_event_listener(ev::resize, move |_ev| {
        if active.get_untracked() && !fills_viewport() {
            cb();
        }
    })));

    // Captures only `StoredValue`s, so the closure is `Copy` and can back
    // both the exhaustion effect and the unmount cleanup.
    let release = move || {
        if let Some(handle) = scroll_handle.try_update_value(|h| h.take()).flatten() {
            handle.remove();
        }
        if let Some(handle) = resize_handle.try_update_value(|h| h.take()).flatten() {
            handle.remove();
        }
    };

    Effect::new(move |_| {
        if exhausted.get() {
            release();
        }
    });

    on_cleanup(move || release());

    let cb = on_near_end;
    move || {
        if active.get_untracked() && !fills_viewport() {
            cb();
        }
    }
}
