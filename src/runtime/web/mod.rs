//! Browser runtime: the shelf mounted on the page's DOM with `localStorage`
//! persistence.

pub mod dom;
pub mod logging;
pub mod storage;

use crate::app_core::lists::Shelf;
use crate::app_core::render::Action;
use anyhow::{Context, Result};
use dom::{DomCallbacks, DomTarget};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use storage::LocalStorage;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;

pub type WebShelf = Shelf<LocalStorage, DomTarget>;

thread_local! {
    // The page owns the shelf for its whole lifetime; DOM callbacks hold weak refs.
    static SHELF: RefCell<Option<Rc<RefCell<WebShelf>>>> = const { RefCell::new(None) };
}

/// Milliseconds from `performance.now()`.
pub fn now_ms() -> u64 {
    web_sys::window()
        .and_then(|window| window.performance())
        .map(|performance| performance.now() as u64)
        .unwrap_or(0)
}

/// Loads both lists into the page and wires the buttons and the overlay.
pub fn start() -> Result<()> {
    let window = web_sys::window().context("no window")?;
    let document = window.document().context("no document")?;
    let storage = LocalStorage::from_window()?;

    let shelf = Rc::new_cyclic(|weak: &Weak<RefCell<WebShelf>>| {
        let on_action = {
            let weak = weak.clone();
            Rc::new(move |action: Action| {
                if let Some(shelf) = weak.upgrade() {
                    run_action(&shelf, action);
                }
            }) as Rc<dyn Fn(Action)>
        };
        let on_overlay_click = {
            let weak = weak.clone();
            Rc::new(move |inside_content: bool| {
                if let Some(shelf) = weak.upgrade() {
                    shelf.borrow_mut().click_modal(inside_content);
                }
            }) as Rc<dyn Fn(bool)>
        };
        let target = DomTarget::new(
            document,
            DomCallbacks {
                on_action,
                on_overlay_click,
            },
        );
        RefCell::new(Shelf::new(storage, target))
    });

    shelf.borrow_mut().load_page();
    SHELF.with(|slot| *slot.borrow_mut() = Some(shelf));
    tracing::info!("page ready");
    Ok(())
}

fn run_action(shelf: &Rc<RefCell<WebShelf>>, action: Action) {
    let (result, alert) = {
        let mut shelf = shelf.borrow_mut();
        let result = shelf.dispatch(action, now_ms());
        (result, shelf.take_alert())
    };
    if let Err(err) = result {
        tracing::error!(error = %err, "could not save list");
    }
    if let Some(message) = alert
        && let Some(window) = web_sys::window()
        && let Err(err) = window.alert_with_message(&message)
    {
        tracing::warn!(error = ?err, "alert failed");
    }
    schedule_dismiss(shelf);
}

/// Arms a timer for the notice's dismissal deadline. A timer that fires after
/// a newer notice moved the deadline re-arms itself instead.
fn schedule_dismiss(shelf: &Rc<RefCell<WebShelf>>) {
    let Some(delay) = shelf.borrow().notifier().time_to_dismiss(now_ms()) else {
        return;
    };
    let weak = Rc::downgrade(shelf);
    let callback = Closure::once_into_js(move || {
        if let Some(shelf) = weak.upgrade() {
            shelf.borrow_mut().tick(now_ms());
            schedule_dismiss(&shelf);
        }
    });
    let Some(window) = web_sys::window() else {
        return;
    };
    let delay = i32::try_from(delay).unwrap_or(i32::MAX);
    if let Err(err) = window.set_timeout_with_callback_and_timeout_and_arguments_0(
        callback.unchecked_ref::<js_sys::Function>(),
        delay,
    ) {
        tracing::warn!(error = ?err, "could not schedule notice dismissal");
    }
}
