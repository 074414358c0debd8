//! reelshelf library: the watchlist/Top 5 core shared by the terminal and
//! browser runtimes.

pub mod app_core;
pub mod model;
pub mod runtime;
pub mod store;

#[cfg(not(target_arch = "wasm32"))]
pub mod theme;
#[cfg(not(target_arch = "wasm32"))]
pub mod ui;
