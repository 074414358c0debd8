//! Shared application core: list operations, rendering, notices and the
//! terminal UI's state and reducer.

pub mod form;
pub mod input;
pub mod lists;
pub mod notifier;
pub mod render;

#[cfg(not(target_arch = "wasm32"))]
pub mod reducer;
#[cfg(not(target_arch = "wasm32"))]
pub mod state;
