#![cfg_attr(not(target_arch = "wasm32"), allow(dead_code, unused_imports))]

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    eprintln!("reelshelf-web must be built for wasm32-unknown-unknown");
}

// ---------------------------------------------------------------------------
// Web target (wasm32): everything below is only compiled for the browser.
// ---------------------------------------------------------------------------

#[cfg(target_arch = "wasm32")]
use anyhow::Result;
#[cfg(target_arch = "wasm32")]
use reelshelf::runtime::web::{self, logging};

#[cfg(target_arch = "wasm32")]
fn main() -> Result<()> {
    console_error_panic_hook::set_once();
    logging::init_logging("info")?;

    if let Err(err) = web::start() {
        tracing::error!(error = %err, "failed to start");
        return Err(err);
    }
    Ok(())
}
