//! Framework server with method-aware fallback on port 3004

use zephyr_bench::{framework, STRICT};
use zephyr_core::{logging, ServerConfig};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn main() -> zephyr_core::Result<()> {
    logging::init();

    let app = framework::app(&STRICT)?;
    zephyr_core::run(STRICT.label, ServerConfig::new(STRICT.port), app.into_service())
}
