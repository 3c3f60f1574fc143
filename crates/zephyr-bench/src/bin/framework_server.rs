//! Framework server on port 3002

use zephyr_bench::{framework, FRAMEWORK};
use zephyr_core::{logging, ServerConfig};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn main() -> zephyr_core::Result<()> {
    logging::init();

    let app = framework::app(&FRAMEWORK)?;
    zephyr_core::run(FRAMEWORK.label, ServerConfig::new(FRAMEWORK.port), app.into_service())
}
