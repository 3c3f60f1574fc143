//! Low-level server on port 3001

use zephyr_bench::{RouteTable, RAW_PORT};
use zephyr_core::{logging, ServerConfig};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn main() -> zephyr_core::Result<()> {
    logging::init();

    let table = RouteTable::standard()?;
    zephyr_core::run("Raw server", ServerConfig::new(RAW_PORT), table.into_service())
}
