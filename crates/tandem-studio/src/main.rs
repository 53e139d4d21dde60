//! Tandem studio: runs one of the demo simulations in a window.

mod demos;
mod options;
mod studio;

use anyhow::Result;
use clap::Parser;
use tandem_engine::device::GpuInit;
use tandem_engine::logging::{init_logging, LoggingConfig};
use tandem_engine::window::{Runtime, RuntimeConfig};

use options::Options;
use studio::Studio;

fn main() -> Result<()> {
    let options = Options::parse();
    init_logging(LoggingConfig::default());

    let config = RuntimeConfig {
        title: format!("tandem studio: {}", options.demo.name()),
        ..RuntimeConfig::default()
    };

    Runtime::run(config, GpuInit::default(), Studio::new(options))
}
