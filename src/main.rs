mod app;
mod config;
mod renderer;
mod sensor;

use clap::Parser;

use crate::{
    app::{AppInit, TiltApp},
    config::Config,
    sensor::SerialTransport,
};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::parse();

    // The only fatal error: without the sensor there is nothing to show, so
    // the window never opens.
    let transport = SerialTransport::open(&config.port, config.baud)?;

    lib_app::run_app::<TiltApp>(AppInit { transport, config })?;

    Ok(())
}
