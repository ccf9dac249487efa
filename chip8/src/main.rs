use clap::Parser;

mod audio;
mod config;
mod keymap;
mod run;

use config::{Args, Config};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("vm8=info,vm8_core=info,vm8_display=info"),
    )
    .init();

    let config = Config::from(Args::parse());
    run::run(config)
}
