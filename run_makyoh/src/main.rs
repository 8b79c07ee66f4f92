use anyhow::Result;
use clap::Parser;
use makyoh_assets::FsAssets;
use makyoh_panel::ControlPanel;

use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

mod command;

use command::{execute, Command, Flow};

/// Can be baked in at build time with the `MAKYOH_CONFIG_FILE` environment variable.
const DEFAULT_CONFIG_FILE: &str = match option_env!("MAKYOH_CONFIG_FILE") {
    Some(path) => path,
    None => "makyoh_config.json",
};

/// Headless control surface of the magic mirror simulation.
///
/// Reads commands from standard input, one per line. Type `help` for a list.
#[derive(Parser, Debug)]
#[command(name = "makyoh", version)]
struct Args {
    /// Configuration file, created with the default values if it can't be loaded.
    #[arg(default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let config = makyoh_json::load_or_create(&args.config);
    let mut panel = ControlPanel::new(config, FsAssets);

    log::info!(
        "{} mirror samples, drawing the {}",
        panel.mirror_sample_count(),
        panel.draw_mode()
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();

    for line in io::stdin().lock().lines() {
        let line = line?;

        match Command::parse(&line) {
            Ok(None) => continue,
            Ok(Some(command)) => {
                if let Flow::Quit = execute(&mut panel, command, &mut out)? {
                    break;
                }
            }
            Err(e) => writeln!(out, "error: {e:#}")?,
        }

        out.flush()?;
    }

    Ok(())
}
