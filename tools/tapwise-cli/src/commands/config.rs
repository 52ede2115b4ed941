//! Show or initialize the configuration file.

use std::path::PathBuf;

use tapwise_classifier::Thresholds;
use tapwise_common::config::{config_file_path, AppConfig};

pub fn run(config: &AppConfig, path: Option<PathBuf>, init: bool) -> anyhow::Result<()> {
    let path = path.unwrap_or_else(config_file_path);

    if init {
        if path.exists() {
            anyhow::bail!("Config already exists at {}", path.display());
        }
        AppConfig::default().save_to(&path)?;
        println!("Wrote default configuration to {}", path.display());
        return Ok(());
    }

    println!("Config file: {}", path.display());
    if !path.exists() {
        println!("  (not present, using defaults)");
    }
    println!("{}", serde_json::to_string_pretty(config)?);

    let thresholds = Thresholds::from_settings(&config.gestures)?;
    println!("\nEffective thresholds:");
    println!("  Movement: {:.2}", thresholds.movement);
    println!("  Double-tap window: {:.3}s", thresholds.double_tap_window);
    println!("  Double-tap distance: {:.2}", thresholds.double_tap_distance);
    println!("  Hold trigger: {:.3}s", thresholds.hold_trigger);
    println!("  Hold poll interval: {:.3}s", thresholds.hold_poll_interval);
    println!("  Flick boundary: {:.3}s", thresholds.flick_boundary);
    println!("  Multitap: {}", thresholds.multitap);
    println!("  Pinch: {}", thresholds.pinch);

    Ok(())
}
