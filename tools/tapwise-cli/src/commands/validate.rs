//! Validate a touch script.

use std::path::PathBuf;

use tapwise_gesture_model::touch::validate_script;

pub fn run(path: PathBuf) -> anyhow::Result<()> {
    println!("Validating touch script: {}", path.display());

    let script = tapwise_replay::load_script(&path)
        .map_err(|e| anyhow::anyhow!("Failed to load script: {e}"))?;

    match &script.header {
        Some(header) => {
            println!("  Schema: {}", header.schema_version);
            if let (Some(w), Some(h)) = (header.display_width, header.display_height) {
                println!("  Display: {w}x{h}");
            }
        }
        None => println!("  Header: none"),
    }
    println!("  Batches: {}", script.batches.len());
    println!("  Samples: {}", script.sample_count());
    println!("  Duration: {:.3}s", script.duration_secs());

    let issues = validate_script(&script);
    if issues.is_empty() {
        println!("\nScript is valid.");
        return Ok(());
    }

    println!("\nValidation issues:");
    for issue in &issues {
        println!("  - {issue}");
    }
    anyhow::bail!("{} issue(s) found", issues.len())
}
