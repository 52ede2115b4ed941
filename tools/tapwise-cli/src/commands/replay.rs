//! Replay a touch script through the classifier.

use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::Ordering;

use tapwise_classifier::Thresholds;
use tapwise_common::config::AppConfig;
use tapwise_gesture_model::gesture::{GestureRecord, GestureStreamHeader};
use tapwise_gesture_model::touch::{validate_script, TouchScript};
use tapwise_replay::{
    settings_for_script, GestureWriter, LiveSession, ReplayOptions, ReplaySession, ScriptSource,
};

pub async fn run(
    config: &AppConfig,
    script_path: PathBuf,
    output: Option<PathBuf>,
    live: bool,
    settle: Option<f64>,
) -> anyhow::Result<()> {
    let script = tapwise_replay::load_script(&script_path)
        .map_err(|e| anyhow::anyhow!("Failed to load script: {e}"))?;

    for issue in validate_script(&script) {
        tracing::warn!(%issue, "Touch script violates the host contract");
    }

    let source_name = script_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "script".to_string());

    if live {
        return run_live(config, script, source_name, output, settle).await;
    }

    let options = ReplayOptions {
        settle_secs: settle,
    };
    let (records, summary) = ReplaySession::run(&config.gestures, &script, &options)?;

    match output {
        Some(path) => {
            let header = GestureStreamHeader::new(source_name);
            let mut writer = GestureWriter::create(&path, &header)?;
            writer.write_all(&records)?;
            writer.flush()?;
            println!("Replayed {} batches from {}", summary.batches, script_path.display());
            println!("  Gestures: {}", summary.gestures);
            println!("  Timers fired: {}", summary.timers_fired);
            println!("  End time: {:.3}s", summary.end_time);
            println!("Gestures written to: {}", path.display());
        }
        None => {
            print_records(&records)?;
            eprintln!(
                "{} gestures from {} batches ({} timers fired)",
                summary.gestures, summary.batches, summary.timers_fired
            );
        }
    }

    Ok(())
}

async fn run_live(
    config: &AppConfig,
    script: TouchScript,
    source_name: String,
    output: Option<PathBuf>,
    settle: Option<f64>,
) -> anyhow::Result<()> {
    let settings = settings_for_script(&config.gestures, script.header.as_ref());
    let thresholds = Thresholds::from_settings(&settings)?;

    let writer = match &output {
        Some(path) => Some(GestureWriter::create(
            path,
            &GestureStreamHeader::new(source_name.clone()),
        )?),
        None => None,
    };

    let source = ScriptSource::new(source_name, script);
    let mut session = LiveSession::new(Box::new(source), thresholds, writer);
    if let Some(secs) = settle {
        session = session.with_settle(secs);
    }

    let stop_flag = session.stop_flag();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            stop_flag.store(true, Ordering::SeqCst);
        }
    });

    eprintln!("Replaying in real time. Press Ctrl+C to stop...");
    let emitted = session.run().await?;

    match output {
        Some(path) => println!("{emitted} gestures written to: {}", path.display()),
        None => print_records(session.records())?,
    }
    Ok(())
}

fn print_records(records: &[GestureRecord]) -> anyhow::Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for record in records {
        writeln!(out, "{}", serde_json::to_string(record)?)?;
    }
    out.flush()?;
    Ok(())
}
