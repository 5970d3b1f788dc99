/*
Reconocimiento de gestos de mano en tiempo real - Rust

Lee por stdin un frame por línea desde un detector de landmarks externo
(21 articulaciones, x,y[,z] normalizados, o "none" si no hay mano),
clasifica cada frame y muestra el gesto estable:
  - finger_in_mouth: punta del índice dentro de la zona de la boca
  - pointing: índice extendido, medio/anular/meñique doblados

Ejemplo:
  python detector.py | ./target/release/manoscopio --config gestos.json --record sesion.csv

Logs de diagnóstico con RUST_LOG=manoscopio=debug
*/

use anyhow::{Context, Result};
use clap::Parser;
use crossbeam_channel::{bounded, select, tick};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use manoscopio::csv_loader::save_snapshots_to_csv;
use manoscopio::landmark_stream::{start_stream_receiver, StreamFrame, StreamStats};
use manoscopio::{Gesture, GestureConfig, GesturePipeline};

const STATS_INTERVAL_SECS: u64 = 5;
const PROGRESS_BAR_WIDTH: usize = 20;

#[derive(Parser, Debug)]
#[command(name = "manoscopio", about = "Gestos de mano estables a partir de landmarks por stdin")]
struct Cli {
    /// Configuración JSON (detectionZone, historySize, minHoldFrames, ...)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Guarda los frames recibidos en un CSV frame,joint,x,y,z al terminar
    #[arg(long)]
    record: Option<PathBuf>,

    /// Imprime la configuración efectiva y termina
    #[arg(long)]
    print_config: bool,

    /// No mostrar los cambios de la clasificación cruda
    #[arg(long)]
    quiet: bool,
}

fn progress_bar(progress: f32) -> String {
    let filled = (progress.clamp(0.0, 1.0) * PROGRESS_BAR_WIDTH as f32).round() as usize;
    format!(
        "[{}{}]",
        "█".repeat(filled),
        "░".repeat(PROGRESS_BAR_WIDTH - filled)
    )
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "manoscopio=info".into()),
        )
        .init();

    let config = match &cli.config {
        Some(path) => GestureConfig::from_file(path)
            .with_context(|| format!("No se pudo cargar la configuración {:?}", path))?,
        None => GestureConfig::default(),
    };

    if cli.print_config {
        println!("{}", config.to_json_pretty()?);
        return Ok(());
    }

    println!("🎯 Gesture Recognition - Rust\n");
    let zone = config.classifier.detection_zone;
    println!(
        "🔧 Zona dedo-en-boca: x=({:.2}, {:.2}) y=({:.2}, {:.2})",
        zone.x1, zone.x2, zone.y1, zone.y2
    );
    println!(
        "🔧 Ventana: {} frames, confirmación: {} frames\n",
        config.stabilizer.history_size, config.stabilizer.min_hold_frames
    );

    // Canal para recibir frames del detector
    let (tx, rx) = bounded::<StreamFrame>(100);
    let stats = Arc::new(StreamStats::default());

    // Hilo lector de stdin en segundo plano
    let stats_clone = Arc::clone(&stats);
    let reader = std::thread::spawn(move || {
        let stdin = std::io::stdin();
        if let Err(e) = start_stream_receiver(stdin.lock(), tx, stats_clone) {
            eprintln!("❌ Error leyendo stdin: {}", e);
        }
    });

    let mut pipeline = GesturePipeline::new(&config);
    let mut recording: Vec<StreamFrame> = Vec::new();
    let mut stable_frames: HashMap<Gesture, u64> = HashMap::new();
    let mut last_raw = Gesture::None;
    let ticker = tick(Duration::from_secs(STATS_INTERVAL_SECS));

    println!("🎬 Esperando landmarks...\n");

    loop {
        select! {
            recv(rx) -> msg => {
                let Ok(frame) = msg else {
                    break;
                };

                let outcome = pipeline.process(frame.as_ref());
                *stable_frames.entry(outcome.stable).or_insert(0) += 1;

                if cli.record.is_some() {
                    recording.push(frame);
                }

                if !cli.quiet && outcome.raw != last_raw {
                    if outcome.raw.is_none() {
                        println!("   Sin gesto");
                    } else {
                        println!(
                            "   Detectado: {} {}",
                            outcome.raw,
                            progress_bar(outcome.hold_progress)
                        );
                    }
                }
                last_raw = outcome.raw;

                if outcome.changed {
                    match outcome.stable {
                        Gesture::None => println!("⏹️  Sin gesto estable (frame {})", pipeline.frames()),
                        stable => println!("🎯 Gesto estable: {} (frame {})", stable, pipeline.frames()),
                    }
                }
            }
            recv(ticker) -> _ => {
                info!(
                    "frames={} sin_mano={} descartados={} estable={}",
                    stats.frames(),
                    stats.absent(),
                    stats.malformed(),
                    pipeline.stabilizer().stable()
                );
            }
        }
    }

    if reader.join().is_err() {
        eprintln!("❌ El hilo lector terminó con pánico");
    }

    println!("\n📊 Frames procesados: {}", pipeline.frames());
    for gesture in Gesture::ALL {
        let count = stable_frames.get(&gesture).copied().unwrap_or(0);
        println!("  {:<16} {:>8}", gesture.as_str(), count);
    }
    if stats.malformed() > 0 {
        println!("⚠️  Líneas descartadas: {}", stats.malformed());
    }

    if let Some(path) = &cli.record {
        save_snapshots_to_csv(path, &recording)?;
        println!("💾 Grabación guardada en {:?}", path);
    }

    println!("\n👋 Saliendo...");
    Ok(())
}
