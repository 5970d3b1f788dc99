use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use manoscopio::csv_loader::load_snapshots_from_csv;
use manoscopio::{Gesture, GestureConfig, GesturePipeline};

#[derive(Parser, Debug)]
#[command(name = "replay_csv", about = "Reproduce una grabación de landmarks a través del pipeline")]
struct ReplayOptions {
    /// Grabación CSV frame,joint,x,y,z
    csv_path: PathBuf,

    /// Configuración JSON de gestos
    #[arg(long)]
    config: Option<PathBuf>,

    /// Tabla por frame: cruda, estable, contador y progreso
    #[arg(long)]
    dump_frames: bool,

    /// Estado de cada dedo en los frames con mano
    #[arg(long)]
    dump_posture: bool,

    /// Solo muestra las transiciones que entran o salen de este gesto
    #[arg(long, value_parser = parse_gesture)]
    only: Option<Gesture>,
}

fn parse_gesture(label: &str) -> Result<Gesture, String> {
    Gesture::from_label(label)
        .ok_or_else(|| format!("gesto desconocido {:?} (none, finger_in_mouth, pointing)", label))
}

fn flag(value: bool) -> &'static str {
    if value {
        "sí"
    } else {
        "no"
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "manoscopio=warn".into()),
        )
        .init();

    let opts = ReplayOptions::parse();
    let csv_path = &opts.csv_path;
    println!("🎞️  Reproduciendo landmarks desde {:?}", csv_path);

    let config = match &opts.config {
        Some(path) => GestureConfig::from_file(path)
            .with_context(|| format!("No se pudo cargar la configuración {:?}", path))?,
        None => GestureConfig::default(),
    };

    let snapshots = load_snapshots_from_csv(csv_path)?;
    let hands = snapshots.iter().filter(|s| s.is_some()).count();
    println!(
        "ℹ️  {} frames ({} con mano, {} sin mano)\n",
        snapshots.len(),
        hands,
        snapshots.len() - hands
    );

    let mut pipeline = GesturePipeline::new(&config);
    let mut raw_counts: HashMap<Gesture, usize> = HashMap::new();
    let mut stable_counts: HashMap<Gesture, usize> = HashMap::new();

    if opts.dump_frames {
        println!(" frame  {:<16} {:<16} hold  progreso", "cruda", "estable");
    }

    for (frame_idx, snapshot) in snapshots.iter().enumerate() {
        let previous = pipeline.stabilizer().stable();
        let outcome = pipeline.process(snapshot.as_ref());
        *raw_counts.entry(outcome.raw).or_insert(0) += 1;
        *stable_counts.entry(outcome.stable).or_insert(0) += 1;

        if opts.dump_frames {
            println!(
                " {:>5}  {:<16} {:<16} {:>4}  {:>5.0}%",
                frame_idx,
                outcome.raw.as_str(),
                outcome.stable.as_str(),
                pipeline.stabilizer().hold_counter(),
                outcome.hold_progress * 100.0
            );
        } else if outcome.changed {
            let shown = opts
                .only
                .map_or(true, |g| g == previous || g == outcome.stable);
            if shown {
                println!("🎯 frame {:>5}: {} -> {}", frame_idx, previous, outcome.stable);
            }
        }

        if opts.dump_posture {
            if let Some(snap) = snapshot {
                let posture = pipeline.classifier().posture(snap);
                println!(
                    "        índice ext={} medio dob={} anular dob={} meñique dob={} zona={}",
                    flag(posture.index_extended),
                    flag(posture.middle_curled),
                    flag(posture.ring_curled),
                    flag(posture.pinky_curled),
                    flag(pipeline.classifier().is_finger_in_mouth(snap)),
                );
            }
        }
    }

    println!("\n📊 Resumen (frames):");
    println!("  {:<16} {:>8} {:>8}", "gesto", "cruda", "estable");
    for gesture in Gesture::ALL {
        println!(
            "  {:<16} {:>8} {:>8}",
            gesture.as_str(),
            raw_counts.get(&gesture).copied().unwrap_or(0),
            stable_counts.get(&gesture).copied().unwrap_or(0)
        );
    }
    println!("\n🥇 Gesto estable final: {}", pipeline.stabilizer().stable());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_options() {
        let opts = ReplayOptions::try_parse_from([
            "replay_csv",
            "--dump-frames",
            "--only",
            "finger_in_mouth",
            "sesion.csv",
        ])
        .unwrap();
        assert_eq!(opts.csv_path, PathBuf::from("sesion.csv"));
        assert!(opts.dump_frames && !opts.dump_posture);
        assert_eq!(opts.only, Some(Gesture::FingerInMouth));
    }

    #[test]
    fn test_unknown_gesture_rejected() {
        assert!(ReplayOptions::try_parse_from(["replay_csv", "--only", "thumbs_up", "a.csv"]).is_err());
        assert!(ReplayOptions::try_parse_from(["replay_csv"]).is_err());
    }
}
