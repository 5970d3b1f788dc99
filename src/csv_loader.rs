use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{anyhow, bail, ensure, Context, Result};
use csv::{ReaderBuilder, WriterBuilder};
use tracing::warn;

use crate::types::{HandJoint, HandSnapshot, Landmark, JOINT_COUNT};

const CSV_HEADER: [&str; 5] = ["frame", "joint", "x", "y", "z"];

/// Índice de frame máximo aceptado (unas 9 horas a 30 fps)
pub const MAX_FRAME_INDEX: usize = 1_000_000;

/// Carga una grabación de landmarks desde un CSV en el formato
/// frame,joint,x,y,z ordenado por frame y articulación (z es opcional).
///
/// Los frames sin filas (entre 0 y el último frame) se devuelven como `None`
/// (sin mano). Un frame presente debe traer las 21 articulaciones.
pub fn load_snapshots_from_csv(path: impl AsRef<Path>) -> Result<Vec<Option<HandSnapshot>>> {
    let path = path.as_ref();
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("No se pudo abrir el CSV {:?}", path))?;

    let mut frames: BTreeMap<usize, [Option<Landmark>; JOINT_COUNT]> = BTreeMap::new();

    for (row_idx, result) in reader.records().enumerate() {
        let row = row_idx + 1;
        let record = result.with_context(|| format!("Fila {} inválida en {:?}", row, path))?;
        if record.len() < 4 {
            bail!("La fila {} no tiene al menos 4 columnas", row);
        }

        let frame: usize = record[0]
            .parse()
            .with_context(|| format!("frame inválido en fila {}", row))?;
        ensure!(
            frame <= MAX_FRAME_INDEX,
            "frame {} fuera de rango en fila {} (máximo {})",
            frame,
            row,
            MAX_FRAME_INDEX
        );
        let joint: usize = record[1]
            .parse()
            .with_context(|| format!("joint inválido en fila {}", row))?;

        if HandJoint::from_index(joint).is_none() {
            bail!("Articulación {} fuera de rango (fila {})", joint, row);
        }

        let x: f32 = record[2]
            .parse()
            .with_context(|| format!("x inválido en fila {}", row))?;
        let y: f32 = record[3]
            .parse()
            .with_context(|| format!("y inválido en fila {}", row))?;
        let z: f32 = match record.get(4) {
            Some(v) if !v.is_empty() => v
                .parse()
                .with_context(|| format!("z inválido en fila {}", row))?,
            _ => 0.0,
        };
        ensure!(
            x.is_finite() && y.is_finite() && z.is_finite(),
            "Coordenada no finita en fila {}",
            row
        );

        let slots = frames.entry(frame).or_insert([None; JOINT_COUNT]);
        ensure!(
            slots[joint].is_none(),
            "Articulación {} repetida en frame {} (fila {})",
            joint,
            frame,
            row
        );
        slots[joint] = Some(Landmark::new(x, y, z));
    }

    let Some(&last_frame) = frames.keys().next_back() else {
        bail!("El CSV {:?} no contiene datos", path);
    };

    let mut snapshots = Vec::with_capacity(last_frame + 1);
    for frame_idx in 0..=last_frame {
        match frames.get(&frame_idx) {
            Some(slots) => {
                let mut landmarks = [Landmark::default(); JOINT_COUNT];
                for (joint, slot) in slots.iter().enumerate() {
                    let Some(lm) = slot else {
                        bail!(
                            "Frame {} incompleto: falta la articulación {} ({})",
                            frame_idx,
                            joint,
                            HandJoint::ALL[joint].as_str()
                        );
                    };
                    landmarks[joint] = *lm;
                }
                snapshots.push(Some(HandSnapshot::new(landmarks)));
            }
            // Sin filas para este frame: no se detectó mano
            None => snapshots.push(None),
        }
    }

    Ok(snapshots)
}

/// Exporta una secuencia al mismo formato que lee `load_snapshots_from_csv`
pub fn snapshots_to_csv(snapshots: &[Option<HandSnapshot>]) -> Result<String> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;

    for (frame_idx, snapshot) in snapshots.iter().enumerate() {
        let Some(snapshot) = snapshot else {
            continue;
        };
        for (joint, lm) in snapshot.landmarks.iter().enumerate() {
            writer.write_record(&[
                frame_idx.to_string(),
                joint.to_string(),
                lm.x.to_string(),
                lm.y.to_string(),
                lm.z.to_string(),
            ])?;
        }
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow!("No se pudo finalizar el CSV: {}", e.error()))?;
    Ok(String::from_utf8(bytes)?)
}

/// Guarda una grabación en disco.
/// Los frames finales sin mano no tienen filas y no se conservan al recargar.
pub fn save_snapshots_to_csv(
    path: impl AsRef<Path>,
    snapshots: &[Option<HandSnapshot>],
) -> Result<()> {
    let path = path.as_ref();
    let trailing_absent = snapshots.iter().rev().take_while(|s| s.is_none()).count();
    if trailing_absent > 0 {
        warn!(
            "{} frames finales sin mano no quedan representados en {:?}",
            trailing_absent, path
        );
    }

    let content = snapshots_to_csv(snapshots)?;
    fs::write(path, content).with_context(|| format!("No se pudo escribir {:?}", path))?;
    Ok(())
}
