use crossbeam_channel::Sender;
use std::io::BufRead;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::types::{HandSnapshot, VALUES_PER_SNAPSHOT_3D};

/// Un frame recibido del detector externo: `None` si no se detectó mano
pub type StreamFrame = Option<HandSnapshot>;

#[derive(Error, Debug, PartialEq)]
pub enum StreamError {
    #[error("Invalid value count: expected 42 or 63, got {actual}")]
    WrongValueCount { actual: usize },

    #[error("Invalid number at position {index}: {token:?}")]
    InvalidNumber { index: usize, token: String },

    #[error("Non-finite value at position {index}")]
    NonFinite { index: usize },

    #[error("Line is not valid UTF-8")]
    InvalidUtf8,
}

/// Estadísticas de recepción del stream
#[derive(Debug, Default)]
pub struct StreamStats {
    frames: AtomicU64,
    absent: AtomicU64,
    malformed: AtomicU64,
}

impl StreamStats {
    pub fn frames(&self) -> u64 {
        self.frames.load(Ordering::Relaxed)
    }

    /// Frames sin mano, incluidos los descartados por mal formados
    pub fn absent(&self) -> u64 {
        self.absent.load(Ordering::Relaxed)
    }

    pub fn malformed(&self) -> u64 {
        self.malformed.load(Ordering::Relaxed)
    }
}

/// Parsea una línea del detector.
///
/// Formato: vacía, `none` o `-` → sin mano; si no, 42 (x, y) o 63 (x, y, z)
/// números separados por comas y/o espacios, en el orden de `HandJoint`.
/// x e y fuera de [0, 1] se recortan al rango.
pub fn parse_snapshot_line(line: &str) -> Result<StreamFrame, StreamError> {
    let line = line.trim();
    if line.is_empty() || line == "-" || line.eq_ignore_ascii_case("none") {
        return Ok(None);
    }

    let mut values = Vec::with_capacity(VALUES_PER_SNAPSHOT_3D);
    for (index, token) in line
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .enumerate()
    {
        let value: f32 = token.parse().map_err(|_| StreamError::InvalidNumber {
            index,
            token: token.to_string(),
        })?;
        if !value.is_finite() {
            return Err(StreamError::NonFinite { index });
        }
        values.push(value);
    }

    let mut snapshot = HandSnapshot::from_flat(&values).ok_or(StreamError::WrongValueCount {
        actual: values.len(),
    })?;

    for lm in snapshot.landmarks.iter_mut() {
        lm.x = lm.x.clamp(0.0, 1.0);
        lm.y = lm.y.clamp(0.0, 1.0);
    }

    Ok(Some(snapshot))
}

/// Lee líneas del detector y envía un frame por línea por el canal, en orden.
/// Una línea mal formada (incluida una que no es UTF-8) se registra y se envía como frame sin mano para no
/// alterar la cadencia de frames. Termina al llegar a EOF o si el receptor se cierra.
pub fn start_stream_receiver<R: BufRead>(
    mut reader: R,
    tx: Sender<StreamFrame>,
    stats: Arc<StreamStats>,
) -> std::io::Result<()> {
    info!("📡 Recibiendo landmarks");

    let mut buf = Vec::new();
    let mut line_no = 0usize;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        line_no += 1;

        let parsed = match std::str::from_utf8(&buf) {
            Ok(line) => parse_snapshot_line(line),
            Err(_) => Err(StreamError::InvalidUtf8),
        };
        let frame = match parsed {
            Ok(frame) => frame,
            Err(e) => {
                warn!("Línea {} descartada: {}", line_no, e);
                stats.malformed.fetch_add(1, Ordering::Relaxed);
                None
            }
        };

        stats.frames.fetch_add(1, Ordering::Relaxed);
        if frame.is_none() {
            stats.absent.fetch_add(1, Ordering::Relaxed);
        }

        if tx.send(frame).is_err() {
            info!("Receptor cerrado, deteniendo lectura");
            break;
        }
    }

    info!("Fin del stream de landmarks ({} frames)", stats.frames());
    Ok(())
}
