use crossbeam_channel::{bounded, unbounded, Receiver, RecvError, SendError, Sender};
use std::thread::JoinHandle;
use tracing::debug;

use crate::config::{GestureConfig, StabilizerParams};
use crate::gesture_classifier::GestureClassifier;
use crate::gesture_stabilizer::GestureStabilizer;
use crate::types::{Gesture, HandSnapshot};

/// Resultado de procesar un frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameOutcome {
    /// Clasificación cruda del frame
    pub raw: Gesture,
    /// Gesto estable tras el filtrado temporal
    pub stable: Gesture,
    /// Progreso del contador de confirmación en [0, 1]
    pub hold_progress: f32,
    /// El gesto estable cambió en este frame
    pub changed: bool,
}

/// Clasificador + estabilizador para una mano.
/// Un `process` por frame, en orden de captura.
#[derive(Debug, Clone)]
pub struct GesturePipeline {
    classifier: GestureClassifier,
    stabilizer: GestureStabilizer,
    frames: u64,
}

impl GesturePipeline {
    pub fn new(config: &GestureConfig) -> Self {
        Self {
            classifier: GestureClassifier::new(config.classifier),
            stabilizer: GestureStabilizer::new(config.stabilizer),
            frames: 0,
        }
    }

    pub fn process(&mut self, snapshot: Option<&HandSnapshot>) -> FrameOutcome {
        let previous = self.stabilizer.stable();
        let raw = self.classifier.classify(snapshot);
        let stable = self.stabilizer.update(raw);
        self.frames += 1;

        let changed = stable != previous;
        if changed {
            debug!("frame {}: {} -> {}", self.frames, previous, stable);
        }

        FrameOutcome {
            raw,
            stable,
            hold_progress: self.stabilizer.hold_progress(),
            changed,
        }
    }

    pub fn classifier(&self) -> &GestureClassifier {
        &self.classifier
    }

    pub fn stabilizer(&self) -> &GestureStabilizer {
        &self.stabilizer
    }

    /// Frames procesados desde la creación o el último reset
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn reset(&mut self) {
        self.stabilizer.reset();
        self.frames = 0;
    }
}

impl Default for GesturePipeline {
    fn default() -> Self {
        Self::new(&GestureConfig::default())
    }
}

/// Hilo dedicado que posee un estabilizador.
///
/// Para hosts que clasifican en otro hilo: las clasificaciones crudas entran por
/// una única cola y se aplican en el orden de envío. Cada entrada produce
/// exactamente una salida en `recv()`.
pub struct StabilizerWorker {
    tx: Option<Sender<Gesture>>,
    rx: Receiver<Gesture>,
    handle: Option<JoinHandle<GestureStabilizer>>,
}

impl StabilizerWorker {
    pub fn spawn(params: StabilizerParams) -> Self {
        let (tx_raw, rx_raw) = bounded::<Gesture>(100);
        let (tx_stable, rx_stable) = unbounded::<Gesture>();

        let handle = std::thread::spawn(move || {
            let mut stabilizer = GestureStabilizer::new(params);
            while let Ok(raw) = rx_raw.recv() {
                let stable = stabilizer.update(raw);
                if tx_stable.send(stable).is_err() {
                    break;
                }
            }
            stabilizer
        });

        Self {
            tx: Some(tx_raw),
            rx: rx_stable,
            handle: Some(handle),
        }
    }

    /// Envía la clasificación cruda de un frame (bloquea si la cola está llena)
    pub fn submit(&self, raw: Gesture) -> Result<(), SendError<Gesture>> {
        match &self.tx {
            Some(tx) => tx.send(raw),
            None => Err(SendError(raw)),
        }
    }

    /// Espera el gesto estable correspondiente al siguiente frame enviado
    pub fn recv(&self) -> Result<Gesture, RecvError> {
        self.rx.recv()
    }

    /// Cierra la cola, espera al hilo y devuelve el estabilizador final
    pub fn stop(mut self) -> Option<GestureStabilizer> {
        self.tx.take();
        self.handle.take().and_then(|h| h.join().ok())
    }
}

impl Drop for StabilizerWorker {
    fn drop(&mut self) {
        self.tx.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{HandJoint, Landmark, JOINT_COUNT};

    fn make_in_mouth() -> HandSnapshot {
        let mut snap = HandSnapshot::new([Landmark::xy(0.1, 0.8); JOINT_COUNT]);
        snap.landmarks[HandJoint::IndexPip.index()] = Landmark::xy(0.5, 0.4);
        snap.landmarks[HandJoint::IndexTip.index()] = Landmark::xy(0.5, 0.3);
        snap
    }

    #[test]
    fn test_pipeline_confirms_and_clears() {
        let mut pipeline = GesturePipeline::default();
        let snap = make_in_mouth();

        let outcomes: Vec<FrameOutcome> = (0..14).map(|_| pipeline.process(Some(&snap))).collect();
        assert!(outcomes.iter().all(|o| o.raw == Gesture::FingerInMouth));
        assert_eq!(outcomes[13].stable, Gesture::FingerInMouth);
        assert!(outcomes[13].changed);
        assert_eq!(outcomes.iter().filter(|o| o.changed).count(), 1);
        assert_eq!(outcomes[13].hold_progress, 1.0);

        let outcomes: Vec<FrameOutcome> = (0..10).map(|_| pipeline.process(None)).collect();
        assert!(outcomes.iter().all(|o| o.raw == Gesture::None));
        assert_eq!(outcomes[9].stable, Gesture::None);
        assert!(outcomes[9].changed);
        assert_eq!(pipeline.frames(), 24);
    }

    #[test]
    fn test_pipeline_reset() {
        let mut pipeline = GesturePipeline::default();
        let snap = make_in_mouth();
        for _ in 0..20 {
            pipeline.process(Some(&snap));
        }
        pipeline.reset();
        assert_eq!(pipeline.frames(), 0);
        assert_eq!(pipeline.stabilizer().stable(), Gesture::None);
    }

    #[test]
    fn test_worker_matches_inline_stabilizer() {
        let sequence: Vec<Gesture> = (0..40)
            .map(|i| match i % 13 {
                0 => Gesture::None,
                1..=8 => Gesture::Pointing,
                _ => Gesture::FingerInMouth,
            })
            .collect();

        let mut inline = GestureStabilizer::default();
        let expected: Vec<Gesture> = sequence.iter().map(|g| inline.update(*g)).collect();

        let worker = StabilizerWorker::spawn(StabilizerParams::default());
        let mut received = Vec::new();
        for g in &sequence {
            worker.submit(*g).unwrap();
            received.push(worker.recv().unwrap());
        }
        assert_eq!(received, expected);

        let final_state = worker.stop().unwrap();
        assert_eq!(final_state.stable(), inline.stable());
        assert_eq!(final_state.hold_counter(), inline.hold_counter());
    }
}
