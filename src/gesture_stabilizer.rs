use tracing::debug;

use crate::config::StabilizerParams;
use crate::gesture_buffer::GestureHistory;
use crate::types::Gesture;

/// Estabilizador temporal con histéresis.
///
/// Convierte la clasificación cruda de cada frame en una salida estable:
/// confirmar un gesto exige mayoría sostenida en la ventana durante
/// `min_hold_frames` frames, y limpiarlo exige que el contador vuelva a 0 con
/// mayoría de frames sin gesto. El contador es un integrador con fuga: un frame
/// en desacuerdo lo reduce en 1, no lo reinicia.
///
/// Un estabilizador por mano; `update` se llama una vez por frame en orden de captura.
#[derive(Debug, Clone)]
pub struct GestureStabilizer {
    params: StabilizerParams,
    history: GestureHistory,
    hold_counter: u32,
    stable_gesture: Gesture,
}

impl GestureStabilizer {
    pub fn new(params: StabilizerParams) -> Self {
        Self {
            params,
            history: GestureHistory::new(params.history_size),
            hold_counter: 0,
            stable_gesture: Gesture::None,
        }
    }

    /// Procesa la clasificación cruda del frame actual y retorna el gesto estable
    pub fn update(&mut self, gesture: Gesture) -> Gesture {
        self.history.push(gesture);
        let gesture_count = self.history.count(gesture) as f32;

        if !gesture.is_none() && gesture_count > self.params.on_threshold() {
            self.hold_counter = self.hold_counter.saturating_add(1);
            if self.hold_counter >= self.params.min_hold_frames {
                self.set_stable(gesture);
            }
        } else {
            self.hold_counter = self.hold_counter.saturating_sub(1);
            if gesture.is_none() && self.hold_counter == 0 {
                let none_count = self.history.count(Gesture::None) as f32;
                if none_count > self.params.off_threshold() {
                    self.set_stable(Gesture::None);
                }
            }
        }

        self.stable_gesture
    }

    fn set_stable(&mut self, gesture: Gesture) {
        if self.stable_gesture != gesture {
            debug!(
                "Gesto estable: {} -> {} (hold={})",
                self.stable_gesture, gesture, self.hold_counter
            );
            self.stable_gesture = gesture;
        }
    }

    pub fn stable(&self) -> Gesture {
        self.stable_gesture
    }

    pub fn hold_counter(&self) -> u32 {
        self.hold_counter
    }

    /// Progreso hacia la confirmación, en [0, 1]
    pub fn hold_progress(&self) -> f32 {
        if self.params.min_hold_frames == 0 {
            return 1.0;
        }
        (self.hold_counter as f32 / self.params.min_hold_frames as f32).min(1.0)
    }

    pub fn history(&self) -> &GestureHistory {
        &self.history
    }

    pub fn params(&self) -> &StabilizerParams {
        &self.params
    }

    /// Vuelve al estado inicial: historial vacío, contador a 0, sin gesto
    pub fn reset(&mut self) {
        self.history.clear();
        self.hold_counter = 0;
        self.stable_gesture = Gesture::None;
    }
}

impl Default for GestureStabilizer {
    fn default() -> Self {
        Self::new(StabilizerParams::default())
    }
}
