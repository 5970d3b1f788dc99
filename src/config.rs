use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::types::{
    DetectionZone, DEFAULT_CURL_MARGIN, DEFAULT_HISTORY_SIZE, DEFAULT_MIN_HOLD_FRAMES,
    DEFAULT_OFF_AGREEMENT_FRACTION, DEFAULT_ON_AGREEMENT_FRACTION,
};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid detection zone {zone:?}: expected 0 <= x1 < x2 <= 1 and 0 <= y1 < y2 <= 1")]
    InvalidZone { zone: DetectionZone },

    #[error("Invalid history size: must be at least 1")]
    InvalidHistorySize,

    #[error("Invalid {name}: {value} is outside [0, 1]")]
    InvalidFraction { name: &'static str, value: f32 },

    #[error("Invalid curl margin: {0} (must be finite and >= 0)")]
    InvalidMargin(f32),
}

/// Parámetros del clasificador geométrico
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClassifierParams {
    /// Rectángulo donde la punta del índice cuenta como "dedo en la boca"
    pub detection_zone: DetectionZone,
    /// Tolerancia en y para considerar doblados medio, anular y meñique
    pub curl_margin: f32,
}

impl Default for ClassifierParams {
    fn default() -> Self {
        Self {
            detection_zone: DetectionZone::default(),
            curl_margin: DEFAULT_CURL_MARGIN,
        }
    }
}

/// Parámetros del estabilizador temporal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StabilizerParams {
    /// Frames recientes que guarda la ventana de historial
    pub history_size: usize,
    /// Fracción de la ventana que debe coincidir para sumar al contador
    pub on_agreement_fraction: f32,
    /// Fracción de la ventana sin gesto necesaria para limpiar la salida
    pub off_agreement_fraction: f32,
    /// Frames de acuerdo sostenido antes de confirmar un gesto
    pub min_hold_frames: u32,
}

impl StabilizerParams {
    /// Coincidencias que hay que superar en la ventana para sumar al contador
    pub fn on_threshold(&self) -> f32 {
        self.history_size as f32 * self.on_agreement_fraction
    }

    /// Frames sin gesto que hay que superar en la ventana para limpiar
    pub fn off_threshold(&self) -> f32 {
        self.history_size as f32 * self.off_agreement_fraction
    }
}

impl Default for StabilizerParams {
    fn default() -> Self {
        Self {
            history_size: DEFAULT_HISTORY_SIZE,
            on_agreement_fraction: DEFAULT_ON_AGREEMENT_FRACTION,
            off_agreement_fraction: DEFAULT_OFF_AGREEMENT_FRACTION,
            min_hold_frames: DEFAULT_MIN_HOLD_FRAMES,
        }
    }
}

/// Configuración completa. En JSON todos los campos van en un mismo objeto
/// y cualquiera puede omitirse:
///
/// ```json
/// { "detectionZone": { "x1": 0.35, "y1": 0.15, "x2": 0.65, "y2": 0.5 },
///   "historySize": 8, "minHoldFrames": 10 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GestureConfig {
    #[serde(flatten)]
    pub classifier: ClassifierParams,
    #[serde(flatten)]
    pub stabilizer: StabilizerParams,
}

impl GestureConfig {
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: GestureConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let zone = self.classifier.detection_zone;
        if !zone.is_well_formed() {
            return Err(ConfigError::InvalidZone { zone });
        }

        let margin = self.classifier.curl_margin;
        if !margin.is_finite() || margin < 0.0 {
            return Err(ConfigError::InvalidMargin(margin));
        }

        if self.stabilizer.history_size == 0 {
            return Err(ConfigError::InvalidHistorySize);
        }

        let fractions = [
            ("onAgreementFraction", self.stabilizer.on_agreement_fraction),
            ("offAgreementFraction", self.stabilizer.off_agreement_fraction),
        ];
        for (name, value) in fractions {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidFraction { name, value });
            }
        }

        Ok(())
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
