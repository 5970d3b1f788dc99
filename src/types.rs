use serde::{Deserialize, Serialize};

/// Número de articulaciones que entrega el detector de mano (orden MediaPipe)
pub const JOINT_COUNT: usize = 21;

/// Valores por línea cuando el detector entrega solo (x, y)
pub const VALUES_PER_SNAPSHOT_2D: usize = JOINT_COUNT * 2; // 42
/// Valores por línea cuando el detector entrega (x, y, z)
pub const VALUES_PER_SNAPSHOT_3D: usize = JOINT_COUNT * 3; // 63

/// Zona "boca" por defecto (normalizada, y crece hacia abajo)
pub const DEFAULT_ZONE_X1: f32 = 0.35;
pub const DEFAULT_ZONE_Y1: f32 = 0.15;
pub const DEFAULT_ZONE_X2: f32 = 0.65;
pub const DEFAULT_ZONE_Y2: f32 = 0.5;

/// Margen para considerar un dedo "doblado"
pub const DEFAULT_CURL_MARGIN: f32 = 0.05;

/// Parámetros del estabilizador temporal
pub const DEFAULT_HISTORY_SIZE: usize = 8;
pub const DEFAULT_ON_AGREEMENT_FRACTION: f32 = 0.6;
pub const DEFAULT_OFF_AGREEMENT_FRACTION: f32 = 0.7;
pub const DEFAULT_MIN_HOLD_FRAMES: u32 = 10;

/// Las 21 articulaciones de la mano, en el orden del detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandJoint {
    Wrist,
    ThumbCmc,
    ThumbMcp,
    ThumbIp,
    ThumbTip,
    IndexMcp,
    IndexPip,
    IndexDip,
    IndexTip,
    MiddleMcp,
    MiddlePip,
    MiddleDip,
    MiddleTip,
    RingMcp,
    RingPip,
    RingDip,
    RingTip,
    PinkyMcp,
    PinkyPip,
    PinkyDip,
    PinkyTip,
}

impl HandJoint {
    pub const ALL: [HandJoint; JOINT_COUNT] = [
        Self::Wrist,
        Self::ThumbCmc,
        Self::ThumbMcp,
        Self::ThumbIp,
        Self::ThumbTip,
        Self::IndexMcp,
        Self::IndexPip,
        Self::IndexDip,
        Self::IndexTip,
        Self::MiddleMcp,
        Self::MiddlePip,
        Self::MiddleDip,
        Self::MiddleTip,
        Self::RingMcp,
        Self::RingPip,
        Self::RingDip,
        Self::RingTip,
        Self::PinkyMcp,
        Self::PinkyPip,
        Self::PinkyDip,
        Self::PinkyTip,
    ];

    /// Índice de la articulación en el snapshot (0-20)
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn from_index(idx: usize) -> Option<Self> {
        Self::ALL.get(idx).copied()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wrist => "wrist",
            Self::ThumbCmc => "thumb_cmc",
            Self::ThumbMcp => "thumb_mcp",
            Self::ThumbIp => "thumb_ip",
            Self::ThumbTip => "thumb_tip",
            Self::IndexMcp => "index_finger_mcp",
            Self::IndexPip => "index_finger_pip",
            Self::IndexDip => "index_finger_dip",
            Self::IndexTip => "index_finger_tip",
            Self::MiddleMcp => "middle_finger_mcp",
            Self::MiddlePip => "middle_finger_pip",
            Self::MiddleDip => "middle_finger_dip",
            Self::MiddleTip => "middle_finger_tip",
            Self::RingMcp => "ring_finger_mcp",
            Self::RingPip => "ring_finger_pip",
            Self::RingDip => "ring_finger_dip",
            Self::RingTip => "ring_finger_tip",
            Self::PinkyMcp => "pinky_mcp",
            Self::PinkyPip => "pinky_pip",
            Self::PinkyDip => "pinky_dip",
            Self::PinkyTip => "pinky_tip",
        }
    }
}

/// Punto normalizado de una articulación: x, y ∈ [0, 1] respecto al frame
/// (origen arriba a la izquierda). `z` es la profundidad relativa, 0.0 si el
/// detector no la entrega.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn xy(x: f32, y: f32) -> Self {
        Self { x, y, z: 0.0 }
    }
}

/// Observación completa de una mano en un frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandSnapshot {
    pub landmarks: [Landmark; JOINT_COUNT],
}

impl HandSnapshot {
    pub fn new(landmarks: [Landmark; JOINT_COUNT]) -> Self {
        Self { landmarks }
    }

    pub fn joint(&self, joint: HandJoint) -> Landmark {
        self.landmarks[joint.index()]
    }

    /// Crea un snapshot desde un arreglo plano de 42 (x, y) o 63 (x, y, z) valores.
    /// Retorna None si el tamaño no corresponde.
    pub fn from_flat(values: &[f32]) -> Option<Self> {
        let stride = match values.len() {
            VALUES_PER_SNAPSHOT_2D => 2,
            VALUES_PER_SNAPSHOT_3D => 3,
            _ => return None,
        };

        let mut landmarks = [Landmark::default(); JOINT_COUNT];
        for (i, chunk) in values.chunks_exact(stride).enumerate() {
            landmarks[i] = Landmark {
                x: chunk[0],
                y: chunk[1],
                z: if stride == 3 { chunk[2] } else { 0.0 },
            };
        }
        Some(Self { landmarks })
    }

    /// Convierte a formato plano [joint * 3 + canal] con canales x, y, z
    pub fn to_flat(&self) -> Vec<f32> {
        self.landmarks
            .iter()
            .flat_map(|lm| [lm.x, lm.y, lm.z])
            .collect()
    }
}

/// Gesto reconocido en un frame. Conjunto cerrado.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Gesture {
    #[default]
    None,
    FingerInMouth,
    Pointing,
}

impl Gesture {
    pub const ALL: [Gesture; 3] = [Self::None, Self::FingerInMouth, Self::Pointing];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::FingerInMouth => "finger_in_mouth",
            Self::Pointing => "pointing",
        }
    }

    /// Conversión string → enum, acepta las etiquetas de `as_str`
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "none" | "" => Some(Self::None),
            "finger_in_mouth" | "finger-in-mouth" => Some(Self::FingerInMouth),
            "pointing" => Some(Self::Pointing),
            _ => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

impl std::fmt::Display for Gesture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rectángulo normalizado (x1, y1, x2, y2) usado por la regla FingerInMouth.
/// Se valida en `GestureConfig::validate`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectionZone {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl DetectionZone {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Contención estricta (bordes excluidos)
    pub fn contains(&self, point: Landmark) -> bool {
        self.x1 < point.x && point.x < self.x2 && self.y1 < point.y && point.y < self.y2
    }

    pub fn is_well_formed(&self) -> bool {
        let in_unit = |v: f32| (0.0..=1.0).contains(&v);
        in_unit(self.x1)
            && in_unit(self.x2)
            && in_unit(self.y1)
            && in_unit(self.y2)
            && self.x1 < self.x2
            && self.y1 < self.y2
    }
}

impl Default for DetectionZone {
    fn default() -> Self {
        Self {
            x1: DEFAULT_ZONE_X1,
            y1: DEFAULT_ZONE_Y1,
            x2: DEFAULT_ZONE_X2,
            y2: DEFAULT_ZONE_Y2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joint_indices_follow_detector_order() {
        assert_eq!(HandJoint::Wrist.index(), 0);
        assert_eq!(HandJoint::ThumbTip.index(), 4);
        assert_eq!(HandJoint::IndexPip.index(), 6);
        assert_eq!(HandJoint::IndexTip.index(), 8);
        assert_eq!(HandJoint::MiddlePip.index(), 10);
        assert_eq!(HandJoint::RingPip.index(), 14);
        assert_eq!(HandJoint::PinkyTip.index(), 20);
        for (i, joint) in HandJoint::ALL.iter().enumerate() {
            assert_eq!(joint.index(), i);
            assert_eq!(HandJoint::from_index(i), Some(*joint));
        }
        assert_eq!(HandJoint::from_index(JOINT_COUNT), None);
    }

    #[test]
    fn test_from_flat_2d_and_3d() {
        let flat2: Vec<f32> = (0..VALUES_PER_SNAPSHOT_2D).map(|i| i as f32).collect();
        let snap = HandSnapshot::from_flat(&flat2).unwrap();
        assert_eq!(snap.joint(HandJoint::Wrist), Landmark::new(0.0, 1.0, 0.0));
        assert_eq!(snap.joint(HandJoint::IndexTip), Landmark::new(16.0, 17.0, 0.0));

        let flat3: Vec<f32> = (0..VALUES_PER_SNAPSHOT_3D).map(|i| i as f32).collect();
        let snap = HandSnapshot::from_flat(&flat3).unwrap();
        assert_eq!(snap.joint(HandJoint::ThumbCmc), Landmark::new(3.0, 4.0, 5.0));
        assert_eq!(snap.to_flat(), flat3);

        assert!(HandSnapshot::from_flat(&[0.0; 10]).is_none());
    }

    #[test]
    fn test_zone_contains_is_strict() {
        let zone = DetectionZone::default();
        assert!(zone.contains(Landmark::xy(0.5, 0.3)));
        assert!(!zone.contains(Landmark::xy(0.1, 0.3)));
        assert!(!zone.contains(Landmark::xy(0.35, 0.3)));
        assert!(!zone.contains(Landmark::xy(0.65, 0.3)));
        assert!(!zone.contains(Landmark::xy(0.5, 0.15)));
        assert!(!zone.contains(Landmark::xy(0.5, 0.5)));
    }

    #[test]
    fn test_zone_well_formed() {
        assert!(DetectionZone::default().is_well_formed());
        assert!(DetectionZone::new(0.0, 0.0, 1.0, 1.0).is_well_formed());
        assert!(!DetectionZone::new(0.5, 0.1, 0.5, 0.2).is_well_formed());
        assert!(!DetectionZone::new(0.1, 0.6, 0.5, 0.2).is_well_formed());
        assert!(!DetectionZone::new(-0.1, 0.1, 0.5, 0.2).is_well_formed());
        assert!(!DetectionZone::new(0.1, 0.1, 1.5, 0.2).is_well_formed());
    }

    #[test]
    fn test_gesture_labels() {
        for g in Gesture::ALL {
            assert_eq!(Gesture::from_label(g.as_str()), Some(g));
        }
        assert_eq!(Gesture::from_label("Pointing "), Some(Gesture::Pointing));
        assert_eq!(Gesture::from_label("thumbs_up"), None);
        assert_eq!(Gesture::default(), Gesture::None);
        assert_eq!(Gesture::FingerInMouth.to_string(), "finger_in_mouth");
    }
}
