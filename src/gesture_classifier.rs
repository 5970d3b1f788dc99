use crate::config::ClassifierParams;
use crate::types::{Gesture, HandJoint, HandSnapshot};

/// Estado de los dedos que evalúa la regla de señalar.
/// El pulgar no participa en la decisión.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FingerPosture {
    pub index_extended: bool,
    pub middle_curled: bool,
    pub ring_curled: bool,
    pub pinky_curled: bool,
}

impl FingerPosture {
    pub fn is_pointing(&self) -> bool {
        self.index_extended && self.middle_curled && self.ring_curled && self.pinky_curled
    }
}

/// Clasificador geométrico por frame, sin memoria.
///
/// Orden de prioridad fijo: primero "dedo en la boca", luego "señalar".
/// Si ambas reglas se cumplen gana FingerInMouth.
#[derive(Debug, Clone, Default)]
pub struct GestureClassifier {
    params: ClassifierParams,
}

impl GestureClassifier {
    pub fn new(params: ClassifierParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &ClassifierParams {
        &self.params
    }

    /// Clasifica un snapshot. Sin mano → `Gesture::None`.
    pub fn classify(&self, snapshot: Option<&HandSnapshot>) -> Gesture {
        let Some(snapshot) = snapshot else {
            return Gesture::None;
        };

        if self.is_finger_in_mouth(snapshot) {
            Gesture::FingerInMouth
        } else if self.is_pointing(snapshot) {
            Gesture::Pointing
        } else {
            Gesture::None
        }
    }

    /// Punta del índice estrictamente dentro de la zona de detección
    pub fn is_finger_in_mouth(&self, snapshot: &HandSnapshot) -> bool {
        self.params
            .detection_zone
            .contains(snapshot.joint(HandJoint::IndexTip))
    }

    pub fn is_pointing(&self, snapshot: &HandSnapshot) -> bool {
        self.posture(snapshot).is_pointing()
    }

    /// Compara la y de cada punta con la de su articulación PIP
    /// (y menor = más arriba en el frame = más extendido)
    pub fn posture(&self, snapshot: &HandSnapshot) -> FingerPosture {
        let margin = self.params.curl_margin;
        let tip_y = |joint: HandJoint| snapshot.joint(joint).y;

        // Un dedo medio extendido pero no recto también cuenta como doblado
        let curled = |tip: HandJoint, pip: HandJoint| tip_y(tip) > tip_y(pip) - margin;

        FingerPosture {
            index_extended: tip_y(HandJoint::IndexTip) < tip_y(HandJoint::IndexPip),
            middle_curled: curled(HandJoint::MiddleTip, HandJoint::MiddlePip),
            ring_curled: curled(HandJoint::RingTip, HandJoint::RingPip),
            pinky_curled: curled(HandJoint::PinkyTip, HandJoint::PinkyPip),
        }
    }
}
