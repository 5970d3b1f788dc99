pub mod config;
pub mod csv_loader;
pub mod gesture_buffer;
pub mod gesture_classifier;
pub mod gesture_stabilizer;
pub mod landmark_stream;
pub mod pipeline;
pub mod types;

pub use config::{ClassifierParams, ConfigError, GestureConfig, StabilizerParams};
pub use gesture_classifier::{FingerPosture, GestureClassifier};
pub use gesture_stabilizer::GestureStabilizer;
pub use pipeline::{FrameOutcome, GesturePipeline, StabilizerWorker};
pub use types::{DetectionZone, Gesture, HandJoint, HandSnapshot, Landmark};
