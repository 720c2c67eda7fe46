//! Scripted oracle fixtures.

mod scripted;

pub use scripted::{
    ScriptedClassifier, ScriptedExtractor, ScriptedInterviewer, ScriptedSessionPlanner,
    ScriptedStrategist, ScriptedVerifier,
};
