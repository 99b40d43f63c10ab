use std::collections::{BTreeMap, BTreeSet};

use crate::{
    core::Vec3,
    error::{ExhibitError, ExhibitResult},
};

/// An ordered, author-supplied storyboard. Steps are consumed in array order.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Storyboard {
    pub steps: Vec<StoryboardStep>,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct StoryboardStep {
    pub id: String,
    pub title: String,
    pub narration: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scene: Option<SceneDirective>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instruments: Option<Instruments>,
}

/// Declarative scene-update directive attached to a step.
///
/// Every field except `action` is optional; absence means "do nothing for
/// that aspect". An action the active scene controller does not recognize is
/// a no-op, never an error.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct SceneDirective {
    #[serde(default)]
    pub action: ActionTag,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera: Option<Vec3>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub highlight: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub focus: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub packet: Option<PacketPayload>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionTag {
    #[default]
    None,
    EmitPacket,
    RevealLinks,
    EstablishSession,
    AnnounceRoute,
    PropagateRoute,
    ShowMultiplePaths,
    SelectBestPath,
    ShowConvergence,
    Hijack,
    Withdraw,
}

/// Embedded packet payload for the inspector and for packet choreographies.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct PacketPayload {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seq: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ack: Option<u64>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
}

/// Structured display data for the instrument panels. Pure display data; the
/// scene controller never reads it.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct Instruments {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub machine_state: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub packet_fields: Vec<PacketField>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub glossary: Vec<GlossaryTerm>,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PacketField {
    pub name: String,
    pub value: String,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GlossaryTerm {
    pub term: String,
    pub definition: String,
}

impl Storyboard {
    pub fn validate(&self) -> ExhibitResult<()> {
        if self.steps.is_empty() {
            return Err(ExhibitError::storyboard(
                "storyboard must have at least one step",
            ));
        }

        let mut seen = BTreeSet::new();
        for step in &self.steps {
            if step.id.trim().is_empty() {
                return Err(ExhibitError::storyboard("step id must be non-empty"));
            }
            if !seen.insert(step.id.as_str()) {
                return Err(ExhibitError::storyboard(format!(
                    "duplicate step id '{}'",
                    step.id
                )));
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn step(&self, index: usize) -> Option<&StoryboardStep> {
        self.steps.get(index)
    }
}
