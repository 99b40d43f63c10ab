//! Read-only views over the current step. Pure functions of playback state;
//! nothing here mutates the engine or the scene.

use crate::storyboard::{GlossaryTerm, PacketField, StoryboardStep};

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct NarrationView {
    pub title: String,
    pub narration: String,
    pub step_number: usize,
    pub step_count: usize,
    pub progress: f64,
}

impl NarrationView {
    /// ASCII progress bar for terminal frontends.
    pub fn progress_bar(&self, width: usize) -> String {
        let filled = (self.progress * width as f64).round() as usize;
        let filled = filled.min(width);
        format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
    }
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct InstrumentView {
    pub machine_state: Option<String>,
    pub packet_fields: Vec<PacketField>,
    pub glossary: Vec<GlossaryTerm>,
}

pub fn narration_view(step: &StoryboardStep, index: usize, count: usize) -> NarrationView {
    let progress = if count <= 1 {
        1.0
    } else {
        index as f64 / (count - 1) as f64
    };
    NarrationView {
        title: step.title.clone(),
        narration: step.narration.clone(),
        step_number: index + 1,
        step_count: count,
        progress,
    }
}

pub fn instrument_view(step: &StoryboardStep) -> InstrumentView {
    let Some(instruments) = &step.instruments else {
        return InstrumentView::default();
    };
    InstrumentView {
        machine_state: instruments.machine_state.clone(),
        packet_fields: instruments.packet_fields.clone(),
        glossary: instruments.glossary.clone(),
    }
}
