use crate::{
    controller::SceneController,
    core::Millis,
    error::ExhibitResult,
    storyboard::{Storyboard, StoryboardStep},
};

/// Dwell before autoplay advances to the next step.
pub const DEFAULT_DWELL: Millis = Millis(4000);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    ArrowRight,
    ArrowLeft,
    Space,
    Escape,
    Slash,
    Other,
}

/// Whether an editable element currently holds keyboard focus. Global
/// shortcuts are suppressed while the user is typing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputFocus {
    None,
    Editable,
}

/// Requests the engine raises for its host to act on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineRequest {
    OpenSearch,
}

/// Drives forward/backward traversal of a fixed-length step sequence with
/// optional autoplay, and hands each new step to the attached scene
/// controller.
///
/// The engine owns step index and play state exclusively; panels read them
/// through accessors. All timing flows through `now` arguments, so there is
/// never more than one pending auto-advance: the arm timestamp is a single
/// `Option`, re-set on every state change.
pub struct PlaybackEngine {
    storyboard: Storyboard,
    current: usize,
    is_playing: bool,
    dwell: Millis,
    armed_at: Option<Millis>,
    controller: Option<Box<dyn SceneController>>,
}

impl PlaybackEngine {
    pub fn new(storyboard: Storyboard) -> ExhibitResult<Self> {
        storyboard.validate()?;
        Ok(Self {
            storyboard,
            current: 0,
            is_playing: false,
            dwell: DEFAULT_DWELL,
            armed_at: None,
            controller: None,
        })
    }

    pub fn with_dwell(mut self, dwell: Millis) -> Self {
        self.dwell = dwell;
        self
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_step(&self) -> &StoryboardStep {
        // Index is clamped on every mutation and the storyboard is non-empty.
        &self.storyboard.steps[self.current]
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn step_count(&self) -> usize {
        self.storyboard.len()
    }

    /// Progress through the storyboard in `[0, 1]` for the narration panel.
    pub fn progress(&self) -> f64 {
        let n = self.storyboard.len();
        if n <= 1 {
            1.0
        } else {
            self.current as f64 / (n - 1) as f64
        }
    }

    /// Jump to a step. Out-of-range input is clamped silently; explicit seeks
    /// always stop playback.
    pub fn seek(&mut self, index: i64, now: Millis) {
        self.is_playing = false;
        self.armed_at = None;
        let max = (self.storyboard.len() - 1) as i64;
        let clamped = index.clamp(0, max) as usize;
        if clamped != self.current {
            self.current = clamped;
            self.apply_current(now);
        }
    }

    /// Advance one step. At the last step the index stays put and playback
    /// stops; no wrap, no error.
    pub fn next(&mut self, now: Millis) {
        if self.current + 1 < self.storyboard.len() {
            self.seek(self.current as i64 + 1, now);
        } else {
            self.is_playing = false;
            self.armed_at = None;
        }
    }

    /// Retreat one step. No-op at index 0.
    pub fn prev(&mut self, now: Millis) {
        if self.current > 0 {
            self.seek(self.current as i64 - 1, now);
        }
    }

    pub fn toggle_play(&mut self, now: Millis) {
        self.is_playing = !self.is_playing;
        self.armed_at = self.is_playing.then_some(now);
    }

    pub fn stop(&mut self) {
        self.is_playing = false;
        self.armed_at = None;
    }

    /// Advance clocks: fire at most one due auto-advance, then tick the scene
    /// controller's timeline.
    pub fn tick(&mut self, now: Millis) {
        if self.is_playing
            && let Some(armed) = self.armed_at
            && now >= armed.saturating_add(self.dwell)
        {
            self.advance_auto(now);
        }
        if let Some(controller) = &mut self.controller {
            controller.tick(now);
        }
    }

    /// Timer-driven advance: keeps playing and re-arms from zero, unlike a
    /// user-initiated `next`. Stops at the last step.
    fn advance_auto(&mut self, now: Millis) {
        if self.current + 1 < self.storyboard.len() {
            self.current += 1;
            self.armed_at = Some(now);
            self.apply_current(now);
        } else {
            self.is_playing = false;
            self.armed_at = None;
        }
    }

    /// Global keyboard mapping. Suppressed entirely while an editable field
    /// holds focus.
    pub fn handle_key(
        &mut self,
        key: Key,
        focus: InputFocus,
        now: Millis,
    ) -> Option<EngineRequest> {
        if focus == InputFocus::Editable {
            return None;
        }
        match key {
            Key::ArrowRight | Key::Space => {
                self.next(now);
                None
            }
            Key::ArrowLeft => {
                self.prev(now);
                None
            }
            Key::Escape => {
                self.stop();
                None
            }
            Key::Slash => Some(EngineRequest::OpenSearch),
            Key::Other => None,
        }
    }

    /// Attach a freshly constructed controller and immediately apply the
    /// current step. Navigation before this point simply had no scene to
    /// drive; nothing was queued except the current index itself.
    pub fn attach_controller(&mut self, controller: Box<dyn SceneController>, now: Millis) {
        self.controller = Some(controller);
        self.apply_current(now);
    }

    pub fn detach_controller(&mut self) -> Option<Box<dyn SceneController>> {
        self.controller.take()
    }

    pub fn controller(&self) -> Option<&dyn SceneController> {
        self.controller.as_deref()
    }

    fn apply_current(&mut self, now: Millis) {
        let progress = self.progress();
        let step = &self.storyboard.steps[self.current];
        if let Some(controller) = &mut self.controller {
            controller.set_progress(progress);
            if let Err(err) = controller.apply(step, now) {
                // Scene failures never propagate to navigation.
                tracing::warn!(step = %step.id, %err, "scene apply failed");
            }
        }
    }
}
