use crate::{
    choreography,
    core::{AccentColors, Millis},
    error::ExhibitResult,
    exhibits::Registry,
    scene::{SceneGraph, SceneSnapshot},
    storyboard::{SceneDirective, StoryboardStep},
    timeline::Timeline,
};

/// The contract between the playback engine and a concrete exhibit scene.
///
/// The crate is headless: `tick` stands in for the per-frame render callback,
/// and a renderer reads the result through `snapshot`. All clocks are passed
/// explicitly as [`Millis`].
pub trait SceneController {
    /// Apply a storyboard step: cancel any in-flight timeline, run the
    /// highlight pass, then schedule the step's camera move and action
    /// choreography. Unrecognized actions and absent optional fields never
    /// error.
    fn apply(&mut self, step: &StoryboardStep, now: Millis) -> ExhibitResult<()>;

    /// Reserved scrubbing extension point. May be a no-op.
    fn set_progress(&mut self, progress: f64);

    /// Advance the in-flight timeline to `now`.
    fn tick(&mut self, now: Millis);

    /// Release everything: cancel the timeline, dispose transients, clear the
    /// scene. Safe to call more than once; `apply` after disposal is dropped.
    fn dispose(&mut self);

    fn snapshot(&self) -> SceneSnapshot;
}

/// Controller lifecycle. Construction yields `Ready` directly; the loading
/// window lives in the playback engine, which tolerates an absent controller
/// and re-applies the current step on attach. `apply` after disposal is
/// dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    Ready,
    Disposed,
}

/// Builds an exhibit's per-action timeline from the current scene state and
/// the step's directive. Must be a pure function of its arguments.
pub type ChoreographFn =
    fn(&mut SceneGraph, &SceneDirective, AccentColors, &mut Timeline);

/// The one concrete [`SceneController`]: a scene graph plus an exhibit's
/// choreography table, with exactly one owned timeline slot.
pub struct ExhibitController {
    scene: SceneGraph,
    choreograph: ChoreographFn,
    accents: AccentColors,
    timeline: Option<Timeline>,
    started: Millis,
    progress: f64,
    state: Lifecycle,
}

impl ExhibitController {
    pub fn new(scene: SceneGraph, choreograph: ChoreographFn, accents: AccentColors) -> Self {
        Self {
            scene,
            choreograph,
            accents,
            timeline: None,
            started: Millis::ZERO,
            progress: 0.0,
            state: Lifecycle::Ready,
        }
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.state
    }

    fn cancel_timeline(&mut self) {
        if let Some(mut tl) = self.timeline.take() {
            tl.cancel(&mut self.scene);
        }
    }
}

impl SceneController for ExhibitController {
    #[tracing::instrument(skip(self, step), fields(step = %step.id))]
    fn apply(&mut self, step: &StoryboardStep, now: Millis) -> ExhibitResult<()> {
        if self.state != Lifecycle::Ready {
            tracing::debug!(state = ?self.state, "dropping apply on non-ready controller");
            return Ok(());
        }

        // Prior timeline must be fully cancelled before the new one schedules
        // anything, so visual state never mixes two steps' mutations.
        self.cancel_timeline();

        let Some(directive) = &step.scene else {
            return Ok(());
        };

        // Highlight first: choreography tweens capture their `from` values
        // from the scene, and those must reflect this step's emphasis, not
        // the previous step's.
        self.scene
            .apply_highlight(&directive.highlight, &directive.focus);

        let mut tl = Timeline::new();
        if let Some(pose) = directive.camera {
            choreography::camera_move(&mut tl, &self.scene, pose);
        }
        (self.choreograph)(&mut self.scene, directive, self.accents, &mut tl);

        self.started = now;
        tl.advance(Millis::ZERO, &mut self.scene);
        self.timeline = Some(tl);
        Ok(())
    }

    fn set_progress(&mut self, progress: f64) {
        self.progress = progress.clamp(0.0, 1.0);
    }

    fn tick(&mut self, now: Millis) {
        if self.state != Lifecycle::Ready {
            return;
        }
        if let Some(tl) = &mut self.timeline {
            let local = now.saturating_sub(self.started);
            tl.advance(local, &mut self.scene);
            if tl.is_finished(local) {
                self.timeline = None;
            }
        }
    }

    fn dispose(&mut self) {
        if self.state == Lifecycle::Disposed {
            return;
        }
        self.cancel_timeline();
        self.scene.clear();
        self.state = Lifecycle::Disposed;
    }

    fn snapshot(&self) -> SceneSnapshot {
        self.scene.snapshot()
    }
}

/// What the host shows in place of the canvas.
pub enum HostState {
    Empty,
    Active(Box<dyn SceneController>),
    /// Both the requested and the fallback exhibit failed to construct. The
    /// message backs a static placeholder; playback keeps working without a
    /// scene.
    Error(String),
}

/// Owns at most one live controller and sequences exhibit switches strictly:
/// the outgoing controller is disposed to completion before the incoming one
/// is constructed, so two controllers never contend for the drawing surface.
pub struct SceneHost {
    registry: Registry,
    state: HostState,
}

impl SceneHost {
    pub fn new(registry: Registry) -> Self {
        Self {
            registry,
            state: HostState::Empty,
        }
    }

    #[tracing::instrument(skip(self))]
    pub fn mount(&mut self, exhibit_id: u32, accents: AccentColors) {
        if let HostState::Active(controller) = &mut self.state {
            controller.dispose();
        }
        self.state = HostState::Empty;

        match self.registry.build_scene(exhibit_id, accents) {
            Ok(controller) => self.state = HostState::Active(controller),
            Err(err) => {
                tracing::warn!(exhibit_id, %err, "scene construction failed, falling back");
                let fallback = self.registry.default_id();
                match self.registry.build_scene(fallback, accents) {
                    Ok(controller) => self.state = HostState::Active(controller),
                    Err(fallback_err) => {
                        tracing::error!(%fallback_err, "fallback scene failed");
                        self.state = HostState::Error(format!(
                            "exhibit {exhibit_id} unavailable: {err}"
                        ));
                    }
                }
            }
        }
    }

    pub fn unmount(&mut self) {
        if let HostState::Active(controller) = &mut self.state {
            controller.dispose();
        }
        self.state = HostState::Empty;
    }

    /// Hand the live controller to the playback engine, leaving the host
    /// empty. The engine owns it until it detaches.
    pub fn take_controller(&mut self) -> Option<Box<dyn SceneController>> {
        match std::mem::replace(&mut self.state, HostState::Empty) {
            HostState::Active(controller) => Some(controller),
            other => {
                self.state = other;
                None
            }
        }
    }

    pub fn state(&self) -> &HostState {
        &self.state
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.state {
            HostState::Error(msg) => Some(msg),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::Vec3,
        dsl::StepBuilder,
        scene::Entity,
        storyboard::ActionTag,
    };

    fn noop_choreograph(
        _scene: &mut SceneGraph,
        _directive: &SceneDirective,
        _accents: AccentColors,
        _tl: &mut Timeline,
    ) {
    }

    fn packet_choreograph(
        scene: &mut SceneGraph,
        directive: &SceneDirective,
        _accents: AccentColors,
        tl: &mut Timeline,
    ) {
        if let (Some(from), Some(to)) = (&directive.from, &directive.to) {
            crate::choreography::packet_flight(tl, scene, from, to, Millis::ZERO);
        }
    }

    fn controller(choreograph: ChoreographFn) -> ExhibitController {
        let mut scene = SceneGraph::new();
        scene
            .add_entity("client", Entity::new(Vec3::new(-4.0, 0.0, 0.0), ["server"]))
            .unwrap();
        scene
            .add_entity("server", Entity::new(Vec3::new(4.0, 0.0, 0.0), ["client"]))
            .unwrap();
        ExhibitController::new(scene, choreograph, AccentColors::default())
    }

    fn emit_step(id: &str) -> crate::storyboard::StoryboardStep {
        StepBuilder::new(id, "t")
            .action(ActionTag::EmitPacket)
            .from_to("client", "server")
            .build()
            .unwrap()
    }

    #[test]
    fn apply_replaces_in_flight_timeline() {
        let mut c = controller(packet_choreograph);
        c.apply(&emit_step("a"), Millis::ZERO).unwrap();
        assert_eq!(c.snapshot().transients.len(), 1);

        // Second apply before the first flight completes: the first packet is
        // disposed synchronously, only the new one remains.
        c.apply(&emit_step("b"), Millis(100)).unwrap();
        assert_eq!(c.snapshot().transients.len(), 1);

        // Run the second timeline to completion; nothing from step "a" fires.
        c.tick(Millis(5000));
        assert_eq!(c.snapshot().transients.len(), 0);
    }

    #[test]
    fn camera_pose_is_animated_toward_target() {
        let mut c = controller(noop_choreograph);
        let step = StepBuilder::new("cam", "t")
            .camera(Vec3::new(0.0, 10.0, 0.0))
            .build()
            .unwrap();
        c.apply(&step, Millis::ZERO).unwrap();

        c.tick(Millis(600));
        let mid = c.snapshot().camera.position;
        c.tick(Millis(crate::choreography::CAMERA_MS.0));
        let end = c.snapshot().camera.position;
        assert!((end.y - 10.0).abs() < 1e-5);
        assert!(mid.y < end.y);
    }

    fn pulse_choreograph(
        scene: &mut SceneGraph,
        directive: &SceneDirective,
        _accents: AccentColors,
        tl: &mut Timeline,
    ) {
        if let Some(at) = &directive.at {
            crate::choreography::glow_pulse(tl, scene, at, Millis::ZERO);
        }
    }

    #[test]
    fn pulse_on_highlighted_entity_starts_from_highlight_intensity() {
        let mut c = controller(pulse_choreograph);
        let step = StepBuilder::new("announce", "t")
            .at("client")
            .highlight(["client"])
            .build()
            .unwrap();
        c.apply(&step, Millis::ZERO).unwrap();

        // The pulse's `from` is captured after the highlight pass, so the
        // t=0 sample holds the highlighted intensity instead of flashing
        // back to the resting value for one frame.
        let at_zero = c.snapshot().entities["client"].emissive;
        assert_eq!(at_zero, crate::scene::EMISSIVE_HIGHLIGHT);

        c.tick(Millis(crate::choreography::PULSE_MS.0));
        let settled = c.snapshot().entities["client"].emissive;
        assert_eq!(settled, crate::scene::EMISSIVE_HIGHLIGHT);
    }

    #[test]
    fn step_without_scene_directive_is_a_noop() {
        let mut c = controller(noop_choreograph);
        let step = StepBuilder::new("plain", "t").build().unwrap();
        c.apply(&step, Millis::ZERO).unwrap();
        assert_eq!(c.snapshot().transients.len(), 0);
    }

    #[test]
    fn dispose_cancels_and_is_idempotent() {
        let mut c = controller(packet_choreograph);
        c.apply(&emit_step("a"), Millis::ZERO).unwrap();
        assert_eq!(c.snapshot().transients.len(), 1);

        c.dispose();
        assert_eq!(c.lifecycle(), Lifecycle::Disposed);
        assert_eq!(c.snapshot().transients.len(), 0);
        assert_eq!(c.snapshot().entities.len(), 0);

        c.dispose();

        // Ticking a disposed controller mutates nothing and does not panic.
        c.tick(Millis(10_000));
        assert_eq!(c.snapshot().transients.len(), 0);
    }

    #[test]
    fn apply_after_dispose_is_dropped() {
        let mut c = controller(packet_choreograph);
        c.dispose();
        c.apply(&emit_step("a"), Millis::ZERO).unwrap();
        assert_eq!(c.snapshot().transients.len(), 0);
    }

    #[test]
    fn set_progress_clamps() {
        let mut c = controller(noop_choreograph);
        c.set_progress(7.0);
        c.set_progress(-1.0);
        // No observable scene effect; the call must simply be safe.
        assert_eq!(c.lifecycle(), Lifecycle::Ready);
    }

    #[test]
    fn host_falls_back_to_default_exhibit() {
        let mut host = SceneHost::new(Registry::with_defaults());
        host.mount(999_999, AccentColors::default());
        assert!(matches!(host.state(), HostState::Active(_)));
    }

    #[test]
    fn host_mount_disposes_previous_controller() {
        let mut host = SceneHost::new(Registry::with_defaults());
        host.mount(9293, AccentColors::default());
        host.mount(4271, AccentColors::default());
        assert!(matches!(host.state(), HostState::Active(_)));
        host.unmount();
        assert!(matches!(host.state(), HostState::Empty));
    }
}
