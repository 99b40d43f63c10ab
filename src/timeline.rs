use crate::{
    core::{Millis, Vec3},
    ease::Ease,
    scene::{SceneGraph, TransientId},
};

/// What a tween mutates.
#[derive(Clone, Debug, PartialEq)]
pub enum TweenTarget {
    Camera,
    CameraTarget,
    Entity(String),
    Transient(TransientId),
}

/// The property channel and its endpoint values.
#[derive(Clone, Debug)]
pub enum Channel {
    Position { from: Vec3, to: Vec3 },
    Opacity { from: f64, to: f64 },
    Emissive { from: f64, to: f64 },
    Glow { from: f64, to: f64 },
    Scale { from: f64, to: f64 },
}

/// One time-scheduled property interpolation, relative to the timeline's own
/// clock. Pure data; sampling happens in [`Timeline::advance`].
#[derive(Clone, Debug)]
pub struct Tween {
    pub target: TweenTarget,
    pub channel: Channel,
    pub start: Millis,
    pub duration: Millis,
    pub ease: Ease,
}

struct TweenState {
    tween: Tween,
    latched: bool,
}

struct TransientLease {
    id: TransientId,
    expires: Millis,
}

/// A cancellable group of tweens plus the transients they animate.
///
/// At most one timeline is live per scene controller. Transients leased to a
/// timeline are disposed exactly once: either when their lease expires during
/// [`advance`](Timeline::advance), or synchronously on
/// [`cancel`](Timeline::cancel) — whichever comes first.
#[derive(Default)]
pub struct Timeline {
    tweens: Vec<TweenState>,
    leases: Vec<TransientLease>,
    total: Millis,
    cancelled: bool,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, tween: Tween) {
        let end = tween.start.saturating_add(tween.duration);
        self.total = self.total.max(end);
        self.tweens.push(TweenState {
            tween,
            latched: false,
        });
    }

    /// Register a transient spawned for this timeline. It is disposed when
    /// `expires` passes or when the timeline is cancelled.
    pub fn lease_transient(&mut self, id: TransientId, expires: Millis) {
        self.total = self.total.max(expires);
        self.leases.push(TransientLease { id, expires });
    }

    pub fn total_duration(&self) -> Millis {
        self.total
    }

    pub fn is_finished(&self, now: Millis) -> bool {
        self.cancelled || (now >= self.total && self.leases.is_empty())
    }

    /// Sample every tween active at `now` and apply the results to `scene`.
    ///
    /// Tweens past their end latch their final value exactly once. Expired
    /// leases dispose their transient and are removed. A cancelled timeline
    /// never mutates anything.
    pub fn advance(&mut self, now: Millis, scene: &mut SceneGraph) {
        if self.cancelled {
            return;
        }

        for state in &mut self.tweens {
            if state.latched || now < state.tween.start {
                continue;
            }

            let end = state.tween.start.saturating_add(state.tween.duration);
            if now >= end {
                apply_channel(scene, &state.tween.target, &state.tween.channel, 1.0);
                state.latched = true;
                continue;
            }

            let elapsed = now.saturating_sub(state.tween.start);
            let t = if state.tween.duration.0 == 0 {
                1.0
            } else {
                elapsed.0 as f64 / state.tween.duration.0 as f64
            };
            let eased = state.tween.ease.apply(t);
            apply_channel(scene, &state.tween.target, &state.tween.channel, eased);
        }

        self.leases.retain(|lease| {
            if now >= lease.expires {
                scene.dispose_transient(lease.id);
                false
            } else {
                true
            }
        });
    }

    /// Cancel every pending tween and dispose every still-leased transient,
    /// synchronously. Idempotent; the sole cancellation mechanism.
    pub fn cancel(&mut self, scene: &mut SceneGraph) {
        if self.cancelled {
            return;
        }
        self.cancelled = true;
        for lease in self.leases.drain(..) {
            scene.dispose_transient(lease.id);
        }
        self.tweens.clear();
    }
}

/// Resolve the target and write the interpolated value. Missing entities and
/// already-disposed transients are skipped silently.
fn apply_channel(scene: &mut SceneGraph, target: &TweenTarget, channel: &Channel, t: f64) {
    match target {
        TweenTarget::Camera => {
            if let Channel::Position { from, to } = channel {
                scene.camera.position = from.lerp(*to, t as f32);
            }
        }
        TweenTarget::CameraTarget => {
            if let Channel::Position { from, to } = channel {
                scene.camera.target = from.lerp(*to, t as f32);
            }
        }
        TweenTarget::Entity(id) => {
            let Some(entity) = scene.entity_mut(id) else {
                return;
            };
            match channel {
                Channel::Position { from, to } => entity.position = from.lerp(*to, t as f32),
                Channel::Opacity { from, to } => entity.opacity = lerp(*from, *to, t),
                Channel::Emissive { from, to } => entity.emissive = lerp(*from, *to, t),
                Channel::Glow { from, to } => entity.glow = lerp(*from, *to, t),
                Channel::Scale { .. } => {}
            }
        }
        TweenTarget::Transient(id) => {
            let Some(tr) = scene.transient_mut(*id) else {
                return;
            };
            match channel {
                Channel::Position { from, to } => tr.position = from.lerp(*to, t as f32),
                Channel::Opacity { from, to } => tr.opacity = lerp(*from, *to, t),
                Channel::Scale { from, to } => tr.scale = lerp(*from, *to, t),
                Channel::Emissive { .. } | Channel::Glow { .. } => {}
            }
        }
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Entity, TransientKind};

    fn scene_with(id: &str) -> SceneGraph {
        let mut scene = SceneGraph::new();
        scene
            .add_entity(id, Entity::new(Vec3::ZERO, Vec::<String>::new()))
            .unwrap();
        scene
    }

    fn emissive_tween(id: &str, start: u64, duration: u64) -> Tween {
        Tween {
            target: TweenTarget::Entity(id.to_string()),
            channel: Channel::Emissive { from: 0.0, to: 1.0 },
            start: Millis(start),
            duration: Millis(duration),
            ease: Ease::Linear,
        }
    }

    #[test]
    fn midpoint_interpolates_linearly() {
        let mut scene = scene_with("n");
        let mut tl = Timeline::new();
        tl.push(emissive_tween("n", 0, 1000));

        tl.advance(Millis(500), &mut scene);
        assert!((scene.entity("n").unwrap().emissive - 0.5).abs() < 1e-9);
    }

    #[test]
    fn final_value_latches_past_end() {
        let mut scene = scene_with("n");
        let mut tl = Timeline::new();
        tl.push(emissive_tween("n", 0, 1000));

        tl.advance(Millis(5000), &mut scene);
        assert_eq!(scene.entity("n").unwrap().emissive, 1.0);

        // A later out-of-band mutation is not fought by the latched tween.
        scene.entity_mut("n").unwrap().emissive = 0.2;
        tl.advance(Millis(6000), &mut scene);
        assert_eq!(scene.entity("n").unwrap().emissive, 0.2);
    }

    #[test]
    fn tween_before_start_does_nothing() {
        let mut scene = scene_with("n");
        let base = scene.entity("n").unwrap().emissive;
        let mut tl = Timeline::new();
        tl.push(emissive_tween("n", 500, 1000));

        tl.advance(Millis(100), &mut scene);
        assert_eq!(scene.entity("n").unwrap().emissive, base);
    }

    #[test]
    fn missing_entity_is_skipped() {
        let mut scene = scene_with("n");
        let mut tl = Timeline::new();
        tl.push(emissive_tween("ghost", 0, 1000));
        tl.advance(Millis(500), &mut scene);
        // No panic, other entities untouched.
        assert_eq!(scene.entity("n").unwrap().emissive, crate::scene::EMISSIVE_BASE);
    }

    #[test]
    fn lease_disposes_exactly_once_on_expiry() {
        let mut scene = scene_with("n");
        let id = scene.spawn_transient(TransientKind::Packet, Vec3::ZERO);
        let mut tl = Timeline::new();
        tl.lease_transient(id, Millis(1000));

        tl.advance(Millis(999), &mut scene);
        assert!(scene.transient(id).is_some());

        tl.advance(Millis(1000), &mut scene);
        assert!(scene.transient(id).is_none());

        // Lease is gone; a later advance does not touch the slab again.
        tl.advance(Millis(2000), &mut scene);
        assert!(tl.is_finished(Millis(2000)));
    }

    #[test]
    fn cancel_disposes_pending_leases_synchronously() {
        let mut scene = scene_with("n");
        let id = scene.spawn_transient(TransientKind::Ring, Vec3::ZERO);
        let mut tl = Timeline::new();
        tl.lease_transient(id, Millis(1500));
        tl.push(emissive_tween("n", 0, 1000));

        tl.advance(Millis(200), &mut scene);
        tl.cancel(&mut scene);
        assert!(scene.transient(id).is_none());

        // Cancelled timelines never mutate again.
        let frozen = scene.entity("n").unwrap().emissive;
        tl.advance(Millis(800), &mut scene);
        assert_eq!(scene.entity("n").unwrap().emissive, frozen);
    }

    #[test]
    fn cancel_after_completion_is_a_noop() {
        let mut scene = scene_with("n");
        let id = scene.spawn_transient(TransientKind::Arc, Vec3::ZERO);
        let mut tl = Timeline::new();
        tl.lease_transient(id, Millis(100));

        tl.advance(Millis(100), &mut scene);
        assert!(scene.transient(id).is_none());

        tl.cancel(&mut scene);
        tl.cancel(&mut scene);
        assert_eq!(scene.live_transients().count(), 0);
    }

    #[test]
    fn total_duration_covers_tweens_and_leases() {
        let mut tl = Timeline::new();
        tl.push(emissive_tween("n", 500, 1000));
        tl.lease_transient(TransientId(0), Millis(2500));
        assert_eq!(tl.total_duration(), Millis(2500));
        assert!(!tl.is_finished(Millis(2499)));
    }

    #[test]
    fn zero_duration_tween_applies_final_value() {
        let mut scene = scene_with("n");
        let mut tl = Timeline::new();
        tl.push(emissive_tween("n", 0, 0));
        tl.advance(Millis(0), &mut scene);
        assert_eq!(scene.entity("n").unwrap().emissive, 1.0);
    }
}
