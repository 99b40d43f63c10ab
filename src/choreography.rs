use crate::{
    core::{Millis, Vec3},
    ease::Ease,
    scene::{SceneGraph, TransientKind, EMISSIVE_BASE, EMISSIVE_HIGHLIGHT},
    timeline::{Channel, Timeline, Tween, TweenTarget},
};

/// Camera move duration for a step's target pose.
pub const CAMERA_MS: Millis = Millis(1200);
/// Packet transit time between two entities.
pub const PACKET_TRAVEL_MS: Millis = Millis(900);
/// Fade-out applied to transients before disposal.
pub const FADE_MS: Millis = Millis(250);
/// Expanding ring lifetime.
pub const RING_MS: Millis = Millis(1500);
/// Glow pulse rise time.
pub const PULSE_MS: Millis = Millis(500);
/// Per-entity stagger for link reveal.
pub const STAGGER_MS: Millis = Millis(150);

/// Schedule the camera move toward `pose` at t=0 with a smooth ease.
pub fn camera_move(tl: &mut Timeline, scene: &SceneGraph, pose: Vec3) {
    tl.push(Tween {
        target: TweenTarget::Camera,
        channel: Channel::Position {
            from: scene.camera.position,
            to: pose,
        },
        start: Millis::ZERO,
        duration: CAMERA_MS,
        ease: Ease::InOutQuad,
    });
}

/// Fly a packet transient from one entity to another, fading it out on
/// arrival. The transient's disposal is leased to the timeline, so it is
/// released exactly once whether the flight completes or is cancelled.
/// Returns the arrival time, or `None` when either endpoint is missing.
pub fn packet_flight(
    tl: &mut Timeline,
    scene: &mut SceneGraph,
    from_id: &str,
    to_id: &str,
    start: Millis,
) -> Option<Millis> {
    let from = scene.entity(from_id)?.position;
    let to = scene.entity(to_id)?.position;

    let packet = scene.spawn_transient(TransientKind::Packet, from);
    tl.push(Tween {
        target: TweenTarget::Transient(packet),
        channel: Channel::Position { from, to },
        start,
        duration: PACKET_TRAVEL_MS,
        ease: Ease::InOutQuad,
    });

    let arrival = start.saturating_add(PACKET_TRAVEL_MS);
    tl.push(Tween {
        target: TweenTarget::Transient(packet),
        channel: Channel::Opacity { from: 1.0, to: 0.0 },
        start: arrival,
        duration: FADE_MS,
        ease: Ease::OutQuad,
    });
    tl.lease_transient(packet, arrival.saturating_add(FADE_MS));

    Some(arrival)
}

/// Expanding ring at an entity: scale 1x to 5x while fading to zero.
pub fn expanding_ring(tl: &mut Timeline, scene: &mut SceneGraph, at_id: &str, start: Millis) {
    let Some(entity) = scene.entity(at_id) else {
        return;
    };
    let ring = scene.spawn_transient(TransientKind::Ring, entity.position);

    tl.push(Tween {
        target: TweenTarget::Transient(ring),
        channel: Channel::Scale { from: 1.0, to: 5.0 },
        start,
        duration: RING_MS,
        ease: Ease::OutQuad,
    });
    tl.push(Tween {
        target: TweenTarget::Transient(ring),
        channel: Channel::Opacity { from: 1.0, to: 0.0 },
        start,
        duration: RING_MS,
        ease: Ease::Linear,
    });
    tl.lease_transient(ring, start.saturating_add(RING_MS));
}

/// Fade an entity's glow up to full highlight intensity.
pub fn glow_pulse(tl: &mut Timeline, scene: &SceneGraph, id: &str, start: Millis) {
    let Some(entity) = scene.entity(id) else {
        return;
    };
    tl.push(Tween {
        target: TweenTarget::Entity(id.to_string()),
        channel: Channel::Emissive {
            from: entity.emissive,
            to: EMISSIVE_HIGHLIGHT,
        },
        start,
        duration: PULSE_MS,
        ease: Ease::OutQuad,
    });
}

/// Settle an entity's glow back to its resting intensity.
pub fn glow_settle(tl: &mut Timeline, scene: &SceneGraph, id: &str, start: Millis) {
    let Some(entity) = scene.entity(id) else {
        return;
    };
    tl.push(Tween {
        target: TweenTarget::Entity(id.to_string()),
        channel: Channel::Emissive {
            from: entity.emissive,
            to: EMISSIVE_BASE,
        },
        start,
        duration: PULSE_MS,
        ease: Ease::InOutQuad,
    });
}

/// Reveal the whole topology with a per-entity stagger: opacity and glow rise
/// in registry order.
pub fn link_reveal(tl: &mut Timeline, scene: &SceneGraph, start: Millis) {
    let ids: Vec<String> = scene.entity_ids().map(str::to_string).collect();
    for (i, id) in ids.iter().enumerate() {
        let offset = Millis(STAGGER_MS.0 * i as u64);
        let at = start.saturating_add(offset);
        let Some(entity) = scene.entity(id) else {
            continue;
        };
        tl.push(Tween {
            target: TweenTarget::Entity(id.clone()),
            channel: Channel::Opacity {
                from: entity.opacity,
                to: 1.0,
            },
            start: at,
            duration: PULSE_MS,
            ease: Ease::OutQuad,
        });
        tl.push(Tween {
            target: TweenTarget::Entity(id.clone()),
            channel: Channel::Glow {
                from: entity.glow,
                to: 1.0,
            },
            start: at,
            duration: PULSE_MS,
            ease: Ease::OutQuad,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Entity;

    fn pair() -> SceneGraph {
        let mut scene = SceneGraph::new();
        scene
            .add_entity("a", Entity::new(Vec3::new(-4.0, 0.0, 0.0), ["b"]))
            .unwrap();
        scene
            .add_entity("b", Entity::new(Vec3::new(4.0, 0.0, 0.0), ["a"]))
            .unwrap();
        scene
    }

    #[test]
    fn packet_flight_spawns_and_disposes_on_completion() {
        let mut scene = pair();
        let mut tl = Timeline::new();
        let arrival = packet_flight(&mut tl, &mut scene, "a", "b", Millis::ZERO).unwrap();
        assert_eq!(arrival, PACKET_TRAVEL_MS);
        assert_eq!(scene.live_transients().count(), 1);

        tl.advance(arrival.saturating_add(FADE_MS), &mut scene);
        assert_eq!(scene.live_transients().count(), 0);
    }

    #[test]
    fn packet_flight_with_missing_endpoint_is_skipped() {
        let mut scene = pair();
        let mut tl = Timeline::new();
        assert!(packet_flight(&mut tl, &mut scene, "a", "ghost", Millis::ZERO).is_none());
        assert_eq!(scene.live_transients().count(), 0);
        assert_eq!(tl.total_duration(), Millis::ZERO);
    }

    #[test]
    fn packet_reaches_destination_position() {
        let mut scene = pair();
        let mut tl = Timeline::new();
        packet_flight(&mut tl, &mut scene, "a", "b", Millis::ZERO).unwrap();

        tl.advance(Millis(450), &mut scene);
        let (_, packet) = scene.live_transients().next().unwrap();
        // Midway between the endpoints under a symmetric ease.
        assert!(packet.position.x.abs() < 0.5);

        tl.advance(PACKET_TRAVEL_MS, &mut scene);
        let (_, packet) = scene.live_transients().next().unwrap();
        assert!((packet.position.x - 4.0).abs() < 1e-5);
    }

    #[test]
    fn ring_expires_after_its_lifetime() {
        let mut scene = pair();
        let mut tl = Timeline::new();
        expanding_ring(&mut tl, &mut scene, "a", Millis::ZERO);
        assert_eq!(scene.live_transients().count(), 1);

        tl.advance(Millis(750), &mut scene);
        let (_, ring) = scene.live_transients().next().unwrap();
        assert!(ring.scale > 1.0 && ring.scale < 5.0);
        assert!(ring.opacity < 1.0);

        tl.advance(RING_MS, &mut scene);
        assert_eq!(scene.live_transients().count(), 0);
    }

    #[test]
    fn ring_at_missing_entity_is_skipped() {
        let mut scene = pair();
        let mut tl = Timeline::new();
        expanding_ring(&mut tl, &mut scene, "ghost", Millis::ZERO);
        assert_eq!(scene.live_transients().count(), 0);
    }

    #[test]
    fn link_reveal_staggers_entities() {
        let mut scene = pair();
        scene.apply_highlight(&["nothing-known".to_string()], &[]);
        let mut tl = Timeline::new();
        link_reveal(&mut tl, &scene, Millis::ZERO);

        // First entity fully revealed, second still rising.
        tl.advance(PULSE_MS, &mut scene);
        assert_eq!(scene.entity("a").unwrap().opacity, 1.0);
        assert!(scene.entity("b").unwrap().opacity < 1.0);

        tl.advance(Millis(PULSE_MS.0 + STAGGER_MS.0), &mut scene);
        assert_eq!(scene.entity("b").unwrap().opacity, 1.0);
    }
}
