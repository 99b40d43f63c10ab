//! Reference exhibit: BGP route announcement, convergence, and hijack (RFC 4271).

use crate::{
    catalog::{Difficulty, ExhibitMeta, ExhibitStatus},
    choreography::{
        expanding_ring, glow_pulse, glow_settle, link_reveal, packet_flight, PULSE_MS,
    },
    core::{AccentColors, Millis, Vec3},
    dsl::{StepBuilder, StoryboardBuilder},
    error::ExhibitResult,
    scene::{Entity, SceneGraph},
    storyboard::{ActionTag, SceneDirective, Storyboard},
    timeline::Timeline,
};

pub const ID: u32 = 4271;

pub fn meta() -> ExhibitMeta {
    ExhibitMeta {
        id: ID,
        name: "bgp".to_string(),
        title: "Border Gateway Protocol".to_string(),
        year: 2006,
        status: ExhibitStatus::Available,
        difficulty: Difficulty::Intermediate,
        duration_minutes: 14,
        layer: "routing".to_string(),
        concepts: vec![
            "route announcement".to_string(),
            "path selection".to_string(),
            "convergence".to_string(),
            "prefix hijacking".to_string(),
        ],
        prerequisites: vec![super::tcp::ID],
        accents: AccentColors::new([251, 191, 36], [248, 113, 113]),
        description: "Five autonomous systems gossip routes, pick best paths, and \
                      survive a hijack."
            .to_string(),
    }
}

/// A ring of five autonomous systems with one chord, so there are always two
/// candidate paths between opposite members.
pub fn topology() -> ExhibitResult<SceneGraph> {
    let mut scene = SceneGraph::new();
    scene.add_entity(
        "as1",
        Entity::new(Vec3::new(0.0, 0.0, -6.0), ["as2", "as5"]),
    )?;
    scene.add_entity(
        "as2",
        Entity::new(Vec3::new(5.7, 0.0, -1.9), ["as1", "as3", "as4"]),
    )?;
    scene.add_entity(
        "as3",
        Entity::new(Vec3::new(3.5, 0.0, 4.9), ["as2", "as4"]),
    )?;
    scene.add_entity(
        "as4",
        Entity::new(Vec3::new(-3.5, 0.0, 4.9), ["as3", "as5", "as2"]),
    )?;
    scene.add_entity(
        "as5",
        Entity::new(Vec3::new(-5.7, 0.0, -1.9), ["as4", "as1"]),
    )?;
    Ok(scene)
}

/// Flood UPDATE messages from `origin` to each of its peers, staggered.
/// Returns the last arrival time.
fn flood_updates(
    tl: &mut Timeline,
    scene: &mut SceneGraph,
    origin: &str,
    start: Millis,
) -> Millis {
    let peers: Vec<String> = scene
        .entity(origin)
        .map(|e| e.peers.clone())
        .unwrap_or_default();

    let mut last = start;
    for (i, peer) in peers.iter().enumerate() {
        let offset = start.saturating_add(Millis(120 * i as u64));
        if let Some(arrival) = packet_flight(tl, scene, origin, peer, offset) {
            glow_pulse(tl, scene, peer, arrival);
            last = last.max(arrival);
        }
    }
    last
}

pub fn choreograph(
    scene: &mut SceneGraph,
    directive: &SceneDirective,
    _accents: AccentColors,
    tl: &mut Timeline,
) {
    match directive.action {
        ActionTag::AnnounceRoute => {
            let Some(at) = &directive.at else {
                return;
            };
            glow_pulse(tl, scene, at, Millis::ZERO);
            expanding_ring(tl, scene, at, Millis::ZERO);
        }
        ActionTag::PropagateRoute => {
            let (Some(from), Some(to)) = (&directive.from, &directive.to) else {
                return;
            };
            if let Some(arrival) = packet_flight(tl, scene, from, to, Millis::ZERO) {
                glow_pulse(tl, scene, to, arrival);
                expanding_ring(tl, scene, to, arrival);
            }
        }
        ActionTag::ShowMultiplePaths => link_reveal(tl, scene, Millis::ZERO),
        ActionTag::SelectBestPath => {
            // Pulse the chosen path in order; the highlight pass dims the rest.
            for (i, id) in directive.focus.iter().enumerate() {
                glow_pulse(tl, scene, id, Millis(200 * i as u64));
            }
        }
        ActionTag::ShowConvergence => {
            let ids: Vec<String> = scene.entity_ids().map(str::to_string).collect();
            for (i, id) in ids.iter().enumerate() {
                glow_pulse(tl, scene, id, Millis(120 * i as u64));
            }
        }
        ActionTag::Hijack => {
            let Some(at) = &directive.at else {
                return;
            };
            glow_pulse(tl, scene, at, Millis::ZERO);
            expanding_ring(tl, scene, at, Millis::ZERO);
            flood_updates(tl, scene, at, PULSE_MS);
        }
        ActionTag::Withdraw => {
            let Some(at) = &directive.at else {
                return;
            };
            let last = flood_updates(tl, scene, at, Millis::ZERO);
            let ids: Vec<String> = scene.entity_ids().map(str::to_string).collect();
            for id in &ids {
                glow_settle(tl, scene, id, last);
            }
        }
        // Transport actions belong to other exhibits; unknown tags are no-ops.
        _ => {}
    }
}

pub fn storyboard() -> ExhibitResult<Storyboard> {
    StoryboardBuilder::new()
        .step(
            StepBuilder::new("internet", "A network of networks")
                .narration(
                    "The internet is tens of thousands of autonomous systems, \
                     each run by someone different.",
                )
                .camera(Vec3::new(0.0, 14.0, 16.0))
                .machine_state("IDLE")
                .build()?,
        )
        .step(
            StepBuilder::new("topology", "Five neighbors")
                .narration("Our miniature internet: five ASes and their peering links.")
                .action(ActionTag::RevealLinks)
                .camera(Vec3::new(0.0, 12.0, 12.0))
                .highlight(["topology"])
                .machine_state("CONNECT")
                .build()?,
        )
        .step(
            StepBuilder::new("speakers", "BGP speakers")
                .narration(
                    "Each border router speaks BGP with its neighbors over a \
                     long-lived TCP session.",
                )
                .highlight(["all"])
                .machine_state("ESTABLISHED")
                .build()?,
        )
        .step(
            StepBuilder::new("announce", "An announcement is born")
                .narration("AS1 originates a prefix and tells its neighbors about it.")
                .action(ActionTag::AnnounceRoute)
                .at("as1")
                .camera(Vec3::new(0.0, 8.0, -12.0))
                .highlight(["as1"])
                .machine_state("ESTABLISHED")
                .packet_field("prefix", "203.0.113.0/24")
                .packet_field("as-path", "1")
                .glossary("prefix", "a block of IP addresses announced as one route")
                .glossary("origin", "the AS that first announces a prefix")
                .build()?,
        )
        .step(
            StepBuilder::new("propagate", "Word spreads")
                .narration("AS2 hears the route and passes it on, appending itself to the path.")
                .action(ActionTag::PropagateRoute)
                .from_to("as1", "as2")
                .highlight(["as1", "as2"])
                .machine_state("ESTABLISHED")
                .packet_field("as-path", "2 1")
                .build()?,
        )
        .step(
            StepBuilder::new("reach", "Across the ring")
                .narration("Hop by hop, the announcement reaches every AS.")
                .action(ActionTag::PropagateRoute)
                .from_to("as2", "as3")
                .highlight(["as1", "as2", "as3"])
                .machine_state("ESTABLISHED")
                .packet_field("as-path", "3 2 1")
                .build()?,
        )
        .step(
            StepBuilder::new("paths", "More than one way")
                .narration("AS4 learns the prefix twice, over two different paths.")
                .action(ActionTag::ShowMultiplePaths)
                .camera(Vec3::new(0.0, 10.0, 14.0))
                .highlight(["all"])
                .machine_state("ESTABLISHED")
                .build()?,
        )
        .step(
            StepBuilder::new("best", "Choosing a favorite")
                .narration("Shortest AS path wins by default; AS4 picks the two-hop route.")
                .action(ActionTag::SelectBestPath)
                .highlight(["as1", "as2", "as4"])
                .focus(["as4", "as2", "as1"])
                .machine_state("ESTABLISHED")
                .packet_field("best", "4 2 1")
                .build()?,
        )
        .step(
            StepBuilder::new("converged", "A quiet network")
                .narration(
                    "Every AS has settled on a best route. BGP goes quiet until \
                     something changes.",
                )
                .action(ActionTag::ShowConvergence)
                .highlight(["all"])
                .machine_state("ESTABLISHED")
                .build()?,
        )
        .step(
            StepBuilder::new("hijack", "The lie")
                .narration(
                    "AS5 announces a prefix it does not own. Its neighbors have \
                     no way to know, and traffic follows the lie.",
                )
                .action(ActionTag::Hijack)
                .at("as5")
                .camera(Vec3::new(-8.0, 8.0, -4.0))
                .highlight(["as5"])
                .machine_state("ESTABLISHED")
                .packet_field("prefix", "203.0.113.0/24")
                .packet_field("as-path", "5")
                .glossary(
                    "prefix hijack",
                    "announcing someone else's prefix, by accident or on purpose",
                )
                .build()?,
        )
        .step(
            StepBuilder::new("withdraw", "Taking it back")
                .narration(
                    "The bogus route is withdrawn. WITHDRAWN ROUTES messages \
                     fan out and the poisoned entries are flushed.",
                )
                .action(ActionTag::Withdraw)
                .at("as5")
                .highlight(["all"])
                .machine_state("ESTABLISHED")
                .build()?,
        )
        .step(
            StepBuilder::new("healed", "Convergence again")
                .narration("Best paths are recomputed and the network settles once more.")
                .action(ActionTag::ShowConvergence)
                .camera(Vec3::new(0.0, 12.0, 12.0))
                .highlight(["all"])
                .machine_state("ESTABLISHED")
                .build()?,
        )
        .build()
}
