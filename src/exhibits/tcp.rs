//! Reference exhibit: the TCP three-way handshake and teardown (RFC 9293).

use crate::{
    catalog::{Difficulty, ExhibitMeta, ExhibitStatus},
    choreography::{expanding_ring, glow_pulse, link_reveal, packet_flight},
    core::{AccentColors, Millis, Vec3},
    dsl::{StepBuilder, StoryboardBuilder},
    error::ExhibitResult,
    scene::{Entity, SceneGraph},
    storyboard::{ActionTag, PacketPayload, SceneDirective, Storyboard},
    timeline::Timeline,
};

pub const ID: u32 = 9293;

pub fn meta() -> ExhibitMeta {
    ExhibitMeta {
        id: ID,
        name: "tcp".to_string(),
        title: "Transmission Control Protocol".to_string(),
        year: 2022,
        status: ExhibitStatus::Available,
        difficulty: Difficulty::Beginner,
        duration_minutes: 10,
        layer: "transport".to_string(),
        concepts: vec![
            "three-way handshake".to_string(),
            "sequence numbers".to_string(),
            "connection teardown".to_string(),
        ],
        prerequisites: vec![],
        accents: AccentColors::new([94, 234, 212], [56, 189, 248]),
        description: "Two hosts negotiate, use, and tear down a reliable byte stream."
            .to_string(),
    }
}

pub fn topology() -> ExhibitResult<SceneGraph> {
    let mut scene = SceneGraph::new();
    scene.add_entity("client", Entity::new(Vec3::new(-5.0, 0.0, 0.0), ["server"]))?;
    scene.add_entity("server", Entity::new(Vec3::new(5.0, 0.0, 0.0), ["client"]))?;
    Ok(scene)
}

pub fn choreograph(
    scene: &mut SceneGraph,
    directive: &SceneDirective,
    _accents: AccentColors,
    tl: &mut Timeline,
) {
    match directive.action {
        ActionTag::EmitPacket => {
            let (Some(from), Some(to)) = (&directive.from, &directive.to) else {
                return;
            };
            if let Some(arrival) = packet_flight(tl, scene, from, to, Millis::ZERO) {
                glow_pulse(tl, scene, to, arrival);
            }
        }
        ActionTag::RevealLinks => link_reveal(tl, scene, Millis::ZERO),
        ActionTag::EstablishSession => {
            glow_pulse(tl, scene, "client", Millis::ZERO);
            glow_pulse(tl, scene, "server", Millis::ZERO);
            expanding_ring(tl, scene, "client", Millis::ZERO);
            expanding_ring(tl, scene, "server", Millis(200));
        }
        // Routing actions belong to other exhibits; unknown tags are no-ops.
        _ => {}
    }
}

fn packet(flags: &[&str], seq: Option<u64>, ack: Option<u64>) -> PacketPayload {
    PacketPayload {
        flags: flags.iter().map(|f| f.to_string()).collect(),
        seq,
        ack,
        ..PacketPayload::default()
    }
}

pub fn storyboard() -> ExhibitResult<Storyboard> {
    StoryboardBuilder::new()
        .step(
            StepBuilder::new("closed", "Two strangers")
                .narration(
                    "A client and a server, not yet speaking. Every TCP \
                     connection starts from silence.",
                )
                .action(ActionTag::RevealLinks)
                .camera(Vec3::new(0.0, 6.0, 14.0))
                .highlight(["all"])
                .machine_state("CLOSED")
                .build()?,
        )
        .step(
            StepBuilder::new("syn", "The opening move")
                .narration(
                    "The client sends a SYN segment carrying its initial \
                     sequence number.",
                )
                .action(ActionTag::EmitPacket)
                .from_to("client", "server")
                .camera(Vec3::new(-3.0, 4.0, 10.0))
                .highlight(["client"])
                .focus(["server"])
                .packet(packet(&["SYN"], Some(100), None))
                .machine_state("SYN_SENT")
                .packet_field("seq", "100")
                .glossary("SYN", "synchronize: the flag that opens a connection")
                .glossary(
                    "sequence number",
                    "position of the segment's first byte in the stream",
                )
                .build()?,
        )
        .step(
            StepBuilder::new("syn-ack", "The reply")
                .narration(
                    "The server answers with SYN-ACK: its own sequence number \
                     plus an acknowledgement of the client's.",
                )
                .action(ActionTag::EmitPacket)
                .from_to("server", "client")
                .camera(Vec3::new(3.0, 4.0, 10.0))
                .highlight(["server"])
                .focus(["client"])
                .packet(packet(&["SYN", "ACK"], Some(300), Some(101)))
                .machine_state("SYN_RECEIVED")
                .packet_field("seq", "300")
                .packet_field("ack", "101")
                .glossary("ACK", "acknowledgement of every byte received so far")
                .build()?,
        )
        .step(
            StepBuilder::new("ack", "The handshake completes")
                .narration(
                    "The client acknowledges in turn. Three segments, and both \
                     sides agree the connection exists.",
                )
                .action(ActionTag::EmitPacket)
                .from_to("client", "server")
                .camera(Vec3::new(0.0, 5.0, 12.0))
                .highlight(["client", "server"])
                .packet(packet(&["ACK"], Some(101), Some(301)))
                .machine_state("ESTABLISHED")
                .packet_field("ack", "301")
                .build()?,
        )
        .step(
            StepBuilder::new("established", "A live session")
                .narration("The byte stream is open in both directions.")
                .action(ActionTag::EstablishSession)
                .camera(Vec3::new(0.0, 7.0, 15.0))
                .highlight(["all"])
                .machine_state("ESTABLISHED")
                .build()?,
        )
        .step(
            StepBuilder::new("data", "Data flows")
                .narration(
                    "Application bytes ride in segments; every byte is \
                     numbered and acknowledged.",
                )
                .action(ActionTag::EmitPacket)
                .from_to("client", "server")
                .packet(packet(&["PSH", "ACK"], Some(101), Some(301)))
                .machine_state("ESTABLISHED")
                .build()?,
        )
        .step(
            StepBuilder::new("fin", "Saying goodbye")
                .narration("Either side may close; the client sends FIN.")
                .action(ActionTag::EmitPacket)
                .from_to("client", "server")
                .highlight(["client"])
                .packet(packet(&["FIN", "ACK"], Some(150), Some(301)))
                .machine_state("FIN_WAIT_1")
                .build()?,
        )
        .step(
            StepBuilder::new("closed-again", "Back to silence")
                .narration(
                    "After the teardown exchange both endpoints forget the \
                     connection entirely.",
                )
                .camera(Vec3::new(0.0, 6.0, 14.0))
                .highlight(["all"])
                .machine_state("CLOSED")
                .build()?,
        )
        .build()
}
