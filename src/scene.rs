use std::collections::BTreeMap;

use crate::{
    core::Vec3,
    error::{ExhibitError, ExhibitResult},
};

/// Emissive intensity of a highlighted entity.
pub const EMISSIVE_HIGHLIGHT: f64 = 1.0;
/// Resting emissive intensity.
pub const EMISSIVE_BASE: f64 = 0.35;
/// Emissive intensity of a dimmed entity.
pub const EMISSIVE_DIM: f64 = 0.05;
/// Opacity of a dimmed entity.
pub const OPACITY_DIM: f64 = 0.25;

/// Group tags accepted in a directive's highlight list.
const GROUP_TAGS: [&str; 2] = ["all", "topology"];

/// A named node in the scene. Topology (`peers`) is fixed at construction;
/// only the visual fields mutate at runtime.
#[derive(Clone, Debug, serde::Serialize)]
pub struct Entity {
    pub position: Vec3,
    pub peers: Vec<String>,
    pub emissive: f64,
    pub opacity: f64,
    pub glow: f64,
}

impl Entity {
    pub fn new(position: Vec3, peers: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            position,
            peers: peers.into_iter().map(Into::into).collect(),
            emissive: EMISSIVE_BASE,
            opacity: 1.0,
            glow: 0.0,
        }
    }
}

/// Handle to a transient visual object spawned by a choreography.
///
/// Ids are allocated from a monotone counter and never reused, so disposing a
/// stale handle is always a safe no-op.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct TransientId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum TransientKind {
    Packet,
    Ring,
    Arc,
}

#[derive(Clone, Debug, serde::Serialize)]
pub struct Transient {
    pub kind: TransientKind,
    pub position: Vec3,
    pub opacity: f64,
    pub scale: f64,
}

#[derive(Clone, Copy, Debug, serde::Serialize)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 6.0, 14.0),
            target: Vec3::ZERO,
        }
    }
}

/// The retained scene: entity registry, transient slab, camera.
///
/// Owned exclusively by one scene controller; a renderer observes it through
/// [`SceneSnapshot`] and never mutates it.
#[derive(Clone, Debug, Default)]
pub struct SceneGraph {
    entities: BTreeMap<String, Entity>,
    transients: BTreeMap<TransientId, Transient>,
    next_transient: u64,
    pub camera: Camera,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity. Topology is built once at controller construction;
    /// duplicate ids are a construction bug and are reported as errors.
    pub fn add_entity(&mut self, id: impl Into<String>, entity: Entity) -> ExhibitResult<()> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ExhibitError::scene("entity id must be non-empty"));
        }
        if self.entities.contains_key(&id) {
            return Err(ExhibitError::scene(format!("duplicate entity id '{id}'")));
        }
        self.entities.insert(id, entity);
        Ok(())
    }

    pub fn entity(&self, id: &str) -> Option<&Entity> {
        self.entities.get(id)
    }

    pub fn entity_mut(&mut self, id: &str) -> Option<&mut Entity> {
        self.entities.get_mut(id)
    }

    pub fn entity_ids(&self) -> impl Iterator<Item = &str> {
        self.entities.keys().map(String::as_str)
    }

    pub fn spawn_transient(&mut self, kind: TransientKind, position: Vec3) -> TransientId {
        let id = TransientId(self.next_transient);
        self.next_transient += 1;
        self.transients.insert(
            id,
            Transient {
                kind,
                position,
                opacity: 1.0,
                scale: 1.0,
            },
        );
        id
    }

    /// Release a transient. Idempotent: disposing an already-disposed handle
    /// does nothing.
    pub fn dispose_transient(&mut self, id: TransientId) {
        self.transients.remove(&id);
    }

    pub fn transient(&self, id: TransientId) -> Option<&Transient> {
        self.transients.get(&id)
    }

    pub fn transient_mut(&mut self, id: TransientId) -> Option<&mut Transient> {
        self.transients.get_mut(&id)
    }

    pub fn live_transients(&self) -> impl Iterator<Item = (TransientId, &Transient)> {
        self.transients.iter().map(|(id, t)| (*id, t))
    }

    /// Emphasize `highlight` entities and de-emphasize everything not in
    /// `highlight` or `focus`. Targets are absolute values, so applying the
    /// same lists twice yields the same visual state as applying them once.
    /// Unknown ids and group tags outside the known set are skipped.
    pub fn apply_highlight(&mut self, highlight: &[String], focus: &[String]) {
        if highlight.is_empty() && focus.is_empty() {
            return;
        }

        let highlight_all = highlight.iter().any(|h| GROUP_TAGS.contains(&h.as_str()));

        for (id, entity) in &mut self.entities {
            let highlighted =
                highlight_all || highlight.iter().any(|h| h == id);
            let focused = focus.iter().any(|f| f == id);

            if highlighted {
                entity.emissive = EMISSIVE_HIGHLIGHT;
                entity.glow = 1.0;
                entity.opacity = 1.0;
            } else if focused {
                entity.emissive = EMISSIVE_BASE;
                entity.glow = 0.0;
                entity.opacity = 1.0;
            } else {
                entity.emissive = EMISSIVE_DIM;
                entity.glow = 0.0;
                entity.opacity = OPACITY_DIM;
            }
        }
    }

    /// Drop all entities and transients. Used by controller disposal.
    pub fn clear(&mut self) {
        self.entities.clear();
        self.transients.clear();
    }

    pub fn snapshot(&self) -> SceneSnapshot {
        SceneSnapshot {
            camera: self.camera,
            entities: self.entities.clone(),
            transients: self.transients.values().cloned().collect(),
        }
    }
}

/// Read-only view of the scene for renderers, the CLI, and tests.
#[derive(Clone, Debug, serde::Serialize)]
pub struct SceneSnapshot {
    pub camera: Camera,
    pub entities: BTreeMap<String, Entity>,
    pub transients: Vec<Transient>,
}
