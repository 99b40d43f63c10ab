//! The exhibit registry: an explicit mapping from numeric exhibit id to the
//! factories that produce its storyboard and scene controller. Replaces any
//! string-convention module lookup; swapping in a different mapping strategy
//! does not touch the playback engine.

pub mod bgp;
pub mod tcp;

use std::collections::BTreeMap;

use crate::{
    catalog::{Catalog, ExhibitMeta},
    controller::{ExhibitController, SceneController},
    core::AccentColors,
    error::{ExhibitError, ExhibitResult},
    storyboard::Storyboard,
};

pub struct ExhibitDef {
    pub meta: ExhibitMeta,
    pub storyboard: fn() -> ExhibitResult<Storyboard>,
    pub scene: fn(AccentColors) -> ExhibitResult<Box<dyn SceneController>>,
}

pub struct Registry {
    defs: BTreeMap<u32, ExhibitDef>,
    default_id: u32,
}

impl Registry {
    pub fn new(default_id: u32) -> Self {
        Self {
            defs: BTreeMap::new(),
            default_id,
        }
    }

    /// Registry with the two reference exhibits; TCP is the fallback default.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new(tcp::ID);
        registry.register(ExhibitDef {
            meta: tcp::meta(),
            storyboard: tcp::storyboard,
            scene: |accents| {
                Ok(Box::new(ExhibitController::new(
                    tcp::topology()?,
                    tcp::choreograph,
                    accents,
                )))
            },
        });
        registry.register(ExhibitDef {
            meta: bgp::meta(),
            storyboard: bgp::storyboard,
            scene: |accents| {
                Ok(Box::new(ExhibitController::new(
                    bgp::topology()?,
                    bgp::choreograph,
                    accents,
                )))
            },
        });
        registry
    }

    pub fn register(&mut self, def: ExhibitDef) {
        self.defs.insert(def.meta.id, def);
    }

    pub fn default_id(&self) -> u32 {
        self.default_id
    }

    pub fn get(&self, id: u32) -> Option<&ExhibitDef> {
        self.defs.get(&id)
    }

    pub fn storyboard(&self, id: u32) -> ExhibitResult<Storyboard> {
        let def = self
            .defs
            .get(&id)
            .ok_or_else(|| ExhibitError::scene(format!("unknown exhibit id {id}")))?;
        (def.storyboard)()
    }

    pub fn build_scene(
        &self,
        id: u32,
        accents: AccentColors,
    ) -> ExhibitResult<Box<dyn SceneController>> {
        let def = self
            .defs
            .get(&id)
            .ok_or_else(|| ExhibitError::scene(format!("unknown exhibit id {id}")))?;
        (def.scene)(accents)
    }

    pub fn catalog(&self) -> Catalog {
        Catalog::new(self.defs.values().map(|d| d.meta.clone()).collect())
    }
}
