use crate::{
    core::Vec3,
    error::{ExhibitError, ExhibitResult},
    storyboard::{
        ActionTag, GlossaryTerm, Instruments, PacketField, PacketPayload, SceneDirective,
        Storyboard, StoryboardStep,
    },
};

pub struct StoryboardBuilder {
    steps: Vec<StoryboardStep>,
}

impl StoryboardBuilder {
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    pub fn step(mut self, step: StoryboardStep) -> Self {
        self.steps.push(step);
        self
    }

    pub fn build(self) -> ExhibitResult<Storyboard> {
        let sb = Storyboard { steps: self.steps };
        sb.validate()?;
        Ok(sb)
    }
}

impl Default for StoryboardBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub struct StepBuilder {
    id: String,
    title: String,
    narration: String,
    scene: Option<SceneDirective>,
    instruments: Option<Instruments>,
}

impl StepBuilder {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            narration: String::new(),
            scene: None,
            instruments: None,
        }
    }

    pub fn narration(mut self, text: impl Into<String>) -> Self {
        self.narration = text.into();
        self
    }

    pub fn action(mut self, action: ActionTag) -> Self {
        self.scene_mut().action = action;
        self
    }

    pub fn from_to(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        let scene = self.scene_mut();
        scene.from = Some(from.into());
        scene.to = Some(to.into());
        self
    }

    pub fn at(mut self, at: impl Into<String>) -> Self {
        self.scene_mut().at = Some(at.into());
        self
    }

    pub fn camera(mut self, pose: Vec3) -> Self {
        self.scene_mut().camera = Some(pose);
        self
    }

    pub fn highlight(mut self, ids: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.scene_mut().highlight = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn focus(mut self, ids: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.scene_mut().focus = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn packet(mut self, packet: PacketPayload) -> Self {
        self.scene_mut().packet = Some(packet);
        self
    }

    pub fn machine_state(mut self, state: impl Into<String>) -> Self {
        self.instruments_mut().machine_state = Some(state.into());
        self
    }

    pub fn packet_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.instruments_mut().packet_fields.push(PacketField {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    pub fn glossary(mut self, term: impl Into<String>, definition: impl Into<String>) -> Self {
        self.instruments_mut().glossary.push(GlossaryTerm {
            term: term.into(),
            definition: definition.into(),
        });
        self
    }

    pub fn build(self) -> ExhibitResult<StoryboardStep> {
        if self.id.trim().is_empty() {
            return Err(ExhibitError::validation("step id must be non-empty"));
        }
        Ok(StoryboardStep {
            id: self.id,
            title: self.title,
            narration: self.narration,
            scene: self.scene,
            instruments: self.instruments,
        })
    }

    fn scene_mut(&mut self) -> &mut SceneDirective {
        self.scene.get_or_insert_with(SceneDirective::default)
    }

    fn instruments_mut(&mut self) -> &mut Instruments {
        self.instruments.get_or_insert_with(Instruments::default)
    }
}
