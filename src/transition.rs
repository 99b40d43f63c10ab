//! Scripted terminal-style transition: a fixed list of timed text lines
//! revealed in order, then a fire-once completion callback. Presentation
//! glue around exhibit navigation; the engine only relies on the no-argument,
//! fire-once `on_complete` contract.

use crate::core::Millis;

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct TransitionLine {
    pub at: Millis,
    pub text: String,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct TransitionScript {
    pub lines: Vec<TransitionLine>,
    /// Hold time after the last line before completion fires.
    pub hold: Millis,
}

impl TransitionScript {
    pub fn total_duration(&self) -> Millis {
        self.lines
            .iter()
            .map(|l| l.at)
            .max()
            .unwrap_or(Millis::ZERO)
            .saturating_add(self.hold)
    }
}

/// One execution of a script. `tick` reveals due lines and fires the
/// completion callback exactly once when the script has run its course.
pub struct TransitionRun {
    script: TransitionScript,
    started: Millis,
    revealed: usize,
    on_complete: Option<Box<dyn FnOnce()>>,
}

impl TransitionRun {
    pub fn start(
        script: TransitionScript,
        now: Millis,
        on_complete: impl FnOnce() + 'static,
    ) -> Self {
        Self {
            script,
            started: now,
            revealed: 0,
            on_complete: Some(Box::new(on_complete)),
        }
    }

    /// Lines revealed so far, in script order.
    pub fn visible_lines(&self) -> impl Iterator<Item = &str> {
        self.script.lines[..self.revealed]
            .iter()
            .map(|l| l.text.as_str())
    }

    pub fn is_complete(&self) -> bool {
        self.on_complete.is_none()
    }

    pub fn tick(&mut self, now: Millis) {
        let local = now.saturating_sub(self.started);

        while self.revealed < self.script.lines.len()
            && local >= self.script.lines[self.revealed].at
        {
            self.revealed += 1;
        }

        if self.revealed == self.script.lines.len()
            && local >= self.script.total_duration()
            && let Some(done) = self.on_complete.take()
        {
            done();
        }
    }
}
