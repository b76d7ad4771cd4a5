use log::{debug, info, warn};
use quire_model::{NormalizeReport, SourceShape};
use std::fmt;
use std::time::{Duration, Instant};

/// Lifecycle of one export call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportState {
    Idle,
    Normalizing,
    Highlighting,
    Rendering,
    Assembling,
    Serializing,
    Succeeded,
    Failed,
}

impl ExportState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ExportState::Succeeded | ExportState::Failed)
    }

    fn next(&self) -> Option<ExportState> {
        use ExportState::*;
        match self {
            Idle => Some(Normalizing),
            Normalizing => Some(Highlighting),
            Highlighting => Some(Rendering),
            Rendering => Some(Assembling),
            Assembling => Some(Serializing),
            Serializing => Some(Succeeded),
            Succeeded | Failed => None,
        }
    }

    /// Forward one step, or to `Failed` from any non-terminal state.
    pub fn can_transition_to(&self, target: ExportState) -> bool {
        if self.is_terminal() {
            return false;
        }
        target == ExportState::Failed || self.next() == Some(target)
    }
}

impl fmt::Display for ExportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExportState::Idle => "idle",
            ExportState::Normalizing => "normalizing",
            ExportState::Highlighting => "highlighting",
            ExportState::Rendering => "rendering",
            ExportState::Assembling => "assembling",
            ExportState::Serializing => "serializing",
            ExportState::Succeeded => "succeeded",
            ExportState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Counters for everything the export recovered from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics {
    pub source_shape: SourceShape,
    /// The input was unusable and an empty placeholder document was exported.
    pub placeholder_document: bool,
    pub skipped_entries: usize,
    pub repaired_ids: usize,
    pub code_blocks: usize,
    pub highlight_fallbacks: usize,
    /// Code blocks served from the per-export token cache.
    pub highlight_cache_hits: usize,
    pub rendered_blocks: usize,
    pub degraded_blocks: usize,
    pub image_placeholders: usize,
    pub page_count: usize,
}

impl Diagnostics {
    pub fn record_normalization(&mut self, report: &NormalizeReport) {
        self.source_shape = report.shape;
        self.placeholder_document = report.recovered.is_some();
        self.skipped_entries = report.skipped_entries;
        self.repaired_ids = report.repaired_ids;
    }

    /// True when nothing had to be recovered.
    pub fn is_clean(&self) -> bool {
        !self.placeholder_document
            && self.skipped_entries == 0
            && self.repaired_ids == 0
            && self.highlight_fallbacks == 0
            && self.degraded_blocks == 0
            && self.image_placeholders == 0
    }
}

/// Per-call state: the current stage, every stage visited and the
/// diagnostics gathered so far. Never shared between exports.
#[derive(Debug)]
pub struct ExportContext {
    state: ExportState,
    history: Vec<ExportState>,
    pub diagnostics: Diagnostics,
    started: Instant,
    stage_started: Instant,
}

impl Default for ExportContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ExportContext {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            state: ExportState::Idle,
            history: vec![ExportState::Idle],
            diagnostics: Diagnostics::default(),
            started: now,
            stage_started: now,
        }
    }

    pub fn state(&self) -> ExportState {
        self.state
    }

    pub fn history(&self) -> &[ExportState] {
        &self.history
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Moves to `target`. Illegal transitions are ignored and logged; the
    /// orchestrator only requests legal ones.
    pub fn transition(&mut self, target: ExportState) {
        if !self.state.can_transition_to(target) {
            warn!("Ignoring export state change {} -> {}", self.state, target);
            return;
        }
        debug!("{} finished in {:.2?}", self.state, self.stage_started.elapsed());
        self.stage_started = Instant::now();
        self.state = target;
        self.history.push(target);
        match target {
            ExportState::Succeeded => info!("Export succeeded in {:.2?}", self.elapsed()),
            ExportState::Failed => info!("Export failed after {:.2?}", self.elapsed()),
            stage => info!("Export stage: {}", stage),
        }
    }

    pub fn into_parts(self) -> (Vec<ExportState>, Diagnostics) {
        (self.history, self.diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walks_the_happy_path() {
        let mut ctx = ExportContext::new();
        for state in [
            ExportState::Normalizing,
            ExportState::Highlighting,
            ExportState::Rendering,
            ExportState::Assembling,
            ExportState::Serializing,
            ExportState::Succeeded,
        ] {
            ctx.transition(state);
        }
        assert_eq!(ctx.state(), ExportState::Succeeded);
        assert_eq!(ctx.history().len(), 7);
    }

    #[test]
    fn skipping_a_stage_is_refused() {
        let mut ctx = ExportContext::new();
        ctx.transition(ExportState::Rendering);
        assert_eq!(ctx.state(), ExportState::Idle);
    }

    #[test]
    fn failure_is_terminal() {
        let mut ctx = ExportContext::new();
        ctx.transition(ExportState::Normalizing);
        ctx.transition(ExportState::Failed);
        ctx.transition(ExportState::Highlighting);
        assert_eq!(ctx.history(), &[ExportState::Idle, ExportState::Normalizing, ExportState::Failed]);
    }

    #[test]
    fn clean_diagnostics() {
        let mut diagnostics = Diagnostics::default();
        assert!(diagnostics.is_clean());
        diagnostics.degraded_blocks = 1;
        assert!(!diagnostics.is_clean());
    }
}
