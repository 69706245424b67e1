//! Per-request orchestration state

use crate::types::{CompletionOptions, ToolDescriptor, ToolResult, Transcript};

/// Where one orchestration call currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    FirstCompletion,
    Executing,
    ContinueDecision,
    FinalCompletion,
    Done,
}

/// Everything one `Orchestrator::run` call owns
///
/// Built fresh for every request and passed by reference; the working
/// transcript is a copy, the caller's transcript is never touched.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub transcript: Transcript,
    pub catalog: Vec<ToolDescriptor>,
    pub options: CompletionOptions,
    pub results: Vec<ToolResult>,
    pub rounds: u32,
    states: Vec<LoopState>,
}

impl RequestContext {
    pub fn new(transcript: &Transcript, catalog: Vec<ToolDescriptor>, options: CompletionOptions) -> Self {
        Self {
            transcript: transcript.clone(),
            catalog,
            options,
            results: Vec::new(),
            rounds: 0,
            states: Vec::new(),
        }
    }

    /// Current state, `None` before the first transition
    pub fn state(&self) -> Option<LoopState> {
        self.states.last().copied()
    }

    pub fn transition(&mut self, next: LoopState) {
        self.states.push(next);
    }

    /// Every state entered so far, in order
    pub fn states(&self) -> &[LoopState] {
        &self.states
    }

    pub fn into_states(self) -> Vec<LoopState> {
        self.states
    }
}
