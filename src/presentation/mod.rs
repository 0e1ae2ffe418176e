//! Mediates between "a statement became active" and the host's speech and
//! choice-rendering capabilities.
//!
//! The middleware owns exactly two pieces of shared presentation state: the
//! single active choice set and the at-most-one in-flight speech request.
//! Presenting a new turn always clears the previous one (last-writer-wins,
//! no queueing), and speech completion is only accepted for the current
//! handle, so a restart leaves any late completion as a no-op.

use std::fmt;

/// Key identifying one presented choice: the owning node plus the statement
/// socket or control it came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChoiceKey {
    pub node_id: String,
    pub statement: String,
}

impl ChoiceKey {
    pub fn new(node_id: impl Into<String>, statement: impl Into<String>) -> Self {
        Self {
            node_id: node_id.into(),
            statement: statement.into(),
        }
    }
}

impl fmt::Display for ChoiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.node_id, self.statement)
    }
}

/// One currently selectable statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Choice {
    pub key: ChoiceKey,
    pub text: String,
    pub points: f64,
}

/// Token identifying one speech request. Completion reported with a stale
/// handle is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpeechHandle(u64);

/// A pending hand-off to the host's speech capability.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechRequest {
    pub handle: SpeechHandle,
    pub text: String,
}

/// Shared presentation state between the interpreter and the host UI.
#[derive(Debug)]
pub struct DialogMiddleware {
    choices: Vec<Choice>,
    speaking: Option<SpeechRequest>,
    next_handle: u64,
    speech_rate: f32,
}

impl Default for DialogMiddleware {
    fn default() -> Self {
        Self {
            choices: Vec::new(),
            speaking: None,
            next_handle: 0,
            speech_rate: 2.0,
        }
    }
}

impl DialogMiddleware {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a statement as currently selectable.
    pub fn present_choice(&mut self, choice: Choice) {
        self.choices.push(choice);
    }

    /// The current choice set, in presentation order.
    pub fn choices(&self) -> &[Choice] {
        &self.choices
    }

    pub fn choice(&self, key: &ChoiceKey) -> Option<&Choice> {
        self.choices.iter().find(|c| &c.key == key)
    }

    /// Removes all presented choices. Idempotent; called at the start of
    /// every new dialog turn and on scenario end or restart.
    pub fn clear_choices(&mut self) {
        self.choices.clear();
    }

    /// Keeps only the picked choice visible while it is being spoken.
    pub fn retain_choice(&mut self, key: &ChoiceKey) {
        self.choices.retain(|c| &c.key == key);
    }

    /// Hands text to the speech capability, replacing any request still in
    /// flight. At most one statement is being spoken at a time.
    pub fn begin_speech(&mut self, text: impl Into<String>) -> SpeechHandle {
        self.next_handle += 1;
        let handle = SpeechHandle(self.next_handle);
        self.speaking = Some(SpeechRequest {
            handle,
            text: text.into(),
        });
        handle
    }

    /// The speech request currently awaiting completion, if any.
    pub fn speaking(&self) -> Option<&SpeechRequest> {
        self.speaking.as_ref()
    }

    /// Marks a speech request finished. Returns false for stale handles,
    /// whose late completion must have no effect.
    pub fn finish_speech(&mut self, handle: SpeechHandle) -> bool {
        match &self.speaking {
            Some(request) if request.handle == handle => {
                self.speaking = None;
                true
            }
            _ => false,
        }
    }

    /// Playback rate hint for the host's synthesizer. Never consulted by the
    /// interpreter.
    pub fn speech_rate(&self) -> f32 {
        self.speech_rate
    }

    pub fn set_speech_rate(&mut self, rate: f32) {
        self.speech_rate = rate;
    }

    /// Drops every presented choice and any in-flight speech request.
    pub fn reset(&mut self) {
        self.choices.clear();
        self.speaking = None;
    }
}
