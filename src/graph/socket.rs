use serde::{Deserialize, Serialize};

/// Socket carrying the incoming control-flow signal on most nodes.
pub const EXECUTE: &str = "execute";
/// Socket forwarding the control-flow signal once a node has finished.
pub const EXECUTED: &str = "executed";
/// Single output of a start node.
pub const START: &str = "start";
/// Single input of an end node.
pub const END: &str = "end";
/// Scope passthrough input.
pub const SCOPE_IN: &str = "in";
/// Scope passthrough output.
pub const SCOPE_OUT: &str = "out";
/// Data-flow socket carrying a point value, pulled on demand.
pub const POINTS: &str = "points";
/// Output and control of a summary node holding the aggregated total.
pub const SUMMARY: &str = "summary";

/// Statement sockets and controls share this name prefix ("statement1", "statement42", ...).
pub const STATEMENT_PREFIX: &str = "statement";
/// Summary fan-in inputs share this name prefix ("points", "points_<id>", ...).
pub const POINTS_PREFIX: &str = "points";

/// Control holding the currently selected statement name on a dialog node.
pub const SELECTED_STATEMENT: &str = "selectedStatement";
/// Flag control set once a start node has fired.
pub const STARTED: &str = "started";
/// Flag control set once an end or summary node has fired.
pub const ENDED: &str = "ended";
/// Select control naming the character delivering a statement.
pub const PERSON: &str = "person";
/// Hint title control.
pub const TITLE: &str = "title";
/// Hint body control.
pub const TEXT: &str = "text";

/// The atomic unit of spoken or selectable dialog content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    pub text: String,
    pub points: f64,
    /// Reserved timing field. Parsed and persisted, never consulted by the interpreter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<String>,
}

impl Statement {
    pub fn new(text: impl Into<String>, points: f64) -> Self {
        Self {
            text: text.into(),
            points,
            delay: None,
        }
    }
}

/// Wire-level discriminator for control values, matching the persisted `"type"` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlKind {
    Text,
    Number,
    Select,
    Statement,
    Textarea,
}

/// An editable named value attached to a node or input socket.
///
/// Controls are authoring metadata, not connection endpoints; the interpreter
/// also uses a few well-known ones (`started`, `ended`, `points`, `summary`,
/// `selectedStatement`) as its runtime flags.
#[derive(Debug, Clone, PartialEq)]
pub enum Control {
    Text(String),
    Number(f64),
    Select(String),
    TextArea(String),
    Statement(Statement),
}

impl Control {
    pub fn kind(&self) -> ControlKind {
        match self {
            Control::Text(_) => ControlKind::Text,
            Control::Number(_) => ControlKind::Number,
            Control::Select(_) => ControlKind::Select,
            Control::TextArea(_) => ControlKind::Textarea,
            Control::Statement(_) => ControlKind::Statement,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Control::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Control::Text(s) | Control::Select(s) | Control::TextArea(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_statement(&self) -> Option<&Statement> {
        match self {
            Control::Statement(s) => Some(s),
            _ => None,
        }
    }

    /// Text control used as a boolean runtime flag ("true"/"false").
    pub fn flag(value: bool) -> Self {
        Control::Text(if value { "true" } else { "false" }.to_string())
    }

    pub fn is_set(&self) -> bool {
        matches!(self, Control::Text(s) if s == "true")
    }
}

/// A named input connection point on a node.
///
/// Player-response statements live as controls attached to input sockets on
/// an NPC node; plain control-flow inputs carry no control.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InputSocket {
    pub control: Option<Control>,
}

impl InputSocket {
    pub fn plain() -> Self {
        Self { control: None }
    }

    pub fn with_control(control: Control) -> Self {
        Self {
            control: Some(control),
        }
    }

    pub fn statement(&self) -> Option<&Statement> {
        self.control.as_ref().and_then(Control::as_statement)
    }
}
