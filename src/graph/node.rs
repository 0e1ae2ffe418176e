use crate::graph::socket::{
    self, Control, ENDED, EXECUTE, EXECUTED, InputSocket, POINTS, POINTS_PREFIX,
    SELECTED_STATEMENT, STARTED, STATEMENT_PREFIX, Statement, SUMMARY,
};
use indexmap::{IndexMap, IndexSet};
use std::fmt;

/// The closed set of executable node kinds in a dialog graph.
///
/// The abstract base node of the original authoring tool is never
/// instantiated; a persisted document naming it (or anything else outside
/// this set) fails to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Start,
    End,
    Scope,
    NpcStatement,
    PlayerStatementGroup,
    Hint,
    SummaryPoints,
}

impl NodeKind {
    pub const ALL: [NodeKind; 7] = [
        NodeKind::Start,
        NodeKind::End,
        NodeKind::Scope,
        NodeKind::NpcStatement,
        NodeKind::PlayerStatementGroup,
        NodeKind::Hint,
        NodeKind::SummaryPoints,
    ];

    /// The `nodeType` string used by the persisted document.
    pub fn wire_name(self) -> &'static str {
        match self {
            NodeKind::Start => "StartNode",
            NodeKind::End => "EndNode",
            NodeKind::Scope => "ParentNode",
            NodeKind::NpcStatement => "NPCNode",
            NodeKind::PlayerStatementGroup => "StatementNode",
            NodeKind::Hint => "HintNode",
            NodeKind::SummaryPoints => "SummaryPointsNode",
        }
    }

    pub fn from_wire(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.wire_name() == name)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// A typed unit of dialog logic: named sockets, editable controls, and an
/// authoring position.
///
/// Control and socket tables keep authored insertion order; save/load must
/// round-trip them untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: String,
    pub kind: NodeKind,
    pub name: String,
    pub position: [f64; 2],
    /// Optional enclosing scope node id. Authoring grouping only; never
    /// consulted by the interpreter.
    pub parent: Option<String>,
    pub controls: IndexMap<String, Control>,
    pub inputs: IndexMap<String, InputSocket>,
    pub outputs: IndexSet<String>,
}

impl Node {
    /// Structural shape of a node kind: implicit sockets plus the runtime
    /// flag controls, with no authoring defaults. This is the base that
    /// persisted definitions are merged onto.
    pub fn bare(kind: NodeKind, id: impl Into<String>) -> Self {
        let mut node = Self {
            id: id.into(),
            kind,
            name: kind.wire_name().to_string(),
            position: [0.0, 0.0],
            parent: None,
            controls: IndexMap::new(),
            inputs: IndexMap::new(),
            outputs: IndexSet::new(),
        };
        // Implicit execute/executed pair unless the kind overrides it.
        match kind {
            NodeKind::Start => {
                node.outputs.insert(socket::START.to_string());
                node.controls
                    .insert(STARTED.to_string(), Control::flag(false));
            }
            NodeKind::End => {
                node.inputs
                    .insert(socket::END.to_string(), InputSocket::plain());
                node.controls
                    .insert(ENDED.to_string(), Control::flag(false));
            }
            NodeKind::Scope => {
                node.inputs
                    .insert(EXECUTE.to_string(), InputSocket::plain());
                node.inputs
                    .insert(socket::SCOPE_IN.to_string(), InputSocket::plain());
                node.outputs.insert(EXECUTED.to_string());
                node.outputs.insert(socket::SCOPE_OUT.to_string());
            }
            NodeKind::NpcStatement => {
                node.inputs
                    .insert(EXECUTE.to_string(), InputSocket::plain());
                node.outputs.insert(EXECUTED.to_string());
                node.controls.insert(
                    SELECTED_STATEMENT.to_string(),
                    Control::Text(String::new()),
                );
                node.controls.insert(POINTS.to_string(), Control::Number(0.0));
            }
            NodeKind::PlayerStatementGroup => {
                node.inputs
                    .insert(EXECUTE.to_string(), InputSocket::plain());
                node.outputs.insert(EXECUTED.to_string());
                node.outputs.insert(POINTS.to_string());
                node.controls.insert(
                    SELECTED_STATEMENT.to_string(),
                    Control::Text(String::new()),
                );
                node.controls.insert(POINTS.to_string(), Control::Number(0.0));
            }
            NodeKind::Hint => {
                node.inputs
                    .insert(EXECUTE.to_string(), InputSocket::plain());
                node.outputs.insert(EXECUTED.to_string());
                node.controls
                    .insert(socket::TITLE.to_string(), Control::Text(String::new()));
                node.controls
                    .insert(socket::TEXT.to_string(), Control::TextArea(String::new()));
            }
            NodeKind::SummaryPoints => {
                node.inputs
                    .insert(EXECUTE.to_string(), InputSocket::plain());
                node.outputs.insert(EXECUTED.to_string());
                node.outputs.insert(SUMMARY.to_string());
                node.controls
                    .insert(SUMMARY.to_string(), Control::Number(0.0));
                node.controls
                    .insert(ENDED.to_string(), Control::flag(false));
            }
        }
        node
    }

    /// Authoring shape: the structural shape plus the default entries a
    /// freshly placed node carries in the editor (person select, first
    /// statement).
    pub fn with_defaults(kind: NodeKind, id: impl Into<String>) -> Self {
        let mut node = Self::bare(kind, id);
        match kind {
            NodeKind::NpcStatement => {
                node.controls.insert(
                    socket::PERSON.to_string(),
                    Control::Select("Wanda".to_string()),
                );
                node.add_statement_input("statement1", Statement::new("Type text", 0.0));
                node.set_control_text(SELECTED_STATEMENT, "statement1");
            }
            NodeKind::PlayerStatementGroup => {
                node.controls.insert(
                    socket::PERSON.to_string(),
                    Control::Select("Doctor".to_string()),
                );
                node.add_statement_control("statement1", Statement::new("Type text", 0.0));
            }
            _ => {}
        }
        node
    }

    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.position = [x, y];
        self
    }

    pub fn add_input(&mut self, name: impl Into<String>, socket: InputSocket) {
        self.inputs.insert(name.into(), socket);
    }

    pub fn add_output(&mut self, name: impl Into<String>) {
        self.outputs.insert(name.into());
    }

    pub fn has_input(&self, name: &str) -> bool {
        self.inputs.contains_key(name)
    }

    pub fn has_output(&self, name: &str) -> bool {
        self.outputs.contains(name)
    }

    pub fn control(&self, name: &str) -> Option<&Control> {
        self.controls.get(name)
    }

    pub fn set_control(&mut self, name: impl Into<String>, control: Control) {
        self.controls.insert(name.into(), control);
    }

    /// Numeric control value, zero when absent or non-numeric.
    pub fn control_number(&self, name: &str) -> f64 {
        self.control(name).and_then(Control::as_number).unwrap_or(0.0)
    }

    pub fn set_control_number(&mut self, name: impl Into<String>, value: f64) {
        self.controls.insert(name.into(), Control::Number(value));
    }

    pub fn control_text(&self, name: &str) -> Option<&str> {
        self.control(name).and_then(Control::as_text)
    }

    pub fn set_control_text(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.controls.insert(name.into(), Control::Text(value.into()));
    }

    /// Boolean runtime flag control ("started", "ended").
    pub fn flag(&self, name: &str) -> bool {
        self.control(name).is_some_and(Control::is_set)
    }

    pub fn set_flag(&mut self, name: impl Into<String>, value: bool) {
        self.controls.insert(name.into(), Control::flag(value));
    }

    /// Statement entries living on input sockets (NPC nodes), authored order.
    pub fn statement_inputs(&self) -> impl Iterator<Item = (&str, &Statement)> {
        self.inputs.iter().filter_map(|(name, socket)| {
            if !name.starts_with(STATEMENT_PREFIX) {
                return None;
            }
            socket.statement().map(|s| (name.as_str(), s))
        })
    }

    /// Statement entries living as controls (player statement groups), authored order.
    pub fn statement_controls(&self) -> impl Iterator<Item = (&str, &Statement)> {
        self.controls.iter().filter_map(|(name, control)| {
            if !name.starts_with(STATEMENT_PREFIX) {
                return None;
            }
            control.as_statement().map(|s| (name.as_str(), s))
        })
    }

    /// Looks a statement up by name on either an input socket or a control.
    pub fn statement(&self, name: &str) -> Option<&Statement> {
        self.inputs
            .get(name)
            .and_then(InputSocket::statement)
            .or_else(|| self.control(name).and_then(Control::as_statement))
    }

    /// Adds a statement as an input socket carrying a statement control.
    pub fn add_statement_input(&mut self, name: impl Into<String>, statement: Statement) {
        self.inputs.insert(
            name.into(),
            InputSocket::with_control(Control::Statement(statement)),
        );
    }

    /// Adds a statement control together with its same-named output socket.
    pub fn add_statement_control(&mut self, name: impl Into<String>, statement: Statement) {
        let name = name.into();
        self.controls
            .insert(name.clone(), Control::Statement(statement));
        self.outputs.insert(name);
    }

    /// Removes a statement entry wherever it lives, together with the
    /// same-named output of a control-based statement. A dangling
    /// `selectedStatement` left behind is handled at resolution time.
    pub fn remove_statement(&mut self, name: &str) -> bool {
        let from_input = self
            .inputs
            .get(name)
            .is_some_and(|s| s.statement().is_some())
            && self.inputs.shift_remove(name).is_some();
        let from_control = self
            .control(name)
            .is_some_and(|c| c.as_statement().is_some())
            && self.controls.shift_remove(name).is_some();
        if from_control {
            self.outputs.shift_remove(name);
        }
        from_input || from_control
    }

    /// The currently selected statement input, falling back to the only
    /// statement when exactly one exists and no explicit selection is set.
    pub fn selected_statement(&self) -> Option<&str> {
        let explicit = self
            .control_text(SELECTED_STATEMENT)
            .filter(|name| !name.is_empty());
        if let Some(name) = explicit {
            if self.statement(name).is_some() {
                return Some(name);
            }
        }
        let mut statements = self.statement_inputs();
        match (statements.next(), statements.next()) {
            (Some((name, _)), None) => Some(name),
            _ => None,
        }
    }

    /// Side-effect-free data-flow snapshot of one output socket, consumed by
    /// the pull-based aggregator. Only point-carrying sockets yield values.
    pub fn data(&self, output: &str) -> Option<f64> {
        if !self.outputs.contains(output) {
            return None;
        }
        if output == POINTS {
            self.control(POINTS).and_then(Control::as_number)
        } else if output == SUMMARY {
            self.control(SUMMARY).and_then(Control::as_number)
        } else {
            None
        }
    }

    /// Clears the runtime state a previous run may have written, leaving the
    /// authored structure untouched. Used by scenario restart.
    ///
    /// On an NPC node `selectedStatement` is the operator's design-time
    /// choice and survives a restart; on a player group it records the
    /// player's pick and is cleared.
    pub fn reset_runtime_state(&mut self) {
        let design_time_selection = self.kind == NodeKind::NpcStatement;
        for (name, control) in self.controls.iter_mut() {
            match name.as_str() {
                STARTED | ENDED => *control = Control::flag(false),
                SELECTED_STATEMENT if !design_time_selection => {
                    *control = Control::Text(String::new())
                }
                POINTS | SUMMARY => {
                    if matches!(control, Control::Number(_)) {
                        *control = Control::Number(0.0);
                    }
                }
                _ => {}
            }
        }
    }

    /// True when the input name marks a summary fan-in socket.
    pub fn is_points_input(name: &str) -> bool {
        name.starts_with(POINTS_PREFIX)
    }
}
