//! Converts between the live graph and the persisted dialog document.
//!
//! Loading is strict about node types (an unrecognized `nodeType` has no
//! sensible behavior, so it aborts) and lenient about connections (edges
//! whose endpoints or sockets no longer resolve are logged and dropped).

use crate::dialog::definition::{ControlDef, DialogDefinition, NodeDef, OutputDef, ScenarioInfo};
use crate::error::{GraphError, LoadError};
use crate::graph::socket::{Control, ControlKind, InputSocket, SELECTED_STATEMENT, Statement};
use crate::graph::{GraphStore, Node, NodeKind};
use itertools::Itertools;
use tracing::warn;

/// Exports the whole graph as a persistable document.
///
/// Node ids, controls, sockets, and positions go out verbatim; connections
/// that no longer resolve are already-dead and are pruned here.
pub fn save(graph: &GraphStore, scenario: &ScenarioInfo) -> DialogDefinition {
    DialogDefinition {
        scenario: scenario.clone(),
        nodes: graph.nodes().map(export_node).collect(),
        connections: graph
            .connections()
            .iter()
            .filter(|c| graph.resolves(c))
            .cloned()
            .collect(),
    }
}

/// Reconstructs a graph from a persisted document.
///
/// Ids are restored exactly so connection references stay valid. The caller's
/// previous graph is untouched on failure; a fresh store is built and only
/// returned when the whole document loads.
pub fn load(definition: &DialogDefinition) -> Result<GraphStore, LoadError> {
    if let Some(dup) = definition
        .nodes
        .iter()
        .map(|n| n.id.as_str())
        .duplicates()
        .next()
    {
        return Err(LoadError::DuplicateNodeId(dup.to_string()));
    }

    let mut graph = GraphStore::new();
    for def in &definition.nodes {
        let node = import_node(def)?;
        graph.add_node(node).map_err(|e| match e {
            GraphError::DuplicateNodeId(id) => LoadError::DuplicateNodeId(id),
            other => LoadError::Json(other.to_string()),
        })?;
    }

    for connection in &definition.connections {
        if let Err(e) = graph.connect(connection.clone()) {
            warn!(connection = %connection, error = %e, "dropping unresolvable connection");
        }
    }
    Ok(graph)
}

fn export_node(node: &Node) -> NodeDef {
    NodeDef {
        id: node.id.clone(),
        position: node.position,
        node_type: node.kind.wire_name().to_string(),
        name: node.name.clone(),
        parent_node_id: node.parent.clone(),
        controls: node
            .controls
            .iter()
            .map(|(name, control)| export_control(name, control))
            .collect(),
        inputs: node
            .inputs
            .iter()
            .map(|(name, socket)| export_input(name, socket))
            .collect(),
        outputs: node
            .outputs
            .iter()
            .map(|name| OutputDef { name: name.clone() })
            .collect(),
    }
}

fn import_node(def: &NodeDef) -> Result<Node, LoadError> {
    let kind = NodeKind::from_wire(&def.node_type).ok_or_else(|| LoadError::UnknownNodeType {
        node_id: def.id.clone(),
        type_name: def.node_type.clone(),
    })?;

    let mut node = Node::bare(kind, def.id.clone());
    node.position = def.position;
    node.parent = def.parent_node_id.clone();
    if !def.name.is_empty() {
        node.name = def.name.clone();
    }

    for control_def in &def.controls {
        match import_control(control_def) {
            // Statement controls carry a same-named output on the wire too;
            // the index insert keeps this idempotent.
            Control::Statement(statement) => {
                node.add_statement_control(control_def.name.clone(), statement);
            }
            control => node.set_control(control_def.name.clone(), control),
        }
    }
    for input_def in &def.inputs {
        let control = (input_def.control_type.is_some() || input_def.value.is_some())
            .then(|| import_control(input_def));
        node.inputs
            .insert(input_def.name.clone(), InputSocket { control });
    }
    for output_def in &def.outputs {
        node.outputs.insert(output_def.name.clone());
    }

    // An NPC with exactly one statement and no explicit selection defaults
    // to that statement.
    if kind == NodeKind::NpcStatement
        && node
            .control_text(SELECTED_STATEMENT)
            .is_none_or(str::is_empty)
    {
        if let Some(only) = node.selected_statement().map(str::to_string) {
            node.set_control_text(SELECTED_STATEMENT, only);
        }
    }
    Ok(node)
}

fn export_control(name: &str, control: &Control) -> ControlDef {
    let (control_type, value, points, delay) = match control {
        Control::Text(s) => (ControlKind::Text, serde_json::json!(s), None, None),
        Control::Number(n) => (ControlKind::Number, serde_json::json!(n), None, None),
        Control::Select(s) => (ControlKind::Select, serde_json::json!(s), None, None),
        Control::TextArea(s) => (ControlKind::Textarea, serde_json::json!(s), None, None),
        Control::Statement(st) => (
            ControlKind::Statement,
            serde_json::json!(st.text),
            Some(st.points),
            st.delay.clone(),
        ),
    };
    ControlDef {
        name: name.to_string(),
        control_type: Some(control_type),
        value: Some(value),
        points,
        delay,
    }
}

fn export_input(name: &str, socket: &InputSocket) -> ControlDef {
    match &socket.control {
        Some(control) => export_control(name, control),
        None => ControlDef {
            name: name.to_string(),
            control_type: None,
            value: None,
            points: None,
            delay: None,
        },
    }
}

fn import_control(def: &ControlDef) -> Control {
    match def.control_type.unwrap_or(ControlKind::Text) {
        ControlKind::Statement => Control::Statement(Statement {
            text: value_to_string(def.value.as_ref()),
            points: def.points.unwrap_or(0.0),
            delay: def.delay.clone(),
        }),
        ControlKind::Number => Control::Number(
            def.value
                .as_ref()
                .and_then(value_to_number)
                .unwrap_or(0.0),
        ),
        ControlKind::Select => Control::Select(value_to_string(def.value.as_ref())),
        ControlKind::Textarea => Control::TextArea(value_to_string(def.value.as_ref())),
        ControlKind::Text => Control::Text(value_to_string(def.value.as_ref())),
    }
}

fn value_to_string(value: Option<&serde_json::Value>) -> String {
    match value {
        None => String::new(),
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn value_to_number(value: &serde_json::Value) -> Option<f64> {
    value
        .as_f64()
        .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
}
