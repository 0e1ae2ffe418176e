//! The mutable dialog graph: node instances, connections, and the scope
//! grouping index. The store exclusively owns every node and connection of
//! one dialog definition.

use crate::error::GraphError;
use ahash::AHashMap;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

pub mod node;
pub mod socket;

pub use node::{Node, NodeKind};
pub use socket::{Control, ControlKind, InputSocket, Statement};

/// A directed edge between two named sockets.
///
/// Whether an edge carries control flow or data flow follows from the socket
/// names it joins: `execute`/`executed`/statement sockets carry signals,
/// `points` sockets carry values pulled on demand. This struct is also the
/// persisted wire shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub source: String,
    pub source_output: String,
    pub target: String,
    pub target_input: String,
}

impl Connection {
    pub fn new(
        source: impl Into<String>,
        source_output: impl Into<String>,
        target: impl Into<String>,
        target_input: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            source_output: source_output.into(),
            target: target.into(),
            target_input: target_input.into(),
        }
    }
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{} -> {}.{}",
            self.source, self.source_output, self.target, self.target_input
        )
    }
}

/// Owner of all node and connection instances for one dialog definition.
///
/// Node iteration order is insertion order, which doubles as the authored
/// order the interpreter and codec rely on. The scope index is a plain
/// lookup maintained alongside the store; scopes never gate execution.
#[derive(Debug, Clone, Default)]
pub struct GraphStore {
    nodes: IndexMap<String, Node>,
    connections: Vec<Connection>,
    scopes: AHashMap<String, Vec<String>>,
}

impl GraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The canonical skeleton a freshly created dialog starts from:
    /// Start -> NPC -> player statement group -> End.
    pub fn skeleton() -> Self {
        let mut graph = Self::new();

        let start = Node::with_defaults(NodeKind::Start, new_node_id()).with_position(-600.0, 0.0);
        let npc = Node::with_defaults(NodeKind::NpcStatement, new_node_id());
        let player =
            Node::with_defaults(NodeKind::PlayerStatementGroup, new_node_id()).with_position(600.0, 0.0);
        let end = Node::with_defaults(NodeKind::End, new_node_id()).with_position(1200.0, 0.0);

        let (start_id, npc_id) = (start.id.clone(), npc.id.clone());
        let (player_id, end_id) = (player.id.clone(), end.id.clone());

        for node in [start, npc, player, end] {
            graph
                .add_node(node)
                .expect("freshly generated ids cannot collide");
        }
        for connection in [
            Connection::new(&start_id, socket::START, &npc_id, socket::EXECUTE),
            Connection::new(&npc_id, socket::EXECUTED, &player_id, socket::EXECUTE),
            Connection::new(&player_id, socket::EXECUTED, &end_id, socket::END),
        ] {
            graph
                .connect(connection)
                .expect("skeleton sockets exist by construction");
        }
        graph
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn nodes_mut(&mut self) -> impl Iterator<Item = &mut Node> {
        self.nodes.values_mut()
    }

    pub fn nodes_of_kind(&self, kind: NodeKind) -> impl Iterator<Item = &Node> {
        self.nodes.values().filter(move |n| n.kind == kind)
    }

    /// The unique start node, when present. A valid definition has exactly
    /// one; with several, the first authored wins.
    pub fn start_node(&self) -> Option<&Node> {
        self.nodes_of_kind(NodeKind::Start).next()
    }

    pub fn add_node(&mut self, node: Node) -> Result<(), GraphError> {
        if self.nodes.contains_key(&node.id) {
            return Err(GraphError::DuplicateNodeId(node.id));
        }
        if let Some(parent) = node.parent.clone() {
            self.scopes.entry(parent).or_default().push(node.id.clone());
        }
        self.nodes.insert(node.id.clone(), node);
        Ok(())
    }

    /// Removes a node together with every connection touching it.
    pub fn remove_node(&mut self, id: &str) -> Option<Node> {
        let node = self.nodes.shift_remove(id)?;
        self.connections
            .retain(|c| c.source != id && c.target != id);
        if let Some(parent) = &node.parent {
            if let Some(members) = self.scopes.get_mut(parent) {
                members.retain(|m| m != id);
            }
        }
        self.scopes.remove(id);
        Some(node)
    }

    /// True when both endpoints and both named sockets exist.
    pub fn resolves(&self, connection: &Connection) -> bool {
        let source_ok = self
            .node(&connection.source)
            .is_some_and(|n| n.has_output(&connection.source_output));
        let target_ok = self
            .node(&connection.target)
            .is_some_and(|n| n.has_input(&connection.target_input));
        source_ok && target_ok
    }

    pub fn connect(&mut self, connection: Connection) -> Result<(), GraphError> {
        if !self.resolves(&connection) {
            return Err(GraphError::UnresolvedConnection {
                source_node: connection.source,
                source_output: connection.source_output,
                target_node: connection.target,
                target_input: connection.target_input,
            });
        }
        self.connections.push(connection);
        Ok(())
    }

    pub fn disconnect(&mut self, connection: &Connection) -> bool {
        let before = self.connections.len();
        self.connections.retain(|c| c != connection);
        before != self.connections.len()
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Connections leaving one output socket, in authored order. Fan-out
    /// propagation follows this order.
    pub fn connections_from<'a>(
        &'a self,
        source: &'a str,
        output: &'a str,
    ) -> impl Iterator<Item = &'a Connection> {
        self.connections
            .iter()
            .filter(move |c| c.source == source && c.source_output == output)
    }

    /// Connections entering one input socket, in authored order. Fan-in
    /// aggregation sums over this.
    pub fn connections_into<'a>(
        &'a self,
        target: &'a str,
        input: &'a str,
    ) -> impl Iterator<Item = &'a Connection> {
        self.connections
            .iter()
            .filter(move |c| c.target == target && c.target_input == input)
    }

    /// Member node ids of one scope node. Empty for unknown scopes.
    pub fn scope_members(&self, scope_id: &str) -> &[String] {
        self.scopes
            .get(scope_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.connections.clear();
        self.scopes.clear();
    }
}

/// Fresh unique id for an authored node.
pub fn new_node_id() -> String {
    Uuid::new_v4().to_string()
}
