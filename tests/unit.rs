//! Unit tests for the graph model, presentation state and error surface.
mod common;
use common::*;
use katarai::engine::dataflow;
use katarai::error::{EngineError, GraphError, LoadError};
use katarai::prelude::*;

#[test]
fn test_node_kind_wire_names_round_trip() {
    for kind in NodeKind::ALL {
        assert_eq!(NodeKind::from_wire(kind.wire_name()), Some(kind));
    }
    assert_eq!(NodeKind::from_wire("BaseDialogNode"), None);
    assert_eq!(format!("{}", NodeKind::Scope), "ParentNode");
}

#[test]
fn test_control_accessors() {
    assert_eq!(Control::Number(3.5).as_number(), Some(3.5));
    assert_eq!(Control::Text("hi".to_string()).as_number(), None);
    assert_eq!(Control::Select("Wanda".to_string()).as_text(), Some("Wanda"));
    assert_eq!(Control::TextArea("body".to_string()).as_text(), Some("body"));
    assert_eq!(Control::Number(1.0).as_text(), None);
    assert_eq!(Control::Number(1.0).kind(), ControlKind::Number);

    assert!(Control::flag(true).is_set());
    assert!(!Control::flag(false).is_set());
    assert!(!Control::Text("yes".to_string()).is_set());
}

#[test]
fn test_selected_statement_resolution() {
    let mut npc = Node::bare(NodeKind::NpcStatement, "npc");
    npc.add_statement_input("statement1", Statement::new("First.", 0.0));

    // Single statement, no explicit selection.
    assert_eq!(npc.selected_statement(), Some("statement1"));

    // A dangling explicit selection falls back to the single statement.
    npc.set_control_text("selectedStatement", "statement9");
    assert_eq!(npc.selected_statement(), Some("statement1"));

    // Two statements and no valid selection is unresolvable.
    npc.add_statement_input("statement2", Statement::new("Second.", 0.0));
    assert_eq!(npc.selected_statement(), None);

    npc.set_control_text("selectedStatement", "statement2");
    assert_eq!(npc.selected_statement(), Some("statement2"));
}

#[test]
fn test_remove_statement() {
    let mut player = Node::bare(NodeKind::PlayerStatementGroup, "p");
    player.add_statement_control("statement1", Statement::new("Gone.", 1.0));
    assert!(player.has_output("statement1"));
    assert!(player.remove_statement("statement1"));
    assert!(player.statement("statement1").is_none());
    assert!(!player.has_output("statement1"));

    let mut npc = Node::bare(NodeKind::NpcStatement, "n");
    npc.add_statement_input("statement1", Statement::new("Gone.", 0.0));
    assert!(npc.remove_statement("statement1"));
    assert!(!npc.has_input("statement1"));
    // Non-statement entries are left alone.
    assert!(!npc.remove_statement("execute"));
    assert!(npc.has_input("execute"));
}

#[test]
fn test_node_data_snapshots() {
    let mut player = Node::bare(NodeKind::PlayerStatementGroup, "p");
    player.set_control_number("points", 4.0);
    assert_eq!(player.data("points"), Some(4.0));
    // Control-flow outputs carry no data.
    assert_eq!(player.data("executed"), None);
    assert_eq!(player.data("no-such-output"), None);

    let mut summary = Node::bare(NodeKind::SummaryPoints, "s");
    summary.set_control_number("summary", 7.0);
    assert_eq!(summary.data("summary"), Some(7.0));
}

#[test]
fn test_reset_runtime_state() {
    let mut node = Node::bare(NodeKind::PlayerStatementGroup, "p");
    node.add_statement_control("statement1", Statement::new("Kept.", 3.0));
    node.set_control_text("selectedStatement", "statement1");
    node.set_control_number("points", 3.0);

    node.reset_runtime_state();
    assert_eq!(node.control_text("selectedStatement"), Some(""));
    assert_eq!(node.control_number("points"), 0.0);
    // Authored statements survive a reset.
    assert_eq!(node.statement("statement1").unwrap().points, 3.0);

    // An NPC's selection is design-time state and is kept.
    let mut npc = Node::bare(NodeKind::NpcStatement, "n");
    npc.add_statement_input("statement1", Statement::new("A.", 0.0));
    npc.add_statement_input("statement2", Statement::new("B.", 0.0));
    npc.set_control_text("selectedStatement", "statement2");
    npc.set_control_number("points", 2.0);
    npc.reset_runtime_state();
    assert_eq!(npc.control_text("selectedStatement"), Some("statement2"));
    assert_eq!(npc.control_number("points"), 0.0);
}

#[test]
fn test_graph_store_duplicate_and_unresolved() {
    let mut graph = GraphStore::new();
    graph.add_node(Node::bare(NodeKind::Start, "a")).unwrap();
    assert!(matches!(
        graph.add_node(Node::bare(NodeKind::End, "a")),
        Err(GraphError::DuplicateNodeId(_))
    ));

    let dangling = Connection::new("a", "start", "missing", "execute");
    assert!(matches!(
        graph.connect(dangling),
        Err(GraphError::UnresolvedConnection { .. })
    ));
    assert!(graph.connections().is_empty());
}

#[test]
fn test_remove_node_prunes_connections() {
    let mut graph = walkthrough_graph();
    let before = graph.connections().len();
    graph.remove_node("player").unwrap();
    assert!(graph.node("player").is_none());
    assert_eq!(graph.connections().len(), before - 3);
    assert!(
        graph
            .connections()
            .iter()
            .all(|c| c.source != "player" && c.target != "player")
    );
}

#[test]
fn test_scope_membership_index() {
    let mut graph = GraphStore::new();
    graph.add_node(Node::bare(NodeKind::Scope, "scope")).unwrap();
    let mut member = Node::bare(NodeKind::Hint, "hint");
    member.parent = Some("scope".to_string());
    graph.add_node(member).unwrap();

    assert_eq!(graph.scope_members("scope"), ["hint".to_string()]);
    graph.remove_node("hint");
    assert!(graph.scope_members("scope").is_empty());
}

#[test]
fn test_skeleton_graph_shape() {
    let graph = GraphStore::skeleton();
    assert_eq!(graph.node_count(), 4);
    assert_eq!(graph.connections().len(), 3);
    assert!(graph.start_node().is_some());
    assert_eq!(graph.nodes_of_kind(NodeKind::End).count(), 1);

    // Fresh nodes carry their authoring defaults.
    let npc = graph.nodes_of_kind(NodeKind::NpcStatement).next().unwrap();
    assert_eq!(npc.control_text("person"), Some("Wanda"));
    assert_eq!(npc.selected_statement(), Some("statement1"));
}

#[test]
fn test_dataflow_pull_and_fan_in() {
    let mut graph = GraphStore::new();
    let mut a = Node::bare(NodeKind::PlayerStatementGroup, "a");
    a.set_control_number("points", 2.0);
    let mut b = Node::bare(NodeKind::PlayerStatementGroup, "b");
    b.set_control_number("points", 3.0);
    let mut summary = Node::bare(NodeKind::SummaryPoints, "sum");
    summary.add_input("points", InputSocket::plain());
    graph.add_node(a).unwrap();
    graph.add_node(b).unwrap();
    graph.add_node(summary).unwrap();
    graph
        .connect(Connection::new("a", "points", "sum", "points"))
        .unwrap();
    graph
        .connect(Connection::new("b", "points", "sum", "points"))
        .unwrap();
    // A control-flow edge into the same aggregate contributes nothing.
    graph
        .connect(Connection::new("a", "executed", "sum", "execute"))
        .unwrap();

    assert_eq!(dataflow::pull_input(&graph, "sum", "points"), 5.0);
    assert_eq!(dataflow::sum_points(&graph, "sum"), 5.0);
    assert_eq!(dataflow::sum_points(&graph, "missing"), 0.0);
}

#[test]
fn test_middleware_speech_last_writer_wins() {
    let mut middleware = DialogMiddleware::new();
    let first = middleware.begin_speech("first");
    let second = middleware.begin_speech("second");
    assert_eq!(middleware.speaking().unwrap().text, "second");

    // The superseded handle is stale.
    assert!(!middleware.finish_speech(first));
    assert!(middleware.speaking().is_some());
    assert!(middleware.finish_speech(second));
    assert!(middleware.speaking().is_none());
    // Completing twice is a no-op.
    assert!(!middleware.finish_speech(second));
}

#[test]
fn test_middleware_choice_set() {
    let mut middleware = DialogMiddleware::new();
    let key_a = ChoiceKey::new("node", "statement1");
    let key_b = ChoiceKey::new("node", "statement2");
    middleware.present_choice(Choice {
        key: key_a.clone(),
        text: "A".to_string(),
        points: 0.0,
    });
    middleware.present_choice(Choice {
        key: key_b.clone(),
        text: "B".to_string(),
        points: 1.0,
    });
    assert_eq!(middleware.choices().len(), 2);
    assert_eq!(middleware.choice(&key_b).unwrap().text, "B");

    middleware.retain_choice(&key_b);
    assert_eq!(middleware.choices().len(), 1);
    assert_eq!(middleware.choices()[0].key, key_b);

    middleware.begin_speech("B");
    middleware.reset();
    assert!(middleware.choices().is_empty());
    assert!(middleware.speaking().is_none());
}

#[test]
fn test_choice_key_display() {
    let key = ChoiceKey::new("node-7", "statement2");
    assert_eq!(format!("{key}"), "node-7_statement2");
}

#[test]
fn test_error_display() {
    let load = LoadError::UnknownNodeType {
        node_id: "n1".to_string(),
        type_name: "BaseDialogNode".to_string(),
    };
    assert_eq!(
        format!("{load}"),
        "Node 'n1' has an unknown node type: 'BaseDialogNode'"
    );
    assert_eq!(
        format!("{}", EngineError::MissingStartNode),
        "Dialog graph contains no start node"
    );
    let graph = GraphError::UnresolvedConnection {
        source_node: "a".to_string(),
        source_output: "start".to_string(),
        target_node: "b".to_string(),
        target_input: "execute".to_string(),
    };
    assert_eq!(
        format!("{graph}"),
        "Connection 'a.start' -> 'b.execute' cannot be resolved"
    );
}
