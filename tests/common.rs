//! Common test utilities for building dialog graphs and definitions.
use katarai::prelude::*;

/// Builds the reference walkthrough graph used across the test suite.
///
/// Flow: Start -> NPC greeting -> player statement group (a 0-point and a
/// 5-point response) -> summary -> End. The player group's `points` output
/// is additionally wired into the summary's `points` input as a data edge.
#[allow(dead_code)]
pub fn walkthrough_graph() -> GraphStore {
    let mut graph = GraphStore::new();

    let start = Node::bare(NodeKind::Start, "start");

    let mut npc = Node::bare(NodeKind::NpcStatement, "npc");
    npc.add_statement_input("statement1", Statement::new("Good morning, how can I help?", 0.0));

    let mut player = Node::bare(NodeKind::PlayerStatementGroup, "player");
    player.add_statement_control("statement1", Statement::new("Never mind.", 0.0));
    player.add_statement_control("statement2", Statement::new("I would like to check in.", 5.0));

    let mut summary = Node::bare(NodeKind::SummaryPoints, "summary");
    summary.add_input("points", InputSocket::plain());

    let end = Node::bare(NodeKind::End, "end");

    for node in [start, npc, player, summary, end] {
        graph.add_node(node).expect("fixture ids are unique");
    }
    for connection in [
        Connection::new("start", "start", "npc", "execute"),
        Connection::new("npc", "executed", "player", "execute"),
        Connection::new("player", "points", "summary", "points"),
        Connection::new("player", "executed", "summary", "execute"),
        Connection::new("summary", "summary", "end", "end"),
    ] {
        graph
            .connect(connection)
            .expect("fixture sockets exist by construction");
    }
    graph
}

#[allow(dead_code)]
pub fn sample_scenario() -> ScenarioInfo {
    ScenarioInfo::new("en-US", "Reception walkthrough")
}

#[allow(dead_code)]
pub fn walkthrough_definition() -> DialogDefinition {
    codec::save(&walkthrough_graph(), &sample_scenario())
}

/// The handle of the speech request currently in flight.
#[allow(dead_code)]
pub fn current_speech_handle(engine: &ScenarioEngine) -> SpeechHandle {
    engine
        .middleware()
        .speaking()
        .map(|request| request.handle)
        .expect("a speech request should be in flight")
}

/// Reports the in-flight speech request as finished.
#[allow(dead_code)]
pub fn finish_current_speech(engine: &mut ScenarioEngine) {
    let handle = current_speech_handle(engine);
    assert!(engine.speech_finished(handle));
}
