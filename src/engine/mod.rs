//! The control-flow interpreter: walks execute signals along connections
//! starting at the start node, suspending wherever a node awaits speech
//! completion or a player choice.
//!
//! Execution is single-threaded and cooperative. Suspension is a stored
//! pending state on the engine, resumed by the host through [`ScenarioEngine::choose`],
//! [`ScenarioEngine::speech_finished`] or [`ScenarioEngine::speech_failed`];
//! nothing ever blocks a thread.

use crate::dialog::codec;
use crate::dialog::definition::DialogDefinition;
use crate::error::{EngineError, LoadError};
use crate::graph::socket::{
    END, ENDED, EXECUTE, EXECUTED, POINTS, SCOPE_OUT, SELECTED_STATEMENT, START, STARTED,
    STATEMENT_PREFIX, SUMMARY,
};
use crate::graph::{GraphStore, Node, NodeKind};
use crate::presentation::{Choice, ChoiceKey, DialogMiddleware, SpeechHandle};
use ahash::AHashMap;
use std::collections::VecDeque;
use tracing::warn;

pub mod dataflow;

/// Execution phase of the whole graph, not of individual nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Running,
    Ended,
}

/// Notifications produced during execution, drained by the host.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// The start node fired.
    Started,
    /// A statement was handed to the speech capability; the host reports
    /// completion back through the carried handle.
    SpeechRequested(crate::presentation::SpeechRequest),
    /// A statement was resolved and its points recorded.
    PointsUpdated { total: f64 },
    /// An end node completed the scenario. Fires exactly once per run.
    Ended,
}

/// Signals processed per run before propagation is halted.
///
/// The authoring tool performs no cycle detection; an operator-created cycle
/// without a suspension point would otherwise spin forever. Exhausting the
/// budget stalls the run with a warning instead of panicking.
const STEP_BUDGET: u32 = 10_000;

#[derive(Debug)]
enum Resume {
    NpcSpoken { node: String, statement: String },
    ChoiceSpoken { node: String, statement: String },
}

#[derive(Debug)]
enum Pending {
    /// A player statement group is waiting for a choice.
    Choice { node: String },
    /// A statement is being spoken; control resumes on completion.
    Speech { handle: SpeechHandle, resume: Resume },
}

/// Executes one dialog graph as a state machine over the whole scenario.
#[derive(Debug)]
pub struct ScenarioEngine {
    graph: GraphStore,
    middleware: DialogMiddleware,
    phase: Phase,
    queue: VecDeque<(String, String)>,
    pending: Option<Pending>,
    events: VecDeque<EngineEvent>,
    awarded: AHashMap<String, f64>,
    steps: u32,
}

impl ScenarioEngine {
    pub fn new(graph: GraphStore) -> Self {
        Self {
            graph,
            middleware: DialogMiddleware::new(),
            phase: Phase::Idle,
            queue: VecDeque::new(),
            pending: None,
            events: VecDeque::new(),
            awarded: AHashMap::new(),
            steps: 0,
        }
    }

    pub fn from_definition(definition: &DialogDefinition) -> Result<Self, LoadError> {
        Ok(Self::new(codec::load(definition)?))
    }

    /// Replaces the graph wholesale from a persisted document. On failure the
    /// currently loaded graph is left untouched.
    pub fn load_definition(&mut self, definition: &DialogDefinition) -> Result<(), LoadError> {
        let graph = codec::load(definition)?;
        self.graph = graph;
        self.restart();
        Ok(())
    }

    pub fn graph(&self) -> &GraphStore {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut GraphStore {
        &mut self.graph
    }

    pub fn middleware(&self) -> &DialogMiddleware {
        &self.middleware
    }

    pub fn middleware_mut(&mut self) -> &mut DialogMiddleware {
        &mut self.middleware
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Drains every event produced since the last call, oldest first.
    pub fn take_events(&mut self) -> Vec<EngineEvent> {
        self.events.drain(..).collect()
    }

    /// Sum of the points awarded so far in this run.
    pub fn total_points(&self) -> f64 {
        self.awarded.values().sum()
    }

    /// Id of the player statement group currently awaiting a choice.
    pub fn pending_choice(&self) -> Option<&str> {
        match &self.pending {
            Some(Pending::Choice { node }) => Some(node),
            _ => None,
        }
    }

    /// Locates the start node and begins propagation. Starting an ended
    /// scenario restarts it first; starting a running one is rejected.
    pub fn start(&mut self) -> Result<(), EngineError> {
        match self.phase {
            Phase::Running => return Err(EngineError::AlreadyRunning),
            Phase::Ended => self.restart(),
            Phase::Idle => {}
        }
        let start_id = self
            .graph
            .start_node()
            .map(|n| n.id.clone())
            .ok_or(EngineError::MissingStartNode)?;
        self.phase = Phase::Running;
        self.steps = 0;
        self.queue.push_back((start_id, EXECUTE.to_string()));
        self.run();
        Ok(())
    }

    /// Returns to `Idle`, clearing presentation state, pending suspensions
    /// and runtime flags without discarding the graph. Safe to call while a
    /// node is suspended: a speech completion arriving afterwards carries a
    /// stale handle and is ignored.
    pub fn restart(&mut self) {
        self.phase = Phase::Idle;
        self.queue.clear();
        self.pending = None;
        self.middleware.reset();
        self.awarded.clear();
        self.events.clear();
        self.steps = 0;
        for node in self.graph.nodes_mut() {
            node.reset_runtime_state();
        }
    }

    /// Resolves the pending player choice. The picked statement stays
    /// visible while it is spoken; control flow resumes once the host
    /// reports speech completion. Unknown keys and calls without a pending
    /// choice are no-ops.
    pub fn choose(&mut self, key: &ChoiceKey) -> bool {
        match &self.pending {
            Some(Pending::Choice { node }) if node == &key.node_id => {}
            _ => return false,
        }
        let Some(choice) = self.middleware.choice(key).cloned() else {
            return false;
        };
        self.middleware.retain_choice(key);
        if let Some(node) = self.graph.node_mut(&key.node_id) {
            node.set_control_text(SELECTED_STATEMENT, key.statement.clone());
        }
        let handle = self.middleware.begin_speech(choice.text);
        self.emit_speech_request();
        self.pending = Some(Pending::Speech {
            handle,
            resume: Resume::ChoiceSpoken {
                node: key.node_id.clone(),
                statement: key.statement.clone(),
            },
        });
        true
    }

    /// Reports a speech request as finished and resumes the suspended node.
    /// Stale handles (after a restart, or superseded requests) are no-ops.
    pub fn speech_finished(&mut self, handle: SpeechHandle) -> bool {
        if !self.middleware.finish_speech(handle) {
            return false;
        }
        let resume = match self.pending.take() {
            Some(Pending::Speech {
                handle: pending,
                resume,
            }) if pending == handle => resume,
            other => {
                self.pending = other;
                return false;
            }
        };
        match resume {
            Resume::NpcSpoken { node, statement } => {
                self.award_points(&node, &statement);
                if let Some(n) = self.graph.node_mut(&node) {
                    n.set_control_text(SELECTED_STATEMENT, statement);
                }
                self.forward(&node, EXECUTED);
            }
            Resume::ChoiceSpoken { node, statement } => {
                self.award_points(&node, &statement);
                self.forward(&node, &statement);
                self.forward(&node, POINTS);
                self.forward(&node, EXECUTED);
            }
        }
        self.run();
        true
    }

    /// A broken speech backend must never deadlock the scenario; failure is
    /// treated as completion.
    pub fn speech_failed(&mut self, handle: SpeechHandle) -> bool {
        self.speech_finished(handle)
    }

    fn run(&mut self) {
        while let Some((node_id, signal)) = self.queue.pop_front() {
            self.steps += 1;
            if self.steps > STEP_BUDGET {
                warn!(
                    budget = STEP_BUDGET,
                    "propagation budget exhausted, halting run (cyclic wiring?)"
                );
                self.queue.clear();
                return;
            }
            self.execute(&node_id, &signal);
            if self.phase == Phase::Ended {
                return;
            }
        }
    }

    /// Enqueues every target connected to one output, in authored order.
    fn forward(&mut self, source: &str, output: &str) {
        let targets: Vec<(String, String)> = self
            .graph
            .connections_from(source, output)
            .map(|c| (c.target.clone(), c.target_input.clone()))
            .collect();
        self.queue.extend(targets);
    }

    fn execute(&mut self, node_id: &str, signal: &str) {
        // A removed node or an unknown signal degrades to a no-op.
        let Some(kind) = self.graph.node(node_id).map(|n| n.kind) else {
            return;
        };
        match kind {
            NodeKind::Start => {
                if signal == EXECUTE {
                    self.execute_start(node_id);
                }
            }
            NodeKind::Scope => self.forward(node_id, SCOPE_OUT),
            NodeKind::Hint => {}
            NodeKind::End => {
                if signal == END || signal == EXECUTE {
                    self.execute_end(node_id);
                }
            }
            NodeKind::NpcStatement => self.execute_npc(node_id, signal),
            NodeKind::PlayerStatementGroup => {
                if signal == EXECUTE {
                    self.execute_player_group(node_id);
                }
            }
            NodeKind::SummaryPoints => {
                if signal == EXECUTE || Node::is_points_input(signal) {
                    self.execute_summary(node_id);
                }
            }
        }
    }

    fn execute_start(&mut self, node_id: &str) {
        if let Some(node) = self.graph.node_mut(node_id) {
            node.set_flag(STARTED, true);
        }
        self.events.push_back(EngineEvent::Started);
        self.forward(node_id, START);
    }

    fn execute_end(&mut self, node_id: &str) {
        // Terminal idempotence: a second signal reaching an ended node does
        // nothing and forwards nothing.
        if self.graph.node(node_id).is_some_and(|n| n.flag(ENDED)) {
            return;
        }
        if let Some(node) = self.graph.node_mut(node_id) {
            node.set_flag(ENDED, true);
        }
        self.middleware.reset();
        self.pending = None;
        self.queue.clear();
        self.phase = Phase::Ended;
        self.events.push_back(EngineEvent::Ended);
    }

    fn execute_npc(&mut self, node_id: &str, signal: &str) {
        if signal.starts_with(STATEMENT_PREFIX) {
            // A statement signal routed into an NPC records which of its
            // statements the upstream branch selected.
            if self.graph.node(node_id).is_some_and(|n| n.has_input(signal)) {
                if let Some(node) = self.graph.node_mut(node_id) {
                    node.set_control_text(SELECTED_STATEMENT, signal);
                }
            }
            return;
        }
        if signal != EXECUTE {
            return;
        }
        let selected = self.graph.node(node_id).and_then(|n| {
            let name = n.selected_statement()?;
            let statement = n.statement(name)?;
            Some((name.to_string(), statement.text.clone()))
        });
        // A dangling or missing selection degrades to a no-op.
        let Some((statement_name, text)) = selected else {
            return;
        };
        self.middleware.clear_choices();
        let handle = self.middleware.begin_speech(text);
        self.emit_speech_request();
        self.pending = Some(Pending::Speech {
            handle,
            resume: Resume::NpcSpoken {
                node: node_id.to_string(),
                statement: statement_name,
            },
        });
    }

    fn execute_player_group(&mut self, node_id: &str) {
        let Some(choices) = self.graph.node(node_id).map(|n| {
            n.statement_controls()
                .map(|(name, statement)| Choice {
                    key: ChoiceKey::new(node_id, name),
                    text: statement.text.clone(),
                    points: statement.points,
                })
                .collect::<Vec<_>>()
        }) else {
            return;
        };
        self.middleware.clear_choices();
        for choice in choices {
            self.middleware.present_choice(choice);
        }
        self.pending = Some(Pending::Choice {
            node: node_id.to_string(),
        });
    }

    fn execute_summary(&mut self, node_id: &str) {
        let total = dataflow::sum_points(&self.graph, node_id);
        if let Some(node) = self.graph.node_mut(node_id) {
            node.set_control_number(SUMMARY, total);
            node.set_flag(ENDED, true);
        }
        self.middleware.clear_choices();
        self.forward(node_id, SUMMARY);
    }

    /// Writes a resolved statement's points into its node and the run tally.
    fn award_points(&mut self, node_id: &str, statement: &str) {
        let points = self
            .graph
            .node(node_id)
            .and_then(|n| n.statement(statement))
            .map(|s| s.points);
        let Some(points) = points else { return };
        if let Some(node) = self.graph.node_mut(node_id) {
            node.set_control_number(POINTS, points);
        }
        self.awarded.insert(node_id.to_string(), points);
        self.events.push_back(EngineEvent::PointsUpdated {
            total: self.total_points(),
        });
    }

    fn emit_speech_request(&mut self) {
        if let Some(request) = self.middleware.speaking().cloned() {
            self.events.push_back(EngineEvent::SpeechRequested(request));
        }
    }
}
