//! # Katarai - Dialog Scenario Execution Engine
//!
//! **Katarai** authors and plays back branching dialog scenarios for
//! interactive training simulations. An operator arranges a directed graph
//! of dialog nodes (narrator statements, multiple-choice player responses,
//! hints, scoring aggregators); at runtime that graph is executed step by
//! step, driving speech, player choice, and point accumulation.
//!
//! ## Core Workflow
//!
//! The engine operates on a canonical persisted document, the
//! [`DialogDefinition`](dialog::DialogDefinition):
//!
//! 1. **Load**: parse the dialog JSON into a `DialogDefinition` and let the
//!    codec reconstruct a live [`GraphStore`](graph::GraphStore).
//! 2. **Execute**: feed the graph to a [`ScenarioEngine`](engine::ScenarioEngine)
//!    and call `start()`. The engine walks execute signals along
//!    connections, suspending whenever a node awaits speech completion or a
//!    player choice.
//! 3. **Drive**: the host drains [`EngineEvent`](engine::EngineEvent)s,
//!    renders the middleware's active choices, hands speech requests to its
//!    synthesizer, and reports resolutions back.
//!
//! Speech synthesis and choice rendering are host capabilities, not part of
//! this crate; the engine only mediates them through the
//! [`DialogMiddleware`](presentation::DialogMiddleware).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use katarai::prelude::*;
//!
//! fn main() -> katarai::prelude::Result<()> {
//!     let json = std::fs::read_to_string("dialog.json")?;
//!     let definition = DialogDefinition::from_json_str(&json)?;
//!     let mut engine = ScenarioEngine::from_definition(&definition)?;
//!     engine.start()?;
//!
//!     loop {
//!         for event in engine.take_events() {
//!             match event {
//!                 EngineEvent::SpeechRequested(request) => {
//!                     // Hand `request.text` to the speech capability, then:
//!                     engine.speech_finished(request.handle);
//!                 }
//!                 EngineEvent::PointsUpdated { total } => {
//!                     println!("points so far: {total}");
//!                 }
//!                 EngineEvent::Ended => return Ok(()),
//!                 EngineEvent::Started => {}
//!             }
//!         }
//!         // Render engine.middleware().choices() and resolve one of them.
//!         if let Some(choice) = engine.middleware().choices().first().cloned() {
//!             engine.choose(&choice.key);
//!         }
//!     }
//! }
//! ```

pub mod dialog;
pub mod engine;
pub mod error;
pub mod graph;
pub mod prelude;
pub mod presentation;
