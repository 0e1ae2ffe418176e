//! Prelude module for convenient imports
//!
//! Re-exports the most commonly used types from the katarai crate so a host
//! can drive a scenario without importing each module individually.
//!
//! # Example
//!
//! ```rust,no_run
//! use katarai::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let json = std::fs::read_to_string("path/to/dialog.json")?;
//! let definition = DialogDefinition::from_json_str(&json)?;
//! let mut engine = ScenarioEngine::from_definition(&definition)?;
//! engine.start()?;
//! # Ok(())
//! # }
//! ```

// Execution
pub use crate::engine::{EngineEvent, Phase, ScenarioEngine, dataflow};

// Graph model
pub use crate::graph::{
    Connection, Control, ControlKind, GraphStore, InputSocket, Node, NodeKind, Statement,
};

// Persistence
pub use crate::dialog::codec;
pub use crate::dialog::{ControlDef, DialogDefinition, NodeDef, OutputDef, ScenarioInfo};

// Presentation
pub use crate::presentation::{Choice, ChoiceKey, DialogMiddleware, SpeechHandle, SpeechRequest};

// Error types
pub use crate::error::{EngineError, GraphError, LoadError, SaveError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
