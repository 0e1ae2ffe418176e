//! The persisted dialog document: wire structs mirroring the authoring
//! tool's JSON format, and the codec converting between that document and a
//! live [`GraphStore`](crate::graph::GraphStore).

pub mod codec;
pub mod definition;

pub use codec::{load, save};
pub use definition::{ControlDef, DialogDefinition, NodeDef, OutputDef, ScenarioInfo};
