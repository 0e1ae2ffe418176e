use thiserror::Error;

/// Errors that can occur while reconstructing a graph from a persisted dialog definition.
#[derive(Error, Debug, Clone)]
pub enum LoadError {
    #[error("Failed to parse dialog JSON: {0}")]
    Json(String),

    #[error("Node '{node_id}' has an unknown node type: '{type_name}'")]
    UnknownNodeType { node_id: String, type_name: String },

    #[error("Duplicate node id '{0}' in dialog definition")]
    DuplicateNodeId(String),
}

/// Errors that can occur while exporting a graph to a persisted dialog definition.
#[derive(Error, Debug, Clone)]
pub enum SaveError {
    #[error("Failed to serialize dialog JSON: {0}")]
    Json(String),
}

/// Errors raised by structural mutations of the graph store.
#[derive(Error, Debug, Clone)]
pub enum GraphError {
    #[error("Node id '{0}' already exists in the graph")]
    DuplicateNodeId(String),

    // Field name avoids thiserror's `source` convention, which would demand
    // an `Error` impl on the node id.
    #[error(
        "Connection '{source_node}.{source_output}' -> '{target_node}.{target_input}' cannot be resolved"
    )]
    UnresolvedConnection {
        source_node: String,
        source_output: String,
        target_node: String,
        target_input: String,
    },
}

/// Errors surfaced by the control-flow interpreter.
#[derive(Error, Debug, Clone)]
pub enum EngineError {
    #[error("Dialog graph contains no start node")]
    MissingStartNode,

    #[error("Scenario is already running; restart it before starting again")]
    AlreadyRunning,
}
