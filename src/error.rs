//! Error types for the scripting engine.
//!
//! The taxonomy follows the lifecycle of a script:
//!
//! - [`SchemaError`]: a construction or edit was rejected. The graph is left
//!   exactly as it was.
//! - [`EvalError`]: evaluating a node could not produce a value.
//! - [`ServiceError`]: a domain service could not complete a side effect.
//!   Only the action that requested it is aborted.
//! - [`CodecError`]: text could not be encoded or decoded.
//!
//! Conditions evaluating to false are a normal outcome, never an error.

use thiserror::Error;
use uuid::Uuid;

use crate::core::{ActorId, ResourceKey};
use crate::graph::{NodeId, NodeKind, ValueType, VariantId};
use crate::scenario::{RegionId, TriggerId};

/// A structural request violated the schema or the graph invariants.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// No variant with this name is registered.
    #[error("unknown variant {0:?}")]
    UnknownVariant(String),

    /// A variant with this id is already registered.
    #[error("variant {0} is already registered")]
    DuplicateVariant(VariantId),

    /// A parameter name is not a plain identifier, or is declared twice.
    #[error("invalid parameter name {param:?} on {variant}")]
    InvalidParameterName {
        /// Variant being registered.
        variant: VariantId,
        /// Offending name.
        param: String,
    },

    /// The variant declares no parameter with this name.
    #[error("{variant} has no parameter {param:?}")]
    UnknownParameter {
        /// Variant of the node.
        variant: VariantId,
        /// Requested parameter.
        param: String,
    },

    /// A required parameter (one without a default) was not supplied.
    #[error("{variant} requires parameter {param:?}")]
    MissingParameter {
        /// Variant of the node.
        variant: VariantId,
        /// Missing parameter.
        param: String,
    },

    /// The bound child's result type differs from the parameter's type.
    #[error("{variant}.{param} expects {expected}, got {found}")]
    ArgumentType {
        /// Variant of the parent node.
        variant: VariantId,
        /// Parameter being bound.
        param: String,
        /// Declared parameter type.
        expected: ValueType,
        /// Result type of the offered child.
        found: ValueType,
    },

    /// The literal is missing, unexpected, or of the wrong type.
    #[error("{variant} expects literal {expected:?}, got {found:?}")]
    LiteralMismatch {
        /// Variant of the node.
        variant: VariantId,
        /// Literal type the variant carries, if any.
        expected: Option<ValueType>,
        /// Literal type supplied, if any.
        found: Option<ValueType>,
    },

    /// No node with this id exists.
    #[error("unknown node {0}")]
    UnknownNode(NodeId),

    /// The child already belongs to another parent or list.
    #[error("{0} is already bound")]
    AlreadyBound(NodeId),

    /// Binding the child would make the graph cyclic.
    #[error("binding {child} under {node} would create a cycle")]
    Cycle {
        /// Prospective parent.
        node: NodeId,
        /// Prospective child.
        child: NodeId,
    },

    /// The node's kind cannot go into the requested list.
    #[error("{variant} is a {found} node, expected {expected}")]
    WrongKind {
        /// Variant of the offered node.
        variant: VariantId,
        /// Kind the list accepts.
        expected: &'static str,
        /// Kind of the offered node.
        found: NodeKind,
    },

    /// No trigger with this id exists.
    #[error("unknown trigger {0}")]
    UnknownTrigger(TriggerId),

    /// No region with this id exists.
    #[error("unknown region {0}")]
    UnknownRegion(RegionId),

    /// Another region already uses this stable id.
    #[error("stable region id {0} is already in use")]
    DuplicateStableId(Uuid),

    /// A list position is out of range.
    #[error("index {index} out of bounds for list of length {len}")]
    IndexOutOfBounds {
        /// Requested position.
        index: usize,
        /// Current list length.
        len: usize,
    },
}

/// A domain service could not complete a side effect.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// The block registry has no such block.
    #[error("unknown block {0}")]
    UnknownBlock(ResourceKey),

    /// The item registry has no such item.
    #[error("unknown item {0}")]
    UnknownItem(ResourceKey),

    /// The actor no longer exists.
    #[error("unknown actor {0}")]
    UnknownActor(ActorId),

    /// The actor does not hold enough of a resource.
    #[error("{actor} holds {available} of {resource}, {requested} requested")]
    Insufficient {
        /// Actor whose inventory was checked.
        actor: ActorId,
        /// Resource requested.
        resource: ResourceKey,
        /// Amount requested.
        requested: i64,
        /// Amount held.
        available: i64,
    },

    /// Amounts must be positive.
    #[error("invalid amount {0}")]
    InvalidAmount(i64),

    /// The service refused the request for a host-specific reason.
    #[error("service unavailable: {0}")]
    Unavailable(String),
}

/// Evaluating a node failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    /// A required argument slot is unset.
    #[error("{node} has no argument bound to {param:?}")]
    MissingArgument {
        /// Node with the empty slot.
        node: NodeId,
        /// Unset parameter.
        param: String,
    },

    /// A literal refers to a domain object that no longer exists.
    #[error("{node} refers to missing {reference}")]
    DanglingReference {
        /// Value node holding the literal.
        node: NodeId,
        /// Textual form of the missing referent.
        reference: String,
    },

    /// The occurrence does not carry the requested fact.
    #[error("occurrence has no {0}")]
    MissingContext(&'static str),

    /// A value of one type was requested from a node of another.
    #[error("{node} produces {found}, {expected} was requested")]
    TypeMismatch {
        /// Node evaluated.
        node: NodeId,
        /// Type the caller asked for.
        expected: ValueType,
        /// Type the node produced.
        found: ValueType,
    },

    /// No node with this id exists.
    #[error("unknown node {0}")]
    UnknownNode(NodeId),

    /// The node's variant is not registered with this engine.
    #[error("unregistered variant {0}")]
    UnknownVariant(VariantId),

    /// Evaluation nested deeper than the configured limit.
    #[error("evaluation exceeded depth {0}")]
    DepthExceeded(usize),

    /// An action's side effect could not complete.
    #[error("action {node} failed: {source}")]
    ActionFailed {
        /// Action node.
        node: NodeId,
        /// Service failure.
        #[source]
        source: ServiceError,
    },
}

/// Encoding or decoding the text form failed.
///
/// Decode errors carry the 1-based line number of the offending line.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The input contains no node lines.
    #[error("empty encoding")]
    Empty,

    /// A line does not have the `<path><marker><payload>` shape.
    #[error("line {line}: {reason}")]
    Malformed {
        /// Line number.
        line: usize,
        /// What was wrong.
        reason: String,
    },

    /// A definition line names an unregistered variant.
    #[error("line {line}: unknown variant {name:?}")]
    UnknownVariant {
        /// Line number.
        line: usize,
        /// Variant name as written.
        name: String,
    },

    /// A line's parent path has not been defined by an earlier line.
    #[error("line {line}: no node defined at parent path {path:?}")]
    OrphanLine {
        /// Line number.
        line: usize,
        /// Path of the missing parent.
        path: String,
    },

    /// Two definition lines share a path.
    #[error("line {line}: path {path:?} defined twice")]
    DuplicatePath {
        /// Line number.
        line: usize,
        /// Repeated path.
        path: String,
    },

    /// A literal payload cannot be parsed for its variant.
    #[error("line {line}: invalid literal {text:?} for {variant}")]
    InvalidLiteral {
        /// Line number.
        line: usize,
        /// Variant of the value node.
        variant: VariantId,
        /// Payload as written.
        text: String,
    },

    /// A value node has no value line.
    #[error("line {line}: {variant} has no value line")]
    MissingLiteral {
        /// Line number of the definition.
        line: usize,
        /// Variant of the value node.
        variant: VariantId,
    },

    /// A reference literal names an object that does not resolve.
    #[error("line {line}: unresolved reference {reference}")]
    UnresolvedReference {
        /// Line number (0 when encoding).
        line: usize,
        /// Reference as written.
        reference: String,
    },

    /// Rebuilding the graph violated the schema.
    #[error("line {line}: {source}")]
    Schema {
        /// Line number.
        line: usize,
        /// Schema rejection.
        #[source]
        source: SchemaError,
    },

    /// The node to encode does not exist.
    #[error("unknown node {0}")]
    UnknownNode(NodeId),
}

/// Top-level error type for all engine operations.
#[derive(Error, Debug)]
pub enum ScriptError {
    /// Schema or graph invariant violation.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Evaluation failure.
    #[error(transparent)]
    Eval(#[from] EvalError),

    /// Codec failure.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Binary snapshot could not be written or read.
    #[error("persistence error: {0}")]
    Persistence(#[from] bincode::Error),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, ScriptError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_display() {
        let err = SchemaError::ArgumentType {
            variant: VariantId::new("IntCompare"),
            param: "left".to_string(),
            expected: ValueType::Int,
            found: ValueType::Text,
        };
        assert_eq!(err.to_string(), "IntCompare.left expects Int, got Text");
    }

    #[test]
    fn test_action_failed_source() {
        use std::error::Error as _;

        let err = EvalError::ActionFailed {
            node: NodeId::new(3),
            source: ServiceError::UnknownBlock(ResourceKey::new("core", "nope")),
        };
        assert!(err.to_string().contains("core:nope"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_script_error_from() {
        let err: ScriptError = SchemaError::UnknownNode(NodeId::new(1)).into();
        assert!(matches!(err, ScriptError::Schema(_)));

        let err: ScriptError = CodecError::Empty.into();
        assert_eq!(err.to_string(), "empty encoding");
    }
}
