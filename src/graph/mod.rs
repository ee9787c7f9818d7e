//! Node graph model.
//!
//! Rules are stored as a graph of typed nodes. Each node has a kind
//! (value, expression, action, event, conditional), a variant that fixes
//! its parameters and result type, and argument bindings to child nodes.
//!
//! ## Key Components
//!
//! - [`ValueType`], [`NodeKind`], [`Literal`]: the type vocabulary
//! - [`VariantDef`], [`VariantRegistry`]: closed but extensible schemas
//! - [`Node`], [`NodeId`], [`NodeTree`]: nodes and their detached snapshots
//! - [`NodeArena`]: storage with schema-checked mutation
//!
//! ## Example Usage
//!
//! ```
//! use scenario_script::graph::{Literal, NodeArena, VariantRegistry};
//!
//! let registry = VariantRegistry::with_builtins();
//! let mut arena = NodeArena::new();
//!
//! let five = arena.create_node(&registry, "IntValue", &[], Some(Literal::Int(5))).unwrap();
//! let three = arena.create_node(&registry, "IntValue", &[], Some(Literal::Int(3))).unwrap();
//! let cmp = arena
//!     .create_node(&registry, "IntCompare", &[("left", five), ("right", three)], None)
//!     .unwrap();
//!
//! assert_eq!(arena.get_argument(cmp, "left"), Some(five));
//!
//! // A text child cannot fill an integer slot
//! let text = arena.create_node(&registry, "StringValue", &[], Some("x".into())).unwrap();
//! assert!(arena.set_argument(&registry, cmp, "left", text).is_err());
//! assert_eq!(arena.get_argument(cmp, "left"), Some(five));
//! ```

mod arena;
mod node;
mod schema;
mod types;

pub use arena::NodeArena;
pub use node::{Binding, Node, NodeId, NodeTree, Owner};
pub use schema::{ParamSpec, VariantDef, VariantId, VariantRegistry};
pub use types::{Comparator, DamageType, Literal, NodeKind, ValueType};

pub(crate) use schema::is_identifier;
