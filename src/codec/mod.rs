//! Text interchange format for node graphs.
//!
//! A node and its argument subtree become one line per node, each shaped
//! `<path><marker><payload>`:
//!
//! - `path` is one `{param}` segment per level below the root
//! - `#` lines define a node; the payload is its variant
//! - `$` lines give a value node's literal; they follow its `#` line
//!
//! ```text
//! #IntCompare
//! {left}#CountOfBlock
//! {left}{player}#TriggeringPlayer
//! {left}{block}#BlockValue
//! {left}{block}$core:stone
//! {right}#IntValue
//! {right}$5
//! ```
//!
//! Literals are written as decimal integers, escaped text (`\\`, `\n`,
//! `\r`), symbolic enum names and resource keys. Regions are written as
//! `uuid:<stable id>`, or `local:<id>` when the region has no stable id.
//!
//! ## Example Usage
//!
//! ```
//! use scenario_script::codec::{decode, encode_to_string};
//! use scenario_script::domain::InMemoryWorld;
//! use scenario_script::graph::{NodeTree, VariantRegistry};
//! use scenario_script::scenario::Scenario;
//!
//! let registry = VariantRegistry::with_builtins();
//! let mut scenario = Scenario::new("demo");
//! let tree = NodeTree::new("ConcatString")
//!     .with_arg("string1", NodeTree::text("foo"))
//!     .with_arg("string2", NodeTree::text("bar"));
//! let node = scenario.insert_tree(&registry, &tree).unwrap();
//!
//! let text = encode_to_string(&scenario, &registry, node).unwrap();
//! let copy = decode(&mut scenario, &registry, &InMemoryWorld::new(), &text).unwrap();
//! assert_eq!(scenario.nodes().snapshot(copy), Some(tree));
//! ```

mod decode;
mod encode;
mod literal;
mod trigger;

pub use decode::decode;
pub use encode::{encode, encode_to_string};
pub use trigger::{export_trigger, import_trigger};

/// Marker of a definition line.
const DEFINITION: char = '#';
/// Marker of a value line.
const VALUE: char = '$';
