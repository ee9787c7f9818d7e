//! Variant schemas and the registry that holds them.
//!
//! A variant fixes a node's parameters, result type, evaluation rule and
//! display template. The [`VariantRegistry`] is the only extension point of
//! the language: adding a rule type means registering one [`VariantDef`].
//! The evaluator, the engine and the codec all look variants up here and
//! never branch on specific variants themselves.
//!
//! ## Example
//!
//! ```
//! use scenario_script::graph::{NodeKind, ValueType, VariantDef, VariantRegistry};
//! use scenario_script::eval::Value;
//!
//! let mut registry = VariantRegistry::with_builtins();
//!
//! // A host-specific expression: always 42.
//! let answer = VariantDef::new("Answer", NodeKind::Expression, ValueType::Int, |_, _| {
//!     Ok(Value::Int(42))
//! })
//! .with_display("the answer");
//!
//! registry.register(answer).unwrap();
//! assert!(registry.get("Answer").is_some());
//! ```

use std::borrow::{Borrow, Cow};

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::SchemaError;
use crate::eval::EvalRule;
use crate::triggers::OccurrenceKind;

use super::types::{Literal, NodeKind, ValueType};

/// Name of a variant, e.g. `IntCompare`.
///
/// Built-in variants are `const`; hosts may register variants with names
/// built at runtime. Names are plain identifiers so they can appear in the
/// text codec unescaped.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VariantId(Cow<'static, str>);

impl VariantId {
    /// Create a variant ID from a static name.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    /// Create a variant ID from an owned name.
    #[must_use]
    pub fn owned(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    /// The variant name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for VariantId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for VariantId {
    fn from(name: &'static str) -> Self {
        Self::new(name)
    }
}

impl std::fmt::Display for VariantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A declared parameter of a variant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParamSpec {
    /// Parameter name, unique within the variant.
    pub name: Cow<'static, str>,
    /// Result type the bound child must have.
    pub ty: ValueType,
    /// Value used when the slot is unset. Parameters without a default are
    /// required.
    pub default: Option<Literal>,
}

impl ParamSpec {
    /// Whether the parameter must be bound.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }
}

/// Complete definition of a variant.
#[derive(Clone, Debug)]
pub struct VariantDef {
    /// Unique identifier.
    pub id: VariantId,

    /// Role of nodes of this variant.
    pub kind: NodeKind,

    /// Type every node of this variant produces.
    pub result: ValueType,

    /// Parameters in declaration order. This order drives evaluation of
    /// order-sensitive rules and codec traversal.
    pub params: Vec<ParamSpec>,

    /// Literal type carried by value nodes; `None` for all other kinds.
    pub literal: Option<ValueType>,

    /// How to evaluate a node of this variant.
    pub rule: EvalRule,

    /// Display template. `{param}` is replaced by the child's display text.
    /// An empty template displays the variant name (or the literal).
    pub display: Cow<'static, str>,

    /// Occurrence kind an event variant listens for.
    pub occurrence: Option<OccurrenceKind>,
}

impl VariantDef {
    /// Create a definition with no parameters.
    pub fn new(
        id: impl Into<VariantId>,
        kind: NodeKind,
        result: ValueType,
        rule: EvalRule,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            result,
            params: Vec::new(),
            literal: None,
            rule,
            display: Cow::Borrowed(""),
            occurrence: None,
        }
    }

    /// Declare a required parameter (builder pattern).
    #[must_use]
    pub fn param(mut self, name: &'static str, ty: ValueType) -> Self {
        self.params.push(ParamSpec {
            name: Cow::Borrowed(name),
            ty,
            default: None,
        });
        self
    }

    /// Declare a parameter with a default value (builder pattern).
    #[must_use]
    pub fn param_with_default(
        mut self,
        name: &'static str,
        ty: ValueType,
        default: impl Into<Literal>,
    ) -> Self {
        self.params.push(ParamSpec {
            name: Cow::Borrowed(name),
            ty,
            default: Some(default.into()),
        });
        self
    }

    /// Mark this as a value variant carrying a literal of its result type
    /// (builder pattern).
    #[must_use]
    pub fn with_literal(mut self) -> Self {
        self.literal = Some(self.result);
        self
    }

    /// Set the display template (builder pattern).
    #[must_use]
    pub fn with_display(mut self, template: impl Into<Cow<'static, str>>) -> Self {
        self.display = template.into();
        self
    }

    /// Listen for an occurrence kind (builder pattern). Events only.
    #[must_use]
    pub fn on_occurrence(mut self, kind: OccurrenceKind) -> Self {
        self.occurrence = Some(kind);
        self
    }

    /// Look up a parameter by name.
    #[must_use]
    pub fn param_spec(&self, name: &str) -> Option<&ParamSpec> {
        self.params.iter().find(|p| p.name == name)
    }

    fn validate(&self) -> Result<(), SchemaError> {
        if !is_identifier(self.id.as_str()) {
            return Err(SchemaError::UnknownVariant(self.id.to_string()));
        }

        for (i, param) in self.params.iter().enumerate() {
            let duplicate = self.params[..i].iter().any(|p| p.name == param.name);
            if duplicate || !is_identifier(&param.name) {
                return Err(SchemaError::InvalidParameterName {
                    variant: self.id.clone(),
                    param: param.name.to_string(),
                });
            }
            if let Some(default) = &param.default {
                if default.value_type() != param.ty || default.is_reference() {
                    return Err(SchemaError::LiteralMismatch {
                        variant: self.id.clone(),
                        expected: Some(param.ty),
                        found: Some(default.value_type()),
                    });
                }
            }
        }

        let literal_ok = match self.kind {
            NodeKind::Value => self.literal == Some(self.result) && self.params.is_empty(),
            _ => self.literal.is_none(),
        };
        if !literal_ok {
            return Err(SchemaError::LiteralMismatch {
                variant: self.id.clone(),
                expected: (self.kind == NodeKind::Value).then_some(self.result),
                found: self.literal,
            });
        }

        let kind_ok = match self.kind {
            NodeKind::Event => self.occurrence.is_some() && self.result == ValueType::Unit,
            NodeKind::Action => self.occurrence.is_none() && self.result == ValueType::Unit,
            NodeKind::Conditional => self.occurrence.is_none() && self.result == ValueType::Bool,
            NodeKind::Value | NodeKind::Expression => {
                self.occurrence.is_none() && self.result != ValueType::Unit
            }
        };
        if !kind_ok {
            return Err(SchemaError::WrongKind {
                variant: self.id.clone(),
                expected: "a result type matching the variant kind",
                found: self.kind,
            });
        }

        Ok(())
    }
}

/// Registry of variant definitions.
///
/// Lookup is by name; iteration follows registration order so editor
/// dropdowns are stable.
#[derive(Clone, Debug, Default)]
pub struct VariantRegistry {
    variants: FxHashMap<VariantId, VariantDef>,
    order: Vec<VariantId>,
}

impl VariantRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding every built-in variant.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        crate::eval::builtins::register_builtins(&mut registry);
        registry
    }

    /// Register a variant.
    ///
    /// # Errors
    /// Returns `SchemaError::DuplicateVariant` if the id is taken, or another
    /// `SchemaError` if the definition is internally inconsistent.
    pub fn register(&mut self, def: VariantDef) -> Result<(), SchemaError> {
        if self.variants.contains_key(&def.id) {
            return Err(SchemaError::DuplicateVariant(def.id));
        }
        def.validate()?;

        self.order.push(def.id.clone());
        self.variants.insert(def.id.clone(), def);
        Ok(())
    }

    /// Get a variant definition by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&VariantDef> {
        self.variants.get(name)
    }

    /// Get a variant definition, failing with `SchemaError::UnknownVariant`.
    ///
    /// # Errors
    /// Returns an error if no variant has this name.
    pub fn require(&self, name: &str) -> Result<&VariantDef, SchemaError> {
        self.get(name)
            .ok_or_else(|| SchemaError::UnknownVariant(name.to_string()))
    }

    /// Check if a variant is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.variants.contains_key(name)
    }

    /// Get the number of registered variants.
    #[must_use]
    pub fn len(&self) -> usize {
        self.variants.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    /// Iterate over all variants in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &VariantDef> {
        self.order.iter().filter_map(|id| self.variants.get(id))
    }

    /// Iterate over the variants of one kind, in registration order.
    pub fn of_kind(&self, kind: NodeKind) -> impl Iterator<Item = &VariantDef> {
        self.iter().filter(move |def| def.kind == kind)
    }

    /// Iterate over the event variants listening for an occurrence kind.
    pub fn events_for(&self, occurrence: OccurrenceKind) -> impl Iterator<Item = &VariantDef> {
        self.iter().filter(move |def| def.occurrence == Some(occurrence))
    }
}

/// Whether `name` is a non-empty ASCII identifier.
pub(crate) fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
