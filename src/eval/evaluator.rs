//! Type-directed evaluation of rule graphs.
//!
//! Evaluation never branches on specific variants: the evaluator looks the
//! node's variant up in the registry and calls its [`EvalRule`]. Rules pull
//! their arguments back through the typed helpers (`arg_int`, `arg_text`,
//! ...), which take care of defaults, unset slots and type contracts.

use tracing::trace;

use crate::core::{ActorId, RandomSource, ResourceKey, DEFAULT_MAX_DEPTH};
use crate::domain::DomainServices;
use crate::error::EvalError;
use crate::graph::{Comparator, DamageType, Literal, Node, NodeId, ValueType, VariantRegistry};
use crate::scenario::{Region, RegionId, Scenario};

use super::context::Context;
use super::value::Value;

/// Evaluation rule of a variant.
///
/// Receives the evaluator (for arguments, context and services) and the
/// node being evaluated. Must return a value of the variant's result type.
pub type EvalRule = fn(&mut Evaluator<'_>, &Node) -> Result<Value, EvalError>;

/// Evaluates nodes of one scenario against one occurrence context.
pub struct Evaluator<'a> {
    registry: &'a VariantRegistry,
    scenario: &'a Scenario,
    context: &'a Context,
    services: &'a mut dyn DomainServices,
    rng: &'a mut dyn RandomSource,
    max_depth: usize,
    depth: usize,
}

impl<'a> Evaluator<'a> {
    /// Create an evaluator with the default depth limit.
    pub fn new(
        registry: &'a VariantRegistry,
        scenario: &'a Scenario,
        context: &'a Context,
        services: &'a mut dyn DomainServices,
        rng: &'a mut dyn RandomSource,
    ) -> Self {
        Self {
            registry,
            scenario,
            context,
            services,
            rng,
            max_depth: DEFAULT_MAX_DEPTH,
            depth: 0,
        }
    }

    /// Set the nesting limit (builder pattern).
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Evaluate a node to a value of its declared result type.
    ///
    /// # Errors
    /// Returns the first `EvalError` raised by the node or its children.
    pub fn evaluate(&mut self, id: NodeId) -> Result<Value, EvalError> {
        let scenario = self.scenario;
        let registry = self.registry;
        let node = scenario.nodes().get(id).ok_or(EvalError::UnknownNode(id))?;
        let def = registry
            .get(node.variant().as_str())
            .ok_or_else(|| EvalError::UnknownVariant(node.variant().clone()))?;

        if self.depth >= self.max_depth {
            return Err(EvalError::DepthExceeded(self.max_depth));
        }

        self.depth += 1;
        let result = (def.rule)(self, node);
        self.depth -= 1;

        let value = result?;
        if value.value_type() != node.result_type() {
            return Err(EvalError::TypeMismatch {
                node: id,
                expected: node.result_type(),
                found: value.value_type(),
            });
        }
        trace!(node = %id, variant = %node.variant(), value = %value, "evaluated");
        Ok(value)
    }

    /// Evaluate a node whose result type must be `expected`.
    ///
    /// The declared type is checked before anything is evaluated, so a
    /// contract violation has no side effects.
    ///
    /// # Errors
    /// Returns `EvalError::TypeMismatch` if the node declares another type,
    /// or any error raised while evaluating it.
    pub fn evaluate_as(&mut self, id: NodeId, expected: ValueType) -> Result<Value, EvalError> {
        let node = self
            .scenario
            .nodes()
            .get(id)
            .ok_or(EvalError::UnknownNode(id))?;
        if node.result_type() != expected {
            return Err(EvalError::TypeMismatch {
                node: id,
                expected,
                found: node.result_type(),
            });
        }
        self.evaluate(id)
    }

    /// Evaluate a boolean node.
    ///
    /// # Errors
    /// See [`evaluate_as`](Self::evaluate_as).
    pub fn evaluate_bool(&mut self, id: NodeId) -> Result<bool, EvalError> {
        match self.evaluate_as(id, ValueType::Bool)? {
            Value::Bool(b) => Ok(b),
            other => Err(mismatch(id, ValueType::Bool, &other)),
        }
    }

    /// Evaluate the argument bound to `param`.
    ///
    /// An unset slot falls back to the parameter's default literal; an unset
    /// slot without a default is `EvalError::MissingArgument`.
    ///
    /// # Errors
    /// Returns an error if the slot is unusable or its child fails.
    pub fn arg(&mut self, node: &Node, param: &str) -> Result<Value, EvalError> {
        if let Some(child) = node.argument(param) {
            return self.evaluate(child);
        }

        let registry = self.registry;
        let default = registry
            .get(node.variant().as_str())
            .and_then(|def| def.param_spec(param))
            .and_then(|spec| spec.default.as_ref());
        match default {
            Some(literal) => self.literal_value(node.id(), literal),
            None => Err(EvalError::MissingArgument {
                node: node.id(),
                param: param.to_string(),
            }),
        }
    }

    /// Evaluate an integer argument.
    ///
    /// # Errors
    /// See [`arg`](Self::arg).
    pub fn arg_int(&mut self, node: &Node, param: &str) -> Result<i64, EvalError> {
        match self.arg(node, param)? {
            Value::Int(v) => Ok(v),
            other => Err(mismatch(node.id(), ValueType::Int, &other)),
        }
    }

    /// Evaluate a text argument.
    ///
    /// # Errors
    /// See [`arg`](Self::arg).
    pub fn arg_text(&mut self, node: &Node, param: &str) -> Result<String, EvalError> {
        match self.arg(node, param)? {
            Value::Text(v) => Ok(v),
            other => Err(mismatch(node.id(), ValueType::Text, &other)),
        }
    }

    /// Evaluate a boolean argument.
    ///
    /// # Errors
    /// See [`arg`](Self::arg).
    pub fn arg_bool(&mut self, node: &Node, param: &str) -> Result<bool, EvalError> {
        match self.arg(node, param)? {
            Value::Bool(v) => Ok(v),
            other => Err(mismatch(node.id(), ValueType::Bool, &other)),
        }
    }

    /// Evaluate a comparator argument.
    ///
    /// # Errors
    /// See [`arg`](Self::arg).
    pub fn arg_comparator(&mut self, node: &Node, param: &str) -> Result<Comparator, EvalError> {
        match self.arg(node, param)? {
            Value::Comparator(v) => Ok(v),
            other => Err(mismatch(node.id(), ValueType::Comparator, &other)),
        }
    }

    /// Evaluate a damage type argument.
    ///
    /// # Errors
    /// See [`arg`](Self::arg).
    pub fn arg_damage_type(&mut self, node: &Node, param: &str) -> Result<DamageType, EvalError> {
        match self.arg(node, param)? {
            Value::DamageType(v) => Ok(v),
            other => Err(mismatch(node.id(), ValueType::DamageType, &other)),
        }
    }

    /// Evaluate an entity argument.
    ///
    /// # Errors
    /// See [`arg`](Self::arg).
    pub fn arg_entity(&mut self, node: &Node, param: &str) -> Result<ActorId, EvalError> {
        match self.arg(node, param)? {
            Value::Entity(v) => Ok(v),
            other => Err(mismatch(node.id(), ValueType::Entity, &other)),
        }
    }

    /// Evaluate a block argument.
    ///
    /// # Errors
    /// See [`arg`](Self::arg).
    pub fn arg_block(&mut self, node: &Node, param: &str) -> Result<ResourceKey, EvalError> {
        match self.arg(node, param)? {
            Value::Block(v) => Ok(v),
            other => Err(mismatch(node.id(), ValueType::Block, &other)),
        }
    }

    /// Evaluate an item argument.
    ///
    /// # Errors
    /// See [`arg`](Self::arg).
    pub fn arg_item(&mut self, node: &Node, param: &str) -> Result<ResourceKey, EvalError> {
        match self.arg(node, param)? {
            Value::Item(v) => Ok(v),
            other => Err(mismatch(node.id(), ValueType::Item, &other)),
        }
    }

    /// Evaluate a region argument.
    ///
    /// # Errors
    /// See [`arg`](Self::arg).
    pub fn arg_region(&mut self, node: &Node, param: &str) -> Result<RegionId, EvalError> {
        match self.arg(node, param)? {
            Value::Region(v) => Ok(v),
            other => Err(mismatch(node.id(), ValueType::Region, &other)),
        }
    }

    /// Turn a literal into a value, checking that references still resolve.
    ///
    /// # Errors
    /// Returns `EvalError::DanglingReference` if a block, item or region
    /// named by the literal no longer exists.
    pub fn literal_value(&self, node: NodeId, literal: &Literal) -> Result<Value, EvalError> {
        let dangling = |reference: String| EvalError::DanglingReference { node, reference };
        Ok(match literal {
            Literal::Int(v) => Value::Int(*v),
            Literal::Text(v) => Value::Text(v.clone()),
            Literal::Bool(v) => Value::Bool(*v),
            Literal::Comparator(c) => Value::Comparator(*c),
            Literal::DamageType(d) => Value::DamageType(*d),
            Literal::Block(key) => {
                if !self.services.block_exists(key) {
                    return Err(dangling(key.to_string()));
                }
                Value::Block(key.clone())
            }
            Literal::Item(key) => {
                if !self.services.item_exists(key) {
                    return Err(dangling(key.to_string()));
                }
                Value::Item(key.clone())
            }
            Literal::Region(id) => {
                if self.scenario.region(*id).is_none() {
                    return Err(dangling(id.to_string()));
                }
                Value::Region(*id)
            }
        })
    }

    /// Resolve a region id to the scenario's region.
    ///
    /// # Errors
    /// Returns `EvalError::DanglingReference` if the region was removed.
    pub fn region(&self, node: NodeId, id: RegionId) -> Result<&'a Region, EvalError> {
        let scenario = self.scenario;
        scenario
            .region(id)
            .ok_or_else(|| EvalError::DanglingReference {
                node,
                reference: id.to_string(),
            })
    }

    /// The occurrence context.
    #[must_use]
    pub fn context(&self) -> &Context {
        self.context
    }

    /// The scenario being evaluated.
    #[must_use]
    pub fn scenario(&self) -> &'a Scenario {
        self.scenario
    }

    /// Domain services for reads and side effects.
    pub fn services(&mut self) -> &mut dyn DomainServices {
        &mut *self.services
    }

    /// The random source.
    pub fn rng(&mut self) -> &mut dyn RandomSource {
        &mut *self.rng
    }
}

fn mismatch(node: NodeId, expected: ValueType, found: &Value) -> EvalError {
    EvalError::TypeMismatch {
        node,
        expected,
        found: found.value_type(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ScriptRng;
    use crate::domain::InMemoryWorld;
    use crate::graph::NodeTree;
    use crate::scenario::RegionBounds;
    use crate::triggers::OccurrenceKind;

    struct Fixture {
        registry: VariantRegistry,
        scenario: Scenario,
        world: InMemoryWorld,
        rng: ScriptRng,
        context: Context,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                registry: VariantRegistry::with_builtins(),
                scenario: Scenario::new("test"),
                world: InMemoryWorld::new().with_block("core:stone"),
                rng: ScriptRng::new(7),
                context: Context::empty(OccurrenceKind::PlayerSpawned),
            }
        }

        fn insert(&mut self, tree: &NodeTree) -> NodeId {
            self.scenario.insert_tree(&self.registry, tree).unwrap()
        }

        fn eval(&mut self, id: NodeId) -> Result<Value, EvalError> {
            Evaluator::new(
                &self.registry,
                &self.scenario,
                &self.context,
                &mut self.world,
                &mut self.rng,
            )
            .evaluate(id)
        }
    }

    #[test]
    fn test_evaluate_literal() {
        let mut fx = Fixture::new();
        let id = fx.insert(&NodeTree::int(5));
        assert_eq!(fx.eval(id), Ok(Value::Int(5)));
    }

    #[test]
    fn test_default_argument_used_when_unset() {
        let mut fx = Fixture::new();
        // comparator defaults to Equal
        let id = fx.insert(
            &NodeTree::new("IntCompare")
                .with_arg("left", NodeTree::int(4))
                .with_arg("right", NodeTree::int(4)),
        );
        assert_eq!(fx.eval(id), Ok(Value::Bool(true)));
    }

    #[test]
    fn test_missing_required_argument() {
        let mut fx = Fixture::new();
        let id = fx.insert(&NodeTree::new("AddInt").with_arg("left", NodeTree::int(1)));
        assert!(matches!(
            fx.eval(id),
            Err(EvalError::MissingArgument { ref param, .. }) if param == "right"
        ));
    }

    #[test]
    fn test_dangling_block_reference() {
        let mut fx = Fixture::new();
        let id = fx.insert(&NodeTree::block("core:granite"));
        assert!(matches!(fx.eval(id), Err(EvalError::DanglingReference { .. })));

        let ok = fx.insert(&NodeTree::block("core:stone"));
        assert_eq!(
            fx.eval(ok),
            Ok(Value::Block(ResourceKey::new("core", "stone")))
        );
    }

    #[test]
    fn test_dangling_region_reference() {
        let mut fx = Fixture::new();
        let region = fx.scenario.add_region("spawn", RegionBounds::new([0.0; 3], [1.0; 3]));
        let id = fx.insert(&NodeTree::region(region));
        assert_eq!(fx.eval(id), Ok(Value::Region(region)));

        fx.scenario.remove_region(region);
        assert!(matches!(fx.eval(id), Err(EvalError::DanglingReference { .. })));
    }

    #[test]
    fn test_missing_context() {
        let mut fx = Fixture::new();
        let id = fx.insert(&NodeTree::new("TriggeringPlayer"));
        assert_eq!(fx.eval(id), Err(EvalError::MissingContext("triggering player")));
    }

    #[test]
    fn test_depth_limit() {
        let mut fx = Fixture::new();
        let mut tree = NodeTree::new("Not").with_arg("value", NodeTree::boolean(true));
        for _ in 0..10 {
            tree = NodeTree::new("Not").with_arg("value", tree);
        }
        let id = fx.insert(&tree);

        let result = Evaluator::new(
            &fx.registry,
            &fx.scenario,
            &fx.context,
            &mut fx.world,
            &mut fx.rng,
        )
        .with_max_depth(5)
        .evaluate(id);
        assert_eq!(result, Err(EvalError::DepthExceeded(5)));

        // 11 nots over true
        assert_eq!(fx.eval(id), Ok(Value::Bool(false)));
    }

    #[test]
    fn test_evaluate_as_checks_declared_type() {
        let mut fx = Fixture::new();
        let id = fx.insert(&NodeTree::int(1));
        let mut ev = Evaluator::new(
            &fx.registry,
            &fx.scenario,
            &fx.context,
            &mut fx.world,
            &mut fx.rng,
        );
        assert!(matches!(
            ev.evaluate_bool(id),
            Err(EvalError::TypeMismatch { expected: ValueType::Bool, found: ValueType::Int, .. })
        ));
        assert_eq!(ev.evaluate_as(id, ValueType::Int), Ok(Value::Int(1)));
    }

    #[test]
    fn test_unknown_node() {
        let mut fx = Fixture::new();
        assert_eq!(fx.eval(NodeId::new(99)), Err(EvalError::UnknownNode(NodeId::new(99))));
    }
}
