use std::collections::BTreeMap;

use plansym_core::{
    Constant, Consumer, ErrorInfo, Literal, Operator, PartialPlan, Producer, SymError, Type,
};
use plansym_graph::{Color, ColoredGraph};
use tracing::debug;

/// Colour ids handed out for a plan, in the order types, predicates, schemas.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Palette {
    constants: BTreeMap<Type, Color>,
    variables: BTreeMap<Type, Color>,
    literals: BTreeMap<String, (Color, usize)>,
    schemas: BTreeMap<String, Color>,
    next: Color,
}

impl Palette {
    /// Assigns colours for every type, predicate and operator schema of `plan`.
    pub fn for_plan(plan: &PartialPlan) -> Self {
        let mut palette = Self::default();
        for ty in &plan.domain.types {
            if palette.constants.contains_key(ty) {
                continue;
            }
            let constant = palette.fresh();
            let variable = palette.fresh();
            palette.constants.insert(ty.clone(), constant);
            palette.variables.insert(ty.clone(), variable);
        }
        for predicate in &plan.domain.predicates {
            if palette.literals.contains_key(&predicate.name) {
                continue;
            }
            // negative literals take the id right after the positive one
            let positive = palette.fresh();
            palette.fresh();
            palette
                .literals
                .insert(predicate.name.clone(), (positive, predicate.arity()));
        }
        for op in plan.operators() {
            if !palette.schemas.contains_key(op.schema()) {
                let color = palette.fresh();
                palette.schemas.insert(op.schema().to_string(), color);
            }
        }
        palette
    }

    fn fresh(&mut self) -> Color {
        let color = self.next;
        self.next += 1;
        color
    }

    /// Number of colours handed out.
    pub fn len(&self) -> usize {
        self.next as usize
    }

    /// Whether no colour was handed out.
    pub fn is_empty(&self) -> bool {
        self.next == 0
    }

    /// Colour of constants of type `ty`.
    pub fn constant(&self, ty: &Type) -> Result<Color, SymError> {
        self.constants
            .get(ty)
            .copied()
            .ok_or_else(|| unknown_type(ty))
    }

    /// Colour of operator variables of type `ty`.
    pub fn variable(&self, ty: &Type) -> Result<Color, SymError> {
        self.variables
            .get(ty)
            .copied()
            .ok_or_else(|| unknown_type(ty))
    }

    /// Colour of `literal`, distinguishing predicate and polarity.
    pub fn literal(&self, literal: &Literal) -> Result<Color, SymError> {
        let (positive, arity) = self.literals.get(&literal.atom.predicate).ok_or_else(|| {
            SymError::Plan(
                ErrorInfo::new("unknown-predicate", "literal uses an undeclared predicate")
                    .with_context("literal", literal.to_string()),
            )
        })?;
        if *arity != literal.arity() {
            return Err(SymError::Plan(
                ErrorInfo::new("arity-mismatch", "literal arity differs from its predicate")
                    .with_context("literal", literal.to_string())
                    .with_context("expected", arity.to_string()),
            ));
        }
        Ok(if literal.value { *positive } else { positive + 1 })
    }

    /// Colour of operators of schema `schema`.
    pub fn schema(&self, schema: &str) -> Result<Color, SymError> {
        self.schemas.get(schema).copied().ok_or_else(|| {
            SymError::Plan(
                ErrorInfo::new("unknown-schema", "operator schema has no colour")
                    .with_context("schema", schema),
            )
        })
    }
}

fn unknown_type(ty: &Type) -> SymError {
    SymError::Plan(
        ErrorInfo::new("unknown-type", "type is not declared by the domain")
            .with_context("type", ty.name())
            .with_hint("list every constant and variable type in domain.types"),
    )
}

/// Coloured graph of a plan plus the literal occurrences behind its
/// literal-head vertices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanEncoding {
    graph: ColoredGraph,
    palette: Palette,
    operator_vertices: BTreeMap<String, usize>,
    vertex_to_producer: BTreeMap<usize, Producer>,
    vertex_to_consumer: BTreeMap<usize, Consumer>,
}

impl PlanEncoding {
    /// The encoded graph.
    pub fn graph(&self) -> &ColoredGraph {
        &self.graph
    }

    /// Colours used by the graph.
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Vertex of the operator instance called `name`.
    pub fn operator_vertex(&self, name: &str) -> Option<usize> {
        self.operator_vertices.get(name).copied()
    }

    /// Producer represented by literal-head vertex `v`.
    pub fn producer(&self, v: usize) -> Option<&Producer> {
        self.vertex_to_producer.get(&v)
    }

    /// Consumer represented by literal-head vertex `v`.
    pub fn consumer(&self, v: usize) -> Option<&Consumer> {
        self.vertex_to_consumer.get(&v)
    }

    /// Head vertices of the initial-state literals.
    pub fn vertex_to_producer(&self) -> &BTreeMap<usize, Producer> {
        &self.vertex_to_producer
    }

    /// Head vertices of the goal literals.
    pub fn vertex_to_consumer(&self) -> &BTreeMap<usize, Consumer> {
        &self.vertex_to_consumer
    }

    /// Drops the lookup tables and returns the graph.
    pub fn into_graph(self) -> ColoredGraph {
        self.graph
    }
}

/// Encodes a partial plan as a coloured graph whose automorphisms are the
/// candidate causal-structure symmetries of the plan.
///
/// Vertices are numbered constants first (domain, then problem), then the
/// variables of every real step, then one vertex per operator instance, then
/// the literals of `init` and `goal`. Each literal contributes a head vertex
/// followed by one vertex per argument position.
#[derive(Debug, Clone, Copy)]
pub struct ColoredGraphEncoder<'a> {
    plan: &'a PartialPlan,
}

impl<'a> ColoredGraphEncoder<'a> {
    /// Encoder for `plan`.
    pub fn new(plan: &'a PartialPlan) -> Self {
        Self { plan }
    }

    /// Builds the graph and the producer/consumer lookup tables.
    pub fn encode(&self) -> Result<PlanEncoding, SymError> {
        let plan = self.plan;
        let palette = Palette::for_plan(plan);
        let mut graph = ColoredGraph::new();

        let mut constant_vertices: BTreeMap<&Constant, usize> = BTreeMap::new();
        for constant in plan.constants() {
            if constant_vertices.contains_key(constant) {
                continue;
            }
            let v = graph.add_vertex(palette.constant(&constant.ty)?);
            constant_vertices.insert(constant, v);
        }

        let mut variable_vertices: Vec<(&Operator, Vec<usize>)> = Vec::new();
        for op in plan.operators().filter(|op| !plan.is_pseudo(op)) {
            let mut ids = Vec::with_capacity(op.variables.len());
            for variable in &op.variables {
                ids.push(graph.add_vertex(palette.variable(&variable.ty)?));
            }
            variable_vertices.push((op, ids));
        }

        let mut operator_vertices = BTreeMap::new();
        for op in plan.operators() {
            let v = graph.add_vertex(palette.schema(op.schema())?);
            operator_vertices.insert(op.name.clone(), v);
        }

        for (op, ids) in &variable_vertices {
            let mut previous = operator_vertices[&op.name];
            for &v in ids {
                graph.add_edge(previous, v)?;
                previous = v;
            }
        }

        let mut literals = LiteralWriter {
            plan,
            palette: &palette,
            constant_vertices: &constant_vertices,
            graph: &mut graph,
        };
        let mut vertex_to_producer = BTreeMap::new();
        let init_vertex = operator_vertices[&plan.init.name];
        for literal in &plan.init.postconditions {
            let head = literals.add(init_vertex, literal)?;
            vertex_to_producer.insert(head, Producer::new(&plan.init.name, literal.clone()));
        }
        let mut vertex_to_consumer = BTreeMap::new();
        let goal_vertex = operator_vertices[&plan.goal.name];
        for literal in &plan.goal.preconditions {
            let head = literals.add(goal_vertex, literal)?;
            vertex_to_consumer.insert(head, Consumer::new(&plan.goal.name, literal.clone()));
        }

        debug!(
            vertices = graph.vertex_count(),
            edges = graph.edge_count(),
            colors = palette.len(),
            producers = vertex_to_producer.len(),
            consumers = vertex_to_consumer.len(),
            "encoded plan as coloured graph"
        );

        Ok(PlanEncoding {
            graph,
            palette,
            operator_vertices,
            vertex_to_producer,
            vertex_to_consumer,
        })
    }
}

struct LiteralWriter<'p, 'g> {
    plan: &'p PartialPlan,
    palette: &'p Palette,
    constant_vertices: &'p BTreeMap<&'p Constant, usize>,
    graph: &'g mut ColoredGraph,
}

impl LiteralWriter<'_, '_> {
    /// Adds the head and argument chain of `literal` below `operator`.
    /// Returns the head vertex.
    fn add(&mut self, operator: usize, literal: &Literal) -> Result<usize, SymError> {
        let color = self.palette.literal(literal)?;
        let head = self.graph.add_vertex(color);
        self.graph.add_edge(operator, head)?;
        let mut previous = head;
        for arg in &literal.atom.args {
            let v = self.graph.add_vertex(color);
            self.graph.add_edge(previous, v)?;
            let constant = self.plan.substitution.apply(arg).ok_or_else(|| {
                SymError::Plan(
                    ErrorInfo::new("unbound-argument", "literal argument has no binding")
                        .with_context("literal", literal.to_string())
                        .with_context("variable", arg.name.clone()),
                )
            })?;
            let target = self.constant_vertices.get(constant).ok_or_else(|| {
                SymError::Plan(
                    ErrorInfo::new("unknown-constant", "binding names an undeclared constant")
                        .with_context("literal", literal.to_string())
                        .with_context("constant", constant.name.clone()),
                )
            })?;
            self.graph.add_edge(v, *target)?;
            previous = v;
        }
        Ok(head)
    }
}

#[cfg(test)]
mod tests {
    use plansym_core::{Domain, Predicate, Problem, Substitution, Variable};

    use super::*;

    fn plan() -> PartialPlan {
        let block = Type::new("block");
        let x = Variable::new("?x", block.clone());
        let a = Constant::new("a", block.clone());
        let domain = Domain {
            name: "d".into(),
            types: vec![block.clone()],
            predicates: vec![Predicate::new("clear", vec![block.clone()])],
            constants: vec![],
        };
        let problem = Problem {
            name: "p".into(),
            objects: vec![a.clone()],
        };
        let init = Operator::new(
            "init",
            vec![x.clone()],
            vec![],
            vec![Literal::new("clear", vec![x.clone()], true)],
        );
        let goal = Operator::new("goal", vec![], vec![], vec![]);
        let substitution: Substitution = [(x, a)].into_iter().collect();
        PartialPlan::new(domain, problem, init, goal, vec![], substitution).unwrap()
    }

    #[test]
    fn palette_orders_types_predicates_schemas() {
        let palette = Palette::for_plan(&plan());
        let block = Type::new("block");
        assert_eq!(palette.constant(&block).unwrap(), 0);
        assert_eq!(palette.variable(&block).unwrap(), 1);
        let clear = Literal::new("clear", vec![Variable::new("?y", block)], true);
        assert_eq!(palette.literal(&clear).unwrap(), 2);
        assert_eq!(palette.literal(&clear.negated()).unwrap(), 3);
        assert_eq!(palette.schema("init").unwrap(), 4);
        assert_eq!(palette.schema("goal").unwrap(), 5);
        assert_eq!(palette.len(), 6);
    }

    #[test]
    fn literal_chain_reaches_bound_constant() {
        let encoding = ColoredGraphEncoder::new(&plan()).encode().unwrap();
        // a, init, goal, clear head, clear arg
        let graph = encoding.graph();
        assert_eq!(graph.vertex_count(), 5);
        assert!(graph.has_edge(1, 3));
        assert!(graph.has_edge(3, 4));
        assert!(graph.has_edge(4, 0));
        assert_eq!(encoding.producer(3).map(|p| p.operator.as_str()), Some("init"));
        assert!(encoding.vertex_to_consumer().is_empty());
    }

    fn plan_error(plan: &PartialPlan) -> String {
        match ColoredGraphEncoder::new(plan).encode() {
            Err(SymError::Plan(info)) => info.code,
            other => panic!("expected a plan error, got {other:?}"),
        }
    }

    #[test]
    fn unbound_init_argument_is_rejected() {
        let mut plan = plan();
        plan.substitution = Substitution::new();
        assert_eq!(plan_error(&plan), "unbound-argument");
    }

    #[test]
    fn binding_to_undeclared_constant_is_rejected() {
        let mut plan = plan();
        let x = plan.init.variables[0].clone();
        plan.substitution.bind(x, Constant::new("ghost", Type::new("block")));
        assert_eq!(plan_error(&plan), "unknown-constant");
    }

    #[test]
    fn literal_arity_must_match_predicate() {
        let mut plan = plan();
        let block = Type::new("block");
        plan.domain.predicates = vec![Predicate::new("clear", vec![block.clone(), block])];
        assert_eq!(plan_error(&plan), "arity-mismatch");
    }

    #[test]
    fn undeclared_predicate_is_rejected() {
        let mut plan = plan();
        plan.domain.predicates = vec![Predicate::new("free", vec![Type::new("block")])];
        assert_eq!(plan_error(&plan), "unknown-predicate");
    }

    #[test]
    fn step_variable_of_undeclared_type_is_rejected() {
        let mut plan = plan();
        let hand = Variable::new("?h", Type::new("hand"));
        plan.steps.push(Operator::new("1_grip", vec![hand], vec![], vec![]));
        let err = ColoredGraphEncoder::new(&plan).encode().unwrap_err();
        assert_eq!(err.info().code, "unknown-type");
        assert_eq!(err.info().context.get("type").map(String::as_str), Some("hand"));
    }

    #[test]
    fn constant_of_undeclared_type_is_rejected() {
        let mut plan = plan();
        plan.domain.types.clear();
        assert_eq!(plan_error(&plan), "unknown-type");
    }
}
