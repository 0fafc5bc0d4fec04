//! Typed plan model consumed by the colored graph encoder.
//!
//! Objects are plain values compared structurally; two literals with the same
//! predicate, arguments and polarity are the same literal wherever they occur.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::causal::{Consumer, Producer};
use crate::errors::{ErrorInfo, SymError};

/// Name of the pseudo-operator whose post-conditions encode the initial state.
pub const INIT_OPERATOR: &str = "init";
/// Name of the pseudo-operator whose pre-conditions encode the goal.
pub const GOAL_OPERATOR: &str = "goal";

/// Domain type. Names are normalised to trimmed lower case.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Type(String);

impl Type {
    /// Creates a type from its declared name.
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(name.as_ref().trim().to_lowercase())
    }

    /// Returns the normalised type name.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<String> for Type {
    fn from(value: String) -> Self {
        Type::new(value)
    }
}

impl From<Type> for String {
    fn from(value: Type) -> Self {
        value.0
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Predicate symbol with its parameter types.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Predicate {
    /// Predicate name.
    pub name: String,
    /// Declared parameter types, in argument order.
    #[serde(default)]
    pub params: Vec<Type>,
}

impl Predicate {
    /// Creates a predicate symbol.
    pub fn new(name: impl Into<String>, params: Vec<Type>) -> Self {
        Self {
            name: name.into(),
            params,
        }
    }

    /// Number of arguments taken by the predicate.
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

/// Typed domain constant or problem object.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Constant {
    /// Object name.
    pub name: String,
    /// Object type.
    #[serde(rename = "type")]
    pub ty: Type,
}

impl Constant {
    /// Creates a typed constant.
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// Typed operator parameter.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Variable {
    /// Variable name, unique within the plan.
    pub name: String,
    /// Variable type.
    #[serde(rename = "type")]
    pub ty: Type,
}

impl Variable {
    /// Creates a typed variable.
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// Predicate applied to variables.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Atom {
    /// Name of the applied predicate.
    pub predicate: String,
    /// Arguments in declaration order.
    #[serde(default)]
    pub args: Vec<Variable>,
}

/// Atom with a polarity.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Literal {
    /// Underlying atom.
    pub atom: Atom,
    /// `true` for a positive literal.
    pub value: bool,
}

impl Literal {
    /// Creates a literal over the named predicate.
    pub fn new(predicate: impl Into<String>, args: Vec<Variable>, value: bool) -> Self {
        Self {
            atom: Atom {
                predicate: predicate.into(),
                args,
            },
            value,
        }
    }

    /// Returns the literal with the opposite polarity.
    pub fn negated(&self) -> Self {
        Self {
            atom: self.atom.clone(),
            value: !self.value,
        }
    }

    /// Number of argument positions.
    pub fn arity(&self) -> usize {
        self.atom.args.len()
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.value {
            write!(f, "!")?;
        }
        write!(f, "{}(", self.atom.predicate)?;
        for (idx, arg) in self.atom.args.iter().enumerate() {
            if idx > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", arg.name)?;
        }
        write!(f, ")")
    }
}

/// Operator instance in a partial-order plan.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Operator {
    /// Instance name, conventionally `<index>_<schema>`.
    pub name: String,
    /// Parameters in declared argument order.
    #[serde(default)]
    pub variables: Vec<Variable>,
    /// Literals consumed by the operator.
    #[serde(default)]
    pub preconditions: Vec<Literal>,
    /// Literals produced by the operator.
    #[serde(default)]
    pub postconditions: Vec<Literal>,
}

impl Operator {
    /// Creates an operator instance.
    pub fn new(
        name: impl Into<String>,
        variables: Vec<Variable>,
        preconditions: Vec<Literal>,
        postconditions: Vec<Literal>,
    ) -> Self {
        Self {
            name: name.into(),
            variables,
            preconditions,
            postconditions,
        }
    }

    /// Schema name: the instance name with its `<index>_` prefix stripped.
    pub fn schema(&self) -> &str {
        match self.name.find('_') {
            Some(idx) => &self.name[idx + 1..],
            None => &self.name,
        }
    }

    /// Producers for every post-condition, in declaration order.
    pub fn producers(&self) -> impl Iterator<Item = Producer> + '_ {
        self.postconditions
            .iter()
            .map(move |lit| Producer::new(&self.name, lit.clone()))
    }

    /// Consumers for every pre-condition, in declaration order.
    pub fn consumers(&self) -> impl Iterator<Item = Consumer> + '_ {
        self.preconditions
            .iter()
            .map(move |lit| Consumer::new(&self.name, lit.clone()))
    }

    fn check_variables(&self) -> Result<(), SymError> {
        let declared: BTreeSet<&Variable> = self.variables.iter().collect();
        for literal in self.preconditions.iter().chain(&self.postconditions) {
            for arg in &literal.atom.args {
                if !declared.contains(arg) {
                    return Err(SymError::Plan(
                        ErrorInfo::new("undeclared-variable", "literal uses an undeclared variable")
                            .with_context("operator", self.name.clone())
                            .with_context("literal", literal.to_string())
                            .with_context("variable", arg.name.clone()),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Serialized form of a single substitution entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    /// Bound variable.
    pub variable: Variable,
    /// Constant the variable is bound to.
    pub constant: Constant,
}

/// Binding of variables to constants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Binding>", into = "Vec<Binding>")]
pub struct Substitution {
    map: BTreeMap<Variable, Constant>,
}

impl Substitution {
    /// Creates an empty substitution.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `variable` to `constant`, replacing any previous binding.
    pub fn bind(&mut self, variable: Variable, constant: Constant) {
        self.map.insert(variable, constant);
    }

    /// Returns the constant bound to `variable`.
    pub fn apply(&self, variable: &Variable) -> Option<&Constant> {
        self.map.get(variable)
    }

    /// Number of bound variables.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether no variable is bound.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl From<Vec<Binding>> for Substitution {
    fn from(value: Vec<Binding>) -> Self {
        Self {
            map: value
                .into_iter()
                .map(|binding| (binding.variable, binding.constant))
                .collect(),
        }
    }
}

impl From<Substitution> for Vec<Binding> {
    fn from(value: Substitution) -> Self {
        value
            .map
            .into_iter()
            .map(|(variable, constant)| Binding { variable, constant })
            .collect()
    }
}

impl FromIterator<(Variable, Constant)> for Substitution {
    fn from_iter<I: IntoIterator<Item = (Variable, Constant)>>(iter: I) -> Self {
        Self {
            map: iter.into_iter().collect(),
        }
    }
}

/// Type, predicate and constant catalogue of a planning domain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    /// Domain name.
    pub name: String,
    /// Declared types in enumeration order.
    #[serde(default)]
    pub types: Vec<Type>,
    /// Declared predicates in enumeration order.
    #[serde(default)]
    pub predicates: Vec<Predicate>,
    /// Domain-level constants.
    #[serde(default)]
    pub constants: Vec<Constant>,
}

/// Problem instance objects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    /// Problem name.
    pub name: String,
    /// Problem objects.
    #[serde(default)]
    pub objects: Vec<Constant>,
}

/// Partial-order plan bracketed by the initial and goal pseudo-operators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialPlan {
    /// Domain catalogue.
    pub domain: Domain,
    /// Problem objects.
    pub problem: Problem,
    /// Pseudo-operator producing the initial state.
    pub init: Operator,
    /// Pseudo-operator consuming the goal.
    pub goal: Operator,
    /// Plan steps in plan order.
    #[serde(default)]
    pub steps: Vec<Operator>,
    /// Original binding of every operator variable to a constant.
    #[serde(default)]
    pub substitution: Substitution,
}

impl PartialPlan {
    /// Creates a plan and validates its structure.
    pub fn new(
        domain: Domain,
        problem: Problem,
        init: Operator,
        goal: Operator,
        steps: Vec<Operator>,
        substitution: Substitution,
    ) -> Result<Self, SymError> {
        let plan = Self {
            domain,
            problem,
            init,
            goal,
            steps,
            substitution,
        };
        plan.validate()?;
        Ok(plan)
    }

    /// Checks pseudo-operator names, operator name uniqueness and variable use.
    pub fn validate(&self) -> Result<(), SymError> {
        if self.init.name != INIT_OPERATOR || !self.init.preconditions.is_empty() {
            return Err(SymError::Plan(
                ErrorInfo::new("init-operator", "initial pseudo-operator is malformed")
                    .with_context("name", self.init.name.clone())
                    .with_hint(format!(
                        "expected `{INIT_OPERATOR}` with no pre-conditions"
                    )),
            ));
        }
        if self.goal.name != GOAL_OPERATOR || !self.goal.postconditions.is_empty() {
            return Err(SymError::Plan(
                ErrorInfo::new("goal-operator", "goal pseudo-operator is malformed")
                    .with_context("name", self.goal.name.clone())
                    .with_hint(format!(
                        "expected `{GOAL_OPERATOR}` with no post-conditions"
                    )),
            ));
        }
        let mut names = BTreeSet::new();
        for op in self.operators() {
            if !names.insert(op.name.as_str()) {
                return Err(SymError::Plan(
                    ErrorInfo::new("duplicate-operator", "operator names must be unique")
                        .with_context("operator", op.name.clone()),
                ));
            }
            op.check_variables()?;
        }
        Ok(())
    }

    /// All operators: `init`, the steps in plan order, then `goal`.
    pub fn operators(&self) -> impl Iterator<Item = &Operator> + '_ {
        std::iter::once(&self.init)
            .chain(self.steps.iter())
            .chain(std::iter::once(&self.goal))
    }

    /// Whether `op` is one of the two pseudo-operators.
    pub fn is_pseudo(&self, op: &Operator) -> bool {
        op.name == self.init.name || op.name == self.goal.name
    }

    /// Domain constants followed by problem objects.
    pub fn constants(&self) -> impl Iterator<Item = &Constant> + '_ {
        self.domain.constants.iter().chain(self.problem.objects.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_strips_instance_prefix() {
        let op = Operator::new("003_drive_truck", vec![], vec![], vec![]);
        assert_eq!(op.schema(), "drive_truck");
        let plain = Operator::new("init", vec![], vec![], vec![]);
        assert_eq!(plain.schema(), "init");
    }

    #[test]
    fn type_names_are_normalised() {
        assert_eq!(Type::new("  Truck "), Type::new("truck"));
    }
}
