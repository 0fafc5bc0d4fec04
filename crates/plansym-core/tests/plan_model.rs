use plansym_core::{
    CausalStructure, Constant, Consumer, Domain, Literal, Operator, PartialPlan, PcLink,
    Predicate, Problem, Producer, Substitution, SymError, Type, Variable,
};

fn block() -> Type {
    Type::new("block")
}

fn small_plan() -> Result<PartialPlan, SymError> {
    let domain = Domain {
        name: "blocks".into(),
        types: vec![block()],
        predicates: vec![Predicate::new("clear", vec![block()])],
        constants: vec![],
    };
    let problem = Problem {
        name: "p1".into(),
        objects: vec![Constant::new("a", block()), Constant::new("b", block())],
    };
    let ia = Variable::new("?ia", block());
    let ga = Variable::new("?ga", block());
    let x = Variable::new("?x", block());
    let init = Operator::new(
        "init",
        vec![ia.clone()],
        vec![],
        vec![Literal::new("clear", vec![ia.clone()], true)],
    );
    let goal = Operator::new(
        "goal",
        vec![ga.clone()],
        vec![Literal::new("clear", vec![ga.clone()], true)],
        vec![],
    );
    let step = Operator::new(
        "1_touch",
        vec![x.clone()],
        vec![Literal::new("clear", vec![x.clone()], true)],
        vec![Literal::new("clear", vec![x.clone()], false)],
    );
    let substitution: Substitution = [
        (ia, Constant::new("a", block())),
        (ga, Constant::new("b", block())),
        (x, Constant::new("a", block())),
    ]
    .into_iter()
    .collect();
    PartialPlan::new(domain, problem, init, goal, vec![step], substitution)
}

#[test]
fn operators_are_enumerated_init_steps_goal() -> Result<(), SymError> {
    let plan = small_plan()?;
    let names: Vec<&str> = plan.operators().map(|op| op.name.as_str()).collect();
    assert_eq!(names, vec!["init", "1_touch", "goal"]);
    assert!(plan.is_pseudo(&plan.init));
    assert!(!plan.is_pseudo(&plan.steps[0]));
    Ok(())
}

#[test]
fn duplicate_operator_names_are_rejected() -> Result<(), SymError> {
    let mut plan = small_plan()?;
    plan.steps.push(plan.steps[0].clone());
    let err = plan.validate().unwrap_err();
    assert_eq!(err.info().code, "duplicate-operator");
    Ok(())
}

#[test]
fn undeclared_literal_variables_are_rejected() -> Result<(), SymError> {
    let mut plan = small_plan()?;
    plan.steps[0].variables.clear();
    let err = plan.validate().unwrap_err();
    assert!(matches!(err, SymError::Plan(_)));
    assert_eq!(err.info().code, "undeclared-variable");
    Ok(())
}

#[test]
fn plan_json_roundtrip_preserves_substitution() -> Result<(), SymError> {
    let plan = small_plan()?;
    let json = serde_json::to_string(&plan).unwrap();
    let restored: PartialPlan = serde_json::from_str(&json).unwrap();
    assert_eq!(plan, restored);
    assert_eq!(restored.substitution.len(), 3);
    Ok(())
}

#[test]
fn causal_structure_queries_by_producer_and_consumer() -> Result<(), SymError> {
    let plan = small_plan()?;
    let producer: Producer = plan.init.producers().next().unwrap();
    let consumer: Consumer = plan.goal.consumers().next().unwrap();
    let other: Consumer = plan.steps[0].consumers().next().unwrap();

    let mut cs = CausalStructure::new(false);
    assert!(cs.add_link(PcLink::new(producer.clone(), consumer.clone())));
    assert!(cs.add_link(PcLink::new(producer.clone(), other.clone())));
    assert!(!cs.add_link(PcLink::new(producer.clone(), other.clone())));

    assert_eq!(cs.len(), 2);
    assert_eq!(cs.consumers_of(&producer).len(), 2);
    assert_eq!(cs.producers_of(&consumer).into_iter().next(), Some(&producer));
    assert!(cs.remove_link(&PcLink::new(producer, other)));
    assert_eq!(cs.len(), 1);
    Ok(())
}
