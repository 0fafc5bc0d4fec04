use plansym_core::errors::{ErrorInfo, SymError};

fn sample_info(code: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new(code, message)
        .with_context("vertex", "3")
        .with_context("reason", "example")
}

#[test]
fn invalid_bijection_surface() {
    let err = SymError::InvalidBijection(sample_info("duplicate-point", "point repeats"));
    assert_eq!(err.info().code, "duplicate-point");
    assert!(err.info().context.contains_key("vertex"));
    assert_eq!(err.family(), "invalid-bijection");
}

#[test]
fn domain_mismatch_surface() {
    let err = SymError::DomainMismatch(sample_info("compose", "sizes differ"));
    assert_eq!(err.info().code, "compose");
    assert!(err.info().context.contains_key("reason"));
}

#[test]
fn protocol_violation_surface() {
    let err = SymError::ProtocolViolation(sample_info("missing-grpsize", "no grpsize line"));
    assert_eq!(err.info().code, "missing-grpsize");
}

#[test]
fn process_failure_surface() {
    let err = SymError::ProcessFailure(sample_info("spawn", "not found"));
    assert_eq!(err.family(), "process-failure");
}

#[test]
fn display_includes_context_and_hint() {
    let err = SymError::Plan(
        ErrorInfo::new("unbound-argument", "argument has no binding")
            .with_context("operator", "init")
            .with_hint("bind every init variable"),
    );
    let text = err.to_string();
    assert!(text.starts_with("plan error: [unbound-argument] argument has no binding"));
    assert!(text.contains("{operator: init}"));
    assert!(text.ends_with("; try: bind every init variable"));
}

#[test]
fn errors_serialise_with_family_tag() {
    let err = SymError::Serde(ErrorInfo::new("json-read", "eof"));
    let json = serde_json::to_value(&err).unwrap();
    assert_eq!(json["family"], "Serde");
    let restored: SymError = serde_json::from_value(json).unwrap();
    assert_eq!(restored, err);
}
