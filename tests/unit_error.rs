/// Unit tests for DiError and DiResult types

use ferrous_resolver::{DiError, DiResult};
use std::error::Error;

#[test]
fn test_error_display_dependency_not_found() {
    let error = DiError::DependencyNotFound("TestService");
    assert_eq!(error.to_string(), "Dependency not found: TestService");
}

#[test]
fn test_error_display_missing_scope() {
    let error = DiError::MissingScope("RequestContext");
    assert_eq!(
        error.to_string(),
        "Missing scope: RequestContext is scoped and was requested without a scope"
    );
}

#[test]
fn test_error_display_type_mismatch() {
    let error = DiError::TypeMismatch("alloc::string::String");
    assert_eq!(error.to_string(), "Type mismatch for: alloc::string::String");
}

#[test]
fn test_error_display_circular() {
    let error = DiError::Circular(vec!["ServiceA", "ServiceB", "ServiceA"]);
    assert_eq!(error.to_string(), "Circular dependency: ServiceA -> ServiceB -> ServiceA");
}

#[test]
fn test_error_display_empty_circular_path() {
    let error = DiError::Circular(vec![]);
    assert_eq!(error.to_string(), "Circular dependency: ");
}

#[test]
fn test_error_display_depth_exceeded() {
    let error = DiError::DepthExceeded(100);
    assert_eq!(error.to_string(), "Max depth 100 exceeded");
}

#[test]
fn test_error_display_already_bound() {
    let error = DiError::AlreadyBound("dyn Logger");
    assert_eq!(error.to_string(), "Already bound: dyn Logger");
}

#[test]
fn test_construction_error_keeps_source() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "config.toml missing");
    let error = DiError::construction("Config", io);

    assert_eq!(error.to_string(), "Failed to construct Config: config.toml missing");
    let source = error.source().unwrap();
    let io = source.downcast_ref::<std::io::Error>().unwrap();
    assert_eq!(io.kind(), std::io::ErrorKind::NotFound);
}

#[test]
fn test_construction_error_from_string() {
    let error = DiError::construction("Pool", "size must be positive");
    assert_eq!(error.to_string(), "Failed to construct Pool: size must be positive");
}

#[test]
fn test_diresult_err() {
    let result: DiResult<String> = Err(DiError::DependencyNotFound("TestService"));

    match result {
        Err(DiError::DependencyNotFound(name)) => assert_eq!(name, "TestService"),
        _ => panic!("Expected DependencyNotFound error"),
    }
}

#[test]
fn test_error_debug_format() {
    let error = DiError::DependencyNotFound("TestService");
    let debug_str = format!("{:?}", error);

    assert!(debug_str.contains("DependencyNotFound"));
    assert!(debug_str.contains("TestService"));
}

#[test]
fn test_plain_errors_have_no_source() {
    let error = DiError::MissingScope("TestService");
    let _: &dyn std::error::Error = &error;
    assert!(error.source().is_none());
}
