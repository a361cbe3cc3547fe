/// Unit tests for DiError and DiResult types

use scoped_inject::{DiError, DiResult};
use std::error::Error;

#[test]
fn test_error_display_duplicate_registration() {
    let error = DiError::DuplicateRegistration("Counter");
    let display_str = format!("{}", error);
    assert_eq!(display_str, "Dependency already provided in this scope: Counter");
    assert!(display_str.contains("Counter"));
}

#[test]
fn test_error_display_missing_provider() {
    let error = DiError::MissingProvider("Counter");
    let display_str = format!("{}", error);
    assert_eq!(display_str, "Dependency was not provided: Counter");
    assert!(display_str.contains("not provided"));
}

#[test]
fn test_error_display_type_mismatch() {
    let error = DiError::TypeMismatch("alloc::string::String");
    assert_eq!(
        format!("{}", error),
        "Type mismatch for: alloc::string::String"
    );
}

#[test]
fn test_error_display_over_release() {
    let error = DiError::OverRelease("Session");
    assert_eq!(format!("{}", error), "Released more times than injected: Session");
}

#[test]
fn test_error_display_scope_destroyed() {
    let error = DiError::ScopeDestroyed("root/page".to_string());
    assert_eq!(format!("{}", error), "Scope already destroyed: root/page");
}

#[test]
fn test_error_display_no_active_scope() {
    assert_eq!(
        format!("{}", DiError::NoActiveScope),
        "No active scope on this thread"
    );
}

#[test]
fn test_error_display_config() {
    let error = DiError::Config("unknown variant".to_string());
    assert_eq!(format!("{}", error), "Invalid container options: unknown variant");
}

#[test]
fn test_error_is_std_error() {
    let error: Box<dyn Error> = Box::new(DiError::MissingProvider("Counter"));
    assert!(error.source().is_none());
    assert_eq!(error.to_string(), "Dependency was not provided: Counter");
}

#[test]
fn test_error_equality_and_clone() {
    let error = DiError::ScopeDestroyed("root".to_string());
    assert_eq!(error.clone(), error);
    assert_ne!(
        DiError::MissingProvider("A"),
        DiError::DuplicateRegistration("A")
    );
}

#[test]
fn test_diresult_question_mark() {
    fn inner() -> DiResult<u8> {
        Err(DiError::NoActiveScope)
    }
    fn outer() -> DiResult<u8> {
        let value = inner()?;
        Ok(value + 1)
    }
    assert_eq!(outer(), Err(DiError::NoActiveScope));
}
