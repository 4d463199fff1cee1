use super::*;
use crate::types::{DenialReason, GuardState, Role};
use yare::parameterized;

mod reload;

const TEST_CATALOG: &str = r#"{
    "modules": {
        "users": { "actions": { "view": ["admin"], "delete": ["admin"] } },
        "grades": {
            "actions": {
                "view": ["admin", "profesor"],
                "viewChildren": ["apoderado"]
            }
        }
    },
    "routes": [
        { "exact": "/usuarios", "module": "users" },
        { "exact": "/notas", "module": "grades" }
    ],
    "default_routes": { "profesor": "/notas" }
}"#;

const TEST_CATALOG_OPEN_USERS: &str = r#"{
    "modules": {
        "users": { "actions": { "view": ["admin", "profesor"] } }
    },
    "routes": [
        { "exact": "/usuarios", "module": "users" }
    ]
}"#;

fn engine_from_catalog(text: &str) -> AccessEngine {
    AccessEngine::new_from_str(text).unwrap()
}

fn principal(role: Role) -> Principal {
    Principal::with_role(role)
}

#[parameterized(
    admin_users = { Role::Admin, "/usuarios", GuardState::Granted },
    profesor_users = { Role::Profesor, "/usuarios", GuardState::Denied },
    profesor_notas = { Role::Profesor, "/notas", GuardState::Granted },
    apoderado_notas = { Role::Apoderado, "/notas", GuardState::Granted },
    alumno_notas = { Role::Alumno, "/notas", GuardState::Denied },
)]
fn test_evaluate(role: Role, path: &str, expected: GuardState) {
    let engine = engine_from_catalog(TEST_CATALOG);
    let decision = engine.evaluate(Some(&principal(role)), path);
    assert_eq!(decision.state(), expected);
}

#[test]
fn test_evaluate_without_principal() {
    let engine = engine_from_catalog(TEST_CATALOG);
    let decision = engine.evaluate(None, "/usuarios");
    assert_eq!(
        decision,
        Decision::NoPrincipal {
            redirect_to: "/login".to_string()
        }
    );
}

#[test]
fn test_denial_carries_default_route() {
    let engine = engine_from_catalog(TEST_CATALOG);
    let decision = engine.evaluate(Some(&principal(Role::Profesor)), "/usuarios");
    assert_eq!(
        decision,
        Decision::Denied {
            role: "profesor".to_string(),
            reason: DenialReason::NotPermitted,
            default_route: "/notas".to_string(),
        }
    );
}

#[test]
fn test_current_version_hash() {
    let engine = engine_from_catalog(TEST_CATALOG);
    let version = engine.current_version();

    let expected_hash = format!("{:x}", Sha256::digest(TEST_CATALOG.as_bytes()));
    assert_eq!(version.hash, expected_hash);
    assert!(chrono::DateTime::parse_from_rfc3339(&version.loaded_at).is_ok());
}

#[test]
fn test_snapshot_exposes_catalog() {
    let engine = engine_from_catalog(TEST_CATALOG);
    let snapshot = engine.current_snapshot();
    let modules: Vec<&str> = snapshot.catalog().modules().map(|m| m.as_str()).collect();
    assert_eq!(modules, vec!["grades", "users"]);
    assert_eq!(snapshot.version(), &engine.current_version());
}

#[test]
fn test_school_engine() {
    let engine = AccessEngine::school().unwrap();
    let version = engine.current_version();
    assert_eq!(
        version.hash,
        format!("{:x}", Sha256::digest(SCHOOL_POLICY.as_bytes()))
    );
    assert!(engine.evaluate(Some(&principal(Role::Admin)), "/").is_granted());
}

#[test]
fn test_new_from_invalid_catalog() {
    let result = AccessEngine::new_from_str(r#"{"modules": {"users": {"actions": {"view": []}}}}"#);
    assert!(matches!(result, Err(PolicyError::EmptyRoleSet { .. })));
}

#[test]
fn test_from_missing_file() {
    let result = AccessEngine::from_file("/definitely/not/here/catalog.json");
    assert!(matches!(result, Err(PolicyError::Io(_))));
}

#[test]
fn test_from_file() {
    let path = std::env::temp_dir().join(format!("aula-rbac-{}.json", std::process::id()));
    std::fs::write(&path, TEST_CATALOG).unwrap();
    let engine = AccessEngine::from_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert!(engine.evaluate(Some(&principal(Role::Admin)), "/usuarios").is_granted());
}

#[test]
fn test_concurrent_evaluation() {
    use std::thread;

    let engine = Arc::new(engine_from_catalog(TEST_CATALOG));
    let mut handles = vec![];

    for i in 0..8 {
        let engine = Arc::clone(&engine);
        handles.push(thread::spawn(move || {
            let role = if i % 2 == 0 { Role::Admin } else { Role::Profesor };
            for _ in 0..200 {
                let decision = engine.evaluate(Some(&Principal::with_role(role)), "/usuarios");
                assert_eq!(decision.is_granted(), role == Role::Admin);
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }
}
