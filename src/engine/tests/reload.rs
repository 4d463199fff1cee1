use super::*;

#[test]
fn test_reload_catalog() {
    let engine = engine_from_catalog(TEST_CATALOG);
    let profesor = principal(Role::Profesor);

    let before_reload = engine.evaluate(Some(&profesor), "/usuarios");
    assert_eq!(before_reload.state(), GuardState::Denied);

    engine.reload_from_str(TEST_CATALOG_OPEN_USERS).unwrap();

    let after_reload = engine.evaluate(Some(&profesor), "/usuarios");
    assert!(after_reload.is_granted());
}

#[test]
fn test_failed_reload_keeps_previous_catalog() {
    let engine = engine_from_catalog(TEST_CATALOG);
    let version_before = engine.current_version();

    let result =
        engine.reload_from_str(r#"{"modules": {"users": {"actions": {"view": ["janitor"]}}}}"#);
    assert!(matches!(result, Err(PolicyError::UnknownRole(_))));

    let result = engine.reload_from_str("not json");
    assert!(matches!(result, Err(PolicyError::ParseError(_))));

    let version_after = engine.current_version();
    assert_eq!(version_before, version_after);
    assert!(
        engine
            .evaluate(Some(&principal(Role::Apoderado)), "/notas")
            .is_granted()
    );
}

#[test]
fn test_version_changes_on_reload() {
    let engine = engine_from_catalog(TEST_CATALOG);
    let version1 = engine.current_version();

    engine.reload_from_str(TEST_CATALOG_OPEN_USERS).unwrap();
    let version2 = engine.current_version();

    assert_ne!(version1.hash, version2.hash);
}

#[test]
fn test_guard_keeps_its_snapshot_across_reload() {
    let engine = engine_from_catalog(TEST_CATALOG);
    let guard = engine.guard();

    engine.reload_from_str(TEST_CATALOG_OPEN_USERS).unwrap();

    let profesor = principal(Role::Profesor);
    assert_eq!(
        guard.evaluate(Some(&profesor), "/usuarios").state(),
        GuardState::Denied
    );
    assert!(engine.evaluate(Some(&profesor), "/usuarios").is_granted());
}

#[test]
fn test_clones_share_reloads() {
    let engine = engine_from_catalog(TEST_CATALOG);
    let clone = engine.clone();

    engine.reload_from_str(TEST_CATALOG_OPEN_USERS).unwrap();

    assert_eq!(engine.current_version(), clone.current_version());
}

#[test]
fn test_reload_during_evaluation_never_mixes_snapshots() {
    use std::thread;

    let closed_hash = format!("{:x}", Sha256::digest(TEST_CATALOG.as_bytes()));
    let engine = Arc::new(engine_from_catalog(TEST_CATALOG));

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let engine = Arc::clone(&engine);
            let closed_hash = closed_hash.clone();
            thread::spawn(move || {
                for _ in 0..500 {
                    let snapshot = engine.current_snapshot();
                    let granted = snapshot
                        .catalog()
                        .can_access_route(&Role::Profesor, "/usuarios");
                    // Each snapshot answers for exactly the catalog it was hashed from.
                    assert_eq!(granted, snapshot.version().hash != closed_hash);
                }
            })
        })
        .collect();

    let writer = {
        let engine = Arc::clone(&engine);
        thread::spawn(move || {
            for i in 0..50 {
                let text = if i % 2 == 0 {
                    TEST_CATALOG_OPEN_USERS
                } else {
                    TEST_CATALOG
                };
                engine.reload_from_str(text).unwrap();
            }
        })
    };

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }
}

#[test]
fn test_reload_from_file() {
    let engine = engine_from_catalog(TEST_CATALOG);
    let path = std::env::temp_dir().join(format!("aula-rbac-reload-{}.json", std::process::id()));
    std::fs::write(&path, TEST_CATALOG_OPEN_USERS).unwrap();

    engine.reload_from_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert!(
        engine
            .evaluate(Some(&principal(Role::Profesor)), "/usuarios")
            .is_granted()
    );
}
