//! Triage engine integration tests.

use triage_core::models::{PatientStatus, UrgencyLevel};
use triage_core::{
    open_triage_service, open_triage_service_with_config, EngineConfig, Patient, TriageEngine,
    TriageError, TriageFfiError,
};

fn names(patients: &[&Patient]) -> Vec<String> {
    patients.iter().map(|p| p.name().to_string()).collect()
}

#[test]
fn test_waiting_order_and_undo_scenario() {
    let mut engine = TriageEngine::default();
    engine.register("A", 1).unwrap();
    engine.register("B", 5).unwrap();
    engine.register("C", 1).unwrap();

    assert_eq!(names(&engine.waiting_report()), vec!["A", "C", "B"]);

    assert_eq!(engine.attend_next().unwrap().name(), "A");
    assert_eq!(engine.attend_next().unwrap().name(), "C");

    let undone = engine.undo_last_attendance().unwrap();
    assert_eq!(undone.name(), "C");
    assert_eq!(undone.status(), PatientStatus::Waiting);

    // C keeps its original arrival and goes ahead of B
    assert_eq!(names(&engine.waiting_report()), vec!["C", "B"]);
    assert_eq!(names(&engine.history_report(None)), vec!["A"]);
    engine.check_invariants().unwrap();
}

#[test]
fn test_statistics_scenario() {
    let mut engine = TriageEngine::default();
    engine.register("Red One", 1).unwrap();
    engine.register("Red Two", 1).unwrap();
    engine.register("Yellow", 3).unwrap();
    engine.attend_next().unwrap();

    let stats = engine.statistics();
    assert_eq!(stats.total_registered, 3);
    assert_eq!(stats.total_waiting, 2);
    assert_eq!(stats.total_attended, 1);
    assert_eq!(stats.count_by_urgency.len(), 2);
    assert_eq!(stats.count_for(UrgencyLevel::Red), 2);
    assert_eq!(stats.count_for(UrgencyLevel::Yellow), 1);
}

#[test]
fn test_attend_on_empty_queue_changes_nothing() {
    let mut engine = TriageEngine::default();
    assert_eq!(engine.attend_next(), Err(TriageError::EmptyQueue));

    engine.register("A", 2).unwrap();
    engine.attend_next().unwrap();
    let audit_len = engine.audit_log().len();

    assert_eq!(engine.attend_next(), Err(TriageError::EmptyQueue));
    assert_eq!(engine.attended_count(), 1);
    assert_eq!(engine.waiting_count(), 0);
    assert_eq!(engine.audit_log().len(), audit_len);
    engine.check_invariants().unwrap();
}

#[test]
fn test_undo_on_empty_history_changes_nothing() {
    let mut engine = TriageEngine::default();
    engine.register("A", 2).unwrap();

    assert_eq!(engine.undo_last_attendance(), Err(TriageError::EmptyStack));
    assert_eq!(engine.waiting_count(), 1);
    assert_eq!(engine.audit_log().len(), 1);
    engine.check_invariants().unwrap();
}

#[test]
fn test_undo_round_trip_restores_order() {
    let mut engine = TriageEngine::default();
    for (name, level) in [("A", 3), ("B", 2), ("C", 3), ("D", 2), ("E", 1)] {
        engine.register(name, level).unwrap();
    }
    let before = names(&engine.waiting_report());

    let attended = engine.attend_next().unwrap();
    let undone = engine.undo_last_attendance().unwrap();

    assert_eq!(attended.id(), undone.id());
    assert_eq!(attended.arrival_sequence(), undone.arrival_sequence());
    assert_eq!(names(&engine.waiting_report()), before);
    assert_eq!(engine.attended_count(), 0);
}

#[test]
fn test_invalid_registration_changes_nothing() {
    let mut engine = TriageEngine::default();
    engine.register("A", 1).unwrap();

    assert!(matches!(engine.register("", 1), Err(TriageError::InvalidInput(_))));
    assert!(matches!(engine.register("B", 0), Err(TriageError::InvalidInput(_))));
    assert!(matches!(engine.register("B", 6), Err(TriageError::InvalidInput(_))));

    assert_eq!(engine.registry_snapshot().count(), 1);
    assert_eq!(engine.waiting_count(), 1);

    // Rejected input does not consume an id
    let next = engine.register("B", 1).unwrap();
    assert_eq!(next.id(), 2);
}

#[test]
fn test_ids_are_never_reused() {
    let mut engine = TriageEngine::default();
    let a = engine.register("A", 1).unwrap();
    engine.attend_next().unwrap();
    engine.undo_last_attendance().unwrap();
    engine.attend_next().unwrap();
    let b = engine.register("B", 1).unwrap();

    assert!(b.id() > a.id());
    assert!(b.arrival_sequence() > a.arrival_sequence());
}

#[test]
fn test_registry_only_grows() {
    let mut engine = TriageEngine::default();
    let mut last = 0;
    for i in 0..10u8 {
        engine.register(&format!("P{}", i), i % 5 + 1).unwrap();
        if i % 3 == 0 {
            engine.attend_next().unwrap();
        }
        if i % 4 == 0 {
            let _ = engine.undo_last_attendance();
        }
        let size = engine.registry_snapshot().count();
        assert!(size > last);
        last = size;
    }
    assert_eq!(last, 10);
}

#[test]
fn test_registry_status_is_live() {
    let mut engine = TriageEngine::default();
    let a = engine.register("A", 1).unwrap();
    assert_eq!(engine.patient(a.id()).unwrap().status(), PatientStatus::Waiting);

    engine.attend_next().unwrap();
    assert_eq!(engine.patient(a.id()).unwrap().status(), PatientStatus::Attended);

    // The value returned by register is a snapshot
    assert_eq!(a.status(), PatientStatus::Waiting);
}

#[test]
fn test_peek_next_is_read_only() {
    let mut engine = TriageEngine::default();
    assert_eq!(engine.peek_next().err(), Some(TriageError::EmptyQueue));

    engine.register("B", 4).unwrap();
    engine.register("A", 2).unwrap();
    assert_eq!(engine.peek_next().unwrap().name(), "A");
    assert_eq!(engine.waiting_count(), 2);
}

#[test]
fn test_history_report_limits() {
    let config = EngineConfig {
        default_history_limit: Some(2),
        ..EngineConfig::default()
    };
    let mut engine = TriageEngine::new(config).unwrap();
    for name in ["A", "B", "C", "D"] {
        engine.register(name, 3).unwrap();
    }
    for _ in 0..4 {
        engine.attend_next().unwrap();
    }

    assert_eq!(names(&engine.history_report(None)), vec!["D", "C"]);
    assert_eq!(names(&engine.history_report(Some(3))), vec!["D", "C", "B"]);
    assert_eq!(engine.history_report(Some(10)).len(), 4);
}

#[test]
fn test_search_patients() {
    let mut engine = TriageEngine::default();
    engine.register("María López", 1).unwrap();
    engine.register("Juan Pérez", 5).unwrap();
    engine.register("Ana Martínez", 2).unwrap();

    let hits = engine.search_patients("martinez", 5);
    assert_eq!(hits[0].name(), "Ana Martínez");
    assert!(engine.search_patients("", 5).is_empty());
}

#[test]
fn test_audit_journal_follows_operations() {
    let mut engine = TriageEngine::default();
    let a = engine.register("A", 1).unwrap();
    engine.attend_next().unwrap();
    engine.undo_last_attendance().unwrap();

    let events: Vec<String> = engine
        .audit_log()
        .entries()
        .iter()
        .map(|e| e.event.to_string())
        .collect();
    assert_eq!(
        events,
        vec![
            format!("registered:{}:1", a.id()),
            format!("attended:{}", a.id()),
            format!("attendance_undone:{}", a.id()),
        ]
    );
    assert!(engine.audit_log().verify().is_ok());
}

#[test]
fn test_audit_can_be_disabled() {
    let config = EngineConfig {
        audit_enabled: false,
        ..EngineConfig::default()
    };
    let mut engine = TriageEngine::new(config).unwrap();
    engine.register("A", 1).unwrap();
    engine.attend_next().unwrap();
    assert!(engine.audit_log().is_empty());
}

#[test]
fn test_invalid_config_rejected_by_every_constructor() {
    let zero_limit = EngineConfig {
        default_history_limit: Some(0),
        ..EngineConfig::default()
    };
    assert!(matches!(
        TriageEngine::new(zero_limit),
        Err(TriageError::InvalidInput(_))
    ));
    assert!(matches!(
        TriageEngine::new(EngineConfig::with_hospital_name("  ")),
        Err(TriageError::InvalidInput(_))
    ));

    assert!(matches!(
        open_triage_service("".into()),
        Err(TriageFfiError::InvalidInput(_))
    ));
    assert!(matches!(
        open_triage_service_with_config(r#"{"default_history_limit": 0}"#.into()),
        Err(TriageFfiError::InvalidInput(_))
    ));
    assert!(matches!(
        open_triage_service_with_config(r#"{"hospital_name": ""}"#.into()),
        Err(TriageFfiError::InvalidInput(_))
    ));
}

#[test]
fn test_default_engine_reports_full_history() {
    let mut engine = TriageEngine::default();
    engine.register("A", 1).unwrap();
    engine.attend_next().unwrap();
    assert_eq!(names(&engine.history_report(None)), vec!["A"]);
}
