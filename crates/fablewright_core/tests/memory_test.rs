//! Tests for volume and act memory updates.

use fablewright_core::{ActMemory, StateDelta, VolumeMemory};

fn delta() -> StateDelta {
    let mut delta = StateDelta {
        world_changes: vec!["The bridge is down".to_string()],
        emotional_state: "wary hope".to_string(),
        unresolved_threads: vec![
            "Who burned the bridge".to_string(),
            "The missing ledger".to_string(),
        ],
        resolved_threads: vec!["the broken oath".to_string()],
        ..Default::default()
    };
    delta
        .character_states
        .insert("Kate".to_string(), "furious but focused".to_string());
    delta
}

#[test]
fn test_volume_memory_tracks_arcs_and_promises() {
    let mut memory = VolumeMemory {
        unresolved_arcs: vec!["The Broken Oath".to_string()],
        promises_made: vec!["The Broken Oath".to_string()],
        ..Default::default()
    };

    memory.absorb(&delta());

    assert_eq!(
        memory.unresolved_arcs,
        vec!["Who burned the bridge".to_string(), "The missing ledger".to_string()]
    );
    assert!(memory.promises_made.is_empty());
    assert_eq!(memory.promises_fulfilled, vec!["The Broken Oath".to_string()]);
    assert_eq!(
        memory.character_progression,
        vec!["Kate: furious but focused".to_string()]
    );
    assert_eq!(memory.last_emotional_state.as_deref(), Some("wary hope"));
}

#[test]
fn test_volume_memory_absorb_is_deduplicated() {
    let mut memory = VolumeMemory::default();

    memory.absorb(&delta());
    memory.absorb(&delta());

    assert_eq!(memory.unresolved_arcs.len(), 2);
    assert_eq!(memory.character_progression.len(), 1);
}

#[test]
fn test_blank_emotional_state_keeps_previous() {
    let mut memory = VolumeMemory::default();
    memory.absorb(&delta());

    memory.absorb(&StateDelta::default());

    assert_eq!(memory.last_emotional_state.as_deref(), Some("wary hope"));
}

#[test]
fn test_act_memory_follows_pressure_and_conflicts() {
    let mut memory = ActMemory {
        active_conflicts: vec!["The broken oath".to_string()],
        misunderstandings: vec!["the broken oath".to_string()],
        ..Default::default()
    };

    memory.absorb(&delta(), 12);

    assert_eq!(memory.tension_level, 10);
    assert!(memory.misunderstandings.is_empty());
    assert_eq!(memory.active_conflicts.len(), 2);
    assert!(memory.active_conflicts.contains(&"The missing ledger".to_string()));
}

#[test]
fn test_state_delta_parses_camel_case_json() {
    let json = r#"{
        "characterStates": {"Kate": "tired"},
        "worldChanges": [],
        "plotProgression": ["Kate reaches the keep"],
        "emotionalState": "tense",
        "unresolvedThreads": ["The ledger"],
        "resolvedThreads": []
    }"#;

    let delta: StateDelta = serde_json::from_str(json).unwrap();

    assert_eq!(delta.character_states.get("Kate").map(String::as_str), Some("tired"));
    assert_eq!(delta.emotional_state, "tense");
    assert!(!delta.is_empty());
}
