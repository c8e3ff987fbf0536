//! Tests for layered prompt assembly.

use fablewright_context::{
    AssemblerSettings, CanonRequest, ChapterRequest, ContextAssembler, PageRequest, StoryPosition,
    continuity_policy,
};
use fablewright_core::{
    ActContext, ActMemory, Chapter, CharacterProfile, NarrativePurpose, Pacing, Page, StateDelta,
    StoryCanon, Volume, VolumeMemory,
};
use fablewright_prose::ProseValidator;

fn canon() -> StoryCanon {
    StoryCanon {
        whitepaper: "A courier carries a secret across a sinking city.".to_string(),
        characters: vec![
            CharacterProfile::new("Kate Andrea Clauzure", None, Some("courier")),
            CharacterProfile::new("Tomas Reyes Vell", Some("Tom"), None),
        ],
        world_rules: vec!["The tide rises one stair every year".to_string()],
        hard_constraints: vec!["Kate never learns to swim".to_string()],
        soft_guidelines: vec!["Keep the city's bells present".to_string()],
        themes: vec!["trust".to_string()],
        locked: true,
        ..Default::default()
    }
}

fn volume(number: u32) -> Volume {
    Volume {
        volume_number: number,
        title: "The Drowned Stair".to_string(),
        theme: "loyalty under pressure".to_string(),
        target_chapter_count: 12,
        outline: Some("Kate delivers the letter; the guild turns on her.".to_string()),
        ..Default::default()
    }
}

fn chapter(number: u32) -> Chapter {
    Chapter {
        outline: Some("1. Kate reaches the bell tower\n2. Tom refuses the letter".to_string()),
        ..Chapter::new(1, number, number)
    }
}

#[test]
fn test_chapter_prompt_carries_all_layers() {
    let request = ChapterRequest {
        canon: canon(),
        volume: volume(1),
        total_volumes: 3,
        chapter: chapter(4),
        volume_memory: Some(VolumeMemory {
            unresolved_arcs: vec!["Who forged the seal".to_string()],
            ..Default::default()
        }),
        act: Some(ActContext::new(NarrativePurpose::Crisis, Pacing::Fast, 8).with_tag("Act II")),
        act_memory: Some(ActMemory {
            tension_level: 7,
            active_conflicts: vec!["Guild versus courier".to_string()],
            misunderstandings: vec![],
        }),
        previous_chapter: Some(Chapter {
            summary: Some("Kate escaped the flooded market.".to_string()),
            state_delta: Some(StateDelta {
                emotional_state: "shaken".to_string(),
                ..Default::default()
            }),
            ..Chapter::new(1, 3, 3)
        }),
        instructions: Some("More rain.".to_string()),
    };

    let prompt = ContextAssembler::default().build_chapter_prompt(&request);
    let user = prompt.user();

    assert!(user.contains("The tide rises one stair every year"));
    assert!(user.contains("HARD CONSTRAINTS (must never be violated)"));
    assert!(user.contains("Kate never learns to swim"));
    assert!(user.contains("loyalty under pressure"));
    assert!(user.contains("Who forged the seal"));
    assert!(user.contains("Narrative purpose: crisis"));
    assert!(user.contains("Pacing: fast"));
    assert!(user.contains("Emotional pressure: 8/10"));
    assert!(user.contains("Guild versus courier"));
    assert!(user.contains("Kate escaped the flooded market."));
    assert!(user.contains("CHAPTER OUTLINE (binding)"));
    assert!(user.contains("Tom refuses the letter"));
    assert!(user.contains("VOLUME OUTLINE (hard boundary)"));
    assert!(user.contains("Author's direction: More rain."));
    assert!(user.contains("\"stateDelta\""));
}

#[test]
fn test_system_prompt_states_canonical_names() {
    let prompt = ContextAssembler::default().build_chapter_prompt(&ChapterRequest {
        canon: canon(),
        ..Default::default()
    });

    assert!(prompt.system().contains("Kate Andrea Clauzure -> Kate"));
    assert!(prompt.system().contains("Tomas Reyes Vell -> Tom"));
    assert!(prompt.system().contains("locked and authoritative"));
}

#[test]
fn test_only_final_chapter_of_final_volume_may_resolve() {
    let assembler = ContextAssembler::default();
    let mut request = ChapterRequest {
        canon: canon(),
        volume: volume(3),
        total_volumes: 3,
        chapter: chapter(12),
        ..Default::default()
    };

    let final_prompt = assembler.build_chapter_prompt(&request);
    assert!(final_prompt.user().contains("You may resolve the central conflict"));

    request.volume = volume(2);
    let middle_prompt = assembler.build_chapter_prompt(&request);
    assert!(middle_prompt.user().contains("End the chapter on unresolved tension"));
    assert!(middle_prompt.user().contains("happily ever after"));
}

#[test]
fn test_pages_resolve_only_on_last_planned_page() {
    let mut position = StoryPosition {
        volume_number: 1,
        total_volumes: 1,
        chapter_number: 5,
        chapters_in_volume: 5,
        page_number: Some(3),
        pages_in_chapter: Some(4),
    };
    assert!(!position.may_resolve());
    assert!(continuity_policy(&position).contains("End the page on unresolved tension"));

    position.page_number = Some(4);
    assert!(position.may_resolve());

    position.pages_in_chapter = None;
    assert!(!position.may_resolve());
}

#[test]
fn test_page_prompt_carries_at_most_seventeen_pages_verbatim() {
    let prior_pages: Vec<Page> = (1..=20)
        .map(|n| Page::new(n, format!("Text of page number {}.", n)))
        .collect();
    let request = PageRequest {
        canon: canon(),
        volume: volume(1),
        total_volumes: 2,
        chapter: chapter(2),
        page_number: 21,
        prior_pages,
        ..Default::default()
    };

    let prompt = ContextAssembler::default().build_page_prompt(&request);
    let user = prompt.user();

    assert!(!user.contains("--- Page 3 ---"));
    assert!(user.contains("--- Page 4 ---"));
    assert!(user.contains("Text of page number 20."));
    assert!(user.contains("The previous 17 page(s)"));
    assert!(user.contains("continue exactly where page 20 leaves off"));
    assert!(user.contains("between 600 and 1200 words"));
    assert!(user.contains("\"beatCoverage\""));
}

#[test]
fn test_continuity_window_setting_is_capped() {
    let assembler = ContextAssembler::new(AssemblerSettings {
        continuity_pages: 40,
        ..Default::default()
    });

    assert_eq!(assembler.settings().continuity_pages, 17);
}

#[test]
fn test_first_page_uses_previous_chapter_summary() {
    let request = PageRequest {
        canon: canon(),
        volume: volume(1),
        chapter: chapter(2),
        page_number: 1,
        previous_chapter: Some(Chapter {
            summary: Some("Tom burned the letter.".to_string()),
            ..Chapter::new(1, 1, 1)
        }),
        ..Default::default()
    };

    let prompt = ContextAssembler::default().build_page_prompt(&request);

    assert!(prompt.user().contains("This is the first page of the chapter."));
    assert!(prompt.user().contains("Tom burned the letter."));
}

#[test]
fn test_canon_prompt_uses_parsed_roster() {
    let request = CanonRequest {
        premise: "Bells warn a drowning city.".to_string(),
        characters: "Kate Andrea Clauzure – courier\nTomas Reyes Vell (Tom) – smuggler".to_string(),
        genre: "fantasy".to_string(),
        ..Default::default()
    };

    let prompt = ContextAssembler::default().build_canon_prompt(&request);

    assert!(prompt.user().contains("Premise: Bells warn a drowning city."));
    assert!(prompt.user().contains("Tomas Reyes Vell -> Tom"));
    assert!(prompt.user().contains("\"worldRules\""));
}

#[test]
fn test_corrective_block_names_failed_checks() {
    let validation = ProseValidator::default().validate("I woke up. The committee met.");

    let block = ContextAssembler::default().corrective_block(&validation, 2);

    assert!(block.contains("attempt 2"));
    assert!(block.contains("- opening:"));
    assert!(block.contains("- movement:"));
    assert!(block.contains("Opening relies on a cliché"));
}

#[test]
fn test_chapter_request_loads_from_toml() {
    let text = r#"
totalVolumes = 2
instructions = "Keep it tense."

[canon]
whitepaper = "Premise"
themes = ["trust"]

[volume]
volumeNumber = 1
targetChapterCount = 10

[chapter]
volumeNumber = 1
chapterNumber = 2
globalChapterNumber = 2
actTag = "Act I"

[act]
purpose = "rising-tension"
pacing = "slow"
emotionalPressure = 4
"#;

    let request: ChapterRequest = toml::from_str(text).unwrap();

    assert_eq!(request.total_volumes, 2);
    assert_eq!(request.chapter.chapter_number, 2);
    assert_eq!(
        request.act.as_ref().map(|a| a.purpose),
        Some(NarrativePurpose::RisingTension)
    );
}

#[test]
fn test_page_request_loads_from_json() {
    let json = r#"{
        "canon": {"whitepaper": "Premise"},
        "volume": {"volumeNumber": 1},
        "chapter": {"volumeNumber": 1, "chapterNumber": 1},
        "pageNumber": 2,
        "priorPages": [{"pageNumber": 1, "content": "It began.", "wordCount": 2}]
    }"#;

    let request: PageRequest = serde_json::from_str(json).unwrap();

    assert_eq!(request.total_volumes, 1);
    assert_eq!(request.prior_pages.len(), 1);
}
