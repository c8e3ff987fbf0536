//! Story fixtures and canned model output.

use fablewright_core::{Chapter, CharacterProfile, StoryCanon, Volume};
use fablewright_generation::FablewrightConfig;
use serde_json::json;

pub const OPENING: &str = "Mara shoved the cellar door open and stepped into the damp dark.";

pub const SCENE_BODY: &str = "\
The air smelled of smoke and wet stone. Somewhere below, water dripped with a hollow echo.

She knew the tunnel would flood by nightfall. She feared what Tomas would say when he saw her boots.

\"Keep moving,\" Tomas whispered behind her.

She turned, gripped the cold rail, and climbed down toward the faint glow of his lantern.

Her palms stung. She wondered if he had noticed the tremor in her hands.";

/// Words in [`good_scene`].
#[allow(dead_code)]
pub const SCENE_WORDS: usize = 83;

/// Prose that passes every quality check with a score of 100.
pub fn good_scene() -> String {
    format!("{}\n\n{}", OPENING, SCENE_BODY)
}

/// Prose with a clichéd opening and no scene grounding, scoring 40.
#[allow(dead_code)]
pub const WEAK_SCENE: &str = "I woke up. The committee met. The report was approved.";

/// Prose that leaks pipeline vocabulary, scoring 0.
#[allow(dead_code)]
pub fn leaking_scene() -> String {
    format!("According to the story bible, dragons cannot fly.\n\n{}", SCENE_BODY)
}

/// A page made of `scenes` copies of the good scene.
#[allow(dead_code)]
pub fn page_text(scenes: usize) -> String {
    vec![good_scene(); scenes].join("\n\n")
}

/// A page of exactly `words` words: whole scenes plus a padding paragraph.
#[allow(dead_code)]
pub fn page_of_words(words: usize) -> String {
    let scenes = words / SCENE_WORDS;
    let padding = words % SCENE_WORDS;
    let mut text = page_text(scenes);
    if padding > 0 {
        text.push_str("\n\n");
        text.push_str(&vec!["rain"; padding].join(" "));
        text.push('.');
    }
    text
}

#[allow(dead_code)]
pub fn chapter_json(content: &str) -> String {
    json!({
        "content": content,
        "summary": "Mara descends into the flooded tunnels.",
        "stateDelta": {
            "characterStates": { "Mara Voss": "shaken" },
            "emotionalState": "dread",
            "unresolvedThreads": ["the flooding tunnels"],
            "resolvedThreads": []
        }
    })
    .to_string()
}

#[allow(dead_code)]
pub fn page_json(content: &str) -> String {
    json!({
        "content": content,
        "beatCoverage": ["descent"],
        "narrativeMomentum": "Tomas is hiding something."
    })
    .to_string()
}

pub fn locked_canon() -> StoryCanon {
    StoryCanon {
        whitepaper: "A drowned city and the smugglers who still work its tunnels.".to_string(),
        characters: vec![
            CharacterProfile::new("Mara Voss", Some("Mara"), Some("Smuggler")),
            CharacterProfile::new("Tomas Reyes", Some("Tomas"), Some("Her partner")),
        ],
        themes: vec!["trust".to_string()],
        locked: true,
        ..Default::default()
    }
}

#[allow(dead_code)]
pub fn volume(volume_number: u32) -> Volume {
    Volume {
        volume_number,
        title: format!("Volume {}", volume_number),
        target_chapter_count: 10,
        ..Default::default()
    }
}

#[allow(dead_code)]
pub fn chapter(volume_number: u32, chapter_number: u32) -> Chapter {
    Chapter {
        outline: Some("Mara descends into the tunnels.".to_string()),
        ..Chapter::new(volume_number, chapter_number, chapter_number)
    }
}

/// Configuration that keeps retries instant.
pub fn fast_config() -> FablewrightConfig {
    let mut config = FablewrightConfig::default();
    config.generation.retry_backoff_ms = 0;
    config.generation.request_timeout_secs = 5;
    config
}
