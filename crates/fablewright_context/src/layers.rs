//! The four context layers.
//!
//! Each function renders one layer as plain text and returns an empty string
//! when it has nothing to say, so callers can skip blank sections.

use fablewright_core::{
    ActContext, ActMemory, Chapter, Page, StateDelta, StoryCanon, Volume, VolumeMemory,
};

fn list(title: &str, items: &[String]) -> String {
    let items: Vec<&str> = items
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    if items.is_empty() {
        return String::new();
    }
    let mut out = format!("{}:\n", title);
    for item in items {
        out.push_str("- ");
        out.push_str(item);
        out.push('\n');
    }
    out
}

fn line(label: &str, value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        String::new()
    } else {
        format!("{}: {}\n", label, value)
    }
}

fn join_sections(sections: Vec<String>) -> String {
    sections
        .into_iter()
        .map(|s| s.trim_end().to_string())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Global layer: the story canon.
///
/// Hard constraints are marked as inviolable, soft guidelines as best effort.
pub fn global_layer(canon: &StoryCanon) -> String {
    let meta = &canon.metadata;
    let mut header = String::new();
    header.push_str(&line("Genre", &meta.genre));
    header.push_str(&line("Tone", &meta.tone));
    header.push_str(&line("Point of view", &meta.pov));
    header.push_str(&line("Target length", &meta.target_length));

    let characters: Vec<String> = canon
        .characters
        .iter()
        .map(|c| match &c.description {
            Some(d) => format!("{} ({}): {}", c.full_name, c.short_name, d),
            None => format!("{} ({})", c.full_name, c.short_name),
        })
        .collect();
    let factions: Vec<String> = canon
        .factions
        .iter()
        .map(|f| {
            if f.description.trim().is_empty() {
                f.name.clone()
            } else {
                format!("{}: {}", f.name, f.description)
            }
        })
        .collect();
    let timeline: Vec<String> = canon
        .timeline
        .iter()
        .map(|t| format!("{}: {}", t.when, t.event))
        .collect();

    join_sections(vec![
        header,
        line("Premise", &canon.whitepaper),
        line("Setting", &canon.settings),
        list("Characters", &characters),
        list("World rules", &canon.world_rules),
        list("Technology and magic", &canon.tech_magic_rules),
        list("Factions", &factions),
        list("Timeline", &timeline),
        list("Themes", &canon.themes),
        list(
            "HARD CONSTRAINTS (must never be violated)",
            &canon.hard_constraints,
        ),
        list("Soft guidelines (follow where possible)", &canon.soft_guidelines),
    ])
}

/// Volume layer: arc, emotional promise and volume memory.
pub fn volume_layer(volume: &Volume, memory: Option<&VolumeMemory>) -> String {
    let mut arc = format!("Volume {}", volume.volume_number);
    if !volume.title.trim().is_empty() {
        arc.push_str(&format!(": {}", volume.title.trim()));
    }
    arc.push('\n');
    arc.push_str(&line("Theme", &volume.theme));
    arc.push_str(&line("Emotional promise", &volume.emotional_promise));
    arc.push_str(&line(
        "Relationship at the start of the volume",
        &volume.relationship_state_start,
    ));
    arc.push_str(&line(
        "Relationship by the end of the volume",
        &volume.relationship_state_end,
    ));
    arc.push_str(&line("Turning point", &volume.turning_point));

    let Some(memory) = memory else {
        return arc.trim_end().to_string();
    };
    let mut sections = vec![
        arc,
        list("Unresolved arcs", &memory.unresolved_arcs),
        list("Character progression so far", &memory.character_progression),
        list("Promises made to the reader", &memory.promises_made),
        list("Promises already fulfilled", &memory.promises_fulfilled),
    ];
    if let Some(state) = &memory.last_emotional_state {
        sections.push(line("Emotional state at the last chapter", state));
    }
    join_sections(sections)
}

/// Act layer: purpose, pacing, emotional pressure and act memory.
pub fn act_layer(act: Option<&ActContext>, memory: Option<&ActMemory>) -> String {
    let mut out = String::new();
    if let Some(act) = act {
        if let Some(tag) = &act.act_tag {
            out.push_str(&line("Act", tag));
        }
        out.push_str(&format!(
            "Narrative purpose: {} ({})\n",
            act.purpose,
            act.purpose.guidance()
        ));
        out.push_str(&format!("Pacing: {}\n", act.pacing));
        out.push_str(&format!("Emotional pressure: {}/10\n", act.pressure()));
    }
    let Some(memory) = memory else {
        return out.trim_end().to_string();
    };
    join_sections(vec![
        out,
        format!("Tension level so far: {}/10", memory.tension_level),
        list("Active conflicts", &memory.active_conflicts),
        list("Misunderstandings in play", &memory.misunderstandings),
    ])
}

fn state_delta_text(delta: &StateDelta) -> String {
    let characters: Vec<String> = delta
        .character_states
        .iter()
        .map(|(name, state)| format!("{}: {}", name, state))
        .collect();
    join_sections(vec![
        list("Character states", &characters),
        list("World changes", &delta.world_changes),
        list("Plot progression", &delta.plot_progression),
        line("Emotional state", &delta.emotional_state),
        list("Unresolved threads", &delta.unresolved_threads),
    ])
}

/// Local layer for chapters: the previous chapter's summary and state delta.
pub fn local_chapter_layer(previous: Option<&Chapter>) -> String {
    let Some(previous) = previous else {
        return "This is the first chapter; there is no prior chapter.".to_string();
    };
    let mut sections = vec![format!(
        "Previous chapter: {}",
        previous
            .title
            .as_deref()
            .map(|t| format!("chapter {} \"{}\"", previous.chapter_number, t))
            .unwrap_or_else(|| format!("chapter {}", previous.chapter_number))
    )];
    if let Some(summary) = &previous.summary {
        sections.push(line("Summary", summary));
    }
    if let Some(delta) = &previous.state_delta {
        sections.push(state_delta_text(delta));
    }
    sections.push(
        "Pick up from where the previous chapter ended; do not contradict it.".to_string(),
    );
    join_sections(sections)
}

/// Local layer for pages: the literal text of the most recent pages.
///
/// At most `limit` pages are included, oldest first, followed by a contract
/// to continue exactly where the last one stops. For the first page of a
/// chapter the previous chapter's summary is used instead.
pub fn local_page_layer(
    prior_pages: &[Page],
    limit: usize,
    previous_chapter: Option<&Chapter>,
) -> String {
    if prior_pages.is_empty() {
        return join_sections(vec![
            "This is the first page of the chapter.".to_string(),
            local_chapter_layer(previous_chapter),
        ]);
    }
    let start = prior_pages.len().saturating_sub(limit);
    let window = &prior_pages[start..];
    let mut out = format!(
        "The previous {} page(s) of this chapter, verbatim:\n\n",
        window.len()
    );
    for page in window {
        out.push_str(&format!("--- Page {} ---\n", page.page_number));
        out.push_str(page.content.trim());
        out.push_str("\n\n");
    }
    if let Some(last) = window.last() {
        if !last.narrative_momentum.trim().is_empty() {
            out.push_str(&line("Momentum from the last page", &last.narrative_momentum));
        }
        out.push_str(&format!(
            "CONTINUITY CONTRACT: continue exactly where page {} leaves off, mid-scene if it ends mid-scene. \
             Do not repeat, summarise or restart anything already written.",
            last.page_number
        ));
    }
    out
}
