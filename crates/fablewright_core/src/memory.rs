//! Derived narrative memory.
//!
//! Memory records are caches recomputed from generated chapters. They feed
//! the volume and act prompt layers and are never authoritative.

use crate::StateDelta;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Running memory of a volume's open arcs and character progress.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VolumeMemory {
    /// Arcs still unresolved
    pub unresolved_arcs: Vec<String>,
    /// How characters have changed so far
    pub character_progression: Vec<String>,
    /// Promises made to the reader
    pub promises_made: Vec<String>,
    /// Promises already paid off
    pub promises_fulfilled: Vec<String>,
    /// Emotional state at the latest chapter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_emotional_state: Option<String>,
}

impl VolumeMemory {
    /// Merge a chapter's state delta into the memory.
    ///
    /// # Examples
    ///
    /// ```
    /// use fablewright_core::{StateDelta, VolumeMemory};
    ///
    /// let mut memory = VolumeMemory {
    ///     unresolved_arcs: vec!["The stolen letter".into()],
    ///     promises_made: vec!["The stolen letter".into()],
    ///     ..Default::default()
    /// };
    /// let delta = StateDelta {
    ///     resolved_threads: vec!["the stolen letter".into()],
    ///     unresolved_threads: vec!["Who sent the courier".into()],
    ///     ..Default::default()
    /// };
    /// memory.absorb(&delta);
    ///
    /// assert_eq!(memory.unresolved_arcs, vec!["Who sent the courier".to_string()]);
    /// assert_eq!(memory.promises_fulfilled, vec!["The stolen letter".to_string()]);
    /// ```
    pub fn absorb(&mut self, delta: &StateDelta) {
        for resolved in &delta.resolved_threads {
            self.unresolved_arcs.retain(|arc| !same_thread(arc, resolved));
            if let Some(pos) = self.promises_made.iter().position(|p| same_thread(p, resolved)) {
                let promise = self.promises_made.remove(pos);
                push_unique(&mut self.promises_fulfilled, &promise);
            }
        }
        for open in &delta.unresolved_threads {
            if !delta.resolved_threads.iter().any(|r| same_thread(r, open)) {
                push_unique(&mut self.unresolved_arcs, open);
            }
        }
        for (name, state) in &delta.character_states {
            push_unique(&mut self.character_progression, &format!("{}: {}", name, state));
        }
        if !delta.emotional_state.trim().is_empty() {
            self.last_emotional_state = Some(delta.emotional_state.clone());
        }
        debug!(
            unresolved = self.unresolved_arcs.len(),
            fulfilled = self.promises_fulfilled.len(),
            "Volume memory updated"
        );
    }
}

/// Running memory of the current act's tension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActMemory {
    /// Tension level, 1 to 10
    pub tension_level: u8,
    /// Conflicts in play
    pub active_conflicts: Vec<String>,
    /// Misunderstandings between characters
    pub misunderstandings: Vec<String>,
}

impl Default for ActMemory {
    fn default() -> Self {
        Self {
            tension_level: 1,
            active_conflicts: Vec::new(),
            misunderstandings: Vec::new(),
        }
    }
}

impl ActMemory {
    /// Merge a chapter's state delta, taking the act's current pressure as
    /// the new tension level.
    pub fn absorb(&mut self, delta: &StateDelta, emotional_pressure: u8) {
        self.tension_level = emotional_pressure.clamp(1, 10);
        for resolved in &delta.resolved_threads {
            self.active_conflicts.retain(|c| !same_thread(c, resolved));
            self.misunderstandings.retain(|m| !same_thread(m, resolved));
        }
        for open in &delta.unresolved_threads {
            if !delta.resolved_threads.iter().any(|r| same_thread(r, open)) {
                push_unique(&mut self.active_conflicts, open);
            }
        }
    }
}

fn same_thread(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

fn push_unique(list: &mut Vec<String>, item: &str) {
    let item = item.trim();
    if !item.is_empty() && !list.iter().any(|existing| same_thread(existing, item)) {
        list.push(item.to_string());
    }
}
