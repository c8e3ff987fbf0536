//! Policy blocks stated to the model alongside the context layers.

use fablewright_core::CharacterProfile;

/// Where a generation request sits in the book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StoryPosition {
    /// Volume being written
    pub volume_number: u32,
    /// Volumes planned; zero when unknown
    pub total_volumes: u32,
    /// Chapter being written
    pub chapter_number: u32,
    /// Chapters planned for the volume; zero when unknown
    pub chapters_in_volume: u32,
    /// Page being written, when generating a page
    pub page_number: Option<u32>,
    /// Pages planned for the chapter, when known
    pub pages_in_chapter: Option<u32>,
}

impl StoryPosition {
    /// Whether this is the last chapter of the last volume.
    ///
    /// # Examples
    ///
    /// ```
    /// use fablewright_context::StoryPosition;
    ///
    /// let position = StoryPosition {
    ///     volume_number: 3,
    ///     total_volumes: 3,
    ///     chapter_number: 24,
    ///     chapters_in_volume: 24,
    ///     ..Default::default()
    /// };
    /// assert!(position.is_final_chapter());
    /// ```
    pub fn is_final_chapter(&self) -> bool {
        self.total_volumes > 0
            && self.volume_number >= self.total_volumes
            && self.chapters_in_volume > 0
            && self.chapter_number >= self.chapters_in_volume
    }

    /// Whether the text being written may resolve the central conflict.
    ///
    /// Only the final chapter may, and for pages only its last planned page.
    pub fn may_resolve(&self) -> bool {
        match (self.page_number, self.pages_in_chapter) {
            (None, _) => self.is_final_chapter(),
            (Some(page), Some(total)) => self.is_final_chapter() && page >= total,
            (Some(_), None) => false,
        }
    }
}

/// How the text must end, given its position in the book.
pub fn continuity_policy(position: &StoryPosition) -> String {
    let unit = if position.page_number.is_some() {
        "page"
    } else {
        "chapter"
    };
    if position.may_resolve() {
        return format!(
            "ENDING POLICY: this is the final {} of the final volume. You may resolve the central \
             conflict, but the resolution must be earned by what came before.",
            unit
        );
    }
    format!(
        "ENDING POLICY: this is not the end of the story. End the {unit} on unresolved tension: \
         a question, a threat, a choice not yet made. Do not resolve the central conflict, do not \
         tie off open threads early, and never use \"happily ever after\" or similar closure \
         language. Only the final chapter of the final volume may resolve the story."
    )
}

/// Canonical-name rules for the roster.
///
/// Empty when the roster is empty.
///
/// # Examples
///
/// ```
/// use fablewright_context::canonical_names_block;
/// use fablewright_core::CharacterProfile;
///
/// let roster = vec![CharacterProfile::new("Kate Andrea Clauzure", None, None)];
/// let block = canonical_names_block(&roster);
/// assert!(block.contains("Kate Andrea Clauzure -> Kate"));
/// ```
pub fn canonical_names_block(characters: &[CharacterProfile]) -> String {
    if characters.is_empty() {
        return String::new();
    }
    let mut out = String::from(
        "CANONICAL NAMES: on first mention use the full name, afterwards the short name. \
         Never invent alternate surnames, spellings or nicknames.\n",
    );
    for character in characters {
        out.push_str(&format!(
            "- {} -> {}\n",
            character.full_name, character.short_name
        ));
    }
    out.trim_end().to_string()
}

/// Binding chapter outline and volume-outline boundary.
pub fn outline_block(chapter_outline: Option<&str>, volume_outline: Option<&str>) -> String {
    let mut sections = Vec::new();
    if let Some(outline) = chapter_outline.map(str::trim).filter(|o| !o.is_empty()) {
        sections.push(format!(
            "CHAPTER OUTLINE (binding): every beat below must appear, in order. Do not invent \
             major events that are not listed.\n{}",
            outline
        ));
    }
    if let Some(outline) = volume_outline.map(str::trim).filter(|o| !o.is_empty()) {
        sections.push(format!(
            "VOLUME OUTLINE (hard boundary): nothing may happen beyond this outline, and no \
             character may show knowledge of arcs it does not contain.\n{}",
            outline
        ));
    }
    sections.join("\n\n")
}
