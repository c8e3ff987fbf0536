//! JSON shapes the model must answer with.

/// Output format for a chapter.
pub fn chapter_output_contract() -> &'static str {
    r#"Respond with a single JSON object and nothing else:
{
  "content": "the full chapter prose, paragraphs separated by blank lines",
  "summary": "a 3-5 sentence summary of what happened",
  "stateDelta": {
    "characterStates": {"Full Name": "state at the end of the chapter"},
    "worldChanges": ["..."],
    "plotProgression": ["..."],
    "emotionalState": "the emotional note the chapter ends on",
    "unresolvedThreads": ["..."],
    "resolvedThreads": ["..."]
  }
}"#
}

/// Output format for a page.
pub fn page_output_contract() -> &'static str {
    r#"Respond with a single JSON object and nothing else:
{
  "content": "the page prose, paragraphs separated by blank lines",
  "beatCoverage": ["the one or two micro-beats this page covers"],
  "narrativeMomentum": "how this page sets up the next one"
}"#
}

/// Output format for a story canon.
pub fn canon_output_contract() -> &'static str {
    r#"Respond with a single JSON object and nothing else:
{
  "whitepaper": "premise and overall vision",
  "characters": [{"fullName": "First Last", "shortName": "First", "description": "..."}],
  "settings": "the world and its places",
  "worldRules": ["..."],
  "techMagicRules": ["..."],
  "hardConstraints": ["..."],
  "softGuidelines": ["..."],
  "themes": ["..."],
  "factions": [{"name": "...", "description": "..."}],
  "timeline": [{"when": "...", "event": "..."}],
  "metadata": {"genre": "...", "tone": "...", "pov": "...", "targetLength": "..."}
}"#
}
