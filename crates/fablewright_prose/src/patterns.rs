//! Pattern tables behind the prose quality checks.
//!
//! Each check is driven by a table of labelled, weighted regular expressions
//! so the rubric can be tuned and tested apart from the scoring logic.

use regex::Regex;

/// A pattern as written in a table: label, case-insensitive regex, weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternSpec {
    /// Human-readable name used in issue messages
    pub label: &'static str,
    /// Regular expression source
    pub pattern: &'static str,
    /// Contribution of each match to the check's total
    pub weight: u32,
}

const fn spec(label: &'static str, pattern: &'static str, weight: u32) -> PatternSpec {
    PatternSpec {
        label,
        pattern,
        weight,
    }
}

/// A compiled pattern.
#[derive(Debug, Clone)]
pub struct WeightedPattern {
    /// Human-readable name
    pub label: String,
    /// Compiled expression
    pub regex: Regex,
    /// Contribution of each match
    pub weight: u32,
}

impl WeightedPattern {
    /// Number of non-overlapping matches in `text`.
    pub fn count(&self, text: &str) -> usize {
        self.regex.find_iter(text).count()
    }

    /// Matches multiplied by weight.
    pub fn weighted_count(&self, text: &str) -> u32 {
        self.count(text) as u32 * self.weight
    }
}

/// Compile a built-in table. The sources are constants, so failure is a bug.
pub(crate) fn compile(table: &[PatternSpec]) -> Vec<WeightedPattern> {
    table
        .iter()
        .map(|spec| WeightedPattern {
            label: spec.label.to_string(),
            regex: Regex::new(&format!("(?i){}", spec.pattern)).expect("Valid built-in pattern"),
            weight: spec.weight,
        })
        .collect()
}

/// Prose that refers to its own generation scaffolding.
pub(crate) const CANON_LEAKAGE: &[PatternSpec] = &[
    spec(
        "appeal to the story bible",
        r"\b(?:according to|as (?:stated|written|described|established|laid out) in|per) the (?:story ?bible|canon|world ?rules|whitepaper|outline)\b",
        1,
    ),
    spec("story bible", r"\bstory[ -]?bible\b", 1),
    spec(
        "canon as authority",
        r"\b(?:the|this) canon (?:says|states|dictates|establishes|requires|specifies)\b",
        1,
    ),
    spec("world rules", r"\bworld[ -]rules?\b", 1),
    spec("hard constraint", r"\bhard constraints?\b", 1),
    spec("soft guideline", r"\bsoft guidelines?\b", 1),
    spec("outline reference", r"\b(?:chapter|volume|page) outline\b", 1),
    spec(
        "pipeline vocabulary",
        r"\b(?:state[ -]?delta|beat[ -]?coverage|narrative[ -]momentum|micro-?beats?)\b",
        1,
    ),
    spec("model self-reference", r"\b(?:as an ai|language model)\b", 1),
];

/// Clichéd or expository ways to open a chapter.
pub(crate) const CLICHE_OPENINGS: &[PatternSpec] = &[
    spec(
        "waking up",
        r"\b(?:woke|wakes|waking|awoke|awoken|awakened|awakens)\b",
        1,
    ),
    spec("alarm clock", r"\balarm(?: clock)?\b", 1),
    spec(
        "sunrise",
        r"\b(?:sunrise|sun rose|sun was rising|sun came up|dawn broke|first light of (?:day|dawn))\b",
        1,
    ),
    spec(
        "another day",
        r"\b(?:another (?:day|morning)|(?:just )?(?:an|a) (?:ordinary|normal|typical) (?:day|morning))\b",
        1,
    ),
    spec("stretching or yawning", r"\b(?:stretched|yawned)\b", 1),
    spec(
        "mirror description",
        r"\b(?:looked|stared|gazed) (?:at|into) (?:my|her|his|their) (?:own )?reflection\b",
        1,
    ),
    spec("weather opening", r"^\s*it was a (?:dark|cold|grey|gray) and stormy\b", 1),
];

/// Summarising, telling-not-showing constructions.
pub(crate) const SYNOPSIS_STYLE: &[PatternSpec] = &[
    spec("after a while", r"\bafter a (?:while|time|few (?:hours|days|weeks))\b", 2),
    spec("eventually", r"\beventually\b", 2),
    spec(
        "time skip",
        r"\b(?:later that (?:day|night|evening|morning|week)|over the (?:next|following) (?:few )?(?:hours|days|weeks|months)|in the days that followed)\b",
        2,
    ),
    spec(
        "summarised conversation",
        r"\b(?:they|we) (?:discussed|talked about|talked for hours|argued about|debated)\b",
        2,
    ),
    spec("passage of time", r"\b(?:as time passed|time passed|days (?:passed|went by)|weeks (?:passed|went by))\b", 2),
    spec("before long", r"\b(?:before long|soon after|in the end)\b", 1),
    spec(
        "reported explanation",
        r"\b(?:he|she|they|i) (?:explained (?:that|how|why)|told (?:him|her|them|me) (?:about|that|how))\b",
        1,
    ),
    spec("spent time", r"\bspent (?:the (?:day|night|evening|afternoon|morning)|hours|days|weeks)\b", 1),
];

/// Sensory detail.
pub(crate) const SENSORY: &[PatternSpec] = &[
    spec(
        "smell and taste",
        r"\b(?:smell\w*|scent\w*|taste\w*|sour|bitter|sweet|salty|musty|smok\w*|stench|reek\w*)\b",
        1,
    ),
    spec(
        "touch and temperature",
        r"\b(?:warm\w*|cold\w*|rough|smooth|sharp|soft|damp|wet|sticky|ache\w*|sting\w*|heat|chill\w*|sweat\w*|grit\w*)\b",
        1,
    ),
    spec(
        "sound",
        r"\b(?:loud|quiet|whisper\w*|hum\w*|creak\w*|rustl\w*|echo\w*|crackl\w*|thud\w*|hiss\w*|ring\w*|click\w*)\b",
        1,
    ),
    spec(
        "sight",
        r"\b(?:glow\w*|flicker\w*|shadow\w*|bright|dim|gleam\w*|glint\w*|pale|dark\w*)\b",
        1,
    ),
];

/// Access to a character's inner life.
pub(crate) const INTERIORITY: &[PatternSpec] = &[spec(
    "interior verbs",
    r"\b(?:thought|wondered|realized|realised|felt|knew|remembered|hoped|feared|wanted|wished|suspected|decided|doubted|believed|regretted|worried|imagined|understood|noticed)\b",
    1,
)];

/// Physical movement.
pub(crate) const MOVEMENT: &[PatternSpec] = &[spec(
    "movement verbs",
    r"\b(?:walk\w*|ran|run\w*|step\w*|turn\w*|reach\w*|grabb\w*|pull\w*|push\w*|cross\w*|lean\w*|stood|sat|rose|lift\w*|dropp\w*|mov\w*|slipp\w*|climb\w*|knelt|pac\w*|shov\w*|stumbl\w*|hurri\w*|strode|spun|gripp\w*|slamm\w*|nodd\w*|shrugg\w*|glanc\w*|follow\w*|back\w* away)\b",
    1,
)];

/// Encyclopaedic exposition.
pub(crate) const EXPOSITION: &[PatternSpec] = &[
    spec("had always been", r"\bhad always been\b", 1),
    spec("was known", r"\bwas known (?:as|for)\b", 1),
    spec("ages past", r"\bfor (?:centuries|generations|decades)\b", 1),
    spec("legend", r"\b(?:it was said that|legend (?:has it|said)|long ago)\b", 1),
    spec("history lesson", r"\b(?:the history of|had been founded|as everyone knew)\b", 1),
    spec(
        "explaining connective",
        r"\b(?:which meant that|in other words|this was because|the reason (?:was|being))\b",
        1,
    ),
];
