//! Temporal expression parser: free text → forecast `Duration`.
//!
//! Input is normalized (lowercase, hyphens and commas to spaces, single
//! spaces), then an ordered list of matchers is tried. The first matcher
//! that produces a duration wins. No match is a normal outcome: the caller
//! asks the user to rephrase.

use std::sync::LazyLock;

use regex::Regex;
use sc_protocol::Duration;

use crate::lexicon;

/// Unit words accepted after a quantity. The prefix decides the unit.
const UNIT_PATTERN: &str = r"minutes?|mins?|hours?|hrs?|days?|weeks?";

/// Number literal. Decimals are captured whole so the rule can reject them.
const NUMBER_PATTERN: &str = r"\d+(?:\.\d+)?";

static QUANTITY_WORDS: LazyLock<String> = LazyLock::new(|| {
    lexicon::words()
        .into_iter()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join("|")
});

static HALF_HOUR: LazyLock<Regex> = LazyLock::new(|| compile(r"\bhalf (?:an )?hour\b"));
static QUARTER_HOUR: LazyLock<Regex> = LazyLock::new(|| compile(r"\bquarter (?:of an )?hour\b"));

// The number must not continue a word or a decimal ("1.5" is not "5").
static NUMERIC_UNIT: LazyLock<Regex> = LazyLock::new(|| {
    compile(&format!(r"(?:^|[^\w.])({NUMBER_PATTERN}) ({UNIT_PATTERN})\b"))
});

static NEXT_PHRASE: LazyLock<Regex> = LazyLock::new(|| {
    compile(&format!(
        r"\b(?:for the next|in the next|the next|next|in)\b(?: ({NUMBER_PATTERN}|{words})(?: of)?)?(?: ?({UNIT_PATTERN}))?\b",
        words = *QUANTITY_WORDS
    ))
});

static IN_PHRASE: LazyLock<Regex> = LazyLock::new(|| {
    compile(&format!(
        r"\bin (?:an? )?(?:({words}) )?(?:of )?({UNIT_PATTERN})\b",
        words = *QUANTITY_WORDS
    ))
});

static NEXT_HOUR: LazyLock<Regex> = LazyLock::new(|| compile(r"\b(?:the next|next|this) hour\b"));
static NEXT_DAY: LazyLock<Regex> = LazyLock::new(|| compile(r"\b(?:next day|tomorrow)\b"));
static NEXT_WEEK: LazyLock<Regex> = LazyLock::new(|| compile(r"\b(?:next week|week)\b"));

static SHORTHAND_MINUTES: LazyLock<Regex> = LazyLock::new(|| compile(r"(?:^|[^\d.])(\d+) ?min"));

// Patterns are compile-time constants plus escaped lexicon words; a failure
// here is a programming error caught by the unit tests.
fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid duration pattern {pattern:?}: {e}"))
}

/// One matcher in the rule cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseRule {
    /// "half an hour", "quarter of an hour".
    FixedPhrase,
    /// "<integer> <unit>", e.g. "30 minutes".
    NumericUnit,
    /// "next/in/for the next" with optional quantity and unit.
    NextPhrase,
    /// "in a/an/<word> <unit>", e.g. "in a couple of days".
    InPhrase,
    /// "next hour", "tomorrow", "week".
    BareRelative,
    /// "<integer>min" anywhere.
    ShorthandMinutes,
}

impl ParseRule {
    /// Evaluation order. Earlier rules shadow later ones.
    pub const ORDER: [ParseRule; 6] = [
        Self::FixedPhrase,
        Self::NumericUnit,
        Self::NextPhrase,
        Self::InPhrase,
        Self::BareRelative,
        Self::ShorthandMinutes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FixedPhrase => "fixed_phrase",
            Self::NumericUnit => "numeric_unit",
            Self::NextPhrase => "next_phrase",
            Self::InPhrase => "in_phrase",
            Self::BareRelative => "bare_relative",
            Self::ShorthandMinutes => "shorthand_minutes",
        }
    }

    /// Run this rule against already-normalized text.
    pub fn apply(&self, normalized: &str) -> Option<Duration> {
        match self {
            Self::FixedPhrase => fixed_phrase(normalized),
            Self::NumericUnit => numeric_unit(normalized),
            Self::NextPhrase => next_phrase(normalized),
            Self::InPhrase => in_phrase(normalized),
            Self::BareRelative => bare_relative(normalized),
            Self::ShorthandMinutes => shorthand_minutes(normalized),
        }
    }
}

impl std::fmt::Display for ParseRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed duration together with the rule that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationMatch {
    pub rule: ParseRule,
    pub duration: Duration,
}

/// Lowercase, turn hyphens and commas into spaces, collapse whitespace.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .replace(['-', ','], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Extract the requested forecast duration, or `None` if no rule matches.
pub fn parse_duration(text: &str) -> Option<Duration> {
    parse_with_rule(text).map(|m| m.duration)
}

/// Like [`parse_duration`], also reporting which rule matched.
pub fn parse_with_rule(text: &str) -> Option<DurationMatch> {
    let normalized = normalize(text);
    let found = ParseRule::ORDER.iter().find_map(|rule| {
        rule.apply(&normalized).map(|duration| DurationMatch {
            rule: *rule,
            duration,
        })
    });

    match &found {
        Some(m) => tracing::trace!(
            rule = %m.rule,
            minutes = m.duration.minutes(),
            "duration parsed"
        ),
        None => tracing::trace!(text = %normalized, "no duration found"),
    }
    found
}

/// Scale a quantity by the unit named by `unit`'s prefix.
fn with_unit(quantity: u64, unit: &str) -> Option<Duration> {
    if unit.starts_with("min") {
        Some(Duration::from_minutes(quantity))
    } else if unit.starts_with('h') {
        Some(Duration::from_hours(quantity))
    } else if unit.starts_with("day") {
        Some(Duration::from_days(quantity))
    } else if unit.starts_with("week") {
        Some(Duration::from_weeks(quantity))
    } else {
        None
    }
}

fn fixed_phrase(text: &str) -> Option<Duration> {
    if HALF_HOUR.is_match(text) {
        return Some(Duration::from_minutes(30));
    }
    if QUARTER_HOUR.is_match(text) {
        return Some(Duration::from_minutes(15));
    }
    None
}

fn numeric_unit(text: &str) -> Option<Duration> {
    let caps = NUMERIC_UNIT.captures(text)?;
    let quantity = match caps[1].parse::<u64>() {
        Ok(n) => n,
        Err(e) => {
            tracing::debug!(literal = &caps[1], error = %e, "numeric quantity is not a whole u64, skipping rule");
            return None;
        }
    };
    with_unit(quantity, &caps[2])
}

fn next_phrase(text: &str) -> Option<Duration> {
    for caps in NEXT_PHRASE.captures_iter(text) {
        let quantity = caps.get(1).map(|m| m.as_str());
        let unit = caps.get(2).map(|m| m.as_str());

        if let Some(literal) = quantity.filter(|q| q.contains('.')) {
            tracing::debug!(literal, "decimal quantity, skipping rule");
            return None;
        }

        // "in a day" / "next an hour": the article belongs to the in-phrase rule.
        if quantity.is_none() && unit.is_none() {
            let end = caps.get(0).map_or(0, |m| m.end());
            if matches!(text[end..].split_whitespace().next(), Some("a" | "an")) {
                continue;
            }
        }

        let quantity = quantity.map_or(1, lexicon::resolve_quantity);
        return with_unit(quantity, unit.unwrap_or("hours"));
    }
    None
}

fn in_phrase(text: &str) -> Option<Duration> {
    let caps = IN_PHRASE.captures(text)?;
    let quantity = caps.get(1).map_or(1, |m| lexicon::resolve_quantity(m.as_str()));
    with_unit(quantity, &caps[2])
}

fn bare_relative(text: &str) -> Option<Duration> {
    if NEXT_HOUR.is_match(text) {
        Some(Duration::from_hours(1))
    } else if NEXT_DAY.is_match(text) {
        Some(Duration::from_days(1))
    } else if NEXT_WEEK.is_match(text) {
        Some(Duration::from_weeks(1))
    } else {
        None
    }
}

fn shorthand_minutes(text: &str) -> Option<Duration> {
    let caps = SHORTHAND_MINUTES.captures(text)?;
    caps[1].parse::<u64>().ok().map(Duration::from_minutes)
}
