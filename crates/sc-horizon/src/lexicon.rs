//! Number words accepted as forecast quantities ("a couple of days", "next twenty-four hours").

use std::collections::HashMap;
use std::sync::LazyLock;

/// Everyday quantity words. Checked before the cardinal table.
static SMALL: LazyLock<HashMap<&'static str, u64>> = LazyLock::new(|| {
    HashMap::from([
        ("one", 1),
        ("two", 2),
        ("three", 3),
        ("four", 4),
        ("five", 5),
        ("six", 6),
        ("seven", 7),
        ("eight", 8),
        ("nine", 9),
        ("ten", 10),
        ("eleven", 11),
        ("twelve", 12),
        ("couple", 2),
        ("few", 3),
    ])
});

/// Cardinals one..twenty-four. Hyphenated forms are stored space-separated
/// since input is normalized before lookup.
static CARDINALS: LazyLock<HashMap<&'static str, u64>> = LazyLock::new(|| {
    HashMap::from([
        ("one", 1),
        ("two", 2),
        ("three", 3),
        ("four", 4),
        ("five", 5),
        ("six", 6),
        ("seven", 7),
        ("eight", 8),
        ("nine", 9),
        ("ten", 10),
        ("eleven", 11),
        ("twelve", 12),
        ("thirteen", 13),
        ("fourteen", 14),
        ("fifteen", 15),
        ("sixteen", 16),
        ("seventeen", 17),
        ("eighteen", 18),
        ("nineteen", 19),
        ("twenty", 20),
        ("twenty one", 21),
        ("twenty two", 22),
        ("twenty three", 23),
        ("twenty four", 24),
    ])
});

fn normalize_word(word: &str) -> String {
    word.to_lowercase()
        .replace('-', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Look a word up in the small table, then the cardinal table.
pub fn lookup(word: &str) -> Option<u64> {
    let key = normalize_word(word);
    SMALL
        .get(key.as_str())
        .or_else(|| CARDINALS.get(key.as_str()))
        .copied()
}

/// Resolve a quantity token to a number.
///
/// Order: integer literal, small table, cardinal table, otherwise 1.
/// Never fails: an unknown word under-specifies the quantity instead of
/// aborting the parse.
pub fn resolve_quantity(word: &str) -> u64 {
    let trimmed = word.trim();
    if let Ok(n) = trimmed.parse::<u64>() {
        return n;
    }
    lookup(trimmed).unwrap_or(1)
}

/// All known quantity words, longest first so regex alternation prefers
/// "twenty one" over "twenty".
pub fn words() -> Vec<&'static str> {
    let mut all: Vec<&'static str> = SMALL.keys().chain(CARDINALS.keys()).copied().collect();
    all.sort_unstable_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
    all.dedup();
    all
}
