//! Positional-phrase heuristic for unparseable vision replies.
//!
//! When the model ignores the structured-answer instruction and replies in
//! prose, this module decides whether the prose contradicts a position named
//! in the question ("is the cart icon in the top right?"). It is approximate
//! keyword matching over a fixed phrase table, not semantic understanding:
//! it can miss paraphrases and mislabel negations, so its verdicts are
//! reported as analysis, never as ground truth.

/// Recognized positional phrases, longest first so compound phrases win
/// before their single-word components ("top right" before "top").
const POSITION_PHRASES: &[&str] = &[
    "top left",
    "top right",
    "bottom left",
    "bottom right",
    "middle",
    "center",
    "top",
    "bottom",
    "left",
    "right",
];

/// Phrases in a reply that explicitly call the position wrong, regardless of
/// which position is mentioned.
const WRONG_POSITION_MARKERS: &[&str] = &[
    "wrong position",
    "not in the expected position",
    "different position",
    "not where",
    "incorrect position",
    "not located in",
];

/// Lowercase and fold hyphens so "top-right" matches "top right".
fn normalize(text: &str) -> String {
    text.to_lowercase().replace('-', " ")
}

/// The position the question expects the element at, if it names one.
pub fn expected_position(question: &str) -> Option<String> {
    let normalized = normalize(question);
    POSITION_PHRASES
        .iter()
        .find(|phrase| normalized.contains(*phrase))
        .map(|phrase| phrase.to_string())
}

/// Every position the text mentions, compound phrases masked out before
/// single words so "top right" is not also counted as "top" and "right".
pub fn mentioned_positions(text: &str) -> Vec<String> {
    let mut remaining = normalize(text);
    let mut found = Vec::new();
    for phrase in POSITION_PHRASES {
        if remaining.contains(phrase) {
            found.push(phrase.to_string());
            remaining = remaining.replace(phrase, " ");
        }
    }
    found
}

/// Whether a free-text reply contradicts the expected position.
///
/// True when the reply uses explicit wrong-position language, or mentions
/// other positions without ever mentioning the expected one. A reply that
/// names no position at all is not a contradiction.
pub fn contradicts(reply: &str, expected: &str) -> bool {
    let normalized = normalize(reply);
    if WRONG_POSITION_MARKERS.iter().any(|marker| normalized.contains(marker)) {
        return true;
    }

    let mentioned = mentioned_positions(reply);
    if mentioned.is_empty() {
        return false;
    }
    !mentioned.iter().any(|position| position == expected)
}

#[cfg(test)]
#[path = "heuristic_tests.rs"]
mod tests;
