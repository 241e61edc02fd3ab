//! Keyword-based intent normalizer.
//!
//! Turns a conversational utterance ("what's the weather like in Paris") into the
//! canonical command the router understands ("weather what's the like in Paris").
//! Rules are evaluated in [`RULES`] order and the first match wins; anything that
//! matches no rule becomes a `chat` command carrying the input unchanged.

use regex::Regex;
use std::collections::HashSet;

/// English stop-words dropped before token rules are tested.
const STOP_WORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "your", "yours",
    "yourself", "yourselves", "he", "him", "his", "himself", "she", "her", "hers", "herself",
    "it", "its", "itself", "they", "them", "their", "theirs", "themselves", "what", "which",
    "who", "whom", "this", "that", "these", "those", "am", "is", "are", "was", "were", "be",
    "been", "being", "have", "has", "had", "having", "do", "does", "did", "doing", "a", "an",
    "the", "and", "but", "if", "or", "because", "as", "until", "while", "of", "at", "by",
    "for", "with", "about", "against", "between", "into", "through", "during", "before",
    "after", "above", "below", "to", "from", "up", "down", "in", "out", "on", "off", "over",
    "under", "again", "further", "then", "once", "here", "there", "when", "where", "why",
    "how", "all", "any", "both", "each", "few", "more", "most", "other", "some", "such", "no",
    "nor", "not", "only", "own", "same", "so", "than", "too", "very", "s", "t", "can", "will",
    "just", "don", "should", "now", "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren",
    "couldn", "didn", "doesn", "hadn", "hasn", "haven", "isn", "ma", "mightn", "mustn",
    "needn", "shan", "shouldn", "wasn", "weren", "won", "wouldn",
];

/// What a rule looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Every listed word is present among the filtered tokens.
    Tokens(&'static [&'static str]),
    /// Substring of the lower-cased input.
    Phrase(&'static str),
}

/// Whether the canonical command carries the rest of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Argument {
    None,
    /// The input with the trigger word or phrase cut out.
    Remainder(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntentRule {
    pub trigger: Trigger,
    pub action: &'static str,
    pub argument: Argument,
}

const fn tokens(words: &'static [&'static str], action: &'static str) -> IntentRule {
    IntentRule {
        trigger: Trigger::Tokens(words),
        action,
        argument: Argument::None,
    }
}

const fn phrase(text: &'static str, action: &'static str) -> IntentRule {
    IntentRule {
        trigger: Trigger::Phrase(text),
        action,
        argument: Argument::None,
    }
}

/// Priority order. Token rules come before phrase rules.
pub const RULES: &[IntentRule] = &[
    IntentRule {
        trigger: Trigger::Tokens(&["weather"]),
        action: "weather",
        argument: Argument::Remainder("weather"),
    },
    tokens(&["system", "usage"], "system"),
    tokens(&["email"], "send_email"),
    tokens(&["calendar", "list"], "list_events"),
    tokens(&["calendar", "add"], "add_event"),
    IntentRule {
        trigger: Trigger::Tokens(&["news"]),
        action: "news",
        argument: Argument::Remainder("news"),
    },
    phrase("schedule", "schedule"),
    phrase("large files", "large_files"),
    phrase("duplicate files", "duplicates"),
    phrase("file types", "file_types"),
    phrase("analyze code", "analyze_code"),
    phrase("analyze self", "analyze_self"),
    phrase("list plugins", "list_plugins"),
    IntentRule {
        trigger: Trigger::Phrase("enable plugin"),
        action: "enable_plugin",
        argument: Argument::Remainder("enable plugin"),
    },
    IntentRule {
        trigger: Trigger::Phrase("disable plugin"),
        action: "disable_plugin",
        argument: Argument::Remainder("disable plugin"),
    },
];

/// Lower-cased alphanumeric tokens with stop-words removed.
pub fn tokenize(input: &str) -> Vec<String> {
    let stop_words: HashSet<&str> = STOP_WORDS.iter().copied().collect();
    input
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty() && !stop_words.contains(t))
        .map(str::to_string)
        .collect()
}

impl IntentRule {
    fn matches(&self, tokens: &[String], lowered: &str) -> bool {
        match self.trigger {
            Trigger::Tokens(words) => words.iter().all(|w| tokens.iter().any(|t| t == w)),
            Trigger::Phrase(text) => lowered.contains(text),
        }
    }

    fn build(&self, input: &str) -> String {
        match self.argument {
            Argument::None => self.action.to_string(),
            Argument::Remainder(cut) => {
                let rest = strip_words(input, cut);
                if rest.is_empty() {
                    self.action.to_string()
                } else {
                    format!("{} {}", self.action, rest)
                }
            }
        }
    }
}

/// Removes every case-insensitive occurrence of `cut` that stands as its own token
/// and collapses whitespace.
///
/// Token edges are the same as in [`tokenize`]: any character that is not
/// alphanumeric, so `weather_report` contains the token `weather`.
fn strip_words(input: &str, cut: &str) -> String {
    let pattern = format!(
        r"(?i)(^|[^\p{{Alphabetic}}\p{{N}}]){}([^\p{{Alphabetic}}\p{{N}}]|$)",
        regex::escape(cut)
    );
    let mut stripped = input.to_string();
    match Regex::new(&pattern) {
        // Adjacent occurrences share a delimiter, so one pass can leave some behind.
        Ok(re) => {
            while re.is_match(&stripped) {
                stripped = re.replace_all(&stripped, "$1 $2").into_owned();
            }
        }
        Err(_) => stripped = stripped.replace(cut, " "),
    }
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// The rule that decides `input`, if any.
pub fn classify(input: &str) -> Option<&'static IntentRule> {
    let tokens = tokenize(input);
    let lowered = input.to_lowercase();
    RULES.iter().find(|rule| rule.matches(&tokens, &lowered))
}

/// Canonical command string for `input`. Never empty.
pub fn normalize(input: &str) -> String {
    match classify(input) {
        Some(rule) => {
            tracing::debug!(action = rule.action, "intent matched");
            rule.build(input)
        }
        None if input.is_empty() => "chat".to_string(),
        None => format!("chat {}", input),
    }
}
