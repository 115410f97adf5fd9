use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s]").unwrap());
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Normalize a topic for comparison: lowercase, strip punctuation,
/// collapse whitespace, trim.
pub fn normalize(topic: &str) -> String {
    let lower = topic.to_lowercase();
    let stripped = NON_WORD.replace_all(&lower, "");
    WHITESPACE.replace_all(&stripped, " ").trim().to_string()
}

/// Word set of an already-normalized topic.
pub fn word_set(normalized: &str) -> HashSet<&str> {
    normalized.split(' ').filter(|w| !w.is_empty()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_strips_punctuation() {
        assert_eq!(normalize("AI Chatbots!"), "ai chatbots");
        assert_eq!(normalize("What's next? (2025)"), "whats next 2025");
    }

    #[test]
    fn collapses_whitespace() {
        assert_eq!(normalize("  crypto \t\n regulation   "), "crypto regulation");
    }

    #[test]
    fn punctuation_between_words_leaves_single_space() {
        assert_eq!(normalize("rust - the language"), "rust the language");
    }

    #[test]
    fn keeps_underscores_and_digits() {
        assert_eq!(normalize("GPT_5 launch"), "gpt_5 launch");
    }

    #[test]
    fn empty_and_punctuation_only() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("?!... --"), "");
    }

    #[test]
    fn unicode_letters_survive() {
        assert_eq!(normalize("Café Über!"), "café über");
    }

    #[test]
    fn idempotent() {
        let inputs = [
            "AI chatbots!",
            "  Mixed   CASE -- stuff ",
            "",
            "emoji 🚀 launch",
            "Ünïcödé, text; here.",
            "tabs\tand\nnewlines",
        ];
        for input in inputs {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn word_set_splits_on_spaces() {
        let set = word_set("ai chatbots ai");
        assert_eq!(set.len(), 2);
        assert!(set.contains("ai"));
        assert!(set.contains("chatbots"));
        assert!(word_set("").is_empty());
    }
}
