use unicode_segmentation::UnicodeSegmentation;

/// Tokenize text into lowercase word tokens, dropping stopwords and
/// single-character tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    text.unicode_words()
        .map(|w| w.to_lowercase())
        .filter(|w| w.chars().count() >= 2 && !is_stopword(w))
        .collect()
}

/// Distinct keywords of a topic in first-occurrence order, with generic
/// headline filler ("news", "latest", ...) removed as well.
pub fn keywords(topic: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for token in tokenize(topic) {
        if is_filler(&token) || out.contains(&token) {
            continue;
        }
        out.push(token);
    }
    out
}

fn is_filler(word: &str) -> bool {
    matches!(
        word,
        "news" | "latest" | "update" | "updates" | "today" | "breaking" | "new" | "live"
        | "report" | "reports" | "trending" | "vs"
    )
}

fn is_stopword(word: &str) -> bool {
    matches!(
        word,
        "a" | "an" | "the" | "is" | "it" | "of" | "to" | "in" | "for" | "on" | "with"
        | "at" | "by" | "from" | "as" | "or" | "and" | "but" | "not" | "be" | "are"
        | "was" | "were" | "been" | "being" | "have" | "has" | "had" | "do" | "does"
        | "did" | "will" | "would" | "could" | "should" | "may" | "might" | "shall"
        | "can" | "this" | "that" | "these" | "those" | "there" | "here" | "where"
        | "when" | "what" | "which" | "who" | "whom" | "how" | "all" | "each" | "every"
        | "both" | "few" | "more" | "most" | "other" | "some" | "such" | "no" | "nor"
        | "only" | "own" | "same" | "so" | "than" | "too" | "very" | "just" | "because"
        | "about" | "into" | "through" | "during" | "before" | "after" | "above" | "below"
        | "between" | "under" | "again" | "further" | "then" | "once" | "any" | "its"
        | "your" | "our" | "their" | "his" | "her" | "my" | "if" | "up" | "out" | "also"
        | "why" | "now" | "get" | "gets"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_basic() {
        let tokens = tokenize("Why the EU is regulating AI chatbots!");
        assert_eq!(tokens, vec!["eu", "regulating", "ai", "chatbots"]);
    }

    #[test]
    fn tokenize_filters_short() {
        let tokens = tokenize("x y z quantum");
        assert_eq!(tokens, vec!["quantum"]);
    }

    #[test]
    fn keywords_dedup_in_order() {
        let kw = keywords("AI news: AI chatbots, latest AI update");
        assert_eq!(kw, vec!["ai", "chatbots"]);
    }

    #[test]
    fn keywords_of_empty_topic() {
        assert!(keywords("").is_empty());
        assert!(keywords("the news").is_empty());
    }
}
