use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use strsim::{jaro_winkler, normalized_levenshtein};

use super::normalize::{normalize, word_set};

/// All supported topic similarity metrics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Metric {
    /// Exact match, then substring containment, then word-set Jaccard.
    #[default]
    Topic,
    Levenshtein,
    JaroWinkler,
    Cosine,
}

/// Similarity (0.0 = no match, 1.0 = identical) between two raw topics.
/// Both sides are normalized first.
pub fn similarity(a: &str, b: &str, metric: Metric) -> f64 {
    similarity_normalized(&normalize(a), &normalize(b), metric)
}

/// Topic similarity of two raw topics under the default rule chain.
pub fn topic_similarity(a: &str, b: &str) -> f64 {
    similarity(a, b, Metric::Topic)
}

/// Similarity between two topics that are already normalized.
///
/// Two empty topics never match: they score 0.0 under every metric.
pub fn similarity_normalized(a: &str, b: &str, metric: Metric) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 0.0;
    }
    if a == b {
        return 1.0;
    }
    match metric {
        Metric::Topic => rule_chain(a, b),
        Metric::Levenshtein => normalized_levenshtein(a, b),
        Metric::JaroWinkler => jaro_winkler(a, b),
        Metric::Cosine => cosine_similarity(a, b),
    }
}

fn rule_chain(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }

    let (shorter, longer) = if a.chars().count() <= b.chars().count() {
        (a, b)
    } else {
        (b, a)
    };
    if longer.contains(shorter) {
        return shorter.chars().count() as f64 / longer.chars().count() as f64;
    }

    jaccard(&word_set(a), &word_set(b))
}

fn jaccard(a: &HashSet<&str>, b: &HashSet<&str>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

/// Cosine similarity on character bigrams.
fn cosine_similarity(a: &str, b: &str) -> f64 {
    let bigrams_a = char_bigrams(a);
    let bigrams_b = char_bigrams(b);

    if bigrams_a.is_empty() || bigrams_b.is_empty() {
        return if a == b { 1.0 } else { 0.0 };
    }

    let mut dot = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;

    let all_keys: HashSet<&String> = bigrams_a.keys().chain(bigrams_b.keys()).collect();

    for key in all_keys {
        let va = *bigrams_a.get(key).unwrap_or(&0) as f64;
        let vb = *bigrams_b.get(key).unwrap_or(&0) as f64;
        dot += va * vb;
        norm_a += va * va;
        norm_b += vb * vb;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a.sqrt() * norm_b.sqrt())
}

fn char_bigrams(s: &str) -> HashMap<String, u32> {
    let chars: Vec<char> = s.chars().collect();
    let mut map = HashMap::new();
    for pair in chars.windows(2) {
        let bigram: String = pair.iter().collect();
        *map.entry(bigram).or_insert(0) += 1;
    }
    map
}

impl Metric {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "topic" | "default" => Some(Self::Topic),
            "levenshtein" | "lev" => Some(Self::Levenshtein),
            "jaro-winkler" | "jaro_winkler" | "jw" => Some(Self::JaroWinkler),
            "cosine" | "cos" => Some(Self::Cosine),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Topic => "topic",
            Self::Levenshtein => "levenshtein",
            Self::JaroWinkler => "jaro-winkler",
            Self::Cosine => "cosine",
        }
    }

    pub fn all_names() -> &'static [&'static str] {
        &["topic", "levenshtein", "jaro-winkler", "cosine"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Metric; 4] = [
        Metric::Topic,
        Metric::Levenshtein,
        Metric::JaroWinkler,
        Metric::Cosine,
    ];

    #[test]
    fn identical_after_normalization() {
        assert_eq!(topic_similarity("AI chatbots", "ai chatbots!"), 1.0);
    }

    #[test]
    fn substring_ratio() {
        // "ai" (2 chars) inside "ai chatbots" (11 chars)
        let sim = topic_similarity("AI", "AI chatbots");
        assert!((sim - 2.0 / 11.0).abs() < 1e-12);
    }

    #[test]
    fn jaccard_fallback() {
        // {crypto, regulation} vs {crypto, ban}: 1 shared of 3
        let sim = topic_similarity("crypto regulation", "crypto ban");
        assert!((sim - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn disjoint_topics() {
        assert_eq!(topic_similarity("rust async", "python typing"), 0.0);
    }

    #[test]
    fn both_empty_never_match() {
        for metric in ALL {
            assert_eq!(similarity("", "", metric), 0.0);
            assert_eq!(similarity("!!", "??", metric), 0.0);
        }
    }

    #[test]
    fn one_empty_is_zero() {
        assert_eq!(topic_similarity("hello", ""), 0.0);
        assert_eq!(topic_similarity("", "hello"), 0.0);
    }

    #[test]
    fn self_similarity() {
        for topic in ["AI chatbots", "x", "Ünïcödé topic", "one two three"] {
            for metric in ALL {
                assert_eq!(similarity(topic, topic, metric), 1.0, "{topic} {metric:?}");
            }
        }
    }

    #[test]
    fn similarity_bounds() {
        let pairs = [
            ("abc", "xyz"),
            ("hello", "world"),
            ("a", "b"),
            ("test", "testing"),
            ("crypto regulation news", "crypto regulation"),
        ];
        for (a, b) in &pairs {
            for metric in ALL {
                let s = similarity(a, b, metric);
                assert!((0.0..=1.0).contains(&s), "{a} vs {b} with {metric:?} = {s}");
            }
        }
    }

    #[test]
    fn similarity_symmetry() {
        let pairs = [
            ("kitten", "sitting"),
            ("AI", "AI chatbots"),
            ("crypto regulation", "crypto ban"),
            ("", "something"),
        ];
        for (a, b) in pairs {
            for metric in [Metric::Topic, Metric::Levenshtein, Metric::Cosine] {
                let ab = similarity(a, b, metric);
                let ba = similarity(b, a, metric);
                assert!((ab - ba).abs() < 1e-10, "{metric:?} not symmetric: {ab} vs {ba}");
            }
        }
        let ab = similarity("kitten", "sitting", Metric::JaroWinkler);
        let ba = similarity("sitting", "kitten", Metric::JaroWinkler);
        assert!((ab - ba).abs() < 1e-10);
    }

    #[test]
    fn containment_counts_chars_not_bytes() {
        // "über" is 4 chars / 5 bytes, "über alles" is 10 chars
        let sim = topic_similarity("über", "über alles");
        assert!((sim - 0.4).abs() < 1e-12);
    }

    #[test]
    fn metric_from_str_aliases() {
        assert_eq!(Metric::from_str("topic"), Some(Metric::Topic));
        assert_eq!(Metric::from_str("lev"), Some(Metric::Levenshtein));
        assert_eq!(Metric::from_str("JW"), Some(Metric::JaroWinkler));
        assert_eq!(Metric::from_str("cos"), Some(Metric::Cosine));
        assert!(Metric::from_str("unknown").is_none());
    }

    #[test]
    fn all_names_parse() {
        for name in Metric::all_names() {
            let metric = Metric::from_str(name).unwrap();
            assert_eq!(metric.as_str(), *name);
        }
    }
}
