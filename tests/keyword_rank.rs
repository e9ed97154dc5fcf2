// tests/keyword_rank.rs
use std::collections::HashMap;

use barrage_trend_analyzer::{rank, rank_text, LexiconTokenizer, RankConfig};

fn tagger(pairs: &[(&str, &str)]) -> LexiconTokenizer {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    LexiconTokenizer::new(map, "x")
}

fn cfg() -> RankConfig {
    RankConfig::default()
}

#[test]
fn pos_filter_keeps_only_allowed_nouns() {
    let t = tagger(&[("猫", "n"), ("垄", "n"), ("坐在", "v_other"), ("上", "f"), ("跳", "vi")]);
    let c = RankConfig {
        allowed_tags: ["n".to_string()].into_iter().collect(),
        window: 2,
        ..cfg()
    }
    .with_weights(true);

    let r = rank_text("猫 坐在 垄 上 猫 跳", &t, &c).unwrap();
    assert!(r.converged);
    assert_eq!(r.nodes, 2);
    assert_eq!(r.terms(), vec!["猫", "垄"]);
    let w: Vec<f64> = r.keywords.iter().map(|k| k.weight.unwrap()).collect();
    assert!(w[0] >= w[1]);
}

#[test]
fn top_k_larger_than_vocabulary_returns_everything() {
    let t = tagger(&[("alpha", "n"), ("beta", "v"), ("gamma", "a")]);
    let r = rank_text("alpha beta gamma alpha", &t, &cfg().top_k(10)).unwrap();
    assert_eq!(r.keywords.len(), 3);
}

#[test]
fn top_k_truncates() {
    let t = LexiconTokenizer::default();
    let r = rank_text("a b c d e f g h", &t, &cfg().top_k(3)).unwrap();
    assert_eq!(r.keywords.len(), 3);
    assert_eq!(r.nodes, 8);
}

#[test]
fn empty_or_fully_filtered_text_is_empty_success() {
    let t = LexiconTokenizer::default();
    assert!(rank_text("", &t, &cfg()).unwrap().is_empty());

    let stop = RankConfig {
        stopwords: ["the", "and"].iter().map(|s| s.to_string()).collect(),
        ..cfg()
    };
    let r = rank_text("the and the", &t, &stop).unwrap();
    assert!(r.is_empty());
    assert!(r.converged);

    let no_texts: [&str; 0] = [];
    assert!(rank(&no_texts, &t, &cfg()).unwrap().is_empty());
}

#[test]
fn ranking_is_deterministic() {
    let t = LexiconTokenizer::default();
    let texts = [
        "river bank money loan",
        "bank loan interest rate",
        "river water fish",
        "money interest bank",
        "fish water river boat",
    ];
    let c = cfg().with_weights(true);
    let first = rank(&texts, &t, &c).unwrap();
    for _ in 0..5 {
        assert_eq!(rank(&texts, &t, &c).unwrap(), first);
    }
    assert!(first.keywords.iter().all(|k| k.weight.unwrap() >= 0.0));
}

#[test]
fn edges_never_cross_event_boundaries() {
    let t = LexiconTokenizer::default();
    // Joined into one text, "solo" would link to "b"; as separate events it
    // stays isolated and drops to the base score.
    let c = cfg().with_weights(true);
    let split = rank(&["a b", "solo"], &t, &c).unwrap();
    let solo = split.keywords.iter().find(|k| k.term == "solo").unwrap();
    assert!((solo.weight.unwrap() - 0.15).abs() < 1e-9);
    assert_eq!(split.terms().last(), Some(&"solo"));

    let joined = rank(&["a b solo"], &t, &c).unwrap();
    let solo = joined.keywords.iter().find(|k| k.term == "solo").unwrap();
    assert!(solo.weight.unwrap() > 0.15);
}

#[test]
fn ties_keep_first_appearance_order() {
    let t = LexiconTokenizer::default();
    // two disconnected identical pairs: all four nodes score the same
    let r = rank(&["q r", "s u"], &t, &cfg()).unwrap();
    assert_eq!(r.terms(), vec!["q", "r", "s", "u"]);
}

#[test]
fn weights_absent_unless_requested() {
    let t = LexiconTokenizer::default();
    let r = rank_text("one two three", &t, &cfg()).unwrap();
    assert!(r.keywords.iter().all(|k| k.weight.is_none()));
    let json = serde_json::to_value(&r).unwrap();
    assert!(json["keywords"][0].get("weight").is_none());
}
