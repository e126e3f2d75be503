//! End-to-end checks of the review-intake analysis

use proptest::prelude::*;
use ratesmart_classifiers::{AnalysisConfig, FakeRule, ReviewAnalyzer};
use ratesmart_core::Sentiment;

const SUBSTANTIVE: &str = "This product exceeded my expectations in every way and I would \
                           recommend it to anyone looking for quality";

fn analyzer() -> ReviewAnalyzer {
    ReviewAnalyzer::new().expect("default analyzer")
}

#[test]
fn test_documented_fake_verdicts() {
    let analyzer = analyzer();

    assert!(analyzer.is_fake("", 3));
    assert!(analyzer.is_fake("good good good good good", 3));
    assert!(analyzer.is_fake("ok", 5));
    assert!(analyzer.is_fake("Contact me at test@example.com for a refund", 3));
    assert!(!analyzer.is_fake(SUBSTANTIVE, 5));
}

#[test]
fn test_connector_punctuation_splits_words() {
    let analyzer = analyzer();

    assert_eq!(analyzer.normalize("a\u{203F}b\u{203F}c").token_count(), 3);
    assert!(!analyzer.is_fake("a\u{203F}b\u{203F}c", 3));
}

#[test]
fn test_documented_sentiments() {
    let analyzer = analyzer();

    assert_eq!(
        analyzer.sentiment_of("This is absolutely wonderful, I love it"),
        Sentiment::Positive
    );
    assert_eq!(
        analyzer.sentiment_of("Terrible, a complete waste of money"),
        Sentiment::Negative
    );
    assert_eq!(analyzer.sentiment_of("It arrived on Tuesday"), Sentiment::Neutral);
}

#[test]
fn test_rule_order_is_stable() {
    let analyzer = analyzer();

    // too short, extreme rating and no tokens at all: the first rule reports
    let report = analyzer.report("", 1);
    assert_eq!(report.flagged_by, Some(FakeRule::TooShort));

    // repetitive text that also carries a link
    let text = format!("{}http://x.io", "buy ".repeat(15));
    let report = analyzer.report(&text, 3);
    assert_eq!(report.flagged_by, Some(FakeRule::Repetition));
}

#[test]
fn test_sentiment_ignores_rating() {
    let analyzer = analyzer();
    for rating in 1..=5 {
        assert_eq!(
            analyzer.analyze("Terrible, a complete waste of money", rating).sentiment,
            Sentiment::Negative
        );
    }
}

#[test]
fn test_yaml_policy_retunes_analysis() {
    let config = AnalysisConfig::from_yaml(
        r#"
sentiment:
  polarity_threshold: 0.9
fake_review:
  extreme_ratings: []
"#,
    )
    .unwrap();
    let analyzer = ReviewAnalyzer::from_config(&config).unwrap();

    assert_eq!(
        analyzer.sentiment_of("This is absolutely wonderful, I love it"),
        Sentiment::Neutral
    );
    assert!(!analyzer.is_fake("fantastic product", 5));
}

proptest! {
    #[test]
    fn prop_analysis_is_total_and_deterministic(text in ".{0,200}", rating in any::<i64>()) {
        let analyzer = analyzer();
        let first = analyzer.analyze(&text, rating);
        let second = analyzer.analyze(&text, rating);

        prop_assert_eq!(first, second);
        prop_assert!(matches!(
            first.sentiment,
            Sentiment::Positive | Sentiment::Neutral | Sentiment::Negative
        ));
    }

    #[test]
    fn prop_polarity_in_range(text in "[a-zA-Z ,.!']{0,300}") {
        let analyzer = analyzer();
        let polarity = analyzer.report(&text, 3).polarity;
        prop_assert!((-1.0..=1.0).contains(&polarity));
    }

    #[test]
    fn prop_out_of_range_rating_behaves_like_neutral_rating(
        text in "[a-z ]{0,40}",
        rating in prop_oneof![i64::MIN..1i64, 6i64..i64::MAX],
    ) {
        let analyzer = analyzer();
        prop_assert_eq!(analyzer.is_fake(&text, rating), analyzer.is_fake(&text, 3));
    }

    #[test]
    fn prop_links_are_always_flagged(prefix in "[a-z ]{0,60}", host in "[a-z]{1,12}") {
        let analyzer = analyzer();
        let text = format!("{prefix} https://{host}.com/offer");
        prop_assert!(analyzer.is_fake(&text, 3));
    }
}
