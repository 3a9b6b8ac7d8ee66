use kb_search::llm::rerank::parse_ranking;
use kb_search::search::lexical::{score, MAX_TERM_OCCURRENCES, TITLE_WEIGHT};
use kb_search::Document;
use proptest::prelude::*;

fn doc(title: &str, content: &str) -> Document {
    Document {
        path: "doc.md".to_string(),
        title: title.to_string(),
        content: content.to_string(),
    }
}

fn is_permutation(ranking: &[usize], n: usize) -> bool {
    let mut sorted = ranking.to_vec();
    sorted.sort_unstable();
    sorted == (0..n).collect::<Vec<_>>()
}

proptest! {
    #[test]
    fn ranking_is_always_a_permutation(n in 0usize..40, reply in ".{0,200}") {
        let ranking = parse_ranking(&reply, n);
        prop_assert_eq!(ranking.len(), n);
        prop_assert!(is_permutation(&ranking, n), "not a permutation: {:?}", ranking);
    }

    #[test]
    fn ranking_survives_noisy_number_lists(
        n in 0usize..20,
        numbers in prop::collection::vec(0usize..60, 0..40),
        sep in "[ ,;\\n]|, | and |\\]\\[",
    ) {
        let reply = numbers
            .iter()
            .map(|i| i.to_string())
            .collect::<Vec<_>>()
            .join(&sep);
        let ranking = parse_ranking(&reply, n);
        prop_assert!(is_permutation(&ranking, n));

        // In-range indices lead, in first-occurrence order.
        let mut expected_head = Vec::new();
        for &i in &numbers {
            if i < n && !expected_head.contains(&i) {
                expected_head.push(i);
            }
        }
        prop_assert_eq!(&ranking[..expected_head.len()], &expected_head[..]);
    }

    #[test]
    fn content_frequency_is_monotone_and_capped(extra in 0usize..20, base in 0usize..10) {
        let terms = vec!["moss".to_string()];
        let fewer = doc("Care Guide", &"moss ".repeat(base));
        let more = doc("Care Guide", &"moss ".repeat(base + extra));
        let fewer_score = score(&fewer, &terms);
        let more_score = score(&more, &terms);
        prop_assert!(more_score >= fewer_score);
        prop_assert!(more_score <= MAX_TERM_OCCURRENCES);
    }

    #[test]
    fn title_match_adds_title_weight(body in "[a-z ]{0,80}") {
        let terms = vec!["fern".to_string()];
        let without = doc("Plant Notes", &body);
        let with = doc("Fern Notes", &body);
        prop_assert_eq!(score(&with, &terms), score(&without, &terms) + TITLE_WEIGHT);
    }
}

#[test]
fn ranking_identity_for_empty_reply() {
    assert_eq!(parse_ranking("", 5), vec![0, 1, 2, 3, 4]);
}
