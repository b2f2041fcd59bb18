//! Property-based tests for lossless parsing
//!
//! Documents are assembled from delimiter fragments, markup and noise, so most
//! generated inputs are malformed in some way: orphan closers, unclosed blocks, bad
//! JSON, truncated comments. None of that may cost a byte.

use proptest::prelude::*;
use wp_block_parser::blocks::formats::serialize_raw;
use wp_block_parser::blocks::testing::sample_registry;
use wp_block_parser::{parse, parse_raw, serialize, serialize_canonical};

fn fragment_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        // Noise, including partial comment syntax
        "[a-z <>/!{}\"-]{0,12}",
        // Well-formed delimiters
        Just("<!-- wp:group -->".to_string()),
        Just("<!-- /wp:group -->".to_string()),
        Just("<!-- wp:paragraph -->".to_string()),
        Just("<!-- /wp:paragraph -->".to_string()),
        Just("<!-- wp:quote {\"a\":{\"b\":1}} -->".to_string()),
        Just("<!-- /wp:core/quote -->".to_string()),
        "<!-- wp:[a-z]{1,6} /-->",
        "<!-- /wp:acme/[a-z]{1,4} -->",
        // Malformed delimiters
        Just("<!-- wp:paragraph {bad} -->".to_string()),
        Just("<!-- wp:Group -->".to_string()),
        Just("<!-- wp:group".to_string()),
        // Markup
        Just("<p>Hi</p>".to_string()),
        Just("<div class=\"wp-block-group\">".to_string()),
        Just("</div>".to_string()),
        Just("\n\n".to_string()),
        // A complete block in deprecated form
        Just(
            "<!-- wp:paragraph {\"dropCap\":true} --><p class=\"drop-cap\">Hi</p><!-- /wp:paragraph -->"
                .to_string()
        ),
    ]
}

fn document_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(fragment_strategy(), 0..24).prop_map(|parts| parts.join(""))
}

/// Documents made only of complete blocks and plain text, with the number of blocks.
fn well_formed_strategy() -> impl Strategy<Value = (String, usize)> {
    let fragment = prop_oneof![
        Just(("<!-- wp:paragraph --><p>Hi</p><!-- /wp:paragraph -->".to_string(), 1usize)),
        Just(("<!-- wp:separator /-->".to_string(), 1usize)),
        Just(("<!--\twp:core/nextpage\n/-->".to_string(), 1usize)),
        Just(("<!-- wp:image {\"id\":7} --><figure></figure><!-- /wp:image -->".to_string(), 1usize)),
        Just(("<!-- wp:acme/x {\"a\":{\"b\":1}}/-->".to_string(), 1usize)),
        Just(("\n\n".to_string(), 0usize)),
        "[a-z ]{1,6}".prop_map(|text| (text, 0usize)),
    ];
    prop::collection::vec(fragment, 1..12).prop_map(|parts| {
        let count: usize = parts.iter().map(|(_, n)| n).sum();
        let source: String = parts.into_iter().map(|(text, _)| text).collect();
        (source, count)
    })
}

fn nesting_strategy() -> impl Strategy<Value = String> {
    (0usize..1_500, 0usize..1_500).prop_map(|(opens, closes)| {
        format!(
            "{}<p>deep</p>{}",
            "<!-- wp:group -->".repeat(opens),
            "<!-- /wp:group -->".repeat(closes)
        )
    })
}

proptest! {
    #[test]
    fn test_raw_round_trip_any_string(input in any::<String>()) {
        prop_assert_eq!(serialize_raw(&parse_raw(&input)), input);
    }

    #[test]
    fn test_raw_round_trip_documents(input in document_strategy()) {
        prop_assert_eq!(serialize_raw(&parse_raw(&input)), input);
    }

    #[test]
    fn test_raw_round_trip_nesting(input in nesting_strategy()) {
        prop_assert_eq!(serialize_raw(&parse_raw(&input)), input);
    }
}

proptest! {
    #[test]
    fn test_well_formed_blocks_are_recognized((input, count) in well_formed_strategy()) {
        let nodes = parse_raw(&input);
        let named = nodes.iter().filter(|n| !n.is_freeform()).count();
        prop_assert_eq!(named, count);
    }

    #[test]
    fn test_balanced_nesting_builds_a_chain(depth in 1usize..200, leaves in 0usize..5) {
        let input = format!(
            "{}{}{}",
            "<!-- wp:group -->".repeat(depth),
            "<!-- wp:paragraph --><p>x</p><!-- /wp:paragraph -->".repeat(leaves),
            "<!-- /wp:group -->".repeat(depth)
        );
        let nodes = parse_raw(&input);
        prop_assert_eq!(nodes.len(), 1);

        let mut node = &nodes[0];
        for _ in 1..depth {
            prop_assert_eq!(node.name.as_deref(), Some("core/group"));
            prop_assert_eq!(node.inner_blocks.len(), 1);
            node = &node.inner_blocks[0];
        }
        prop_assert_eq!(node.name.as_deref(), Some("core/group"));
        prop_assert_eq!(node.inner_blocks.len(), leaves);
        prop_assert!(node
            .inner_blocks
            .iter()
            .all(|leaf| leaf.name.as_deref() == Some("core/paragraph")));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_resolved_round_trip(input in document_strategy()) {
        let registry = sample_registry();
        let blocks = parse(&input, &registry);
        prop_assert_eq!(serialize(&blocks), input);
    }

    #[test]
    fn test_parse_is_idempotent(input in document_strategy()) {
        let registry = sample_registry();
        let first = parse(&input, &registry);
        let second = parse(&serialize(&first), &registry);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn test_canonical_output_is_stable(input in document_strategy()) {
        let registry = sample_registry();
        let canonical = serialize_canonical(&parse(&input, &registry));
        let again = serialize_canonical(&parse(&canonical, &registry));
        prop_assert_eq!(again, canonical);
    }

    #[test]
    fn test_well_formed_blocks_resolve_by_name((input, count) in well_formed_strategy()) {
        let blocks = parse(&input, &sample_registry());
        prop_assert_eq!(blocks.iter().filter(|b| !b.is_freeform()).count(), count);
        prop_assert_eq!(serialize(&blocks), input);
    }

    #[test]
    fn test_invalid_blocks_keep_their_bytes(input in document_strategy()) {
        let registry = sample_registry();
        let blocks = parse(&input, &registry);
        for root in &blocks {
            for block in root.iter().filter(|b| !b.is_valid) {
                let chunks: String = block.inner_content.iter().flatten().map(String::as_str).collect();
                prop_assert_eq!(&block.original_content, &chunks);
                if block.inner_blocks.is_empty() {
                    prop_assert!(input.contains(block.original_content.as_str()));
                }
            }
        }
    }
}
