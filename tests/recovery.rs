//! Malformed input: every case parses, keeps its bytes, and reports what happened

use rstest::rstest;
use wp_block_parser::blocks::ast::DiagnosticKind;
use wp_block_parser::blocks::testing::{assert_blocks, sample_registry, TextMatch};
use wp_block_parser::{parse, serialize, BlockParser, Document};

fn parse_document(source: &str) -> Document {
    BlockParser::new(&sample_registry()).parse_document(source)
}

fn kinds(document: &Document) -> Vec<DiagnosticKind> {
    document.diagnostics.iter().map(|d| d.kind).collect()
}

#[test]
fn test_invalid_json_delimiter_is_text() {
    let source = "<!-- wp:paragraph {bad} --><p>x</p><!-- /wp:paragraph -->";
    let document = parse_document(source);

    assert_blocks(&document.blocks)
        .count(1)
        .block(0, |b| {
            b.freeform().content_is(source);
        });
    assert_eq!(
        kinds(&document),
        vec![DiagnosticKind::InvalidDelimiterJson, DiagnosticKind::OrphanCloser]
    );
}

#[test]
fn test_skipped_frame_becomes_text_of_outer_block() {
    let source = "<!-- wp:group --><div class=\"wp-block-group\"><!-- wp:paragraph --><p>x</p></div><!-- /wp:group -->";
    let document = parse_document(source);

    assert_blocks(&document.blocks).count(1).block(0, |group| {
        group
            .name("core/group")
            .child_count(0)
            .invalid()
            .content(TextMatch::Contains("<!-- wp:paragraph --><p>x</p>".into()));
    });
    assert!(kinds(&document).contains(&DiagnosticKind::UnclosedBlock));
    assert_eq!(serialize(&document.blocks), source);
}

#[test]
fn test_self_closer_followed_by_closer() {
    let source = "<!-- wp:nextpage /--><!-- /wp:nextpage -->";
    let document = parse_document(source);

    assert_blocks(&document.blocks)
        .count(2)
        .block(0, |b| {
            b.name("core/nextpage").valid().child_count(0);
        })
        .block(1, |b| {
            b.freeform().content_is("<!-- /wp:nextpage -->");
        });
    assert_eq!(kinds(&document), vec![DiagnosticKind::OrphanCloser]);
}

#[test]
fn test_unclosed_block_runs_to_end_of_input() {
    let source = "<!-- wp:paragraph --><p>never closed</p>";
    let document = parse_document(source);

    assert_blocks(&document.blocks).count(1).block(0, |b| {
        b.name("core/paragraph")
            .valid()
            .content_is("<p>never closed</p>");
    });
    assert_eq!(document.blocks[0].delimiters.closer, None);
    assert_eq!(kinds(&document), vec![DiagnosticKind::UnclosedBlock]);
    assert_eq!(serialize(&document.blocks), source);
}

#[rstest]
#[case::empty("")]
#[case::truncated_comment("<!-- wp:paragraph")]
#[case::truncated_self_closer("<p>a</p><!-- wp:separator /")]
#[case::uppercase_name("<!-- wp:Paragraph --><p>x</p><!-- /wp:Paragraph -->")]
#[case::missing_space("<!--wp:paragraph--><p>x</p>")]
#[case::plain_comment("<!-- just a comment -->")]
#[case::stray_closer("<!-- /wp:group -->")]
#[case::nested_json("<!-- wp:image {\"a\":{\"b\":{\"c\":1}}} /-->")]
#[case::multibyte("<p>héllo ✓</p><!-- wp:quote -->“quoted”")]
fn test_never_fails_and_round_trips(#[case] source: &str) {
    let blocks = parse(source, &sample_registry());
    assert_eq!(serialize(&blocks), source);
}

#[test]
fn test_text_only_input_is_one_freeform_block() {
    let blocks = parse("<!-- wp:Paragraph --><p>x</p>", &sample_registry());
    assert_blocks(&blocks).count(1).block(0, |b| {
        b.freeform().valid();
    });
}

#[test]
fn test_deep_nesting_is_bounded() {
    let depth = 10_000;
    let source = format!(
        "{}{}",
        "<!-- wp:group -->".repeat(depth),
        "<!-- /wp:group -->".repeat(depth)
    );
    let document = parse_document(&source);

    assert_eq!(document.blocks.len(), 2);
    assert_eq!(document.blocks[0].iter().count(), 256);
    assert!(document.blocks[1].is_freeform());
    assert!(kinds(&document).contains(&DiagnosticKind::DepthLimitExceeded));
    assert_eq!(serialize(&document.blocks), source);
}

#[test]
fn test_invalid_blocks_keep_source_bytes() {
    let source = "a<!-- wp:list --><ol><li>x</li></ul><!-- /wp:list -->b<!-- wp:acme/x -->y<!-- /wp:acme/x -->";
    let document = parse_document(source);

    for block in document.invalid_blocks() {
        assert!(
            source.contains(&block.original_content),
            "{:?} lost its content",
            block.name
        );
    }
    assert_eq!(document.invalid_blocks().count(), 2);
}
