use super::*;

#[test]
fn test_extract_single_block_trims_inner_text() {
    let raw = "noise ##start response## ANSWER ##end response## trailing";
    assert_eq!(extract(raw).expect("block should extract"), "ANSWER");
}

#[test]
fn test_extract_prefers_last_block() {
    let raw = "Format the response in the following way:\n\
               ##start response##\n[your explanation]\n##end response##\n\
               Sure!\n##start response##\nA mother is a female parent.\n##end response##";
    assert_eq!(
        extract(raw).expect("block should extract"),
        "A mother is a female parent."
    );
}

#[test]
fn test_extract_two_pairs_returns_second_only() {
    let raw = "##start response##first##end response## ##start response## second ##end response##";
    assert_eq!(extract(raw).expect("block should extract"), "second");
}

#[test]
fn test_extract_missing_end_marker_fails() {
    let err = extract("##start response## dangling").expect_err("should fail");
    assert_eq!(err, ExtractionError::MissingEndMarker { marker: END_MARKER });
}

#[test]
fn test_extract_missing_start_marker_fails() {
    let err = extract("text ##end response##").expect_err("should fail");
    assert_eq!(
        err,
        ExtractionError::MissingStartMarker {
            marker: START_MARKER
        }
    );
}

#[test]
fn test_extract_out_of_order_markers_yield_empty_text() {
    let raw = "##end response## stray ##start response## unterminated";
    assert_eq!(extract(raw).expect("markers are present"), "");
}

#[test]
fn test_extract_keeps_multibyte_content() {
    let raw = "##start response##\n🍌\n##end response##";
    assert_eq!(extract(raw).expect("block should extract"), "🍌");
}

#[test]
fn test_answer_block_instructions_put_markers_on_own_lines() {
    let block = answer_block_instructions("[your emoji]");
    let lines: Vec<&str> = block.lines().collect();
    assert_eq!(lines, vec![START_MARKER, "[your emoji]", END_MARKER]);
}
