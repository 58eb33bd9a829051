use assert_matches::assert_matches;

use efta_locator::domain::{Direction, DocumentId};
use efta_locator::error::LocatorError;

#[test]
fn parse_spec_examples() {
    assert_eq!(DocumentId::parse("EFTA00001234"), Some(DocumentId::new(1234)));
    assert_eq!(DocumentId::parse("1234"), Some(DocumentId::new(1234)));
    assert_eq!(DocumentId::parse("abc"), None);
    assert_eq!(DocumentId::parse(""), None);
}

#[test]
fn parse_round_trips_with_canonical_formatting() {
    for value in [0u64, 1, 9, 42, 1_234, 99_999, 3_158, 9_700, 99_999_999] {
        let id = DocumentId::new(value);
        assert_eq!(DocumentId::parse(&id.to_string()), Some(id));
    }
}

#[test]
fn canonical_form_is_eight_digit_padded() {
    assert_eq!(DocumentId::new(1).to_string(), "EFTA00000001");
    assert_eq!(DocumentId::new(99_999_999).to_string(), "EFTA99999999");
    // Past eight digits the full value is preserved, unpadded further.
    assert_eq!(DocumentId::new(100_000_000).to_string(), "EFTA100000000");
    assert_eq!(
        DocumentId::parse("EFTA100000000"),
        Some(DocumentId::new(100_000_000))
    );
}

#[test]
fn leading_zeros_are_insignificant() {
    assert_eq!(DocumentId::parse("EFTA0000000042"), Some(DocumentId::new(42)));
    assert_eq!(DocumentId::parse("000042"), Some(DocumentId::new(42)));
}

#[test]
fn rejects_signs_decimals_and_mixed_text() {
    assert_eq!(DocumentId::parse("+1234"), None);
    assert_eq!(DocumentId::parse("-1234"), None);
    assert_eq!(DocumentId::parse("12.34"), None);
    assert_eq!(DocumentId::parse("EFTA 1234"), None);
    assert_eq!(DocumentId::parse("id 1234"), None);
}

#[test]
fn from_str_reports_invalid_input() {
    let err = "not-an-id".parse::<DocumentId>().unwrap_err();
    assert_matches!(err, LocatorError::InvalidDocumentId(_));

    let id: DocumentId = "efta0099".parse().unwrap();
    assert_eq!(id.value(), 99);
}

#[test]
fn stepping_is_checked_at_zero() {
    assert_eq!(DocumentId::new(0).step(Direction::Backward), None);
    assert_eq!(
        DocumentId::new(5).step(Direction::Backward),
        Some(DocumentId::new(4))
    );
}
