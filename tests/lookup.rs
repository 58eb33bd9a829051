use assert_matches::assert_matches;

use efta_locator::domain::DocumentId;
use efta_locator::lookup::{Lookup, LookupStatus, classify, describe};
use efta_locator::registry::Registry;

#[test]
fn exactly_one_outcome_per_id() {
    let registry = Registry::builtin();
    let max = registry.max_end_id().value();
    for value in (0..=max + 100).step_by(991) {
        let outcome = classify(&registry, DocumentId::new(value));
        // status() is total: every id maps to exactly one of the variants.
        let status = outcome.status();
        match status {
            LookupStatus::Found => assert_matches!(outcome, Lookup::Found { .. }),
            LookupStatus::Gap => assert_matches!(outcome, Lookup::Gap { .. }),
            LookupStatus::AboveMaximum => assert_matches!(outcome, Lookup::AboveMaximum { .. }),
            LookupStatus::NotFound => assert_matches!(outcome, Lookup::NotFound),
            LookupStatus::InvalidFormat => panic!("classify never yields invalid-format"),
        }
    }
}

#[test]
fn found_reports_the_owning_dataset() {
    let registry = Registry::builtin();
    let outcome = classify(&registry, DocumentId::new(3_158));
    assert_matches!(outcome, Lookup::Found { dataset } if dataset.id == 1);

    let text = describe(DocumentId::new(3_158), &outcome);
    assert!(text.contains("Dataset 1"));
    assert!(text.contains("EFTA00000001 - EFTA00003158"));
    assert!(text.contains("3142 files"));
}

#[test]
fn gap_reports_candidates_before_any_fallthrough() {
    let registry = Registry::builtin();
    let outcome = classify(&registry, DocumentId::new(5_600));
    assert_matches!(
        outcome,
        Lookup::Gap { gap, fallback } if gap.candidates == vec![3, 4] && fallback.id == 3
    );

    let text = describe(DocumentId::new(5_600), &outcome);
    assert!(text.contains("may not exist"));
    assert!(text.contains("Dataset 3"));
}

#[test]
fn above_maximum_reports_the_catalog_ceiling() {
    let registry = Registry::builtin();
    let outcome = classify(&registry, DocumentId::new(10_000_000));
    assert_matches!(
        outcome,
        Lookup::AboveMaximum { max_id } if max_id == registry.max_end_id()
    );
}

#[test]
fn untabulated_holes_are_not_found() {
    let registry = Registry::builtin();
    // Id 0 precedes dataset 1 and no gap claims it.
    assert_matches!(classify(&registry, DocumentId::new(0)), Lookup::NotFound);
}
