use efta_locator::domain::{Direction, DocumentId};
use efta_locator::navigate::navigate;
use efta_locator::registry::Registry;

#[test]
fn forward_crosses_contiguous_boundaries() {
    let registry = Registry::builtin();
    assert_eq!(
        navigate(&registry, DocumentId::new(3_158), Direction::Forward),
        Some(DocumentId::new(3_159))
    );
}

#[test]
fn forward_jumps_the_tabulated_gap() {
    let registry = Registry::builtin();
    assert_eq!(
        navigate(&registry, DocumentId::new(5_586), Direction::Forward),
        Some(DocumentId::new(5_705))
    );
}

#[test]
fn backward_jumps_the_tabulated_gap() {
    let registry = Registry::builtin();
    assert_eq!(
        navigate(&registry, DocumentId::new(8_409), Direction::Backward),
        Some(DocumentId::new(8_320))
    );
}

#[test]
fn terminates_at_the_registry_edges() {
    let registry = Registry::builtin();
    let first = registry.datasets.first().unwrap().start_id;
    let last = registry.datasets.last().unwrap().end_id;
    assert_eq!(navigate(&registry, first, Direction::Backward), None);
    assert_eq!(navigate(&registry, last, Direction::Forward), None);
}

#[test]
fn repeated_navigation_visits_only_owned_ids() {
    let registry = Registry::builtin();
    let mut current = registry.datasets.first().unwrap().start_id;
    let mut hops = 0;
    while let Some(next) = navigate(&registry, current, Direction::Forward) {
        assert!(next > current, "navigation must make forward progress");
        assert!(
            registry.dataset_for(next).is_some(),
            "{next} is not owned by any dataset"
        );
        current = next;
        hops += 1;
        if hops > 50 {
            // Walking every id would take a million hops; the boundary
            // crossings are all exercised within the first datasets.
            break;
        }
    }
}

#[test]
fn walks_every_boundary_crossing() {
    let registry = Registry::builtin();
    // From each dataset's end, forward navigation lands on the next
    // dataset's start, regardless of the distance between them.
    for pair in registry.datasets.windows(2) {
        assert_eq!(
            navigate(&registry, pair[0].end_id, Direction::Forward),
            Some(pair[1].start_id)
        );
        assert_eq!(
            navigate(&registry, pair[1].start_id, Direction::Backward),
            Some(pair[0].end_id)
        );
    }
}
