use crate::domain::{Direction, DocumentId};
use crate::registry::Registry;

/// Next id worth visiting from `current` in `direction`, or `None` at the
/// registry's edge.
///
/// The adjacent id is taken when a dataset owns it; otherwise navigation
/// jumps to the nearest dataset boundary in that direction. Tabulated gaps
/// and unlisted holes are both skipped, so repeated navigation visits only
/// ids a dataset owns and terminates without wrapping.
pub fn navigate(
    registry: &Registry,
    current: DocumentId,
    direction: Direction,
) -> Option<DocumentId> {
    if let Some(candidate) = current.step(direction) {
        if registry.dataset_for(candidate).is_some() {
            return Some(candidate);
        }
    }

    let boundary = match direction {
        Direction::Forward => registry.next_start_after(current),
        Direction::Backward => registry.prev_end_before(current),
    }?;

    registry.dataset_for(boundary).map(|_| boundary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjacent_id_within_a_dataset() {
        let registry = Registry::builtin();
        assert_eq!(
            navigate(&registry, DocumentId::new(100), Direction::Forward),
            Some(DocumentId::new(101))
        );
        assert_eq!(
            navigate(&registry, DocumentId::new(100), Direction::Backward),
            Some(DocumentId::new(99))
        );
    }

    #[test]
    fn crosses_contiguous_dataset_boundary() {
        let registry = Registry::builtin();
        // Dataset 1 ends at 3158 and dataset 2 starts right after.
        assert_eq!(
            navigate(&registry, DocumentId::new(3_158), Direction::Forward),
            Some(DocumentId::new(3_159))
        );
    }

    #[test]
    fn jumps_tabulated_gaps() {
        let registry = Registry::builtin();
        // 5587..5704 is a gap; forward from dataset 3's end lands on
        // dataset 4's start.
        assert_eq!(
            navigate(&registry, DocumentId::new(5_586), Direction::Forward),
            Some(DocumentId::new(5_705))
        );
        assert_eq!(
            navigate(&registry, DocumentId::new(5_705), Direction::Backward),
            Some(DocumentId::new(5_586))
        );
    }

    #[test]
    fn terminates_at_registry_edges() {
        let registry = Registry::builtin();
        let first = registry.datasets.first().unwrap().start_id;
        let last = registry.datasets.last().unwrap().end_id;
        assert_eq!(navigate(&registry, first, Direction::Backward), None);
        assert_eq!(navigate(&registry, last, Direction::Forward), None);
    }

    #[test]
    fn recovers_from_an_unowned_id() {
        let registry = Registry::builtin();
        // Inside the 8321..8408 gap: both directions land on real datasets.
        assert_eq!(
            navigate(&registry, DocumentId::new(8_350), Direction::Forward),
            Some(DocumentId::new(8_409))
        );
        assert_eq!(
            navigate(&registry, DocumentId::new(8_350), Direction::Backward),
            Some(DocumentId::new(8_320))
        );
    }
}
