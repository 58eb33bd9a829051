use assert_matches::assert_matches;

use efta_locator::domain::DocumentId;
use efta_locator::error::LocatorError;
use efta_locator::registry::Registry;

#[test]
fn builtin_table_passes_validation() {
    Registry::builtin().validate().unwrap();
}

#[test]
fn every_owned_id_has_exactly_one_owner() {
    let registry = Registry::builtin();
    let max = registry.max_end_id().value();
    // Sample across the whole id space rather than walking a million ids.
    for value in (1..=max).step_by(997) {
        let id = DocumentId::new(value);
        let owners = registry
            .datasets
            .iter()
            .filter(|dataset| dataset.contains(id))
            .count();
        assert!(owners <= 1, "id {id} owned by {owners} datasets");
        if owners == 1 {
            let resolved = registry.dataset_for(id).unwrap();
            assert!(resolved.contains(id));
        }
    }
}

#[test]
fn boundary_ids_resolve_to_their_datasets() {
    let registry = Registry::builtin();
    assert_eq!(registry.dataset_for(DocumentId::new(3_158)).unwrap().id, 1);
    assert_eq!(registry.dataset_for(DocumentId::new(3_159)).unwrap().id, 2);
    assert_eq!(registry.dataset_for(DocumentId::new(5_705)).unwrap().id, 4);
}

#[test]
fn gap_ids_fall_back_to_the_first_candidate() {
    let registry = Registry::builtin();
    for value in [5_587u64, 5_600, 5_704] {
        let resolution = registry.resolve(DocumentId::new(value)).unwrap();
        assert_eq!(resolution.dataset.id, 3);
        let gap = resolution.via_gap.unwrap();
        assert_eq!(gap.candidates, vec![3, 4]);
    }
}

#[test]
fn ids_past_the_catalog_do_not_resolve() {
    let registry = Registry::builtin();
    let past = DocumentId::new(registry.max_end_id().value() + 1);
    assert!(registry.resolve(past).is_none());
}

#[test]
fn loaded_registry_with_overlap_is_rejected() {
    let json = r#"{
        "datasets": [
            {"id": 1, "name": "Dataset 1", "startId": 1, "endId": 100,
             "fileCount": 10, "sizeLabel": "1 MB",
             "externalUrl": "https://example.test/1", "folderName": "DataSet 1"},
            {"id": 2, "name": "Dataset 2", "startId": 90, "endId": 200,
             "fileCount": 10, "sizeLabel": "1 MB",
             "externalUrl": "https://example.test/2", "folderName": "DataSet 2"}
        ],
        "gaps": []
    }"#;
    let registry: Registry = serde_json::from_str(json).unwrap();
    let err = registry.validate().unwrap_err();
    assert_matches!(err, LocatorError::RegistryInvalid(_));
}

#[test]
fn loaded_registry_with_unknown_gap_candidate_is_rejected() {
    let json = r#"{
        "datasets": [
            {"id": 1, "name": "Dataset 1", "startId": 1, "endId": 100,
             "fileCount": 10, "sizeLabel": "1 MB",
             "externalUrl": "https://example.test/1", "folderName": "DataSet 1"}
        ],
        "gaps": [
            {"start": 101, "end": 110, "candidates": [7]}
        ]
    }"#;
    let registry: Registry = serde_json::from_str(json).unwrap();
    let err = registry.validate().unwrap_err();
    assert_matches!(err, LocatorError::RegistryInvalid(_));
}

#[test]
fn loaded_registry_with_gap_over_dataset_is_rejected() {
    let json = r#"{
        "datasets": [
            {"id": 1, "name": "Dataset 1", "startId": 1, "endId": 100,
             "fileCount": 10, "sizeLabel": "1 MB",
             "externalUrl": "https://example.test/1", "folderName": "DataSet 1"}
        ],
        "gaps": [
            {"start": 50, "end": 110, "candidates": [1]}
        ]
    }"#;
    let registry: Registry = serde_json::from_str(json).unwrap();
    assert_matches!(
        registry.validate().unwrap_err(),
        LocatorError::RegistryInvalid(_)
    );
}

#[test]
fn boundary_helpers_ignore_gaps() {
    let registry = Registry::builtin();
    assert_eq!(
        registry.next_start_after(DocumentId::new(5_586)),
        Some(DocumentId::new(5_705))
    );
    assert_eq!(
        registry.prev_end_before(DocumentId::new(5_705)),
        Some(DocumentId::new(5_586))
    );
    assert_eq!(registry.next_start_after(registry.max_end_id()), None);
    assert_eq!(registry.prev_end_before(DocumentId::new(1)), None);
}
