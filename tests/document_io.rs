use pretty_assertions::assert_eq;

use stemma::family::{
    ImportError, Sex, export_dataset, import_dataset, read_dataset_file, sample_dataset,
    write_dataset_file,
};
use stemma::settings::LayoutSettings;
use stemma::storage::Storage;

#[test]
fn empty_collections_import_as_empty_store() {
    let dataset =
        import_dataset(r#"{"people": [], "unions": [], "childLinks": []}"#).expect("valid");
    assert!(dataset.is_empty());

    let nulls =
        import_dataset(r#"{"people": null, "unions": [], "childLinks": null}"#).expect("valid");
    assert!(nulls.is_empty());
}

#[test]
fn missing_key_is_rejected() {
    let error = import_dataset(r#"{"people": [], "unions": []}"#).unwrap_err();
    assert!(matches!(error, ImportError::MissingKey("childLinks")));
}

#[test]
fn malformed_documents_are_rejected() {
    assert!(matches!(
        import_dataset("{ not json"),
        Err(ImportError::Malformed(_))
    ));
    assert!(matches!(import_dataset("[]"), Err(ImportError::NotAnObject)));
    assert!(matches!(
        import_dataset(r#"{"people": 3, "unions": [], "childLinks": []}"#),
        Err(ImportError::InvalidCollection { key: "people", .. })
    ));
}

#[test]
fn entries_are_read_leniently() {
    let raw = r#"{
        "people": [
            {"id": "p1", "name": "One", "sex": "F"},
            {"id": "p2", "sex": "x"},
            {"id": "p3", "name": "Three", "sex": null}
        ],
        "unions": [{"id": "u", "partnerA": "p1", "partnerB": "ghost"}],
        "childLinks": [{"unionId": "u", "childId": "p3"}]
    }"#;
    let dataset = import_dataset(raw).expect("lenient import");

    assert_eq!(dataset.people[0].sex, Sex::Female);
    assert_eq!(dataset.people[1].sex, Sex::Unknown);
    assert_eq!(dataset.people[1].name, "");
    assert_eq!(dataset.people[2].sex, Sex::Unknown);
    assert_eq!(dataset.unions[0].partner_b, "ghost");
    assert_eq!(dataset.unions[0].notes, "");
}

#[test]
fn export_then_import_preserves_the_store() {
    let dataset = sample_dataset().expect("bundled sample parses");
    let exported = export_dataset(&dataset).expect("serializes");
    assert!(exported.contains("\"childLinks\""));
    assert!(exported.contains("\"partnerA\""));

    let restored = import_dataset(&exported).expect("re-imports");
    assert_eq!(restored, dataset);
}

#[test]
fn failed_file_import_reports_the_path() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("broken.json");
    std::fs::write(&path, r#"{"people": []}"#).expect("write fixture");

    let error = read_dataset_file(&path).unwrap_err();
    let message = format!("{error:#}");
    assert!(message.contains("broken.json"), "{message}");
    assert!(message.contains("unions"), "{message}");
}

#[test]
fn dataset_file_round_trip_creates_parent_dirs() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("nested").join("tree.json");
    let dataset = sample_dataset().expect("bundled sample parses");

    write_dataset_file(&path, &dataset).expect("write");
    assert_eq!(read_dataset_file(&path).expect("read"), dataset);
}

#[test]
fn storage_keeps_dataset_and_settings() {
    let dir = tempfile::tempdir().expect("temp dir");
    let storage = Storage::new(dir.path().join("stemma"));

    assert!(storage.load_dataset().expect("absent is fine").is_none());
    assert!(storage.load_settings().expect("absent is fine").is_none());

    let dataset = sample_dataset().expect("bundled sample parses");
    storage.save_dataset(&dataset).expect("save dataset");
    assert_eq!(storage.load_dataset().expect("load"), Some(dataset));

    let settings = LayoutSettings {
        show_notes: true,
        link_distance: 120.0,
        lock_on_drag_end: true,
        ..LayoutSettings::default()
    };
    storage.save_settings(&settings).expect("save settings");
    assert_eq!(storage.load_settings().expect("load"), Some(settings));
}

#[test]
fn stored_settings_are_sanitized_on_load() {
    let dir = tempfile::tempdir().expect("temp dir");
    let storage = Storage::new(dir.path());
    std::fs::write(
        storage.settings_path(),
        r#"{"linkDistance": 9000, "charge": 50, "showNotes": true}"#,
    )
    .expect("write fixture");

    let settings = storage.load_settings().expect("parses").expect("present");
    assert_eq!(settings.link_distance, 400.0);
    assert_eq!(settings.charge, 0.0);
    assert!(settings.show_notes);
    assert!(settings.show_labels);
}
