use rockfan_core::{FilePreferences, PreferencesError, PreferencesStore};
use tempfile::TempDir;

#[tokio::test]
async fn test_missing_file_reads_defaults() {
    let dir = TempDir::new().unwrap();
    let store = FilePreferences::new(dir.path().join("prefs.json"));

    let preferences = store.read().await.unwrap();

    assert!(!preferences.has_bands());
    assert!(!preferences.onboarding_completed);
    assert!(!store.path().exists());
}

#[tokio::test]
async fn test_save_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("prefs.json");

    FilePreferences::new(&path)
        .save_bands(vec!["Rush".into(), "Muse".into()])
        .await
        .unwrap();

    let reopened = FilePreferences::new(&path);
    let bands: Vec<_> = reopened.selected_bands().await.unwrap().into_iter().collect();

    assert_eq!(bands, vec!["Muse", "Rush"]);
    assert!(reopened.onboarding_completed().await.unwrap());
    assert!(!path.with_extension("json.tmp").exists());
}

#[tokio::test]
async fn test_save_replaces_selection() {
    let dir = TempDir::new().unwrap();
    let store = FilePreferences::new(dir.path().join("prefs.json"));

    store.save_bands(vec!["Rush".into()]).await.unwrap();
    let preferences = store.save_bands(vec!["Queen".into()]).await.unwrap();

    assert_eq!(preferences.selected_bands.len(), 1);
    assert!(preferences.selected_bands.contains("Queen"));
    assert_eq!(store.read().await.unwrap(), preferences);
}

#[tokio::test]
async fn test_corrupt_file_is_reported() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("prefs.json");
    std::fs::write(&path, "not json").unwrap();

    let err = FilePreferences::new(&path).read().await.unwrap_err();

    assert!(matches!(err, PreferencesError::Decode { .. }));
}
