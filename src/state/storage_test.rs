use super::*;

fn temp_path() -> PathBuf {
    std::env::temp_dir()
        .join(format!("blogdesk-{}", uuid::Uuid::new_v4()))
        .join("session.json")
}

#[test]
fn memory_storage_round_trips_and_clears() {
    let storage = MemoryTokenStorage::new();
    assert_eq!(storage.load().unwrap(), None);

    storage.store("tok1").unwrap();
    assert_eq!(storage.load().unwrap().as_deref(), Some("tok1"));

    storage.clear().unwrap();
    storage.clear().unwrap();
    assert_eq!(storage.load().unwrap(), None);
}

#[test]
fn memory_storage_with_token_starts_populated() {
    let storage = MemoryTokenStorage::with_token("seed");
    assert_eq!(storage.load().unwrap().as_deref(), Some("seed"));
}

#[test]
fn memory_storage_treats_empty_token_as_absent() {
    let storage = MemoryTokenStorage::new();
    storage.store("").unwrap();
    assert_eq!(storage.load().unwrap(), None);
    assert_eq!(MemoryTokenStorage::with_token("").load().unwrap(), None);
}

#[test]
fn file_storage_missing_file_is_absent() {
    let storage = FileTokenStorage::new(temp_path());
    assert_eq!(storage.load().unwrap(), None);
}

#[test]
fn file_storage_creates_parent_dirs_and_persists() {
    let path = temp_path();
    let storage = FileTokenStorage::new(&path);
    storage.store("tok1").unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(doc[TOKEN_KEY], "tok1");

    // A fresh handle on the same path sees the token, as after a restart.
    assert_eq!(FileTokenStorage::new(&path).load().unwrap().as_deref(), Some("tok1"));

    storage.store("tok2").unwrap();
    assert_eq!(storage.load().unwrap().as_deref(), Some("tok2"));

    let _ = std::fs::remove_dir_all(path.parent().unwrap());
}

#[test]
fn file_storage_clear_removes_document_and_is_idempotent() {
    let path = temp_path();
    let storage = FileTokenStorage::new(&path);
    storage.store("tok1").unwrap();

    storage.clear().unwrap();
    assert!(!path.exists());
    storage.clear().unwrap();
    assert_eq!(storage.load().unwrap(), None);

    let _ = std::fs::remove_dir_all(path.parent().unwrap());
}

#[test]
fn file_storage_malformed_document_is_error() {
    let path = temp_path();
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "not json").unwrap();

    let storage = FileTokenStorage::new(&path);
    assert!(matches!(storage.load(), Err(StorageError::Malformed(_))));

    let _ = std::fs::remove_dir_all(path.parent().unwrap());
}
