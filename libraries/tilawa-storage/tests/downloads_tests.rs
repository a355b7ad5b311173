//! Downloads slice and `SqliteTrackStore` tests


use tilawa_core::{
    group_downloads_by_reciter, Catalog, OfflineTrackStore, ReciterId, TrackKey,
};
use tilawa_storage::{downloads, SqliteTrackStore};
use test_helpers::{stored_track, TestDb};

#[tokio::test]
async fn test_put_then_get_returns_payload() {
    let db = TestDb::new().await;
    let track = stored_track("alafasy", 2, b"ID3-fake-audio");

    downloads::put(db.pool(), &track).await.unwrap();

    let fetched = downloads::get(db.pool(), &track.key).await.unwrap().unwrap();
    assert_eq!(fetched.key.as_str(), "alafasy_2");
    assert_eq!(fetched.chapter_number, 2);
    assert_eq!(fetched.chapter_name, "البقرة");
    assert_eq!(&fetched.payload[..], b"ID3-fake-audio");
    assert_eq!(fetched.downloaded_at, track.downloaded_at);
}

#[tokio::test]
async fn test_get_missing_key_is_none() {
    let db = TestDb::new().await;
    let key = TrackKey::for_track(&ReciterId::new("ghamdi"), 3);
    assert!(downloads::get(db.pool(), &key).await.unwrap().is_none());
}

#[tokio::test]
async fn test_put_replaces_existing_entry() {
    let db = TestDb::new().await;

    downloads::put(db.pool(), &stored_track("maher", 36, b"old"))
        .await
        .unwrap();
    downloads::put(db.pool(), &stored_track("maher", 36, b"newer payload"))
        .await
        .unwrap();

    assert_eq!(downloads::count(db.pool()).await.unwrap(), 1);
    let key = TrackKey::for_track(&ReciterId::new("maher"), 36);
    let fetched = downloads::get(db.pool(), &key).await.unwrap().unwrap();
    assert_eq!(&fetched.payload[..], b"newer payload");
}

#[tokio::test]
async fn test_delete_reports_whether_removed() {
    let db = TestDb::new().await;
    let track = stored_track("dosari", 67, b"abc");
    downloads::put(db.pool(), &track).await.unwrap();

    assert!(downloads::delete(db.pool(), &track.key).await.unwrap());
    assert!(!downloads::delete(db.pool(), &track.key).await.unwrap());
    assert!(downloads::get(db.pool(), &track.key).await.unwrap().is_none());
}

#[tokio::test]
async fn test_list_reports_sizes_in_order() {
    let db = TestDb::new().await;
    downloads::put(db.pool(), &stored_track("ghamdi", 18, b"12345"))
        .await
        .unwrap();
    downloads::put(db.pool(), &stored_track("alafasy", 112, b"12"))
        .await
        .unwrap();
    downloads::put(db.pool(), &stored_track("alafasy", 1, b"1234"))
        .await
        .unwrap();

    let listing = downloads::list(db.pool()).await.unwrap();
    let keys: Vec<&str> = listing.iter().map(|t| t.key.as_str()).collect();
    assert_eq!(keys, vec!["alafasy_1", "alafasy_112", "ghamdi_18"]);
    assert_eq!(listing[0].size_bytes, 4);
    assert_eq!(listing[2].size_bytes, 5);
}

#[tokio::test]
async fn test_store_adapter_and_grouping() {
    let db = TestDb::new().await;
    let store = SqliteTrackStore::new(db.pool().clone());

    store.put(stored_track("qatami", 55, b"x")).await.unwrap();
    store.put(stored_track("alafasy", 67, b"y")).await.unwrap();
    store.put(stored_track("alafasy", 18, b"z")).await.unwrap();

    let catalog = Catalog::builtin().unwrap();
    let groups = group_downloads_by_reciter(&catalog, store.list().await.unwrap());

    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].reciter.id.as_str(), "alafasy");
    let chapters: Vec<u16> = groups[0].tracks.iter().map(|t| t.chapter_number).collect();
    assert_eq!(chapters, vec![18, 67]);
    assert_eq!(groups[1].reciter.id.as_str(), "qatami");

    let key = TrackKey::for_track(&ReciterId::new("qatami"), 55);
    assert!(store.delete(&key).await.unwrap());
    assert!(store.get(&key).await.unwrap().is_none());
}
