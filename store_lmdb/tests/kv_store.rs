use agora_store::{CacheStore, KvStore, ScanOrder};
use agora_store_lmdb::LmdbEnvironment;

fn open_env() -> (tempfile::TempDir, LmdbEnvironment) {
    let dir = tempfile::tempdir().unwrap();
    let env = LmdbEnvironment::open(dir.path(), 16 * 1024 * 1024).unwrap();
    (dir, env)
}

#[test]
fn test_put_get_delete() {
    let (_dir, env) = open_env();
    let store = env.kv_store();
    store.put(b"key", b"value").unwrap();
    assert_eq!(store.get(b"key").unwrap(), Some(b"value".to_vec()));
    store.delete(b"key").unwrap();
    assert_eq!(store.get(b"key").unwrap(), None);
    // deleting an absent key is fine
    store.delete(b"key").unwrap();
}

#[test]
fn test_prefix_scan_both_directions() {
    let (_dir, env) = open_env();
    let store = env.kv_store();
    for id in [3u64, 1, 2] {
        let mut key = b"q".to_vec();
        key.extend_from_slice(&id.to_be_bytes());
        store.put(&key, &id.to_be_bytes()).unwrap();
    }
    store.put(b"r", b"other").unwrap();

    let ids = |pairs: Vec<(Vec<u8>, Vec<u8>)>| -> Vec<u8> {
        pairs.into_iter().map(|(k, _)| k[8]).collect()
    };
    assert_eq!(ids(store.scan_prefix(b"q", ScanOrder::Ascending).unwrap()), vec![1, 2, 3]);
    assert_eq!(ids(store.scan_prefix(b"q", ScanOrder::Descending).unwrap()), vec![3, 2, 1]);

    let (first, _) = store
        .first_in_prefix(b"q", ScanOrder::Ascending)
        .unwrap()
        .unwrap();
    assert_eq!(first[8], 1);
    assert!(store.first_in_prefix(b"z", ScanOrder::Ascending).unwrap().is_none());
}

#[test]
fn test_cache_commit_lands_in_lmdb() {
    let (_dir, env) = open_env();
    let store = env.kv_store();
    store.put(b"a", b"1").unwrap();

    let cache = CacheStore::new(&store);
    cache.put(b"b", b"2").unwrap();
    cache.delete(b"a").unwrap();
    drop(cache);
    assert_eq!(store.get(b"a").unwrap(), Some(b"1".to_vec()));
    assert_eq!(store.get(b"b").unwrap(), None);

    let cache = CacheStore::new(&store);
    cache.put(b"b", b"2").unwrap();
    cache.delete(b"a").unwrap();
    cache.commit().unwrap();
    assert_eq!(store.get(b"a").unwrap(), None);
    assert_eq!(store.get(b"b").unwrap(), Some(b"2".to_vec()));
}

#[test]
fn test_state_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    {
        let env = LmdbEnvironment::open(dir.path(), 16 * 1024 * 1024).unwrap();
        env.kv_store().put(b"persist", b"yes").unwrap();
        env.sync().unwrap();
    }
    let env = LmdbEnvironment::open(dir.path(), 16 * 1024 * 1024).unwrap();
    assert_eq!(env.kv_store().get(b"persist").unwrap(), Some(b"yes".to_vec()));
}
