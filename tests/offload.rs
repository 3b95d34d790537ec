use bcrypt_core::offload::{hash_async, verify_async};
use bcrypt_core::{BcryptError, BcryptHasher};

#[tokio::test(flavor = "multi_thread")]
async fn hash_and_verify_off_thread() {
    let hasher = BcryptHasher::new(4).unwrap();
    let hash = hash_async(hasher, b"offloaded".to_vec()).await.unwrap();

    let stored = hash.to_string();
    assert!(verify_async(b"offloaded".to_vec(), stored.clone())
        .await
        .unwrap());
    assert!(!verify_async(b"other".to_vec(), stored).await.unwrap());
}

#[tokio::test]
async fn errors_pass_through() {
    let result = verify_async(b"pw".to_vec(), "garbage".to_string()).await;
    assert!(matches!(result, Err(BcryptError::MalformedHash(_))));
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_hashes_are_independent() {
    let hasher = BcryptHasher::new(4).unwrap();
    let tasks: Vec<_> = (0..8)
        .map(|i| tokio::spawn(hash_async(hasher, format!("password-{i}").into_bytes())))
        .collect();

    for (i, task) in tasks.into_iter().enumerate() {
        let hash = task.await.unwrap().unwrap();
        assert!(hash.verify(format!("password-{i}").as_bytes()));
    }
}
