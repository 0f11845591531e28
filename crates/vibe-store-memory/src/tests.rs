//! Tests for `MemoryStore`.

use vibe_core::{rating::RatingValue, store::RatingStore};

use crate::{Error, MemoryStore};

fn score(v: i64) -> RatingValue {
  RatingValue::new(v).expect("valid score")
}

// ─── Recording ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_assigns_sequential_ids_from_one() {
  let s = MemoryStore::new();

  let a = s.create_rating(score(7), "a".into()).await.unwrap();
  let b = s.create_rating(score(5), "b".into()).await.unwrap();
  let c = s.create_rating(score(9), "c".into()).await.unwrap();

  assert_eq!((a.id, b.id, c.id), (1, 2, 3));
  assert_eq!(a.rating.get(), 7);
  assert_eq!(a.session_id, "a");
}

#[tokio::test]
async fn get_ratings_in_insertion_order() {
  let s = MemoryStore::new();
  assert!(s.get_ratings().await.unwrap().is_empty());

  s.create_rating(score(3), "x".into()).await.unwrap();
  s.create_rating(score(8), "y".into()).await.unwrap();

  let all = s.get_ratings().await.unwrap();
  assert_eq!(all.len(), 2);
  assert_eq!(all[0].session_id, "x");
  assert_eq!(all[1].session_id, "y");
  assert!(all[0].recorded_at <= all[1].recorded_at);
}

#[tokio::test]
async fn store_does_not_deduplicate_sessions() {
  // One-per-session is the service's rule, not the store's.
  let s = MemoryStore::new();
  s.create_rating(score(2), "same".into()).await.unwrap();
  s.create_rating(score(4), "same".into()).await.unwrap();

  assert_eq!(s.len().await, 2);
  assert!(s.has_user_rated("same").await.unwrap());
}

#[tokio::test]
async fn exhausted_ids_store_nothing() {
  let s = MemoryStore::with_next_id(u64::MAX);
  let err = s.create_rating(score(5), "a".into()).await.unwrap_err();
  assert!(matches!(err, Error::IdsExhausted));
  assert!(s.is_empty().await);
  assert!(!s.has_user_rated("a").await.unwrap());
}

// ─── Session lookups ─────────────────────────────────────────────────────────

#[tokio::test]
async fn has_user_rated_matches_exact_session() {
  let s = MemoryStore::new();
  assert!(!s.has_user_rated("abc").await.unwrap());

  s.create_rating(score(6), "abc".into()).await.unwrap();

  assert!(s.has_user_rated("abc").await.unwrap());
  assert!(!s.has_user_rated("ABC").await.unwrap());
  assert!(!s.has_user_rated("ab").await.unwrap());
  assert!(!s.has_user_rated("").await.unwrap());
}

// ─── Stats ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn stats_on_empty_store() {
  let stats = MemoryStore::new().get_rating_stats().await.unwrap();
  assert_eq!(stats.total, 0);
  assert_eq!(stats.average, 0.0);
}

#[tokio::test]
async fn stats_track_every_insert() {
  let s = MemoryStore::new();

  s.create_rating(score(7), "a".into()).await.unwrap();
  let stats = s.get_rating_stats().await.unwrap();
  assert_eq!((stats.total, stats.average), (1, 7.0));

  s.create_rating(score(5), "b".into()).await.unwrap();
  let stats = s.get_rating_stats().await.unwrap();
  assert_eq!((stats.total, stats.average), (2, 6.0));

  s.create_rating(score(10), "c".into()).await.unwrap();
  s.create_rating(score(3), "d".into()).await.unwrap();
  // 25 / 4 = 6.25
  let stats = s.get_rating_stats().await.unwrap();
  assert_eq!((stats.total, stats.average), (4, 6.3));
}

// ─── Concurrency ─────────────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creates_never_share_an_id() {
  let s = MemoryStore::new();

  let handles: Vec<_> = (0..64)
    .map(|i| {
      let s = s.clone();
      tokio::spawn(async move {
        s.create_rating(score(i % 10 + 1), format!("session-{i}"))
          .await
          .unwrap()
          .id
      })
    })
    .collect();

  let mut ids = Vec::new();
  for h in handles {
    ids.push(h.await.unwrap());
  }
  ids.sort_unstable();
  assert_eq!(ids, (1..=64).collect::<Vec<u64>>());

  let all = s.get_ratings().await.unwrap();
  assert!(all.windows(2).all(|w| w[0].id < w[1].id));
}
