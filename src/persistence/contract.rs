//! Behavioral tests every [`NoteStore`] backend must pass.
//!
//! Each check is written once against `&dyn NoteStore` and instantiated for
//! both backends at the bottom of the file.

#![allow(clippy::panic)]

use std::time::Duration;

use super::{MemoryStore, NoteStore, SqliteStore, StoreError};
use crate::domain::{Note, NoteId, User, UserId};

async fn save_user(store: &dyn NoteStore, username: &str) -> User {
    let Ok(user) = store.save_user(User::new(username, "hash")).await else {
        panic!("save_user({username}) failed");
    };
    user
}

async fn save_note(store: &dyn NoteStore, owner: &UserId, title: &str) -> Note {
    let Ok(note) = store
        .save_note(Note::new(owner.clone(), title, None))
        .await
    else {
        panic!("save_note({title}) failed");
    };
    note
}

async fn pause() {
    tokio::time::sleep(Duration::from_millis(5)).await;
}

async fn username_lookup_ignores_case(store: &dyn NoteStore) {
    let user = save_user(store, "MixedCase").await;
    for variant in ["MixedCase", "mixedcase", "MIXEDCASE", "mIxEdCaSe"] {
        let Ok(Some(found)) = store.get_user_by_username(variant).await else {
            panic!("lookup by {variant} found nothing");
        };
        assert_eq!(found.id, user.id);
        assert_eq!(found.username, "MixedCase");
    }
    let Ok(by_id) = store.get_user_by_id(&user.id).await else {
        panic!("lookup by id failed");
    };
    assert_eq!(by_id, Some(user));
}

async fn case_only_username_collision_conflicts(store: &dyn NoteStore) {
    save_user(store, "alice").await;
    let result = store.save_user(User::new("ALICE", "other-hash")).await;
    assert!(matches!(result, Err(StoreError::Conflict(_))));

    let Ok(Some(kept)) = store.get_user_by_username("alice").await else {
        panic!("original user lost");
    };
    assert_eq!(kept.password_hash, "hash");
}

async fn non_ascii_letters_are_not_folded(store: &dyn NoteStore) {
    let emile = save_user(store, "Émile").await;

    let Ok(Some(found)) = store.get_user_by_username("ÉMILE").await else {
        panic!("ASCII case variant not found");
    };
    assert_eq!(found.id, emile.id);
    assert!(matches!(store.get_user_by_username("émile").await, Ok(None)));

    assert!(matches!(
        store.save_user(User::new("émile", "hash")).await,
        Ok(_)
    ));
    assert!(matches!(
        store.save_user(User::new("ÉMILE", "hash")).await,
        Err(StoreError::Conflict(_))
    ));
}

async fn concurrent_case_variants_admit_one(store: &dyn NoteStore) {
    for round in 0..25 {
        let lower = format!("racer{round}");
        let upper = lower.to_uppercase();
        let (first, second) = tokio::join!(
            store.save_user(User::new(lower.as_str(), "hash")),
            store.save_user(User::new(upper.as_str(), "hash")),
        );

        let saved = [&first, &second].iter().filter(|r| r.is_ok()).count();
        assert_eq!(saved, 1, "round {round}: {first:?} / {second:?}");
        assert!(
            matches!(first, Err(StoreError::Conflict(_)))
                || matches!(second, Err(StoreError::Conflict(_)))
        );
    }
}

async fn duplicate_note_id_conflicts(store: &dyn NoteStore) {
    let owner = UserId::new();
    let note = save_note(store, &owner, "first").await;
    let mut copy = note.clone();
    copy.title = "second".to_string();

    let result = store.save_note(copy).await;
    assert!(matches!(result, Err(StoreError::Conflict(_))));

    let Ok(Some(stored)) = store.get_note_by_id(&note.id).await else {
        panic!("note lost");
    };
    assert_eq!(stored.title, "first");
}

async fn update_then_get_reflects_change(store: &dyn NoteStore) {
    let owner = UserId::new();
    let note = save_note(store, &owner, "draft").await;
    pause().await;

    let Ok(Some(updated)) = store.update_note(&note.id, "final", "body").await else {
        panic!("update failed");
    };
    let Ok(Some(fetched)) = store.get_note_by_id(&note.id).await else {
        panic!("note missing after update");
    };
    assert_eq!(updated, fetched);
    assert_eq!(fetched.title, "final");
    assert_eq!(fetched.content, "body");
    assert_eq!(fetched.created_at, note.created_at);
    assert!(fetched.updated_at > fetched.created_at);
}

async fn update_unknown_note_is_absent(store: &dyn NoteStore) {
    let result = store.update_note(&NoteId::new(), "t", "c").await;
    assert!(matches!(result, Ok(None)));
}

async fn delete_is_idempotent(store: &dyn NoteStore) {
    let note = save_note(store, &UserId::new(), "gone soon").await;
    assert!(matches!(store.delete_note(&note.id).await, Ok(true)));
    assert!(matches!(store.delete_note(&note.id).await, Ok(false)));
    assert!(matches!(store.get_note_by_id(&note.id).await, Ok(None)));
}

async fn notes_listed_most_recent_first(store: &dyn NoteStore) {
    let owner = UserId::new();
    let other = UserId::new();
    let a = save_note(store, &owner, "a").await;
    pause().await;
    let b = save_note(store, &owner, "b").await;
    pause().await;
    let c = save_note(store, &owner, "c").await;
    pause().await;
    save_note(store, &other, "not mine").await;
    pause().await;
    let Ok(Some(_)) = store.update_note(&a.id, "a2", "").await else {
        panic!("update failed");
    };

    let Ok(notes) = store.get_notes_by_user_id(&owner).await else {
        panic!("list failed");
    };
    let ids: Vec<&NoteId> = notes.iter().map(|n| &n.id).collect();
    assert_eq!(ids, vec![&a.id, &c.id, &b.id]);
    assert!(
        notes
            .windows(2)
            .all(|pair| matches!(pair, [x, y] if x.updated_at >= y.updated_at))
    );
}

async fn clear_all_empties_everything(store: &dyn NoteStore) {
    let user = save_user(store, "temp").await;
    let note = save_note(store, &user.id, "temp note").await;

    assert!(matches!(store.clear_all().await, Ok(true)));

    assert!(matches!(store.get_user_by_id(&user.id).await, Ok(None)));
    assert!(matches!(store.get_user_by_username("temp").await, Ok(None)));
    assert!(matches!(store.get_note_by_id(&note.id).await, Ok(None)));
    let Ok(notes) = store.get_notes_by_user_id(&user.id).await else {
        panic!("list failed");
    };
    assert!(notes.is_empty());

    // Cleared usernames become available again.
    save_user(store, "temp").await;
}

async fn shopping_scenario(store: &dyn NoteStore) {
    let alice = save_user(store, "alice").await;
    let clash = store.save_user(User::new("Alice", "anything")).await;
    assert!(matches!(clash, Err(StoreError::Conflict(_))));

    let note = save_note(store, &alice.id, "Shopping").await;
    let Ok(Some(stored)) = store.get_note_by_id(&note.id).await else {
        panic!("note missing");
    };
    assert_eq!(stored.content, "");
    assert_eq!(stored.updated_at, stored.created_at);

    pause().await;
    let Ok(Some(_)) = store.update_note(&note.id, "Groceries", "").await else {
        panic!("update failed");
    };
    let Ok(Some(renamed)) = store.get_note_by_id(&note.id).await else {
        panic!("note missing after update");
    };
    assert_eq!(renamed.title, "Groceries");
    assert!(renamed.updated_at > renamed.created_at);

    assert!(matches!(store.delete_note(&note.id).await, Ok(true)));
    assert!(matches!(store.get_note_by_id(&note.id).await, Ok(None)));
    assert!(matches!(store.delete_note(&note.id).await, Ok(false)));
}

macro_rules! backend_suite {
    ($module:ident, $make:expr) => {
        mod $module {
            use super::*;

            #[tokio::test]
            async fn username_lookup_ignores_case() {
                let (_guard, store) = $make.await;
                super::username_lookup_ignores_case(&store).await;
            }

            #[tokio::test]
            async fn case_only_username_collision_conflicts() {
                let (_guard, store) = $make.await;
                super::case_only_username_collision_conflicts(&store).await;
            }

            #[tokio::test]
            async fn non_ascii_letters_are_not_folded() {
                let (_guard, store) = $make.await;
                super::non_ascii_letters_are_not_folded(&store).await;
            }

            #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
            async fn concurrent_case_variants_admit_one() {
                let (_guard, store) = $make.await;
                super::concurrent_case_variants_admit_one(&store).await;
            }

            #[tokio::test]
            async fn duplicate_note_id_conflicts() {
                let (_guard, store) = $make.await;
                super::duplicate_note_id_conflicts(&store).await;
            }

            #[tokio::test]
            async fn update_then_get_reflects_change() {
                let (_guard, store) = $make.await;
                super::update_then_get_reflects_change(&store).await;
            }

            #[tokio::test]
            async fn update_unknown_note_is_absent() {
                let (_guard, store) = $make.await;
                super::update_unknown_note_is_absent(&store).await;
            }

            #[tokio::test]
            async fn delete_is_idempotent() {
                let (_guard, store) = $make.await;
                super::delete_is_idempotent(&store).await;
            }

            #[tokio::test]
            async fn notes_listed_most_recent_first() {
                let (_guard, store) = $make.await;
                super::notes_listed_most_recent_first(&store).await;
            }

            #[tokio::test]
            async fn clear_all_empties_everything() {
                let (_guard, store) = $make.await;
                super::clear_all_empties_everything(&store).await;
            }

            #[tokio::test]
            async fn shopping_scenario() {
                let (_guard, store) = $make.await;
                super::shopping_scenario(&store).await;
            }
        }
    };
}

async fn memory_store() -> ((), MemoryStore) {
    ((), MemoryStore::new())
}

async fn sqlite_store() -> (tempfile::TempDir, SqliteStore) {
    let Ok(dir) = tempfile::tempdir() else {
        panic!("tempdir");
    };
    let Ok(store) = SqliteStore::open(&dir.path().join("contract.sqlite"), 4).await else {
        panic!("failed to open sqlite store");
    };
    (dir, store)
}

backend_suite!(memory, memory_store());
backend_suite!(sqlite, sqlite_store());
