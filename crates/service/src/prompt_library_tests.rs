use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use prompt_library_core::{Credential, Prompt, PromptDraft, is_newest_first};
use prompt_library_remote::{RemoteError, RemotePromptStore};
use tokio::sync::Notify;

use crate::{AuthFailure, PromptError, PromptLibrary, Removal};

#[derive(Debug, Clone, Copy)]
enum Failure {
    Unauthorized,
    NotFound,
    Status(u16),
}

impl Failure {
    fn into_error(self) -> RemoteError {
        match self {
            Self::Unauthorized => RemoteError::Unauthorized,
            Self::NotFound => RemoteError::NotFound,
            Self::Status(code) => RemoteError::HttpStatus { code, body: "boom".to_owned() },
        }
    }
}

/// In-memory store that counts calls and can fail or stall on demand.
#[derive(Default)]
struct FakeStore {
    prompts: Mutex<Vec<Prompt>>,
    calls: AtomicUsize,
    next_id: AtomicUsize,
    fail_next: Mutex<Option<Failure>>,
    hold_updates: Option<(Notify, Notify)>,
    hold_reads: Option<(Notify, Notify)>,
}

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap()
}

fn prompt(id: &str, minute: i64, content: &str) -> Prompt {
    Prompt {
        id: id.to_owned(),
        title: format!("title {id}"),
        content: content.to_owned(),
        tag: String::new(),
        created_at: base_time() + Duration::minutes(minute),
        updated_at: base_time() + Duration::minutes(minute),
    }
}

impl FakeStore {
    fn with_prompts(prompts: Vec<Prompt>) -> Arc<Self> {
        Arc::new(Self { prompts: Mutex::new(prompts), ..Self::default() })
    }

    /// Updates park until `release` is notified; `entered` fires on arrival.
    fn holding_updates(prompts: Vec<Prompt>) -> Arc<Self> {
        Arc::new(Self {
            prompts: Mutex::new(prompts),
            hold_updates: Some((Notify::new(), Notify::new())),
            ..Self::default()
        })
    }

    /// Like [`Self::holding_updates`], for `list` and `create`.
    fn holding_reads(prompts: Vec<Prompt>) -> Arc<Self> {
        Arc::new(Self {
            prompts: Mutex::new(prompts),
            hold_reads: Some((Notify::new(), Notify::new())),
            ..Self::default()
        })
    }

    async fn pause(hold: Option<&(Notify, Notify)>) {
        if let Some((entered, release)) = hold {
            entered.notify_one();
            release.notified().await;
        }
    }

    fn fail_next(&self, failure: Failure) {
        *self.fail_next.lock().unwrap() = Some(failure);
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn stored(&self) -> Vec<Prompt> {
        self.prompts.lock().unwrap().clone()
    }

    fn enter(&self, credential: &Credential) -> Result<(), RemoteError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert_eq!(credential.expose(), "token");
        match self.fail_next.lock().unwrap().take() {
            Some(f) => Err(f.into_error()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RemotePromptStore for FakeStore {
    async fn list(&self, credential: &Credential) -> Result<Vec<Prompt>, RemoteError> {
        Self::pause(self.hold_reads.as_ref()).await;
        self.enter(credential)?;
        Ok(self.stored())
    }

    async fn create(&self, credential: &Credential, draft: &PromptDraft) -> Result<Prompt, RemoteError> {
        Self::pause(self.hold_reads.as_ref()).await;
        self.enter(credential)?;
        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
        let mut created = prompt(&format!("srv-{n}"), 100 + i64::try_from(n).unwrap(), draft.content());
        created.title = draft.title().to_owned();
        created.tag = draft.tag().to_owned();
        self.prompts.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update(
        &self,
        credential: &Credential,
        id: &str,
        draft: &PromptDraft,
    ) -> Result<Prompt, RemoteError> {
        Self::pause(self.hold_updates.as_ref()).await;
        self.enter(credential)?;
        let mut prompts = self.prompts.lock().unwrap();
        let existing = prompts.iter_mut().find(|p| p.id == id).ok_or(RemoteError::NotFound)?;
        existing.apply(draft.clone(), existing.updated_at + Duration::hours(1));
        Ok(existing.clone())
    }

    async fn delete(&self, credential: &Credential, id: &str) -> Result<(), RemoteError> {
        self.enter(credential)?;
        let mut prompts = self.prompts.lock().unwrap();
        let before = prompts.len();
        prompts.retain(|p| p.id != id);
        if prompts.len() == before {
            return Err(RemoteError::NotFound);
        }
        Ok(())
    }
}

fn signed_in(store: &Arc<FakeStore>) -> PromptLibrary {
    PromptLibrary::new(store.clone(), Some(Credential::new("token").unwrap()))
}

async fn loaded(store: &Arc<FakeStore>) -> PromptLibrary {
    let library = signed_in(store);
    library.load().await.unwrap();
    library
}

fn ids(prompts: &[Prompt]) -> Vec<&str> {
    prompts.iter().map(|p| p.id.as_str()).collect()
}

#[tokio::test]
async fn test_load_replaces_cache_sorted_newest_first() {
    let store = FakeStore::with_prompts(vec![prompt("a", 1, "x"), prompt("b", 3, "y"), prompt("c", 2, "z")]);
    let library = signed_in(&store);

    assert_eq!(library.load().await.unwrap(), 3);
    assert_eq!(ids(&library.snapshot().await), ["b", "c", "a"]);
}

#[tokio::test]
async fn test_load_does_not_merge_with_previous_cache() {
    let store = FakeStore::with_prompts(vec![prompt("a", 1, "x")]);
    let library = loaded(&store).await;

    *store.prompts.lock().unwrap() = vec![prompt("z", 5, "new")];
    library.load().await.unwrap();
    assert_eq!(ids(&library.snapshot().await), ["z"]);
}

#[tokio::test]
async fn test_load_failure_leaves_cache() {
    let store = FakeStore::with_prompts(vec![prompt("a", 1, "x")]);
    let library = loaded(&store).await;

    store.fail_next(Failure::Status(500));
    let err = library.load().await.unwrap_err();
    assert!(matches!(err, PromptError::Transport(_)));
    assert_eq!(ids(&library.snapshot().await), ["a"]);
}

#[tokio::test]
async fn test_load_401_is_rejected_credential() {
    let store = FakeStore::with_prompts(vec![prompt("a", 1, "x")]);
    let library = loaded(&store).await;

    store.fail_next(Failure::Unauthorized);
    let err = library.load().await.unwrap_err();
    assert!(matches!(err, PromptError::Authentication(AuthFailure::Rejected)));
    assert_eq!(library.len().await, 1);
}

#[tokio::test]
async fn test_blank_fields_fail_validation_without_calls() {
    let store = FakeStore::with_prompts(vec![prompt("a", 1, "old")]);
    let library = loaded(&store).await;
    let calls_before = store.calls();
    let before = library.snapshot().await;

    for (title, content) in [("", "c"), ("   ", "c"), ("t", ""), ("t", " \n\t "), ("\t", "\n")] {
        let err = library.create(title, content, "tag").await.unwrap_err();
        assert!(err.is_validation(), "create({title:?}, {content:?}) gave {err:?}");
        let err = library.update("a", title, content, "").await.unwrap_err();
        assert!(err.is_validation(), "update({title:?}, {content:?}) gave {err:?}");
    }

    assert_eq!(store.calls(), calls_before);
    assert_eq!(library.snapshot().await, before);
}

#[tokio::test]
async fn test_create_into_empty_cache() {
    let store = FakeStore::with_prompts(Vec::new());
    let library = signed_in(&store);

    let created = library.create("T", "C", "tag").await.unwrap();

    let snapshot = library.snapshot().await;
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].id, created.id);
    assert_eq!(snapshot[0].title, "T");
    assert_eq!(snapshot[0].content, "C");
    assert_eq!(snapshot[0].tag, "tag");
}

#[tokio::test]
async fn test_create_goes_to_head_without_reload() {
    let store = FakeStore::with_prompts(vec![prompt("a", 1, "x"), prompt("b", 2, "y")]);
    let library = loaded(&store).await;
    let calls_before = store.calls();

    let created = library.create("  New ", " body ", "").await.unwrap();

    assert_eq!(store.calls(), calls_before + 1);
    assert_eq!(created.title, "New");
    assert_eq!(created.content, "body");
    assert_eq!(ids(&library.snapshot().await), [created.id.as_str(), "b", "a"]);
}

#[tokio::test]
async fn test_create_failure_leaves_cache() {
    let store = FakeStore::with_prompts(vec![prompt("a", 1, "x")]);
    let library = loaded(&store).await;

    store.fail_next(Failure::Status(502));
    assert!(library.create("T", "C", "").await.is_err());
    assert_eq!(ids(&library.snapshot().await), ["a"]);
}

#[tokio::test]
async fn test_update_replaces_in_place() {
    let store = FakeStore::with_prompts(vec![prompt("z", 3, "z"), prompt("A", 2, "old"), prompt("y", 1, "y")]);
    let library = loaded(&store).await;
    let original = library.snapshot().await[1].clone();

    let updated = library.update("A", "new title", "new content", "").await.unwrap();

    let snapshot = library.snapshot().await;
    assert_eq!(snapshot.len(), 3);
    assert_eq!(ids(&snapshot), ["z", "A", "y"]);
    assert_eq!(snapshot[1], updated);
    assert_eq!(updated.id, original.id);
    assert_eq!(updated.created_at, original.created_at);
    assert_eq!(updated.title, "new title");
    assert_eq!(updated.content, "new content");
    assert!(updated.updated_at > original.updated_at);
}

#[tokio::test]
async fn test_update_of_uncached_id_is_inserted() {
    let store = FakeStore::with_prompts(vec![prompt("a", 1, "x")]);
    let library = signed_in(&store);

    library.update("a", "T", "C", "").await.unwrap();
    assert_eq!(ids(&library.snapshot().await), ["a"]);
}

#[tokio::test]
async fn test_update_not_found_drops_local_copy() {
    let store = FakeStore::with_prompts(vec![prompt("B", 2, "x"), prompt("c", 1, "y")]);
    let library = loaded(&store).await;
    store.prompts.lock().unwrap().retain(|p| p.id != "B");

    let err = library.update("B", "T", "C", "").await.unwrap_err();

    assert!(matches!(&err, PromptError::NotFound { id } if id == "B"));
    assert_eq!(ids(&library.snapshot().await), ["c"]);
}

#[tokio::test]
async fn test_update_transport_failure_leaves_cache() {
    let store = FakeStore::with_prompts(vec![prompt("a", 1, "old")]);
    let library = loaded(&store).await;

    store.fail_next(Failure::Status(500));
    let err = library.update("a", "T", "new", "").await.unwrap_err();
    assert!(matches!(err, PromptError::Transport(RemoteError::HttpStatus { code: 500, .. })));
    assert_eq!(library.snapshot().await[0].content, "old");
}

#[tokio::test]
async fn test_remove_present_entry() {
    let store = FakeStore::with_prompts(vec![prompt("C", 2, "x"), prompt("d", 1, "y")]);
    let library = loaded(&store).await;

    assert_eq!(library.remove("C").await.unwrap(), Removal::Deleted);
    assert_eq!(ids(&library.snapshot().await), ["d"]);
}

#[tokio::test]
async fn test_remove_absent_entry_is_success() {
    let store = FakeStore::with_prompts(vec![prompt("d", 1, "y")]);
    let library = loaded(&store).await;

    assert_eq!(library.remove("C").await.unwrap(), Removal::AlreadyGone);
    assert_eq!(library.len().await, 1);
}

#[tokio::test]
async fn test_remove_already_deleted_elsewhere_drops_local_copy() {
    let store = FakeStore::with_prompts(vec![prompt("C", 2, "x"), prompt("d", 1, "y")]);
    let library = loaded(&store).await;
    store.prompts.lock().unwrap().retain(|p| p.id != "C");

    assert_eq!(library.remove("C").await.unwrap(), Removal::AlreadyGone);
    assert_eq!(ids(&library.snapshot().await), ["d"]);
}

#[tokio::test]
async fn test_remove_auth_failure_leaves_cache() {
    let store = FakeStore::with_prompts(vec![prompt("C", 2, "x")]);
    let library = loaded(&store).await;

    store.fail_next(Failure::Unauthorized);
    let err = library.remove("C").await.unwrap_err();
    assert!(err.is_auth());
    assert_eq!(library.len().await, 1);
}

#[tokio::test]
async fn test_no_session_makes_no_calls() {
    let store = FakeStore::with_prompts(vec![prompt("a", 1, "x")]);
    let library = PromptLibrary::new(store.clone(), None);

    assert!(library.load().await.unwrap_err().is_missing_credential());
    assert!(library.create("T", "C", "").await.unwrap_err().is_missing_credential());
    assert!(library.update("a", "T", "C", "").await.unwrap_err().is_missing_credential());
    assert!(library.remove("a").await.unwrap_err().is_missing_credential());

    assert_eq!(store.calls(), 0);
    assert!(library.is_empty().await);
}

#[tokio::test]
async fn test_create_then_load_round_trip() {
    let store = FakeStore::with_prompts(vec![prompt("old", 1, "x")]);
    let library = loaded(&store).await;

    let created = library.create("T", "C", "tag").await.unwrap();
    library.load().await.unwrap();

    let snapshot = library.snapshot().await;
    assert!(is_newest_first(&snapshot));
    assert_eq!(snapshot.iter().find(|p| p.id == created.id), Some(&created));
}

#[tokio::test]
async fn test_snapshot_stays_ordered_across_operations() {
    let store = FakeStore::with_prompts(vec![prompt("a", 1, "x"), prompt("b", 4, "y"), prompt("c", 2, "z")]);
    let library = loaded(&store).await;
    assert!(is_newest_first(&library.snapshot().await));

    library.create("T", "C", "").await.unwrap();
    assert!(is_newest_first(&library.snapshot().await));
    library.update("c", "T", "C2", "").await.unwrap();
    assert!(is_newest_first(&library.snapshot().await));
    library.remove("b").await.unwrap();
    assert!(is_newest_first(&library.snapshot().await));
}

#[tokio::test]
async fn test_sign_out_clears_cache() {
    let store = FakeStore::with_prompts(vec![prompt("a", 1, "x")]);
    let library = loaded(&store).await;

    library.sign_out().await;

    assert!(!library.is_signed_in().await);
    assert!(library.is_empty().await);
    assert!(library.load().await.unwrap_err().is_missing_credential());
}

#[tokio::test]
async fn test_sign_in_same_credential_keeps_cache() {
    let store = FakeStore::with_prompts(vec![prompt("a", 1, "x")]);
    let library = loaded(&store).await;

    library.sign_in(Credential::new("token").unwrap()).await;
    assert_eq!(library.len().await, 1);

    library.sign_in(Credential::new("someone-else").unwrap()).await;
    assert!(library.is_empty().await);
}

#[tokio::test]
async fn test_in_flight_guard_rejects_second_operation() {
    let store = FakeStore::holding_updates(vec![prompt("A", 1, "x")]);
    let library = Arc::new(signed_in(&store).with_in_flight_guard());
    library.load().await.unwrap();

    let pending = tokio::spawn({
        let library = library.clone();
        async move { library.update("A", "T", "C", "").await }
    });
    let (entered, release) = store.hold_updates.as_ref().unwrap();
    entered.notified().await;

    let err = library.remove("A").await.unwrap_err();
    assert!(matches!(&err, PromptError::Busy { id } if id == "A"));

    release.notify_one();
    pending.await.unwrap().unwrap();
    assert_eq!(library.remove("A").await.unwrap(), Removal::Deleted);
}

#[tokio::test]
async fn test_without_guard_last_response_wins() {
    let store = FakeStore::holding_updates(vec![prompt("A", 1, "x")]);
    let library = Arc::new(signed_in(&store));
    library.load().await.unwrap();

    let pending = tokio::spawn({
        let library = library.clone();
        async move { library.update("A", "T", "edited", "").await }
    });
    let (entered, release) = store.hold_updates.as_ref().unwrap();
    entered.notified().await;

    // The delete resolves first, then the stalled update finds nothing.
    assert_eq!(library.remove("A").await.unwrap(), Removal::Deleted);
    assert!(library.is_empty().await);

    release.notify_one();
    let err = pending.await.unwrap().unwrap_err();
    assert!(err.is_not_found());
    assert!(library.is_empty().await);
}

#[tokio::test]
async fn test_load_finishing_after_user_switch_is_discarded() {
    let store = FakeStore::holding_reads(vec![prompt("a-private", 1, "x")]);
    let library = Arc::new(signed_in(&store));

    let pending = tokio::spawn({
        let library = library.clone();
        async move { library.load().await }
    });
    let (entered, release) = store.hold_reads.as_ref().unwrap();
    entered.notified().await;

    library.sign_out().await;
    library.sign_in(Credential::new("user-b").unwrap()).await;
    release.notify_one();

    let err = pending.await.unwrap().unwrap_err();
    assert!(matches!(err, PromptError::Authentication(AuthFailure::SessionChanged)));
    assert!(library.is_empty().await);
}

#[tokio::test]
async fn test_create_finishing_after_sign_out_is_discarded() {
    let store = FakeStore::holding_reads(Vec::new());
    let library = Arc::new(signed_in(&store));

    let pending = tokio::spawn({
        let library = library.clone();
        async move { library.create("T", "C", "").await }
    });
    let (entered, release) = store.hold_reads.as_ref().unwrap();
    entered.notified().await;

    library.sign_out().await;
    release.notify_one();

    let err = pending.await.unwrap().unwrap_err();
    assert!(matches!(err, PromptError::Authentication(AuthFailure::SessionChanged)));
    assert!(library.is_empty().await);
}

#[tokio::test]
async fn test_update_finishing_after_user_switch_is_discarded() {
    let store = FakeStore::holding_updates(vec![prompt("A", 1, "x")]);
    let library = Arc::new(signed_in(&store));
    library.load().await.unwrap();

    let pending = tokio::spawn({
        let library = library.clone();
        async move { library.update("A", "T", "edited", "").await }
    });
    let (entered, release) = store.hold_updates.as_ref().unwrap();
    entered.notified().await;

    library.sign_in(Credential::new("user-b").unwrap()).await;
    release.notify_one();

    let err = pending.await.unwrap().unwrap_err();
    assert!(matches!(err, PromptError::Authentication(AuthFailure::SessionChanged)));
    assert!(library.is_empty().await);
}

#[tokio::test]
async fn test_sign_in_same_credential_keeps_pending_load() {
    let store = FakeStore::holding_reads(vec![prompt("a", 1, "x")]);
    let library = Arc::new(signed_in(&store));

    let pending = tokio::spawn({
        let library = library.clone();
        async move { library.load().await }
    });
    let (entered, release) = store.hold_reads.as_ref().unwrap();
    entered.notified().await;

    library.sign_in(Credential::new("token").unwrap()).await;
    release.notify_one();

    assert_eq!(pending.await.unwrap().unwrap(), 1);
    assert_eq!(ids(&library.snapshot().await), ["a"]);
}
