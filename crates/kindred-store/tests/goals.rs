use kindred_core::domain::UserId;
use kindred_core::rules::goals_met;
use kindred_store::repo::ContactNew;
use kindred_store::{Store, StoreErrorKind};

const NOW: i64 = 1_700_000_000;

fn store_with_user() -> (Store, UserId) {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");
    let user = store
        .users()
        .upsert(NOW, "owner@example.com", None)
        .expect("user");
    (store, user.id)
}

fn add_contact(store: &Store, user_id: UserId) {
    store
        .contacts()
        .create(
            NOW,
            ContactNew {
                user_id,
                first_name: "Grace".to_string(),
                last_name: String::new(),
                title: None,
                company: None,
                industry: None,
                email: None,
                phone: None,
                links: Vec::new(),
                interests: Vec::new(),
                goal_days: 30,
            },
        )
        .expect("contact");
}

#[test]
fn upsert_creates_then_updates_targets() {
    let (store, user_id) = store_with_user();
    assert!(store.goals().get(user_id).expect("get").is_none());

    let created = store
        .goals()
        .upsert_targets(NOW, user_id, 3, 10)
        .expect("create");
    assert_eq!(created.goal_connections, 3);
    assert_eq!(created.goal_messages, 10);
    assert_eq!(created.connections, 0);

    store.goals().increment_messages(NOW, user_id).expect("inc");
    let updated = store
        .goals()
        .upsert_targets(NOW + 1, user_id, 4, 12)
        .expect("update");
    assert_eq!(updated.goal_connections, 4);
    assert_eq!(updated.messages, 1);
    assert_eq!(updated.created_at, NOW);
    assert_eq!(updated.updated_at, NOW + 1);
}

#[test]
fn upsert_rejects_negative_targets() {
    let (store, user_id) = store_with_user();
    let err = store
        .goals()
        .upsert_targets(NOW, user_id, -1, 3)
        .unwrap_err();
    assert_eq!(err.kind(), StoreErrorKind::Core);
}

#[test]
fn increments_are_noops_without_goals() {
    let (store, user_id) = store_with_user();
    assert!(!store.goals().increment_messages(NOW, user_id).expect("inc"));
    add_contact(&store, user_id);
    assert!(store.goals().get(user_id).expect("get").is_none());
}

#[test]
fn confetti_latch_flips_once_until_targets_change() {
    let (store, user_id) = store_with_user();
    store
        .goals()
        .upsert_targets(NOW, user_id, 1, 1)
        .expect("goals");
    add_contact(&store, user_id);
    store.goals().increment_messages(NOW, user_id).expect("inc");
    let goals = store.goals().get(user_id).expect("get").expect("present");
    assert!(goals_met(&goals));

    assert!(store.goals().latch_confetti(NOW, user_id).expect("latch"));
    assert!(!store.goals().latch_confetti(NOW, user_id).expect("latch"));
    assert!(
        store
            .goals()
            .get(user_id)
            .expect("get")
            .expect("present")
            .has_shown_confetti
    );

    let reset = store
        .goals()
        .upsert_targets(NOW, user_id, 1, 1)
        .expect("reset");
    assert!(!reset.has_shown_confetti);
    assert!(store.goals().latch_confetti(NOW, user_id).expect("latch"));
}
