use kindred_core::domain::{ActivityKind, ContactId, UserId};
use kindred_store::repo::{ActivityNew, ActivityUpdate, ContactNew, ContactUpdate};
use kindred_store::{Store, StoreErrorKind};

const NOW: i64 = 1_700_000_000;
const DAY: i64 = 86_400;

fn store() -> Store {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");
    store
}

fn user(store: &Store, email: &str) -> UserId {
    store.users().upsert(NOW, email, None).expect("user").id
}

fn contact(store: &Store, user_id: UserId, first_name: &str, created_at: i64) -> ContactId {
    store
        .contacts()
        .create(
            created_at,
            ContactNew {
                user_id,
                first_name: first_name.to_string(),
                last_name: String::new(),
                title: None,
                company: None,
                industry: None,
                email: None,
                phone: None,
                links: Vec::new(),
                interests: Vec::new(),
                goal_days: 7,
            },
        )
        .expect("create contact")
        .id
}

fn user_activity(contact_id: ContactId, date: i64, created_at: i64, note: &str) -> ActivityNew {
    ActivityNew {
        contact_id,
        kind: ActivityKind::User,
        title: "Coffee".to_string(),
        note: note.to_string(),
        description: String::new(),
        date,
        created_at,
    }
}

#[test]
fn add_and_list_newest_first() {
    let store = store();
    let owner = user(&store, "owner@example.com");
    let ada = contact(&store, owner, "Ada", NOW - 30 * DAY);

    store
        .activities()
        .add(user_activity(ada, NOW - 10 * DAY, NOW, "older"))
        .expect("add");
    store
        .activities()
        .add(user_activity(ada, NOW - 2 * DAY, NOW, "newer"))
        .expect("add");

    let list = store.activities().list_for_contact(ada).expect("list");
    assert_eq!(list.len(), 3);
    assert_eq!(list[0].note, "newer");
    assert_eq!(list[1].note, "older");
    assert_eq!(list[2].kind, ActivityKind::System);
}

#[test]
fn add_to_unknown_contact_is_not_found() {
    let store = store();
    let err = store
        .activities()
        .add(user_activity(ContactId::new(), NOW, NOW, "lost"))
        .unwrap_err();
    assert_eq!(err.kind(), StoreErrorKind::NotFound);
}

#[test]
fn latest_prefers_user_activity_then_seed() {
    let store = store();
    let owner = user(&store, "owner@example.com");
    let ada = contact(&store, owner, "Ada", NOW - 40 * DAY);
    let grace = contact(&store, owner, "Grace", NOW - 20 * DAY);

    store
        .activities()
        .add(user_activity(ada, NOW - 5 * DAY, NOW - 5 * DAY, "first"))
        .expect("add");
    store
        .activities()
        .add(user_activity(ada, NOW - 5 * DAY, NOW - DAY, "entered later"))
        .expect("add");
    store
        .activities()
        .add(user_activity(ada, NOW - 9 * DAY, NOW, "backdated"))
        .expect("add");
    // A later SYSTEM row must not displace the original seed.
    store
        .activities()
        .add(ActivityNew {
            kind: ActivityKind::System,
            ..user_activity(grace, NOW, NOW, "late seed")
        })
        .expect("add");

    let latest = store
        .activities()
        .latest_for_contacts(&[ada, grace])
        .expect("latest");
    assert_eq!(latest.len(), 2);
    assert_eq!(latest[0].contact_id, ada);
    assert_eq!(latest[0].note, "entered later");
    assert_eq!(latest[1].contact_id, grace);
    assert_eq!(latest[1].kind, ActivityKind::System);
    assert_eq!(latest[1].created_at, NOW - 20 * DAY);

    let again = store
        .activities()
        .latest_for_contacts(&[grace, ada])
        .expect("latest again");
    assert_eq!(again, latest);
}

#[test]
fn latest_omits_contacts_without_activities() {
    let store = store();
    let owner = user(&store, "owner@example.com");
    let ada = contact(&store, owner, "Ada", NOW);
    store
        .connection()
        .execute("DELETE FROM activities;", [])
        .expect("clear");

    let latest = store
        .activities()
        .latest_for_contacts(&[ada, ContactId::new()])
        .expect("latest");
    assert!(latest.is_empty());
    assert!(store
        .activities()
        .latest_for_contacts(&[])
        .expect("latest")
        .is_empty());
}

#[test]
fn update_and_delete_are_scoped_to_contact() {
    let store = store();
    let owner = user(&store, "owner@example.com");
    let ada = contact(&store, owner, "Ada", NOW);
    let grace = contact(&store, owner, "Grace", NOW);
    let activity = store
        .activities()
        .add(user_activity(ada, NOW, NOW, "draft"))
        .expect("add");

    let err = store
        .activities()
        .update(grace, activity.id, ActivityUpdate::default())
        .unwrap_err();
    assert_eq!(err.kind(), StoreErrorKind::NotFound);

    let updated = store
        .activities()
        .update(
            ada,
            activity.id,
            ActivityUpdate {
                note: Some("final".to_string()),
                date: Some(NOW - DAY),
                ..ActivityUpdate::default()
            },
        )
        .expect("update");
    assert_eq!(updated.note, "final");
    assert_eq!(updated.date, NOW - DAY);
    assert_eq!(updated.title, "Coffee");

    let err = store.activities().delete(grace, activity.id).unwrap_err();
    assert_eq!(err.kind(), StoreErrorKind::NotFound);
    store.activities().delete(ada, activity.id).expect("delete");
    assert!(store.activities().get(activity.id).expect("get").is_none());
}

#[test]
fn counts_user_activities_across_all_contacts() {
    let store = store();
    let owner = user(&store, "owner@example.com");
    let other = user(&store, "other@example.com");
    let ada = contact(&store, owner, "Ada", NOW);
    let grace = contact(&store, owner, "Grace", NOW);
    let stranger = contact(&store, other, "Stranger", NOW);

    for (contact_id, n) in [(ada, 3), (grace, 2), (stranger, 4)] {
        for i in 0..n {
            store
                .activities()
                .add(user_activity(contact_id, NOW - i * DAY, NOW, "touch"))
                .expect("add");
        }
    }
    store
        .contacts()
        .update(
            NOW,
            grace,
            ContactUpdate {
                is_archived: Some(true),
                ..ContactUpdate::default()
            },
        )
        .expect("archive");

    assert_eq!(
        store
            .activities()
            .count_user_activities(owner)
            .expect("count"),
        5
    );
    assert_eq!(
        store
            .activities()
            .count_user_activities(other)
            .expect("count"),
        4
    );
}
