use crate::domain::{Activity, ActivityKind, ContactId};
use std::cmp::Ordering;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Picks the activity that drives reminders for each contact: the newest
/// USER activity, or the original SYSTEM seed when the contact has no USER
/// activity yet. The result is ordered newest first.
pub fn select_latest_activities(activities: &[Activity]) -> Vec<Activity> {
    let mut picks: HashMap<ContactId, &Activity> = HashMap::new();
    for activity in activities {
        match picks.entry(activity.contact_id) {
            Entry::Vacant(slot) => {
                slot.insert(activity);
            }
            Entry::Occupied(mut slot) => {
                if outranks(activity, slot.get()) {
                    slot.insert(activity);
                }
            }
        }
    }

    let mut selected: Vec<Activity> = picks.into_values().cloned().collect();
    selected.sort_by(recency_order);
    selected
}

/// Date descending, then creation time descending; id breaks exact ties.
fn recency_order(a: &Activity, b: &Activity) -> Ordering {
    b.date
        .cmp(&a.date)
        .then_with(|| b.created_at.cmp(&a.created_at))
        .then_with(|| a.id.as_uuid().cmp(b.id.as_uuid()))
}

fn seed_order(a: &Activity, b: &Activity) -> Ordering {
    a.created_at
        .cmp(&b.created_at)
        .then_with(|| a.id.as_uuid().cmp(b.id.as_uuid()))
}

fn outranks(candidate: &Activity, current: &Activity) -> bool {
    match (candidate.kind, current.kind) {
        (ActivityKind::User, ActivityKind::System) => true,
        (ActivityKind::System, ActivityKind::User) => false,
        (ActivityKind::User, ActivityKind::User) => {
            recency_order(candidate, current) == Ordering::Less
        }
        (ActivityKind::System, ActivityKind::System) => {
            seed_order(candidate, current) == Ordering::Less
        }
    }
}

#[cfg(test)]
mod tests {
    use super::select_latest_activities;
    use crate::domain::{Activity, ActivityId, ActivityKind, ContactId};

    fn activity(contact_id: ContactId, kind: ActivityKind, date: i64, created_at: i64) -> Activity {
        Activity {
            id: ActivityId::new(),
            contact_id,
            kind,
            title: String::new(),
            note: format!("{kind}-{date}-{created_at}"),
            description: String::new(),
            date,
            created_at,
        }
    }

    #[test]
    fn prefers_newest_user_activity() {
        let contact = ContactId::new();
        let rows = vec![
            activity(contact, ActivityKind::System, 100, 100),
            activity(contact, ActivityKind::User, 200, 300),
            activity(contact, ActivityKind::User, 250, 260),
        ];
        let selected = select_latest_activities(&rows);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].date, 250);
        assert_eq!(selected[0].kind, ActivityKind::User);
    }

    #[test]
    fn same_date_prefers_latest_entry() {
        let contact = ContactId::new();
        let rows = vec![
            activity(contact, ActivityKind::User, 200, 210),
            activity(contact, ActivityKind::User, 200, 220),
        ];
        let selected = select_latest_activities(&rows);
        assert_eq!(selected[0].created_at, 220);
    }

    #[test]
    fn falls_back_to_oldest_seed() {
        let contact = ContactId::new();
        let rows = vec![
            activity(contact, ActivityKind::System, 500, 500),
            activity(contact, ActivityKind::System, 100, 100),
        ];
        let selected = select_latest_activities(&rows);
        assert_eq!(selected[0].created_at, 100);
    }

    #[test]
    fn one_pick_per_contact_newest_first() {
        let first = ContactId::new();
        let second = ContactId::new();
        let rows = vec![
            activity(first, ActivityKind::User, 100, 100),
            activity(second, ActivityKind::System, 300, 300),
            activity(first, ActivityKind::User, 150, 150),
        ];
        let selected = select_latest_activities(&rows);
        assert_eq!(selected.len(), 2);
        assert_eq!(selected[0].contact_id, second);
        assert_eq!(selected[1].contact_id, first);
        assert_eq!(selected[1].date, 150);
    }

    #[test]
    fn selection_is_stable_across_runs_and_input_order() {
        let contact = ContactId::new();
        let mut rows = vec![
            activity(contact, ActivityKind::User, 200, 200),
            activity(contact, ActivityKind::User, 200, 200),
            activity(contact, ActivityKind::System, 10, 10),
        ];
        let first = select_latest_activities(&rows);
        assert_eq!(select_latest_activities(&rows), first);
        rows.reverse();
        assert_eq!(select_latest_activities(&rows), first);
    }

    #[test]
    fn empty_input_selects_nothing() {
        assert!(select_latest_activities(&[]).is_empty());
    }
}
