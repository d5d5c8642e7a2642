use crate::domain::{Activity, Contact, ContactId, Goals};
use crate::dto::ActionDto;
use crate::rules::actions::{classify_activity, ActionState};
use chrono::FixedOffset;
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardActions {
    pub priority: Vec<ActionDto>,
    pub upcoming: Vec<ActionDto>,
}

impl DashboardActions {
    pub fn is_empty(&self) -> bool {
        self.priority.is_empty() && self.upcoming.is_empty()
    }
}

/// Routes each selected activity through the classifier. Archived contacts
/// and activities of unknown contacts are skipped; `selected` order is kept
/// within each list.
pub fn build_dashboard_actions(
    now_utc: i64,
    offset: FixedOffset,
    contacts: &[Contact],
    selected: &[Activity],
) -> DashboardActions {
    let index: HashMap<ContactId, &Contact> = contacts
        .iter()
        .filter(|contact| !contact.is_archived)
        .map(|contact| (contact.id, contact))
        .collect();

    let mut actions = DashboardActions::default();
    for activity in selected {
        let Some(contact) = index.get(&activity.contact_id) else {
            continue;
        };

        let (state, days) = classify_activity(now_utc, offset, activity, contact.goal_days);
        let action = ActionDto {
            contact_id: contact.id,
            contact_first_name: contact.first_name.clone(),
            contact_last_name: contact.last_name.clone(),
            title: contact.title.clone(),
            note: activity.note.clone(),
            days,
            goal_days: contact.goal_days,
            is_new_user: !activity.is_user(),
        };

        match state {
            ActionState::Priority => actions.priority.push(action),
            ActionState::Upcoming => actions.upcoming.push(action),
            ActionState::None => {}
        }
    }

    actions
}

/// Zero targets mean goals were never configured and can never be met.
pub fn goals_met(goals: &Goals) -> bool {
    goals.goal_connections > 0
        && goals.goal_messages > 0
        && goals.connections >= goals.goal_connections
        && goals.messages >= goals.goal_messages
}

#[cfg(test)]
mod tests {
    use super::{build_dashboard_actions, goals_met};
    use crate::domain::{Activity, ActivityId, ActivityKind, Contact, ContactId, Goals, UserId};
    use chrono::FixedOffset;

    const DAY: i64 = 86_400;
    const NOW: i64 = 1_700_000_000;

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn contact(first_name: &str, goal_days: i32, is_archived: bool) -> Contact {
        Contact {
            id: ContactId::new(),
            user_id: UserId::new(),
            first_name: first_name.to_string(),
            last_name: "Doe".to_string(),
            title: Some("Engineer".to_string()),
            company: None,
            industry: None,
            email: None,
            phone: None,
            links: Vec::new(),
            interests: Vec::new(),
            goal_days,
            is_archived,
            created_at: NOW - 100 * DAY,
            updated_at: NOW - 100 * DAY,
        }
    }

    fn activity(contact: &Contact, kind: ActivityKind, days_ago: i64) -> Activity {
        Activity {
            id: ActivityId::new(),
            contact_id: contact.id,
            kind,
            title: "Coffee".to_string(),
            note: format!("{} days ago", days_ago),
            description: String::new(),
            date: NOW - days_ago * DAY,
            created_at: NOW - days_ago * DAY,
        }
    }

    fn goals(connections: i32, messages: i32, goal_connections: i32, goal_messages: i32) -> Goals {
        Goals {
            user_id: UserId::new(),
            connections,
            messages,
            goal_connections,
            goal_messages,
            has_shown_confetti: false,
            created_at: NOW,
            updated_at: NOW,
        }
    }

    #[test]
    fn routes_contacts_by_elapsed_days() {
        let upcoming = contact("Ada", 7, false);
        let priority = contact("Grace", 7, false);
        let quiet = contact("Linus", 7, false);
        let contacts = vec![upcoming.clone(), priority.clone(), quiet.clone()];
        let selected = vec![
            activity(&quiet, ActivityKind::User, 2),
            activity(&upcoming, ActivityKind::User, 8),
            activity(&priority, ActivityKind::User, 18),
        ];

        let actions = build_dashboard_actions(NOW, utc(), &contacts, &selected);
        assert_eq!(actions.upcoming.len(), 1);
        assert_eq!(actions.upcoming[0].contact_id, upcoming.id);
        assert_eq!(actions.upcoming[0].days, 8);
        assert_eq!(actions.upcoming[0].goal_days, 7);
        assert_eq!(actions.priority.len(), 1);
        assert_eq!(actions.priority[0].contact_id, priority.id);
        assert!(!actions.priority[0].is_new_user);
    }

    #[test]
    fn archived_contacts_never_appear() {
        let archived = contact("Archived", 7, true);
        let selected = vec![activity(&archived, ActivityKind::User, 400)];
        let actions = build_dashboard_actions(NOW, utc(), &[archived], &selected);
        assert!(actions.is_empty());
    }

    #[test]
    fn keeps_selection_order() {
        let first = contact("First", 3, false);
        let second = contact("Second", 3, false);
        let selected = vec![
            activity(&first, ActivityKind::User, 30),
            activity(&second, ActivityKind::User, 40),
        ];
        let actions =
            build_dashboard_actions(NOW, utc(), &[second.clone(), first.clone()], &selected);
        let ids: Vec<_> = actions.priority.iter().map(|a| a.contact_id).collect();
        assert_eq!(ids, vec![first.id, second.id]);
    }

    #[test]
    fn seeded_contacts_are_flagged_new() {
        let fresh = contact("Fresh", 5, false);
        let selected = vec![activity(&fresh, ActivityKind::System, 0)];
        let actions = build_dashboard_actions(NOW, utc(), &[fresh], &selected);
        assert_eq!(actions.upcoming.len(), 1);
        assert!(actions.upcoming[0].is_new_user);
    }

    #[test]
    fn goals_met_requires_positive_targets() {
        assert!(goals_met(&goals(3, 5, 3, 5)));
        assert!(goals_met(&goals(4, 9, 3, 5)));
        assert!(!goals_met(&goals(2, 5, 3, 5)));
        assert!(!goals_met(&goals(3, 4, 3, 5)));
        assert!(!goals_met(&goals(0, 0, 0, 0)));
        assert!(!goals_met(&goals(5, 5, 0, 5)));
    }
}
