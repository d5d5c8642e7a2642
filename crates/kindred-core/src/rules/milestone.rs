/// Every this-many logged USER activities the client shows a quote.
pub const MILESTONE_INTERVAL: i64 = 10;

pub fn is_milestone(user_activity_count: i64) -> bool {
    user_activity_count > 0 && user_activity_count % MILESTONE_INTERVAL == 0
}

#[cfg(test)]
mod tests {
    use super::is_milestone;

    #[test]
    fn fires_on_multiples_of_ten() {
        for count in [10, 20, 30, 100] {
            assert!(is_milestone(count), "{count}");
        }
    }

    #[test]
    fn quiet_otherwise() {
        for count in [0, 1, 9, 11, 19, 21] {
            assert!(!is_milestone(count), "{count}");
        }
    }
}
