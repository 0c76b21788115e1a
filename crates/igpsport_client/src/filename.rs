//! On-disk names for downloaded activity files.

use crate::Activity;

pub const FIT_EXTENSION: &str = "fit";

/// `{title}-{ride_id}-{start_time}.fit`.
///
/// The title is used verbatim: path separators or other unsafe characters in
/// it are not escaped, and no collision check is made.
pub fn fit_filename(activity: &Activity) -> String {
    format!(
        "{}-{}-{}.{FIT_EXTENSION}",
        activity.title, activity.ride_id, activity.start_time
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn activity(title: &str, ride_id: i64, start_time: &str) -> Activity {
        Activity {
            title: title.into(),
            ride_id,
            start_time: start_time.into(),
            ..Activity::default()
        }
    }

    #[test]
    fn composes_title_ride_and_start() {
        let a = activity("Evening Ride", 1234, "2024-05-01 18:00:00");
        assert_eq!(fit_filename(&a), "Evening Ride-1234-2024-05-01 18:00:00.fit");
    }

    #[test]
    fn deterministic_for_same_key_fields() {
        let a = activity("Loop", 7, "2024-01-01");
        let mut b = a.clone();
        b.ride_distance = 99_000.0;
        b.id = "other".into();
        assert_eq!(fit_filename(&a), fit_filename(&b));
    }

    #[test]
    fn different_ride_ids_differ() {
        let a = activity("Loop", 7, "2024-01-01");
        let b = activity("Loop", 8, "2024-01-01");
        assert_ne!(fit_filename(&a), fit_filename(&b));
    }
}
