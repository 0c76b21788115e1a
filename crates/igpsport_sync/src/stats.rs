//! Aggregate statistics over an activity list.

use igpsport_client::Activity;
use std::fmt;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ActivityStats {
    pub total_count: usize,
    /// Meters.
    pub total_distance: f64,
    /// Seconds.
    pub total_time: f64,
    /// Meters.
    pub total_ascent: i64,
    /// Meters.
    pub avg_distance: f64,
    /// km/h, total distance over total moving time.
    pub avg_speed: f64,
    /// Meters.
    pub longest_ride: f64,
}

impl ActivityStats {
    pub fn from_activities(activities: &[Activity]) -> Self {
        let mut stats = Self {
            total_count: activities.len(),
            ..Self::default()
        };
        for a in activities {
            stats.total_distance += a.ride_distance;
            stats.total_time += a.total_moving_time;
            stats.total_ascent += a.total_ascent;
            stats.longest_ride = stats.longest_ride.max(a.ride_distance);
        }
        if stats.total_count > 0 {
            stats.avg_distance = stats.total_distance / stats.total_count as f64;
            if stats.total_time > 0.0 {
                // m/s -> km/h
                stats.avg_speed = stats.total_distance / stats.total_time * 3.6;
            }
        }
        stats
    }
}

impl fmt::Display for ActivityStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total activities: {}", self.total_count)?;
        writeln!(f, "Total distance: {:.2} km", self.total_distance / 1000.0)?;
        writeln!(f, "Total time: {:.2} hours", self.total_time / 3600.0)?;
        writeln!(f, "Average distance: {:.2} km", self.avg_distance / 1000.0)?;
        writeln!(f, "Average speed: {:.2} km/h", self.avg_speed)?;
        writeln!(f, "Longest ride: {:.2} km", self.longest_ride / 1000.0)?;
        write!(f, "Total ascent: {} m", self.total_ascent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ride(distance: f64, time: f64, ascent: i64) -> Activity {
        Activity {
            ride_distance: distance,
            total_moving_time: time,
            total_ascent: ascent,
            ..Activity::default()
        }
    }

    #[test]
    fn aggregates_totals_and_averages() {
        let stats = ActivityStats::from_activities(&[
            ride(20_000.0, 3600.0, 100),
            ride(40_000.0, 3600.0, 300),
        ]);
        assert_eq!(stats.total_count, 2);
        assert_eq!(stats.total_distance, 60_000.0);
        assert_eq!(stats.total_ascent, 400);
        assert_eq!(stats.avg_distance, 30_000.0);
        assert_eq!(stats.longest_ride, 40_000.0);
        assert!((stats.avg_speed - 30.0).abs() < 1e-9);
    }

    #[test]
    fn empty_list_is_all_zero() {
        assert_eq!(ActivityStats::from_activities(&[]), ActivityStats::default());
    }

    #[test]
    fn zero_moving_time_leaves_speed_zero() {
        let stats = ActivityStats::from_activities(&[ride(1000.0, 0.0, 0)]);
        assert_eq!(stats.avg_speed, 0.0);
        assert_eq!(stats.avg_distance, 1000.0);
    }

    #[test]
    fn display_uses_km_and_hours() {
        let text = ActivityStats::from_activities(&[ride(12_345.0, 5400.0, 12)]).to_string();
        assert!(text.contains("Total distance: 12.35 km"));
        assert!(text.contains("Total time: 1.50 hours"));
        assert!(text.ends_with("Total ascent: 12 m"));
    }
}
