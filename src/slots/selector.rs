use chrono::Timelike;

use crate::models::{Granularity, OccupancyRow, TimeOfDay};

/// Bucket key for `now`: the zero-padded hour, and minutes floored to the
/// bucket start (`00` hourly; `00` or `30` half-hourly).
pub fn current_key<T: Timelike>(now: &T, granularity: Granularity) -> TimeOfDay {
    let minute = match granularity {
        Granularity::Hourly => 0,
        Granularity::HalfHourly if now.minute() < 30 => 0,
        Granularity::HalfHourly => 30,
    };
    TimeOfDay::from_parts(now.hour(), minute)
}

/// First row whose time key equals `key` exactly. A miss is expected when
/// the table only covers part of the day.
pub fn select<'a>(rows: &'a [OccupancyRow], key: &TimeOfDay) -> Option<&'a OccupancyRow> {
    rows.iter().find(|row| &row.time == key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AreaKey, Occupancy};
    use crate::table::{parse_table, TableLayout};
    use chrono::NaiveTime;

    fn at(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    #[test]
    fn hourly_key_drops_minutes() {
        assert_eq!(current_key(&at(9, 17), Granularity::Hourly).as_str(), "09:00");
        assert_eq!(current_key(&at(9, 59), Granularity::Hourly).as_str(), "09:00");
        assert_eq!(current_key(&at(0, 5), Granularity::Hourly).as_str(), "00:00");
    }

    #[test]
    fn half_hourly_key_floors_to_bucket_start() {
        assert_eq!(current_key(&at(9, 17), Granularity::HalfHourly).as_str(), "09:00");
        assert_eq!(current_key(&at(9, 29), Granularity::HalfHourly).as_str(), "09:00");
        assert_eq!(current_key(&at(9, 30), Granularity::HalfHourly).as_str(), "09:30");
        assert_eq!(current_key(&at(9, 45), Granularity::HalfHourly).as_str(), "09:30");
        assert_eq!(current_key(&at(23, 59), Granularity::HalfHourly).as_str(), "23:30");
    }

    #[test]
    fn key_is_stable_for_same_input() {
        let now = at(14, 44);
        assert_eq!(
            current_key(&now, Granularity::HalfHourly),
            current_key(&now, Granularity::HalfHourly)
        );
    }

    #[test]
    fn select_returns_first_match() {
        let rows = parse_table("time,occupancy\n09:00,10\n09:00,99", TableLayout::SingleSeries);
        let row = select(&rows, &TimeOfDay::new("09:00")).unwrap();
        assert_eq!(row.value(AreaKey::Occupancy), Occupancy::Percent(10));
    }

    #[test]
    fn select_misses_without_exact_match() {
        let rows = parse_table("time,occupancy\n9:00,10\n10:00,20", TableLayout::SingleSeries);
        assert!(select(&rows, &TimeOfDay::new("09:00")).is_none());
        assert!(select(&[], &TimeOfDay::new("09:00")).is_none());
    }
}
