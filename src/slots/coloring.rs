use crate::classify::color::{FUTURE_SLOT, PAST_SLOT};
use crate::classify::{ColorPolicy, Rgb};
use crate::models::{Occupancy, TimeOfDay};

/// Color of the bar for `time` given the current bucket.
///
/// The bar matching `current_key` takes the occupancy color of `current`;
/// other bars are past if strictly earlier than the current key and future
/// otherwise. A current bar whose value is not a number has nothing to
/// classify and is drawn as a future bar.
pub fn slot_color(
    time: &TimeOfDay,
    current_key: &TimeOfDay,
    current: Occupancy,
    policy: ColorPolicy,
) -> Rgb {
    if time == current_key {
        return match current.value() {
            Some(percentage) => policy.color(percentage),
            None => FUTURE_SLOT,
        };
    }

    if time.is_before(current_key) {
        PAST_SLOT
    } else {
        FUTURE_SLOT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::color::{ORANGE, RED};
    use crate::classify::gradient;

    fn key(value: &str) -> TimeOfDay {
        TimeOfDay::new(value)
    }

    #[test]
    fn past_and_future_around_current() {
        let current = key("09:30");
        let value = Occupancy::Percent(70);
        let policy = ColorPolicy::Discrete;

        assert_eq!(slot_color(&key("08:00"), &current, value, policy), PAST_SLOT);
        assert_eq!(slot_color(&key("09:00"), &current, value, policy), PAST_SLOT);
        assert_eq!(slot_color(&key("10:00"), &current, value, policy), FUTURE_SLOT);
    }

    #[test]
    fn current_match_wins() {
        let current = key("09:30");
        assert_eq!(
            slot_color(&current, &current, Occupancy::Percent(70), ColorPolicy::Discrete),
            ORANGE
        );
        assert_eq!(
            slot_color(&current, &current, Occupancy::Percent(95), ColorPolicy::Discrete),
            RED
        );
        assert_eq!(
            slot_color(&current, &current, Occupancy::Percent(30), ColorPolicy::Continuous),
            gradient(30)
        );
    }

    #[test]
    fn current_not_a_number_falls_back_to_future() {
        let current = key("11:00");
        assert_eq!(
            slot_color(&current, &current, Occupancy::NotANumber, ColorPolicy::Discrete),
            FUTURE_SLOT
        );
    }

    #[test]
    fn unparsable_times_count_as_future() {
        assert_eq!(
            slot_color(&key("lunch"), &key("12:00"), Occupancy::Percent(10), ColorPolicy::Discrete),
            FUTURE_SLOT
        );
    }
}
