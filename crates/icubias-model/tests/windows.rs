//! Property tests for exposure window unions.

use chrono::DateTime;
use proptest::prelude::{Strategy, prop_assert, prop_assert_eq, proptest};
use proptest::collection::vec;

use icubias_model::{ExposureWindow, Timestamp, WindowSet};

fn at(seconds: i64) -> Timestamp {
    DateTime::from_timestamp(seconds, 0).unwrap().naive_utc()
}

fn windows() -> impl Strategy<Value = Vec<ExposureWindow>> {
    vec((0i64..500, 1i64..60), 0..12).prop_map(|pairs| {
        pairs
            .into_iter()
            .map(|(start, len)| ExposureWindow::new(at(start), at(start + len)).unwrap())
            .collect()
    })
}

proptest! {
    #[test]
    fn union_contains_exactly_the_input_points(input in windows(), point in 0i64..600) {
        let set = WindowSet::from_windows(input.iter().copied());
        let expected = input.iter().any(|w| w.contains(at(point)));
        prop_assert_eq!(set.contains(at(point)), expected);
    }

    #[test]
    fn union_is_sorted_and_disjoint(input in windows()) {
        let set = WindowSet::from_windows(input);
        for pair in set.windows().windows(2) {
            prop_assert!(pair[0].end() < pair[1].start());
        }
    }

    #[test]
    fn union_ignores_input_order(input in windows()) {
        let mut reversed = input.clone();
        reversed.reverse();
        prop_assert_eq!(WindowSet::from_windows(input), WindowSet::from_windows(reversed));
    }
}
