//! Nearest-year resolution.

/// Return `requested` if present in `available`, otherwise the candidate
/// closest to it. Ties go to the first candidate in iteration order.
///
/// Returns `None` only when `available` is empty.
///
/// Example:
/// assert_eq!(resolve(1700, &[1348, 1492, 1929, 2008]), Some(1492));
pub fn resolve(requested: i32, available: &[i32]) -> Option<i32> {
    let mut best: Option<(i32, i64)> = None;
    for &candidate in available {
        let diff = (i64::from(requested) - i64::from(candidate)).abs();
        if diff == 0 {
            return Some(candidate);
        }
        match best {
            Some((_, best_diff)) if diff >= best_diff => {}
            _ => best = Some((candidate, diff)),
        }
    }
    best.map(|(year, _)| year)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const YEARS: [i32; 4] = [1348, 1492, 1929, 2008];

    #[test]
    fn exact_match_wins() {
        for y in YEARS {
            assert_eq!(resolve(y, &YEARS), Some(y));
        }
    }

    #[test]
    fn nearest_year() {
        assert_eq!(resolve(1700, &YEARS), Some(1492));
        assert_eq!(resolve(1800, &YEARS), Some(1929));
        assert_eq!(resolve(1000, &YEARS), Some(1348));
        assert_eq!(resolve(2100, &YEARS), Some(2008));
    }

    #[test]
    fn tie_goes_to_first_encountered() {
        // 1420 is 72 away from both 1348 and 1492.
        assert_eq!(resolve(1420, &YEARS), Some(1348));
        assert_eq!(resolve(1420, &[1492, 1348]), Some(1492));
    }

    #[test]
    fn empty_has_no_answer() {
        assert_eq!(resolve(1929, &[]), None);
    }

    #[test]
    fn extreme_years_do_not_overflow() {
        assert_eq!(resolve(i32::MIN, &[i32::MAX, 0]), Some(0));
        assert_eq!(resolve(i32::MAX, &[i32::MIN, 0]), Some(0));
    }

    proptest! {
        #[test]
        fn result_minimizes_distance(requested in -5000i32..5000,
                                     available in proptest::collection::vec(-5000i32..5000, 1..16)) {
            let got = resolve(requested, &available).unwrap();
            let best = available.iter().map(|y| (requested - y).abs()).min().unwrap();
            prop_assert_eq!((requested - got).abs(), best);
            let first = available.iter().find(|y| (requested - **y).abs() == best).copied();
            prop_assert_eq!(Some(got), first);
        }
    }
}
