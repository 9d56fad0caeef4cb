/// Finds the index of the last element in a sorted slice which is less than
/// or equal to the test value. Returns 0 when the test value precedes the
/// whole slice, and the last index when it follows it. Used to locate the
/// bracketing entry in a cumulative arc-length table.
pub fn preceding_index_search(slice: &[f64], test_value: f64) -> usize {
    if slice.len() <= 1 {
        return 0;
    }

    let upper = slice.partition_point(|v| *v <= test_value);
    if upper == 0 {
        0
    } else {
        (upper - 1).min(slice.len() - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::prelude::*;
    use test_case::test_case;

    fn naive(slice: &[f64], test_value: f64) -> usize {
        if slice.len() <= 1 || slice[1] > test_value {
            return 0;
        }

        if slice[slice.len() - 1] <= test_value {
            return slice.len() - 1;
        }

        for (i, v) in slice.iter().skip(1).enumerate() {
            if *v > test_value {
                return i;
            }
        }

        slice.len() - 1
    }

    #[test_case(0, -1.0)]
    #[test_case(0, 0.05)]
    #[test_case(1, 0.1)]
    #[test_case(2, 0.25)]
    #[test_case(4, 0.5)]
    fn test_preceding_index(e: usize, v: f64) {
        let test = [0.0, 0.1, 0.2, 0.3, 0.4];
        assert_eq!(e, preceding_index_search(&test, v));
    }

    #[test]
    fn test_search_matches_naive_random() {
        let mut rng = rand::thread_rng();
        for _ in 0..100 {
            let count: usize = rng.gen_range(2..200);
            let mut values: Vec<f64> =
                (0..count).map(|_| rng.gen_range(-10.0..10.0)).collect();
            values.sort_by(|a, b| a.partial_cmp(b).unwrap());

            for _ in 0..100 {
                let test = rng.gen_range(-11.0..11.0);
                assert_eq!(naive(&values, test), preceding_index_search(&values, test));
            }
        }
    }
}
