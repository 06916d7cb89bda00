/// Returns the index of the largest value in `values`.
///
/// A later value only wins with a strictly greater comparison, so ties go to
/// the lowest index. Returns `0` for an empty slice.
pub fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &value) in values.iter().enumerate().skip(1) {
        if value > values[best] {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_largest() {
        assert_eq!(argmax(&[0.1, 0.5, 0.2]), 1);
    }

    #[test]
    fn ties_go_to_lowest_index() {
        assert_eq!(argmax(&[0.25, 0.25, 0.5, 0.5]), 2);
        assert_eq!(argmax(&[1.0, 1.0]), 0);
    }

    #[test]
    fn empty_is_zero() {
        assert_eq!(argmax(&[]), 0);
    }
}
