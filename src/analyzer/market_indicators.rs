/// Trailing simple moving average over integer volumes.
///
/// Element `i` of the result is the mean of `data[i..i + window_size]`, so the
/// output is `window_size - 1` shorter than the input. Returns an empty vector
/// when the window is zero or longer than the data.
pub fn rolling_mean(data: &[u64], window_size: usize) -> Vec<f64> {
    if window_size == 0 || data.len() < window_size {
        return Vec::new();
    }
    data.windows(window_size)
        .map(|window| {
            // summed as integers so the mean does not depend on accumulation order
            let total: u128 = window.iter().map(|&v| u128::from(v)).sum();
            total as f64 / window_size as f64
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_each_window() {
        let means = rolling_mean(&[1, 2, 3, 4, 5], 3);
        assert_eq!(means, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn short_input_or_zero_window_gives_nothing() {
        assert!(rolling_mean(&[1, 2], 3).is_empty());
        assert!(rolling_mean(&[1, 2, 3], 0).is_empty());
        assert!(rolling_mean(&[], 1).is_empty());
    }

    #[test]
    fn huge_volumes_do_not_overflow() {
        let data = vec![u64::MAX; 4];
        let means = rolling_mean(&data, 4);
        assert_eq!(means.len(), 1);
        assert!((means[0] - u64::MAX as f64).abs() / (u64::MAX as f64) < 1e-12);
    }
}
