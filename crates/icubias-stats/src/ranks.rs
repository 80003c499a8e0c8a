//! Ranking with ties.

/// Ranks starting at 1; tied values share the average of their ranks.
pub fn average_ranks(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
    let mut ranks = vec![0.0; values.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start;
        while end + 1 < order.len() && values[order[end + 1]] == values[order[start]] {
            end += 1;
        }
        let rank = (start + end) as f64 / 2.0 + 1.0;
        for &idx in &order[start..=end] {
            ranks[idx] = rank;
        }
        start = end + 1;
    }
    ranks
}

/// Sizes of the groups of equal values.
pub fn tie_sizes(values: &[f64]) -> Vec<usize> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mut sizes = Vec::new();
    let mut iter = sorted.iter().peekable();
    while let Some(value) = iter.next() {
        let mut size = 1;
        while iter.next_if(|next| *next == value).is_some() {
            size += 1;
        }
        sizes.push(size);
    }
    sizes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ties_share_average_rank() {
        assert_eq!(
            average_ranks(&[10.0, 20.0, 10.0, 30.0, 20.0, 20.0]),
            vec![1.5, 4.0, 1.5, 6.0, 4.0, 4.0]
        );
    }

    #[test]
    fn tie_sizes_count_groups() {
        assert_eq!(tie_sizes(&[1.0, 2.0, 1.0, 2.0, 2.0, 1.0]), vec![3, 3]);
        assert_eq!(tie_sizes(&[1.0, 2.0, 3.0]), vec![1, 1, 1]);
    }
}
