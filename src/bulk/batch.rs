/// Split `items` into consecutive batches of at most `batch_size`, preserving order.
///
/// A `batch_size` of zero is treated as one; validated requests never carry zero.
pub fn partition<T>(items: &[T], batch_size: usize) -> Vec<&[T]> {
    items.chunks(batch_size.max(1)).collect()
}

#[cfg(test)]
mod tests {
    use super::partition;

    fn sizes(total: usize, batch_size: usize) -> Vec<usize> {
        let items = (0..total).collect::<Vec<_>>();
        partition(&items, batch_size)
            .iter()
            .map(|batch| batch.len())
            .collect()
    }

    #[test]
    fn exact_multiple_yields_full_batches() {
        assert_eq!(sizes(150, 50), vec![50, 50, 50]);
    }

    #[test]
    fn remainder_goes_into_a_smaller_last_batch() {
        assert_eq!(sizes(151, 50), vec![50, 50, 50, 1]);
        assert_eq!(sizes(3, 2), vec![2, 1]);
    }

    #[test]
    fn batch_larger_than_input_yields_single_batch() {
        assert_eq!(sizes(2, 100), vec![2]);
        assert!(sizes(0, 10).is_empty());
    }

    #[test]
    fn order_is_preserved_without_loss_or_duplication() {
        let items = (0..23).collect::<Vec<_>>();
        let flattened = partition(&items, 5)
            .into_iter()
            .flatten()
            .copied()
            .collect::<Vec<_>>();
        assert_eq!(flattened, items);
    }
}
