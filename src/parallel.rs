//! Data-parallel helpers with a sequential fallback.
//!
//! With the `parallel` feature the work is spread over the global `rayon`
//! pool; without it the same calls run on the current thread.

/// Maps `f` over `data`, preserving order.
#[cfg(feature = "parallel")]
pub fn parallel_map<T, U, F>(data: &[T], f: F) -> Vec<U>
where
    T: Sync,
    U: Send,
    F: Fn(&T) -> U + Sync + Send,
{
    use rayon::prelude::*;
    data.par_iter().map(f).collect()
}

/// Maps `f` over `data`, preserving order.
#[cfg(not(feature = "parallel"))]
pub fn parallel_map<T, U, F>(data: &[T], f: F) -> Vec<U>
where
    F: Fn(&T) -> U,
{
    data.iter().map(f).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_is_preserved() {
        let squares = parallel_map(&[1, 2, 3, 4], |x| x * x);
        assert_eq!(squares, vec![1, 4, 9, 16]);
    }
}
