//! Dense travel-time matrix.

/// A dense n×n travel-time matrix in whole minutes, stored in row-major order.
///
/// Index 0 is always the depot; indices `1..n` are the orders of one window
/// in the order they were handed to the travel-time provider. The matrix may
/// be asymmetric.
///
/// # Examples
///
/// ```
/// use u_dispatch::distance::TimeMatrix;
///
/// let tm = TimeMatrix::from_rows(&[
///     vec![0, 5, 8],
///     vec![5, 0, 3],
///     vec![8, 3, 0],
/// ]).unwrap();
/// assert_eq!(tm.get(0, 1), 5);
/// assert_eq!(tm.size(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeMatrix {
    data: Vec<i64>,
    size: usize,
}

impl TimeMatrix {
    /// Travel time reported for pairs the provider could not route.
    pub const UNREACHABLE: i64 = 9999;

    /// Creates a matrix of the given size, initialized to zero.
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0; size * size],
            size,
        }
    }

    /// Creates a matrix from an explicit row-major n×n grid.
    ///
    /// Returns `None` if the data length doesn't match `size * size` or any
    /// entry is negative.
    pub fn from_data(size: usize, data: Vec<i64>) -> Option<Self> {
        if data.len() != size * size || data.iter().any(|&t| t < 0) {
            return None;
        }
        Some(Self { data, size })
    }

    /// Creates a matrix from nested rows.
    ///
    /// Returns `None` if the rows are ragged, non-square, or contain a
    /// negative entry.
    pub fn from_rows(rows: &[Vec<i64>]) -> Option<Self> {
        let size = rows.len();
        if rows.iter().any(|r| r.len() != size) {
            return None;
        }
        Self::from_data(size, rows.concat())
    }

    /// Returns the travel time from location `from` to location `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> i64 {
        self.data[from * self.size + to]
    }

    /// Sets the travel time from location `from` to location `to`.
    pub fn set(&mut self, from: usize, to: usize, minutes: i64) {
        self.data[from * self.size + to] = minutes;
    }

    /// Returns the first `(from, to)` pair with a negative travel time.
    pub fn first_negative(&self) -> Option<(usize, usize)> {
        self.data
            .iter()
            .position(|&t| t < 0)
            .map(|idx| (idx / self.size, idx % self.size))
    }

    /// Number of locations in this matrix (depot included).
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns `true` if `t(i, j) == t(j, i)` for every pair.
    pub fn is_symmetric(&self) -> bool {
        for i in 0..self.size {
            for j in (i + 1)..self.size {
                if self.get(i, j) != self.get(j, i) {
                    return false;
                }
            }
        }
        true
    }

    /// Extracts the matrix restricted to `nodes`, in the given order.
    ///
    /// `nodes[k]` of this matrix becomes index `k` of the result, so callers
    /// that keep the depot must pass it first.
    pub fn submatrix(&self, nodes: &[usize]) -> Self {
        let n = nodes.len();
        let mut sub = Self::new(n);
        for (i, &from) in nodes.iter().enumerate() {
            for (j, &to) in nodes.iter().enumerate() {
                sub.set(i, j, self.get(from, to));
            }
        }
        sub
    }

    /// Arithmetic mean of `t(from, k)` over `targets`.
    ///
    /// Returns `None` when `targets` is empty.
    pub fn mean_from(&self, from: usize, targets: &[usize]) -> Option<f64> {
        if targets.is_empty() {
            return None;
        }
        let total: i64 = targets.iter().map(|&k| self.get(from, k)).sum();
        Some(total as f64 / targets.len() as f64)
    }

    /// Returns the nearest location to `from` among the given candidates.
    ///
    /// Ties go to the earliest candidate. Returns `None` if `candidates` is empty.
    pub fn nearest_neighbor(&self, from: usize, candidates: &[usize]) -> Option<usize> {
        candidates
            .iter()
            .copied()
            .min_by_key(|&c| self.get(from, c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TimeMatrix {
        TimeMatrix::from_rows(&[vec![0, 5, 8], vec![5, 0, 3], vec![8, 3, 0]]).expect("valid")
    }

    #[test]
    fn test_from_rows() {
        let tm = sample();
        assert_eq!(tm.size(), 3);
        assert_eq!(tm.get(0, 2), 8);
        assert_eq!(tm.get(2, 1), 3);
    }

    #[test]
    fn test_from_rows_ragged() {
        assert!(TimeMatrix::from_rows(&[vec![0, 1], vec![1]]).is_none());
        assert!(TimeMatrix::from_rows(&[vec![0, 1, 2], vec![1, 0, 2]]).is_none());
    }

    #[test]
    fn test_first_negative() {
        let mut tm = TimeMatrix::new(3);
        assert_eq!(tm.first_negative(), None);
        tm.set(2, 1, -4);
        assert_eq!(tm.first_negative(), Some((2, 1)));
    }

    #[test]
    fn test_from_data_invalid() {
        assert!(TimeMatrix::from_data(2, vec![0, 1, 2]).is_none());
        assert!(TimeMatrix::from_data(2, vec![0, -1, 1, 0]).is_none());
    }

    #[test]
    fn test_symmetric() {
        assert!(sample().is_symmetric());
        let mut tm = sample();
        tm.set(0, 1, 7);
        assert!(!tm.is_symmetric());
    }

    #[test]
    fn test_submatrix_reorders() {
        let tm = sample();
        let sub = tm.submatrix(&[0, 2]);
        assert_eq!(sub.size(), 2);
        assert_eq!(sub.get(0, 1), 8);
        assert_eq!(sub.get(1, 0), 8);
        assert_eq!(sub.get(1, 1), 0);
    }

    #[test]
    fn test_mean_from() {
        let tm = sample();
        assert_eq!(tm.mean_from(0, &[1, 2]), Some(6.5));
        assert_eq!(tm.mean_from(0, &[]), None);
    }

    #[test]
    fn test_nearest_neighbor() {
        let tm = sample();
        assert_eq!(tm.nearest_neighbor(0, &[1, 2]), Some(1));
        assert_eq!(tm.nearest_neighbor(0, &[2]), Some(2));
        assert_eq!(tm.nearest_neighbor(0, &[]), None);
    }
}
