//! Banded matrix storage and direct solver
//!
//! The zone-interface system couples each zone only to its neighbours, so
//! the matrix has two sub- and two super-diagonals. Rows are stored as a
//! window `[i - kl, i + ku + kl]`; the extra `kl` columns hold the fill-in
//! produced by row pivoting.

use ndarray::{Array1, Array2};

/// Square band matrix with `kl` sub-diagonals and `ku` super-diagonals
#[derive(Debug, Clone)]
pub struct BandedMatrix {
    n: usize,
    kl: usize,
    ku: usize,
    /// Row-wise band storage, shape `(n, 2 kl + ku + 1)`
    data: Array2<f64>,
}

impl BandedMatrix {
    /// Create a zero band matrix of dimension `n`
    pub fn zeros(n: usize, kl: usize, ku: usize) -> Self {
        Self {
            n,
            kl,
            ku,
            data: Array2::zeros((n, 2 * kl + ku + 1)),
        }
    }

    /// Dimension of the matrix
    pub fn dim(&self) -> usize {
        self.n
    }

    fn slot(&self, row: usize, col: usize) -> Option<usize> {
        if row >= self.n || col >= self.n || col + self.kl < row || col > row + self.ku + self.kl {
            None
        } else {
            Some(col + self.kl - row)
        }
    }

    /// Set entry `(row, col)`, which must lie inside the declared band
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        assert!(
            row < self.n && col + self.kl >= row && col <= row + self.ku,
            "entry ({}, {}) is outside the band (kl = {}, ku = {})",
            row,
            col,
            self.kl,
            self.ku
        );
        self.data[[row, col + self.kl - row]] = value;
    }

    /// Entry `(row, col)`, zero outside the stored band
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.slot(row, col).map_or(0.0, |k| self.data[[row, k]])
    }

    /// Expand into a dense matrix
    pub fn to_dense(&self) -> Array2<f64> {
        let mut dense = Array2::zeros((self.n, self.n));
        for row in 0..self.n {
            let first = row.saturating_sub(self.kl);
            let last = (row + self.ku).min(self.n.saturating_sub(1));
            for col in first..=last {
                dense[[row, col]] = self.get(row, col);
            }
        }
        dense
    }

    /// Solve `A x = rhs` by Gaussian elimination with row partial pivoting
    ///
    /// A zero pivot is not reported: the affected unknowns come back
    /// non-finite and the caller decides how to treat them.
    pub fn solve(&self, rhs: &Array1<f64>) -> Array1<f64> {
        assert_eq!(rhs.len(), self.n, "right-hand side has wrong length");

        let mut a = self.data.clone();
        let mut b = rhs.clone();
        let n = self.n;
        let kl = self.kl;
        let width = kl + self.ku;
        // column `col` of row `row` lives at `col + kl - row`
        let at = |row: usize, col: usize| col + kl - row;

        for c in 0..n {
            let last_row = (c + kl).min(n - 1);
            let last_col = (c + width).min(n - 1);

            let mut pivot = c;
            let mut pivot_abs = a[[c, at(c, c)]].abs();
            for r in (c + 1)..=last_row {
                let candidate = a[[r, at(r, c)]].abs();
                if candidate > pivot_abs {
                    pivot = r;
                    pivot_abs = candidate;
                }
            }

            if pivot != c {
                for col in c..=last_col {
                    let upper = a[[c, at(c, col)]];
                    a[[c, at(c, col)]] = a[[pivot, at(pivot, col)]];
                    a[[pivot, at(pivot, col)]] = upper;
                }
                b.swap(c, pivot);
            }

            let diag = a[[c, at(c, c)]];
            for r in (c + 1)..=last_row {
                let factor = a[[r, at(r, c)]] / diag;
                if factor == 0.0 {
                    continue;
                }
                a[[r, at(r, c)]] = 0.0;
                for col in (c + 1)..=last_col {
                    a[[r, at(r, col)]] -= factor * a[[c, at(c, col)]];
                }
                b[r] -= factor * b[c];
            }
        }

        let mut x = Array1::zeros(n);
        for r in (0..n).rev() {
            let last_col = (r + width).min(n - 1);
            let mut acc = b[r];
            for col in (r + 1)..=last_col {
                acc -= a[[r, at(r, col)]] * x[col];
            }
            x[r] = acc / a[[r, at(r, r)]];
        }
        x
    }
}
