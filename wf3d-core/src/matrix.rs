/// Fixed-size row-major matrices
use std::fmt;
use std::ops::{Add, Index, IndexMut, Mul, MulAssign, Sub};

use crate::error::GeometryError;
use crate::vector::{Vector, EPSILON};

/// `N` row vectors of dimension `M`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix<const N: usize, const M: usize> {
    rows: [Vector<M>; N],
}

pub type Mat4 = Matrix<4, 4>;

impl<const N: usize, const M: usize> Matrix<N, M> {
    pub fn new(rows: [[f32; M]; N]) -> Self {
        Self {
            rows: rows.map(Vector::new),
        }
    }

    pub const fn from_rows(rows: [Vector<M>; N]) -> Self {
        Self { rows }
    }

    pub fn from_fn(mut f: impl FnMut(usize, usize) -> f32) -> Self {
        Self {
            rows: std::array::from_fn(|i| Vector::from_fn(|j| f(i, j))),
        }
    }

    pub const fn zeros() -> Self {
        Self {
            rows: [Vector::zeros(); N],
        }
    }

    /// Ones on the main diagonal, zeros elsewhere.
    pub fn identity() -> Self {
        Self::from_fn(|i, j| if i == j { 1.0 } else { 0.0 })
    }

    /// Element `(i, j)`, or a range error if either index is past its dimension.
    pub fn at(&self, i: usize, j: usize) -> Result<f32, GeometryError> {
        self.rows
            .get(i)
            .ok_or(GeometryError::OutOfRange { index: i, len: N })?
            .at(j)
    }

    pub fn row(&self, i: usize) -> Result<Vector<M>, GeometryError> {
        self.rows
            .get(i)
            .copied()
            .ok_or(GeometryError::OutOfRange { index: i, len: N })
    }

    pub fn rows(&self) -> &[Vector<M>; N] {
        &self.rows
    }

    pub fn transpose(&self) -> Matrix<M, N> {
        Matrix::from_fn(|i, j| self.rows[j][i])
    }

    /// Inverse by Gauss-Jordan elimination with partial pivoting.
    ///
    /// Returns `None` for non-square or singular matrices.
    pub fn inverse(&self) -> Option<Self> {
        if N != M {
            return None;
        }
        if self.rows.iter().any(Vector::is_zero) {
            return None;
        }

        let mut a = *self;
        let mut inv = Self::identity();

        for col in 0..N {
            // Pick the row with the largest magnitude in this column.
            let pivot_row = (col..N)
                .max_by(|&r1, &r2| a.rows[r1][col].abs().total_cmp(&a.rows[r2][col].abs()))?;
            let pivot = a.rows[pivot_row][col];
            if pivot == 0.0 {
                return None;
            }

            a.rows.swap(col, pivot_row);
            inv.rows.swap(col, pivot_row);

            let scale = 1.0 / pivot;
            a.rows[col] *= scale;
            inv.rows[col] *= scale;

            for r in 0..N {
                if r == col {
                    continue;
                }
                let factor = a.rows[r][col];
                if factor != 0.0 {
                    let (a_pivot, inv_pivot) = (a.rows[col], inv.rows[col]);
                    a.rows[r] -= a_pivot * factor;
                    inv.rows[r] -= inv_pivot * factor;
                }
            }
        }

        inv.rows
            .iter()
            .all(|row| row.iter().all(|c| c.is_finite()))
            .then_some(inv)
    }

    /// True if the matrix is square and its transpose is its inverse.
    pub fn is_ortho(&self) -> bool {
        N == M && (*self * self.transpose()).approx_eq(&Matrix::identity(), EPSILON)
    }

    pub fn approx_eq(&self, other: &Self, tolerance: f32) -> bool {
        self.rows
            .iter()
            .zip(other.rows.iter())
            .all(|(a, b)| a.approx_eq(b, tolerance))
    }
}

impl<const N: usize, const M: usize> Default for Matrix<N, M> {
    fn default() -> Self {
        Self::zeros()
    }
}

impl<const N: usize, const M: usize> From<nalgebra::SMatrix<f32, N, M>> for Matrix<N, M> {
    fn from(m: nalgebra::SMatrix<f32, N, M>) -> Self {
        Self::from_fn(|i, j| m[(i, j)])
    }
}

impl<const N: usize, const M: usize> From<Matrix<N, M>> for nalgebra::SMatrix<f32, N, M> {
    fn from(m: Matrix<N, M>) -> Self {
        nalgebra::SMatrix::from_fn(|i, j| m.rows[i][j])
    }
}

impl<const N: usize, const M: usize> Index<usize> for Matrix<N, M> {
    type Output = Vector<M>;

    fn index(&self, i: usize) -> &Vector<M> {
        &self.rows[i]
    }
}

impl<const N: usize, const M: usize> IndexMut<usize> for Matrix<N, M> {
    fn index_mut(&mut self, i: usize) -> &mut Vector<M> {
        &mut self.rows[i]
    }
}

impl<const N: usize, const M: usize> Index<(usize, usize)> for Matrix<N, M> {
    type Output = f32;

    fn index(&self, (i, j): (usize, usize)) -> &f32 {
        &self.rows[i][j]
    }
}

impl<const N: usize, const M: usize> IndexMut<(usize, usize)> for Matrix<N, M> {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut f32 {
        &mut self.rows[i][j]
    }
}

impl<const N: usize, const M: usize> Add for Matrix<N, M> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::from_fn(|i, j| self.rows[i][j] + rhs.rows[i][j])
    }
}

impl<const N: usize, const M: usize> Sub for Matrix<N, M> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::from_fn(|i, j| self.rows[i][j] - rhs.rows[i][j])
    }
}

impl<const N: usize, const M: usize> Mul<f32> for Matrix<N, M> {
    type Output = Self;

    fn mul(self, s: f32) -> Self {
        Self {
            rows: self.rows.map(|row| row * s),
        }
    }
}

impl<const N: usize, const M: usize> MulAssign<f32> for Matrix<N, M> {
    fn mul_assign(&mut self, s: f32) {
        for row in &mut self.rows {
            *row *= s;
        }
    }
}

impl<const N: usize, const M: usize> Mul<Vector<M>> for Matrix<N, M> {
    type Output = Vector<N>;

    fn mul(self, v: Vector<M>) -> Vector<N> {
        Vector::from_fn(|i| self.rows[i].dot(&v))
    }
}

impl<const N: usize, const M: usize, const P: usize> Mul<Matrix<M, P>> for Matrix<N, M> {
    type Output = Matrix<N, P>;

    fn mul(self, rhs: Matrix<M, P>) -> Matrix<N, P> {
        Matrix::from_fn(|i, j| (0..M).map(|k| self.rows[i][k] * rhs.rows[k][j]).sum())
    }
}

impl<const N: usize, const M: usize> fmt::Display for Matrix<N, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{row}")?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_at() {
        let m = Matrix::<2, 2>::new([[1.0, 2.0], [3.0, 4.0]]);
        assert_eq!(m.at(0, 0), Ok(1.0));
        assert_eq!(m.at(0, 1), Ok(2.0));
        assert_eq!(m.at(1, 0), Ok(3.0));
        assert_eq!(m.at(1, 1), Ok(4.0));
        assert_eq!(m.at(2, 0), Err(GeometryError::OutOfRange { index: 2, len: 2 }));
        assert_eq!(m.at(0, 2), Err(GeometryError::OutOfRange { index: 2, len: 2 }));
    }

    #[test]
    fn test_inverse_matches_nalgebra() {
        let m = Matrix::<3, 3>::new([[2.0, 1.0, 1.0], [3.0, 2.0, 1.0], [2.0, 1.0, 2.0]]);
        let inv = m.inverse().unwrap();

        let expected: nalgebra::Matrix3<f32> = nalgebra::Matrix3::from(m).try_inverse().unwrap();
        assert!(inv.approx_eq(&Matrix::from(expected), 1e-5));
        assert!((m * inv).approx_eq(&Matrix::identity(), 1e-5));
    }

    #[test]
    fn test_inverse_needs_pivoting() {
        // Zero on the leading diagonal forces a row swap.
        let m = Mat4::new([
            [0.0, 1.0, 0.0, 0.0],
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 0.0, 2.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        let inv = m.inverse().unwrap();
        assert!((m * inv).approx_eq(&Mat4::identity(), 1e-6));
    }

    #[test]
    fn test_inverse_degenerate() {
        let with_zero_row = Matrix::<2, 2>::new([[1.0, 2.0], [0.0, 0.0]]);
        assert_eq!(with_zero_row.inverse(), None);

        let singular = Matrix::<2, 2>::new([[1.0, 2.0], [2.0, 4.0]]);
        assert_eq!(singular.inverse(), None);

        let non_square = Matrix::<2, 3>::new([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
        assert_eq!(non_square.inverse(), None);
    }

    #[test]
    fn test_is_ortho() {
        let permutation = Matrix::<3, 3>::new([[0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0, 0.0]]);
        let general = Matrix::<3, 3>::new([[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]]);
        assert!(permutation.is_ortho());
        assert!(!general.is_ortho());
    }

    #[test]
    fn test_transpose() {
        let m = Matrix::<3, 4>::from_fn(|i, j| (i * 3 + j) as f32);
        let t = m.transpose();
        for i in 0..3 {
            for j in 0..4 {
                assert_eq!(t[(j, i)], m[(i, j)]);
            }
        }
    }

    #[test]
    fn test_operators() {
        let m1 = Matrix::<2, 3>::new([[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
        let m2 = Matrix::<3, 2>::new([[7.0, 8.0], [9.0, 10.0], [11.0, 12.0]]);
        assert_eq!(m1 * m2, Matrix::<2, 2>::new([[58.0, 64.0], [139.0, 154.0]]));

        let mx = Matrix::<2, 2>::new([[1.0, 2.0], [3.0, 4.0]]);
        let doubled = mx * 2.0;
        assert_eq!(doubled, Matrix::new([[2.0, 4.0], [6.0, 8.0]]));
        let mut my = mx;
        my *= 2.0;
        assert_eq!(my, doubled);
        assert_eq!(doubled - mx, mx);
        assert_eq!(mx + mx, doubled);
    }

    #[test]
    fn test_matrix_vector_product() {
        let m = Mat4::new([[1.0, 2.0, 3.0, 4.0]; 4]);
        let v = Vector::new([1.0, 2.0, 3.0, 4.0]);
        let r = m * v;
        for i in 0..4 {
            assert_eq!(r[i], v.dot(&m[i]));
        }
    }

    #[test]
    fn test_display() {
        let m = Matrix::<2, 2>::new([[1.0, 2.0], [3.0, 4.0]]);
        assert_eq!(m.to_string(), "[<1,2>\n<3,4>]");
    }
}
