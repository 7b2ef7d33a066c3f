use super::system::SystemError;
use nalgebra::{Matrix3, Vector3};
use std::fmt;

/// How the engine is told about a box's shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoxShape {
    Cubic,
    Orthogonal,
    CellMatrix,
}

impl fmt::Display for BoxShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Cubic => "cubic",
            Self::Orthogonal => "orthogonal",
            Self::CellMatrix => "cell_matrix",
        })
    }
}

/// A simulation box: three box vectors (stored as matrix rows, in Å) and, for a
/// box that starts from a supplied configuration, its particle count.
#[derive(Debug, Clone, PartialEq)]
pub struct SimBox {
    matrix: Matrix3<f64>,
    n_particles: Option<usize>,
}

impl SimBox {
    pub fn from_matrix(matrix: Matrix3<f64>) -> Result<Self, SystemError> {
        if matrix.iter().any(|v| !v.is_finite()) {
            return Err(SystemError::InvalidBox(
                "box matrix contains non-finite entries".to_string(),
            ));
        }
        if (0..3).any(|i| matrix[(i, i)] <= 0.0) {
            return Err(SystemError::InvalidBox(
                "box matrix diagonal entries must be positive".to_string(),
            ));
        }
        Ok(Self {
            matrix,
            n_particles: None,
        })
    }

    pub fn from_lengths(lengths: [f64; 3]) -> Result<Self, SystemError> {
        Self::from_matrix(Matrix3::from_diagonal(&Vector3::from(lengths)))
    }

    /// Builds a box from `[x, y, z, alpha, beta, gamma]` (Å and degrees).
    ///
    /// The first box vector lies along x and the second in the xy-plane, so the
    /// resulting matrix is lower triangular.
    pub fn from_lengths_and_angles(dimensions: [f64; 6]) -> Result<Self, SystemError> {
        if dimensions.iter().any(|&d| d <= 0.0 || !d.is_finite()) {
            return Err(SystemError::InvalidBox(
                "all box lengths and angles must be > 0".to_string(),
            ));
        }
        let [x, y, z, alpha, beta, gamma] = dimensions;
        if alpha >= 180.0 || beta >= 180.0 || gamma >= 180.0 {
            return Err(SystemError::InvalidBox(
                "all box angles must be < 180 degrees".to_string(),
            ));
        }
        if alpha == 90.0 && beta == 90.0 && gamma == 90.0 {
            return Self::from_lengths([x, y, z]);
        }

        // Round away the ~1e-17 residue cos(90°) leaves behind.
        let trig = |v: f64| (v * 1e15).round() / 1e15;
        let cos_alpha = trig(alpha.to_radians().cos());
        let cos_beta = trig(beta.to_radians().cos());
        let cos_gamma = trig(gamma.to_radians().cos());
        let sin_gamma = trig(gamma.to_radians().sin());

        let mut m = Matrix3::zeros();
        m[(0, 0)] = x;
        m[(1, 0)] = y * cos_gamma;
        m[(1, 1)] = y * sin_gamma;
        m[(2, 0)] = z * cos_beta;
        m[(2, 1)] = z * (cos_alpha - cos_beta * cos_gamma) / sin_gamma;
        let zz_sq = z * z - m[(2, 0)].powi(2) - m[(2, 1)].powi(2);
        if zz_sq <= 0.0 {
            return Err(SystemError::InvalidBox(format!(
                "box angles ({alpha}, {beta}, {gamma}) do not describe a valid cell"
            )));
        }
        m[(2, 2)] = zz_sq.sqrt();
        Self::from_matrix(m)
    }

    /// Marks the box as starting from a configuration holding `n_particles` atoms.
    pub fn with_particles(mut self, n_particles: usize) -> Self {
        self.n_particles = Some(n_particles);
        self
    }

    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.matrix
    }

    pub fn n_particles(&self) -> Option<usize> {
        self.n_particles
    }

    pub fn is_occupied(&self) -> bool {
        self.n_particles.is_some()
    }

    /// Perpendicular extents along x, y and z (the matrix diagonal).
    pub fn extents(&self) -> Vector3<f64> {
        self.matrix.diagonal()
    }

    pub fn shape(&self) -> BoxShape {
        let diagonal = self.matrix.diagonal();
        let off_diagonal = self.matrix - Matrix3::from_diagonal(&diagonal);
        if off_diagonal.iter().any(|&v| v != 0.0) {
            BoxShape::CellMatrix
        } else if diagonal.iter().all(|&v| v == diagonal[0]) {
            BoxShape::Cubic
        } else {
            BoxShape::Orthogonal
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_detects_cubic_orthogonal_and_triclinic_boxes() {
        assert_eq!(SimBox::from_lengths([30.0; 3]).unwrap().shape(), BoxShape::Cubic);
        assert_eq!(
            SimBox::from_lengths([30.0, 30.0, 60.0]).unwrap().shape(),
            BoxShape::Orthogonal
        );
        assert_eq!(
            SimBox::from_lengths_and_angles([30.0, 30.0, 30.0, 90.0, 90.0, 120.0])
                .unwrap()
                .shape(),
            BoxShape::CellMatrix
        );
    }

    #[test]
    fn right_angles_produce_a_diagonal_matrix() {
        let b = SimBox::from_lengths_and_angles([10.0, 20.0, 30.0, 90.0, 90.0, 90.0]).unwrap();
        assert_eq!(*b.matrix(), Matrix3::from_diagonal(&Vector3::new(10.0, 20.0, 30.0)));
    }

    #[test]
    fn hexagonal_cell_places_second_vector_in_xy_plane() {
        let b = SimBox::from_lengths_and_angles([10.0, 10.0, 20.0, 90.0, 90.0, 120.0]).unwrap();
        let m = b.matrix();
        assert!((m[(1, 0)] + 5.0).abs() < 1e-9);
        assert!((m[(1, 1)] - 10.0 * 3f64.sqrt() / 2.0).abs() < 1e-9);
        assert_eq!(m[(2, 0)], 0.0);
        assert_eq!(m[(2, 1)], 0.0);
        assert!((m[(2, 2)] - 20.0).abs() < 1e-9);
    }

    #[test]
    fn invalid_dimensions_are_rejected() {
        assert!(SimBox::from_lengths([10.0, 0.0, 10.0]).is_err());
        assert!(SimBox::from_lengths_and_angles([10.0, 10.0, 10.0, 90.0, 90.0, 180.0]).is_err());
        assert!(SimBox::from_lengths_and_angles([10.0, 10.0, 10.0, 30.0, 150.0, 30.0]).is_err());
    }

    #[test]
    fn with_particles_marks_box_as_occupied() {
        let b = SimBox::from_lengths([10.0; 3]).unwrap();
        assert!(!b.is_occupied());
        let b = b.with_particles(24);
        assert_eq!(b.n_particles(), Some(24));
    }
}
