use nalgebra::Vector3;

/// Truncated-octahedron cells store this angle (degrees) for all three axes.
pub const TRUNCATED_OCTAHEDRON_ANGLE: f64 = 109.471_219_0;

/// A periodic unit cell described by edge lengths and angles.
///
/// Lengths are in nm, angles in degrees. The cell converts to three reduced
/// triclinic box vectors in the conventional form: the first vector along x,
/// the second in the xy plane, and each vector reduced against its
/// predecessors so the representation is as close to rectangular as the
/// lattice allows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitCell {
    /// Edge lengths (a, b, c) in nm.
    pub lengths: Vector3<f64>,
    /// Cell angles (alpha, beta, gamma) in degrees.
    pub angles: Vector3<f64>,
}

impl UnitCell {
    pub fn new(lengths: Vector3<f64>, angles: Vector3<f64>) -> Self {
        Self { lengths, angles }
    }

    /// A rectangular cell with the given edge lengths in nm.
    pub fn orthorhombic(a: f64, b: f64, c: f64) -> Self {
        Self::new(Vector3::new(a, b, c), Vector3::new(90.0, 90.0, 90.0))
    }

    /// True when all three cell angles are right angles.
    pub fn is_orthorhombic(&self) -> bool {
        self.angles.iter().all(|&angle| (angle - 90.0).abs() < 1e-10)
    }

    /// Converts the cell to reduced triclinic box vectors.
    ///
    /// The construction follows the crystallographic convention (a along x,
    /// b in the xy plane), then reduces each vector by integer multiples of
    /// the earlier ones. Ties in the reduction round to even so a cell on a
    /// reduction boundary (e.g., the truncated octahedron) is left intact.
    pub fn box_vectors(&self) -> [Vector3<f64>; 3] {
        let (la, lb, lc) = (self.lengths.x, self.lengths.y, self.lengths.z);
        if self.is_orthorhombic() {
            return [
                Vector3::new(la, 0.0, 0.0),
                Vector3::new(0.0, lb, 0.0),
                Vector3::new(0.0, 0.0, lc),
            ];
        }

        let alpha = self.angles.x.to_radians();
        let beta = self.angles.y.to_radians();
        let gamma = self.angles.z.to_radians();

        let a = Vector3::new(la, 0.0, 0.0);
        let mut b = Vector3::new(lb * gamma.cos(), lb * gamma.sin(), 0.0);
        let cx = lc * beta.cos();
        let cy = lc * (alpha.cos() - beta.cos() * gamma.cos()) / gamma.sin();
        let cz = (lc * lc - cx * cx - cy * cy).max(0.0).sqrt();
        let mut c = Vector3::new(cx, cy, cz);

        c -= b * (c.y / b.y).round_ties_even();
        c -= a * (c.x / a.x).round_ties_even();
        b -= a * (b.x / a.x).round_ties_even();

        for v in [&mut b, &mut c] {
            for component in v.iter_mut() {
                if component.abs() < 1e-10 {
                    *component = 0.0;
                }
            }
        }

        [a, b, c]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn orthorhombic_cell_produces_diagonal_vectors() {
        let cell = UnitCell::orthorhombic(3.0, 4.0, 5.0);
        let [a, b, c] = cell.box_vectors();
        assert_eq!(a, Vector3::new(3.0, 0.0, 0.0));
        assert_eq!(b, Vector3::new(0.0, 4.0, 0.0));
        assert_eq!(c, Vector3::new(0.0, 0.0, 5.0));
    }

    #[test]
    fn truncated_octahedron_reproduces_reference_vectors() {
        let edge = 4.489_038_51;
        let cell = UnitCell::new(
            Vector3::new(edge, edge, edge),
            Vector3::new(
                TRUNCATED_OCTAHEDRON_ANGLE,
                TRUNCATED_OCTAHEDRON_ANGLE,
                TRUNCATED_OCTAHEDRON_ANGLE,
            ),
        );
        let [a, b, c] = cell.box_vectors();

        assert!(approx(a.x, 4.489_038_51));
        assert!(approx(a.y, 0.0) && approx(a.z, 0.0));
        assert!(approx(b.x, -1.496_346_049_263_970_6));
        assert!(approx(b.y, 4.232_306_137_924_705));
        assert!(approx(b.z, 0.0));
        assert!(approx(c.x, -1.496_346_049_263_970_6));
        assert!(approx(c.y, -2.116_152_812_842_565));
        assert!(approx(c.z, 3.665_284_779_906_416_5));
    }

    #[test]
    fn truncated_octahedron_preserves_lengths_and_angles() {
        let edge = 4.489_038_51;
        let cell = UnitCell::new(
            Vector3::new(edge, edge, edge),
            Vector3::new(
                TRUNCATED_OCTAHEDRON_ANGLE,
                TRUNCATED_OCTAHEDRON_ANGLE,
                TRUNCATED_OCTAHEDRON_ANGLE,
            ),
        );
        let [a, b, c] = cell.box_vectors();
        let expected_cos = TRUNCATED_OCTAHEDRON_ANGLE.to_radians().cos();

        for v in [&a, &b, &c] {
            assert!(approx(v.norm(), edge));
        }
        assert!(approx(a.dot(&b) / (a.norm() * b.norm()), expected_cos));
        assert!(approx(a.dot(&c) / (a.norm() * c.norm()), expected_cos));
        assert!(approx(b.dot(&c) / (b.norm() * c.norm()), expected_cos));
    }

    #[test]
    fn skewed_cell_is_reduced_against_earlier_vectors() {
        // gamma of 30 degrees puts b.x at 0.866 of a; reduction subtracts one a.
        let cell = UnitCell::new(Vector3::new(1.0, 1.0, 1.0), Vector3::new(90.0, 90.0, 30.0));
        let [a, b, _] = cell.box_vectors();
        assert!(approx(a.x, 1.0));
        assert!(b.x.abs() <= 0.5 * a.x + 1e-9);
    }
}
