use crate::Vec3;

/// One of the three coordinate axes.
///
/// Split candidates are swept per axis in the fixed order X, Y, Z so that
/// builds are reproducible regardless of thread count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// All three axes in sweep order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Component index for use with vector indexing (0=X, 1=Y, 2=Z).
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// Unit vector pointing along this axis.
    #[inline]
    pub fn unit(self) -> Vec3 {
        match self {
            Axis::X => Vec3::X,
            Axis::Y => Vec3::Y,
            Axis::Z => Vec3::Z,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_order() {
        assert_eq!(Axis::ALL, [Axis::X, Axis::Y, Axis::Z]);
        assert_eq!(Axis::X.index(), 0);
        assert_eq!(Axis::Y.index(), 1);
        assert_eq!(Axis::Z.index(), 2);
    }

    #[test]
    fn test_axis_indexes_vectors() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        for axis in Axis::ALL {
            assert_eq!(v[axis.index()], axis.unit().dot(v));
        }
    }
}
