//! Ray cast option flags.

use serde::{Deserialize, Serialize};

/// Options for [`PhysicsWorld::ray_cast`](crate::PhysicsWorld::ray_cast).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct RayCastFlags(pub u32);

impl RayCastFlags {
    /// Test static geometry and bodies, unsorted.
    pub const NONE: Self = Self(0);

    /// Skip bodies, only static geometry is tested.
    pub const IGNORE_BODIES: Self = Self(1 << 0);

    /// Sort results by distance from the ray origin, closest first.
    pub const SORT_RESULTS: Self = Self(1 << 1);

    /// Check if these flags contain a specific flag.
    #[inline]
    pub fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }
}

impl std::ops::BitOr for RayCastFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}
