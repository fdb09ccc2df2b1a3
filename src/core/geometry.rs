//=========================================================================
// Geometry Selection
//=========================================================================
//
// Picks the mesh shape used to display the media.
//
// Policy (priority order):
//   1. explicit override
//   2. cube-map layout          → Box
//   3. flat projection request  → Plane
//   4. sqrt(ratio) <= 2         → Sphere
//   5. finite ratio             → Cylinder
//   6. otherwise                → no geometry (caller skips the mesh)
//
// The sphere/cylinder boundary is exact: a 4:1 panorama is a sphere,
// anything wider is a cylinder.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;
use std::str::FromStr;

use glam::Vec2;
use serde::{Deserialize, Serialize};

//=== GeometryKind ========================================================

/// Mesh shape the media is mapped onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeometryKind {
    Box,
    Sphere,
    Cylinder,
    Plane,
}

impl GeometryKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Box => "box",
            Self::Sphere => "sphere",
            Self::Cylinder => "cylinder",
            Self::Plane => "plane",
        }
    }
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a geometry name does not match any [`GeometryKind`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownGeometry(pub String);

impl fmt::Display for UnknownGeometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown geometry: {:?}", self.0)
    }
}

impl std::error::Error for UnknownGeometry {}

impl FromStr for GeometryKind {
    type Err = UnknownGeometry;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.trim().to_ascii_lowercase().as_str() {
            "box" => Ok(Self::Box),
            "sphere" => Ok(Self::Sphere),
            "cylinder" => Ok(Self::Cylinder),
            "plane" => Ok(Self::Plane),
            _ => Err(UnknownGeometry(name.to_string())),
        }
    }
}

//=== MediaDimensions =====================================================

/// Pixel dimensions of the current media.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MediaDimensions {
    pub width: f32,
    pub height: f32,
}

impl MediaDimensions {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Width over height; `0` when undefined (no media loaded).
    ///
    /// A zero height with a non-zero width yields infinity.
    pub fn ratio(&self) -> f32 {
        let ratio = self.width / self.height;
        if ratio.is_nan() {
            0.0
        } else {
            ratio
        }
    }
}

//=== Selection ===========================================================

/// Mode flags feeding [`select_geometry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GeometryFlags {
    pub override_kind: Option<GeometryKind>,
    pub cube_map: bool,
    pub force_flat: bool,
}

/// Chooses the geometry for media with the given aspect ratio.
pub fn select_geometry(aspect_ratio: f32, flags: GeometryFlags) -> Option<GeometryKind> {
    if let Some(kind) = flags.override_kind {
        Some(kind)
    } else if flags.cube_map {
        Some(GeometryKind::Box)
    } else if flags.force_flat {
        Some(GeometryKind::Plane)
    } else if aspect_ratio.sqrt() <= 2.0 {
        Some(GeometryKind::Sphere)
    } else if aspect_ratio.is_finite() {
        Some(GeometryKind::Cylinder)
    } else {
        None
    }
}

/// Mesh radius for media of the given dimensions, truncated to whole units.
///
/// `current` is the geometry in use before the mesh is (re)built.
pub fn mesh_radius(dimensions: MediaDimensions, current: Option<GeometryKind>) -> f32 {
    let radius = if current == Some(GeometryKind::Cylinder) || dimensions.ratio().sqrt() <= 2.0 {
        dimensions.width / 4.0 / 2.0
    } else {
        dimensions.width / 6.0
    };

    if radius.is_finite() {
        radius.trunc()
    } else {
        0.0
    }
}

//=== MeshDescriptor ======================================================

/// Everything the rendering backend needs to build a mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshDescriptor {
    pub kind: GeometryKind,
    pub radius: f32,

    /// Per-triangle UVs; only populated for the cube-map layout.
    pub face_uvs: Vec<[Vec2; 3]>,
}

impl MeshDescriptor {
    pub fn new(kind: GeometryKind, radius: f32) -> Self {
        let face_uvs = match kind {
            GeometryKind::Box => cube_face_uvs(),
            _ => Vec::new(),
        };
        Self { kind, radius, face_uvs }
    }
}

/// UVs for a 3×2 cube-map atlas, two triangles per face.
///
/// ```text
/// (0, 1)                      (1, 1)
///           ---- ---- ----
///          | f1 | f2 | f3 |
/// (0, .5)   ---- ---- ----    (1, .5)
///          | f4 | f5 | f6 |
///           ---- ---- ----
/// (0, 0)                      (1, 0)
/// ```
fn cube_face_uvs() -> Vec<[Vec2; 3]> {
    const THIRDS: [f32; 4] = [0.0, 1.0 / 3.0, 2.0 / 3.0, 1.0];
    const ROWS: [(f32, f32); 2] = [(1.0, 0.5), (0.5, 0.0)];

    let mut faces = Vec::with_capacity(12);
    for (top, bottom) in ROWS {
        for column in 0..3 {
            let (left, right) = (THIRDS[column], THIRDS[column + 1]);
            let quad = [
                Vec2::new(left, top),
                Vec2::new(left, bottom),
                Vec2::new(right, bottom),
                Vec2::new(right, top),
            ];
            faces.push([quad[0], quad[1], quad[3]]);
            faces.push([quad[1], quad[2], quad[3]]);
        }
    }
    faces
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn flags() -> GeometryFlags {
        GeometryFlags::default()
    }

    //=====================================================================
    // select_geometry()
    //=====================================================================

    #[test]
    fn override_wins_over_everything() {
        let flags = GeometryFlags {
            override_kind: Some(GeometryKind::Cylinder),
            cube_map: true,
            force_flat: true,
        };
        assert_eq!(select_geometry(1.0, flags), Some(GeometryKind::Cylinder));
    }

    #[test]
    fn cube_map_beats_any_ratio() {
        let cube = GeometryFlags { cube_map: true, force_flat: true, ..flags() };
        for ratio in [0.0, 1.0, 2.0, 4.0, 16.0, f32::NAN, f32::INFINITY] {
            assert_eq!(select_geometry(ratio, cube), Some(GeometryKind::Box));
        }
    }

    #[test]
    fn flat_request_beats_sphere_heuristic() {
        let flat = GeometryFlags { force_flat: true, ..flags() };
        assert_eq!(select_geometry(2.0, flat), Some(GeometryKind::Plane));
    }

    #[test]
    fn sphere_cylinder_boundary_is_inclusive() {
        assert_eq!(select_geometry(4.0, flags()), Some(GeometryKind::Sphere));
        assert_eq!(select_geometry(4.0 + 1e-4, flags()), Some(GeometryKind::Cylinder));
        assert_eq!(select_geometry(2.0, flags()), Some(GeometryKind::Sphere));
        assert_eq!(select_geometry(0.0, flags()), Some(GeometryKind::Sphere));
    }

    #[test]
    fn non_finite_ratio_yields_no_geometry() {
        assert_eq!(select_geometry(f32::NAN, flags()), None);
        assert_eq!(select_geometry(f32::INFINITY, flags()), None);
    }

    #[test]
    fn selection_is_pure() {
        let first = select_geometry(6.0, flags());
        for _ in 0..5 {
            assert_eq!(select_geometry(6.0, flags()), first);
        }
    }

    //=====================================================================
    // Dimensions / Radius / Names
    //=====================================================================

    #[test]
    fn ratio_of_missing_media_is_zero() {
        assert_eq!(MediaDimensions::default().ratio(), 0.0);
        assert_eq!(MediaDimensions::new(4096.0, 2048.0).ratio(), 2.0);
    }

    #[test]
    fn radius_depends_on_shape() {
        let equirect = MediaDimensions::new(4000.0, 2000.0);
        assert_eq!(mesh_radius(equirect, None), 500.0);

        let wide = MediaDimensions::new(6100.0, 1000.0);
        assert_eq!(mesh_radius(wide, None), 1016.0);
        assert_eq!(mesh_radius(wide, Some(GeometryKind::Cylinder)), 762.0);
    }

    #[test]
    fn geometry_names_round_trip() {
        for kind in [
            GeometryKind::Box,
            GeometryKind::Sphere,
            GeometryKind::Cylinder,
            GeometryKind::Plane,
        ] {
            assert_eq!(kind.to_string().parse::<GeometryKind>(), Ok(kind));
        }
        assert!(" Sphere ".parse::<GeometryKind>().is_ok());
        assert!("torus".parse::<GeometryKind>().is_err());
    }

    #[test]
    fn box_mesh_carries_twelve_uv_triangles() {
        let mesh = MeshDescriptor::new(GeometryKind::Box, 10.0);
        assert_eq!(mesh.face_uvs.len(), 12);
        assert_eq!(mesh.face_uvs[0][0], Vec2::new(0.0, 1.0));
        assert_eq!(mesh.face_uvs[11][1], Vec2::new(1.0, 0.0));

        assert!(MeshDescriptor::new(GeometryKind::Sphere, 10.0).face_uvs.is_empty());
    }
}
