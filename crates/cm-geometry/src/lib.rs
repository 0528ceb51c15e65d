//! cm-geometry: read-only view-factor data for the comfort map.
//!
//! Provides:
//! - Zone meshes and test points as emitted by the view-factor calculation
//! - `ViewFactorModel` with flat point indexing and per-point lookups
//! - Sky-patch resolutions and the patch containing a sun direction
//! - The seated-occupant projected-area table
//!
//! # Example
//!
//! ```
//! use cm_geometry::{TestPoint, ViewFactorModel, ZoneMesh};
//!
//! let zone = ZoneMesh::indoor("OFFICE", vec!["WALL".into(), "FLOOR".into()])
//!     .with_point(TestPoint::new(vec![0.6, 0.4], 0.0));
//! let model = ViewFactorModel::new(vec![zone]).unwrap();
//!
//! assert_eq!(model.point_count(), 1);
//! assert_eq!(model.zone_of(0), Some(0));
//! ```

pub mod error;
pub mod mesh;
pub mod model;
pub mod projected;
pub mod sky;
pub(crate) mod validate;

pub use error::{GeometryError, GeometryResult};
pub use mesh::{TestPoint, ZoneMesh};
pub use model::ViewFactorModel;
pub use projected::projected_area_factor;
pub use sky::SkyResolution;
