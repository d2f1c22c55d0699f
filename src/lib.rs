pub mod error;
pub mod math;
pub mod measure;
pub mod scene;
pub mod snap;
pub mod viewer;

pub use error::{Result, SnapMeasureError};
pub use measure::{MeasureEvent, Measurement, MeasurementSession, MeasurementState, PointOrdinal};
pub use snap::{NearestVertex, VertexSnapIndex};
