use std::fmt;

use tracing::debug;

use crate::math::Point3;
use crate::snap::VertexSnapIndex;

/// Observable state of a [`MeasurementSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasurementState {
    /// No point stored.
    Empty,
    /// First point stored, waiting for the second.
    OnePoint,
    /// A measurement was just completed; the next hit starts a new one.
    Complete,
}

/// Order of a snapped point within a measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointOrdinal {
    First,
    Second,
}

impl PointOrdinal {
    /// One-based position, as shown to the user.
    #[must_use]
    pub fn number(self) -> u8 {
        match self {
            Self::First => 1,
            Self::Second => 2,
        }
    }
}

impl fmt::Display for PointOrdinal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "point {}", self.number())
    }
}

/// A completed two-point measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    /// First snapped point.
    pub a: Point3,
    /// Second snapped point.
    pub b: Point3,
    /// Euclidean distance between `a` and `b`, in input units.
    pub distance: f64,
}

impl Measurement {
    /// Creates a measurement between two points.
    #[must_use]
    pub fn between(a: Point3, b: Point3) -> Self {
        Self {
            a,
            b,
            distance: nalgebra::distance(&a, &b),
        }
    }
}

/// Event emitted by the session for the UI layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MeasureEvent {
    /// A point was snapped and stored.
    PointSet {
        ordinal: PointOrdinal,
        position: Point3,
    },
    /// The second point was snapped; the measurement is complete.
    MeasurementComplete(Measurement),
    /// The session was reset.
    Cleared,
}

/// Accumulates up to two snapped points and measures the distance between
/// them.
///
/// The first hit sets point one, the second completes the measurement.
/// Everything the UI has to draw is reported back through [`MeasureEvent`];
/// the session renders nothing and owns no timers.
#[derive(Debug, Clone, Default)]
pub struct MeasurementSession {
    first: Option<Point3>,
    last: Option<Measurement>,
}

impl MeasurementSession {
    /// Creates a new session in the [`MeasurementState::Empty`] state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> MeasurementState {
        match (self.first, self.last) {
            (Some(_), _) => MeasurementState::OnePoint,
            (None, Some(_)) => MeasurementState::Complete,
            (None, None) => MeasurementState::Empty,
        }
    }

    /// Snapped points held for the measurement in progress (zero or one).
    #[must_use]
    pub fn points(&self) -> &[Point3] {
        self.first.as_slice()
    }

    /// The most recently completed measurement, kept until the next hit or
    /// reset.
    #[must_use]
    pub fn last_measurement(&self) -> Option<&Measurement> {
        self.last.as_ref()
    }

    /// Snaps `hit` to the nearest indexed vertex and advances the session.
    ///
    /// Returns `None` without changing state if the index is empty.
    pub fn submit_hit(&mut self, index: &VertexSnapIndex, hit: &Point3) -> Option<MeasureEvent> {
        let snapped = index.nearest(hit)?;

        let event = match self.first.take() {
            None => {
                self.last = None;
                self.first = Some(snapped);
                MeasureEvent::PointSet {
                    ordinal: PointOrdinal::First,
                    position: snapped,
                }
            }
            Some(first) => {
                let measurement = Measurement::between(first, snapped);
                self.last = Some(measurement);
                MeasureEvent::MeasurementComplete(measurement)
            }
        };
        debug!(state = ?self.state(), ?event, "measurement advanced");
        Some(event)
    }

    /// Clears stored points and the last measurement.
    pub fn reset(&mut self) -> MeasureEvent {
        self.first = None;
        self.last = None;
        debug!("measurement session reset");
        MeasureEvent::Cleared
    }
}
