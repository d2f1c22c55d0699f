use std::fmt;

/// Status line shown by the viewer shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Ready,
    Loading(String),
    Loaded,
    FirstPointSet,
    MeasurementComplete,
    Error(String),
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready => f.write_str("ready"),
            Self::Loading(name) => write!(f, "loading {name}"),
            Self::Loaded => f.write_str("file loaded"),
            Self::FirstPointSet => f.write_str("point 1 set, choose point 2"),
            Self::MeasurementComplete => f.write_str("measurement complete"),
            Self::Error(msg) => write!(f, "error: {msg}"),
        }
    }
}

/// Distance readout: either empty or the last measured distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceLabel {
    pub distance: Option<f64>,
    pub unit: &'static str,
}

impl fmt::Display for DistanceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.distance {
            Some(d) => write!(f, "Distance: {d:.2} {}", self.unit),
            None => f.write_str("Distance: \u{2013}"),
        }
    }
}
