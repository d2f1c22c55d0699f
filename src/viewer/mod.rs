pub mod config;
pub mod status;

pub use config::{Rgb, ViewerConfig};
pub use status::{DistanceLabel, Status};

use std::time::Instant;

use tracing::{debug, info};

use crate::error::{ConfigError, SceneError};
use crate::math::Point3;
use crate::measure::{MeasureEvent, MeasurementSession, PointOrdinal};
use crate::scene::Model;
use crate::snap::VertexSnapIndex;

/// Mouse button of a pointer-down event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// A sphere marker to draw at a snapped point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    pub ordinal: PointOrdinal,
    pub position: Point3,
    pub color: Rgb,
    pub radius: f64,
}

/// Owns the snap index and measurement session for the currently loaded
/// model and turns clicks into markers and status updates.
///
/// The shell owns rendering, file loading and ray casting. It forwards loaded
/// models, pointer clicks and frame ticks here, then draws whatever
/// [`markers`](Self::markers), [`status`](Self::status) and
/// [`distance_label`](Self::distance_label) report.
#[derive(Debug)]
pub struct ViewerController {
    config: ViewerConfig,
    index: VertexSnapIndex,
    session: MeasurementSession,
    markers: Vec<Marker>,
    status: Status,
    distance: Option<f64>,
    clear_at: Option<Instant>,
    loaded: bool,
}

impl ViewerController {
    /// Creates a controller with no model loaded.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: ViewerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            index: VertexSnapIndex::new(),
            session: MeasurementSession::new(),
            markers: Vec::new(),
            status: Status::Ready,
            distance: None,
            clear_at: None,
            loaded: false,
        })
    }

    /// Fits `model` to the configured extent and makes it the measured model.
    ///
    /// # Errors
    ///
    /// Returns an error if the model cannot be fitted; the previous model
    /// stays loaded in that case.
    pub fn load_model(&mut self, model: &mut Model) -> Result<(), SceneError> {
        model.fit_to_extent(self.config.fit_extent)?;
        info!(
            parts = model.part_count(),
            vertices = model.vertex_count(),
            "model loaded"
        );
        self.load_vertices(model.world_vertices());
        Ok(())
    }

    /// Makes a flat list of world-space vertices the measured model.
    ///
    /// The index is rebuilt before the session is reset, and any markers from
    /// the previous model are dropped.
    pub fn load_vertices<I>(&mut self, vertices: I)
    where
        I: IntoIterator<Item = Point3>,
    {
        self.index.build(vertices);
        self.session.reset();
        self.clear_markers();
        self.distance = None;
        self.status = Status::Loaded;
        self.loaded = true;
    }

    /// Drops the current model.
    pub fn unload(&mut self) {
        self.index.clear();
        self.session.reset();
        self.clear_markers();
        self.distance = None;
        self.status = Status::Ready;
        self.loaded = false;
    }

    /// Reports that the shell started reading a file.
    pub fn set_loading(&mut self, name: impl Into<String>) {
        self.status = Status::Loading(name.into());
    }

    /// Reports a loader failure. The loaded model, if any, is kept.
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.status = Status::Error(message.into());
    }

    /// Handles a pointer-down event.
    ///
    /// `hit` is the first surface intersection of the pointer ray, if any.
    /// Clicks with a non-primary button, clicks that missed the model and
    /// clicks before any model is loaded are ignored.
    pub fn pointer_down(
        &mut self,
        button: PointerButton,
        hit: Option<&Point3>,
        now: Instant,
    ) -> Option<MeasureEvent> {
        if !self.loaded || button != PointerButton::Primary {
            return None;
        }
        let hit = hit?;
        let event = self.session.submit_hit(&self.index, hit)?;

        // `submit_hit` only reports `PointSet` or `MeasurementComplete`.
        if let MeasureEvent::PointSet { ordinal, position } = event {
            // Starting over while the previous pair is still on screen.
            if self.clear_at.take().is_some() {
                self.markers.clear();
            }
            self.push_marker(ordinal, position);
            self.status = Status::FirstPointSet;
        } else if let MeasureEvent::MeasurementComplete(m) = event {
            self.push_marker(PointOrdinal::Second, m.b);
            self.distance = Some(m.distance);
            self.status = Status::MeasurementComplete;
            self.clear_at = now.checked_add(self.config.marker_clear_delay);
            info!(distance = m.distance, "measurement complete");
        }
        Some(event)
    }

    /// Advances time; removes the markers once the post-measurement delay has
    /// elapsed. Returns `true` if markers were removed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.clear_at {
            Some(deadline) if now >= deadline => {
                self.clear_markers();
                debug!("measurement markers expired");
                true
            }
            _ => false,
        }
    }

    /// Abandons the measurement in progress, removes all markers and clears
    /// the distance readout.
    pub fn reset_measurement(&mut self) -> MeasureEvent {
        self.clear_markers();
        self.distance = None;
        self.status = if self.loaded {
            Status::Loaded
        } else {
            Status::Ready
        };
        self.session.reset()
    }

    /// Markers to draw, in click order.
    #[must_use]
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// Current status line.
    #[must_use]
    pub fn status(&self) -> &Status {
        &self.status
    }

    /// Current distance readout.
    #[must_use]
    pub fn distance_label(&self) -> DistanceLabel {
        DistanceLabel {
            distance: self.distance,
            unit: self.config.unit_suffix,
        }
    }

    /// Deadline at which the current markers will be removed, if scheduled.
    #[must_use]
    pub fn pending_clear(&self) -> Option<Instant> {
        self.clear_at
    }

    /// Returns `true` once a model has been loaded.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// The snap index of the loaded model.
    #[must_use]
    pub fn index(&self) -> &VertexSnapIndex {
        &self.index
    }

    /// The measurement session.
    #[must_use]
    pub fn session(&self) -> &MeasurementSession {
        &self.session
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    fn push_marker(&mut self, ordinal: PointOrdinal, position: Point3) {
        let color = match ordinal {
            PointOrdinal::First => self.config.first_marker_color,
            PointOrdinal::Second => self.config.second_marker_color,
        };
        self.markers.push(Marker {
            ordinal,
            position,
            color,
            radius: self.config.marker_radius,
        });
    }

    fn clear_markers(&mut self) {
        self.markers.clear();
        self.clear_at = None;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::measure::MeasurementState;
    use crate::scene::MeshPart;
    use approx::assert_relative_eq;
    use std::time::Duration;

    fn loaded_controller() -> ViewerController {
        let mut viewer = ViewerController::new(ViewerConfig::default()).unwrap();
        viewer.load_vertices([
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(10.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 5.0),
        ]);
        viewer
    }

    #[test]
    fn new_controller_is_ready_and_unloaded() {
        let viewer = ViewerController::new(ViewerConfig::default()).unwrap();
        assert_eq!(*viewer.status(), Status::Ready);
        assert!(!viewer.is_loaded());
        assert!(viewer.markers().is_empty());
        assert_eq!(viewer.distance_label().to_string(), "Distance: \u{2013}");
    }

    #[test]
    fn rejects_invalid_config() {
        let config = ViewerConfig {
            marker_radius: -1.0,
            ..ViewerConfig::default()
        };
        assert!(ViewerController::new(config).is_err());
    }

    #[test]
    fn clicks_before_load_are_ignored() {
        let mut viewer = ViewerController::new(ViewerConfig::default()).unwrap();
        let now = Instant::now();
        assert!(viewer
            .pointer_down(PointerButton::Primary, Some(&Point3::origin()), now)
            .is_none());
        assert!(viewer.markers().is_empty());
    }

    #[test]
    fn non_primary_and_missed_clicks_are_ignored() {
        let mut viewer = loaded_controller();
        let now = Instant::now();
        assert!(viewer
            .pointer_down(PointerButton::Secondary, Some(&Point3::origin()), now)
            .is_none());
        assert!(viewer
            .pointer_down(PointerButton::Middle, Some(&Point3::origin()), now)
            .is_none());
        assert!(viewer.pointer_down(PointerButton::Primary, None, now).is_none());
        assert_eq!(viewer.session().state(), MeasurementState::Empty);
        assert_eq!(*viewer.status(), Status::Loaded);
    }

    #[test]
    fn two_clicks_place_colored_markers_and_distance() {
        let mut viewer = loaded_controller();
        let now = Instant::now();

        viewer.pointer_down(PointerButton::Primary, Some(&Point3::new(0.4, 0.0, 0.0)), now);
        assert_eq!(*viewer.status(), Status::FirstPointSet);
        assert_eq!(viewer.markers().len(), 1);
        assert_eq!(viewer.markers()[0].color, 0xff_0000);
        assert_eq!(viewer.markers()[0].position, Point3::origin());

        let event =
            viewer.pointer_down(PointerButton::Primary, Some(&Point3::new(9.5, 0.5, 0.0)), now);
        let Some(MeasureEvent::MeasurementComplete(m)) = event else {
            panic!("expected completed measurement, got {event:?}");
        };
        assert_relative_eq!(m.distance, 10.0, epsilon = 1e-6);
        assert_eq!(*viewer.status(), Status::MeasurementComplete);
        assert_eq!(viewer.markers().len(), 2);
        assert_eq!(viewer.markers()[1].color, 0x00_00ff);
        assert_eq!(viewer.markers()[1].position, Point3::new(10.0, 0.0, 0.0));
        assert_eq!(viewer.distance_label().to_string(), "Distance: 10.00 mm");
        assert_eq!(viewer.pending_clear(), Some(now + Duration::from_secs(3)));
    }

    #[test]
    fn markers_clear_after_delay() {
        let mut viewer = loaded_controller();
        let now = Instant::now();
        viewer.pointer_down(PointerButton::Primary, Some(&Point3::origin()), now);
        viewer.pointer_down(PointerButton::Primary, Some(&Point3::new(10.0, 0.0, 0.0)), now);

        assert!(!viewer.tick(now + Duration::from_secs(1)));
        assert_eq!(viewer.markers().len(), 2);

        assert!(viewer.tick(now + Duration::from_secs(3)));
        assert!(viewer.markers().is_empty());
        assert!(viewer.pending_clear().is_none());
        // The readout stays until the next measurement.
        assert_eq!(viewer.distance_label().to_string(), "Distance: 10.00 mm");
        assert!(!viewer.tick(now + Duration::from_secs(10)));
    }

    #[test]
    fn new_click_during_delay_replaces_old_markers() {
        let mut viewer = loaded_controller();
        let now = Instant::now();
        viewer.pointer_down(PointerButton::Primary, Some(&Point3::origin()), now);
        viewer.pointer_down(PointerButton::Primary, Some(&Point3::new(10.0, 0.0, 0.0)), now);

        let later = now + Duration::from_secs(1);
        viewer.pointer_down(PointerButton::Primary, Some(&Point3::new(0.0, 0.0, 5.0)), later);
        assert_eq!(viewer.markers().len(), 1);
        assert_eq!(viewer.markers()[0].ordinal, PointOrdinal::First);
        assert!(viewer.pending_clear().is_none());
        assert!(!viewer.tick(now + Duration::from_secs(5)));
        assert_eq!(viewer.markers().len(), 1);
    }

    #[test]
    fn reload_resets_session_and_markers() {
        let mut viewer = loaded_controller();
        let now = Instant::now();
        viewer.pointer_down(PointerButton::Primary, Some(&Point3::origin()), now);
        assert_eq!(viewer.session().state(), MeasurementState::OnePoint);

        viewer.load_vertices([Point3::new(50.0, 0.0, 0.0)]);
        assert_eq!(viewer.session().state(), MeasurementState::Empty);
        assert!(viewer.markers().is_empty());
        assert_eq!(*viewer.status(), Status::Loaded);
        assert_eq!(viewer.index().len(), 1);

        viewer.pointer_down(PointerButton::Primary, Some(&Point3::origin()), now);
        assert_eq!(viewer.markers()[0].position, Point3::new(50.0, 0.0, 0.0));
    }

    #[test]
    fn load_model_fits_before_indexing() {
        let mut viewer = ViewerController::new(ViewerConfig::default()).unwrap();
        let mut model = Model::new();
        model.add_part(
            MeshPart::new(vec![Point3::new(0.0, 0.0, 0.0), Point3::new(2.0, 0.0, 0.0)]).unwrap(),
        );
        viewer.load_model(&mut model).unwrap();

        let now = Instant::now();
        viewer.pointer_down(PointerButton::Primary, Some(&Point3::new(-90.0, 0.0, 0.0)), now);
        let event =
            viewer.pointer_down(PointerButton::Primary, Some(&Point3::new(90.0, 0.0, 0.0)), now);
        let Some(MeasureEvent::MeasurementComplete(m)) = event else {
            panic!("expected completed measurement, got {event:?}");
        };
        assert_relative_eq!(m.a, Point3::new(-100.0, 0.0, 0.0), epsilon = 1e-9);
        assert_relative_eq!(m.distance, 200.0, epsilon = 1e-9);
    }

    #[test]
    fn empty_model_loads_but_never_measures() {
        let mut viewer = ViewerController::new(ViewerConfig::default()).unwrap();
        viewer.load_model(&mut Model::new()).unwrap();
        assert!(viewer.is_loaded());
        assert!(viewer
            .pointer_down(PointerButton::Primary, Some(&Point3::origin()), Instant::now())
            .is_none());
    }

    #[test]
    fn explicit_reset_and_unload() {
        let mut viewer = loaded_controller();
        let now = Instant::now();
        viewer.pointer_down(PointerButton::Primary, Some(&Point3::origin()), now);
        assert_eq!(*viewer.status(), Status::FirstPointSet);
        assert_eq!(viewer.reset_measurement(), MeasureEvent::Cleared);
        assert!(viewer.markers().is_empty());
        assert_eq!(viewer.session().state(), MeasurementState::Empty);
        assert_eq!(*viewer.status(), Status::Loaded);

        viewer.unload();
        assert!(!viewer.is_loaded());
        assert!(viewer.index().is_empty());
        assert_eq!(*viewer.status(), Status::Ready);
    }

    #[test]
    fn reset_after_measurement_clears_readout() {
        let mut viewer = loaded_controller();
        let now = Instant::now();
        viewer.pointer_down(PointerButton::Primary, Some(&Point3::origin()), now);
        viewer.pointer_down(PointerButton::Primary, Some(&Point3::new(10.0, 0.0, 0.0)), now);
        assert_eq!(*viewer.status(), Status::MeasurementComplete);

        viewer.reset_measurement();
        assert_eq!(*viewer.status(), Status::Loaded);
        assert_eq!(viewer.distance_label().to_string(), "Distance: \u{2013}");
        assert!(viewer.pending_clear().is_none());
    }

    #[test]
    fn reset_before_load_keeps_ready_status() {
        let mut viewer = ViewerController::new(ViewerConfig::default()).unwrap();
        viewer.reset_measurement();
        assert_eq!(*viewer.status(), Status::Ready);
    }

    #[test]
    fn loader_status_updates() {
        let mut viewer = loaded_controller();
        viewer.set_loading("bracket.obj");
        assert_eq!(viewer.status().to_string(), "loading bracket.obj");
        viewer.set_error("OBJ parse error");
        assert_eq!(viewer.status().to_string(), "error: OBJ parse error");
        assert!(viewer.is_loaded());
    }
}
