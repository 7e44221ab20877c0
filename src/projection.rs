//! Geographic → screen coordinate mapping.
//!
//! The base mapping is a plain equirectangular projection. On top of it a
//! [`ViewTransform`] applies rotation and zoom in polar form around the
//! viewport centre, then a pixel pan. This is a flat 2D approximation of a
//! turning globe; it never performs a spherical rotation.

use crate::data::region::ZoomTarget;

/// Project latitude/longitude (degrees) to pixel coordinates.
///
/// A non-positive or non-finite viewport yields `(0.0, 0.0)`.
pub fn project(lat: f64, lon: f64, width: f64, height: f64) -> (f64, f64) {
    if !viewport_is_valid(width, height) {
        return (0.0, 0.0);
    }
    let x = (lon + 180.0) * (width / 360.0);
    let y = (90.0 - lat) * (height / 180.0);
    (x, y)
}

/// Inverse of [`project`]: pixel coordinates back to `(lat, lon)`.
pub fn unproject(x: f64, y: f64, width: f64, height: f64) -> (f64, f64) {
    if !viewport_is_valid(width, height) {
        return (0.0, 0.0);
    }
    let lon = x * 360.0 / width - 180.0;
    let lat = 90.0 - y * 180.0 / height;
    (lat, lon)
}

fn viewport_is_valid(width: f64, height: f64) -> bool {
    width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0
}

/// Wrap an angle in degrees into `(-180, 180]`.
pub fn wrap_degrees(deg: f64) -> f64 {
    let wrapped = (deg + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped == -180.0 {
        180.0
    } else {
        wrapped
    }
}

// ---------------------------------------------------------------------------
// ViewTransform – rotation / zoom / pan state
// ---------------------------------------------------------------------------

/// Rotation (degrees), zoom factor and pan offset (pixels) of the map view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub rotation_deg: f64,
    pub zoom: f64,
    pub pan: (f64, f64),
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ViewTransform {
    pub const IDENTITY: ViewTransform = ViewTransform {
        rotation_deg: 0.0,
        zoom: 1.0,
        pan: (0.0, 0.0),
    };

    /// The transform a zoom target asks for. Rotation comes from the
    /// target longitude, zoom from its scale; pan is reset.
    pub fn toward(target: &ZoomTarget) -> Self {
        ViewTransform {
            rotation_deg: wrap_degrees(-target.center_lon),
            zoom: target.scale,
            pan: (0.0, 0.0),
        }
    }

    /// Project and transform a geographic point.
    pub fn project(&self, lat: f64, lon: f64, width: f64, height: f64) -> (f64, f64) {
        let (x, y) = project(lat, lon, width, height);
        self.apply(x, y, width, height)
    }

    /// Transform an already projected point.
    pub fn apply(&self, x: f64, y: f64, width: f64, height: f64) -> (f64, f64) {
        if !viewport_is_valid(width, height) {
            return (0.0, 0.0);
        }
        let (cx, cy) = (width / 2.0, height / 2.0);
        let (dx, dy) = (x - cx, y - cy);
        let angle = dy.atan2(dx) + self.rotation_deg.to_radians();
        let magnitude = dx.hypot(dy) * self.zoom;
        (
            cx + magnitude * angle.cos() + self.pan.0,
            cy + magnitude * angle.sin() + self.pan.1,
        )
    }

    /// Undo [`ViewTransform::apply`]. A zero zoom collapses everything onto
    /// the centre, so the centre is returned.
    pub fn invert(&self, x: f64, y: f64, width: f64, height: f64) -> (f64, f64) {
        if !viewport_is_valid(width, height) {
            return (0.0, 0.0);
        }
        let (cx, cy) = (width / 2.0, height / 2.0);
        if self.zoom.abs() < f64::EPSILON {
            return (cx, cy);
        }
        let (dx, dy) = (x - self.pan.0 - cx, y - self.pan.1 - cy);
        let angle = dy.atan2(dx) - self.rotation_deg.to_radians();
        let magnitude = dx.hypot(dy) / self.zoom;
        (cx + magnitude * angle.cos(), cy + magnitude * angle.sin())
    }

    /// Screen point back to `(lat, lon)`.
    pub fn unproject(&self, x: f64, y: f64, width: f64, height: f64) -> (f64, f64) {
        let (bx, by) = self.invert(x, y, width, height);
        unproject(bx, by, width, height)
    }

    /// Move a fraction `t` of the way toward `target`.
    ///
    /// Rotation takes the short way round.
    pub fn ease_toward(&mut self, target: &ViewTransform, t: f64) {
        let t = t.clamp(0.0, 1.0);
        let rotation_delta = wrap_degrees(target.rotation_deg - self.rotation_deg);
        self.rotation_deg = wrap_degrees(self.rotation_deg + rotation_delta * t);
        self.zoom += (target.zoom - self.zoom) * t;
        self.pan.0 += (target.pan.0 - self.pan.0) * t;
        self.pan.1 += (target.pan.1 - self.pan.1) * t;
    }

    /// Whether `self` is close enough to `target` to stop easing.
    pub fn settled_at(&self, target: &ViewTransform) -> bool {
        wrap_degrees(target.rotation_deg - self.rotation_deg).abs() < 0.05
            && (target.zoom - self.zoom).abs() < 1e-3
            && (target.pan.0 - self.pan.0).abs() < 0.5
            && (target.pan.1 - self.pan.1).abs() < 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const W: f64 = 800.0;
    const H: f64 = 400.0;

    fn close(a: (f64, f64), b: (f64, f64), tol: f64) -> bool {
        (a.0 - b.0).abs() < tol && (a.1 - b.1).abs() < tol
    }

    #[test]
    fn equirectangular_corners() {
        assert_eq!(project(90.0, -180.0, W, H), (0.0, 0.0));
        assert_eq!(project(-90.0, 180.0, W, H), (W, H));
        assert_eq!(project(0.0, 0.0, W, H), (W / 2.0, H / 2.0));
    }

    #[test]
    fn project_then_unproject_recovers_coordinates() {
        for &(lat, lon) in &[(52.0, 0.0), (-18.0, 178.0), (-40.0, -175.5), (63.2, -68.0)] {
            let (x, y) = project(lat, lon, W, H);
            let back = unproject(x, y, W, H);
            assert!(close(back, (lat, lon), 1e-9), "{lat},{lon} -> {back:?}");
        }
    }

    #[test]
    fn degenerate_viewport_does_not_produce_nan() {
        assert_eq!(project(10.0, 10.0, 0.0, 0.0), (0.0, 0.0));
        assert_eq!(project(10.0, 10.0, f64::NAN, 400.0), (0.0, 0.0));
        assert_eq!(ViewTransform::IDENTITY.project(10.0, 10.0, 0.0, 400.0), (0.0, 0.0));
    }

    #[test]
    fn out_of_range_coordinates_still_project() {
        let (x, y) = project(120.0, 400.0, W, H);
        assert!(x > W && y < 0.0);
    }

    #[test]
    fn identity_transform_is_a_no_op() {
        let p = project(35.0, 110.0, W, H);
        assert!(close(ViewTransform::IDENTITY.apply(p.0, p.1, W, H), p, 1e-9));
    }

    #[test]
    fn rotation_turns_around_viewport_centre() {
        let view = ViewTransform {
            rotation_deg: 90.0,
            ..ViewTransform::IDENTITY
        };
        // 100px right of centre rotates to 100px below centre.
        let out = view.apply(W / 2.0 + 100.0, H / 2.0, W, H);
        assert!(close(out, (W / 2.0, H / 2.0 + 100.0), 1e-9));
    }

    #[test]
    fn zoom_scales_distance_from_centre() {
        let view = ViewTransform {
            zoom: 2.0,
            ..ViewTransform::IDENTITY
        };
        let out = view.apply(W / 2.0 + 10.0, H / 2.0 - 5.0, W, H);
        assert!(close(out, (W / 2.0 + 20.0, H / 2.0 - 10.0), 1e-9));
    }

    #[test]
    fn invert_undoes_apply() {
        let view = ViewTransform {
            rotation_deg: -37.5,
            zoom: 1.7,
            pan: (12.0, -30.0),
        };
        let p = (123.0, 321.0);
        let q = view.apply(p.0, p.1, W, H);
        assert!(close(view.invert(q.0, q.1, W, H), p, 1e-9));
    }

    #[test]
    fn target_rotation_follows_longitude() {
        let target = ZoomTarget {
            center_lat: 10.0,
            center_lon: 150.0,
            scale: 1.5,
        };
        let view = ViewTransform::toward(&target);
        assert!((view.rotation_deg + 150.0).abs() < 1e-9);
        assert_eq!(view.zoom, 1.5);
        let dateline = ZoomTarget {
            center_lon: -180.0,
            ..target
        };
        assert_eq!(ViewTransform::toward(&dateline).rotation_deg, 180.0);
    }

    #[test]
    fn easing_converges_and_takes_short_rotation() {
        let mut view = ViewTransform {
            rotation_deg: 170.0,
            ..ViewTransform::IDENTITY
        };
        let target = ViewTransform {
            rotation_deg: -170.0,
            zoom: 2.0,
            pan: (0.0, 0.0),
        };
        view.ease_toward(&target, 0.5);
        assert!((view.rotation_deg.abs() - 180.0).abs() < 1e-9);
        for _ in 0..60 {
            view.ease_toward(&target, 0.3);
        }
        assert!(view.settled_at(&target));
    }
}
