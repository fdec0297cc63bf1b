//! Wind sway, applied at draw time only

use crate::geometry::Segment;

/// Sway in degrees for a segment at `depth_left` of `total_depth`.
///
/// All segments share one phase (`sin(wind_time)`); the amplitude grows from
/// zero at the trunk base toward `strength` at the twig tips.
pub fn sway_angle(wind: bool, strength: f64, wind_time: f64, depth_left: u32, total_depth: u32) -> f64 {
    if !wind || total_depth == 0 {
        return 0.0;
    }
    let leaf_factor = 1.0 - depth_left as f64 / total_depth as f64;
    wind_time.sin() * (strength * leaf_factor)
}

/// Endpoint of `segment` turned by `angle_deg` about its start point.
/// Positive angles turn counter-clockwise on screen.
pub fn swayed_end(segment: &Segment, angle_deg: f64) -> (f64, f64) {
    if angle_deg == 0.0 {
        return (segment.x2, segment.y2);
    }

    let dx = segment.x2 - segment.x1;
    // Flip y so the rotation happens in math convention
    let dy = segment.y1 - segment.y2;
    let (sin, cos) = angle_deg.to_radians().sin_cos();
    let rx = dx * cos - dy * sin;
    let ry = dx * sin + dy * cos;
    (segment.x1 + rx, segment.y1 - ry)
}
