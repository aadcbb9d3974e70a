// Wheel geometry
// Slice layout and pointer hit-testing shared by the engine and the renderer

use std::f64::consts::{PI, TAU};

/// Angle of the fixed pointer: top of the wheel, with 0 along +x and angles
/// increasing clockwise.
pub const POINTER_ANGLE: f64 = 1.5 * PI;

/// Angular width of one slice for a wheel with `count` slices.
pub fn slice_angle(count: usize) -> f64 {
    TAU / count.max(1) as f64
}

/// Normalizes an angle into `[0, 2π)`.
pub fn normalize(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Start and end angle of slice `index`, both normalized. The end is
/// exclusive, and `start > end` means the slice wraps through zero.
pub fn slice_bounds(rotation: f64, count: usize, index: usize) -> (f64, f64) {
    let slice = slice_angle(count);
    let start = normalize(rotation + index as f64 * slice);
    let end = normalize(start + slice);
    (start, end)
}

/// Half-open containment test that handles intervals wrapping through zero.
pub fn interval_contains(start: f64, end: f64, angle: f64) -> bool {
    if start < end {
        angle >= start && angle < end
    } else {
        angle >= start || angle < end
    }
}

/// Index of the slice lying under `angle` when the wheel rests at `rotation`.
///
/// Slices are scanned in order and the first one whose `[start, end)` interval
/// contains the angle wins. If rounding leaves the angle in no interval, the
/// index is derived arithmetically instead, so a wheel with at least one slice
/// always yields exactly one index.
pub fn slice_at(rotation: f64, count: usize, angle: f64) -> usize {
    if count <= 1 {
        return 0;
    }

    let angle = normalize(angle);
    (0..count)
        .find(|&index| {
            let (start, end) = slice_bounds(rotation, count, index);
            interval_contains(start, end, angle)
        })
        .unwrap_or_else(|| {
            let offset = normalize(angle - rotation);
            ((offset / slice_angle(count)).floor() as usize).min(count - 1)
        })
}

/// Index of the slice under the pointer.
pub fn winner_index(rotation: f64, count: usize) -> usize {
    slice_at(rotation, count, POINTER_ANGLE)
}

/// Number of slice boundaries passed when the wheel turns from `rotation` by
/// `delta` radians (`delta >= 0`).
pub fn boundaries_crossed(rotation: f64, delta: f64, count: usize) -> u32 {
    if delta <= 0.0 {
        return 0;
    }
    let slice = slice_angle(count);
    let offset = normalize(rotation) % slice;
    ((offset + delta) / slice).floor() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deg(degrees: f64) -> f64 {
        degrees.to_radians()
    }

    #[test]
    fn test_five_items_at_ten_degrees() {
        // Slice 3 spans [226°, 298°) and holds the pointer at 270°
        assert_eq!(winner_index(deg(10.0), 5), 3);

        let (start, end) = slice_bounds(deg(10.0), 5, 3);
        assert!((start.to_degrees() - 226.0).abs() < 1e-9);
        assert!((end.to_degrees() - 298.0).abs() < 1e-9);
    }

    #[test]
    fn test_wrapping_interval() {
        // Slice 1 of 2 at rotation 100° covers [280°, 100°) through zero
        let (start, end) = slice_bounds(deg(100.0), 2, 1);
        assert!(start > end);
        assert!(interval_contains(start, end, deg(0.0)));
        assert!(interval_contains(start, end, deg(350.0)));
        assert!(!interval_contains(start, end, deg(180.0)));
        assert_eq!(winner_index(deg(100.0), 2), 0);
        assert_eq!(winner_index(deg(300.0), 2), 1);
    }

    #[test]
    fn test_pointer_on_boundary_uses_half_open_rule() {
        // At rest the boundary between slices 2 and 3 sits exactly on the
        // pointer: the pointer belongs to the slice that starts there.
        assert_eq!(slice_bounds(0.0, 4, 3).0, POINTER_ANGLE);
        assert_eq!(winner_index(0.0, 4), 3);
    }

    #[test]
    fn test_winner_is_deterministic_and_in_range() {
        for count in 2..=50 {
            for step in 0..360 {
                let rotation = deg(step as f64 + 0.37);
                let first = winner_index(rotation, count);
                assert!(first < count);
                assert_eq!(first, winner_index(rotation, count));
            }
        }
    }

    #[test]
    fn test_exactly_one_slice_contains_pointer() {
        for count in 2..=12 {
            for step in 0..720 {
                let rotation = deg(step as f64 * 0.5 + 0.1);
                let matches = (0..count)
                    .filter(|&i| {
                        let (start, end) = slice_bounds(rotation, count, i);
                        interval_contains(start, end, POINTER_ANGLE)
                    })
                    .count();
                assert_eq!(matches, 1, "count={count} rotation={rotation}");
            }
        }
    }

    #[test]
    fn test_boundaries_crossed() {
        let slice = slice_angle(4);
        assert_eq!(boundaries_crossed(0.1, 0.2, 4), 0);
        assert_eq!(boundaries_crossed(slice - 0.05, 0.1, 4), 1);
        assert_eq!(boundaries_crossed(0.0, slice * 2.5, 4), 2);
        assert_eq!(boundaries_crossed(1.0, 0.0, 4), 0);
    }

    #[test]
    fn test_normalize() {
        assert!((normalize(TAU + 1.0) - 1.0).abs() < 1e-12);
        assert!((normalize(-1.0) - (TAU - 1.0)).abs() < 1e-12);
        assert!(normalize(-1e-20) < TAU);
    }
}
