//! Pure geometry used by hit testing, dragging and vertex editing.

use egui::{Pos2, pos2};

pub mod hit_testing;

/// Even-odd (ray casting) containment test over a closed vertex ring.
///
/// Edges whose endpoints share the same `y` never straddle the ray and are
/// skipped before the intersection is computed, so horizontal edges cannot
/// divide by zero. Points exactly on a right-hand edge count as outside.
pub fn point_in_polygon(point: Pos2, ring: &[Pos2]) -> bool {
    let len = ring.len();
    let mut inside = false;

    for i in 0..len {
        let a = ring[i];
        let b = ring[(i + 1) % len];

        if (a.y > point.y) == (b.y > point.y) {
            continue;
        }
        let dy = b.y - a.y;
        if dy == 0.0 {
            continue;
        }

        let intersect_x = a.x + (point.y - a.y) * (b.x - a.x) / dy;
        if point.x < intersect_x {
            inside = !inside;
        }
    }

    inside
}

/// Distance from `point` to the segment `a`-`b`.
///
/// A zero-length segment degrades to the distance to `a`.
pub fn point_to_segment_distance(point: Pos2, a: Pos2, b: Pos2) -> f32 {
    let segment = b - a;
    let length_sq = segment.length_sq();
    if length_sq == 0.0 {
        return point.distance(a);
    }

    let t = ((point - a).dot(segment) / length_sq).clamp(0.0, 1.0);
    point.distance(a + segment * t)
}

/// Vertices of a ring without the closing repeat of the first point.
pub fn distinct_vertices(points: &[Pos2]) -> &[Pos2] {
    match points {
        [first, .., last] if first == last => &points[..points.len() - 1],
        _ => points,
    }
}

/// Arithmetic mean of the distinct vertices of `points`.
pub fn centroid(points: &[Pos2]) -> Pos2 {
    let vertices = distinct_vertices(points);
    if vertices.is_empty() {
        return Pos2::ZERO;
    }

    let count = vertices.len() as f32;
    let (sum_x, sum_y) = vertices
        .iter()
        .fold((0.0, 0.0), |(x, y), p| (x + p.x, y + p.y));
    pos2(sum_x / count, sum_y / count)
}

/// Closes an open vertex list by repeating its first point.
pub fn close_ring(mut vertices: Vec<Pos2>) -> Vec<Pos2> {
    let ends = vertices.first().copied().zip(vertices.last().copied());
    if let Some((first, last)) = ends {
        if first != last {
            vertices.push(first);
        }
    }
    vertices
}

/// Axis-aligned square ring around `center` with the given half-width.
pub fn square_ring(center: Pos2, half_width: f32) -> Vec<Pos2> {
    close_ring(vec![
        pos2(center.x - half_width, center.y - half_width),
        pos2(center.x + half_width, center.y - half_width),
        pos2(center.x + half_width, center.y + half_width),
        pos2(center.x - half_width, center.y + half_width),
    ])
}

/// Apex-up isosceles triangle ring, `2 * half_size` wide and tall, whose
/// vertex mean is `center`.
///
/// The apex sits `4/3 * half_size` above `center` and the base `2/3 *
/// half_size` below it, instead of `half_size` on either side, so resizing
/// keeps the centroid that dragging and hit testing use as the reference
/// point.
pub fn triangle_ring(center: Pos2, half_size: f32) -> Vec<Pos2> {
    let above = half_size * 4.0 / 3.0;
    let below = half_size * 2.0 / 3.0;
    close_ring(vec![
        pos2(center.x, center.y - above),
        pos2(center.x + half_size, center.y + below),
        pos2(center.x - half_size, center.y + below),
    ])
}
