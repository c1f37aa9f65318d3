//! Shape generation for 2D primitives
//!
//! All shapes are emitted as triangle lists in viewport pixels.

use glam::Vec2;

use super::vertex::Vertex;

/// Seven-segment masks for 0-9 (bit 0 = top, clockwise, bit 6 = middle)
const DIGIT_SEGMENTS: [u8; 10] = [0x3F, 0x06, 0x5B, 0x4F, 0x66, 0x6D, 0x7D, 0x07, 0x7F, 0x6F];

/// Append an axis-aligned rectangle
pub fn rect(out: &mut Vec<Vertex>, min: Vec2, max: Vec2, color: [f32; 4]) {
    if max.x <= min.x || max.y <= min.y {
        return;
    }
    quad(
        out,
        [
            min,
            Vec2::new(max.x, min.y),
            max,
            Vec2::new(min.x, max.y),
        ],
        color,
    );
}

/// Append a rectangle of `size` centred on `center`, rotated by `angle` radians
pub fn rotated_rect(out: &mut Vec<Vertex>, center: Vec2, size: Vec2, angle: f32, color: [f32; 4]) {
    let rot = Vec2::from_angle(angle);
    let half = size * 0.5;
    let corners = [
        Vec2::new(-half.x, -half.y),
        Vec2::new(half.x, -half.y),
        Vec2::new(half.x, half.y),
        Vec2::new(-half.x, half.y),
    ]
    .map(|c| center + rot.rotate(c));
    quad(out, corners, color);
}

/// Two triangles from four corners in winding order
fn quad(out: &mut Vec<Vertex>, c: [Vec2; 4], color: [f32; 4]) {
    for i in [0, 1, 2, 0, 2, 3] {
        out.push(Vertex::new(c[i].x, c[i].y, color));
    }
}

/// Append one seven-segment digit with its top-left corner at `origin`
pub fn digit(out: &mut Vec<Vertex>, origin: Vec2, height: f32, value: u8, color: [f32; 4]) {
    let mask = DIGIT_SEGMENTS[(value % 10) as usize];
    let w = digit_width(height);
    let h = height;
    let t = h / 8.0;
    let mid = h / 2.0;

    // Segment boxes in mask bit order: top, upper right, lower right,
    // bottom, lower left, upper left, middle
    let segments = [
        (Vec2::new(0.0, 0.0), Vec2::new(w, t)),
        (Vec2::new(w - t, 0.0), Vec2::new(w, mid)),
        (Vec2::new(w - t, mid), Vec2::new(w, h)),
        (Vec2::new(0.0, h - t), Vec2::new(w, h)),
        (Vec2::new(0.0, mid), Vec2::new(t, h)),
        (Vec2::new(0.0, 0.0), Vec2::new(t, mid)),
        (Vec2::new(0.0, mid - t / 2.0), Vec2::new(w, mid + t / 2.0)),
    ];

    for (bit, (min, max)) in segments.iter().enumerate() {
        if mask & (1 << bit) != 0 {
            rect(out, origin + *min, origin + *max, color);
        }
    }
}

#[inline]
pub fn digit_width(height: f32) -> f32 {
    height / 2.0
}

/// Append a decimal number horizontally centred on `center_x`
pub fn number(
    out: &mut Vec<Vertex>,
    value: u32,
    center_x: f32,
    top: f32,
    height: f32,
    color: [f32; 4],
) {
    let digits: Vec<u8> = value.to_string().bytes().map(|b| b - b'0').collect();
    let advance = digit_width(height) * 1.4;
    let total = advance * (digits.len() as f32 - 1.0) + digit_width(height);
    let mut x = center_x - total / 2.0;
    for d in digits {
        digit(out, Vec2::new(x, top), height, d, color);
        x += advance;
    }
}
