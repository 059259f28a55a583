//! Background fill.

use crate::buffer::{OutputBuffer, WriteOptions};
use crate::text::{colorize, Color, ColorLayer};

use super::border::Border;

/// Fill the interior of a box with `color`.
///
/// The filled area is the box inset by whichever border sides are drawn.
/// Nothing happens without a color or when the interior is empty.
pub fn render_background(
    buffer: &mut OutputBuffer,
    x: i32,
    y: i32,
    width: u16,
    height: u16,
    border: &Border,
    color: Option<Color>,
) {
    let Some(color) = color else {
        return;
    };
    let edges = border.edges();
    let inner_width = width.saturating_sub(edges.horizontal());
    let inner_height = height.saturating_sub(edges.vertical());
    if inner_width == 0 || inner_height == 0 {
        return;
    }

    let line = colorize(
        &" ".repeat(usize::from(inner_width)),
        Some(color),
        ColorLayer::Background,
    );
    let fill = vec![line; usize::from(inner_height)].join("\n");
    buffer.write(
        x + i32::from(edges.left),
        y + i32::from(edges.top),
        &fill,
        &WriteOptions::default(),
    );
}
