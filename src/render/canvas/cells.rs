//! Cell content by column type.

use web_sys::CanvasRenderingContext2d;

use super::text::TextMeasureCache;
use crate::render::{cell_text, mask_text};
use crate::types::{Align, CellValue, ColumnHeader, ColumnType, GridConfig};

/// Fill and stroke color for checkbox marks, progress bars and sparklines.
pub(super) const ACCENT_COLOR: &str = "#4facfe";
const CHECKBOX_SIZE: f64 = 14.0;
const CHECKBOX_BORDER: &str = "#999";
const PROGRESS_TRACK: &str = "#e0e0e033";
const PROGRESS_FONT: &str = "10px sans-serif";
/// Share of the row height used by progress bars and sparklines.
const INSET_RATIO: f64 = 0.6;

/// A cell's box in viewport space.
#[derive(Debug, Clone, Copy)]
pub(super) struct CellRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Percentage shown by a progress cell: numbers clamped to 0..=100,
/// anything else 0.
pub(super) fn progress_value(value: &CellValue) -> f64 {
    match value {
        CellValue::Number(n) if !n.is_nan() => n.clamp(0.0, 100.0),
        _ => 0.0,
    }
}

/// Sparkline vertices for `points` inside a box, oldest on the left. A
/// flat series sits on the bottom edge.
pub(super) fn sparkline_points(points: &[f64], x: f64, y: f64, w: f64, h: f64) -> Vec<(f64, f64)> {
    let (Some(first), Some(last_index)) = (points.first(), points.len().checked_sub(1)) else {
        return Vec::new();
    };
    if last_index == 0 {
        return Vec::new();
    }
    let (min, max) = points
        .iter()
        .fold((*first, *first), |(lo, hi), &p| (lo.min(p), hi.max(p)));
    let range = if (max - min).abs() > f64::EPSILON {
        max - min
    } else {
        1.0
    };
    let steps = f64::from(u32::try_from(last_index).unwrap_or(u32::MAX));
    points
        .iter()
        .zip(0u32..)
        .map(|(&p, i)| {
            let px = x + f64::from(i) / steps * w;
            let py = y + h - (p - min) / range * h;
            (px, py)
        })
        .collect()
}

/// Draw one cell's value, clipped to its box.
pub(super) fn draw_cell_content(
    ctx: &CanvasRenderingContext2d,
    measure: &mut TextMeasureCache,
    value: &CellValue,
    header: &ColumnHeader,
    rect: CellRect,
    config: &GridConfig,
    selected: bool,
) {
    let text_color = if selected {
        config.selected_text_color.as_str()
    } else {
        config.text_color.as_str()
    };

    ctx.save();
    ctx.begin_path();
    ctx.rect(rect.x, rect.y, rect.width, rect.height);
    ctx.clip();

    match (header.column_type, value) {
        (ColumnType::Checkbox, _) => draw_checkbox(ctx, value.is_truthy(), rect),
        (ColumnType::Progress, _) => draw_progress(ctx, value, rect, config, text_color),
        (ColumnType::Sparkline, CellValue::Series(points)) => {
            draw_sparkline(ctx, points, rect, config.cell_padding);
        }
        (ColumnType::Sparkline, _) => {}
        _ => {
            if !value.is_empty() {
                draw_text(ctx, measure, value, header, rect, config, text_color);
            }
            if header.column_type == ColumnType::Select {
                draw_select_arrow(ctx, rect, text_color);
            }
        }
    }

    ctx.restore();
}

fn draw_checkbox(ctx: &CanvasRenderingContext2d, checked: bool, rect: CellRect) {
    let bx = rect.x + (rect.width - CHECKBOX_SIZE) / 2.0;
    let by = rect.y + (rect.height - CHECKBOX_SIZE) / 2.0;

    ctx.begin_path();
    ctx.rect(bx, by, CHECKBOX_SIZE, CHECKBOX_SIZE);
    ctx.set_stroke_style_str(CHECKBOX_BORDER);
    ctx.stroke();

    if checked {
        ctx.set_fill_style_str(ACCENT_COLOR);
        ctx.fill_rect(bx + 2.0, by + 2.0, CHECKBOX_SIZE - 4.0, CHECKBOX_SIZE - 4.0);
    }
}

fn draw_progress(
    ctx: &CanvasRenderingContext2d,
    value: &CellValue,
    rect: CellRect,
    config: &GridConfig,
    text_color: &str,
) {
    let percent = progress_value(value);
    let padding = config.cell_padding;
    let bar_height = rect.height * INSET_RATIO;
    let bar_y = rect.y + (rect.height - bar_height) / 2.0;
    let bar_width = rect.width - padding * 2.0;
    let bar_x = rect.x + padding;

    ctx.set_fill_style_str(
        config
            .alternate_row_color
            .as_deref()
            .unwrap_or(PROGRESS_TRACK),
    );
    ctx.fill_rect(bar_x, bar_y, bar_width, bar_height);

    ctx.set_fill_style_str(ACCENT_COLOR);
    ctx.fill_rect(bar_x, bar_y, bar_width * (percent / 100.0), bar_height);

    ctx.set_fill_style_str(text_color);
    ctx.set_font(PROGRESS_FONT);
    ctx.set_text_align("center");
    let label = format!("{}%", CellValue::Number(percent).display_text());
    let _ = ctx.fill_text(
        &label,
        rect.x + rect.width / 2.0,
        rect.y + rect.height / 2.0,
    );
}

fn draw_sparkline(ctx: &CanvasRenderingContext2d, points: &[f64], rect: CellRect, padding: f64) {
    let sh = rect.height * INSET_RATIO;
    let vertices = sparkline_points(
        points,
        rect.x + padding,
        rect.y + (rect.height - sh) / 2.0,
        rect.width - padding * 2.0,
        sh,
    );
    let Some(((x0, y0), rest)) = vertices.split_first() else {
        return;
    };

    ctx.begin_path();
    ctx.set_stroke_style_str(ACCENT_COLOR);
    ctx.set_line_width(1.5);
    ctx.move_to(*x0, *y0);
    for (x, y) in rest {
        ctx.line_to(*x, *y);
    }
    ctx.stroke();
    ctx.set_line_width(1.0);
}

fn draw_text(
    ctx: &CanvasRenderingContext2d,
    measure: &mut TextMeasureCache,
    value: &CellValue,
    header: &ColumnHeader,
    rect: CellRect,
    config: &GridConfig,
    text_color: &str,
) {
    let padding = config.cell_padding;
    let align = header.align.unwrap_or(if header.column_type == ColumnType::Numeric {
        Align::Right
    } else {
        Align::Left
    });

    let text = cell_text(value, header);
    let measured = measure.measure(ctx, &config.font, &text);
    let overflows = measured > rect.width - padding * 2.0;
    let shown = mask_text(&text, overflows, header.column_type, config);

    ctx.set_font(&config.font);
    ctx.set_fill_style_str(text_color);
    let mid_y = rect.y + rect.height / 2.0;

    // Overflowing text starts at the left edge so its beginning stays visible.
    let (css_align, text_x) = match (overflows, align) {
        (true, _) | (false, Align::Left) => ("left", rect.x + padding),
        (false, Align::Right) => ("right", rect.x + rect.width - padding),
        (false, Align::Center) => ("center", rect.x + rect.width / 2.0),
    };
    ctx.set_text_align(css_align);
    let _ = ctx.fill_text(shown, text_x, mid_y);
}

fn draw_select_arrow(ctx: &CanvasRenderingContext2d, rect: CellRect, text_color: &str) {
    let ax = rect.x + rect.width - 15.0;
    let ay = rect.y + rect.height / 2.0 - 2.0;

    let alpha = ctx.global_alpha();
    ctx.set_fill_style_str(text_color);
    ctx.set_global_alpha(alpha * 0.5);
    ctx.begin_path();
    ctx.move_to(ax, ay);
    ctx.line_to(ax + 8.0, ay);
    ctx.line_to(ax + 4.0, ay + 5.0);
    ctx.fill();
    ctx.set_global_alpha(alpha);
}

#[cfg(test)]
#[allow(clippy::float_cmp, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_value_clamps() {
        assert_eq!(progress_value(&CellValue::Number(42.5)), 42.5);
        assert_eq!(progress_value(&CellValue::Number(150.0)), 100.0);
        assert_eq!(progress_value(&CellValue::Number(-3.0)), 0.0);
        assert_eq!(progress_value(&CellValue::from("50")), 0.0);
        assert_eq!(progress_value(&CellValue::Number(f64::NAN)), 0.0);
    }

    #[test]
    fn test_sparkline_spans_box() {
        let pts = sparkline_points(&[0.0, 5.0, 10.0], 10.0, 0.0, 100.0, 20.0);
        assert_eq!(pts.len(), 3);
        assert_eq!(pts[0], (10.0, 20.0));
        assert_eq!(pts[1], (60.0, 10.0));
        assert_eq!(pts[2], (110.0, 0.0));
    }

    #[test]
    fn test_flat_sparkline_sits_on_bottom() {
        let pts = sparkline_points(&[3.0, 3.0], 0.0, 0.0, 10.0, 8.0);
        assert_eq!(pts, vec![(0.0, 8.0), (10.0, 8.0)]);
    }

    #[test]
    fn test_short_series_draws_nothing() {
        assert!(sparkline_points(&[], 0.0, 0.0, 10.0, 8.0).is_empty());
        assert!(sparkline_points(&[1.0], 0.0, 0.0, 10.0, 8.0).is_empty());
    }
}
