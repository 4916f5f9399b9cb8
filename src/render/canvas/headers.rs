//! Header band, row-number band and top-left corner for Canvas 2D.

use web_sys::CanvasRenderingContext2d;

use crate::interaction::band_heights;
use crate::render::plan::highlights_row_number;
use crate::render::{header_line_style, FramePlan};
use crate::state::ViewportState;
use crate::types::{ColumnHeader, GridConfig, SortOrder};

const DEFAULT_DIVIDER_ALPHA: f64 = 0.2;
const MARK_ICON_FONT: &str = "bold 14px sans-serif";
const SORT_ICON_FONT: &str = "10px sans-serif";
/// Opacity of a column while it is being dragged.
pub(super) const DRAGGED_ALPHA: f64 = 0.2;

/// Render the fixed header band for the visible columns.
///
/// `headers` holds one entry per `plan.columns`, in the same order.
pub(super) fn render_header_band(
    ctx: &CanvasRenderingContext2d,
    plan: &FramePlan,
    state: &ViewportState,
    config: &GridConfig,
    headers: &[ColumnHeader],
) {
    let band = plan.band;
    let hh = plan.header_height;

    ctx.save();
    ctx.begin_path();
    ctx.rect(band, 0.0, plan.width - band, hh);
    ctx.clip();

    ctx.set_fill_style_str(&config.header_background);
    ctx.fill_rect(band, 0.0, plan.width - band, hh);

    for (column, header) in plan.columns.iter().zip(headers) {
        let dragged = state.reordering_col == Some(column.index);
        if dragged {
            ctx.set_global_alpha(DRAGGED_ALPHA);
        }

        ctx.set_stroke_style_str(&config.grid_line_color);
        ctx.set_line_width(1.0);
        ctx.stroke_rect(column.x, 0.0, column.width, hh);
        draw_header_content(ctx, header, column.x, 0.0, column.width, hh, config);

        if dragged {
            ctx.set_global_alpha(1.0);
        }
    }
    ctx.restore();
}

/// Title, sub-lines, dividers and icons of one header cell.
pub(super) fn draw_header_content(
    ctx: &CanvasRenderingContext2d,
    header: &ColumnHeader,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    config: &GridConfig,
) {
    let sub_count = config.sub_text_count();
    let (title_h, sub_h) = band_heights(height, sub_count);
    let base_alpha = ctx.global_alpha();

    ctx.save();
    ctx.begin_path();
    ctx.rect(x, y, width, height);
    ctx.clip();

    if sub_count > 0 {
        ctx.set_stroke_style_str(
            config
                .header_divider_color
                .as_deref()
                .unwrap_or(&config.grid_line_color),
        );
        ctx.set_line_width(1.0);
        ctx.set_global_alpha(
            base_alpha * config.header_divider_alpha.unwrap_or(DEFAULT_DIVIDER_ALPHA),
        );
        let dividers: &[f64] = if sub_count == 2 {
            &[title_h, title_h + sub_h]
        } else {
            &[title_h]
        };
        for offset in dividers {
            ctx.begin_path();
            ctx.move_to(x, y + offset);
            ctx.line_to(x + width, y + offset);
            ctx.stroke();
        }
        ctx.set_global_alpha(base_alpha);
    }

    let title_color = config
        .header_title_style
        .as_ref()
        .and_then(|s| s.color.as_deref())
        .unwrap_or(&config.header_text_color);

    if let Some(icon) = header.mark_icon.as_deref() {
        ctx.set_fill_style_str(title_color);
        ctx.set_font(MARK_ICON_FONT);
        ctx.set_text_align("right");
        ctx.set_text_baseline("top");
        let _ = ctx.fill_text(icon, x + width - 5.0, y + 4.0);
    }

    if let Some(order) = header.sort_order {
        ctx.set_fill_style_str(&config.header_text_color);
        ctx.set_font(SORT_ICON_FONT);
        ctx.set_text_align("right");
        ctx.set_text_baseline("middle");
        let arrow = match order {
            SortOrder::Asc => "▲",
            SortOrder::Desc => "▼",
        };
        let inset = if header.mark_icon.is_some() { 20.0 } else { 8.0 };
        let _ = ctx.fill_text(arrow, x + width - inset, y + title_h / 2.0);
    }

    ctx.set_text_align("left");
    ctx.set_text_baseline("middle");
    let text_x = x + config.cell_padding;
    for sub in 0..=sub_count {
        let text = match sub {
            0 => header.name.as_str(),
            _ => header
                .line(sub)
                .filter(|t| !t.is_empty())
                .unwrap_or(&config.header_placeholder),
        };
        let center_y = match sub {
            0 => y + title_h / 2.0,
            1 => y + title_h + sub_h / 2.0,
            _ => y + title_h + sub_h * 1.5,
        };
        let style = header_line_style(config, sub, height);
        ctx.set_font(&style.font);
        ctx.set_fill_style_str(&style.color);
        ctx.set_global_alpha(base_alpha * style.alpha);
        let _ = ctx.fill_text(text, text_x, center_y);
    }

    ctx.restore();
}

/// Fixed row-number band down the left edge.
pub(super) fn render_row_numbers(
    ctx: &CanvasRenderingContext2d,
    plan: &FramePlan,
    state: &ViewportState,
    config: &GridConfig,
) {
    let band = plan.band;
    let hh = plan.header_height;
    let rh = plan.row_height;

    ctx.save();
    ctx.begin_path();
    ctx.rect(0.0, hh, band, plan.height - hh);
    ctx.clip();

    ctx.set_fill_style_str(&config.row_number_background);
    ctx.fill_rect(0.0, hh, band, plan.height);

    ctx.set_stroke_style_str(&config.grid_line_color);
    ctx.set_line_width(1.0);
    ctx.set_font(&config.font);
    ctx.set_text_align("left");
    ctx.set_text_baseline("middle");
    for row in plan.row_range() {
        let y = plan.row_y(row);
        if highlights_row_number(state, row) {
            ctx.set_fill_style_str(&config.selection_color);
            ctx.fill_rect(0.0, y, band, rh);
        }
        ctx.stroke_rect(0.0, y, band, rh);
        ctx.set_fill_style_str(&config.row_number_text_color);
        let label = u64::from(row) + 1;
        let _ = ctx.fill_text(&label.to_string(), config.cell_padding, y + rh / 2.0);
    }
    ctx.restore();
}

/// Top-left square where the header and row-number bands meet.
pub(super) fn render_header_corner(
    ctx: &CanvasRenderingContext2d,
    config: &GridConfig,
    header_height: f64,
) {
    if !config.show_row_numbers {
        return;
    }
    let band = config.row_number_band();
    ctx.set_fill_style_str(&config.header_background);
    ctx.fill_rect(0.0, 0.0, band, header_height);
    ctx.set_stroke_style_str(&config.grid_line_color);
    ctx.set_line_width(1.0);
    ctx.stroke_rect(0.0, 0.0, band, header_height);
}
