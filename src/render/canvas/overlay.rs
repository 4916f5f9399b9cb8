//! Column-reorder feedback: the insertion line and the ghost column.

use web_sys::CanvasRenderingContext2d;

use super::cells::ACCENT_COLOR;
use super::headers::draw_header_content;
use crate::render::plan::{ghost_column, insertion_line, INSERTION_LINE_WIDTH};
use crate::render::FramePlan;
use crate::render::RenderParams;

const GHOST_ALPHA: f64 = 0.6;
const GHOST_BODY: &str = "rgba(18, 18, 20, 0.8)";
const GHOST_CELL_BORDER: &str = "rgba(79, 172, 254, 0.3)";

pub(super) fn render_reorder_overlay(
    ctx: &CanvasRenderingContext2d,
    plan: &FramePlan,
    params: &RenderParams,
) {
    let RenderParams {
        state,
        config,
        data,
    } = *params;
    let row_count = data.row_count();

    if let Some((x, height)) = insertion_line(state, config, row_count) {
        ctx.save();
        ctx.set_stroke_style_str(config.drag_handle_color());
        ctx.set_line_width(INSERTION_LINE_WIDTH);
        ctx.begin_path();
        ctx.move_to(x, 0.0);
        ctx.line_to(x, height);
        ctx.stroke();
        ctx.restore();
    }

    let Some(ghost) = ghost_column(state, config, row_count) else {
        return;
    };
    let hh = plan.header_height;
    let rh = plan.row_height;

    ctx.save();
    ctx.set_global_alpha(GHOST_ALPHA);

    ctx.set_fill_style_str(&config.header_background);
    ctx.fill_rect(ghost.x, 0.0, ghost.width, hh);
    ctx.set_stroke_style_str(ACCENT_COLOR);
    ctx.set_line_width(1.0);
    ctx.stroke_rect(ghost.x, 0.0, ghost.width, hh);
    let header = data.header(ghost.col);
    draw_header_content(ctx, &header, ghost.x, 0.0, ghost.width, hh, config);

    if ghost.body_height > 0.0 {
        ctx.set_fill_style_str(GHOST_BODY);
        ctx.fill_rect(ghost.x, hh, ghost.width, ghost.body_height);
    }

    ctx.set_font(&config.font);
    ctx.set_text_align("left");
    ctx.set_text_baseline("middle");
    ctx.set_stroke_style_str(GHOST_CELL_BORDER);
    for row in plan.row_range() {
        let y = plan.row_y(row);
        let value = data.cell_data(row, ghost.col);
        if !value.is_empty() {
            ctx.set_fill_style_str(&config.text_color);
            let _ = ctx.fill_text(
                &value.display_text(),
                ghost.x + config.cell_padding,
                y + rh / 2.0,
            );
        }
        ctx.stroke_rect(ghost.x, y, ghost.width, rh);
    }

    ctx.restore();
}
