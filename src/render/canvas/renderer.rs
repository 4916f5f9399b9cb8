//! Canvas 2D rendering backend.
//!
//! Implements the RenderBackend trait using HTML Canvas 2D API via web-sys.

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::error::{GridError, Result};
use crate::render::backend::{RenderBackend, RenderParams};
use crate::render::FramePlan;
use crate::types::{ColumnHeader, SelectionMode};

use super::cells::{draw_cell_content, CellRect};
use super::headers::{render_header_band, render_header_corner, render_row_numbers, DRAGGED_ALPHA};
use super::overlay::render_reorder_overlay;
use super::text::{TextMeasureCache, TEXT_MEASURE_CACHE_CAP};

const EMPTY_STATE_COLOR: &str = "#999999";

/// Canvas 2D renderer implementing the RenderBackend trait
pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    /// CSS width
    width: u32,
    /// CSS height
    height: u32,
    dpr: f32,
    /// Cache for text measurements (key: "font\\ntext")
    text_measure_cache: TextMeasureCache,
}

impl CanvasRenderer {
    /// Create a new Canvas renderer from an HtmlCanvasElement
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|_| GridError::Canvas("Failed to get 2d context".into()))?
            .ok_or_else(|| GridError::Canvas("No 2d context available".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| GridError::Canvas("Failed to cast to CanvasRenderingContext2d".into()))?;

        let width = canvas.width();
        let height = canvas.height();

        Ok(Self {
            canvas,
            ctx,
            width,
            height,
            dpr: 1.0,
            text_measure_cache: TextMeasureCache::new(TEXT_MEASURE_CACHE_CAP),
        })
    }

    /// The drawing context, shared with text measurement.
    pub fn context(&self) -> &CanvasRenderingContext2d {
        &self.ctx
    }

    pub fn dpr(&self) -> f32 {
        self.dpr
    }

    fn render_empty_state(&self, params: &RenderParams, plan: &FramePlan) {
        let ctx = &self.ctx;
        let config = params.config;
        ctx.set_fill_style_str(
            config
                .empty_state_color
                .as_deref()
                .unwrap_or(EMPTY_STATE_COLOR),
        );
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");
        ctx.set_font(&config.font);
        let _ = ctx.fill_text(config.empty_state_text(), plan.width / 2.0, plan.height / 2.0);
    }

    fn render_body(&mut self, params: &RenderParams, plan: &FramePlan, headers: &[ColumnHeader]) {
        let RenderParams {
            state,
            config,
            data,
        } = *params;
        let ctx = &self.ctx;
        let band = plan.band;
        let hh = plan.header_height;
        let rh = plan.row_height;
        let selection = &state.selection;

        ctx.save();
        ctx.begin_path();
        ctx.rect(band, hh, plan.width - band, plan.height - hh);
        ctx.clip();
        ctx.set_text_baseline("middle");

        for row in plan.row_range() {
            let y = plan.row_y(row);

            if let Some(alternate) = config.alternate_row_color.as_deref() {
                if row % 2 == 1 {
                    ctx.set_fill_style_str(alternate);
                    ctx.fill_rect(band, y, plan.width - band, rh);
                }
            }

            for (column, header) in plan.columns.iter().zip(headers) {
                let dragged = state.reordering_col == Some(column.index);
                if dragged {
                    ctx.set_global_alpha(DRAGGED_ALPHA);
                }

                let selected = selection.contains_cell(row, column.col);
                if selected {
                    ctx.set_fill_style_str(&config.selection_color);
                    ctx.fill_rect(column.x, y, column.width, rh);
                }

                let rect = CellRect {
                    x: column.x,
                    y,
                    width: column.width,
                    height: rh,
                };
                draw_cell_content(
                    ctx,
                    &mut self.text_measure_cache,
                    &data.cell_data(row, column.col),
                    header,
                    rect,
                    config,
                    selected && selection.mode == SelectionMode::Cell,
                );

                ctx.set_stroke_style_str(&config.grid_line_color);
                ctx.set_line_width(1.0);
                ctx.stroke_rect(column.x, y, column.width, rh);

                if dragged {
                    ctx.set_global_alpha(1.0);
                }
            }
        }
        ctx.restore();
    }
}

impl RenderBackend for CanvasRenderer {
    fn init(&mut self) -> Result<()> {
        // Canvas 2D doesn't need explicit initialization
        Ok(())
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn resize(&mut self, width: u32, height: u32, dpr: f32) {
        self.width = width;
        self.height = height;
        self.dpr = dpr;
        self.text_measure_cache.clear();

        // Buffer in physical pixels, element in CSS pixels
        let dpr64 = f64::from(dpr);
        self.canvas
            .set_width((f64::from(width) * dpr64).round().max(0.0) as u32);
        self.canvas
            .set_height((f64::from(height) * dpr64).round().max(0.0) as u32);
        let style = self.canvas.style();
        let _ = style.set_property("width", &format!("{width}px"));
        let _ = style.set_property("height", &format!("{height}px"));

        // Resizing the buffer resets the transform; scale so all drawing
        // uses CSS coordinates.
        let _ = self.ctx.set_transform(dpr64, 0.0, 0.0, dpr64, 0.0, 0.0);
    }

    fn render(&mut self, params: &RenderParams) -> Result<()> {
        let RenderParams {
            state,
            config,
            data,
        } = *params;
        let plan = FramePlan::new(state, config, data.row_count());
        let headers: Vec<ColumnHeader> = plan.columns.iter().map(|c| data.header(c.col)).collect();

        let ctx = &self.ctx;
        ctx.save();
        ctx.clear_rect(0.0, 0.0, plan.width, plan.height);
        ctx.set_fill_style_str(&config.background_color);
        ctx.fill_rect(0.0, 0.0, plan.width, plan.height);

        if plan.rows.is_none() {
            self.render_empty_state(params, &plan);
            render_header_band(&self.ctx, &plan, state, config, &headers);
            render_header_corner(&self.ctx, config, plan.header_height);
            self.ctx.restore();
            return Ok(());
        }

        self.render_body(params, &plan, &headers);
        if config.show_row_numbers {
            render_row_numbers(&self.ctx, &plan, state, config);
        }
        render_header_band(&self.ctx, &plan, state, config, &headers);
        render_header_corner(&self.ctx, config, plan.header_height);
        render_reorder_overlay(&self.ctx, &plan, params);

        // Restore clean state (removes any clip leaks from this frame).
        self.ctx.restore();
        Ok(())
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }
}
