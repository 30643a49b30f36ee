//! Map rendering of a seasonal climatology
//!
//! [`create_plot`] turns one season of a [`Climatology`] into a [`Figure`]: a
//! filled-contour map on a Plate Carrée projection centred on the date line,
//! with coastlines, optional gridlines, a colorbar and a title. The figure is
//! an ordinary owned value; nothing is drawn into shared state, and
//! [`Figure::save`] writes it out.
//!
//! # Organization
//!
//! - [`colormap`]: colormap and level banding
//! - [`projection`]: projection maths and grid interpolation
//! - [`coastlines`]: built-in and GeoJSON coastline geometry
//! - [`text`]: font discovery and text drawing

pub mod coastlines;
pub mod colormap;
pub mod projection;
pub mod text;

pub use coastlines::Coastlines;
pub use colormap::{default_levels, validate_levels, Colormap, Extend, LevelBands};
pub use projection::{GridSampler, PlateCarree};
pub use text::TextPainter;

use crate::climatology::Climatology;
use crate::errors::Result;
use crate::season::Season;
use image::codecs::jpeg::{JpegEncoder, PixelDensity};
use image::{DynamicImage, Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_line_segment_mut, draw_polygon_mut};
use imageproc::point::Point;
use imageproc::rect::Rect;
use rayon::prelude::*;
use std::ffi::OsStr;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use text::{HAlign, VAlign};
use tracing::{debug, info};

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
const GRID_GREY: Rgba<u8> = Rgba([128, 128, 128, 255]);

/// Subplot margins as fractions of the figure (left, right, bottom, top)
const SUBPLOT: (f64, f64, f64, f64) = (0.125, 0.9, 0.11, 0.88);
/// Share of the axes width given to the colorbar, and the gap before it
const CBAR_FRACTION: f64 = 0.15;
const CBAR_PAD: f64 = 0.05;
/// Colorbar length over width
const CBAR_ASPECT: f64 = 20.0;
/// Length of the overflow triangle relative to the bar
const CBAR_EXTEND_FRAC: f64 = 0.05;

const GRID_LON_STEP: f64 = 60.0;
const GRID_LAT_STEP: f64 = 30.0;

const JPEG_QUALITY: u8 = 75;

/// Figure size, resolution and drawing resources
#[derive(Debug, Clone)]
pub struct FigureStyle {
    pub width_in: f64,
    pub height_in: f64,
    pub dpi: u32,
    pub central_longitude: f64,
    pub coastlines: Coastlines,
    /// Text is skipped when no font is available
    pub text: Option<TextPainter>,
}

impl Default for FigureStyle {
    fn default() -> Self {
        Self {
            width_in: 12.0,
            height_in: 5.0,
            dpi: 200,
            central_longitude: 180.0,
            coastlines: Coastlines::builtin(),
            text: None,
        }
    }
}

impl FigureStyle {
    /// Pixel size of a font given in points
    fn font_px(&self, points: f64) -> f32 {
        (points * f64::from(self.dpi) / 72.0) as f32
    }
}

/// Rendering options for [`create_plot`]
#[derive(Debug, Clone, Default)]
pub struct PlotOptions {
    pub gridlines: bool,
    /// Colorbar levels; `None` or empty selects [`default_levels`]
    pub levels: Option<Vec<f64>>,
    pub style: FigureStyle,
}

/// Axis-aligned rectangle in pixel space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl PixelRect {
    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }
}

/// Placement of the map and colorbar on the canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub width: u32,
    pub height: u32,
    pub map: PixelRect,
    pub colorbar: PixelRect,
}

impl Layout {
    /// Subplot with a vertical colorbar on the right, the map kept at the
    /// 2:1 aspect of a global Plate Carrée extent.
    pub fn new(style: &FigureStyle) -> Self {
        let dpi = f64::from(style.dpi);
        let fig_w = (style.width_in * dpi).round();
        let fig_h = (style.height_in * dpi).round();

        let (left, right, bottom, top) = SUBPLOT;
        let box_x = left * fig_w;
        let box_w = (right - left) * fig_w;
        let box_y = (1.0 - top) * fig_h;
        let box_h = (top - bottom) * fig_h;

        let parent_w = box_w * (1.0 - CBAR_FRACTION - CBAR_PAD);
        let map = if parent_w / box_h > 2.0 {
            let w = box_h * 2.0;
            PixelRect {
                x: box_x + (parent_w - w) / 2.0,
                y: box_y,
                w,
                h: box_h,
            }
        } else {
            let h = parent_w / 2.0;
            PixelRect {
                x: box_x,
                y: box_y + (box_h - h) / 2.0,
                w: parent_w,
                h,
            }
        };

        let colorbar = PixelRect {
            x: box_x + parent_w + CBAR_PAD * box_w,
            y: box_y,
            w: box_h / CBAR_ASPECT,
            h: box_h,
        };

        Self {
            width: fig_w as u32,
            height: fig_h as u32,
            map,
            colorbar,
        }
    }

    /// Pixel position of a projected point
    fn projected_to_pixel(&self, x: f64, y: f64) -> (f32, f32) {
        let (x_min, x_max, y_min, y_max) = PlateCarree::EXTENT;
        let px = self.map.x + (x - x_min) / (x_max - x_min) * self.map.w;
        let py = self.map.y + (y_max - y) / (y_max - y_min) * self.map.h;
        (px as f32, py as f32)
    }

    /// Projected point at the centre of a pixel
    fn pixel_to_projected(&self, px: u32, py: u32) -> (f64, f64) {
        let (x_min, x_max, y_min, y_max) = PlateCarree::EXTENT;
        let x = x_min + (f64::from(px) + 0.5 - self.map.x) / self.map.w * (x_max - x_min);
        let y = y_max - (f64::from(py) + 0.5 - self.map.y) / self.map.h * (y_max - y_min);
        (x, y)
    }
}

/// A rendered figure
#[derive(Debug, Clone)]
pub struct Figure {
    canvas: RgbaImage,
    layout: Layout,
    dpi: u32,
    title: String,
    season: Season,
    bands: LevelBands,
    colorbar_label: String,
    gridlines: bool,
}

impl Figure {
    pub fn canvas(&self) -> &RgbaImage {
        &self.canvas
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn dpi(&self) -> u32 {
        self.dpi
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn season(&self) -> Season {
        self.season
    }

    /// Colorbar boundaries actually used
    pub fn levels(&self) -> &[f64] {
        self.bands.levels()
    }

    pub fn bands(&self) -> &LevelBands {
        &self.bands
    }

    pub fn extend(&self) -> Extend {
        if self.bands.over_color().is_some() {
            Extend::Max
        } else {
            Extend::Neither
        }
    }

    pub fn colorbar_label(&self) -> &str {
        &self.colorbar_label
    }

    pub fn gridlines(&self) -> bool {
        self.gridlines
    }

    /// Bounds of the non-background content, padded by `pad` pixels and
    /// clamped to the canvas, as (x, y, width, height).
    pub fn tight_bbox(&self, pad: u32) -> (u32, u32, u32, u32) {
        let (w, h) = self.canvas.dimensions();
        let mut min_x = w;
        let mut min_y = h;
        let mut max_x = 0;
        let mut max_y = 0;

        for (x, y, pixel) in self.canvas.enumerate_pixels() {
            if *pixel != WHITE {
                min_x = min_x.min(x);
                min_y = min_y.min(y);
                max_x = max_x.max(x);
                max_y = max_y.max(y);
            }
        }

        if min_x > max_x {
            return (0, 0, w, h);
        }

        let x0 = min_x.saturating_sub(pad);
        let y0 = min_y.saturating_sub(pad);
        let x1 = (max_x + 1 + pad).min(w);
        let y1 = (max_y + 1 + pad).min(h);
        (x0, y0, x1 - x0, y1 - y0)
    }

    /// Write the figure with a tight bounding box (0.1 inch padding) on a
    /// white background. The format follows the file extension; PNG and JPEG
    /// output records the figure resolution.
    pub fn save(&self, path: &Path) -> Result<()> {
        let pad = self.dpi / 10;
        let (x, y, w, h) = self.tight_bbox(pad);
        let cropped = image::imageops::crop_imm(&self.canvas, x, y, w, h).to_image();
        let rgb = DynamicImage::ImageRgba8(cropped).to_rgb8();

        let extension = path
            .extension()
            .and_then(OsStr::to_str)
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("png") => {
                let mut out = BufWriter::new(File::create(path)?);
                let ppm = dots_per_metre(self.dpi);
                let mut encoder = png::Encoder::new(&mut out, w, h);
                encoder.set_color(png::ColorType::Rgb);
                encoder.set_depth(png::BitDepth::Eight);
                encoder.set_pixel_dims(Some(png::PixelDimensions {
                    xppu: ppm,
                    yppu: ppm,
                    unit: png::Unit::Meter,
                }));
                let mut writer = encoder.write_header()?;
                writer.write_image_data(rgb.as_raw())?;
                writer.finish()?;
                out.flush()?;
            }
            Some("jpg" | "jpeg") => {
                let mut out = BufWriter::new(File::create(path)?);
                {
                    let mut encoder = JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY);
                    let dpi = u16::try_from(self.dpi).unwrap_or(u16::MAX);
                    encoder.set_pixel_density(PixelDensity::dpi(dpi));
                    encoder.encode_image(&rgb)?;
                }
                out.flush()?;
            }
            _ => DynamicImage::ImageRgb8(rgb).save(path)?,
        }

        info!(
            path = %path.display(),
            width = w,
            height = h,
            dpi = self.dpi,
            "Saved figure"
        );
        Ok(())
    }
}

/// PNG stores resolution per metre
fn dots_per_metre(dpi: u32) -> u32 {
    (f64::from(dpi) / 0.0254).round() as u32
}

/// Plot the climatology of one season.
///
/// # Errors
///
/// Fails if the season is absent from the climatology, if its field is not a
/// latitude/longitude grid, or if the levels are invalid.
pub fn create_plot(
    clim: &Climatology,
    model: &str,
    season: Season,
    options: &PlotOptions,
) -> Result<Figure> {
    let levels = match &options.levels {
        Some(levels) if !levels.is_empty() => levels.clone(),
        _ => default_levels(),
    };
    let bands = LevelBands::new(&levels, &Colormap::haline_r(), Extend::Max)?;

    let field = clim.sel(season)?;
    let style = &options.style;
    let layout = Layout::new(style);
    let projection = PlateCarree::new(style.central_longitude);
    let sampler = GridSampler::new(&field.data, &field.lat, &field.lon);

    debug!(
        season = %season,
        shape = ?field.data.shape(),
        periodic = sampler.is_periodic(),
        levels = ?levels,
        "Rendering filled contours"
    );

    let mut canvas = RgbaImage::from_pixel(layout.width, layout.height, WHITE);

    shade_map(&mut canvas, &layout, &projection, &sampler, &bands);
    draw_coastlines(&mut canvas, &layout, &projection, &style.coastlines);
    if options.gridlines {
        draw_gridlines(&mut canvas, &layout);
    }
    draw_frame(&mut canvas, &layout.map, 2);

    let colorbar_label = field.units.clone().unwrap_or_default();
    draw_colorbar(&mut canvas, &layout, &bands, &colorbar_label, style);

    let title = format!("{model} precipitation climatology ({season})");
    if let Some(painter) = &style.text {
        let (cx, _) = layout.map.center();
        let y = layout.map.y - f64::from(style.font_px(6.0));
        painter.draw(
            &mut canvas,
            &title,
            style.font_px(12.0),
            cx as i32,
            y as i32,
            HAlign::Center,
            VAlign::Bottom,
            BLACK,
        );
    }

    info!(title = %title, "Rendered figure");

    Ok(Figure {
        canvas,
        layout,
        dpi: style.dpi,
        title,
        season,
        bands,
        colorbar_label,
        gridlines: options.gridlines,
    })
}

fn shade_map(
    canvas: &mut RgbaImage,
    layout: &Layout,
    projection: &PlateCarree,
    sampler: &GridSampler,
    bands: &LevelBands,
) {
    let x0 = layout.map.x.round().max(0.0) as u32;
    let y0 = layout.map.y.round().max(0.0) as u32;
    let x1 = (layout.map.right().round() as u32).min(canvas.width());
    let y1 = (layout.map.bottom().round() as u32).min(canvas.height());

    let rows: Vec<Vec<Option<Rgba<u8>>>> = (y0..y1)
        .into_par_iter()
        .map(|py| {
            (x0..x1)
                .map(|px| {
                    let (x, y) = layout.pixel_to_projected(px, py);
                    let (lon, lat) = projection.inverse(x, y);
                    sampler.sample(lon, lat).and_then(|v| bands.color_for(v))
                })
                .collect()
        })
        .collect();

    for (py, row) in (y0..y1).zip(rows) {
        for (px, color) in (x0..x1).zip(row) {
            if let Some(color) = color {
                canvas.put_pixel(px, py, color);
            }
        }
    }
}

fn draw_coastlines(
    canvas: &mut RgbaImage,
    layout: &Layout,
    projection: &PlateCarree,
    coastlines: &Coastlines,
) {
    for line in coastlines.lines() {
        for pair in line.windows(2) {
            for [(ax, ay), (bx, by)] in projection.project_segment(pair[0], pair[1]) {
                let start = layout.projected_to_pixel(ax, ay);
                let end = layout.projected_to_pixel(bx, by);
                draw_thick_line(canvas, start, end, 2, BLACK);
            }
        }
    }
}

fn draw_gridlines(canvas: &mut RgbaImage, layout: &Layout) {
    let (x_min, x_max, y_min, y_max) = PlateCarree::EXTENT;

    let mut x = x_min + GRID_LON_STEP;
    while x < x_max {
        let (px, top) = layout.projected_to_pixel(x, y_max);
        let (_, bottom) = layout.projected_to_pixel(x, y_min);
        draw_dashed(canvas, (px, top), (px, bottom));
        x += GRID_LON_STEP;
    }

    let mut y = y_min + GRID_LAT_STEP;
    while y < y_max {
        let (left, py) = layout.projected_to_pixel(x_min, y);
        let (right, _) = layout.projected_to_pixel(x_max, y);
        draw_dashed(canvas, (left, py), (right, py));
        y += GRID_LAT_STEP;
    }
}

/// Dashed half-transparent grey line
fn draw_dashed(canvas: &mut RgbaImage, start: (f32, f32), end: (f32, f32)) {
    const DASH: f32 = 14.0;
    const GAP: f32 = 8.0;

    let (dx, dy) = (end.0 - start.0, end.1 - start.1);
    let length = (dx * dx + dy * dy).sqrt();
    if length == 0.0 {
        return;
    }
    let (ux, uy) = (dx / length, dy / length);

    let mut t = 0.0;
    while t < length {
        let t_end = (t + DASH).min(length);
        let steps = (t_end - t).ceil() as i32;
        for s in 0..=steps {
            let d = t + s as f32;
            let (x, y) = ((start.0 + ux * d).round() as i64, (start.1 + uy * d).round() as i64);
            blend_pixel(canvas, x, y, GRID_GREY, 0.5);
        }
        t += DASH + GAP;
    }
}

fn blend_pixel(canvas: &mut RgbaImage, x: i64, y: i64, color: Rgba<u8>, alpha: f32) {
    if x < 0 || y < 0 || x >= i64::from(canvas.width()) || y >= i64::from(canvas.height()) {
        return;
    }
    let pixel = canvas.get_pixel_mut(x as u32, y as u32);
    for c in 0..3 {
        let mixed = f32::from(pixel[c]) * (1.0 - alpha) + f32::from(color[c]) * alpha;
        pixel[c] = mixed.round() as u8;
    }
}

fn draw_thick_line(
    canvas: &mut RgbaImage,
    start: (f32, f32),
    end: (f32, f32),
    width: u32,
    color: Rgba<u8>,
) {
    let (dx, dy) = (end.0 - start.0, end.1 - start.1);
    let length = (dx * dx + dy * dy).sqrt();
    let (nx, ny) = if length > 0.0 {
        (-dy / length, dx / length)
    } else {
        (0.0, 0.0)
    };

    for i in 0..width {
        let offset = i as f32 - (width as f32 - 1.0) / 2.0;
        draw_line_segment_mut(
            canvas,
            (start.0 + nx * offset, start.1 + ny * offset),
            (end.0 + nx * offset, end.1 + ny * offset),
            color,
        );
    }
}

fn draw_frame(canvas: &mut RgbaImage, rect: &PixelRect, width: u32) {
    let corners = [
        (rect.x as f32, rect.y as f32),
        (rect.right() as f32, rect.y as f32),
        (rect.right() as f32, rect.bottom() as f32),
        (rect.x as f32, rect.bottom() as f32),
    ];
    for i in 0..4 {
        draw_thick_line(canvas, corners[i], corners[(i + 1) % 4], width, BLACK);
    }
}

fn draw_colorbar(
    canvas: &mut RgbaImage,
    layout: &Layout,
    bands: &LevelBands,
    label: &str,
    style: &FigureStyle,
) {
    let bar = layout.colorbar;
    let has_over = bands.over_color().is_some();
    let extend_h = if has_over {
        bar.h * CBAR_EXTEND_FRAC / (1.0 + CBAR_EXTEND_FRAC)
    } else {
        0.0
    };
    let top = bar.y + extend_h;
    let bottom = bar.bottom();
    let band_h = (bottom - top) / bands.band_count() as f64;

    for band in 0..bands.band_count() {
        let y_hi = bottom - (band + 1) as f64 * band_h;
        let y_lo = bottom - band as f64 * band_h;
        let width = bar.w.round().max(1.0) as u32;
        let height = (y_lo.round() - y_hi.round()).max(1.0) as u32;
        let rect = Rect::at(bar.x.round() as i32, y_hi.round() as i32).of_size(width, height);
        draw_filled_rect_mut(canvas, rect, bands.band_color(band));
    }

    let (left, right) = (bar.x as f32, bar.right() as f32);
    let (top_f, bottom_f) = (top as f32, bottom as f32);

    if let Some(over) = bands.over_color() {
        let apex = ((left + right) / 2.0, bar.y as f32);
        let triangle = [
            Point::new(left.round() as i32, top_f.round() as i32),
            Point::new(right.round() as i32, top_f.round() as i32),
            Point::new(apex.0.round() as i32, apex.1.round() as i32),
        ];
        draw_polygon_mut(canvas, &triangle, over);
        draw_thick_line(canvas, (left, top_f), apex, 2, BLACK);
        draw_thick_line(canvas, apex, (right, top_f), 2, BLACK);
    } else {
        draw_thick_line(canvas, (left, top_f), (right, top_f), 2, BLACK);
    }
    draw_thick_line(canvas, (left, top_f), (left, bottom_f), 2, BLACK);
    draw_thick_line(canvas, (right, top_f), (right, bottom_f), 2, BLACK);
    draw_thick_line(canvas, (left, bottom_f), (right, bottom_f), 2, BLACK);

    let tick_len = style.font_px(3.5);
    let labels = format_levels(bands.levels());
    let tick_px = style.font_px(10.0);
    let mut widest = 0;

    for (i, text) in labels.iter().enumerate() {
        let y = (bottom - i as f64 * band_h) as f32;
        draw_thick_line(canvas, (right, y), (right + tick_len, y), 2, BLACK);

        if let Some(painter) = &style.text {
            let x = (right + tick_len * 1.8) as i32;
            painter.draw(canvas, text, tick_px, x, y as i32, HAlign::Left, VAlign::Middle, BLACK);
            widest = widest.max(painter.measure(text, tick_px).0);
        }
    }

    if let Some(painter) = &style.text {
        if !label.is_empty() {
            let (_, label_h) = painter.measure(label, tick_px);
            let x = right + tick_len * 1.8 + widest as f32 + tick_len + label_h as f32;
            let y = (top + bottom) / 2.0;
            painter.draw_vertical(canvas, label, tick_px, x as i32, y as i32, BLACK);
        }
    }
}

/// Tick labels sharing the number of decimals needed by the most precise level
pub fn format_levels(levels: &[f64]) -> Vec<String> {
    let decimals = levels
        .iter()
        .map(|&v| {
            (0..=6)
                .find(|&d| {
                    let scale = 10_f64.powi(d);
                    ((v * scale).round() / scale - v).abs() <= 1e-9 * v.abs().max(1.0)
                })
                .unwrap_or(6)
        })
        .max()
        .unwrap_or(0) as usize;

    levels.iter().map(|v| format!("{v:.decimals$}")).collect()
}
