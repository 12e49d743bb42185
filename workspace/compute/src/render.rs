//! PNG rendering of forecast bar charts.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use image::{ImageFormat, RgbImage};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};
use tracing::{debug, info, instrument, warn};

use crate::dates::DateRange;
use crate::error::{ComputeError, Result, render_error};
use crate::forecast::ForecastSequence;
use crate::report::{Bar, BarChart};
use crate::window::filter_window;

const FONT_FAMILY: &str = "sans-serif";
/// Share of a month slot covered by bars; the rest separates months.
const SLOT_FILL: f64 = 0.8;

pub const DEFAULT_FONT_PATH: &str = "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf";

/// Raster size and text configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartOptions {
    pub width: u32,
    pub height: u32,
    pub font_path: Option<PathBuf>,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            width: 1500,
            height: 1000,
            font_path: Some(PathBuf::from(DEFAULT_FONT_PATH)),
        }
    }
}

fn registered_fonts() -> &'static Mutex<HashSet<PathBuf>> {
    static REGISTERED: OnceLock<Mutex<HashSet<PathBuf>>> = OnceLock::new();
    REGISTERED.get_or_init(Default::default)
}

/// Registers a TrueType font as the chart text face.
///
/// Registration is process wide; a path already registered is not read again.
pub fn register_font_file(path: &Path) -> Result<()> {
    let mut registered = registered_fonts()
        .lock()
        .map_err(|_| ComputeError::Render("font registry lock poisoned".to_string()))?;
    if registered.contains(path) {
        debug!("Chart font {} already registered", path.display());
        return Ok(());
    }

    let bytes = std::fs::read(path)
        .map_err(|e| ComputeError::Render(format!("cannot read font {}: {}", path.display(), e)))?;
    // plotters keeps the face for the rest of the process.
    let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
    plotters::style::register_font(FONT_FAMILY, FontStyle::Normal, bytes)
        .map_err(|_| ComputeError::Render(format!("invalid font {}", path.display())))?;

    registered.insert(path.to_path_buf());
    info!("Registered chart font {}", path.display());
    Ok(())
}

/// True once `path` has been registered in this process.
pub fn is_font_registered(path: &Path) -> bool {
    registered_fonts()
        .lock()
        .map(|registered| registered.contains(path))
        .unwrap_or(false)
}

/// Chart produced for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedReport {
    pub range: DateRange,
    pub chart: BarChart,
    pub png: Vec<u8>,
}

impl RenderedReport {
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.png)
    }

    pub fn is_empty(&self) -> bool {
        self.chart.is_empty()
    }
}

/// Filters forecasts to a date window and draws them as a bar chart.
#[derive(Debug, Clone)]
pub struct ReportRenderer {
    width: u32,
    height: u32,
    text: bool,
}

impl ReportRenderer {
    /// Creates a renderer, registering the configured font when possible.
    ///
    /// Without a usable font the renderer still draws bars but no text.
    pub fn new(options: &ChartOptions) -> Self {
        let text = match &options.font_path {
            Some(path) => match register_font_file(path) {
                Ok(()) => true,
                Err(e) => {
                    warn!("Chart text disabled: {}", e);
                    false
                }
            },
            None => {
                warn!("No chart font configured, chart text disabled");
                false
            }
        };
        Self {
            width: options.width,
            height: options.height,
            text,
        }
    }

    /// Renderer that never draws text, independent of installed fonts.
    pub fn without_text(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            text: false,
        }
    }

    pub fn draws_text(&self) -> bool {
        self.text
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Parses the caller's dates, then renders the window they delimit.
    #[instrument(skip(self, sequence))]
    pub fn render(&self, sequence: &ForecastSequence, start: &str, end: &str) -> Result<RenderedReport> {
        let range = DateRange::parse(start, end)?;
        self.render_range(sequence, &range)
    }

    pub fn render_range(&self, sequence: &ForecastSequence, range: &DateRange) -> Result<RenderedReport> {
        let window = filter_window(sequence, range);
        let chart = BarChart::from_window(&window);
        if range.is_inverted() {
            debug!("Inverted range {} > {}, rendering empty chart", range.start, range.end);
        }
        let png = self.rasterize(&chart)?;
        Ok(RenderedReport {
            range: *range,
            chart,
            png,
        })
    }

    /// Draws `chart` into a PNG image.
    pub fn rasterize(&self, chart: &BarChart) -> Result<Vec<u8>> {
        let (width, height) = (self.width, self.height);
        if width == 0 || height == 0 {
            return Err(ComputeError::Render(format!("invalid chart size {}x{}", width, height)));
        }

        let mut pixels = vec![0u8; width as usize * height as usize * 3];
        {
            // The drawing area borrows the buffer and is released on every exit path.
            let root = BitMapBackend::with_buffer(&mut pixels, (width, height)).into_drawing_area();
            root.fill(&WHITE).map_err(render_error)?;
            self.draw(&root, chart)?;
            root.present().map_err(render_error)?;
        }

        let png = encode_png(pixels, width, height)?;
        debug!(
            "Rendered {} bars into {}x{} PNG ({} bytes)",
            chart.bars.len(),
            width,
            height,
            png.len()
        );
        Ok(png)
    }

    fn draw(&self, root: &DrawingArea<BitMapBackend<'_>, Shift>, chart: &BarChart) -> Result<()> {
        let (y_min, y_max) = chart.value_bounds();

        let mut builder = ChartBuilder::on(root);
        builder.margin(20);
        if self.text {
            builder
                .caption(&chart.title, (FONT_FAMILY, 30))
                .x_label_area_size(50)
                .y_label_area_size(80);
        }
        let mut ctx = builder
            .build_cartesian_2d(0.5f64..12.5f64, y_min..y_max)
            .map_err(render_error)?;

        if self.text {
            ctx.configure_mesh()
                .disable_x_mesh()
                .x_labels(12)
                .x_label_formatter(&|x| format!("{:.0}", x))
                .x_desc(chart.x_label.as_str())
                .y_desc(chart.y_label.as_str())
                .label_style((FONT_FAMILY, 14))
                .axis_desc_style((FONT_FAMILY, 18))
                .draw()
                .map_err(render_error)?;
        }

        let slot = SLOT_FILL / chart.group_count().max(1) as f64;
        for entry in &chart.legend {
            let color = RGBColor(entry.color.0, entry.color.1, entry.color.2);
            let rectangles = chart
                .bars
                .iter()
                .filter(|b| b.year == entry.year)
                .map(move |b| {
                    let left = bar_left(b, slot);
                    Rectangle::new([(left, 0.0), (left + slot, b.value)], color.filled())
                });
            let series = ctx.draw_series(rectangles).map_err(render_error)?;
            if self.text {
                series
                    .label(entry.year.to_string())
                    .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
            }
        }

        if self.text {
            let label_style = TextStyle::from((FONT_FAMILY, 12).into_font());
            ctx.draw_series(chart.bars.iter().map(|b| {
                Text::new(
                    b.label.clone(),
                    (bar_left(b, slot) + slot / 2.0, b.value),
                    label_style.pos(Pos::new(HPos::Center, label_anchor(b.value))),
                )
            }))
            .map_err(render_error)?;

            if !chart.legend.is_empty() {
                ctx.configure_series_labels()
                    .position(SeriesLabelPosition::UpperRight)
                    .background_style(&WHITE.mix(0.8))
                    .border_style(&BLACK)
                    .label_font((FONT_FAMILY, 14))
                    .draw()
                    .map_err(render_error)?;
            }
        }

        Ok(())
    }
}

/// Labels sit just beyond the end of the bar: above it, or below a negative one.
fn label_anchor(value: f64) -> VPos {
    if value < 0.0 { VPos::Top } else { VPos::Bottom }
}

/// Left edge of a bar; bars of the same month are dodged by year group.
fn bar_left(bar: &Bar, slot: f64) -> f64 {
    bar.month as f64 - SLOT_FILL / 2.0 + bar.group as f64 * slot
}

fn encode_png(pixels: Vec<u8>, width: u32, height: u32) -> Result<Vec<u8>> {
    let image = RgbImage::from_raw(width, height, pixels)
        .ok_or_else(|| ComputeError::Render("pixel buffer does not match chart size".to_string()))?;
    let mut png = Vec::new();
    image.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
    Ok(png)
}
