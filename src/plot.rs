use std::ops::Range;
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use image::{ExtendedColorType, ImageFormat};
use plotters::prelude::*;

use crate::fonts::FONT_FAMILY;
use crate::regression::LinearFit;

pub const X_AXIS_LABEL: &str = "Petal Length (cm)";
pub const Y_AXIS_LABEL: &str = "Sepal Length (cm)";
pub const LINE_LABEL: &str = "Regression Line";

/// Smallest accepted image edge, in pixels.
pub const MIN_SIZE: u32 = 100;

// ---------------------------------------------------------------------------
// Figure – one drawing surface per species
// ---------------------------------------------------------------------------

/// An RGB raster the regression chart is drawn into before being encoded.
pub struct Figure {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    /// Draw caption, tick labels, axis titles and the legend.
    text: bool,
}

impl Figure {
    pub fn new(width: u32, height: u32, text: bool) -> Result<Self> {
        if width < MIN_SIZE || height < MIN_SIZE {
            bail!("figure size {width}x{height} is below the {MIN_SIZE}x{MIN_SIZE} minimum");
        }
        Ok(Figure {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 3],
            text,
        })
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Scatter `(x, y)` in `color` and overlay the fitted line across the
    /// observed x range.
    pub fn draw_regression(
        &mut self,
        species: &str,
        x: &[f64],
        y: &[f64],
        fit: &LinearFit,
        color: RGBColor,
    ) -> Result<()> {
        let (x_min, x_max) = bounds(x.iter().copied()).context("no points to plot")?;
        let line = [(x_min, fit.predict(x_min)), (x_max, fit.predict(x_max))];
        let (y_min, y_max) = bounds(y.iter().copied().chain(line.iter().map(|p| p.1)))
            .context("no points to plot")?;
        let x_range = padded(x_min, x_max);
        let y_range = padded(y_min, y_max);

        let root = BitMapBackend::with_buffer(&mut self.pixels, (self.width, self.height))
            .into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        let mut builder = ChartBuilder::on(&root);
        builder.margin(12);
        if self.text {
            builder
                .caption(species, (FONT_FAMILY, 22))
                .x_label_area_size(40)
                .y_label_area_size(50);
        }
        let mut chart = builder
            .build_cartesian_2d(x_range.clone(), y_range.clone())
            .map_err(draw_err)?;

        if self.text {
            chart
                .configure_mesh()
                .x_desc(X_AXIS_LABEL)
                .y_desc(Y_AXIS_LABEL)
                .label_style((FONT_FAMILY, 13))
                .draw()
                .map_err(draw_err)?;
        } else {
            chart
                .draw_series(std::iter::once(Rectangle::new(
                    [(x_range.start, y_range.start), (x_range.end, y_range.end)],
                    BLACK.stroke_width(1),
                )))
                .map_err(draw_err)?;
        }

        chart
            .draw_series(
                x.iter()
                    .zip(y)
                    .map(|(&xi, &yi)| Circle::new((xi, yi), 4, color.filled())),
            )
            .map_err(draw_err)?
            .label(species)
            .legend(move |(lx, ly)| Circle::new((lx + 10, ly), 4, color.filled()));

        chart
            .draw_series(LineSeries::new(line, RED.stroke_width(2)))
            .map_err(draw_err)?
            .label(LINE_LABEL)
            .legend(|(lx, ly)| PathElement::new(vec![(lx, ly), (lx + 20, ly)], RED.stroke_width(2)));

        if self.text {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperLeft)
                .label_font((FONT_FAMILY, 14))
                .background_style(WHITE.mix(0.85))
                .border_style(BLACK)
                .draw()
                .map_err(draw_err)?;
        }

        root.present().map_err(draw_err)?;
        Ok(())
    }

    /// Encode the figure as PNG, replacing any existing file at `path`.
    pub fn save_png(&self, path: &Path) -> Result<()> {
        image::save_buffer_with_format(
            path,
            &self.pixels,
            self.width,
            self.height,
            ExtendedColorType::Rgb8,
            ImageFormat::Png,
        )
        .with_context(|| format!("writing {}", path.display()))?;
        log::debug!("wrote {}", path.display());
        Ok(())
    }
}

fn draw_err<E: std::fmt::Display>(e: E) -> anyhow::Error {
    anyhow!("drawing chart: {e}")
}

fn bounds(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

/// Widen `[min, max]` by 5% on each side; a degenerate range gets ±0.5.
fn padded(min: f64, max: f64) -> Range<f64> {
    let span = max - min;
    let pad = if span > 0.0 { span * 0.05 } else { 0.5 };
    (min - pad)..(max + pad)
}

// ---------------------------------------------------------------------------
// Output naming
// ---------------------------------------------------------------------------

/// `<species>.png`, with characters that are unsafe in file names replaced
/// by `_`.
pub fn output_file_name(species: &str) -> String {
    let stem: String = species
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let stem = stem.trim();
    if stem.is_empty() || stem.chars().all(|c| c == '.') {
        "unnamed.png".to_string()
    } else {
        format!("{stem}.png")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regression::fit;

    fn figure_with(x: &[f64], y: &[f64], color: RGBColor) -> Figure {
        let fit = fit(x, y).unwrap();
        let mut figure = Figure::new(320, 240, false).unwrap();
        figure.draw_regression("setosa", x, y, &fit, color).unwrap();
        figure
    }

    #[test]
    fn file_name_is_species_plus_png() {
        assert_eq!(output_file_name("setosa"), "setosa.png");
        assert_eq!(output_file_name("Iris virginica"), "Iris virginica.png");
    }

    #[test]
    fn file_name_replaces_unsafe_characters() {
        assert_eq!(output_file_name("a/b\\c:d"), "a_b_c_d.png");
        assert_eq!(output_file_name("x\ny"), "x_y.png");
        assert_eq!(output_file_name("../etc"), ".._etc.png");
    }

    #[test]
    fn file_name_never_empty() {
        assert_eq!(output_file_name(""), "unnamed.png");
        assert_eq!(output_file_name("  "), "unnamed.png");
        assert_eq!(output_file_name(".."), "unnamed.png");
    }

    #[test]
    fn tiny_figure_is_rejected() {
        assert!(Figure::new(10, 480, false).is_err());
    }

    #[test]
    fn padding_handles_degenerate_range() {
        assert_eq!(padded(2.0, 2.0), 1.5..2.5);
        let r = padded(0.0, 10.0);
        assert!((r.start + 0.5).abs() < 1e-12 && (r.end - 10.5).abs() < 1e-12);
    }

    #[test]
    fn chart_contains_points_and_line() {
        let color = RGBColor(20, 90, 200);
        let figure = figure_with(&[1.0, 2.0, 3.0], &[2.0, 4.1, 5.9], color);

        let pixels: Vec<&[u8]> = figure.pixels.chunks(3).collect();
        assert!(pixels.iter().any(|p| *p == [color.0, color.1, color.2]));
        assert!(pixels.iter().any(|p| p[0] > 200 && p[1] < 80 && p[2] < 80));
        assert!(pixels.iter().any(|p| *p == [255, 255, 255]));
    }

    #[test]
    fn chart_with_text_renders_when_a_system_font_exists() {
        if !crate::fonts::install(None).unwrap() {
            return;
        }
        let x = [1.0, 2.0, 3.0];
        let y = [2.0, 4.1, 5.9];
        let fit = fit(&x, &y).unwrap();
        let mut figure = Figure::new(640, 480, true).unwrap();
        figure
            .draw_regression("setosa", &x, &y, &fit, RGBColor(20, 90, 200))
            .unwrap();

        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("setosa.png");
        figure.save_png(&path).unwrap();
        let decoded = image::open(&path).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (640, 480));
    }

    #[test]
    fn saved_png_has_figure_dimensions() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("setosa.png");
        let figure = figure_with(&[1.0, 2.0], &[2.0, 4.0], BLUE);
        figure.save_png(&path).unwrap();

        let decoded = image::open(&path).unwrap();
        assert_eq!((decoded.width(), decoded.height()), figure.size());
    }

    #[test]
    fn rendering_is_deterministic() {
        let dir = tempfile::TempDir::new().unwrap();
        let first = dir.path().join("first.png");
        let second = dir.path().join("second.png");

        figure_with(&[1.0, 2.0, 4.0], &[2.0, 4.5, 7.0], BLUE)
            .save_png(&first)
            .unwrap();
        figure_with(&[1.0, 2.0, 4.0], &[2.0, 4.5, 7.0], BLUE)
            .save_png(&second)
            .unwrap();

        assert_eq!(std::fs::read(first).unwrap(), std::fs::read(second).unwrap());
    }

    #[test]
    fn save_overwrites_existing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("setosa.png");
        std::fs::write(&path, b"stale").unwrap();

        figure_with(&[1.0, 2.0], &[2.0, 4.0], BLUE).save_png(&path).unwrap();
        assert!(image::open(&path).is_ok());
    }
}
