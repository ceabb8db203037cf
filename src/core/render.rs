use crate::core::stats::find_outliers;
use crate::core::{ChartRenderer, ConfigProvider, ControlLimits, SubgroupRecord};
use crate::utils::error::{NpChartError, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use std::error::Error;
use std::path::PathBuf;

const SERIES_COLOR: RGBColor = RGBColor(0x1f, 0x77, 0xb4);
const LIMIT_COLOR: RGBColor = RGBColor(0xd6, 0x27, 0x28);
const CENTER_COLOR: RGBColor = RGBColor(0x2c, 0xa0, 0x2c);
const OUTLIER_COLOR: RGBColor = RGBColor(0xff, 0x00, 0x00);

/// Share of the image width given to the plot; the rest holds the stats block.
const PLOT_WIDTH_PERCENT: u32 = 82;

type DrawResult = std::result::Result<(), Box<dyn Error>>;

/// Draws the np chart with plotters. `.svg` paths produce SVG, anything else a PNG.
pub struct PlottersRenderer {
    output_path: PathBuf,
    width: u32,
    height: u32,
    title: String,
}

impl PlottersRenderer {
    pub fn new(output_path: impl Into<PathBuf>, width: u32, height: u32, title: impl Into<String>) -> Self {
        Self {
            output_path: output_path.into(),
            width,
            height,
            title: title.into(),
        }
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        let (width, height) = config.dimensions();
        Self::new(config.output_path(), width, height, config.title())
    }

    fn is_svg(&self) -> bool {
        self.output_path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"))
    }

    fn draw<DB>(&self, root: &DrawingArea<DB, Shift>, records: &[SubgroupRecord], limits: &ControlLimits) -> DrawResult
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        root.fill(&WHITE)?;
        let (plot_area, stats_area) = root.split_horizontally(self.width * PLOT_WIDTH_PERCENT / 100);

        let (x_range, y_range) = axis_ranges(records, limits);
        let mut chart = ChartBuilder::on(&plot_area)
            .caption(&self.title, ("sans-serif", 24))
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(60)
            .build_cartesian_2d(x_range.clone(), y_range)?;

        chart
            .configure_mesh()
            .x_desc("Subgroup")
            .y_desc("Number of defective units")
            .light_line_style(BLACK.mix(0.06))
            .draw()?;

        let points: Vec<(f64, f64)> = records
            .iter()
            .map(|r| (r.subgroup as f64, r.defective as f64))
            .collect();

        chart
            .draw_series(LineSeries::new(points.clone(), SERIES_COLOR.stroke_width(2)))?
            .label("Defective (np)")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], SERIES_COLOR));
        chart.draw_series(points.iter().map(|&p| Circle::new(p, 3, SERIES_COLOR.filled())))?;

        let horizontal = |y: f64| vec![(x_range.start, y), (x_range.end, y)];
        chart
            .draw_series(DashedLineSeries::new(
                horizontal(limits.ucl),
                10,
                6,
                LIMIT_COLOR.stroke_width(2),
            ))?
            .label(format!("UCL ({:.2})", limits.ucl))
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], LIMIT_COLOR));
        chart
            .draw_series(LineSeries::new(horizontal(limits.cl), CENTER_COLOR.stroke_width(2)))?
            .label(format!("CL ({:.2})", limits.cl))
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], CENTER_COLOR));
        chart
            .draw_series(DashedLineSeries::new(
                horizontal(limits.lcl),
                10,
                6,
                LIMIT_COLOR.stroke_width(2),
            ))?
            .label(format!("LCL ({:.2})", limits.lcl))
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], LIMIT_COLOR));

        let outliers = find_outliers(records, limits);
        if !outliers.is_empty() {
            let label_style = ("sans-serif", 15).into_font().color(&OUTLIER_COLOR);
            chart
                .draw_series(outliers.iter().map(|r| {
                    EmptyElement::at((r.subgroup as f64, r.defective as f64))
                        + Circle::new((0, 0), 6, OUTLIER_COLOR.filled())
                        + Text::new(r.defective.to_string(), (-5, -24), label_style.clone())
                }))?
                .label("Out of control")
                .legend(|(x, y)| Circle::new((x + 10, y), 5, OUTLIER_COLOR.filled()));
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;

        draw_stats_block(&stats_area, limits)?;

        root.present()?;
        Ok(())
    }
}

impl PlottersRenderer {
    /// PNG regardless of the path's extension.
    fn draw_png(&self, records: &[SubgroupRecord], limits: &ControlLimits) -> DrawResult {
        let mut buffer = vec![0u8; self.width as usize * self.height as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (self.width, self.height))
                .into_drawing_area();
            self.draw(&root, records, limits)?;
        }

        image::save_buffer_with_format(
            &self.output_path,
            &buffer,
            self.width,
            self.height,
            image::ColorType::Rgb8,
            image::ImageFormat::Png,
        )?;
        Ok(())
    }
}

impl ChartRenderer for PlottersRenderer {
    fn render(&self, records: &[SubgroupRecord], limits: &ControlLimits) -> Result<String> {
        let path_display = self.output_path.display().to_string();
        let size = (self.width, self.height);
        tracing::debug!("Rendering {} subgroups to {} ({}x{})", records.len(), path_display, size.0, size.1);

        let outcome = if self.is_svg() {
            let root = SVGBackend::new(&self.output_path, size).into_drawing_area();
            self.draw(&root, records, limits)
        } else {
            self.draw_png(records, limits)
        };

        outcome.map_err(|e| NpChartError::RenderFailure {
            path: path_display.clone(),
            message: e.to_string(),
        })?;

        Ok(path_display)
    }
}

fn draw_stats_block<DB>(area: &DrawingArea<DB, Shift>, limits: &ControlLimits) -> DrawResult
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    const LINE_HEIGHT: i32 = 24;

    let lines = stats_lines(limits);
    let (width, height) = area.dim_in_pixel();
    let block_height = LINE_HEIGHT * lines.len() as i32;
    let top = (height as i32 - block_height) / 2;

    area.draw(&Rectangle::new(
        [(8, top - 12), (width as i32 - 12, top + block_height + 4)],
        BLACK.mix(0.6).stroke_width(1),
    ))?;

    let style = ("sans-serif", 16).into_font().color(&BLACK);
    for (i, line) in lines.iter().enumerate() {
        area.draw(&Text::new(
            line.as_str(),
            (20, top + i as i32 * LINE_HEIGHT),
            style.clone(),
        ))?;
    }
    Ok(())
}

/// Text shown beside the plot.
pub fn stats_lines(limits: &ControlLimits) -> Vec<String> {
    vec![
        format!("n = {}", limits.n),
        format!("CL = {:.2}", limits.cl),
        format!("UCL = {:.2}", limits.ucl),
        format!("LCL = {:.2}", limits.lcl),
    ]
}

/// X spans the subgroup ids with half a step of padding; Y starts at zero and
/// leaves headroom above the larger of the highest count and UCL.
pub fn axis_ranges(
    records: &[SubgroupRecord],
    limits: &ControlLimits,
) -> (std::ops::Range<f64>, std::ops::Range<f64>) {
    let ids = records.iter().map(|r| r.subgroup as f64);
    let x_min = ids.clone().fold(f64::INFINITY, f64::min);
    let x_max = ids.fold(f64::NEG_INFINITY, f64::max);
    let (x_min, x_max) = if x_min.is_finite() {
        (x_min - 0.5, x_max + 0.5)
    } else {
        (0.0, 1.0)
    };

    let top = records
        .iter()
        .map(|r| r.defective as f64)
        .fold(limits.ucl, f64::max);
    let y_max = if top > 0.0 { top * 1.15 } else { 1.0 };

    (x_min..x_max, 0.0..y_max)
}
