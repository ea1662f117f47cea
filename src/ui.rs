use std::ops::RangeInclusive;

use eframe::egui;
use egui::{Align2, Color32, Context, RichText, Stroke, Visuals};
use egui_plot::{
    Corner, GridInput, GridMark, Legend, Line, LineStyle, Plot, PlotPoint, PlotPoints, Polygon,
    Text,
};
use tracing::{info, warn};

use crate::config::{ChartConfig, MONTH_LABELS, MONTH_TICKS};
use crate::error::PrimoResult;
use crate::stats::Analysis;

const TITLE: &str = "Primogem History";

const BALANCE_LEGEND: &str = "Primogems Gained";
const PULL_LEGEND: &str = "Primogems Used";
const BANNER_LEGEND: &str = "Banners";
const YEAR_LEGEND: &str = "Start/End of Year";

#[derive(Debug, Clone, PartialEq)]
pub struct BannerText {
    pub x: f64,
    pub y: f64,
    pub label: String,
}

pub type Segment = [[f64; 2]; 2];

/// Everything the chart draws, in data coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartLayout {
    pub banner_texts: Vec<BannerText>,
    pub separators: Vec<Segment>,
    pub baseline: Segment,
    pub balance: Vec<[f64; 2]>,
    pub pulls: Vec<Segment>,
    pub banner_band: Vec<[f64; 2]>,
    pub year_marks: [Segment; 2],
}

impl ChartLayout {
    pub fn build(analysis: &Analysis, config: &ChartConfig) -> Self {
        let labelled: Vec<_> = analysis.labelled_banners().collect();

        // Each label sits midway through its banner; the last one runs to the edge of the plot.
        let banner_texts = labelled
            .iter()
            .enumerate()
            .map(|(i, (banner, label))| {
                let end = labelled
                    .get(i + 1)
                    .map(|(next, _)| next.position as f64)
                    .unwrap_or(config.end_plot);
                BannerText {
                    x: (banner.position as f64 + end) / 2.0,
                    y: config.banner_text_y,
                    label: label.to_string(),
                }
            })
            .collect();

        let separators = analysis
            .banners
            .iter()
            .map(|b| {
                let x = b.position as f64;
                [[x, 0.0], [x, config.top_plot]]
            })
            .collect();

        let balance = analysis
            .series
            .amounts
            .iter()
            .enumerate()
            .map(|(i, &amount)| [i as f64, amount as f64])
            .collect();

        let pulls = analysis
            .drops
            .iter()
            .map(|d| {
                [
                    [d.start as f64, d.start_amount as f64],
                    [d.end as f64, d.end_amount as f64],
                ]
            })
            .collect();

        let (left, right) = (config.begin_plot, config.end_plot);
        let bottom = config.banner_box_bottom;
        let top = bottom + config.banner_box_height;
        let banner_band = vec![[left, bottom], [right, bottom], [right, top], [left, top]];

        let last = config.last_day as f64 - 1.0;

        ChartLayout {
            banner_texts,
            separators,
            baseline: [[0.0, 0.0], [config.end_plot, 0.0]],
            balance,
            pulls,
            banner_band,
            year_marks: [[[-1.0, 0.0], [-1.0, bottom]], [[last, 0.0], [last, bottom]]],
        }
    }
}

fn month_marks() -> Vec<GridMark> {
    MONTH_TICKS
        .iter()
        .map(|&value| GridMark { value, step_size: 31.0 })
        .collect()
}

fn month_label(mark: GridMark, _range: &RangeInclusive<f64>) -> String {
    MONTH_TICKS
        .iter()
        .position(|&tick| (tick - mark.value).abs() < 0.5)
        .map(|i| MONTH_LABELS[i].to_string())
        .unwrap_or_default()
}

pub fn set_custom_style(ctx: &Context) {
    // Black rules and labels need a light background.
    let mut visuals = Visuals::light();
    visuals.panel_fill = Color32::WHITE;
    visuals.extreme_bg_color = Color32::WHITE;
    ctx.set_visuals(visuals);
}

pub struct PrimoChart {
    layout: ChartLayout,
    config: ChartConfig,
}

impl PrimoChart {
    pub fn new(layout: ChartLayout, config: ChartConfig) -> Self {
        Self { layout, config }
    }
}

impl eframe::App for PrimoChart {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let layout = &self.layout;
        let config = &self.config;

        egui::CentralPanel::default().show(ctx, |ui| {
            Plot::new("primogems")
                .legend(
                    Legend::default()
                        .position(Corner::RightTop)
                        .background_alpha(1.0),
                )
                .default_x_bounds(config.begin_plot, config.end_plot)
                .default_y_bounds(0.0, config.top_plot)
                .x_grid_spacer(|_: GridInput| month_marks())
                .x_axis_formatter(month_label)
                .x_axis_label(RichText::new("Month").size(config.axis_title_size))
                .y_axis_label(RichText::new("Primogem Amount").size(config.axis_title_size))
                .show(ui, |plot_ui| {
                    let segment = |name: &str, points: Segment| {
                        Line::new(name.to_owned(), PlotPoints::new(points.to_vec()))
                    };

                    for text in &layout.banner_texts {
                        plot_ui.text(
                            Text::new(
                                "",
                                PlotPoint::new(text.x, text.y),
                                RichText::new(&text.label),
                            )
                            .anchor(Align2::CENTER_CENTER)
                            .color(config.rule_color),
                        );
                    }

                    for &sep in &layout.separators {
                        plot_ui.line(
                            segment("", sep)
                                .color(config.rule_color)
                                .style(LineStyle::Dotted { spacing: 6.0 }),
                        );
                    }

                    plot_ui.line(
                        segment("", layout.baseline)
                            .color(config.rule_color)
                            .style(LineStyle::Dashed { length: 10.0 }),
                    );

                    plot_ui.line(
                        Line::new(BALANCE_LEGEND, PlotPoints::new(layout.balance.clone()))
                            .color(config.balance_color)
                            .width(config.balance_width),
                    );

                    // Same name on every segment, so the legend shows a single entry.
                    for &pull in &layout.pulls {
                        plot_ui.line(
                            segment(PULL_LEGEND, pull)
                                .color(config.pull_color)
                                .width(config.pull_width),
                        );
                    }

                    plot_ui.polygon(
                        Polygon::new(BANNER_LEGEND, PlotPoints::new(layout.banner_band.clone()))
                            .fill_color(config.banner_band_color)
                            .stroke(Stroke::NONE),
                    );

                    let [start, end] = layout.year_marks;
                    plot_ui.line(
                        segment("", start)
                            .color(config.rule_color)
                            .width(config.year_mark_width),
                    );
                    plot_ui.line(
                        segment(YEAR_LEGEND, end)
                            .color(config.rule_color)
                            .width(config.year_mark_width),
                    );
                });
        });
    }
}

/// Opens the chart window and blocks until it is closed.
pub fn show(analysis: &Analysis, config: ChartConfig) -> PrimoResult<()> {
    if analysis.series.is_empty() {
        warn!("no rows to plot");
    }

    let layout = ChartLayout::build(analysis, &config);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(TITLE)
            .with_inner_size(config.figure_size()),
        ..Default::default()
    };

    info!(
        points = layout.balance.len(),
        pulls = layout.pulls.len(),
        banners = layout.separators.len(),
        "opening chart window"
    );

    eframe::run_native(
        TITLE,
        options,
        Box::new(move |cc| {
            set_custom_style(&cc.egui_ctx);
            cc.egui_ctx.set_zoom_factor(config.zoom_factor());
            Ok(Box::new(PrimoChart::new(layout, config)))
        }),
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BANNER_LABELS;
    use crate::model::Row;
    use crate::stats::{analyze, UnchangedPolicy};

    fn analysis(amounts: &[i64], banners: &[usize], labels: &[&str]) -> Analysis {
        let rows: Vec<Row> = amounts
            .iter()
            .enumerate()
            .map(|(i, &amount)| Row {
                date_label: format!("d{}", i + 1),
                day_index: i as f64,
                new_banner: banners.contains(&i),
                amount,
            })
            .collect();
        analyze(&rows, labels, UnchangedPolicy::default()).unwrap()
    }

    #[test]
    fn banner_labels_sit_midway() {
        let a = analysis(&[100, 80, 150, 200, 90], &[0, 2], &["Ayaka", "Itto"]);
        let layout = ChartLayout::build(&a, &ChartConfig::default());

        assert_eq!(
            layout.banner_texts,
            [
                BannerText { x: 1.0, y: 50_000.0, label: "Ayaka".into() },
                BannerText { x: 193.0, y: 50_000.0, label: "Itto".into() },
            ]
        );
        assert_eq!(
            layout.separators,
            [[[0.0, 0.0], [0.0, 52_000.0]], [[2.0, 0.0], [2.0, 52_000.0]]]
        );
    }

    #[test]
    fn one_segment_per_pull() {
        let a = analysis(&[100, 80, 150, 200, 90], &[], &[]);
        let layout = ChartLayout::build(&a, &ChartConfig::default());

        assert_eq!(layout.balance.len(), 5);
        assert_eq!(layout.balance[1], [1.0, 80.0]);
        assert_eq!(
            layout.pulls,
            [[[0.0, 100.0], [1.0, 80.0]], [[3.0, 200.0], [4.0, 90.0]]]
        );
    }

    #[test]
    fn fixed_decorations() {
        let layout = ChartLayout::build(&analysis(&[1, 2], &[], &[]), &ChartConfig::default());

        assert_eq!(layout.baseline, [[0.0, 0.0], [384.0, 0.0]]);
        assert_eq!(
            layout.banner_band,
            [[-2.0, 48_500.0], [384.0, 48_500.0], [384.0, 52_500.0], [-2.0, 52_500.0]]
        );
        assert_eq!(
            layout.year_marks,
            [[[-1.0, 0.0], [-1.0, 48_500.0]], [[374.0, 0.0], [374.0, 48_500.0]]]
        );
    }

    #[test]
    fn every_reference_label_is_drawn() {
        let flagged: Vec<usize> = (0..20).map(|i| i * 18).collect();
        let amounts: Vec<i64> = (0..374).map(|i| 1_000 + i).collect();
        let a = analysis(&amounts, &flagged, &BANNER_LABELS);
        let layout = ChartLayout::build(&a, &ChartConfig::default());

        assert_eq!(layout.banner_texts.len(), BANNER_LABELS.len());
        assert_eq!(layout.separators.len(), flagged.len());
        // Unlabelled banners after the last label do not shorten its period.
        assert_eq!(layout.banner_texts[17].x, (306.0 + 384.0) / 2.0);
    }

    #[test]
    fn month_axis() {
        let marks = month_marks();
        assert_eq!(marks.len(), 12);
        assert_eq!(marks[11].value, 343.0);

        let feb = GridMark { value: 33.0, step_size: 31.0 };
        assert_eq!(month_label(feb, &(-2.0..=384.0)), "Feb");

        let off_tick = GridMark { value: 50.0, step_size: 31.0 };
        assert_eq!(month_label(off_tick, &(-2.0..=384.0)), "");
    }
}
