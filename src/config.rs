// Every tunable value lives here. There is no runtime override: edit and rebuild.

use egui::Color32;

pub const DATA_FILE: &str = "primo_data.tsv";

// Row index (header included) at which reading stops. Useful when the tail
// of the file holds incomplete rows.
pub const LAST_DAY: usize = 375;

pub const NEW_BANNER_FLAG: &str = "T";

pub const AVERAGE_DIVISOR: f64 = 365.0;

// A day with an unchanged balance is counted as a (zero) use when true,
// and in neither total when false.
pub const COUNT_UNCHANGED_AS_USED: bool = true;

// Resolution at which egui's default zoom factor of 1.0 applies.
const REFERENCE_DPI: f32 = 100.0;

// Banners with more than one featured character use a newline.
pub const BANNER_LABELS: [&str; 18] = [
    "Shenhe\nXiao",
    "Zhongli\nGanyu",
    "Yae Miko",
    "Raiden\nKokomi",
    "Ayato\nVenti",
    "Ayaka",
    "Yelan\nXiao",
    "Itto",
    "Kazuha\nKlee",
    "Yoimiya",
    "Tighnari\nZhongli",
    "Ganyu\nKokomi",
    "Cyno\nVenti",
    "Nilou\nAlbedo",
    "Nahida\nYoimiya",
    "Yae Miko\nTartaglia",
    "Wanderer\nItto",
    "Raiden\nAyato",
];

pub const MONTH_TICKS: [f64; 12] = [
    0.0, 33.0, 63.0, 94.0, 124.0, 156.0, 186.0, 218.0, 249.0, 280.0, 312.0, 343.0,
];

pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Plot geometry, in data coordinates unless stated otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartConfig {
    pub last_day: usize,
    pub begin_plot: f64,
    pub end_plot: f64,
    pub top_plot: f64,
    pub banner_box_bottom: f64,
    pub banner_box_height: f64,
    pub banner_text_y: f64,

    pub figure_inches: [f32; 2],
    pub dpi: f32,

    pub balance_color: Color32,
    pub pull_color: Color32,
    pub rule_color: Color32,
    pub banner_band_color: Color32,

    pub balance_width: f32,
    pub pull_width: f32,
    pub year_mark_width: f32,
    pub axis_title_size: f32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        ChartConfig {
            last_day: LAST_DAY,
            begin_plot: -2.0,
            end_plot: 384.0,
            top_plot: 52_000.0,
            banner_box_bottom: 48_500.0,
            banner_box_height: 4_000.0,
            banner_text_y: 50_000.0,

            figure_inches: [18.0, 8.0],
            dpi: 160.0,

            // matplotlib's default first series color
            balance_color: Color32::from_rgb(31, 119, 180),
            pull_color: Color32::RED,
            rule_color: Color32::BLACK,
            banner_band_color: Color32::from_rgba_unmultiplied(0, 128, 0, 51),

            balance_width: 5.0,
            pull_width: 4.0,
            year_mark_width: 4.0,
            axis_title_size: 20.0,
        }
    }
}

impl ChartConfig {
    /// Window size in pixels at `dpi`.
    pub fn figure_size(&self) -> [f32; 2] {
        [self.figure_inches[0] * self.dpi, self.figure_inches[1] * self.dpi]
    }

    /// Scales text and strokes with the resolution, the way a higher-dpi figure does.
    pub fn zoom_factor(&self) -> f32 {
        self.dpi / REFERENCE_DPI
    }
}
