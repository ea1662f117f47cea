use std::cmp::Ordering;
use std::fmt;

use tracing::debug;

use crate::config::AVERAGE_DIVISOR;
use crate::error::{PrimoError, PrimoResult};
use crate::model::{Banner, DropEvent, Row, Series};

/// Where a day with no change in balance is counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnchangedPolicy {
    // Zero-length step credited to `used`.
    #[default]
    CountAsUsed,
    Ignore,
}

impl UnchangedPolicy {
    pub fn new(count_as_used: bool) -> Self {
        if count_as_used {
            UnchangedPolicy::CountAsUsed
        } else {
            UnchangedPolicy::Ignore
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub gained: i64,
    pub used: i64,
    pub steps_gained: usize,
    pub steps_used: usize,
}

impl Totals {
    /// Returns `None`, leaving the totals untouched, if the step or the running
    /// total does not fit in an `i64`.
    pub fn record(&mut self, prev: i64, current: i64, policy: UnchangedPolicy) -> Option<()> {
        match current.cmp(&prev) {
            Ordering::Greater => {
                self.gained = current.checked_sub(prev)?.checked_add(self.gained)?;
                self.steps_gained += 1;
            }
            Ordering::Less => {
                self.used = prev.checked_sub(current)?.checked_add(self.used)?;
                self.steps_used += 1;
            }
            Ordering::Equal => {
                if policy == UnchangedPolicy::CountAsUsed {
                    self.steps_used += 1;
                }
            }
        }
        Some(())
    }

    // Fixed divisor, not the number of rows actually read.
    pub fn average_gained_per_day(&self) -> f64 {
        self.gained as f64 / AVERAGE_DIVISOR
    }
}

impl fmt::Display for Totals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total Amount of Primogems Gained: {}", self.gained)?;
        // Debug keeps the trailing `.0` on whole numbers.
        writeln!(f, "Daily Average Primogems Gained: {:?}", self.average_gained_per_day())?;
        write!(f, "Total Amount of Primogems Used: {}", self.used)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub series: Series,
    pub totals: Totals,
    pub drops: Vec<DropEvent>,
    pub banners: Vec<Banner>,
}

impl Analysis {
    pub fn labelled_banners(&self) -> impl Iterator<Item = (&Banner, &str)> {
        self.banners
            .iter()
            .filter_map(|b| b.label.as_deref().map(|label| (b, label)))
    }
}

/// Single forward pass over the rows. Totals and drop detection both read
/// the series built so far, so row 0 never starts or ends a drop.
pub fn analyze(
    rows: &[Row],
    labels: &[&str],
    policy: UnchangedPolicy,
) -> PrimoResult<Analysis> {
    let mut series = Series::default();
    let mut totals = Totals::default();
    let mut drops = Vec::new();
    let mut flagged = Vec::new();

    for (k, row) in rows.iter().enumerate() {
        series.push(row);

        if row.new_banner {
            flagged.push(k);
        }

        if k == 0 {
            continue;
        }

        let prev = series.amounts[k - 1];
        let current = series.amounts[k];
        totals
            .record(prev, current, policy)
            .ok_or(PrimoError::Overflow { position: k })?;

        if current < prev {
            drops.push(DropEvent {
                start: k - 1,
                end: k,
                start_amount: prev,
                end_amount: current,
            });
        }
    }

    let banners = label_banners(&flagged, labels)?;

    debug!(
        gained = totals.gained,
        used = totals.used,
        steps_gained = totals.steps_gained,
        steps_used = totals.steps_used,
        last_day = ?series.days.last(),
        drops = drops.len(),
        banners = banners.len(),
        "aggregated series"
    );

    Ok(Analysis { series, totals, drops, banners })
}

fn label_banners(flagged: &[usize], labels: &[&str]) -> PrimoResult<Vec<Banner>> {
    if flagged.len() < labels.len() {
        return Err(PrimoError::BannerMismatch {
            flagged: flagged.len(),
            labels: labels.len(),
        });
    }

    Ok(flagged
        .iter()
        .enumerate()
        .map(|(i, &position)| Banner {
            position,
            label: labels.get(i).map(|l| l.to_string()),
        })
        .collect())
}
