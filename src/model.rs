#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub date_label: String,
    pub day_index: f64,
    pub new_banner: bool,
    pub amount: i64,
}

/// Amounts and day indices, index-aligned with the rows they came from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    pub days: Vec<f64>,
    pub amounts: Vec<i64>,
}

impl Series {
    pub fn push(&mut self, row: &Row) {
        self.days.push(row.day_index);
        self.amounts.push(row.amount);
    }

    pub fn len(&self) -> usize {
        self.amounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.amounts.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub position: usize,
    // Flagged rows past the end of the label list still get a separator.
    pub label: Option<String>,
}

/// Balance decrease between two consecutive rows; `end == start + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropEvent {
    pub start: usize,
    pub end: usize,
    pub start_amount: i64,
    pub end_amount: i64,
}

impl DropEvent {
    pub fn spent(&self) -> u64 {
        self.start_amount.abs_diff(self.end_amount)
    }
}
