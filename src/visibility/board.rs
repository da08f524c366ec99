use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use super::{DateRange, DateRangeFilter, SortOrder, VisibilityEngine};
use crate::domain::Notice;

/// Board controls owned by whoever is showing the board.
#[derive(Debug, Clone, Default)]
pub struct BoardState {
    pub sort_order: SortOrder,
    pub filter: DateRangeFilter,
}

/// What the board shows for one evaluation.
#[derive(Debug, Clone, Serialize)]
pub struct BoardView {
    pub notices: Vec<Notice>,
    pub count: usize,
    pub sort_order: SortOrder,
    pub sort_label: &'static str,
    pub filter_active: bool,
    pub range: Option<DateRange>,
}

impl BoardState {
    pub fn new(sort_order: SortOrder) -> Self {
        Self {
            sort_order,
            filter: DateRangeFilter::new(),
        }
    }

    pub fn toggle_sort(&mut self) -> SortOrder {
        self.sort_order = self.sort_order.toggled();
        self.sort_order
    }

    pub fn set_start(&mut self, start: Option<NaiveDate>) {
        self.filter.set_start(start);
    }

    pub fn set_end(&mut self, end: Option<NaiveDate>) {
        self.filter.set_end(end);
    }

    pub fn apply_filter(&mut self) -> bool {
        self.filter.apply()
    }

    pub fn clear_filter(&mut self) {
        self.filter.clear();
    }

    pub fn evaluate(
        &self,
        engine: &VisibilityEngine,
        notices: &[Notice],
        now: NaiveDateTime,
    ) -> BoardView {
        let range = self.filter.effective_range();
        let visible = engine.compute_visible_notices(notices, now, self.sort_order, range);

        BoardView {
            count: visible.count(),
            notices: visible.into_vec(),
            sort_order: self.sort_order,
            sort_label: self.sort_order.label(),
            filter_active: self.filter.is_active(),
            range,
        }
    }
}
