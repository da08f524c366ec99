//! Notice visibility and ordering.
//!
//! A notice is shown when its publish time has been reached, its expiry date
//! (if any) is today or later, and, when a range filter is applied, its
//! publish time falls inside the range. Survivors are ordered by publish time.
//! Everything here is pure: callers pass in the notice snapshot, the current
//! board-local time and their own control state on every call.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::Notice;

pub mod board;
pub mod range;
pub mod timestamp;

pub use board::{BoardState, BoardView};
pub use range::{DateRange, DateRangeFilter};
pub use timestamp::BoardClock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    NewestFirst,
    OldestFirst,
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::NewestFirst => SortOrder::OldestFirst,
            SortOrder::OldestFirst => SortOrder::NewestFirst,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortOrder::NewestFirst => "Newest first",
            SortOrder::OldestFirst => "Oldest first",
        }
    }
}

/// What to do with a notice whose publish time does not parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedTimestamp {
    /// Leave it off the board.
    #[default]
    Exclude,
    /// Show it after every dated notice, in id order. It is not publish- or
    /// range-gated since there is nothing to compare.
    SortLast,
}

/// What to do with a notice whose expiry date does not parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedExpiry {
    #[default]
    NoExpiry,
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VisibilityPolicy {
    pub malformed_timestamp: MalformedTimestamp,
    pub malformed_expiry: MalformedExpiry,
}

/// The ordered, visible subset of a notice snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleNotices {
    notices: Vec<Notice>,
}

impl VisibleNotices {
    pub fn count(&self) -> usize {
        self.notices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }

    pub fn as_slice(&self) -> &[Notice] {
        &self.notices
    }

    pub fn into_vec(self) -> Vec<Notice> {
        self.notices
    }
}

/// A notice annotated for the admin listing, which shows everything.
#[derive(Debug, Clone, Serialize)]
pub struct AdminNotice {
    #[serde(flatten)]
    pub notice: Notice,
    pub is_published: bool,
    pub is_expired: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct VisibilityEngine {
    policy: VisibilityPolicy,
}

impl VisibilityEngine {
    pub fn new(policy: VisibilityPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> VisibilityPolicy {
        self.policy
    }

    /// Applies the publish, expiry and range gates to `all_notices`, then sorts.
    ///
    /// Ties on publish time are broken by id, and newest-first is always the
    /// exact reverse of oldest-first.
    pub fn compute_visible_notices(
        &self,
        all_notices: &[Notice],
        now: NaiveDateTime,
        sort_order: SortOrder,
        range: Option<DateRange>,
    ) -> VisibleNotices {
        let today = now.date();
        let mut dated: Vec<(NaiveDateTime, &Notice)> = Vec::new();
        let mut undated: Vec<&Notice> = Vec::new();

        for notice in all_notices {
            match notice.published_at() {
                Some(published) => {
                    if published > now || !self.passes_expiry_gate(notice, today) {
                        continue;
                    }
                    if let Some(range) = range {
                        if !range.contains(published) {
                            continue;
                        }
                    }
                    dated.push((published, notice));
                }
                None => {
                    tracing::debug!(
                        notice_id = notice.id,
                        publish_date_time = %notice.publish_date_time,
                        "notice has an unparsable publish time"
                    );
                    if self.policy.malformed_timestamp == MalformedTimestamp::SortLast
                        && self.passes_expiry_gate(notice, today)
                    {
                        undated.push(notice);
                    }
                }
            }
        }

        dated.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.id.cmp(&b.1.id)));
        if sort_order == SortOrder::NewestFirst {
            dated.reverse();
        }
        undated.sort_by_key(|notice| notice.id);

        let notices = dated
            .into_iter()
            .map(|(_, notice)| notice)
            .chain(undated)
            .cloned()
            .collect();

        VisibleNotices { notices }
    }

    pub fn visible_count(
        &self,
        all_notices: &[Notice],
        now: NaiveDateTime,
        range: Option<DateRange>,
    ) -> usize {
        self.compute_visible_notices(all_notices, now, SortOrder::default(), range)
            .count()
    }

    /// True when the notice's expiry date is strictly before `today`.
    pub fn is_expired(&self, notice: &Notice, today: NaiveDate) -> bool {
        !self.passes_expiry_gate(notice, today)
    }

    /// Every notice, newest publish time first, flagged with its current state.
    /// Notices with unparsable publish times come last and count as unpublished.
    pub fn annotate_for_admin(&self, all_notices: &[Notice], now: NaiveDateTime) -> Vec<AdminNotice> {
        let today = now.date();
        let mut annotated: Vec<(Option<NaiveDateTime>, AdminNotice)> = all_notices
            .iter()
            .map(|notice| {
                let published = notice.published_at();
                let entry = AdminNotice {
                    notice: notice.clone(),
                    is_published: published.map_or(false, |at| at <= now),
                    is_expired: self.is_expired(notice, today),
                };
                (published, entry)
            })
            .collect();

        annotated.sort_by(|a, b| match (a.0, b.0) {
            (Some(x), Some(y)) => y.cmp(&x).then_with(|| b.1.notice.id.cmp(&a.1.notice.id)),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.1.notice.id.cmp(&b.1.notice.id),
        });

        annotated.into_iter().map(|(_, entry)| entry).collect()
    }

    fn passes_expiry_gate(&self, notice: &Notice, today: NaiveDate) -> bool {
        let Some(raw) = notice.expiry_text() else {
            return true;
        };

        match timestamp::parse_date(raw) {
            Some(expiry) => today <= expiry,
            None => {
                tracing::warn!(
                    notice_id = notice.id,
                    expiry_date = raw,
                    "notice has an unparsable expiry date"
                );
                self.policy.malformed_expiry == MalformedExpiry::NoExpiry
            }
        }
    }
}
