//! Date-window and author/message predicates
//!
//! Two independent tests decide whether an (order, event) pair becomes a
//! [`MatchRecord`]:
//!
//! 1. [`DateWindow::contains_order`] on the order's UTC creation date. Orders
//!    that fail it never have their events fetched.
//! 2. [`MatchCriteria::is_match`] on the event: the trimmed, lower-cased
//!    message must contain the message needle and the author must contain
//!    every author term, in any order.
//!
//! All checks are plain substring tests. "ca" matches "scarto" and "vacanza"
//! as well as a standalone "ca".

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::{Event, MatchRecord, Order};

/// Default message needle
pub const DEFAULT_MESSAGE_NEEDLE: &str = "ca";

/// Default author terms
pub const DEFAULT_AUTHOR_TERMS: [&str; 2] = ["chiara", "azzaretto"];

/// Validation error for a date window
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("start date {start} is after end date {end}")]
pub struct InvalidDateWindow {
    /// Requested start
    pub start: NaiveDate,
    /// Requested end
    pub end: NaiveDate,
}

/// Inclusive calendar-date range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateWindow {
    /// Create a window, rejecting `start > end`
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, InvalidDateWindow> {
        if start > end {
            return Err(InvalidDateWindow { start, end });
        }
        Ok(Self { start, end })
    }

    /// First included date
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last included date
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Inclusive membership test
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Whether the order was created (UTC date) inside the window.
    ///
    /// An unparseable timestamp counts as outside.
    pub fn contains_order(&self, order: &Order) -> bool {
        match order.created_date_utc() {
            Ok(date) => self.contains(date),
            Err(e) => {
                warn!(
                    "Skipping order {} with unparseable created_at '{}': {}",
                    order.name, order.created_at, e
                );
                false
            }
        }
    }
}

/// Author/message pattern applied to each event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchCriteria {
    message_needle: String,
    author_terms: Vec<String>,
}

impl Default for MatchCriteria {
    fn default() -> Self {
        Self::new(DEFAULT_MESSAGE_NEEDLE, DEFAULT_AUTHOR_TERMS)
    }
}

impl MatchCriteria {
    /// Create criteria; needles are normalized the same way as event fields
    pub fn new<I, S>(message_needle: &str, author_terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            message_needle: normalize(message_needle),
            author_terms: author_terms
                .into_iter()
                .map(|term| normalize(term.as_ref()))
                .filter(|term| !term.is_empty())
                .collect(),
        }
    }

    /// Normalized message needle
    pub fn message_needle(&self) -> &str {
        &self.message_needle
    }

    /// Normalized author terms
    pub fn author_terms(&self) -> &[String] {
        &self.author_terms
    }

    /// Message contains the needle (case-insensitive)
    pub fn message_matches(&self, message: &str) -> bool {
        normalize(message).contains(&self.message_needle)
    }

    /// Author contains every term (case-insensitive, any order).
    ///
    /// An empty author never matches.
    pub fn author_matches(&self, author: &str) -> bool {
        let author = normalize(author);
        !author.is_empty() && self.author_terms.iter().all(|term| author.contains(term))
    }

    /// Both conjuncts hold for the event
    pub fn is_match(&self, event: &Event) -> bool {
        self.message_matches(event.message()) && self.author_matches(event.author())
    }

    /// Rows for every matching event of one order, in event order
    pub fn matches_for(&self, order: &Order, events: &[Event]) -> Vec<MatchRecord> {
        events
            .iter()
            .filter(|event| {
                let message_ok = self.message_matches(event.message());
                let author_ok = self.author_matches(event.author());
                if message_ok != author_ok {
                    debug!(
                        order = %order.name,
                        message_ok,
                        author_ok,
                        "Discarding partial match: author='{}' message='{}'",
                        event.author(),
                        event.message()
                    );
                }
                message_ok && author_ok
            })
            .map(|event| MatchRecord::new(order, event))
            .collect()
    }
}

fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}
