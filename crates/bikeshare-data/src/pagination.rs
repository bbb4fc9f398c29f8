//! Fixed-size pages over an already filtered record set.

use std::collections::BTreeMap;

use bikeshare_core::models::TripRecord;
use serde::Serialize;

/// One batch of consecutive records.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Page<'a> {
    /// 1-based page number.
    pub number: usize,
    /// Total number of pages in the sequence.
    pub total: usize,
    /// Position of the first record of this page in the full record set.
    pub first_index: usize,
    pub records: &'a [TripRecord],
}

impl Page<'_> {
    /// Pretty JSON object keyed by each record's position in the full set.
    pub fn to_json(&self) -> serde_json::Result<String> {
        let keyed: BTreeMap<usize, &TripRecord> = self
            .records
            .iter()
            .enumerate()
            .map(|(i, r)| (self.first_index + i, r))
            .collect();
        serde_json::to_string_pretty(&keyed)
    }
}

/// Lazy iterator of [`Page`]s. Nothing is copied; pages borrow the records.
#[derive(Debug, Clone)]
pub struct RecordPages<'a> {
    records: &'a [TripRecord],
    page_size: usize,
    next_page: usize,
}

impl<'a> RecordPages<'a> {
    /// A `page_size` of zero is treated as one.
    pub fn new(records: &'a [TripRecord], page_size: usize) -> Self {
        Self {
            records,
            page_size: page_size.max(1),
            next_page: 0,
        }
    }

    pub fn total_pages(&self) -> usize {
        self.records.len().div_ceil(self.page_size)
    }

    pub fn remaining(&self) -> usize {
        self.total_pages() - self.next_page
    }

    /// Start over from the first page.
    pub fn reset(&mut self) {
        self.next_page = 0;
    }
}

impl<'a> Iterator for RecordPages<'a> {
    type Item = Page<'a>;

    fn next(&mut self) -> Option<Page<'a>> {
        if self.next_page >= self.total_pages() {
            return None;
        }
        let start = self.next_page * self.page_size;
        let end = (start + self.page_size).min(self.records.len());
        self.next_page += 1;

        Some(Page {
            number: self.next_page,
            total: self.total_pages(),
            first_index: start,
            records: &self.records[start..end],
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for RecordPages<'_> {}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use bikeshare_core::models::UserType;
    use chrono::NaiveDate;

    fn records(n: usize) -> Vec<TripRecord> {
        let start = NaiveDate::from_ymd_opt(2017, 1, 2)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        (0..n)
            .map(|i| TripRecord::new(start, format!("S{i}"), "E", 60.0, UserType::Subscriber))
            .collect()
    }

    #[test]
    fn test_pages_cover_all_records_in_order() {
        let data = records(12);
        let pages: Vec<Page> = RecordPages::new(&data, 5).collect();

        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0].records.len(), 5);
        assert_eq!(pages[2].records.len(), 2);
        assert_eq!(pages[0].number, 1);
        assert_eq!(pages[2].number, 3);
        assert!(pages.iter().all(|p| p.total == 3));
        assert_eq!(pages[0].records[0].start_station, "S0");
        assert_eq!(pages[2].first_index, 10);
    }

    #[test]
    fn test_exact_multiple() {
        let data = records(10);
        let pages = RecordPages::new(&data, 5);
        assert_eq!(pages.total_pages(), 2);
        assert_eq!(pages.len(), 2);
    }

    #[test]
    fn test_empty_has_no_pages() {
        let mut pages = RecordPages::new(&[], 5);
        assert_eq!(pages.total_pages(), 0);
        assert!(pages.next().is_none());
    }

    #[test]
    fn test_zero_page_size_is_one() {
        let data = records(3);
        assert_eq!(RecordPages::new(&data, 0).total_pages(), 3);
    }

    #[test]
    fn test_reset_restarts() {
        let data = records(7);
        let mut pages = RecordPages::new(&data, 5);
        pages.next();
        pages.next();
        assert!(pages.next().is_none());

        pages.reset();
        assert_eq!(pages.remaining(), 2);
        assert_eq!(pages.next().unwrap().number, 1);
    }

    #[test]
    fn test_page_json_keyed_by_position() {
        let data = records(7);
        let second = RecordPages::new(&data, 5).nth(1).unwrap();
        let json: serde_json::Value = serde_json::from_str(&second.to_json().unwrap()).unwrap();

        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 2);
        assert_eq!(obj["5"]["start_station"], "S5");
        assert_eq!(obj["6"]["user_type"], "Subscriber");
    }
}
