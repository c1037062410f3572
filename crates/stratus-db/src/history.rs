use chrono::{DateTime, Utc};

use stratus_types::UserId;
use stratus_types::models::WeatherHistoryRecord;

use crate::models::{DATE_FORMAT, HistoryDoc, HistoryRow};
use crate::{Database, Document, Result};

impl Database {
    /// A user's lookups, oldest first. Fails if any stored date is not in
    /// `YYYY-MM-DD HH:MM:SS` form.
    pub fn list_history(&self, user_id: UserId) -> Result<Vec<WeatherHistoryRecord>> {
        let mut history: HistoryDoc = self.read(Document::History);
        history
            .remove(&user_id)
            .unwrap_or_default()
            .into_iter()
            .map(HistoryRow::into_record)
            .collect()
    }

    pub fn append_history(
        &self,
        user_id: UserId,
        city: &str,
        country: &str,
        temperature: f64,
        description: &str,
        date: DateTime<Utc>,
    ) -> Result<()> {
        let row = HistoryRow {
            city: city.to_string(),
            country: country.to_string(),
            temperature,
            description: description.to_string(),
            date: date.format(DATE_FORMAT).to_string(),
        };

        self.update(Document::History, |history: &mut HistoryDoc| {
            history.entry(user_id).or_default().push(row);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StoreError;
    use chrono::{TimeZone, Timelike};
    use std::fs;

    #[test]
    fn append_then_list_truncates_to_seconds() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path()).unwrap();

        let t = Utc
            .with_ymd_and_hms(2024, 3, 9, 14, 5, 33)
            .unwrap()
            .with_nanosecond(987_654_321)
            .unwrap();
        db.append_history(1, "Berlin", "Germany", 20.0, "sunny", t).unwrap();

        let records = db.list_history(1).unwrap();
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.city, "Berlin");
        assert_eq!(r.country, "Germany");
        assert_eq!(r.temperature, 20.0);
        assert_eq!(r.description, "sunny");
        assert_eq!(r.date, t.naive_utc().with_nanosecond(0).unwrap());
    }

    #[test]
    fn stored_in_fixed_text_form() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path()).unwrap();

        let t = Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 1).unwrap();
        db.append_history(4, "Tokyo", "JP", -1.5, "snow", t).unwrap();

        let raw = fs::read_to_string(db.path(Document::History)).unwrap();
        assert!(raw.contains("\"2023-12-31 23:59:01\""));
        assert!(raw.contains("\"4\""));
    }

    #[test]
    fn appends_in_order_per_user() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path()).unwrap();

        let t = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        db.append_history(1, "A", "X", 1.0, "one", t).unwrap();
        db.append_history(2, "B", "Y", 2.0, "two", t).unwrap();
        db.append_history(1, "C", "Z", 3.0, "three", t).unwrap();

        let cities: Vec<_> = db.list_history(1).unwrap().into_iter().map(|r| r.city).collect();
        assert_eq!(cities, ["A", "C"]);
        assert_eq!(db.list_history(2).unwrap().len(), 1);
        assert!(db.list_history(3).unwrap().is_empty());
    }

    #[test]
    fn malformed_date_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path()).unwrap();
        fs::write(
            db.path(Document::History),
            r#"{"1": [{"city": "Rome", "country": "IT", "temperature": 18,
                      "description": "clear", "date": "2024-01-01T10:00:00"}]}"#,
        )
        .unwrap();

        let err = db.list_history(1).unwrap_err();
        assert!(matches!(err, StoreError::Parse { ref value, .. } if value == "2024-01-01T10:00:00"));
    }
}
