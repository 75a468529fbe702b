use std::fmt::{Display, Formatter};
use std::sync::OnceLock;

use time::format_description::BorrowedFormatItem;
use time::{Date, OffsetDateTime};

use crate::ValidationError;

static ISO_DATE: OnceLock<Vec<BorrowedFormatItem<'static>>> = OnceLock::new();

fn iso_date() -> &'static [BorrowedFormatItem<'static>] {
    ISO_DATE.get_or_init(|| {
        time::format_description::parse("[year]-[month]-[day]")
            .expect("static format description is valid")
    })
}

/// Calendar date in `YYYY-MM-DD` form, used for grant start and as-of dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GrantDate(Date);

impl GrantDate {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        Date::parse(input.trim(), iso_date())
            .map(Self)
            .map_err(|_| ValidationError::InvalidDate {
                value: input.to_owned(),
            })
    }

    /// Today's date in UTC.
    pub fn today() -> Self {
        Self(OffsetDateTime::now_utc().date())
    }

    pub fn year(self) -> i32 {
        self.0.year()
    }

    /// (month, day) pair for within-year anniversary comparisons.
    pub fn month_day(self) -> (u8, u8) {
        (u8::from(self.0.month()), self.0.day())
    }

    pub fn into_inner(self) -> Date {
        self.0
    }
}

impl Display for GrantDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let formatted = self
            .0
            .format(iso_date())
            .expect("GrantDate must be ISO formattable");
        f.write_str(&formatted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_iso_date() {
        let parsed = GrantDate::parse("2022-09-01").expect("must parse");
        assert_eq!(parsed.year(), 2022);
        assert_eq!(parsed.month_day(), (9, 1));
        assert_eq!(parsed.to_string(), "2022-09-01");
    }

    #[test]
    fn rejects_malformed_date() {
        let err = GrantDate::parse("01/09/2022").expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidDate { .. }));
    }

    #[test]
    fn rejects_out_of_range_day() {
        let err = GrantDate::parse("2022-02-30").expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidDate { .. }));
    }
}
