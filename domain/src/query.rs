//! Pagination and filtering of retained meeting summaries.

use std::str::FromStr;

use crate::error::{Error, ValidationErrorKind};
use crate::meeting_summary::MeetingSummary;

pub const DEFAULT_LIMIT: i64 = 100;
pub const MAX_LIMIT: i64 = 1000;

/// Field a filter expression tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterCategory {
    MeetingId,
    MeetingTitle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    Eq,
    Ne,
    Contains,
}

/// A parsed `<category> <operator> <value>` expression.
///
/// The value may be wrapped in double quotes to include spaces, e.g.
/// `meeting_title contains "weekly sync"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryFilter {
    pub category: FilterCategory,
    pub operator: FilterOperator,
    pub value: String,
}

/// Validated list parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryQuery {
    pub offset: usize,
    pub limit: usize,
    pub filter: Option<SummaryFilter>,
}

impl FromStr for FilterCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "meeting_id" => Ok(FilterCategory::MeetingId),
            "meeting_title" => Ok(FilterCategory::MeetingTitle),
            other => Err(Error::validation(
                ValidationErrorKind::InvalidFilterCategory(other.to_string()),
            )),
        }
    }
}

impl FromStr for FilterOperator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "eq" => Ok(FilterOperator::Eq),
            "ne" => Ok(FilterOperator::Ne),
            "contains" => Ok(FilterOperator::Contains),
            other => Err(Error::validation(
                ValidationErrorKind::InvalidFilterOperator(other.to_string()),
            )),
        }
    }
}

fn parse_error(reason: &str) -> Error {
    Error::validation(ValidationErrorKind::FilterParse(reason.to_string()))
}

/// Splits the first whitespace-delimited token off `s`, returning it and the rest.
fn next_token(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start();
    if s.is_empty() {
        return None;
    }
    Some(match s.find(char::is_whitespace) {
        Some(end) => s.split_at(end),
        None => (s, ""),
    })
}

fn parse_value(raw: &str) -> Result<String, Error> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(parse_error("missing value"));
    }

    match raw.strip_prefix('"') {
        Some(rest) => match rest.strip_suffix('"') {
            Some(inner) if !inner.contains('"') => Ok(inner.to_string()),
            _ => Err(parse_error("unterminated quoted value")),
        },
        None if raw.contains(char::is_whitespace) => {
            Err(parse_error("values containing spaces must be quoted"))
        }
        None => Ok(raw.to_string()),
    }
}

impl FromStr for SummaryFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (category, rest) = next_token(s)
            .ok_or_else(|| parse_error("expected '<category> <operator> <value>'"))?;
        let (operator, value) = next_token(rest).ok_or_else(|| parse_error("missing operator"))?;

        Ok(SummaryFilter {
            category: category.parse()?,
            operator: operator.parse()?,
            value: parse_value(value)?,
        })
    }
}

impl SummaryFilter {
    pub fn matches(&self, summary: &MeetingSummary) -> bool {
        let field = match self.category {
            FilterCategory::MeetingId => &summary.meeting_id,
            FilterCategory::MeetingTitle => &summary.meeting_title,
        };

        match self.operator {
            FilterOperator::Eq => *field == self.value,
            FilterOperator::Ne => *field != self.value,
            FilterOperator::Contains => field.contains(&self.value),
        }
    }
}

impl SummaryQuery {
    /// Validates raw list parameters. A missing `offset` is 0 and a missing `limit` is
    /// [`DEFAULT_LIMIT`]. An empty filter string means no filter.
    pub fn new(offset: Option<i64>, limit: Option<i64>, filter: Option<&str>) -> Result<Self, Error> {
        let offset = offset.unwrap_or(0);
        let limit = limit.unwrap_or(DEFAULT_LIMIT);

        if offset < 0 || limit <= 0 || limit > MAX_LIMIT {
            return Err(Error::validation(ValidationErrorKind::BadPaginationParams));
        }

        let filter = filter
            .map(str::trim)
            .filter(|expr| !expr.is_empty())
            .map(str::parse::<SummaryFilter>)
            .transpose()?;

        Ok(SummaryQuery {
            offset: offset as usize,
            limit: limit as usize,
            filter,
        })
    }

    pub fn matches(&self, summary: &MeetingSummary) -> bool {
        self.filter
            .as_ref()
            .map_or(true, |filter| filter.matches(summary))
    }
}

impl Default for SummaryQuery {
    fn default() -> Self {
        SummaryQuery {
            offset: 0,
            limit: DEFAULT_LIMIT as usize,
            filter: None,
        }
    }
}
