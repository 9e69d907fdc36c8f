use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::email::EmailSummary;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("invalid filter keyword: {0:?}")]
    InvalidFilter(String),
    #[error("limit {0} is not one of {allowed:?}", allowed = Limit::ALLOWED)]
    InvalidLimit(u32),
}

/// Category selector for the listing endpoint.
///
/// The set of categories is owned by the server; anything that can sit in a
/// single path segment is passed through and the server decides.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FilterKeyword {
    #[default]
    All,
    Category(String),
}

impl FilterKeyword {
    /// Categories the views offer for cycling.
    pub const KNOWN: [&'static str; 3] = ["ALL", "ATS", "TMO"];

    pub fn parse(raw: &str) -> Result<Self, QueryError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.contains('/') {
            return Err(QueryError::InvalidFilter(raw.to_string()));
        }
        if trimmed.eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            Ok(Self::Category(trimmed.to_string()))
        }
    }

    /// Lower-cased form used in the request path.
    pub fn path_segment(&self) -> String {
        match self {
            Self::All => "all".to_string(),
            Self::Category(c) => c.to_lowercase(),
        }
    }

    /// Next entry of [`Self::KNOWN`], wrapping. Unknown categories restart at `ALL`.
    pub fn cycle(&self, forward: bool) -> Self {
        let label = self.to_string();
        let len = Self::KNOWN.len();
        let next = match Self::KNOWN.iter().position(|k| k.eq_ignore_ascii_case(&label)) {
            Some(i) if forward => (i + 1) % len,
            Some(i) => (i + len - 1) % len,
            None => 0,
        };
        Self::parse(Self::KNOWN[next]).unwrap_or_default()
    }
}

impl fmt::Display for FilterKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("ALL"),
            Self::Category(c) => f.write_str(c),
        }
    }
}

impl FromStr for FilterKeyword {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Maximum number of summaries per listing call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Limit(u32);

impl Limit {
    pub const ALLOWED: [u32; 4] = [10, 50, 100, 200];

    pub fn new(n: u32) -> Result<Self, QueryError> {
        if Self::ALLOWED.contains(&n) {
            Ok(Self(n))
        } else {
            Err(QueryError::InvalidLimit(n))
        }
    }

    pub fn get(self) -> u32 {
        self.0
    }

    pub fn cycle(self, forward: bool) -> Self {
        let len = Self::ALLOWED.len();
        let i = Self::ALLOWED.iter().position(|&n| n == self.0).unwrap_or(0);
        let next = if forward { (i + 1) % len } else { (i + len - 1) % len };
        Self(Self::ALLOWED[next])
    }
}

impl Default for Limit {
    fn default() -> Self {
        Self(100)
    }
}

impl TryFrom<u32> for Limit {
    type Error = QueryError;

    fn try_from(n: u32) -> Result<Self, Self::Error> {
        Self::new(n)
    }
}

impl From<Limit> for u32 {
    fn from(l: Limit) -> u32 {
        l.0
    }
}

impl FromStr for Limit {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let n = s
            .trim()
            .parse::<u32>()
            .map_err(|_| QueryError::InvalidLimit(0))?;
        Self::new(n)
    }
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Idle,
    Loading,
    Ready,
    Error,
}

/// Parameters of one listing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub filter: FilterKeyword,
    pub limit: Limit,
    /// Only list mail received on or after this day. The server picks its own window when absent.
    pub since: Option<NaiveDate>,
}

/// State owned by one inbox view.
#[derive(Debug, Clone, Default)]
pub struct QueryState {
    pub filter: FilterKeyword,
    pub limit: Limit,
    pub since: Option<NaiveDate>,
    pub status: Status,
    pub results: Vec<EmailSummary>,
    pub error_message: Option<String>,
}

impl QueryState {
    pub fn new(filter: FilterKeyword, limit: Limit) -> Self {
        Self {
            filter,
            limit,
            ..Self::default()
        }
    }

    pub fn query(&self) -> ListQuery {
        ListQuery {
            filter: self.filter.clone(),
            limit: self.limit,
            since: self.since,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.status == Status::Loading
    }
}
