//! Review collection filtering
//!
//! Parses the optional `filterby` / `searchword` / `timeframe` / `nlatest`
//! query parameters into a `ReviewFilter`. The four dimensions are
//! independent; any subset (including none) is valid. The store composes the
//! resulting filter into a single ordered, bounded query.

use crate::validators::parse_compact_date;
use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;

/// Raw query parameters as they arrive on `GET /api/reviews/`.
///
/// All fields are strings at this level so that malformed values surface as
/// hypermedia error documents instead of extractor rejections.
#[derive(Debug, Default, Deserialize)]
pub struct ReviewQuery {
    pub filterby: Option<String>,
    pub searchword: Option<String>,
    pub timeframe: Option<String>,
    pub nlatest: Option<String>,
}

/// Which related entity field a searchword is matched against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    AlbumTitle,
    Artist,
    Genre,
    Username,
}

/// A fully validated review filter
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ReviewFilter {
    /// Substring search against a related entity, used as a foreign-key filter
    pub scope: Option<(FilterField, String)>,
    /// Reviews submitted on or after this date
    pub earliest: Option<NaiveDate>,
    /// Reviews submitted on or before this date (inclusive)
    pub latest: Option<NaiveDate>,
    /// Cap on the number of most recent reviews returned
    pub limit: Option<i64>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("'filterby' must be one of album, artist, genre or user (got '{0}')")]
    UnknownFilterField(String),

    #[error("If you are using filterby, provide a searchword")]
    MissingSearchword,

    #[error("'{0}' is not one or two ddmmyyyy dates joined by '_'")]
    MalformedTimeframe(String),

    #[error("'nlatest' must be a positive integer (got '{0}')")]
    BadLimit(String),
}

impl ReviewFilter {
    /// Validate raw query parameters into a composable filter.
    ///
    /// `searchword` is mandatory once `filterby` is present; a `searchword`
    /// without `filterby` is ignored. A two-date timeframe is applied exactly
    /// as given: a reversed range is not swapped and simply matches nothing.
    pub fn from_query(query: &ReviewQuery) -> Result<Self, FilterError> {
        let mut filter = ReviewFilter::default();

        if let Some(filterby) = query.filterby.as_deref() {
            let field = match filterby {
                "album" => FilterField::AlbumTitle,
                "artist" => FilterField::Artist,
                "genre" => FilterField::Genre,
                "user" => FilterField::Username,
                other => return Err(FilterError::UnknownFilterField(other.to_string())),
            };
            let word = query
                .searchword
                .as_deref()
                .filter(|w| !w.is_empty())
                .ok_or(FilterError::MissingSearchword)?;
            filter.scope = Some((field, word.to_string()));
        }

        if let Some(timeframe) = query.timeframe.as_deref() {
            let malformed = || FilterError::MalformedTimeframe(timeframe.to_string());
            let tokens: Vec<&str> = timeframe.split('_').collect();
            if tokens.len() > 2 {
                return Err(malformed());
            }
            filter.earliest = Some(parse_compact_date(tokens[0]).ok_or_else(malformed)?);
            if let Some(second) = tokens.get(1) {
                filter.latest = Some(parse_compact_date(second).ok_or_else(malformed)?);
            }
        }

        if let Some(nlatest) = query.nlatest.as_deref() {
            let n: i64 = nlatest
                .parse()
                .map_err(|_| FilterError::BadLimit(nlatest.to_string()))?;
            if n <= 0 {
                return Err(FilterError::BadLimit(nlatest.to_string()));
            }
            filter.limit = Some(n);
        }

        Ok(filter)
    }
}
