use serde::{Deserialize, Serialize};

use super::model::{ProductRecord, ProductTable};
use crate::error::CriteriaError;

// ---------------------------------------------------------------------------
// Rating choices offered by the dashboard
// ---------------------------------------------------------------------------

/// The fixed minimum-rating options shown in the selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RatingChoice {
    #[default]
    All,
    AtLeastFour,
    AtLeastFourHalf,
    FiveOnly,
}

impl RatingChoice {
    pub const ALL: [RatingChoice; 4] = [
        RatingChoice::All,
        RatingChoice::AtLeastFour,
        RatingChoice::AtLeastFourHalf,
        RatingChoice::FiveOnly,
    ];

    /// Threshold fed to the filter; `0.0` disables rating filtering.
    pub fn min_rating(self) -> f64 {
        match self {
            RatingChoice::All => 0.0,
            RatingChoice::AtLeastFour => 4.0,
            RatingChoice::AtLeastFourHalf => 4.5,
            RatingChoice::FiveOnly => 5.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RatingChoice::All => "All Ratings",
            RatingChoice::AtLeastFour => "4.0 and above",
            RatingChoice::AtLeastFourHalf => "4.5 and above",
            RatingChoice::FiveOnly => "5.0 only",
        }
    }
}

// ---------------------------------------------------------------------------
// Filter criteria
// ---------------------------------------------------------------------------

/// Validated price interval and rating floor.
///
/// Invariants: both price bounds are finite with `price_min <= price_max`,
/// and `min_rating` is finite and non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FilterCriteria {
    price_min: f64,
    price_max: f64,
    min_rating: f64,
}

impl FilterCriteria {
    pub fn new(price_min: f64, price_max: f64, min_rating: f64) -> Result<Self, CriteriaError> {
        if !price_min.is_finite() || !price_max.is_finite() {
            return Err(CriteriaError::NonFiniteBounds {
                min: price_min,
                max: price_max,
            });
        }
        if price_min > price_max {
            return Err(CriteriaError::InvertedBounds {
                min: price_min,
                max: price_max,
            });
        }
        if !min_rating.is_finite() || min_rating < 0.0 {
            return Err(CriteriaError::InvalidRating(min_rating));
        }
        Ok(Self {
            price_min,
            price_max,
            min_rating,
        })
    }

    /// Criteria that let every record of `table` through.
    pub fn unrestricted(table: &ProductTable) -> Self {
        let (price_min, price_max) = table.price_bounds().unwrap_or((0.0, 0.0));
        Self {
            price_min,
            price_max,
            min_rating: 0.0,
        }
    }

    pub fn price_min(&self) -> f64 {
        self.price_min
    }

    pub fn price_max(&self) -> f64 {
        self.price_max
    }

    pub fn min_rating(&self) -> f64 {
        self.min_rating
    }

    /// Whether a rating floor is in effect. A floor of zero means "all ratings".
    pub fn rating_filter_active(&self) -> bool {
        self.min_rating > 0.0
    }

    /// Inclusive on both price ends.
    pub fn matches(&self, record: &ProductRecord) -> bool {
        let in_range = self.price_min <= record.price && record.price <= self.price_max;
        if !in_range {
            return false;
        }
        !self.rating_filter_active() || record.rating >= self.min_rating
    }
}

// ---------------------------------------------------------------------------
// Filtered view
// ---------------------------------------------------------------------------

/// The records of a table that satisfy a [`FilterCriteria`], in table order.
///
/// Holds row indices into the borrowed table rather than copies.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    table: &'a ProductTable,
    indices: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    /// A view of `table` with no records selected.
    pub fn empty(table: &'a ProductTable) -> Self {
        Self {
            table,
            indices: Vec::new(),
        }
    }

    /// Row indices into the source table, ascending.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a ProductRecord> + '_ {
        let table = self.table;
        self.indices.iter().filter_map(move |&i| table.get(i))
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Return the subset of `table` passing `criteria`, preserving table order.
pub fn filter<'a>(table: &'a ProductTable, criteria: &FilterCriteria) -> FilteredView<'a> {
    let indices = table
        .records()
        .iter()
        .enumerate()
        .filter(|(_, record)| criteria.matches(record))
        .map(|(i, _)| i)
        .collect();
    FilteredView { table, indices }
}
