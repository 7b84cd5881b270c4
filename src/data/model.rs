use serde::Serialize;

// ---------------------------------------------------------------------------
// ProductRecord – one cleaned listing row
// ---------------------------------------------------------------------------

/// A single cleaned listing. `price` and `rating` are always finite.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductRecord {
    pub name: String,
    /// Price in the listing currency, prefix and separators removed.
    pub price: f64,
    /// Star rating in `0.0..=5.0`.
    pub rating: f64,
}

impl ProductRecord {
    pub fn new(name: impl Into<String>, price: f64, rating: f64) -> Self {
        Self {
            name: name.into(),
            price,
            rating,
        }
    }
}

// ---------------------------------------------------------------------------
// ProductTable – the loaded dataset
// ---------------------------------------------------------------------------

/// The cleaned dataset in source-file order. Read-only after construction.
#[derive(Debug, Clone, Default)]
pub struct ProductTable {
    records: Vec<ProductRecord>,
}

impl ProductTable {
    pub fn from_records(records: Vec<ProductRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[ProductRecord] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&ProductRecord> {
        self.records.get(index)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Lowest and highest price, or `None` for an empty table.
    pub fn price_bounds(&self) -> Option<(f64, f64)> {
        let mut prices = self.records.iter().map(|r| r.price);
        let first = prices.next()?;
        Some(prices.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_bounds_cover_all_records() {
        let table = ProductTable::from_records(vec![
            ProductRecord::new("a", 12_000.0, 4.1),
            ProductRecord::new("b", 3_500.0, 3.9),
            ProductRecord::new("c", 99_999.0, 4.7),
        ]);
        assert_eq!(table.price_bounds(), Some((3_500.0, 99_999.0)));
    }

    #[test]
    fn empty_table_has_no_bounds() {
        assert_eq!(ProductTable::default().price_bounds(), None);
    }
}
