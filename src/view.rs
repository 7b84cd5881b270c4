//! Presentation-ready artifacts derived from a [`FilteredView`].
//!
//! Nothing here depends on a UI toolkit: the web page turns these into
//! Plotly traces and the native viewer into egui_plot items.

use std::fmt::Write as _;

use serde::Serialize;

use crate::color::{RatingScale, Rgb8};
use crate::data::filter::FilteredView;
use crate::data::loader::{NAME_COLUMN, PRICE_COLUMN, RATING_COLUMN};
use crate::data::model::ProductRecord;

pub const HISTOGRAM_TITLE: &str = "Price Distribution of Smartphones";
pub const SCATTER_TITLE: &str = "Price vs. Rating";

/// Knobs for the view builder.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewSettings {
    pub histogram_bins: usize,
    pub top_n: usize,
    pub currency: String,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            histogram_bins: 30,
            top_n: 10,
            currency: "KSh".to_string(),
        }
    }
}

impl ViewSettings {
    fn price_label(&self) -> String {
        format!("Price ({})", self.currency)
    }
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

impl HistogramBin {
    pub fn center(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }
}

/// Equal-width price bins over the filtered subset's own price range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramSpec {
    pub title: String,
    pub x_label: String,
    pub bins: Vec<HistogramBin>,
}

impl HistogramSpec {
    /// Number of records counted across all bins.
    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

fn build_histogram(prices: &[f64], settings: &ViewSettings) -> HistogramSpec {
    let spec = |bins| HistogramSpec {
        title: HISTOGRAM_TITLE.to_string(),
        x_label: settings.price_label(),
        bins,
    };

    let Some((&first, rest)) = prices.split_first() else {
        return spec(Vec::new());
    };
    let (lo, hi) = rest
        .iter()
        .fold((first, first), |(lo, hi), &p| (lo.min(p), hi.max(p)));

    // All prices identical: one unit-wide bin centred on the value.
    if hi - lo <= 0.0 {
        return spec(vec![HistogramBin {
            start: lo - 0.5,
            end: lo + 0.5,
            count: prices.len(),
        }]);
    }

    let n_bins = settings.histogram_bins.max(1);
    let width = (hi - lo) / n_bins as f64;
    let mut counts = vec![0usize; n_bins];
    for &p in prices {
        // The maximum falls exactly on the upper edge; keep it in the last bin.
        let idx = (((p - lo) / width) as usize).min(n_bins - 1);
        counts[idx] += 1;
    }

    let bins = counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            start: lo + width * i as f64,
            end: if i + 1 == n_bins {
                hi
            } else {
                lo + width * (i + 1) as f64
            },
            count,
        })
        .collect();
    spec(bins)
}

// ---------------------------------------------------------------------------
// Scatter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub price: f64,
    pub rating: f64,
    /// Hover label.
    pub name: String,
    pub color: Rgb8,
}

/// Price (x) against rating (y), coloured by rating.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Rating range the colour scale spans.
    pub color_min: f64,
    pub color_max: f64,
    pub points: Vec<ScatterPoint>,
}

impl ScatterSpec {
    pub fn scale(&self) -> RatingScale {
        RatingScale::new(self.color_min, self.color_max)
    }
}

fn build_scatter(records: &[&ProductRecord], settings: &ViewSettings) -> ScatterSpec {
    let scale = RatingScale::spanning(records.iter().map(|r| r.rating));
    let points = records
        .iter()
        .map(|r| ScatterPoint {
            price: r.price,
            rating: r.rating,
            name: r.name.clone(),
            color: scale.color_for(r.rating),
        })
        .collect();

    ScatterSpec {
        title: SCATTER_TITLE.to_string(),
        x_label: settings.price_label(),
        y_label: RATING_COLUMN.to_string(),
        color_min: scale.lo(),
        color_max: scale.hi(),
        points,
    }
}

// ---------------------------------------------------------------------------
// Top products table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopRow {
    /// 1-based position in the ranking.
    pub rank: usize,
    /// Row index in the source table.
    pub source_index: usize,
    pub name: String,
    pub price: f64,
    pub rating: f64,
    pub price_text: String,
    pub rating_text: String,
}

/// Highest-rated records first; equal ratings keep table order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopTable {
    pub columns: [&'static str; 3],
    pub rows: Vec<TopRow>,
}

impl TopTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render as an HTML `<table>`; all text is escaped.
    pub fn to_html(&self) -> String {
        let mut html = String::from("<table class=\"top-products\">\n<thead><tr>");
        for col in self.columns {
            let _ = write!(html, "<th>{}</th>", escape_html(col));
        }
        html.push_str("</tr></thead>\n<tbody>\n");
        for row in &self.rows {
            let _ = writeln!(
                html,
                "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape_html(&row.name),
                escape_html(&row.price_text),
                escape_html(&row.rating_text)
            );
        }
        html.push_str("</tbody>\n");
        if self.rows.is_empty() {
            html.push_str("<caption>No products match the current filters.</caption>\n");
        }
        html.push_str("</table>");
        html
    }
}

fn build_top_table(view: &FilteredView<'_>, settings: &ViewSettings) -> TopTable {
    let mut ranked: Vec<(usize, &ProductRecord)> =
        view.indices().iter().copied().zip(view.iter()).collect();
    // `sort_by` is stable, so equal ratings stay in table order.
    ranked.sort_by(|(_, a), (_, b)| b.rating.total_cmp(&a.rating));
    ranked.truncate(settings.top_n);

    let rows = ranked
        .into_iter()
        .enumerate()
        .map(|(pos, (source_index, r))| TopRow {
            rank: pos + 1,
            source_index,
            name: r.name.clone(),
            price: r.price,
            rating: r.rating,
            price_text: format_price(r.price, &settings.currency),
            rating_text: format_rating(r.rating),
        })
        .collect();

    TopTable {
        columns: [NAME_COLUMN, PRICE_COLUMN, RATING_COLUMN],
        rows,
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Derive the histogram, scatter and top table for one filtered subset.
/// An empty subset yields an empty histogram, no points and no rows.
pub fn build_views(
    view: &FilteredView<'_>,
    settings: &ViewSettings,
) -> (HistogramSpec, ScatterSpec, TopTable) {
    let records: Vec<&ProductRecord> = view.iter().collect();
    let prices: Vec<f64> = records.iter().map(|r| r.price).collect();
    (
        build_histogram(&prices, settings),
        build_scatter(&records, settings),
        build_top_table(view, settings),
    )
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

/// `KSh 10,000` for whole amounts, `KSh 1,299.50` otherwise.
pub fn format_price(price: f64, currency: &str) -> String {
    let text = if price.fract().abs() < 1e-9 {
        format!("{price:.0}")
    } else {
        format!("{price:.2}")
    };
    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    let (whole, frac) = match unsigned.split_once('.') {
        Some((whole, frac)) => (whole, Some(frac)),
        None => (unsigned, None),
    };

    let mut out = format!("{currency} {sign}{}", group_thousands(whole));
    if let Some(frac) = frac {
        out.push('.');
        out.push_str(frac);
    }
    out
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Always shows at least one decimal: `5.0`, `4.5`, `3.75`.
pub fn format_rating(rating: f64) -> String {
    let text = rating.to_string();
    if text.contains('.') {
        text
    } else {
        format!("{rating:.1}")
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{filter, FilterCriteria};
    use crate::data::model::ProductTable;

    fn table(rows: &[(&str, f64, f64)]) -> ProductTable {
        ProductTable::from_records(
            rows.iter()
                .map(|&(name, price, rating)| ProductRecord::new(name, price, rating))
                .collect(),
        )
    }

    fn everything(table: &ProductTable) -> FilteredView<'_> {
        filter(table, &FilterCriteria::unrestricted(table))
    }

    #[test]
    fn empty_subset_yields_empty_views() {
        let table = table(&[("a", 100.0, 4.0)]);
        let criteria = FilterCriteria::new(500.0, 600.0, 0.0).unwrap();
        let view = filter(&table, &criteria);

        let (hist, scatter, top) = build_views(&view, &ViewSettings::default());
        assert!(hist.bins.is_empty());
        assert!(hist.is_empty());
        assert!(scatter.points.is_empty());
        assert!(top.is_empty());
        assert!(top.to_html().contains("<tbody>\n</tbody>"));
    }

    #[test]
    fn histogram_covers_subset_range_with_fixed_bins() {
        let rows: Vec<(String, f64, f64)> = (0..=100)
            .map(|i| (format!("p{i}"), 1_000.0 + 100.0 * i as f64, 4.0))
            .collect();
        let refs: Vec<(&str, f64, f64)> =
            rows.iter().map(|(n, p, r)| (n.as_str(), *p, *r)).collect();
        let table = table(&refs);

        let (hist, _, _) = build_views(&everything(&table), &ViewSettings::default());
        assert_eq!(hist.bins.len(), 30);
        assert_eq!(hist.total(), 101);
        assert_eq!(hist.bins[0].start, 1_000.0);
        assert_eq!(hist.bins[29].end, 11_000.0);
        assert!(hist.bins[29].count >= 1);
        assert!(hist.bins.windows(2).all(|w| w[0].end == w[1].start));
    }

    #[test]
    fn histogram_with_single_price() {
        let table = table(&[("a", 2_000.0, 4.0), ("b", 2_000.0, 4.5)]);
        let (hist, _, _) = build_views(&everything(&table), &ViewSettings::default());
        assert_eq!(hist.bins.len(), 1);
        assert_eq!(hist.bins[0].count, 2);
        assert_eq!(hist.bins[0].center(), 2_000.0);
        assert_eq!(hist.bins[0].width(), 1.0);
    }

    #[test]
    fn scatter_has_one_labelled_point_per_record() {
        let table = table(&[("low", 1_000.0, 3.0), ("high", 2_000.0, 5.0)]);
        let (_, scatter, _) = build_views(&everything(&table), &ViewSettings::default());
        assert_eq!(scatter.points.len(), 2);
        assert_eq!(scatter.points[0].name, "low");
        assert_eq!((scatter.color_min, scatter.color_max), (3.0, 5.0));
        assert_ne!(scatter.points[0].color, scatter.points[1].color);
        assert_eq!(scatter.x_label, "Price (KSh)");
    }

    #[test]
    fn top_table_is_stable_and_truncated() {
        let rows: Vec<(String, f64, f64)> = (0..15)
            .map(|i| (format!("p{i}"), 1_000.0 * (i + 1) as f64, if i % 2 == 0 { 4.5 } else { 4.0 }))
            .collect();
        let refs: Vec<(&str, f64, f64)> =
            rows.iter().map(|(n, p, r)| (n.as_str(), *p, *r)).collect();
        let table = table(&refs);

        let (_, _, top) = build_views(&everything(&table), &ViewSettings::default());
        assert_eq!(top.len(), 10);
        let names: Vec<&str> = top.rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(
            names,
            ["p0", "p2", "p4", "p6", "p8", "p10", "p12", "p14", "p1", "p3"]
        );
        assert!(top.rows.windows(2).all(|w| w[0].rating >= w[1].rating));
        assert_eq!(top.rows[0].rank, 1);
        assert_eq!(top.rows[9].source_index, 3);
    }

    #[test]
    fn top_table_shorter_than_limit() {
        let table = table(&[("a", 10_000.0, 4.2), ("b", 1_250_000.0, 4.9)]);
        let (_, _, top) = build_views(&everything(&table), &ViewSettings::default());
        assert_eq!(top.len(), 2);
        assert_eq!(top.rows[0].price_text, "KSh 1,250,000");
        assert_eq!(top.rows[1].price_text, "KSh 10,000");
    }

    #[test]
    fn html_is_escaped() {
        let table = table(&[("<b>Phone & Co</b>", 500.0, 5.0)]);
        let (_, _, top) = build_views(&everything(&table), &ViewSettings::default());
        let html = top.to_html();
        assert!(html.contains("&lt;b&gt;Phone &amp; Co&lt;/b&gt;"));
        assert!(html.contains("<td>KSh 500</td><td>5.0</td>"));
        assert!(!html.contains("<caption>"));
    }

    #[test]
    fn price_formatting() {
        assert_eq!(format_price(10_000.0, "KSh"), "KSh 10,000");
        assert_eq!(format_price(999.0, "KSh"), "KSh 999");
        assert_eq!(format_price(1_299.5, "KSh"), "KSh 1,299.50");
        assert_eq!(format_price(123_456_789.0, "USD"), "USD 123,456,789");
        assert_eq!(format_price(-4_500.0, "KSh"), "KSh -4,500");
    }

    #[test]
    fn rating_formatting() {
        assert_eq!(format_rating(5.0), "5.0");
        assert_eq!(format_rating(4.5), "4.5");
        assert_eq!(format_rating(3.75), "3.75");
    }
}
