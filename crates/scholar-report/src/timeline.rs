//! Publication-year histogram and per-topic yearly trends.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;

/// Years before this are treated as parse noise.
pub const EARLIEST_YEAR: i32 = 1900;

/// Number of topics plotted in the trend chart.
pub const TREND_TOPIC_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearCount {
    pub year: i32,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicSeries {
    pub topic: String,
    /// One count per entry of [`TopicTrends::years`].
    pub counts: Vec<usize>,
}

/// Line-chart data: a shared year axis and one series per topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicTrends {
    pub years: Vec<i32>,
    pub series: Vec<TopicSeries>,
}

fn in_range(year: i32, current_year: i32) -> bool {
    (EARLIEST_YEAR..=current_year).contains(&year)
}

/// Count of records per publication year, ascending, ignoring missing years
/// and years outside `EARLIEST_YEAR..=current_year`.
#[must_use]
pub fn year_histogram(
    years: impl IntoIterator<Item = Option<i32>>,
    current_year: i32,
) -> Vec<YearCount> {
    let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
    for year in years.into_iter().flatten() {
        if in_range(year, current_year) {
            *counts.entry(year).or_default() += 1;
        }
    }
    counts
        .into_iter()
        .map(|(year, count)| YearCount { year, count })
        .collect()
}

/// Yearly record counts for the most frequent topics.
///
/// Topics are ranked by their total number of records (dated or not), ties
/// alphabetically, and the top [`TREND_TOPIC_LIMIT`] are kept. The year axis
/// is every in-range year present in the collection. Returns `None` when no
/// record has a usable year.
#[must_use]
pub fn topic_trends<'a>(
    records: impl IntoIterator<Item = (&'a str, Option<i32>)>,
    current_year: i32,
) -> Option<TopicTrends> {
    let mut totals: HashMap<&str, usize> = HashMap::new();
    let mut dated: HashMap<(&str, i32), usize> = HashMap::new();
    let mut axis: BTreeSet<i32> = BTreeSet::new();

    for (topic, year) in records {
        *totals.entry(topic).or_default() += 1;
        if let Some(year) = year.filter(|y| in_range(*y, current_year)) {
            *dated.entry((topic, year)).or_default() += 1;
            axis.insert(year);
        }
    }

    if axis.is_empty() {
        return None;
    }

    let mut ranked: Vec<(&str, usize)> = totals.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked.truncate(TREND_TOPIC_LIMIT);

    let years: Vec<i32> = axis.into_iter().collect();
    let series = ranked
        .into_iter()
        .map(|(topic, _)| TopicSeries {
            topic: topic.to_string(),
            counts: years
                .iter()
                .map(|year| dated.get(&(topic, *year)).copied().unwrap_or(0))
                .collect(),
        })
        .collect();

    Some(TopicTrends { years, series })
}
