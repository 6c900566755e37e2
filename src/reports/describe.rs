use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

/// Descriptive statistics for one numeric column.
///
/// `std_dev` uses the sample definition (divide by n-1) and is `None` for
/// projections with fewer than two rows.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ColumnStats {
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    pub std_dev: Option<f64>,
}

/// Per-column statistics over a tabular projection, plus optional per-group
/// means when a grouping column was supplied.
#[derive(Debug, Clone, Serialize)]
pub struct TableStats {
    pub statistics: BTreeMap<String, ColumnStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grouped_analysis: Option<BTreeMap<String, BTreeMap<String, f64>>>,
}

/// Compute mean/median/min/max/std-dev for each candidate column of a
/// projection.
///
/// A column counts as numeric only if every record holds a numeric value for
/// it; otherwise it is silently excluded. An empty projection yields `None`
/// (the caller surfaces an explicit "no data" result), never an error.
pub fn describe(
    records: &[Map<String, Value>],
    columns: &[&str],
    group_by: Option<&str>,
) -> Option<TableStats> {
    if records.is_empty() {
        return None;
    }

    let mut statistics = BTreeMap::new();
    let mut numeric_columns = Vec::new();

    for &column in columns {
        if let Some(values) = numeric_column(records, column) {
            statistics.insert(column.to_string(), column_stats(&values));
            numeric_columns.push(column);
        }
    }

    let grouped_analysis = group_by.map(|key| group_means(records, &numeric_columns, key));

    Some(TableStats {
        statistics,
        grouped_analysis,
    })
}

/// Extract a column as `f64`s, or `None` if any record's value is missing or
/// non-numeric.
fn numeric_column(records: &[Map<String, Value>], column: &str) -> Option<Vec<f64>> {
    records
        .iter()
        .map(|record| record.get(column).and_then(Value::as_f64))
        .collect()
}

fn column_stats(values: &[f64]) -> ColumnStats {
    let n = values.len();
    #[allow(clippy::cast_precision_loss)]
    let count = n as f64;

    let mean = values.iter().sum::<f64>() / count;
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let median = if n % 2 == 1 {
        sorted[n / 2]
    } else {
        f64::midpoint(sorted[n / 2 - 1], sorted[n / 2])
    };

    let std_dev = (n >= 2).then(|| {
        let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
        (sum_sq / (count - 1.0)).sqrt()
    });

    ColumnStats {
        mean,
        median,
        min,
        max,
        std_dev,
    }
}

/// Per-group mean of each numeric column, keyed by the string form of the
/// grouping value. Records without the grouping column are skipped.
fn group_means(
    records: &[Map<String, Value>],
    numeric_columns: &[&str],
    group_by: &str,
) -> BTreeMap<String, BTreeMap<String, f64>> {
    let mut sums: BTreeMap<String, BTreeMap<String, (f64, usize)>> = BTreeMap::new();

    for record in records {
        let Some(group_value) = record.get(group_by) else {
            continue;
        };
        let group_key = match group_value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };

        let entry = sums.entry(group_key).or_default();
        for &column in numeric_columns {
            if let Some(v) = record.get(column).and_then(Value::as_f64) {
                let (sum, count) = entry.entry(column.to_string()).or_insert((0.0, 0));
                *sum += v;
                *count += 1;
            }
        }
    }

    sums.into_iter()
        .map(|(group, columns)| {
            let means = columns
                .into_iter()
                .map(|(column, (sum, count))| {
                    #[allow(clippy::cast_precision_loss)]
                    let mean = sum / count as f64;
                    (column, mean)
                })
                .collect();
            (group, means)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows(values: Vec<Value>) -> Vec<Map<String, Value>> {
        values
            .into_iter()
            .filter_map(|v| match v {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .collect()
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn empty_projection_yields_none() {
        assert!(describe(&[], &["distance"], None).is_none());
    }

    #[test]
    fn basic_statistics() {
        let records = rows(vec![
            json!({"distance": 1.0}),
            json!({"distance": 2.0}),
            json!({"distance": 3.0}),
            json!({"distance": 4.0}),
        ]);
        let stats = describe(&records, &["distance"], None).map(|t| t.statistics);
        let distance = stats
            .and_then(|mut s| s.remove("distance"))
            .unwrap_or(ColumnStats {
                mean: f64::NAN,
                median: f64::NAN,
                min: f64::NAN,
                max: f64::NAN,
                std_dev: None,
            });

        assert_close(distance.mean, 2.5);
        assert_close(distance.median, 2.5);
        assert_close(distance.min, 1.0);
        assert_close(distance.max, 4.0);
        // Sample std-dev of 1..4 is sqrt(5/3)
        assert_close(distance.std_dev.unwrap_or(0.0), (5.0_f64 / 3.0).sqrt());
    }

    #[test]
    fn odd_count_median_is_middle_value() {
        let records = rows(vec![
            json!({"x": 9.0}),
            json!({"x": 1.0}),
            json!({"x": 5.0}),
        ]);
        let stats = describe(&records, &["x"], None);
        let median = stats
            .and_then(|t| t.statistics.get("x").map(|s| s.median))
            .unwrap_or(f64::NAN);
        assert_close(median, 5.0);
    }

    #[test]
    fn single_row_has_no_std_dev() {
        let records = rows(vec![json!({"x": 7.0})]);
        let stats = describe(&records, &["x"], None);
        let x = stats.and_then(|t| t.statistics.get("x").cloned());
        assert!(x.is_some_and(|s| s.std_dev.is_none()));
    }

    #[test]
    fn mixed_type_column_is_excluded() {
        let records = rows(vec![
            json!({"x": 1.0, "name": "a"}),
            json!({"x": "oops", "name": "b"}),
        ]);
        let stats = describe(&records, &["x", "name"], None);
        assert!(stats.is_some_and(|t| t.statistics.is_empty()));
    }

    #[test]
    fn integer_values_count_as_numeric() {
        let records = rows(vec![json!({"n": 1}), json!({"n": 2})]);
        let stats = describe(&records, &["n"], None);
        let mean = stats
            .and_then(|t| t.statistics.get("n").map(|s| s.mean))
            .unwrap_or(f64::NAN);
        assert_close(mean, 1.5);
    }

    #[test]
    fn grouped_means() {
        let records = rows(vec![
            json!({"type": "running", "distance": 10.0}),
            json!({"type": "running", "distance": 20.0}),
            json!({"type": "cycling", "distance": 50.0}),
        ]);
        let stats = describe(&records, &["distance"], Some("type"));
        let grouped = stats.and_then(|t| t.grouped_analysis);
        let running_mean = grouped
            .as_ref()
            .and_then(|g| g.get("running"))
            .and_then(|cols| cols.get("distance"))
            .copied()
            .unwrap_or(f64::NAN);
        let cycling_mean = grouped
            .as_ref()
            .and_then(|g| g.get("cycling"))
            .and_then(|cols| cols.get("distance"))
            .copied()
            .unwrap_or(f64::NAN);
        assert_close(running_mean, 15.0);
        assert_close(cycling_mean, 50.0);
    }
}
