use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::FormatError;
use crate::locations::RecordId;

/// `cityData.json`: category labels plus one comparison row per city.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CityComparisonDataset {
    pub chart_config: Vec<ChartConfigEntry>,
    #[serde(default)]
    pub chart_data: Vec<CityRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChartConfigEntry {
    #[serde(default)]
    pub labels: Vec<String>,
}

/// One city's Global / Region / City series, aligned with the dataset labels.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CityRecord {
    pub id: RecordId,
    pub city_name: String,
    pub region: String,
    #[serde(default)]
    pub global_data: Vec<f64>,
    #[serde(default)]
    pub region_data: Vec<f64>,
    #[serde(default)]
    pub city_data: Vec<f64>,
}

impl CityComparisonDataset {
    /// Category labels from the first `chartConfig` entry.
    pub fn labels(&self) -> &[String] {
        self.chart_config
            .first()
            .map(|c| c.labels.as_slice())
            .unwrap_or(&[])
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SeriesField {
    Global,
    Region,
    City,
}

impl SeriesField {
    pub const ALL: [SeriesField; 3] = [SeriesField::Global, SeriesField::Region, SeriesField::City];

    pub fn as_str(self) -> &'static str {
        match self {
            SeriesField::Global => "global_data",
            SeriesField::Region => "region_data",
            SeriesField::City => "city_data",
        }
    }

    pub fn values(self, record: &CityRecord) -> &[f64] {
        match self {
            SeriesField::Global => &record.global_data,
            SeriesField::Region => &record.region_data,
            SeriesField::City => &record.city_data,
        }
    }
}

/// Problems found while validating a dataset. Rows with a `LengthMismatch`
/// or `NonFinite` issue are dropped; duplicates are kept.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DatasetIssue {
    #[error("{city_name}: {} has {actual} values, expected {expected}", .field.as_str())]
    LengthMismatch {
        city_name: String,
        field: SeriesField,
        expected: usize,
        actual: usize,
    },
    #[error("{city_name}: {}[{index}] is not a finite number", .field.as_str())]
    NonFinite {
        city_name: String,
        field: SeriesField,
        index: usize,
    },
    #[error("{city_name}: duplicate of row {first_row} (case-insensitive); first match wins")]
    DuplicateCity {
        city_name: String,
        first_row: usize,
        duplicate_row: usize,
    },
}

impl DatasetIssue {
    pub fn rejects_row(&self) -> bool {
        !matches!(self, DatasetIssue::DuplicateCity { .. })
    }
}

/// A dataset whose remaining rows all match the label count.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedDataset {
    pub dataset: CityComparisonDataset,
    pub issues: Vec<DatasetIssue>,
}

impl ValidatedDataset {
    pub fn rejected_rows(&self) -> usize {
        self.issues.iter().filter(|i| i.rejects_row()).count()
    }
}

/// Parses `cityData.json` and validates it.
pub fn parse_city_dataset(payload: &str) -> Result<ValidatedDataset, FormatError> {
    let dataset: CityComparisonDataset = serde_json::from_str(payload)?;
    if dataset.chart_config.is_empty() {
        return Err(FormatError::MissingChartConfig);
    }
    Ok(validate_city_dataset(dataset))
}

/// Drops rows whose series don't line up with the labels and reports
/// case-insensitive duplicate city names.
pub fn validate_city_dataset(mut dataset: CityComparisonDataset) -> ValidatedDataset {
    let expected = dataset.labels().len();
    let mut issues = Vec::new();

    let rows = std::mem::take(&mut dataset.chart_data);
    let mut kept: Vec<CityRecord> = Vec::with_capacity(rows.len());
    let mut seen: Vec<(String, usize)> = Vec::new();

    for (row, record) in rows.into_iter().enumerate() {
        let row_issues = row_issues(&record, expected);
        if !row_issues.is_empty() {
            issues.extend(row_issues);
            continue;
        }

        let key = record.city_name.to_lowercase();
        if let Some((_, first_row)) = seen.iter().find(|(k, _)| *k == key) {
            issues.push(DatasetIssue::DuplicateCity {
                city_name: record.city_name.clone(),
                first_row: *first_row,
                duplicate_row: row,
            });
        } else {
            seen.push((key, row));
        }
        kept.push(record);
    }

    for issue in &issues {
        log::warn!("cityData: {issue}");
    }

    dataset.chart_data = kept;
    ValidatedDataset { dataset, issues }
}

fn row_issues(record: &CityRecord, expected: usize) -> Vec<DatasetIssue> {
    let mut out = Vec::new();
    for field in SeriesField::ALL {
        let values = field.values(record);
        if values.len() != expected {
            out.push(DatasetIssue::LengthMismatch {
                city_name: record.city_name.clone(),
                field,
                expected,
                actual: values.len(),
            });
            continue;
        }
        if let Some(index) = values.iter().position(|v| !v.is_finite()) {
            out.push(DatasetIssue::NonFinite {
                city_name: record.city_name.clone(),
                field,
                index,
            });
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{
        CityComparisonDataset, ChartConfigEntry, CityRecord, DatasetIssue, SeriesField,
        parse_city_dataset, validate_city_dataset,
    };
    use crate::error::FormatError;
    use crate::locations::RecordId;
    use pretty_assertions::assert_eq;

    const WARSAW_ONLY: &str = r#"{
        "chartConfig": [{ "labels": ["A", "B"] }],
        "chartData": [{
            "id": 1, "city_name": "Warsaw", "region": "EU",
            "global_data": [1, 2], "region_data": [3, 4], "city_data": [5, 6]
        }]
    }"#;

    fn record(name: &str, global: Vec<f64>, region: Vec<f64>, city: Vec<f64>) -> CityRecord {
        CityRecord {
            id: RecordId::Text(name.to_lowercase()),
            city_name: name.to_string(),
            region: "EU".to_string(),
            global_data: global,
            region_data: region,
            city_data: city,
        }
    }

    fn dataset(labels: &[&str], rows: Vec<CityRecord>) -> CityComparisonDataset {
        CityComparisonDataset {
            chart_config: vec![ChartConfigEntry {
                labels: labels.iter().map(|s| s.to_string()).collect(),
            }],
            chart_data: rows,
        }
    }

    #[test]
    fn parses_wire_names() {
        let validated = parse_city_dataset(WARSAW_ONLY).expect("parse");
        assert!(validated.issues.is_empty());
        let ds = validated.dataset;
        assert_eq!(ds.labels(), ["A".to_string(), "B".to_string()]);
        assert_eq!(ds.chart_data.len(), 1);
        assert_eq!(ds.chart_data[0].city_data, vec![5.0, 6.0]);
    }

    #[test]
    fn empty_chart_data_is_valid() {
        let payload = r#"{"chartConfig":[{"labels":["A"]}],"chartData":[]}"#;
        let validated = parse_city_dataset(payload).expect("parse");
        assert!(validated.dataset.chart_data.is_empty());
        assert!(validated.issues.is_empty());
    }

    #[test]
    fn missing_chart_config_is_an_error() {
        let err = parse_city_dataset(r#"{"chartConfig":[],"chartData":[]}"#).unwrap_err();
        assert!(matches!(err, FormatError::MissingChartConfig));
    }

    #[test]
    fn short_rows_are_rejected() {
        let ds = dataset(
            &["A", "B", "C"],
            vec![
                record("Warsaw", vec![1.0, 2.0, 3.0], vec![1.0, 2.0], vec![1.0, 2.0, 3.0]),
                record("Berlin", vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0], vec![7.0, 8.0, 9.0]),
            ],
        );
        let validated = validate_city_dataset(ds);
        assert_eq!(
            validated.issues,
            vec![DatasetIssue::LengthMismatch {
                city_name: "Warsaw".to_string(),
                field: SeriesField::Region,
                expected: 3,
                actual: 2,
            }]
        );
        assert_eq!(validated.rejected_rows(), 1);
        assert_eq!(validated.dataset.chart_data.len(), 1);
        assert_eq!(validated.dataset.chart_data[0].city_name, "Berlin");
    }

    #[test]
    fn non_finite_values_are_rejected() {
        let ds = dataset(
            &["A", "B"],
            vec![record("Oslo", vec![1.0, f64::NAN], vec![1.0, 2.0], vec![1.0, 2.0])],
        );
        let validated = validate_city_dataset(ds);
        assert_eq!(
            validated.issues,
            vec![DatasetIssue::NonFinite {
                city_name: "Oslo".to_string(),
                field: SeriesField::Global,
                index: 1,
            }]
        );
        assert!(validated.dataset.chart_data.is_empty());
    }

    #[test]
    fn case_duplicates_are_reported_but_kept() {
        let ds = dataset(
            &["A"],
            vec![
                record("Warsaw", vec![1.0], vec![1.0], vec![1.0]),
                record("WARSAW", vec![2.0], vec![2.0], vec![2.0]),
            ],
        );
        let validated = validate_city_dataset(ds);
        assert_eq!(validated.dataset.chart_data.len(), 2);
        assert_eq!(validated.rejected_rows(), 0);
        assert_eq!(
            validated.issues,
            vec![DatasetIssue::DuplicateCity {
                city_name: "WARSAW".to_string(),
                first_row: 0,
                duplicate_row: 1,
            }]
        );
    }

    #[test]
    fn issue_messages_name_the_field() {
        let issue = DatasetIssue::LengthMismatch {
            city_name: "Warsaw".to_string(),
            field: SeriesField::City,
            expected: 6,
            actual: 5,
        };
        assert_eq!(issue.to_string(), "Warsaw: city_data has 5 values, expected 6");
    }

    #[test]
    fn loads_demo_city_data() {
        let path = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../apps/viewer_web/assets/data/cityData.json");
        let payload = std::fs::read_to_string(path).expect("read demo city data");
        let validated = parse_city_dataset(&payload).expect("parse demo city data");
        assert!(validated.issues.is_empty(), "{:?}", validated.issues);
        assert!(
            validated
                .dataset
                .chart_data
                .iter()
                .any(|c| c.city_name == "Warsaw")
        );
    }
}
