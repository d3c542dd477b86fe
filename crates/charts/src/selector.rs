use formats::{CityComparisonDataset, CityRecord};
use thiserror::Error;

use crate::series::{ChartSeries, Series, SeriesStyle};

/// The selected city has no row in the loaded dataset.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no data available for {city}")]
pub struct NotFound {
    pub city: String,
}

/// First row whose `city_name` equals `city_name`, ignoring case.
pub fn find_city<'a>(
    dataset: &'a CityComparisonDataset,
    city_name: &str,
) -> Option<&'a CityRecord> {
    let wanted = city_name.to_lowercase();
    dataset
        .chart_data
        .iter()
        .find(|c| c.city_name.to_lowercase() == wanted)
}

/// Builds the Global / Region / City series for `city_name`.
pub fn select(dataset: &CityComparisonDataset, city_name: &str) -> Result<ChartSeries, NotFound> {
    let city = find_city(dataset, city_name).ok_or_else(|| NotFound {
        city: city_name.to_string(),
    })?;

    Ok(ChartSeries {
        labels: dataset.labels().to_vec(),
        series: vec![
            Series {
                label: "Global".to_string(),
                data: city.global_data.clone(),
                style: SeriesStyle::global(),
            },
            Series {
                label: city.region.clone(),
                data: city.region_data.clone(),
                style: SeriesStyle::region(),
            },
            Series {
                label: city.city_name.clone(),
                data: city.city_data.clone(),
                style: SeriesStyle::city(),
            },
        ],
    })
}

/// Dropdown options, in dataset order.
pub fn city_names(dataset: &CityComparisonDataset) -> Vec<&str> {
    dataset
        .chart_data
        .iter()
        .map(|c| c.city_name.as_str())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{NotFound, city_names, select};
    use crate::series::SeriesStyle;
    use formats::{CityComparisonDataset, parse_city_dataset};
    use pretty_assertions::assert_eq;

    fn warsaw_dataset() -> CityComparisonDataset {
        parse_city_dataset(
            r#"{
                "chartConfig": [{ "labels": ["A", "B"] }],
                "chartData": [{
                    "id": 1, "city_name": "Warsaw", "region": "EU",
                    "global_data": [1, 2], "region_data": [3, 4], "city_data": [5, 6]
                }]
            }"#,
        )
        .expect("parse")
        .dataset
    }

    #[test]
    fn builds_three_series() {
        let chart = select(&warsaw_dataset(), "Warsaw").expect("found");
        assert_eq!(chart.labels, vec!["A".to_string(), "B".to_string()]);
        assert_eq!(chart.series.len(), 3);

        let labels: Vec<&str> = chart.series.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["Global", "EU", "Warsaw"]);
        assert_eq!(chart.series[0].data, vec![1.0, 2.0]);
        assert_eq!(chart.series[1].data, vec![3.0, 4.0]);
        assert_eq!(chart.series[2].data, vec![5.0, 6.0]);
        assert!(chart.series.iter().all(|s| s.data.len() == 2));
        assert_eq!(chart.series[2].style, SeriesStyle::city());
    }

    #[test]
    fn lookup_ignores_case() {
        let ds = warsaw_dataset();
        assert_eq!(select(&ds, "warsaw"), select(&ds, "Warsaw"));
        assert_eq!(select(&ds, "WARSAW"), select(&ds, "Warsaw"));
    }

    #[test]
    fn unknown_city_is_not_found() {
        let err = select(&warsaw_dataset(), "Nowhereville").unwrap_err();
        assert_eq!(
            err,
            NotFound {
                city: "Nowhereville".to_string()
            }
        );
        assert_eq!(err.to_string(), "no data available for Nowhereville");
    }

    #[test]
    fn empty_dataset_never_matches() {
        let mut ds = warsaw_dataset();
        ds.chart_data.clear();
        for city in ["Warsaw", "warsaw", "", "Berlin"] {
            assert!(select(&ds, city).is_err());
        }
    }

    #[test]
    fn first_match_wins_for_case_duplicates() {
        let validated = parse_city_dataset(
            r#"{
                "chartConfig": [{ "labels": ["A"] }],
                "chartData": [
                    { "id": 1, "city_name": "Warsaw", "region": "First",
                      "global_data": [1], "region_data": [1], "city_data": [1] },
                    { "id": 2, "city_name": "WARSAW", "region": "Second",
                      "global_data": [2], "region_data": [2], "city_data": [2] }
                ]
            }"#,
        )
        .expect("parse");
        let chart = select(&validated.dataset, "warsaw").expect("found");
        assert_eq!(chart.series[1].label, "First");
        assert_eq!(city_names(&validated.dataset), vec!["Warsaw", "WARSAW"]);
    }
}
