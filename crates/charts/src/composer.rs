use std::fmt::Display;

use foundation::time::Time;
use formats::{CityComparisonDataset, DatasetIssue, ValidatedDataset};
use runtime::LoadState;
use serde::{Deserialize, Serialize};

use crate::animation::Animation;
use crate::options::RadarOptions;
use crate::selector::{self, NotFound};
use crate::series::ChartSeries;

pub const DEFAULT_CITY: &str = "Warsaw";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadarConfig {
    pub data_url: String,
    pub initial_city: String,
    pub options: RadarOptions,
    pub heading: String,
    pub selector_label: String,
    pub loading_text: String,
}

impl Default for RadarConfig {
    fn default() -> Self {
        Self {
            data_url: "/data/cityData.json".to_string(),
            initial_city: DEFAULT_CITY.to_string(),
            options: RadarOptions::default(),
            heading: "City Comparison Radar Chart".to_string(),
            selector_label: "Choose City:".to_string(),
            loading_text: "Loading data...".to_string(),
        }
    }
}

/// What the chart area should show right now.
#[derive(Debug, Clone, PartialEq)]
pub enum RadarView {
    Loading,
    /// The dataset failed to load.
    Empty,
    NoData { city: String },
    Chart { title: String, series: ChartSeries },
}

impl RadarView {
    /// Placeholder text, or `None` when a chart is drawn.
    pub fn message(&self, config: &RadarConfig) -> Option<String> {
        match self {
            RadarView::Loading => Some(config.loading_text.clone()),
            RadarView::Empty => Some("No data available".to_string()),
            RadarView::NoData { city } => Some(format!("No data available for {city}")),
            RadarView::Chart { .. } => None,
        }
    }

    pub fn chart(&self) -> Option<&ChartSeries> {
        match self {
            RadarView::Chart { series, .. } => Some(series),
            _ => None,
        }
    }
}

/// Dataset, selection and derived view of one radar chart.
#[derive(Debug)]
pub struct RadarComposer {
    config: RadarConfig,
    dataset: LoadState<CityComparisonDataset>,
    issues: Vec<DatasetIssue>,
    selected: String,
    view: RadarView,
    animation: Animation,
}

impl RadarComposer {
    pub fn new(config: RadarConfig) -> Self {
        let animation = config.options.animation();
        let selected = config.initial_city.clone();
        Self {
            config,
            dataset: LoadState::Loading,
            issues: Vec::new(),
            selected,
            view: RadarView::Loading,
            animation,
        }
    }

    pub fn config(&self) -> &RadarConfig {
        &self.config
    }

    pub fn options(&self) -> &RadarOptions {
        &self.config.options
    }

    pub fn dataset(&self) -> &LoadState<CityComparisonDataset> {
        &self.dataset
    }

    /// Validation issues reported for the loaded dataset.
    pub fn issues(&self) -> &[DatasetIssue] {
        &self.issues
    }

    /// Applies the outcome of the dataset fetch. Only the first call has an
    /// effect; a failure is logged once and leaves the chart empty.
    pub fn on_dataset_loaded<E: Display>(&mut self, result: Result<ValidatedDataset, E>) -> bool {
        if !self.dataset.is_loading() {
            log::debug!("ignoring late dataset result");
            return false;
        }
        let result = match result {
            Ok(validated) => {
                log::info!(
                    "city dataset loaded: {} rows, {} rejected",
                    validated.dataset.chart_data.len(),
                    validated.rejected_rows()
                );
                self.issues = validated.issues;
                Ok(validated.dataset)
            }
            Err(err) => {
                log::error!("Error fetching data: {err}");
                Err(err)
            }
        };
        self.dataset
            .settle(LoadState::from_result(result, |d| d.chart_data.is_empty()));
        self.refresh();
        true
    }

    /// Changes the selected city. Returns `true` when the selection changed.
    pub fn select_city(&mut self, city_name: &str) -> bool {
        if self.selected == city_name {
            return false;
        }
        self.selected = city_name.to_string();
        self.refresh();
        true
    }

    /// The heading and dropdown stay hidden until the fetch settles.
    pub fn controls_visible(&self) -> bool {
        !self.dataset.is_loading()
    }

    pub fn selected_city(&self) -> &str {
        &self.selected
    }

    pub fn view(&self) -> &RadarView {
        &self.view
    }

    pub fn message(&self) -> Option<String> {
        self.view.message(&self.config)
    }

    /// Dropdown options; empty until a dataset is ready.
    pub fn city_names(&self) -> Vec<&str> {
        self.dataset
            .ready()
            .map(selector::city_names)
            .unwrap_or_default()
    }

    /// Chart growth progress in `[0, 1]` at `now`.
    pub fn frame(&mut self, now: Time) -> f64 {
        self.animation.progress(now)
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_running()
    }

    fn refresh(&mut self) {
        let next = match &self.dataset {
            LoadState::Loading => RadarView::Loading,
            LoadState::Failed(_) => RadarView::Empty,
            LoadState::Empty => RadarView::NoData {
                city: self.selected.clone(),
            },
            LoadState::Ready(dataset) => match selector::select(dataset, &self.selected) {
                Ok(series) => RadarView::Chart {
                    title: self.config.options.title_for(&self.selected),
                    series,
                },
                Err(NotFound { city }) => {
                    log::debug!("no radar data for {city}");
                    RadarView::NoData { city }
                }
            },
        };
        if next != self.view {
            self.view = next;
            self.animation.restart();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{RadarComposer, RadarConfig, RadarView};
    use foundation::time::Time;
    use formats::{FormatError, parse_city_dataset};
    use pretty_assertions::assert_eq;

    const DATA: &str = r#"{
        "chartConfig": [{ "labels": ["Safety", "Transport"] }],
        "chartData": [
            { "id": 1, "city_name": "Warsaw", "region": "Central Europe",
              "global_data": [60, 55], "region_data": [65, 62], "city_data": [72, 80] },
            { "id": 2, "city_name": "Berlin", "region": "Western Europe",
              "global_data": [60, 55], "region_data": [70, 75], "city_data": [74, 85] }
        ]
    }"#;

    fn loaded() -> RadarComposer {
        let mut composer = RadarComposer::new(RadarConfig::default());
        assert!(composer.on_dataset_loaded(parse_city_dataset(DATA)));
        composer
    }

    #[test]
    fn starts_loading_with_default_city() {
        let composer = RadarComposer::new(RadarConfig::default());
        assert_eq!(composer.view(), &RadarView::Loading);
        assert_eq!(composer.selected_city(), "Warsaw");
        assert_eq!(composer.message().as_deref(), Some("Loading data..."));
        assert!(composer.city_names().is_empty());
        assert!(!composer.controls_visible());
    }

    #[test]
    fn default_city_charts_after_load() {
        let composer = loaded();
        let RadarView::Chart { title, series } = composer.view() else {
            panic!("expected chart, got {:?}", composer.view());
        };
        assert_eq!(title, "Warsaw Performance Overview");
        assert_eq!(series.series[1].label, "Central Europe");
        assert_eq!(series.series[2].data, vec![72.0, 80.0]);
        assert_eq!(composer.message(), None);
        assert_eq!(composer.city_names(), vec!["Warsaw", "Berlin"]);
        assert_eq!(composer.dataset().label(), "ready");
        assert!(composer.controls_visible());
    }

    #[test]
    fn selection_change_recomposes() {
        let mut composer = loaded();
        assert!(composer.select_city("Berlin"));
        assert!(!composer.select_city("Berlin"));
        let chart = composer.view().chart().expect("chart");
        assert_eq!(chart.series[2].label, "Berlin");

        assert!(composer.select_city("Nowhereville"));
        assert_eq!(
            composer.view(),
            &RadarView::NoData {
                city: "Nowhereville".to_string()
            }
        );
        assert_eq!(
            composer.message().as_deref(),
            Some("No data available for Nowhereville")
        );
    }

    #[test]
    fn empty_chart_data_shows_no_data() {
        let mut composer = RadarComposer::new(RadarConfig::default());
        composer.on_dataset_loaded(parse_city_dataset(
            r#"{ "chartConfig": [{ "labels": ["A"] }], "chartData": [] }"#,
        ));
        assert_eq!(composer.dataset().label(), "empty");
        for city in ["Warsaw", "Berlin"] {
            composer.select_city(city);
            assert_eq!(
                composer.view(),
                &RadarView::NoData {
                    city: city.to_string()
                }
            );
        }
    }

    #[test]
    fn failed_load_is_settled_once() {
        let mut composer = RadarComposer::new(RadarConfig::default());
        assert!(composer.on_dataset_loaded(Err::<formats::ValidatedDataset, _>(
            FormatError::MissingChartConfig
        )));
        assert_eq!(composer.view(), &RadarView::Empty);
        assert_eq!(composer.message().as_deref(), Some("No data available"));
        assert!(composer.dataset().is_failed());
        assert!(composer.controls_visible());

        assert!(!composer.on_dataset_loaded(parse_city_dataset(DATA)));
        assert_eq!(composer.view(), &RadarView::Empty);
    }

    #[test]
    fn failed_fetch_logs_exactly_one_error() {
        let mut composer = RadarComposer::new(RadarConfig::default());
        let errors = error_log::errors_during(|| {
            composer.on_dataset_loaded(Err::<formats::ValidatedDataset, _>("HTTP 500"));
            composer.on_dataset_loaded(Err::<formats::ValidatedDataset, _>("late failure"));
            composer.on_dataset_loaded(parse_city_dataset(DATA));
            composer.select_city("Berlin");
        });
        assert_eq!(errors, 1);
        assert_eq!(composer.view(), &RadarView::Empty);
    }

    #[test]
    fn rejected_rows_are_kept_as_issues() {
        let mut composer = RadarComposer::new(RadarConfig::default());
        composer.on_dataset_loaded(parse_city_dataset(
            r#"{
                "chartConfig": [{ "labels": ["A", "B"] }],
                "chartData": [
                    { "id": 1, "city_name": "Warsaw", "region": "CE",
                      "global_data": [1, 2], "region_data": [1, 2], "city_data": [1] }
                ]
            }"#,
        ));
        assert_eq!(composer.issues().len(), 1);
        assert_eq!(
            composer.view(),
            &RadarView::NoData {
                city: "Warsaw".to_string()
            }
        );
    }

    mod error_log {
        use std::cell::Cell;

        use log::{Level, LevelFilter, Log, Metadata, Record};

        thread_local! {
            static ERRORS: Cell<usize> = const { Cell::new(0) };
        }

        struct CountingLogger;

        impl Log for CountingLogger {
            fn enabled(&self, _: &Metadata<'_>) -> bool {
                true
            }

            fn log(&self, record: &Record<'_>) {
                if record.level() == Level::Error {
                    ERRORS.with(|n| n.set(n.get() + 1));
                }
            }

            fn flush(&self) {}
        }

        static LOGGER: CountingLogger = CountingLogger;

        /// Error records logged on the current thread while `f` runs.
        pub fn errors_during(f: impl FnOnce()) -> usize {
            let _ = log::set_logger(&LOGGER);
            log::set_max_level(LevelFilter::Trace);
            let before = ERRORS.with(Cell::get);
            f();
            ERRORS.with(Cell::get) - before
        }
    }

    #[test]
    fn view_change_restarts_animation() {
        let mut composer = RadarComposer::new(RadarConfig::default());
        assert_eq!(composer.frame(Time(0.0)), 1.0);

        composer.on_dataset_loaded(parse_city_dataset(DATA));
        assert!(composer.is_animating());
        assert_eq!(composer.frame(Time(5.0)), 0.0);
        assert_eq!(composer.frame(Time(5.5)), 0.5);
        assert_eq!(composer.frame(Time(6.0)), 1.0);
        assert!(!composer.is_animating());

        composer.select_city("Berlin");
        assert_eq!(composer.frame(Time(7.0)), 0.0);
    }

    #[test]
    fn config_json_overrides_selected_fields() {
        let config: RadarConfig =
            serde_json::from_str(r#"{ "initial_city": "Berlin", "data_url": "/x.json" }"#)
                .expect("parse");
        assert_eq!(config.data_url, "/x.json");
        assert_eq!(config.heading, "City Comparison Radar Chart");
        assert_eq!(config.selector_label, "Choose City:");

        let mut composer = RadarComposer::new(config);
        composer.on_dataset_loaded(parse_city_dataset(DATA));
        assert_eq!(composer.view().chart().expect("chart").series[2].label, "Berlin");
    }
}
