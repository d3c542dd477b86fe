use serde::de::DeserializeOwned;

/// Parses an optional JSON config passed from the page. Missing or blank
/// input yields the defaults; missing fields keep their defaults.
pub fn parse_config<T>(json: Option<&str>) -> Result<T, serde_json::Error>
where
    T: DeserializeOwned + Default,
{
    match json.map(str::trim) {
        None | Some("") => Ok(T::default()),
        Some(text) => serde_json::from_str(text),
    }
}

#[cfg(test)]
mod tests {
    use super::parse_config;
    use charts::RadarConfig;
    use pretty_assertions::assert_eq;
    use scene::GlobeConfig;

    #[test]
    fn blank_input_uses_defaults() {
        let a: GlobeConfig = parse_config(None).expect("none");
        let b: GlobeConfig = parse_config(Some("   ")).expect("blank");
        assert_eq!(a, GlobeConfig::default());
        assert_eq!(b, GlobeConfig::default());
    }

    #[test]
    fn partial_globe_config() {
        let config: GlobeConfig =
            parse_config(Some(r#"{ "rotation_speed_rad_s": 0.5, "locations_url": "/pins.json" }"#))
                .expect("parse");
        assert_eq!(config.rotation_speed_rad_s, 0.5);
        assert_eq!(config.locations_url, "/pins.json");
        assert_eq!(config.hover_scale, 1.6);
    }

    #[test]
    fn partial_radar_config() {
        let config: RadarConfig =
            parse_config(Some(r#"{ "initial_city": "Sydney" }"#)).expect("parse");
        assert_eq!(config.initial_city, "Sydney");
        assert_eq!(config.loading_text, "Loading data...");
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(parse_config::<GlobeConfig>(Some("{ nope")).is_err());
    }
}
