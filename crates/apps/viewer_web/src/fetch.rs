use formats::{FormatError, LocationRecord, ValidatedDataset, parse_city_dataset, parse_locations};
use gloo_net::http::{Request, Response};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),
    #[error("HTTP status {0}")]
    Status(u16),
    #[error("parse error: {0}")]
    Parse(#[from] FormatError),
}

impl From<gloo_net::Error> for FetchError {
    fn from(err: gloo_net::Error) -> Self {
        FetchError::Network(err.to_string())
    }
}

async fn get(url: &str) -> Result<Response, FetchError> {
    let resp = Request::get(url).send().await?;
    if !resp.ok() {
        return Err(FetchError::Status(resp.status()));
    }
    Ok(resp)
}

pub async fn fetch_text(url: &str) -> Result<String, FetchError> {
    Ok(get(url).await?.text().await?)
}

pub async fn fetch_bytes(url: &str) -> Result<Vec<u8>, FetchError> {
    Ok(get(url).await?.binary().await?)
}

pub async fn fetch_locations(url: &str) -> Result<Vec<LocationRecord>, FetchError> {
    let text = fetch_text(url).await?;
    Ok(parse_locations(&text)?)
}

pub async fn fetch_city_dataset(url: &str) -> Result<ValidatedDataset, FetchError> {
    let text = fetch_text(url).await?;
    Ok(parse_city_dataset(&text)?)
}
