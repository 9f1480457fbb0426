//! HTTP clients for the catalog's JSON endpoints and the local mirror.

use std::time::Duration;

use chrono::{Datelike, NaiveDateTime};
use log::debug;
use url::Url;

use crate::error::SyncError;
use crate::manifest::{self, ImageRecord, ObservationDate};

const CAPTURE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A source of observation dates. Implemented by the remote catalog and the
/// local mirror so reconciliation can treat both uniformly.
pub trait DateSource {
    async fn available_dates(&self) -> Result<Vec<ObservationDate>, SyncError>;
}

pub struct Catalog {
    client: reqwest::Client,
    base_url: Url,
    collection: String,
    api_key: String,
}

impl Catalog {
    pub fn new(
        base_url: &str,
        collection: &str,
        api_key: &str,
        timeout: Duration,
    ) -> Result<Self, SyncError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: Url::parse(base_url)?,
            collection: collection.to_string(),
            api_key: api_key.to_string(),
        })
    }

    pub fn collection(self: &Self) -> &str {
        &self.collection
    }

    pub fn http_client(self: &Self) -> &reqwest::Client {
        &self.client
    }

    fn api_url(self: &Self, tail: &str) -> Result<Url, SyncError> {
        let mut url = Url::parse(&format!(
            "{}/api/{}/{}",
            self.base_url, self.collection, tail
        ))?;
        url.query_pairs_mut().append_pair("api_key", &self.api_key);
        Ok(url)
    }

    async fn fetch_text(self: &Self, url: Url) -> Result<String, SyncError> {
        debug!("GET {url}");
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }

    /// The manifest of image records published for one date.
    pub async fn manifest(self: &Self, date: &ObservationDate) -> Result<Vec<ImageRecord>, SyncError> {
        let url = self.api_url(&format!("date/{}", date.date))?;
        let body = self.fetch_text(url).await?;
        manifest::parse_manifest(&body)
    }

    /// Canonical archive URL for a record, derived from its capture
    /// timestamp. The archive zero-pads month and day in its path convention.
    pub fn archive_url(self: &Self, record: &ImageRecord) -> Result<Url, SyncError> {
        let captured = parse_capture_timestamp(&record.date)?;
        let mut url = Url::parse(&format!(
            "{}/archive/{}/{}/{:02}/{:02}/png/{}.png",
            self.base_url,
            self.collection,
            captured.year(),
            captured.month(),
            captured.day(),
            record.image,
        ))?;
        url.query_pairs_mut().append_pair("api_key", &self.api_key);
        Ok(url)
    }
}

impl DateSource for Catalog {
    async fn available_dates(&self) -> Result<Vec<ObservationDate>, SyncError> {
        let url = self.api_url("all")?;
        let body = self.fetch_text(url).await?;
        manifest::parse_date_list(&body)
    }
}

pub struct Mirror {
    client: reqwest::Client,
    base_url: Url,
}

impl Mirror {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, SyncError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: Url::parse(base_url)?,
        })
    }
}

impl DateSource for Mirror {
    async fn available_dates(&self) -> Result<Vec<ObservationDate>, SyncError> {
        let url = Url::parse(&format!("{}/all.json", self.base_url))?;
        debug!("GET {url}");
        let response = self.client.get(url).send().await?.error_for_status()?;
        let body = response.text().await?;
        manifest::parse_date_list(&body)
    }
}

fn parse_capture_timestamp(value: &str) -> Result<NaiveDateTime, SyncError> {
    NaiveDateTime::parse_from_str(value, CAPTURE_TIMESTAMP_FORMAT).map_err(|source| {
        SyncError::TimeParse {
            value: value.to_string(),
            source,
        }
    })
}
