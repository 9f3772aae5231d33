//! Remote menu source used to seed an empty cache.
//!
//! The upstream document looks like
//! `{"menu": [{"name", "price", "description", "image", "category"}, ...]}`.
//! It carries no ids, so items are numbered from 1 in document order.

use std::{future::Future, time::Duration};

use serde::Deserialize;
use tracing::info;

use crate::{core::db::MenuItem, error::MenuError};

pub trait MenuSource {
    fn fetch_menu(&self) -> impl Future<Output = Result<Vec<MenuItem>, MenuError>> + Send;
}

#[derive(Debug, Deserialize)]
struct MenuPayload {
    menu: Vec<RemoteMenuItem>,
}

#[derive(Debug, Deserialize)]
struct RemoteMenuItem {
    name: String,
    price: RemotePrice,
    #[serde(default)]
    description: String,
    #[serde(default)]
    image: String,
    category: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RemotePrice {
    Text(String),
    Number(serde_json::Number),
}

impl RemotePrice {
    fn into_text(self) -> String {
        match self {
            RemotePrice::Text(text) => text,
            RemotePrice::Number(number) => number_to_text(&number),
        }
    }
}

/// Render a JSON number the way the menu API's web clients print it:
/// integral floats lose their trailing `.0`.
fn number_to_text(number: &serde_json::Number) -> String {
    match number.as_f64() {
        Some(value) if number.is_f64() && value.fract() == 0.0 && value.abs() < 1e15 => {
            format!("{}", value as i64)
        }
        _ => number.to_string(),
    }
}

/// Decode an upstream menu document into storable items.
pub fn parse_menu(body: &[u8]) -> Result<Vec<MenuItem>, MenuError> {
    let payload: MenuPayload = serde_json::from_slice(body)?;
    Ok(payload
        .menu
        .into_iter()
        .zip(1i64..)
        .map(|(item, id)| MenuItem {
            id,
            name: item.name,
            price: item.price.into_text(),
            description: item.description,
            image: item.image,
            category: item.category,
        })
        .collect())
}

/// Fetches the menu document over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpMenuLoader {
    http: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl HttpMenuLoader {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, MenuError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("menu-browser/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            url: url.into(),
            timeout,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl MenuSource for HttpMenuLoader {
    async fn fetch_menu(&self) -> Result<Vec<MenuItem>, MenuError> {
        info!(url = %self.url, "fetching menu");
        let resp = self
            .http
            .get(&self.url)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(MenuError::UpstreamStatus { status });
        }

        let body = resp.bytes().await?;
        let items = parse_menu(&body)?;
        info!(count = items.len(), "menu fetched");
        Ok(items)
    }
}
