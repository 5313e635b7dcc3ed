//! Postman v2.1 collection, one request item per endpoint

use anyhow::Result;
use reqwest::Url;
use serde::Serialize;

use super::{pretty_json, Endpoint};
use crate::description::ApiDescription;

pub const POSTMAN_SCHEMA: &str =
    "https://schema.getpostman.com/json/collection/v2.1.0/collection.json";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Collection {
    pub info: CollectionInfo,
    pub item: Vec<Item>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionInfo {
    pub name: String,
    pub schema: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Item {
    pub name: String,
    pub request: Request,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Request {
    pub method: String,
    pub header: Vec<Header>,
    pub url: RequestUrl,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Body>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Header {
    pub key: String,
    pub value: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestUrl {
    pub raw: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub host: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,
    pub path: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Body {
    pub mode: String,
    pub raw: String,
    pub options: BodyOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BodyOptions {
    pub raw: RawOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawOptions {
    pub language: String,
}

pub fn build(
    description: &ApiDescription,
    endpoints: &[Endpoint<'_>],
    base: &str,
) -> Result<Collection> {
    let item = endpoints
        .iter()
        .map(|endpoint| item_for(endpoint, base))
        .collect::<Result<Vec<_>>>()?;

    Ok(Collection {
        info: CollectionInfo {
            name: format!("{} Collection", description.info.title()),
            schema: POSTMAN_SCHEMA.to_string(),
        },
        item,
    })
}

fn item_for(endpoint: &Endpoint<'_>, base: &str) -> Result<Item> {
    let mut header = Vec::new();
    if endpoint.requires_auth {
        header.push(Header {
            key: "Authorization".to_string(),
            value: "Bearer <token>".to_string(),
            kind: "text".to_string(),
        });
    }

    let body = match &endpoint.body_example {
        Some(example) => Some(Body {
            mode: "raw".to_string(),
            raw: pretty_json(example)?,
            options: BodyOptions {
                raw: RawOptions {
                    language: "json".to_string(),
                },
            },
        }),
        None => None,
    };

    Ok(Item {
        name: endpoint.display_name(),
        request: Request {
            method: endpoint.method.clone(),
            header,
            url: request_url(base, endpoint.path),
            body,
        },
    })
}

/// Splits `base + path` into Postman's URL parts; `{param}` segments are kept unencoded
fn request_url(base: &str, path: &str) -> RequestUrl {
    let raw = format!("{}{}", base, path);
    let endpoint_segments = path
        .trim_start_matches('/')
        .split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    match Url::parse(base) {
        Ok(url) => RequestUrl {
            raw,
            protocol: Some(url.scheme().to_string()),
            host: url
                .host_str()
                .map(|h| h.split('.').map(str::to_string).collect())
                .unwrap_or_default(),
            port: url.port().map(|p| p.to_string()),
            path: url
                .path_segments()
                .into_iter()
                .flatten()
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .chain(endpoint_segments)
                .collect(),
        },
        Err(_) => RequestUrl {
            raw,
            protocol: None,
            host: Vec::new(),
            port: None,
            path: endpoint_segments.collect(),
        },
    }
}
