//! Source collection model.
//!
//! Every optional field is decoded leniently: a value of the wrong shape is
//! treated as if it were absent, so any JSON object yields a collection.

use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use serde_json::Value;

/// Root document of a request collection
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Collection {
    #[serde(default, deserialize_with = "lenient")]
    pub info: Option<CollectionInfo>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub item: Vec<Item>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct CollectionInfo {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "description")]
    pub description: Option<String>,
}

/// A node of the collection tree: a folder, a request, or both
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Item {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "description")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "request")]
    pub request: Option<Request>,
    #[serde(default, deserialize_with = "lenient_opt_seq")]
    pub item: Option<Vec<Item>>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub response: Vec<SampleResponse>,
}

/// Shape of an item, derived from which markers it carries
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ItemKind<'a> {
    Leaf(&'a Request),
    Folder(&'a [Item]),
    Both(&'a Request, &'a [Item]),
    Empty,
}

impl Item {
    pub fn kind(&self) -> ItemKind<'_> {
        match (&self.request, &self.item) {
            (Some(request), Some(children)) => ItemKind::Both(request, children),
            (Some(request), None) => ItemKind::Leaf(request),
            (None, Some(children)) => ItemKind::Folder(children),
            (None, None) => ItemKind::Empty,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Request {
    #[serde(default, deserialize_with = "lenient")]
    pub url: Option<RequestUrl>,
    #[serde(default, deserialize_with = "lenient")]
    pub method: Option<String>,
    #[serde(default, deserialize_with = "description")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub header: Vec<KeyValue>,
    #[serde(default, deserialize_with = "lenient")]
    pub body: Option<Body>,
}

impl Request {
    /// Case-insensitive `content-type` header lookup
    pub fn content_type(&self) -> Option<&str> {
        find_content_type(&self.header)
    }
}

/// A request URL, either a plain string or a structured object
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RequestUrl {
    Raw(String),
    Structured(UrlObject),
}

impl RequestUrl {
    pub fn query(&self) -> &[KeyValue] {
        match self {
            RequestUrl::Raw(_) => &[],
            RequestUrl::Structured(url) => &url.query,
        }
    }

    pub fn path(&self) -> Option<&[String]> {
        match self {
            RequestUrl::Raw(_) => None,
            RequestUrl::Structured(url) => url.path.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct UrlObject {
    #[serde(default, deserialize_with = "lenient")]
    pub raw: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_seq")]
    pub path: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub query: Vec<KeyValue>,
}

/// Query entry, header, or form field
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct KeyValue {
    #[serde(default, deserialize_with = "lenient")]
    pub key: String,
    #[serde(default, deserialize_with = "lenient")]
    pub value: Option<String>,
    #[serde(default, deserialize_with = "description")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Body {
    #[serde(default, deserialize_with = "lenient")]
    pub mode: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub raw: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_seq")]
    pub formdata: Option<Vec<KeyValue>>,
}

/// Saved example response attached to a request item
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct SampleResponse {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "status_code")]
    pub code: Option<String>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub header: Vec<KeyValue>,
    #[serde(default, deserialize_with = "lenient")]
    pub body: Option<String>,
}

impl SampleResponse {
    pub fn content_type(&self) -> Option<&str> {
        find_content_type(&self.header)
    }
}

fn find_content_type(headers: &[KeyValue]) -> Option<&str> {
    headers
        .iter()
        .find(|h| h.key.eq_ignore_ascii_case("content-type"))
        .and_then(|h| h.value.as_deref())
}

fn decode<T: DeserializeOwned>(value: Value) -> Option<T> {
    T::deserialize(value).ok()
}

fn decode_seq<T: DeserializeOwned>(value: Value) -> Option<Vec<T>> {
    match value {
        Value::Array(values) => Some(values.into_iter().filter_map(decode).collect()),
        _ => None,
    }
}

fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(decode(value).unwrap_or_default())
}

fn lenient_seq<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(decode_seq(value).unwrap_or_default())
}

fn lenient_opt_seq<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(decode_seq(value))
}

// Descriptions are either a plain string or `{ "content": "...", "type": "text/markdown" }`.
fn description<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(text) => Some(text),
        Value::Object(mut fields) => match fields.remove("content") {
            Some(Value::String(text)) => Some(text),
            _ => None,
        },
        _ => None,
    })
}

fn request<'de, D>(deserializer: D) -> Result<Option<Request>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(url) => Some(Request {
            url: Some(RequestUrl::Raw(url)),
            ..Default::default()
        }),
        value @ Value::Object(_) => decode(value),
        _ => None,
    })
}

fn status_code<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(code) => Some(code.to_string()),
        Value::String(code) if !code.is_empty() => Some(code),
        _ => None,
    })
}
