use indexmap::IndexMap;
use log::debug;
use serde_json::Value;
use std::collections::BTreeMap;
use url::Url;

use crate::collection::{Item, KeyValue, Request, RequestUrl};
use crate::models::{MediaType, Parameter, ParameterLocation, RequestBody, Response, Schema};

pub const DEFAULT_PROTOCOL: &str = "https";
pub const DEFAULT_HOST: &str = "postman-echo.com";
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";
pub const DEFAULT_STATUS: &str = "200";

/// Normalized location of a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedUrl {
    pub path: String,
    pub protocol: String,
    pub host: String,
}

impl Default for ParsedUrl {
    fn default() -> Self {
        Self {
            path: "/".to_string(),
            protocol: DEFAULT_PROTOCOL.to_string(),
            host: DEFAULT_HOST.to_string(),
        }
    }
}

impl ParsedUrl {
    fn from_segments(segments: &[String]) -> Self {
        let joined = segments.join("/");
        Self {
            path: format!("/{}", joined.trim_start_matches('/')),
            ..Default::default()
        }
    }
}

/// Result of trying to read a text body as JSON
#[derive(Debug, Clone, PartialEq)]
pub enum BodyText {
    Json(Value),
    Text(String),
}

impl BodyText {
    pub fn parse(text: &str) -> Self {
        match serde_json::from_str(text) {
            Ok(value) => BodyText::Json(integral_numbers(value)),
            Err(_) => BodyText::Text(text.to_string()),
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            BodyText::Json(value) => value,
            BodyText::Text(text) => Value::String(text),
        }
    }
}

// Whole floats such as `1.0` or `1e3` are written back as integers.
fn integral_numbers(value: Value) -> Value {
    const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

    match value {
        Value::Number(n) if n.is_f64() => match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() <= MAX_SAFE_INTEGER => Value::from(f as i64),
            _ => Value::Number(n),
        },
        Value::Array(items) => Value::Array(items.into_iter().map(integral_numbers).collect()),
        Value::Object(fields) => Value::Object(
            fields
                .into_iter()
                .map(|(k, v)| (k, integral_numbers(v)))
                .collect(),
        ),
        other => other,
    }
}

/// Resolve a request URL into path, protocol and host. Never fails; anything
/// unusable resolves to the defaults.
pub fn parse_url(url: Option<&RequestUrl>) -> ParsedUrl {
    let (raw, segments) = match url {
        None => return ParsedUrl::default(),
        Some(RequestUrl::Raw(raw)) => (Some(raw.as_str()), None),
        Some(RequestUrl::Structured(url)) => (url.raw.as_deref(), url.path.as_deref()),
    };

    if let Some(raw) = raw.filter(|r| !r.is_empty()) {
        match Url::parse(raw) {
            Ok(parsed) => return from_absolute(&parsed),
            Err(e) => debug!("Could not parse URL {:?}: {}", raw, e),
        }
    }

    match segments {
        Some(segments) => ParsedUrl::from_segments(segments),
        None => ParsedUrl::default(),
    }
}

fn from_absolute(url: &Url) -> ParsedUrl {
    let path = match url.path() {
        "" => "/".to_string(),
        path => path.to_string(),
    };
    let host = match (url.host_str(), url.port()) {
        (Some(host), Some(port)) if !host.is_empty() => format!("{}:{}", host, port),
        (Some(host), None) if !host.is_empty() => host.to_string(),
        _ => DEFAULT_HOST.to_string(),
    };
    ParsedUrl {
        path,
        protocol: url.scheme().to_string(),
        host,
    }
}

/// Build query, path and header parameters for a request, in that order
pub fn parse_parameters(request: &Request) -> Vec<Parameter> {
    let mut parameters = Vec::new();

    let url = request.url.as_ref();

    for query in url.map(RequestUrl::query).unwrap_or_default() {
        parameters.push(example_parameter(query, ParameterLocation::Query));
    }

    for name in path_parameter_names(url) {
        parameters.push(Parameter {
            name,
            in_type: ParameterLocation::Path,
            required: Some(true),
            schema: Schema::string(),
            example: None,
            description: None,
        });
    }

    for header in request
        .header
        .iter()
        .filter(|h| !h.key.eq_ignore_ascii_case("content-type"))
    {
        parameters.push(example_parameter(header, ParameterLocation::Header));
    }

    parameters
}

fn example_parameter(entry: &KeyValue, location: ParameterLocation) -> Parameter {
    Parameter {
        name: entry.key.clone(),
        in_type: location,
        required: None,
        schema: Schema::string(),
        example: entry.value.clone(),
        description: entry.description.clone().filter(|d| !d.is_empty()),
    }
}

// Segments come from the structured path when present, else from the parsed URL path.
fn path_parameter_names(url: Option<&RequestUrl>) -> Vec<String> {
    match url {
        None => Vec::new(),
        Some(url) => match url.path() {
            Some(segments) => colon_names(segments.iter().map(String::as_str)),
            None => colon_names(parse_url(Some(url)).path.split('/')),
        },
    }
}

fn colon_names<'a>(segments: impl Iterator<Item = &'a str>) -> Vec<String> {
    segments
        .filter_map(|s| s.strip_prefix(':'))
        .map(str::to_string)
        .collect()
}

/// Build the request body for a request, if it carries one
pub fn parse_request_body(request: &Request) -> Option<RequestBody> {
    let body = request.body.as_ref()?;
    let content_type = request.content_type().unwrap_or(DEFAULT_CONTENT_TYPE);

    let schema = match (body.mode.as_deref(), &body.raw, &body.formdata) {
        (Some("raw"), Some(raw), _) if !raw.is_empty() => Some(match BodyText::parse(raw) {
            BodyText::Json(value) => Schema::typed("object").with_example(value),
            BodyText::Text(text) => Schema::string().with_example(Value::String(text)),
        }),
        (Some("formdata"), _, Some(fields)) => {
            let mut properties = IndexMap::new();
            for field in fields {
                let schema = Schema {
                    example: field.value.clone().map(Value::String),
                    ..Schema::string()
                };
                properties.insert(field.key.clone(), schema);
            }
            Some(Schema {
                properties: Some(properties),
                ..Schema::typed("object")
            })
        }
        (mode, _, _) => {
            debug!("No schema for body mode {:?}", mode);
            None
        }
    };

    let mut content = IndexMap::new();
    content.insert(content_type.to_string(), MediaType { schema });
    Some(RequestBody {
        required: true,
        content,
    })
}

/// Build the status-keyed responses for an item from its saved examples
pub fn parse_responses(item: &Item) -> BTreeMap<String, Response> {
    let mut responses = BTreeMap::new();
    responses.insert(
        DEFAULT_STATUS.to_string(),
        Response {
            description: "Successful response".to_string(),
            content: None,
        },
    );

    for sample in &item.response {
        let status = sample
            .code
            .clone()
            .unwrap_or_else(|| DEFAULT_STATUS.to_string());
        let content_type = sample.content_type().unwrap_or(DEFAULT_CONTENT_TYPE);

        let example = sample
            .body
            .as_deref()
            .filter(|b| !b.is_empty())
            .map(|b| BodyText::parse(b).into_value())
            .filter(is_truthy);

        let content = example.map(|example| {
            let type_ = match example {
                Value::Object(_) | Value::Array(_) => "object",
                _ => "string",
            };
            let mut content = IndexMap::new();
            content.insert(
                content_type.to_string(),
                MediaType {
                    schema: Some(Schema::typed(type_).with_example(example)),
                },
            );
            content
        });

        let description = sample
            .name
            .clone()
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| format!("{} response", status));

        responses.insert(status, Response { description, content });
    }

    responses
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
