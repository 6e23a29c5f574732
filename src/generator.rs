use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

use crate::collection::{Collection, Item, ItemKind, Request};
use crate::emitter;
use crate::models::{OpenAPI, Operation};
use crate::parser::{parse_parameters, parse_request_body, parse_responses, parse_url};
use crate::ConversionError;

static NON_WORD_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9_]+").unwrap());

const DEFAULT_METHOD: &str = "get";
const BODYLESS_METHODS: &[&str] = &["get", "head", "delete"];

/// Serialization used for the converted document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Indentation-based block text
    #[default]
    Yaml,
    /// Pretty-printed JSON with two-space indentation
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "yaml" | "yml" | "text-block" => Ok(OutputFormat::Yaml),
            "json" | "structured-pretty" => Ok(OutputFormat::Json),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Yaml => write!(f, "yaml"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl OutputFormat {
    /// Serialize a finished document
    pub fn render(&self, openapi: &OpenAPI) -> Result<String, ConversionError> {
        match self {
            OutputFormat::Yaml => {
                let value = serde_json::to_value(openapi).map_err(ConversionError::Serialize)?;
                Ok(emitter::emit(&value))
            }
            OutputFormat::Json => {
                serde_json::to_string_pretty(openapi).map_err(ConversionError::Serialize)
            }
        }
    }
}

/// Walks a collection tree and builds an OpenAPI document from it
pub struct Generator {
    openapi: OpenAPI,
}

impl Generator {
    /// Create a generator seeded with the collection's title and description
    pub fn new(collection: &Collection) -> Self {
        let info = collection.info.as_ref();
        Self {
            openapi: OpenAPI::new(
                info.and_then(|i| i.name.as_deref()),
                info.and_then(|i| i.description.as_deref()),
            ),
        }
    }

    /// Convert a whole collection
    pub fn build(collection: &Collection) -> OpenAPI {
        let mut generator = Self::new(collection);
        generator.process_items(&collection.item, None);
        generator.finish()
    }

    pub fn finish(self) -> OpenAPI {
        self.openapi
    }

    /// Process a sequence of sibling items. `tag` is the name of the
    /// immediately enclosing folder, if any.
    pub fn process_items(&mut self, items: &[Item], tag: Option<&str>) {
        for item in items {
            self.process_item(item, tag);
        }
    }

    fn process_item(&mut self, item: &Item, tag: Option<&str>) {
        match item.kind() {
            ItemKind::Leaf(request) => self.add_operation(item, request, tag),
            ItemKind::Folder(children) => self.process_folder(item, children),
            ItemKind::Both(request, children) => {
                self.add_operation(item, request, tag);
                self.process_folder(item, children);
            }
            ItemKind::Empty => {
                debug!("Skipping item without request or children: {:?}", item.name);
            }
        }
    }

    fn add_operation(&mut self, item: &Item, request: &Request, tag: Option<&str>) {
        let (path, method, operation) = build_operation(item, request, tag);
        debug!("Adding operation {} {}", method, path);

        self.openapi
            .paths
            .entry(path)
            .or_default()
            .insert(method, operation);
    }

    // Only the folder's own name is carried down, not its ancestors.
    fn process_folder(&mut self, item: &Item, children: &[Item]) {
        if let Some(name) = item.name.as_deref() {
            let description = item.description.as_deref().unwrap_or_default();
            if self.openapi.add_tag(name, description) {
                debug!("Registered tag {:?}", name);
            }
        }

        let tag = item.name.as_deref().filter(|n| !n.is_empty());
        self.process_items(children, tag);
    }
}

/// Build the operation for one request item, returning its path and method
pub fn build_operation(
    item: &Item,
    request: &Request,
    tag: Option<&str>,
) -> (String, String, Operation) {
    let path = parse_url(request.url.as_ref()).path;
    let method = request
        .method
        .as_deref()
        .filter(|m| !m.is_empty())
        .map(str::to_lowercase)
        .unwrap_or_else(|| DEFAULT_METHOD.to_string());

    let request_body = if BODYLESS_METHODS.contains(&method.as_str()) {
        None
    } else {
        parse_request_body(request)
    };

    let operation = Operation {
        tags: tag.map(|t| vec![t.to_string()]),
        summary: item.name.clone().unwrap_or_default(),
        description: request.description.clone().unwrap_or_default(),
        operationId: operation_id(&method, &path),
        parameters: parse_parameters(request),
        responses: parse_responses(item),
        requestBody: request_body,
    };

    (path, method, operation)
}

/// Method followed by the path with every non-word character removed
pub fn operation_id(method: &str, path: &str) -> String {
    format!("{}{}", method, NON_WORD_REGEX.replace_all(path, ""))
}
