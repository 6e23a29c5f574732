pub mod collection;
pub mod emitter;
pub mod generator;
pub mod models;
pub mod parser;

use log::debug;
use serde_json::Value;
use thiserror::Error;

use crate::collection::Collection;
pub use crate::generator::{Generator, OutputFormat};
use crate::models::OpenAPI;

#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("{0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Collection must be a JSON object")]
    NotAnObject,

    #[error("Failed to serialize OpenAPI document: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Parse collection JSON and build the OpenAPI document for it
pub fn convert_to_openapi(input: &str) -> Result<OpenAPI, ConversionError> {
    let value: Value = serde_json::from_str(input)?;
    if !value.is_object() {
        return Err(ConversionError::NotAnObject);
    }

    let collection: Collection = serde_json::from_value(value)?;
    debug!("Parsed collection with {} top-level items", collection.item.len());

    Ok(Generator::build(&collection))
}

/// Convert collection JSON into OpenAPI text in the requested format
pub fn convert(input: &str, format: OutputFormat) -> Result<String, ConversionError> {
    let openapi = convert_to_openapi(input)?;
    format.render(&openapi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const PET_STORE: &str = r#"{
        "info": { "name": "Pet Store", "description": "Sample collection" },
        "item": [
            {
                "name": "Pets",
                "description": "Everything about pets",
                "item": [
                    {
                        "name": "Get Pet",
                        "request": {
                            "method": "GET",
                            "url": {
                                "raw": "https://api.example.com/pets/:petId?verbose=true",
                                "path": ["pets", ":petId"],
                                "query": [{ "key": "verbose", "value": "true", "description": "More fields" }]
                            },
                            "header": [{ "key": "Accept", "value": "application/json" }]
                        },
                        "response": [
                            { "name": "OK", "code": 200, "body": "{\"id\": 1, \"name\": \"Rex\"}" },
                            { "name": "Missing", "code": 404, "header": [{ "key": "Content-Type", "value": "text/plain" }], "body": "no pet" }
                        ]
                    },
                    {
                        "name": "Create Pet",
                        "request": {
                            "method": "POST",
                            "url": "https://api.example.com/pets",
                            "description": "Adds a pet",
                            "header": [{ "key": "Content-Type", "value": "application/json" }],
                            "body": { "mode": "raw", "raw": "{\"name\": \"Rex\"}" }
                        }
                    }
                ]
            }
        ]
    }"#;

    #[test]
    fn test_convert_to_json() {
        let output = convert(PET_STORE, OutputFormat::Json).unwrap();
        let value: Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["openapi"], "3.0.3");
        assert_eq!(value["info"]["title"], "Pet Store");
        assert_eq!(
            value["tags"],
            json!([{ "name": "Pets", "description": "Everything about pets" }])
        );

        let get = &value["paths"]["/pets/:petId"]["get"];
        assert_eq!(get["operationId"], "getpetspetId");
        assert_eq!(get["tags"], json!(["Pets"]));
        assert_eq!(
            get["parameters"],
            json!([
                { "name": "verbose", "in": "query", "schema": { "type": "string" }, "example": "true", "description": "More fields" },
                { "name": "petId", "in": "path", "required": true, "schema": { "type": "string" } },
                { "name": "Accept", "in": "header", "schema": { "type": "string" }, "example": "application/json" }
            ])
        );
        assert_eq!(
            get["responses"],
            json!({
                "200": {
                    "description": "OK",
                    "content": { "application/json": { "schema": { "type": "object", "example": { "id": 1, "name": "Rex" } } } }
                },
                "404": {
                    "description": "Missing",
                    "content": { "text/plain": { "schema": { "type": "string", "example": "no pet" } } }
                }
            })
        );
        assert!(get.get("requestBody").is_none());

        let post = &value["paths"]["/pets"]["post"];
        assert_eq!(post["description"], "Adds a pet");
        assert_eq!(post["parameters"], json!([]));
        assert_eq!(
            post["requestBody"],
            json!({
                "required": true,
                "content": { "application/json": { "schema": { "type": "object", "example": { "name": "Rex" } } } }
            })
        );
    }

    #[test]
    fn test_convert_to_yaml() {
        let output = convert(PET_STORE, OutputFormat::Yaml).unwrap();

        assert!(output.starts_with("openapi: 3.0.3\ninfo:\n  title: Pet Store\n"));
        assert!(output.contains("servers:\n  - url: \"https://postman-echo.com\"\n"));
        assert!(output.contains("paths:\n  /pets/:petId:\n    get:\n      tags:\n        - Pets\n"));
        assert!(output.contains("        - name: petId\n          in: path\n          required: true\n"));
        assert!(output.contains(
            "components:\n  schemas: {}\n  securitySchemes:\n    basicAuth:\n      type: http\n      scheme: basic\n"
        ));
        assert!(output.ends_with("tags:\n  - name: Pets\n    description: Everything about pets\n"));
    }

    #[test]
    fn test_empty_collections() {
        for input in ["{}", r#"{"item": []}"#] {
            let openapi = convert_to_openapi(input).unwrap();
            assert!(openapi.paths.is_empty());
            assert!(openapi.tags.is_empty());
            assert_eq!(openapi.info.title, "Converted API");
        }

        let output = convert("{}", OutputFormat::Yaml).unwrap();
        assert!(output.contains("paths: {}\n"));
        assert!(output.ends_with("tags: []\n"));
    }

    #[test]
    fn test_invalid_json_reports_parser_message() {
        let err = convert("{ not json", OutputFormat::Json).unwrap_err();
        assert!(matches!(err, ConversionError::InvalidJson(_)));
        let expected = serde_json::from_str::<Value>("{ not json").unwrap_err().to_string();
        assert_eq!(err.to_string(), expected);
    }

    #[test]
    fn test_non_object_input_is_rejected() {
        for input in ["[]", "null", "42", "\"text\""] {
            let err = convert(input, OutputFormat::Yaml).unwrap_err();
            assert!(matches!(err, ConversionError::NotAnObject), "input {}", input);
        }
    }

    #[test]
    fn test_conversion_is_deterministic() {
        for format in [OutputFormat::Yaml, OutputFormat::Json] {
            let first = convert(PET_STORE, format).unwrap();
            let second = convert(PET_STORE, format).unwrap();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_xml_body_keeps_content_type() {
        let input = r#"{
            "item": [{
                "name": "Upload",
                "request": {
                    "method": "PUT",
                    "url": "https://x.com/docs",
                    "header": [{ "key": "Content-Type", "value": "application/xml" }],
                    "body": { "mode": "raw", "raw": "<a/>" }
                }
            }]
        }"#;
        let openapi = convert_to_openapi(input).unwrap();
        let body = openapi.paths["/docs"]["put"].requestBody.clone().unwrap();
        assert_eq!(
            serde_json::to_value(&body.content).unwrap(),
            json!({ "application/xml": { "schema": { "type": "string", "example": "<a/>" } } })
        );
    }

    #[test]
    fn test_multiline_description_is_literal_block() {
        let input = r#"{
            "item": [{
                "name": "Notes",
                "request": { "url": "https://x.com/notes", "description": "Line one\nLine two: more" }
            }]
        }"#;
        let output = convert(input, OutputFormat::Yaml).unwrap();
        assert!(output.contains("      description: |\n        Line one\n        Line two: more\n"));
        assert!(!output.contains("description: \"Line one"));
    }

    #[test]
    fn test_valueless_entries_emit_no_example() {
        let input = r#"{
            "item": [{
                "name": "Upload",
                "request": {
                    "method": "POST",
                    "url": { "raw": "https://x.com/upload?flag", "query": [{ "key": "flag", "value": null }] },
                    "header": [{ "key": "X-No-Value" }],
                    "body": { "mode": "formdata", "formdata": [{ "key": "file", "type": "file", "src": "/tmp/x" }] }
                }
            }]
        }"#;
        let output = convert(input, OutputFormat::Yaml).unwrap();
        assert!(output.contains("        - name: flag\n          in: query\n          schema:\n            type: string\n        - name: X-No-Value\n"));
        assert!(output.contains("                file:\n                  type: string\n"));
        assert!(!output.contains("example: \n"));
    }
}
