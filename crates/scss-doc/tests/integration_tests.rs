/*
 * integration_tests.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Integration tests for scss-doc using test fixtures.
 */

use pretty_assertions::assert_eq;
use scss_doc::{
    DocumentationEntity, DocumentationParameter, FileParserOptions, ParseOptions, SassFileParser,
    SassParser,
};
use std::path::{Path, PathBuf};

/// Helper to get the path to test fixtures
fn fixture_path(name: &str) -> PathBuf {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    Path::new(manifest_dir).join("test-fixtures").join(name)
}

fn parse_fixture(name: &str) -> Vec<DocumentationEntity> {
    let content = std::fs::read_to_string(fixture_path(name))
        .unwrap_or_else(|_| panic!("Failed to load fixture: {}", name));
    SassParser::new()
        .parse(&content, &ParseOptions::default())
        .unwrap()
}

fn names(entities: &[DocumentationEntity]) -> Vec<&str> {
    entities.iter().map(DocumentationEntity::name).collect()
}

#[test]
fn test_theme_entities_in_source_order() {
    let docs = parse_fixture("_theme.scss");
    assert_eq!(
        names(&docs),
        [
            "$spacer",
            "$primary",
            ".visually-hidden",
            ".sr-only",
            "space",
            "truncate",
            "$print-margin",
        ]
    );
    assert!(docs.iter().all(|d| d.content_type() == "stylesheet-source"));
    assert!(docs.iter().all(|d| d.content_kind() == "css"));
}

#[test]
fn test_theme_variable_metadata() {
    let docs = parse_fixture("_theme.scss");
    let spacer = docs[0].as_variable().unwrap();
    assert_eq!(spacer.types, ["Number"]);
    assert_eq!(spacer.value.as_deref(), Some("1rem !default"));
    assert_eq!(spacer.doc.description, "Base spacing unit.");
    assert_eq!(spacer.doc.group.as_deref(), Some("spacing"));
}

#[test]
fn test_theme_classes_share_comment() {
    let docs = parse_fixture("_theme.scss");
    assert_eq!(docs[2].doc(), docs[3].doc());
    assert_eq!(docs[2].doc().group.as_deref(), Some("utilities"));
}

#[test]
fn test_theme_function_and_mixin() {
    let docs = parse_fixture("_theme.scss");

    let space = docs[4].as_callable().unwrap();
    assert_eq!(
        space.parameters,
        vec![DocumentationParameter {
            name: "$factor".to_string(),
            types: vec!["Number".to_string()],
            description: "Multiplier".to_string(),
            default_value: Some("1".to_string()),
            variadic: false,
        }]
    );
    let returns = space.returns.as_ref().unwrap();
    assert_eq!(returns.types, ["Number"]);
    assert_eq!(returns.description, "The scaled length");

    let truncate = docs[5].as_callable().unwrap();
    assert!(truncate.parameters.is_empty());
    assert_eq!(
        truncate.doc.examples,
        [".title {\n  @include truncate;\n}"]
    );
}

#[test]
fn test_mixin_parameters_follow_signature() {
    let docs = parse_fixture("sass/_buttons.scss");
    assert_eq!(names(&docs), ["$btn-padding", ".btn", "button-variant"]);

    let mixin = docs[2].as_callable().unwrap();
    let parameters: Vec<(&str, Option<&str>)> = mixin
        .parameters
        .iter()
        .map(|p| (p.name.as_str(), p.default_value.as_deref()))
        .collect();
    assert_eq!(
        parameters,
        [
            ("$background", None),
            ("$border", Some("$background")),
            ("$hover-background", Some("darken($background, 7.5%)")),
        ]
    );
    assert_eq!(mixin.parameters[1].description, "Defaults to the background");
}

#[test]
fn test_broken_file_yields_nothing() {
    assert!(parse_fixture("broken.scss").is_empty());

    let content = std::fs::read_to_string(fixture_path("broken.scss")).unwrap();
    let err = SassParser::new().analyze(&content).unwrap_err();
    assert!(err.to_string().contains("unclosed block"));
}

#[test]
fn test_scan_fixture_directory() {
    let parsed = SassFileParser::default()
        .parse_directory(&fixture_path(""))
        .unwrap();

    let summary: Vec<(PathBuf, usize)> = parsed
        .iter()
        .map(|f| (f.path.clone(), f.documentation.len()))
        .collect();
    assert_eq!(
        summary,
        [
            (PathBuf::from("_theme.scss"), 7),
            (PathBuf::from("broken.scss"), 0),
            (PathBuf::from("sass/_buttons.scss"), 3),
        ]
    );
}

#[test]
fn test_scan_with_custom_glob() {
    let parser = SassFileParser::new(FileParserOptions {
        globs: vec!["sass/_*.scss".to_string()],
        content_kind: "theme".to_string(),
        ..Default::default()
    });
    let parsed = parser.parse_directory(&fixture_path("")).unwrap();
    assert_eq!(parsed.len(), 1);
    assert_eq!(parsed[0].path, PathBuf::from("sass/_buttons.scss"));
    assert!(
        parsed[0]
            .documentation
            .iter()
            .all(|d| d.content_kind() == "theme")
    );
}

#[test]
fn test_parsed_file_json() {
    let parser = SassFileParser::default();
    let mut file = parser
        .parse_file(&fixture_path("sass/_buttons.scss"))
        .unwrap();
    file.path = PathBuf::from("sass/_buttons.scss");
    file.documentation.truncate(2);

    let json = serde_json::to_string_pretty(&file).unwrap();
    insta::assert_snapshot!(json, @r#"
    {
      "path": "sass/_buttons.scss",
      "contentType": "stylesheet-source",
      "contentKind": "css",
      "documentation": [
        {
          "kind": "variable",
          "name": "$btn-padding",
          "types": [
            "List"
          ],
          "value": "0.375rem 0.75rem !default",
          "description": "Button padding, vertical then horizontal.",
          "contentType": "stylesheet-source",
          "contentKind": "css"
        },
        {
          "kind": "class",
          "name": ".btn",
          "description": "Base button.",
          "contentType": "stylesheet-source",
          "contentKind": "css"
        }
      ]
    }
    "#);
}
