use std::cell::Cell;
use std::fs;
use std::path::{Path, PathBuf};

use hcl_schema_core::{Diagnostic, DiagnosticsExt, Document, Severity, compile_schema};
use hcl_schema_resolve::{
    CacheConfig, FetchResponse, Fetcher, RemoteSchemaCache, ResolveError, SchemaReference,
    SchemaValidator, resolve_reference, validate_with_schema,
};

/// In-process stand-in for the network: serves one body for every URL and
/// counts requests.
struct CountingFetcher {
    status: u16,
    body: String,
    requests: Cell<usize>,
}

impl CountingFetcher {
    fn serving(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
            requests: Cell::new(0),
        }
    }
}

impl Fetcher for CountingFetcher {
    fn get(&self, _url: &str) -> hcl_schema_resolve::Result<FetchResponse> {
        self.requests.set(self.requests.get() + 1);
        Ok(FetchResponse::from_bytes(self.status, self.body.clone()))
    }
}

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn fixture(name: &str) -> String {
    fs::read_to_string(fixture_path(name)).expect("fixture file must be readable")
}

fn validator(cache_dir: &Path, fetcher: CountingFetcher) -> SchemaValidator<CountingFetcher> {
    let config = CacheConfig::default().with_cache_dir(cache_dir);
    SchemaValidator::new(RemoteSchemaCache::new(fetcher, &config))
}

/// Validates a fixture through its `__schema` link with no network access.
fn validate_linked_fixture(name: &str) -> Vec<Diagnostic> {
    let cache = tempfile::tempdir().unwrap();
    let validator = validator(cache.path(), CountingFetcher::serving(""));
    let diags = validator.validate_linked(fixture_path(name));
    assert_eq!(validator.cache().fetcher().requests.get(), 0);
    diags
}

fn summaries(diags: &[Diagnostic]) -> Vec<&str> {
    diags.iter().map(|d| d.summary.as_str()).collect()
}

// ---------------------------------------------------------------------------
// Schema compilation
// ---------------------------------------------------------------------------

#[test]
fn test_compile_simple_schema() {
    let doc = Document::from_file(fixture_path("simple.schema.hcl")).unwrap();
    let (tree, diags) = compile_schema(&doc);
    assert!(!diags.has_errors(), "unexpected diagnostics: {diags:?}");
    let tree = tree.expect("schema should compile");

    assert_eq!(tree.id(), Some("simple"));
    assert!(tree.root().find_attribute("myattr").unwrap().required);

    let tag = tree.root().find_block("tag", 1).expect("tag rule");
    assert_eq!(tag.label_names, vec!["name".to_string()]);
    let nested = tag.nested.as_ref().expect("tag has a nested body");
    assert!(!nested.find_attribute("value").unwrap().required);
}

#[test]
fn test_compile_nested_schema() {
    let doc = Document::from_file(fixture_path("nested.schema.hcl")).unwrap();
    let (tree, diags) = compile_schema(&doc);
    assert!(diags.is_empty());
    let tree = tree.unwrap();

    assert!(tree.root().find_attribute("a").is_some());
    let outer = tree.root().find_block("outer", 0).expect("outer rule");
    let outer_body = outer.nested.as_ref().expect("outer body");
    let inner = outer_body.find_block("inner", 1).expect("inner rule");
    assert_eq!(inner.label_names, vec!["i".to_string()]);
}

#[test]
fn test_compile_duplicate_block_types_on_different_levels() {
    let doc = Document::from_file(fixture_path("duplicate_levels.schema.hcl")).unwrap();
    let (tree, diags) = compile_schema(&doc);
    assert!(!diags.has_errors(), "unexpected diagnostics: {diags:?}");
    assert!(tree.is_some());
}

#[test]
fn test_compile_duplicate_block_types_on_same_level() {
    let doc = Document::from_file(fixture_path("duplicate_same_level.schema.hcl")).unwrap();
    let (tree, diags) = compile_schema(&doc);
    assert!(!diags.has_errors(), "unexpected diagnostics: {diags:?}");

    let tree = tree.unwrap();
    assert_eq!(tree.root().blocks.len(), 2);
    assert!(tree.root().find_block("rule", 1).is_some());
    assert!(tree.root().find_block("rule", 2).is_some());
}

#[test]
fn test_compile_hoists_grouping_bodies() {
    let doc = Document::from_file(fixture_path("grouped.schema.hcl")).unwrap();
    let (tree, diags) = compile_schema(&doc);
    assert!(diags.is_empty());

    let tree = tree.unwrap();
    assert!(tree.root().find_attribute("name").unwrap().required);
    let listener = tree.root().find_block("listener", 1).unwrap();
    assert!(listener.nested.is_none());
}

// ---------------------------------------------------------------------------
// Explicit schema validation
// ---------------------------------------------------------------------------

#[test]
fn test_validate_simple_with_explicit_schema() {
    let diags = validate_with_schema(fixture_path("simple.schema.hcl"), fixture_path("simple.hcl"));
    assert!(diags.is_empty(), "unexpected diagnostics: {diags:?}");
}

#[test]
fn test_validate_nested_with_explicit_schema() {
    let diags = validate_with_schema(fixture_path("nested.schema.hcl"), fixture_path("nested.hcl"));
    assert!(diags.is_empty(), "unexpected diagnostics: {diags:?}");
}

#[test]
fn test_explicit_validation_permits_link_attribute() {
    let diags = validate_with_schema(
        fixture_path("simple.schema.hcl"),
        fixture_path("simple_linked.hcl"),
    );
    assert!(diags.is_empty(), "unexpected diagnostics: {diags:?}");
}

#[test]
fn test_validation_is_repeatable() {
    let schema = fixture_path("simple.schema.hcl");
    let doc = fixture_path("label_count_mismatch.hcl");

    let first = validate_with_schema(&schema, &doc);
    let second = validate_with_schema(&schema, &doc);
    assert!(!first.is_empty());
    assert_eq!(first, second);
}

// ---------------------------------------------------------------------------
// Linked validation
// ---------------------------------------------------------------------------

#[test]
fn test_linked_simple() {
    let diags = validate_linked_fixture("simple_linked.hcl");
    assert!(diags.is_empty(), "unexpected diagnostics: {diags:?}");
}

#[test]
fn test_linked_nested() {
    let diags = validate_linked_fixture("nested_linked.hcl");
    assert!(diags.is_empty(), "unexpected diagnostics: {diags:?}");
}

#[test]
fn test_linked_nested_with_excess_attribute() {
    let diags = validate_linked_fixture("nested_linked_with_excess_attr.hcl");
    assert_eq!(summaries(&diags), vec!["Unsupported argument"]);

    let subject = diags[0].subject.as_ref().unwrap();
    assert!(subject.filename.ends_with("nested_linked_with_excess_attr.hcl"));
    assert_eq!(subject.start.line, 8);
}

#[test]
fn test_linked_duplicate_attribute_in_instance() {
    let diags = validate_linked_fixture("duplicate_attr.hcl");
    assert_eq!(summaries(&diags), vec!["Invalid HCL syntax"]);
    assert!(
        diags[0]
            .detail
            .as_deref()
            .unwrap()
            .contains("redefined attribute")
    );
    assert_eq!(diags[0].subject.as_ref().unwrap().start.line, 4);
}

#[test]
fn test_linked_label_count_mismatch() {
    let diags = validate_linked_fixture("label_count_mismatch.hcl");
    assert_eq!(summaries(&diags), vec!["Missing name for tag"]);
    assert_eq!(diags[0].severity, Severity::Error);
}

#[test]
fn test_linked_missing_required_attribute() {
    let diags = validate_linked_fixture("missing_required_attr.hcl");
    assert_eq!(summaries(&diags), vec!["Missing required argument"]);
    assert_eq!(diags[0].severity, Severity::Error);
}

#[test]
fn test_linked_multiple_block_instances_allowed() {
    let diags = validate_linked_fixture("multiple_tags.hcl");
    assert!(diags.is_empty(), "unexpected diagnostics: {diags:?}");
}

#[test]
fn test_linked_same_type_on_different_levels() {
    let diags = validate_linked_fixture("duplicate_levels.hcl");
    assert!(diags.is_empty(), "unexpected diagnostics: {diags:?}");
}

#[test]
fn test_linked_same_type_with_different_arities() {
    let diags = validate_linked_fixture("duplicate_same_level.hcl");
    assert!(diags.is_empty(), "unexpected diagnostics: {diags:?}");
}

#[test]
fn test_linked_invalid_schema_reports_compile_errors() {
    let diags = validate_linked_fixture("invalid_linked.hcl");
    assert!(diags.has_errors());
    assert!(summaries(&diags).contains(&"Missing required argument"));
    let subject = diags[0].subject.as_ref().unwrap();
    assert!(subject.filename.ends_with("invalid.schema.hcl"));
}

#[test]
fn test_linked_missing_schema_file() {
    let diags = validate_linked_fixture("missing_schema_linked.hcl");
    assert_eq!(summaries(&diags), vec!["Failed to read file"]);
    assert!(
        diags[0]
            .detail
            .as_ref()
            .unwrap()
            .contains("does_not_exist.schema.hcl")
    );
}

#[test]
fn test_linked_unparsable_document() {
    let dir = tempfile::tempdir().unwrap();
    let doc = dir.path().join("broken.hcl");
    fs::write(&doc, "__schema = \"simple.schema.hcl\"\nblock {\n").unwrap();

    let validator = validator(&dir.path().join("cache"), CountingFetcher::serving(""));
    let diags = validator.validate_linked(&doc);
    assert_eq!(summaries(&diags), vec!["Invalid HCL syntax"]);
}

// ---------------------------------------------------------------------------
// Remote schemas
// ---------------------------------------------------------------------------

const REMOTE_URL: &str = "https://schemas.example.com/simple.schema.hcl";

fn write_remote_linked(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("remote.hcl");
    fs::write(&path, format!("__schema = \"{REMOTE_URL}\"\n\n{body}")).unwrap();
    path
}

#[test]
fn test_remote_linked_validation_uses_cache() {
    let dir = tempfile::tempdir().unwrap();
    let doc = write_remote_linked(dir.path(), "myattr = \"x\"\ntag \"a\" {\n  value = \"y\"\n}\n");
    let validator = validator(
        &dir.path().join("cache"),
        CountingFetcher::serving(fixture("simple.schema.hcl")),
    );

    for _ in 0..3 {
        let diags = validator.validate_linked(&doc);
        assert!(diags.is_empty(), "unexpected diagnostics: {diags:?}");
    }
    assert_eq!(validator.cache().fetcher().requests.get(), 1);

    let cached = validator.cache().entry_path(REMOTE_URL);
    assert_eq!(fs::read_to_string(cached).unwrap(), fixture("simple.schema.hcl"));
}

#[test]
fn test_remote_linked_validation_reports_document_errors() {
    let dir = tempfile::tempdir().unwrap();
    let doc = write_remote_linked(dir.path(), "tag {\n  value = \"y\"\n}\n");
    let validator = validator(
        &dir.path().join("cache"),
        CountingFetcher::serving(fixture("simple.schema.hcl")),
    );

    let diags = validator.validate_linked(&doc);
    assert_eq!(
        summaries(&diags),
        vec!["Missing name for tag", "Missing required argument"]
    );
}

#[test]
fn test_remote_non_200_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let doc = write_remote_linked(dir.path(), "");
    let fetcher = CountingFetcher {
        status: 500,
        body: String::new(),
        requests: Cell::new(0),
    };
    let validator = validator(&dir.path().join("cache"), fetcher);

    let diags = validator.validate_linked(&doc);
    assert_eq!(summaries(&diags), vec!["failed to download schema"]);
    assert_eq!(diags[0].detail.as_deref(), Some("500"));
    assert!(!validator.cache().entry_path(REMOTE_URL).exists());
}

#[test]
fn test_remote_oversized_schema_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let doc = write_remote_linked(dir.path(), "");
    let config = CacheConfig {
        max_size_bytes: 16,
        ..CacheConfig::default().with_cache_dir(dir.path().join("cache"))
    };
    let cache = RemoteSchemaCache::new(
        CountingFetcher::serving(fixture("simple.schema.hcl")),
        &config,
    );
    let validator = SchemaValidator::new(cache);

    let diags = validator.validate_linked(&doc);
    assert_eq!(summaries(&diags), vec!["schema too large"]);
    assert!(!validator.cache().entry_path(REMOTE_URL).exists());
}

#[test]
fn test_insecure_reference_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let cache = RemoteSchemaCache::new(
        CountingFetcher::serving(""),
        &CacheConfig::default().with_cache_dir(dir.path()),
    );
    let reference = SchemaReference::parse("http://example.com/s.schema.hcl");

    let err = resolve_reference(&reference, Path::new("doc.hcl"), &cache).unwrap_err();
    assert!(matches!(err, ResolveError::InsecureUrl(_)));
    assert_eq!(cache.fetcher().requests.get(), 0);

    let diag = err.to_diagnostic();
    assert_eq!(diag.severity, Severity::Error);
    assert_eq!(diag.summary, "insecure schema URL");
}

#[test]
fn test_insecure_link_in_document() {
    let dir = tempfile::tempdir().unwrap();
    let doc = dir.path().join("insecure.hcl");
    fs::write(&doc, "__schema = \"http://example.com/s.schema.hcl\"\n").unwrap();
    let validator = validator(&dir.path().join("cache"), CountingFetcher::serving(""));

    let diags = validator.validate_linked(&doc);
    assert_eq!(summaries(&diags), vec!["insecure schema URL"]);
    assert_eq!(validator.cache().fetcher().requests.get(), 0);
}

#[test]
fn test_cache_dir_is_created_on_demand() {
    let dir = tempfile::tempdir().unwrap();
    let cache_dir = dir.path().join("nested").join("cache");
    let cache = RemoteSchemaCache::new(
        CountingFetcher::serving("__schema = \"x\"\n"),
        &CacheConfig::default().with_cache_dir(&cache_dir),
    );

    let path = cache.fetch(REMOTE_URL).unwrap();
    assert!(path.starts_with(&cache_dir));
    assert!(path.to_string_lossy().ends_with(".schema.hcl"));
}
