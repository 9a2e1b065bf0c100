use camino::Utf8PathBuf;
use serde_json::json;
use std::fs;
use tempfile::TempDir;
use vex2doc::vex::{Product, VexParser, VexSource};
use vex2doc::Vex2DocError;

const CYCLONEDX_VEX: &str = r#"{
  "bomFormat": "CycloneDX",
  "specVersion": "1.5",
  "serialNumber": "urn:uuid:3e671687-395b-41f5-a30f-a58921a69b79",
  "version": 1,
  "metadata": {
    "timestamp": "2024-05-01T10:00:00Z",
    "authors": [{"name": "Security Team"}],
    "component": {"type": "application", "name": "acme-app", "version": "2.1.0", "bom-ref": "acme-app@2.1.0"}
  },
  "components": [
    {"type": "library", "name": "libfoo", "version": "1.0.0", "purl": "pkg:generic/libfoo@1.0.0"}
  ],
  "vulnerabilities": [
    {
      "id": "CVE-2023-1234",
      "source": {"name": "NVD", "url": "https://nvd.nist.gov/vuln/detail/CVE-2023-1234"},
      "analysis": {
        "state": "not_affected",
        "justification": "code_not_reachable",
        "detail": "Driver not built"
      },
      "affects": [{"ref": "acme-app@2.1.0"}]
    },
    {
      "id": "CVE-2023-5678",
      "analysis": {"state": "exploitable", "response": ["update", "workaround_available"]}
    }
  ]
}"#;

const CSAF_VEX: &str = r#"{
  "document": {
    "category": "csaf_vex",
    "csaf_version": "2.0",
    "title": "ACME VEX",
    "publisher": {"category": "vendor", "name": "ACME", "namespace": "https://acme.example"},
    "tracking": {
      "id": "ACME-2024-001",
      "version": "1",
      "status": "final",
      "initial_release_date": "2024-01-01T00:00:00Z",
      "current_release_date": "2024-02-01T00:00:00Z"
    }
  },
  "product_tree": {
    "branches": [{
      "category": "vendor",
      "name": "ACME",
      "branches": [{
        "category": "product_name",
        "name": "Widget",
        "branches": [{
          "category": "product_version",
          "name": "3.2",
          "product": {"name": "ACME Widget 3.2", "product_id": "WIDGET-3.2"}
        }]
      }]
    }]
  },
  "vulnerabilities": [{
    "cve": "CVE-2024-0001",
    "product_status": {"known_not_affected": ["WIDGET-3.2"], "fixed": ["WIDGET-3.3"]},
    "flags": [{"label": "vulnerable_code_not_present", "product_ids": ["WIDGET-3.2"]}],
    "threats": [{"category": "impact", "details": "Feature removed", "product_ids": ["WIDGET-3.2"]}]
  }]
}"#;

const OPENVEX: &str = r#"{
  "@context": "https://openvex.dev/ns/v0.2.0",
  "@id": "https://openvex.dev/docs/example/vex-9fb3463de1b5",
  "author": "Wolfi J Inkinson",
  "role": "Document Creator",
  "timestamp": "2023-01-08T18:02:03.647787998-06:00",
  "version": 1,
  "statements": [
    {
      "vulnerability": {"name": "CVE-2023-2222"},
      "products": [{"@id": "pkg:apk/wolfi/git@2.39.0-r1?arch=x86_64"}],
      "status": "fixed"
    },
    {
      "vulnerability": "CVE-2023-3333",
      "products": ["pkg:apk/wolfi/git@2.39.0-r1?arch=armv7"],
      "status": "not_affected",
      "justification": "inline_mitigations_already_exist",
      "impact_statement": "Mitigated by hardening flags"
    }
  ]
}"#;

fn write_fixture(dir: &TempDir, name: &str, content: &str) -> Utf8PathBuf {
    let path = Utf8PathBuf::from_path_buf(dir.path().join(name)).expect("Invalid UTF-8 in path");
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_cyclonedx_extraction() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_fixture(&temp_dir, "cdx.json", CYCLONEDX_VEX);

    let mut parser = VexParser::new();
    parser.parse(&path).unwrap();

    assert_eq!(parser.vex_type(), "cyclonedx");

    let metadata = parser.metadata();
    let keys: Vec<_> = metadata.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["version", "id", "revision", "created", "author"]);
    assert_eq!(metadata["author"], json!("Security Team"));

    // Described component first, then listed components
    match parser.product() {
        Product::Multiple(products) => {
            assert_eq!(products.len(), 2);
            assert_eq!(products[0]["name"], json!("acme-app"));
            assert_eq!(products[1]["purl"], json!("pkg:generic/libfoo@1.0.0"));
        }
        other => panic!("expected multiple products, got {:?}", other),
    }

    let vulns = parser.vulnerabilities();
    assert_eq!(vulns.len(), 2);
    assert_eq!(vulns[0]["status"], json!("not_affected"));
    assert_eq!(vulns[0]["justification"], json!("code_not_reachable"));
    assert_eq!(vulns[0]["affects"], json!("acme-app@2.1.0"));
    assert_eq!(vulns[1]["response"], json!("update, workaround_available"));
    assert!(!vulns[1].contains_key("source"));
}

#[test]
fn test_csaf_extraction() {
    let mut parser = VexParser::new();
    parser.parse_str(CSAF_VEX).unwrap();

    assert_eq!(parser.vex_type(), "csaf");

    let metadata = parser.metadata();
    assert_eq!(metadata["title"], json!("ACME VEX"));
    assert_eq!(metadata["id"], json!("ACME-2024-001"));
    assert_eq!(metadata["author"], json!("ACME"));

    let product = parser.product().into_primary();
    assert_eq!(product["vendor"], json!("ACME"));
    assert_eq!(product["product"], json!("Widget"));
    assert_eq!(product["version"], json!("3.2"));
    assert_eq!(product["id"], json!("WIDGET-3.2"));

    let vulns = parser.vulnerabilities();
    assert_eq!(vulns.len(), 2);
    assert_eq!(vulns[0]["status"], json!("not_affected"));
    assert_eq!(vulns[0]["justification"], json!("vulnerable_code_not_present"));
    assert_eq!(vulns[0]["detail"], json!("Feature removed"));
    assert_eq!(vulns[1]["product"], json!("WIDGET-3.3"));
    assert_eq!(vulns[1]["status"], json!("fixed"));
    assert!(!vulns[1].contains_key("justification"));
}

#[test]
fn test_csaf_ranges_and_product_groups() {
    let csaf = r#"{
      "document": {"category": "csaf_vex", "csaf_version": "2.0", "title": "Ranges"},
      "product_tree": {
        "full_product_names": [
          {"name": "Widget 3.0", "product_id": "W-3.0"},
          {"name": "Widget 3.1", "product_id": "W-3.1"},
          {"name": "Widget 4.0", "product_id": "W-4.0"}
        ],
        "product_groups": [
          {"group_id": "OLD", "product_ids": ["W-3.0", "W-3.1"]}
        ]
      },
      "vulnerabilities": [{
        "cve": "CVE-2024-0002",
        "product_status": {
          "first_affected": ["W-3.0"],
          "last_affected": ["W-3.1"],
          "first_fixed": ["W-4.0"],
          "fixed": ["W-4.0"]
        },
        "threats": [{"category": "impact", "details": "Remote crash", "group_ids": ["OLD"]}],
        "remediations": [{"category": "vendor_fix", "details": "Upgrade to 4.0", "product_ids": ["W-4.0"]}]
      }, {
        "cve": "CVE-2024-0003",
        "product_status": {"known_not_affected": ["W-3.1"]},
        "flags": [{"label": "component_not_present", "group_ids": ["OLD"]}]
      }]
    }"#;
    let mut parser = VexParser::new();
    parser.parse_str(csaf).unwrap();

    let vulns = parser.vulnerabilities();
    let rows: Vec<(&str, &str)> = vulns
        .iter()
        .map(|v| (v["product"].as_str().unwrap(), v["status"].as_str().unwrap()))
        .collect();
    assert_eq!(
        rows,
        vec![
            ("W-3.0", "affected"),
            ("W-3.1", "affected"),
            ("W-4.0", "fixed"),
            ("W-3.1", "not_affected"),
        ]
    );
    assert_eq!(vulns[0]["detail"], json!("Remote crash"));
    assert_eq!(vulns[1]["detail"], json!("Remote crash"));
    assert_eq!(vulns[2]["detail"], json!("Upgrade to 4.0"));
    assert_eq!(vulns[3]["justification"], json!("component_not_present"));
}

#[test]
fn test_openvex_extraction() {
    let mut parser = VexParser::new();
    parser.parse_str(OPENVEX).unwrap();

    assert_eq!(parser.vex_type(), "openvex");
    assert_eq!(parser.metadata()["version"], json!("1"));
    assert_eq!(
        parser.product().into_primary()["id"],
        json!("pkg:apk/wolfi/git@2.39.0-r1?arch=x86_64")
    );

    let vulns = parser.vulnerabilities();
    assert_eq!(vulns.len(), 2);
    assert_eq!(vulns[0]["id"], json!("CVE-2023-2222"));
    assert_eq!(vulns[0].len(), 3);
    assert_eq!(vulns[1]["id"], json!("CVE-2023-3333"));
    assert_eq!(vulns[1]["impact"], json!("Mitigated by hardening flags"));
}

#[test]
fn test_missing_file_is_reported() {
    let temp_dir = TempDir::new().unwrap();
    let path = Utf8PathBuf::from_path_buf(temp_dir.path().join("absent.json"))
        .expect("Invalid UTF-8 in path");

    let mut parser = VexParser::new();
    match parser.parse(&path) {
        Err(Vex2DocError::FileNotFound(reported)) => assert_eq!(reported, path.as_str()),
        other => panic!("expected FileNotFound, got {:?}", other),
    }
}

#[test]
fn test_unsupported_document() {
    let mut parser = VexParser::new();
    let result = parser.parse_str(r#"{"spdxVersion": "SPDX-2.3"}"#);
    assert!(matches!(result, Err(Vex2DocError::UnsupportedFormat(_))));

    let result = parser.parse_str("not json");
    assert!(matches!(result, Err(Vex2DocError::Json(_))));
}
