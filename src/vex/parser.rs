use crate::error::Vex2DocError;
use crate::vex::{
    csaf::CsafVex, cyclonedx::CycloneDxVex, openvex::OpenVex, Product, Record, VexSource, VexType,
};
use camino::Utf8Path;
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use tracing::{debug, info};

#[derive(Debug, Clone)]
enum ParsedVex {
    CycloneDx(CycloneDxVex),
    Csaf(CsafVex),
    OpenVex(OpenVex),
}

/// Default [`VexSource`]: reads a JSON VEX document and detects its dialect.
#[derive(Debug, Clone, Default)]
pub struct VexParser {
    parsed: Option<ParsedVex>,
}

impl VexParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse_str(&mut self, content: &str) -> crate::Result<()> {
        let value: Value = serde_json::from_str(content)?;
        let vex_type = detect_vex_type(&value)?;
        debug!("Detected {} VEX document", vex_type);

        let parsed = match vex_type {
            VexType::CycloneDx => ParsedVex::CycloneDx(CycloneDxVex::from_value(value)?),
            VexType::Csaf => ParsedVex::Csaf(CsafVex::from_value(value)?),
            VexType::OpenVex => ParsedVex::OpenVex(OpenVex::from_value(value)?),
        };
        self.parsed = Some(parsed);

        Ok(())
    }

    pub fn detected_type(&self) -> Option<VexType> {
        self.parsed.as_ref().map(|parsed| match parsed {
            ParsedVex::CycloneDx(_) => VexType::CycloneDx,
            ParsedVex::Csaf(_) => VexType::Csaf,
            ParsedVex::OpenVex(_) => VexType::OpenVex,
        })
    }
}

impl VexSource for VexParser {
    fn parse(&mut self, path: &Utf8Path) -> crate::Result<()> {
        info!("Parsing VEX file: {}", path);

        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => Vex2DocError::FileNotFound(path.to_string()),
            _ => Vex2DocError::Io(e),
        })?;

        self.parse_str(&content)
    }

    fn vex_type(&self) -> String {
        self.detected_type()
            .map(|t| t.as_str().to_string())
            .unwrap_or_default()
    }

    fn metadata(&self) -> Record {
        match &self.parsed {
            Some(ParsedVex::CycloneDx(doc)) => doc.metadata(),
            Some(ParsedVex::Csaf(doc)) => doc.metadata(),
            Some(ParsedVex::OpenVex(doc)) => doc.metadata(),
            None => Record::new(),
        }
    }

    fn product(&self) -> Product {
        match &self.parsed {
            Some(ParsedVex::CycloneDx(doc)) => doc.product(),
            Some(ParsedVex::Csaf(doc)) => doc.product(),
            Some(ParsedVex::OpenVex(doc)) => doc.product(),
            None => Product::default(),
        }
    }

    fn vulnerabilities(&self) -> Vec<Record> {
        match &self.parsed {
            Some(ParsedVex::CycloneDx(doc)) => doc.vulnerabilities(),
            Some(ParsedVex::Csaf(doc)) => doc.vulnerabilities(),
            Some(ParsedVex::OpenVex(doc)) => doc.vulnerabilities(),
            None => Vec::new(),
        }
    }
}

fn detect_vex_type(value: &Value) -> crate::Result<VexType> {
    if value.get("bomFormat").and_then(|v| v.as_str()) == Some("CycloneDX") {
        return Ok(VexType::CycloneDx);
    }

    if value
        .get("document")
        .and_then(|doc| doc.get("csaf_version"))
        .is_some()
    {
        return Ok(VexType::Csaf);
    }

    let is_openvex = match value.get("@context") {
        Some(Value::String(context)) => context.contains("openvex"),
        Some(Value::Array(contexts)) => contexts
            .iter()
            .filter_map(|c| c.as_str())
            .any(|c| c.contains("openvex")),
        _ => false,
    };
    if is_openvex {
        return Ok(VexType::OpenVex);
    }

    Err(Vex2DocError::UnsupportedFormat(
        "expected a CycloneDX, CSAF or OpenVEX JSON document".to_string(),
    ))
}
