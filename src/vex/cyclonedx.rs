use crate::vex::{insert_opt, Product, Record};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Deserialize)]
pub struct CycloneDxVex {
    #[serde(rename = "bomFormat")]
    pub bom_format: String,
    #[serde(rename = "specVersion", default)]
    pub spec_version: Option<String>,
    #[serde(default)]
    pub version: Option<u32>,
    #[serde(rename = "serialNumber", default)]
    pub serial_number: Option<String>,
    #[serde(default)]
    pub metadata: Option<VexMetadata>,
    #[serde(default)]
    pub components: Vec<VexComponent>,
    #[serde(default)]
    pub vulnerabilities: Vec<VexVulnerability>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VexMetadata {
    pub timestamp: Option<String>,
    #[serde(default)]
    pub authors: Vec<VexContact>,
    pub component: Option<VexComponent>,
    pub supplier: Option<VexContact>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VexContact {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VexComponent {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub name: Option<String>,
    pub version: Option<String>,
    pub supplier: Option<VexContact>,
    pub purl: Option<String>,
    #[serde(rename = "bom-ref")]
    pub bom_ref: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VulnSource {
    pub name: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VexAnalysis {
    pub state: Option<String>,
    pub justification: Option<String>,
    #[serde(default)]
    pub response: Vec<String>,
    pub detail: Option<String>,
    #[serde(rename = "lastUpdated")]
    pub last_updated: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VexAffects {
    #[serde(rename = "ref")]
    pub component_ref: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VexVulnerability {
    pub id: Option<String>,
    pub source: Option<VulnSource>,
    pub analysis: Option<VexAnalysis>,
    #[serde(default)]
    pub affects: Vec<VexAffects>,
    pub updated: Option<String>,
}

impl CycloneDxVex {
    pub fn from_value(value: Value) -> crate::Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn metadata(&self) -> Record {
        let mut record = Record::new();
        insert_opt(&mut record, "version", self.spec_version.clone());
        insert_opt(&mut record, "id", self.serial_number.clone());
        insert_opt(&mut record, "revision", self.version.map(|v| v.to_string()));

        if let Some(metadata) = &self.metadata {
            insert_opt(&mut record, "created", metadata.timestamp.clone());
            let authors: Vec<_> = metadata
                .authors
                .iter()
                .filter_map(|author| author.name.clone())
                .collect();
            if !authors.is_empty() {
                insert_opt(&mut record, "author", Some(authors.join(", ")));
            }
            insert_opt(
                &mut record,
                "supplier",
                metadata.supplier.as_ref().and_then(|s| s.name.clone()),
            );
        }

        record
    }

    /// The described component followed by every listed component.
    pub fn product(&self) -> Product {
        let described = self.metadata.as_ref().and_then(|m| m.component.as_ref());
        let products = described
            .into_iter()
            .chain(self.components.iter())
            .map(component_record)
            .collect();
        Product::Multiple(products)
    }

    pub fn vulnerabilities(&self) -> Vec<Record> {
        self.vulnerabilities
            .iter()
            .map(|vuln| {
                let mut record = Record::new();
                insert_opt(&mut record, "id", vuln.id.clone());
                insert_opt(
                    &mut record,
                    "source",
                    vuln.source
                        .as_ref()
                        .and_then(|s| s.name.clone().or_else(|| s.url.clone())),
                );
                if let Some(analysis) = &vuln.analysis {
                    insert_opt(&mut record, "status", analysis.state.clone());
                    insert_opt(&mut record, "justification", analysis.justification.clone());
                    if !analysis.response.is_empty() {
                        insert_opt(&mut record, "response", Some(analysis.response.join(", ")));
                    }
                    insert_opt(&mut record, "detail", analysis.detail.clone());
                }
                if !vuln.affects.is_empty() {
                    let refs: Vec<_> = vuln
                        .affects
                        .iter()
                        .map(|a| a.component_ref.as_str())
                        .collect();
                    insert_opt(&mut record, "affects", Some(refs.join(", ")));
                }
                let updated = vuln.updated.clone().or_else(|| {
                    vuln.analysis
                        .as_ref()
                        .and_then(|a| a.last_updated.clone())
                });
                insert_opt(&mut record, "updated", updated);
                record
            })
            .collect()
    }
}

fn component_record(component: &VexComponent) -> Record {
    let mut record = Record::new();
    insert_opt(&mut record, "name", component.name.clone());
    insert_opt(&mut record, "version", component.version.clone());
    insert_opt(&mut record, "type", component.kind.clone());
    insert_opt(
        &mut record,
        "supplier",
        component.supplier.as_ref().and_then(|s| s.name.clone()),
    );
    insert_opt(&mut record, "purl", component.purl.clone());
    insert_opt(&mut record, "bom-ref", component.bom_ref.clone());
    record
}
