use crate::vex::{insert_opt, Product, Record};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;

#[derive(Debug, Clone, Deserialize)]
pub struct CsafVex {
    pub document: CsafDocument,
    #[serde(default)]
    pub product_tree: Option<ProductTree>,
    #[serde(default)]
    pub vulnerabilities: Vec<CsafVulnerability>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CsafDocument {
    pub category: Option<String>,
    pub csaf_version: Option<String>,
    pub title: Option<String>,
    pub publisher: Option<Publisher>,
    pub tracking: Option<Tracking>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Publisher {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Tracking {
    pub id: Option<String>,
    pub version: Option<String>,
    pub status: Option<String>,
    pub initial_release_date: Option<String>,
    pub current_release_date: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductTree {
    #[serde(default)]
    pub branches: Vec<Branch>,
    #[serde(default)]
    pub full_product_names: Vec<FullProductName>,
    #[serde(default)]
    pub product_groups: Vec<ProductGroup>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductGroup {
    pub group_id: String,
    #[serde(default)]
    pub product_ids: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Branch {
    pub category: String,
    pub name: String,
    #[serde(default)]
    pub branches: Vec<Branch>,
    pub product: Option<FullProductName>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FullProductName {
    pub name: String,
    pub product_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CsafVulnerability {
    pub cve: Option<String>,
    #[serde(default)]
    pub product_status: ProductStatus,
    #[serde(default)]
    pub flags: Vec<Flag>,
    #[serde(default)]
    pub threats: Vec<Remark>,
    #[serde(default)]
    pub remediations: Vec<Remark>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductStatus {
    #[serde(default)]
    pub first_affected: Vec<String>,
    #[serde(default)]
    pub known_affected: Vec<String>,
    #[serde(default)]
    pub last_affected: Vec<String>,
    #[serde(default)]
    pub known_not_affected: Vec<String>,
    #[serde(default)]
    pub first_fixed: Vec<String>,
    #[serde(default)]
    pub fixed: Vec<String>,
    #[serde(default)]
    pub recommended: Vec<String>,
    #[serde(default)]
    pub under_investigation: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Flag {
    pub label: String,
    #[serde(default)]
    pub product_ids: Vec<String>,
    #[serde(default)]
    pub group_ids: Vec<String>,
}

/// A threat or remediation note scoped to a set of products.
#[derive(Debug, Clone, Deserialize)]
pub struct Remark {
    pub category: Option<String>,
    pub details: Option<String>,
    #[serde(default)]
    pub product_ids: Vec<String>,
    #[serde(default)]
    pub group_ids: Vec<String>,
}

impl CsafVex {
    pub fn from_value(value: Value) -> crate::Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn metadata(&self) -> Record {
        let doc = &self.document;
        let mut record = Record::new();
        insert_opt(&mut record, "title", doc.title.clone());
        insert_opt(&mut record, "category", doc.category.clone());
        insert_opt(&mut record, "version", doc.csaf_version.clone());
        if let Some(tracking) = &doc.tracking {
            insert_opt(&mut record, "id", tracking.id.clone());
            insert_opt(&mut record, "revision", tracking.version.clone());
            insert_opt(&mut record, "status", tracking.status.clone());
            insert_opt(&mut record, "created", tracking.initial_release_date.clone());
            insert_opt(&mut record, "updated", tracking.current_release_date.clone());
        }
        insert_opt(
            &mut record,
            "author",
            doc.publisher.as_ref().and_then(|p| p.name.clone()),
        );
        record
    }

    pub fn product(&self) -> Product {
        let mut record = Record::new();
        let Some(tree) = &self.product_tree else {
            return Product::Single(record);
        };

        if let Some(branch) = tree.branches.first() {
            collect_branch_path(branch, &mut record);
        } else if let Some(named) = tree.full_product_names.first() {
            insert_opt(&mut record, "product", Some(named.name.as_str()));
            insert_opt(&mut record, "id", Some(named.product_id.as_str()));
        }

        Product::Single(record)
    }

    /// One record per (vulnerability, product, status). Range lists fold into
    /// `affected` and `fixed`; a product listed twice under the same status
    /// yields one record.
    pub fn vulnerabilities(&self) -> Vec<Record> {
        let groups = self
            .product_tree
            .as_ref()
            .map(|tree| tree.product_groups.as_slice())
            .unwrap_or_default();
        let mut records = Vec::new();

        for vuln in &self.vulnerabilities {
            let status = &vuln.product_status;
            let states = [
                ("affected", &status.first_affected),
                ("affected", &status.known_affected),
                ("affected", &status.last_affected),
                ("not_affected", &status.known_not_affected),
                ("fixed", &status.first_fixed),
                ("fixed", &status.fixed),
                ("fixed", &status.recommended),
                ("under_investigation", &status.under_investigation),
            ];
            let mut seen: HashSet<(&str, &str)> = HashSet::new();

            for (state, product_ids) in states {
                for product_id in product_ids {
                    if !seen.insert((state, product_id.as_str())) {
                        continue;
                    }
                    let mut record = Record::new();
                    insert_opt(&mut record, "id", vuln.cve.clone());
                    insert_opt(&mut record, "product", Some(product_id.as_str()));
                    insert_opt(&mut record, "status", Some(state));

                    let justification = vuln
                        .flags
                        .iter()
                        .find(|flag| covers(&flag.product_ids, &flag.group_ids, groups, product_id))
                        .map(|flag| flag.label.clone());
                    insert_opt(&mut record, "justification", justification);

                    let detail = vuln
                        .threats
                        .iter()
                        .filter(|t| t.category.as_deref() == Some("impact"))
                        .chain(vuln.remediations.iter())
                        .find(|r| covers(&r.product_ids, &r.group_ids, groups, product_id))
                        .and_then(|remark| remark.details.clone());
                    insert_opt(&mut record, "detail", detail);

                    records.push(record);
                }
            }
        }

        records
    }
}

/// Whether `product_id` is named directly or through one of `group_ids`.
fn covers(
    product_ids: &[String],
    group_ids: &[String],
    groups: &[ProductGroup],
    product_id: &str,
) -> bool {
    product_ids.iter().any(|id| id == product_id)
        || groups
            .iter()
            .filter(|group| group_ids.contains(&group.group_id))
            .any(|group| group.product_ids.iter().any(|id| id == product_id))
}

/// Follow the first branch path down to a leaf, picking up the vendor,
/// product name and version along the way.
fn collect_branch_path(branch: &Branch, record: &mut Record) {
    match branch.category.as_str() {
        "vendor" => insert_opt(record, "vendor", Some(branch.name.as_str())),
        "product_name" | "product_family" => insert_opt(record, "product", Some(branch.name.as_str())),
        "product_version" | "product_version_range" => {
            insert_opt(record, "version", Some(branch.name.as_str()))
        }
        _ => {}
    }

    if let Some(product) = &branch.product {
        if !record.contains_key("product") {
            insert_opt(record, "product", Some(product.name.as_str()));
        }
        insert_opt(record, "id", Some(product.product_id.as_str()));
    }

    if let Some(child) = branch.branches.first() {
        collect_branch_path(child, record);
    }
}
