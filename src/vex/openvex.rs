use crate::vex::{insert_opt, Product, Record};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Deserialize)]
pub struct OpenVex {
    #[serde(rename = "@id")]
    pub id: Option<String>,
    pub author: Option<String>,
    pub role: Option<String>,
    pub timestamp: Option<String>,
    pub last_updated: Option<String>,
    pub version: Option<Value>,
    pub tooling: Option<String>,
    #[serde(default)]
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Statement {
    pub vulnerability: Option<Reference>,
    #[serde(default)]
    pub products: Vec<Reference>,
    pub status: Option<String>,
    pub justification: Option<String>,
    pub impact_statement: Option<String>,
    pub action_statement: Option<String>,
    pub timestamp: Option<String>,
}

/// Vulnerabilities and products are plain strings in the 0.0.x documents
/// and objects in 0.2.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Reference {
    Name(String),
    Object {
        #[serde(rename = "@id")]
        id: Option<String>,
        name: Option<String>,
    },
}

impl Reference {
    /// Prefer the human name, fall back to the IRI.
    pub fn label(&self) -> Option<String> {
        match self {
            Reference::Name(name) => Some(name.clone()),
            Reference::Object { id, name } => name.clone().or_else(|| id.clone()),
        }
    }
}

impl OpenVex {
    pub fn from_value(value: Value) -> crate::Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn metadata(&self) -> Record {
        let mut record = Record::new();
        insert_opt(&mut record, "id", self.id.clone());
        insert_opt(&mut record, "author", self.author.clone());
        insert_opt(&mut record, "role", self.role.clone());
        insert_opt(&mut record, "created", self.timestamp.clone());
        insert_opt(&mut record, "updated", self.last_updated.clone());
        insert_opt(
            &mut record,
            "version",
            self.version.as_ref().map(crate::vex::display_value),
        );
        insert_opt(&mut record, "tooling", self.tooling.clone());
        record
    }

    pub fn product(&self) -> Product {
        let mut record = Record::new();
        let first = self
            .statements
            .first()
            .and_then(|statement| statement.products.first())
            .and_then(Reference::label);
        insert_opt(&mut record, "id", first);
        Product::Single(record)
    }

    /// One record per (statement, product). Statements without products
    /// still produce a single record.
    pub fn vulnerabilities(&self) -> Vec<Record> {
        let mut records = Vec::new();

        for statement in &self.statements {
            let products: Vec<Option<String>> = if statement.products.is_empty() {
                vec![None]
            } else {
                statement.products.iter().map(Reference::label).collect()
            };

            for product in products {
                let mut record = Record::new();
                insert_opt(
                    &mut record,
                    "id",
                    statement.vulnerability.as_ref().and_then(Reference::label),
                );
                insert_opt(&mut record, "product", product);
                insert_opt(&mut record, "status", statement.status.clone());
                insert_opt(&mut record, "justification", statement.justification.clone());
                insert_opt(&mut record, "impact", statement.impact_statement.clone());
                insert_opt(&mut record, "action", statement.action_statement.clone());
                insert_opt(&mut record, "created", statement.timestamp.clone());
                records.push(record);
            }
        }

        records
    }
}
