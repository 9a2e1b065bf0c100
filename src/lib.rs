//! vex2doc - documentation generator for VEX artefacts
//!
//! Reads a CycloneDX, CSAF or OpenVEX document and renders a summary of its
//! metadata, product and vulnerabilities as console text, Markdown, HTML,
//! JSON, PDF or an xlsx workbook.

pub mod cli;
pub mod config;
pub mod docbuilder;
pub mod error;
pub mod report;
pub mod vex;

pub use error::{Result, Vex2DocError};
