use crate::{
    config::{Overrides, Settings},
    docbuilder::OutputFormat,
    report::ColumnPolicy,
    vex::VexParser,
};
use camino::Utf8PathBuf;
use clap::Parser;

pub mod generate;

pub use generate::generate_command;

#[derive(Parser, Debug, Default)]
#[command(name = "vex2doc")]
#[command(about = "VEX2doc generates documentation for a VEX artefact.")]
#[command(version)]
pub struct Cli {
    /// Name of VEX file
    #[arg(short, long, help_heading = "Input")]
    pub input_file: Option<Utf8PathBuf>,

    /// Settings file (TOML, JSON or YAML)
    #[arg(short, long, help_heading = "Input")]
    pub config: Option<Utf8PathBuf>,

    /// Add debug information
    #[arg(long, help_heading = "Output")]
    pub debug: bool,

    /// Output format (default: output to console)
    #[arg(short, long, value_enum, help_heading = "Output")]
    pub format: Option<OutputFormat>,

    /// Output filename (default: output to stdout)
    #[arg(short, long, help_heading = "Output")]
    pub output_file: Option<Utf8PathBuf>,

    /// Column alignment for the vulnerabilities table (default: accumulate)
    #[arg(long, value_enum, help_heading = "Output")]
    pub columns: Option<ColumnPolicy>,
}

impl Cli {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            input_file: self.input_file.as_ref().map(|p| p.to_string()),
            output_file: self.output_file.as_ref().map(|p| p.to_string()),
            debug: self.debug,
            format: self.format,
            columns: self.columns,
        }
    }

    /// Merge the command line with the settings file and environment.
    pub fn settings(&self) -> crate::Result<Settings> {
        Settings::load(&self.overrides(), self.config.as_deref())
    }
}

/// Run against the bundled VEX parser. Returns the process exit code.
pub fn run_cli(settings: &Settings) -> crate::Result<i32> {
    let mut parser = VexParser::new();
    generate_command(settings, &mut parser)
}
