//! Layered run settings.
//!
//! Lowest to highest precedence: built-in defaults, an optional settings
//! file, `VEX2DOC_*` environment variables, then command-line values. Empty
//! strings and `false` flags on the command line never override a lower
//! layer.

use crate::docbuilder::OutputFormat;
use crate::error::Vex2DocError;
use crate::report::ColumnPolicy;
use camino::{Utf8Path, Utf8PathBuf};
use ::config::{builder::DefaultState, Config, ConfigBuilder, Environment, File};
use serde::Deserialize;
use tracing::debug;

const ENV_PREFIX: &str = "VEX2DOC";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub input_file: String,
    pub output_file: String,
    pub debug: bool,
    pub format: OutputFormat,
    pub columns: ColumnPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input_file: String::new(),
            output_file: String::new(),
            debug: false,
            format: OutputFormat::Console,
            columns: ColumnPolicy::Accumulate,
        }
    }
}

/// Command-line values before merging. `None`, empty strings and `false` are
/// all treated as "not given".
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub input_file: Option<String>,
    pub output_file: Option<String>,
    pub debug: bool,
    pub format: Option<OutputFormat>,
    pub columns: Option<ColumnPolicy>,
}

impl Settings {
    /// Merge defaults, the optional settings file, the environment and the
    /// command-line overrides.
    pub fn load(overrides: &Overrides, file: Option<&Utf8Path>) -> crate::Result<Self> {
        Self::resolve(overrides, file, true)
    }

    /// Like [`Settings::load`] without the environment layer.
    pub fn load_without_env(overrides: &Overrides, file: Option<&Utf8Path>) -> crate::Result<Self> {
        Self::resolve(overrides, file, false)
    }

    fn resolve(
        overrides: &Overrides,
        file: Option<&Utf8Path>,
        use_env: bool,
    ) -> crate::Result<Self> {
        let mut builder = Self::defaults()?;
        if let Some(path) = file {
            debug!("Loading settings from {}", path);
            builder = builder.add_source(File::with_name(path.as_str()).required(true));
        }
        if use_env {
            builder = builder.add_source(Environment::with_prefix(ENV_PREFIX));
        }
        Self::apply(builder, overrides)
    }

    fn defaults() -> crate::Result<ConfigBuilder<DefaultState>> {
        let defaults = Settings::default();
        Ok(Config::builder()
            .set_default("input_file", defaults.input_file)?
            .set_default("output_file", defaults.output_file)?
            .set_default("debug", defaults.debug)?
            .set_default("format", defaults.format.as_str())?
            .set_default("columns", defaults.columns.as_str())?)
    }

    fn apply(
        builder: ConfigBuilder<DefaultState>,
        overrides: &Overrides,
    ) -> crate::Result<Self> {
        let settings = builder
            .set_override_option("input_file", truthy(overrides.input_file.clone()))?
            .set_override_option("output_file", truthy(overrides.output_file.clone()))?
            .set_override_option("debug", overrides.debug.then_some(true))?
            .set_override_option("format", overrides.format.map(|f| f.as_str()))?
            .set_override_option("columns", overrides.columns.map(|c| c.as_str()))?
            .build()?
            .try_deserialize::<Settings>()?;

        debug!("Resolved settings: {:?}", settings);
        Ok(settings)
    }

    /// Check the argument combination before any file is touched.
    pub fn validate(&self) -> crate::Result<()> {
        if self.input_file.is_empty() {
            return Err(Vex2DocError::InvalidArguments(
                "VEX name must be specified.".to_string(),
            ));
        }

        if self.format != OutputFormat::Console && self.output_file.is_empty() {
            return Err(Vex2DocError::InvalidArguments(
                "Output filename must be specified.".to_string(),
            ));
        }

        Ok(())
    }

    pub fn input_path(&self) -> Utf8PathBuf {
        Utf8PathBuf::from(&self.input_file)
    }

    pub fn output_path(&self) -> Option<Utf8PathBuf> {
        (!self.output_file.is_empty()).then(|| Utf8PathBuf::from(&self.output_file))
    }
}

fn truthy(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn defaults_apply_without_overrides() {
        let settings = Settings::load_without_env(&Overrides::default(), None).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn empty_values_do_not_override_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = Utf8PathBuf::from_path_buf(temp_dir.path().join("vex2doc.toml"))
            .expect("Invalid UTF-8 in path");
        fs::write(
            &path,
            "input_file = \"vex.json\"\nformat = \"markdown\"\noutput_file = \"out.md\"\n",
        )
        .unwrap();

        let overrides = Overrides {
            input_file: Some(String::new()),
            output_file: None,
            debug: false,
            ..Overrides::default()
        };
        let settings = Settings::load_without_env(&overrides, Some(&path)).unwrap();

        assert_eq!(settings.input_file, "vex.json");
        assert_eq!(settings.format, OutputFormat::Markdown);
        assert_eq!(settings.output_file, "out.md");
        assert!(!settings.debug);
    }

    #[test]
    fn command_line_wins_over_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = Utf8PathBuf::from_path_buf(temp_dir.path().join("vex2doc.toml"))
            .expect("Invalid UTF-8 in path");
        fs::write(&path, "format = \"markdown\"\ncolumns = \"union\"\n").unwrap();

        let overrides = Overrides {
            input_file: Some("cli.json".to_string()),
            format: Some(OutputFormat::Json),
            debug: true,
            ..Overrides::default()
        };
        let settings = Settings::load_without_env(&overrides, Some(&path)).unwrap();

        assert_eq!(settings.input_file, "cli.json");
        assert_eq!(settings.format, OutputFormat::Json);
        assert_eq!(settings.columns, ColumnPolicy::Union);
        assert!(settings.debug);
    }

    #[test]
    fn environment_sits_between_file_and_command_line() {
        let temp_dir = TempDir::new().unwrap();
        let path = Utf8PathBuf::from_path_buf(temp_dir.path().join("vex2doc.toml"))
            .expect("Invalid UTF-8 in path");
        fs::write(&path, "format = \"markdown\"\ncolumns = \"union\"\n").unwrap();

        // Only this test reads the environment layer
        std::env::set_var("VEX2DOC_FORMAT", "html");
        let from_env = Settings::load(&Overrides::default(), Some(&path));
        let overrides = Overrides {
            format: Some(OutputFormat::Json),
            ..Overrides::default()
        };
        let from_cli = Settings::load(&overrides, Some(&path));
        std::env::remove_var("VEX2DOC_FORMAT");

        let from_env = from_env.unwrap();
        assert_eq!(from_env.format, OutputFormat::Html);
        assert_eq!(from_env.columns, ColumnPolicy::Union);
        assert_eq!(from_cli.unwrap().format, OutputFormat::Json);
    }

    #[test]
    fn validation_messages() {
        let missing_input = Settings::default();
        assert_eq!(
            missing_input.validate().unwrap_err().to_string(),
            "VEX name must be specified."
        );

        let missing_output = Settings {
            input_file: "vex.json".into(),
            format: OutputFormat::Pdf,
            ..Settings::default()
        };
        assert_eq!(
            missing_output.validate().unwrap_err().to_string(),
            "Output filename must be specified."
        );

        let console = Settings {
            input_file: "vex.json".into(),
            ..Settings::default()
        };
        assert!(console.validate().is_ok());
        assert_eq!(console.output_path(), None);
    }
}
