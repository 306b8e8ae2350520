//! Flag parsing for the kernel commands.
//!
//! Flags use the `--name=value` form; the first bare argument is the
//! description file.

use kern_diagnostic::emitter::ColorMode;
use kern_transform::KernelConfig;
use thiserror::Error;

#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum OptionError {
    #[error("missing file path")]
    MissingPath,
    #[error("missing required option `--{0}=`")]
    Missing(&'static str),
    #[error("unknown option `{0}`")]
    Unknown(String),
    #[error("invalid value `{value}` for `--{option}=`")]
    InvalidValue { option: &'static str, value: String },
    #[error("unexpected argument `{0}`")]
    UnexpectedArgument(String),
}

/// Parsed command-line options.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Options {
    pub path: Option<String>,
    pub unit: Option<String>,
    pub row: Option<String>,
    pub inputs: Option<Vec<String>>,
    pub outputs: Option<Vec<String>>,
    pub name: Option<String>,
    pub color: ColorMode,
    /// Raw `--column=` values for `run`, one per input column.
    pub columns: Vec<String>,
}

impl Options {
    pub fn parse(args: &[String]) -> Result<Self, OptionError> {
        let mut options = Options::default();
        for arg in args {
            if let Some(value) = arg.strip_prefix("--unit=") {
                options.unit = Some(value.to_owned());
            } else if let Some(value) = arg.strip_prefix("--row=") {
                options.row = Some(value.to_owned());
            } else if let Some(value) = arg.strip_prefix("--inputs=") {
                options.inputs = Some(name_list("inputs", value)?);
            } else if let Some(value) = arg.strip_prefix("--outputs=") {
                options.outputs = Some(name_list("outputs", value)?);
            } else if let Some(value) = arg.strip_prefix("--name=") {
                options.name = Some(value.to_owned());
            } else if let Some(value) = arg.strip_prefix("--column=") {
                options.columns.push(value.to_owned());
            } else if let Some(value) = arg.strip_prefix("--color=") {
                options.color = ColorMode::parse(value).ok_or_else(|| OptionError::InvalidValue {
                    option: "color",
                    value: value.to_owned(),
                })?;
            } else if arg.starts_with('-') {
                return Err(OptionError::Unknown(arg.clone()));
            } else if options.path.is_none() {
                options.path = Some(arg.clone());
            } else {
                return Err(OptionError::UnexpectedArgument(arg.clone()));
            }
        }
        Ok(options)
    }

    pub fn path(&self) -> Result<&str, OptionError> {
        self.path.as_deref().ok_or(OptionError::MissingPath)
    }

    /// The transformation these options describe. `--unit=` and `--row=`
    /// are required.
    pub fn kernel_config(&self) -> Result<KernelConfig, OptionError> {
        let unit = self.unit.as_deref().ok_or(OptionError::Missing("unit"))?;
        let row = self.row.as_deref().ok_or(OptionError::Missing("row"))?;
        let mut config = KernelConfig::new(unit, row);
        if let Some(inputs) = &self.inputs {
            config = config.with_inputs(inputs.iter().cloned());
        }
        if let Some(outputs) = &self.outputs {
            config = config.with_outputs(outputs.iter().cloned());
        }
        if let Some(name) = &self.name {
            config = config.with_kernel_name(name.clone());
        }
        Ok(config)
    }
}

/// `a,b,c`; empty entries are rejected.
fn name_list(option: &'static str, value: &str) -> Result<Vec<String>, OptionError> {
    let names: Vec<String> = value.split(',').map(|name| name.trim().to_owned()).collect();
    if names.iter().any(String::is_empty) {
        return Err(OptionError::InvalidValue {
            option,
            value: value.to_owned(),
        });
    }
    Ok(names)
}
