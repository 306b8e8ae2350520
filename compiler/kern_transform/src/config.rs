//! Transformation configuration.

/// What to vectorize and how to name the result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KernelConfig {
    /// Name of the declaring class.
    pub unit: String,
    /// Name of the row method inside `unit`.
    pub row_function: String,
    /// Input column names, one per row parameter after the receiver.
    /// `None` uses the parameter names.
    pub inputs: Option<Vec<String>>,
    /// Output column names, one per returned name. `None` uses the
    /// returned names.
    pub outputs: Option<Vec<String>>,
    /// `None` derives `<row_function>_kernel`.
    pub kernel_name: Option<String>,
}

impl KernelConfig {
    pub fn new(unit: impl Into<String>, row_function: impl Into<String>) -> Self {
        KernelConfig {
            unit: unit.into(),
            row_function: row_function.into(),
            inputs: None,
            outputs: None,
            kernel_name: None,
        }
    }

    #[must_use]
    pub fn with_inputs<I, S>(mut self, inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inputs = Some(inputs.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_outputs<I, S>(mut self, outputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.outputs = Some(outputs.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_kernel_name(mut self, name: impl Into<String>) -> Self {
        self.kernel_name = Some(name.into());
        self
    }

    /// The kernel's function name.
    pub fn kernel_name(&self) -> String {
        match &self.kernel_name {
            Some(name) => name.clone(),
            None => format!("{}_kernel", self.row_function),
        }
    }
}
