use thiserror::Error;

#[derive(Error, Debug)]
pub enum NpChartError {
    #[error("Data unavailable from {url}: {reason}")]
    DataUnavailable { url: String, reason: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Render failure for {path}: {message}")]
    RenderFailure { path: String, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Rendering,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl NpChartError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::DataUnavailable { .. } => ErrorCategory::Network,
            Self::InvalidInput { .. } => ErrorCategory::Data,
            Self::RenderFailure { .. } => ErrorCategory::Rendering,
            Self::IoError(_) => ErrorCategory::System,
            Self::TomlError(_) | Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::DataUnavailable { .. } => ErrorSeverity::Medium,
            Self::InvalidInput { .. }
            | Self::TomlError(_)
            | Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorSeverity::High,
            Self::RenderFailure { .. } | Self::IoError(_) => ErrorSeverity::Critical,
        }
    }

    /// Process exit code for this failure. Never zero.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::DataUnavailable { url, .. } => {
                format!("Could not load subgroup data from {}", url)
            }
            Self::InvalidInput { message } => {
                format!("The dataset cannot be charted: {}", message)
            }
            Self::RenderFailure { path, .. } => format!("Could not write the chart to {}", path),
            Self::IoError(e) => format!("File system error: {}", e),
            Self::TomlError(_) => "The configuration file is not valid TOML".to_string(),
            Self::ConfigError { message } => format!("Configuration problem: {}", message),
            Self::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid setting '{}': {}", field, reason)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => {
                "Check the network connection and that the URL serves a CSV with sub_group, sub_group_size and number_of_defective_units columns"
            }
            ErrorCategory::Data => {
                "Make sure every subgroup has a positive size and no more defective units than its size"
            }
            ErrorCategory::Rendering => {
                "Check that the output directory exists and is writable"
            }
            ErrorCategory::Configuration => "Review the command line flags and the --config file",
            ErrorCategory::System => "Check file permissions and available disk space",
        }
    }
}

pub type Result<T> = std::result::Result<T, NpChartError>;
