use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarvestError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Upstream rejected request (code {code}): {message}")]
    UpstreamError { code: i64, message: String },

    #[error("Malformed response: {message}")]
    MalformedResponse { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Input error: {message}")]
    InputError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Upstream,
    Storage,
    Configuration,
    Input,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// 程序結束碼：上游問題 2、設定或輸入 1、本機儲存 3
    pub fn exit_code(self) -> i32 {
        match self {
            Self::Medium => 2,
            Self::High => 1,
            Self::Critical => 3,
        }
    }
}

impl HarvestError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ApiError(_) => ErrorCategory::Network,
            Self::UpstreamError { .. } | Self::MalformedResponse { .. } => {
                ErrorCategory::Upstream
            }
            Self::IoError(_) | Self::SerializationError(_) => ErrorCategory::Storage,
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            Self::InputError { .. } => ErrorCategory::Input,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network | ErrorCategory::Upstream => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Input => ErrorSeverity::High,
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::ApiError(_) => "檢查網路連線，或稍後再試",
            Self::UpstreamError { .. } => "確認 UID 是否正確，或降低請求頻率 (--pace-ms)",
            Self::MalformedResponse { .. } => "上游 API 格式可能已變更，請使用 --verbose 查看回應",
            Self::IoError(_) => "確認輸出目錄存在且可寫入",
            Self::SerializationError(_) => "確認封存檔案未被其他程式佔用",
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                "檢查命令列參數與設定檔內容"
            }
            Self::InputError { .. } => "請輸入有效的數字 UID",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ApiError(_) => "無法連線到上游服務".to_string(),
            Self::UpstreamError { code, message } => {
                format!("上游服務拒絕請求 (code {}): {}", code, message)
            }
            Self::MalformedResponse { message } => format!("上游回應格式錯誤: {}", message),
            Self::IoError(e) => format!("檔案讀寫失敗: {}", e),
            Self::SerializationError(e) => format!("資料序列化失敗: {}", e),
            Self::ConfigError { message } => format!("設定錯誤: {}", message),
            Self::InvalidConfigValueError {
                field,
                value,
                reason,
            } => format!("設定值無效 {} = '{}': {}", field, value, reason),
            Self::InputError { message } => format!("輸入錯誤: {}", message),
        }
    }
}

pub type Result<T> = std::result::Result<T, HarvestError>;
