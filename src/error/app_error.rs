use thiserror::Error;

/// 应用错误
#[derive(Error, Debug)]
pub enum AppError {
    /// 业务错误
    #[error("业务错误: {0}")]
    BizError(String),

    /// 配置错误
    #[error("配置错误: {0}")]
    ConfigError(String),

    /// 数据源接口错误
    #[error("数据源接口错误: {0}")]
    ApiError(String),

    /// 未知错误
    #[error("未知错误: {0}")]
    Unknown(String),
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::ApiError(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::ApiError(err.to_string())
    }
}
