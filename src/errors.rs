use std::fmt;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TinylinkError {
    Validation(String),
    Parse(String),
    NotFound(String),
    StoreRead(String),
    StoreWrite(String),
    RandomSource(String),
    CodeConflict(String),
    StoreConnection(String),
    Config(String),
}

impl TinylinkError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            TinylinkError::Validation(_) => "E001",
            TinylinkError::Parse(_) => "E002",
            TinylinkError::NotFound(_) => "E003",
            TinylinkError::StoreRead(_) => "E004",
            TinylinkError::StoreWrite(_) => "E005",
            TinylinkError::RandomSource(_) => "E006",
            TinylinkError::CodeConflict(_) => "E007",
            TinylinkError::StoreConnection(_) => "E008",
            TinylinkError::Config(_) => "E009",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            TinylinkError::Validation(_) => "Validation Error",
            TinylinkError::Parse(_) => "Parse Error",
            TinylinkError::NotFound(_) => "Resource Not Found",
            TinylinkError::StoreRead(_) => "Store Read Error",
            TinylinkError::StoreWrite(_) => "Store Write Error",
            TinylinkError::RandomSource(_) => "Random Source Error",
            TinylinkError::CodeConflict(_) => "Short Code Conflict",
            TinylinkError::StoreConnection(_) => "Store Connection Error",
            TinylinkError::Config(_) => "Configuration Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            TinylinkError::Validation(msg)
            | TinylinkError::Parse(msg)
            | TinylinkError::NotFound(msg)
            | TinylinkError::StoreRead(msg)
            | TinylinkError::StoreWrite(msg)
            | TinylinkError::RandomSource(msg)
            | TinylinkError::CodeConflict(msg)
            | TinylinkError::StoreConnection(msg)
            | TinylinkError::Config(msg) => msg,
        }
    }

    /// 格式化为彩色输出（用于启动失败时的终端提示）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for TinylinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for TinylinkError {}

// 便捷的构造函数
impl TinylinkError {
    pub fn validation<T: Into<String>>(msg: T) -> Self {
        TinylinkError::Validation(msg.into())
    }

    pub fn parse<T: Into<String>>(msg: T) -> Self {
        TinylinkError::Parse(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        TinylinkError::NotFound(msg.into())
    }

    pub fn store_read<T: Into<String>>(msg: T) -> Self {
        TinylinkError::StoreRead(msg.into())
    }

    pub fn store_write<T: Into<String>>(msg: T) -> Self {
        TinylinkError::StoreWrite(msg.into())
    }

    pub fn random_source<T: Into<String>>(msg: T) -> Self {
        TinylinkError::RandomSource(msg.into())
    }

    pub fn code_conflict<T: Into<String>>(msg: T) -> Self {
        TinylinkError::CodeConflict(msg.into())
    }

    pub fn store_connection<T: Into<String>>(msg: T) -> Self {
        TinylinkError::StoreConnection(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        TinylinkError::Config(msg.into())
    }
}

impl From<serde_json::Error> for TinylinkError {
    fn from(err: serde_json::Error) -> Self {
        TinylinkError::Parse(err.to_string())
    }
}

impl From<getrandom::Error> for TinylinkError {
    fn from(err: getrandom::Error) -> Self {
        TinylinkError::RandomSource(err.to_string())
    }
}

/// JSON body for every error response: `{"error": "..."}`
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ResponseError for TinylinkError {
    fn status_code(&self) -> StatusCode {
        match self {
            TinylinkError::Validation(_) | TinylinkError::Parse(_) => StatusCode::BAD_REQUEST,
            TinylinkError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.message().to_string(),
        })
    }
}

pub type Result<T> = std::result::Result<T, TinylinkError>;
