//! 页面事件与可回放的事件脚本。

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::infrastructure::error::SiteError;
use crate::panels::{ElementId, FormId, Rect};

pub const ESCAPE_KEY: &str = "Escape";

/// 控制器处理的离散界面事件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UiEvent {
    Click { target: ElementId },
    Key { key: String },
    ServiceChanged { form: FormId, value: String },
    FieldInput { form: FormId, field: String, value: String },
    Submit { form: FormId },
    Resize { width: f64, height: f64 },
    /// 推进时间，执行到期的延后任务
    Advance { ms: u64 },
}

impl UiEvent {
    pub fn click(target: impl Into<String>) -> Self {
        UiEvent::Click {
            target: target.into(),
        }
    }

    pub fn key(key: impl Into<String>) -> Self {
        UiEvent::Key { key: key.into() }
    }

    pub fn advance(ms: u64) -> Self {
        UiEvent::Advance { ms }
    }

    pub fn is_escape(key: &str) -> bool {
        key == ESCAPE_KEY || key == "Esc"
    }
}

/// 回放脚本：元素坐标加事件序列
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventScript {
    #[serde(default)]
    pub rects: HashMap<ElementId, Rect>,
    #[serde(default)]
    pub events: Vec<UiEvent>,
}

impl EventScript {
    pub fn from_json_str(content: &str) -> Result<Self, SiteError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, SiteError> {
        Ok(toml::from_str(content)?)
    }

    /// 按扩展名选择 JSON 或 TOML
    pub fn from_file(path: &Path) -> Result<Self, SiteError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SiteError::file_system(
                format!("无法读取事件脚本: {}", e),
                Some(path.to_string_lossy().to_string()),
            )
        })?;

        match path.extension().and_then(|s| s.to_str()) {
            Some("json") => Self::from_json_str(&content),
            Some("toml") => Self::from_toml_str(&content),
            _ => Err(SiteError::config("不支持的事件脚本格式")),
        }
    }
}
