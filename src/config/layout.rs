use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::infrastructure::error::SiteError;
use crate::panels::{ElementId, FloatingButtonSpec, FormSpec, Panel, Trigger, Viewport};

const BUILTIN_LAYOUT: &str = include_str!("../../assets/site_layout.toml");

/// 页面布局声明，启动时解析一次
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    #[serde(default)]
    pub viewport: Viewport,
    #[serde(default)]
    pub panels: Vec<Panel>,
    #[serde(default)]
    pub triggers: Vec<Trigger>,
    /// 点击其中不会关闭面板的区域
    #[serde(default)]
    pub regions: Vec<ElementId>,
    /// 子元素 -> 父元素
    #[serde(default)]
    pub parents: HashMap<ElementId, ElementId>,
    #[serde(default)]
    pub forms: Vec<FormSpec>,
    #[serde(default)]
    pub floating_button: Option<FloatingButtonSpec>,
}

impl Layout {
    pub fn from_toml_str(content: &str) -> Result<Self, SiteError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, SiteError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SiteError::file_system(
                format!("无法读取布局文件: {}", e),
                Some(path.to_string_lossy().to_string()),
            )
        })?;
        Self::from_toml_str(&content)
    }

    /// 内置的站点布局
    pub fn builtin() -> Result<Self, SiteError> {
        Self::from_toml_str(BUILTIN_LAYOUT)
    }

    /// 指定路径时读取文件，否则使用内置布局
    pub fn load(path: Option<&Path>) -> Result<Self, SiteError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Self::builtin(),
        }
    }
}
