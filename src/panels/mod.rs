//! 面板数据模型：面板、触发器、互斥分组与保持打开区域。

pub mod registry;
pub mod state;

use serde::{Deserialize, Serialize};

pub use registry::PanelRegistry;
pub use state::PanelState;

pub type PanelId = String;
pub type TriggerId = String;
pub type GroupId = String;
pub type ElementId = String;
pub type FormId = String;

/// 面板类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelKind {
    /// 导航下拉菜单
    #[default]
    Dropdown,
    /// 覆盖整页的 legal / connect 页面
    Overlay,
    /// 内嵌联系表单
    InlineForm,
}

/// 可切换的界面区域
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    pub id: PanelId,
    #[serde(default)]
    pub kind: PanelKind,
    pub group: GroupId,
    /// 关闭其他面板时保留此面板
    #[serde(default)]
    pub sticky: bool,
    #[serde(default)]
    pub overlay: Option<OverlaySpec>,
}

impl Panel {
    pub fn new(id: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: PanelKind::Dropdown,
            group: group.into(),
            sticky: false,
            overlay: None,
        }
    }

    pub fn with_kind(mut self, kind: PanelKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn sticky(mut self) -> Self {
        self.sticky = true;
        self
    }

    pub fn with_overlay(mut self, overlay: OverlaySpec) -> Self {
        self.kind = PanelKind::Overlay;
        self.overlay = Some(overlay);
        self
    }
}

/// 覆盖页面的动画与联动设置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlaySpec {
    /// 打开时隐藏的导航元素
    #[serde(default)]
    pub hides: Option<ElementId>,
    /// 从触发按钮位置缩放弹出
    #[serde(default)]
    pub launch_from_trigger: bool,
    /// 显示后获得焦点的输入框
    #[serde(default)]
    pub focus_field: Option<ElementId>,
    /// 关闭后延迟重置样式的毫秒数，0 表示立即
    #[serde(default)]
    pub close_delay_ms: u64,
}

impl Default for OverlaySpec {
    fn default() -> Self {
        Self {
            hides: None,
            launch_from_trigger: false,
            focus_field: None,
            close_delay_ms: 0,
        }
    }
}

/// 触发器文字，例如 Connect / Close
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerLabel {
    pub default: String,
    pub active: String,
}

impl TriggerLabel {
    pub fn new(default: impl Into<String>, active: impl Into<String>) -> Self {
        Self {
            default: default.into(),
            active: active.into(),
        }
    }
}

/// 切换单个面板的控件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trigger {
    pub id: TriggerId,
    pub panel: PanelId,
    /// 触发器所在的父面板
    #[serde(default)]
    pub nested_in: Option<PanelId>,
    #[serde(default)]
    pub label: Option<TriggerLabel>,
}

impl Trigger {
    pub fn new(id: impl Into<String>, panel: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            panel: panel.into(),
            nested_in: None,
            label: None,
        }
    }

    pub fn nested_in(mut self, panel: impl Into<String>) -> Self {
        self.nested_in = Some(panel.into());
        self
    }

    pub fn with_label(mut self, label: TriggerLabel) -> Self {
        self.label = Some(label);
        self
    }
}

/// 内嵌联系表单的元素绑定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormSpec {
    pub id: FormId,
    pub submit_button: ElementId,
    #[serde(default = "default_submit_label")]
    pub submit_label: String,
    #[serde(default)]
    pub service_select: Option<ElementId>,
    /// 预选的服务项
    #[serde(default)]
    pub initial_service: Option<String>,
}

fn default_submit_label() -> String {
    "Send".to_string()
}

impl FormSpec {
    pub fn new(id: impl Into<String>, submit_button: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            submit_button: submit_button.into(),
            submit_label: default_submit_label(),
            service_select: None,
            initial_service: None,
        }
    }

    pub fn with_service_select(mut self, element: impl Into<String>) -> Self {
        self.service_select = Some(element.into());
        self
    }
}

/// 跟随页脚位置的悬浮 Connect 按钮
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloatingButtonSpec {
    pub element: ElementId,
    pub footer: ElementId,
}

/// 元素的视口坐标
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    pub fn center(&self) -> (f64, f64) {
        (self.left + self.width / 2.0, self.top + self.height / 2.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 800.0,
        }
    }
}

impl Viewport {
    pub fn center(&self) -> (f64, f64) {
        (self.width / 2.0, self.height / 2.0)
    }
}
