//! 页面表面：控制器写入 CSS 类、内联样式、按钮文字与焦点的唯一出口。

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;

use crate::panels::Rect;

/// 控制器会写入的内联样式属性
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleProperty {
    Display,
    Opacity,
    Transform,
    Bottom,
}

impl StyleProperty {
    pub fn as_str(&self) -> &'static str {
        match self {
            StyleProperty::Display => "display",
            StyleProperty::Opacity => "opacity",
            StyleProperty::Transform => "transform",
            StyleProperty::Bottom => "bottom",
        }
    }
}

/// 页面渲染层的抽象
pub trait Surface {
    fn set_class(&mut self, element: &str, class: &str, on: bool);
    /// `None` 清除该属性
    fn set_style(&mut self, element: &str, property: StyleProperty, value: Option<&str>);
    fn set_text(&mut self, element: &str, text: &str);
    fn set_disabled(&mut self, element: &str, disabled: bool);
    fn focus(&mut self, element: &str);
    fn scroll_to_top(&mut self);
    fn rect(&self, element: &str) -> Option<Rect>;
}

/// 单个元素的可见状态
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ElementState {
    pub classes: BTreeSet<String>,
    pub styles: BTreeMap<StyleProperty, String>,
    pub text: Option<String>,
    pub disabled: bool,
}

/// 写入记录，用于断言中间状态
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum SurfaceWrite {
    Class { element: String, class: String, on: bool },
    Style { element: String, property: StyleProperty, value: Option<String> },
    Text { element: String, text: String },
    Disabled { element: String, disabled: bool },
    Focus { element: String },
    ScrollToTop,
}

/// 内存中的表面实现，供回放与测试使用
#[derive(Debug, Clone, Default, Serialize)]
pub struct MemorySurface {
    elements: BTreeMap<String, ElementState>,
    focused: Option<String>,
    scroll_requests: usize,
    #[serde(skip)]
    rects: HashMap<String, Rect>,
    #[serde(skip)]
    journal: Vec<SurfaceWrite>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rect(mut self, element: impl Into<String>, rect: Rect) -> Self {
        self.rects.insert(element.into(), rect);
        self
    }

    pub fn set_rect(&mut self, element: impl Into<String>, rect: Rect) {
        self.rects.insert(element.into(), rect);
    }

    pub fn has_class(&self, element: &str, class: &str) -> bool {
        self.elements
            .get(element)
            .map(|e| e.classes.contains(class))
            .unwrap_or(false)
    }

    pub fn style(&self, element: &str, property: StyleProperty) -> Option<&str> {
        self.elements
            .get(element)
            .and_then(|e| e.styles.get(&property))
            .map(String::as_str)
    }

    pub fn text(&self, element: &str) -> Option<&str> {
        self.elements.get(element).and_then(|e| e.text.as_deref())
    }

    pub fn is_disabled(&self, element: &str) -> bool {
        self.elements.get(element).map(|e| e.disabled).unwrap_or(false)
    }

    pub fn focused(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    pub fn scroll_requests(&self) -> usize {
        self.scroll_requests
    }

    pub fn journal(&self) -> &[SurfaceWrite] {
        &self.journal
    }

    /// 元素曾经显示过的所有文字
    pub fn text_history(&self, element: &str) -> Vec<&str> {
        self.journal
            .iter()
            .filter_map(|w| match w {
                SurfaceWrite::Text { element: e, text } if e == element => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    fn entry(&mut self, element: &str) -> &mut ElementState {
        self.elements.entry(element.to_string()).or_default()
    }
}

impl Surface for MemorySurface {
    fn set_class(&mut self, element: &str, class: &str, on: bool) {
        let state = self.entry(element);
        if on {
            state.classes.insert(class.to_string());
        } else {
            state.classes.remove(class);
        }
        self.journal.push(SurfaceWrite::Class {
            element: element.to_string(),
            class: class.to_string(),
            on,
        });
    }

    fn set_style(&mut self, element: &str, property: StyleProperty, value: Option<&str>) {
        let state = self.entry(element);
        match value {
            Some(v) => {
                state.styles.insert(property, v.to_string());
            }
            None => {
                state.styles.remove(&property);
            }
        }
        self.journal.push(SurfaceWrite::Style {
            element: element.to_string(),
            property,
            value: value.map(str::to_string),
        });
    }

    fn set_text(&mut self, element: &str, text: &str) {
        self.entry(element).text = Some(text.to_string());
        self.journal.push(SurfaceWrite::Text {
            element: element.to_string(),
            text: text.to_string(),
        });
    }

    fn set_disabled(&mut self, element: &str, disabled: bool) {
        self.entry(element).disabled = disabled;
        self.journal.push(SurfaceWrite::Disabled {
            element: element.to_string(),
            disabled,
        });
    }

    fn focus(&mut self, element: &str) {
        self.focused = Some(element.to_string());
        self.journal.push(SurfaceWrite::Focus {
            element: element.to_string(),
        });
    }

    fn scroll_to_top(&mut self) {
        self.scroll_requests += 1;
        self.journal.push(SurfaceWrite::ScrollToTop);
    }

    fn rect(&self, element: &str) -> Option<Rect> {
        self.rects.get(element).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_and_style_bookkeeping() {
        let mut surface = MemorySurface::new();
        surface.set_class("menu", "active", true);
        surface.set_style("menu", StyleProperty::Opacity, Some("0"));
        assert!(surface.has_class("menu", "active"));
        assert_eq!(surface.style("menu", StyleProperty::Opacity), Some("0"));

        surface.set_class("menu", "active", false);
        surface.set_style("menu", StyleProperty::Opacity, None);
        assert!(!surface.has_class("menu", "active"));
        assert_eq!(surface.style("menu", StyleProperty::Opacity), None);
        assert_eq!(surface.journal().len(), 4);
    }

    #[test]
    fn test_text_history() {
        let mut surface = MemorySurface::new();
        surface.set_text("btn", "Send");
        surface.set_text("other", "x");
        surface.set_text("btn", "Sent!");
        assert_eq!(surface.text_history("btn"), vec!["Send", "Sent!"]);
        assert_eq!(surface.text("btn"), Some("Sent!"));
    }

    #[test]
    fn test_unknown_element_reads() {
        let surface = MemorySurface::new();
        assert!(!surface.has_class("ghost", "active"));
        assert!(!surface.is_disabled("ghost"));
        assert!(surface.rect("ghost").is_none());
    }
}
