//! 询价表单：字段、服务下拉框状态、提交按钮与三种提交方式。

pub mod mailto;
pub mod number;
pub mod submit;

use serde::{Deserialize, Serialize};

use crate::panels::{ElementId, FormSpec};

pub use mailto::{CommandMailComposer, MailComposer, MailFallbacks, MailtoMessage};
pub use number::{FixedInquiryNumber, InquiryNumberSource, RandomInquiryNumbers};
pub use submit::{
    FormEndpointSubmitter, InquiryDispatcher, InquirySubmitter, SubmissionSettings, SubmitOutcome,
    SubmitStrategy,
};

/// 表单提交的字段值，缺失或空白视为未填写
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InquiryFields {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl InquiryFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: &str, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    /// 按表单字段名写入，未知字段返回 false
    pub fn set(&mut self, field: &str, value: impl Into<String>) -> bool {
        let slot = match field {
            "name" => &mut self.name,
            "company" => &mut self.company,
            "email" => &mut self.email,
            "service" => &mut self.service,
            "description" => &mut self.description,
            _ => return false,
        };
        *slot = Some(value.into());
        true
    }

    pub fn name(&self) -> Option<&str> {
        present(&self.name)
    }

    pub fn company(&self) -> Option<&str> {
        present(&self.company)
    }

    pub fn email(&self) -> Option<&str> {
        present(&self.email)
    }

    pub fn service(&self) -> Option<&str> {
        present(&self.service)
    }

    pub fn description(&self) -> Option<&str> {
        present(&self.description)
    }

    /// 浏览器 FormData 的等价形式，空字段以空字符串提交
    pub fn form_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("name", self.name.clone().unwrap_or_default()),
            ("company", self.company.clone().unwrap_or_default()),
            ("email", self.email.clone().unwrap_or_default()),
            ("service", self.service.clone().unwrap_or_default()),
            ("description", self.description.clone().unwrap_or_default()),
        ]
    }
}

/// 提交按钮的显示状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitButton {
    pub element: ElementId,
    pub original_label: String,
    pub label: String,
    pub disabled: bool,
    pub sent: bool,
}

impl SubmitButton {
    pub fn new(element: impl Into<String>, label: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            element: element.into(),
            original_label: label.clone(),
            label,
            disabled: false,
            sent: false,
        }
    }

    pub fn restore(&mut self) {
        self.label = self.original_label.clone();
        self.disabled = false;
        self.sent = false;
    }
}

/// 页面上的一个联系表单
#[derive(Debug, Clone)]
pub struct InquiryForm {
    pub spec: FormSpec,
    pub values: InquiryFields,
    pub service_has_value: bool,
    pub button: SubmitButton,
}

impl InquiryForm {
    pub fn new(spec: FormSpec) -> Self {
        let mut values = InquiryFields::default();
        if let Some(service) = &spec.initial_service {
            values.service = Some(service.clone());
        }
        let service_has_value = values.service().is_some();
        let button = SubmitButton::new(spec.submit_button.clone(), spec.submit_label.clone());
        Self {
            spec,
            values,
            service_has_value,
            button,
        }
    }

    /// 返回服务下拉框是否带有 has-value
    pub fn set_service(&mut self, value: &str) -> bool {
        self.values.service = Some(value.to_string());
        self.service_has_value = !value.is_empty();
        self.service_has_value
    }

    /// 清空输入并去掉 has-value
    pub fn reset(&mut self) {
        self.values = InquiryFields::default();
        self.service_has_value = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_treat_blank_as_missing() {
        let fields = InquiryFields::new()
            .with("name", "Jane")
            .with("company", "   ")
            .with("service", "");
        assert_eq!(fields.name(), Some("Jane"));
        assert_eq!(fields.company(), None);
        assert_eq!(fields.service(), None);
        assert_eq!(fields.email(), None);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let mut fields = InquiryFields::new();
        assert!(!fields.set("phone", "123"));
        assert!(fields.set("email", "jane@example.com"));
        assert_eq!(fields.email(), Some("jane@example.com"));
    }

    #[test]
    fn test_form_pairs_keep_field_order() {
        let fields = InquiryFields::new().with("name", "Jane");
        let pairs = fields.form_pairs();
        let keys: Vec<&str> = pairs.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec!["name", "company", "email", "service", "description"]);
        assert_eq!(pairs[0].1, "Jane");
        assert_eq!(pairs[1].1, "");
    }

    #[test]
    fn test_form_service_has_value() {
        let spec = FormSpec {
            initial_service: Some("mapping".to_string()),
            ..FormSpec::new("form", "btn-submit").with_service_select("select-service")
        };
        let mut form = InquiryForm::new(spec);
        assert!(form.service_has_value);

        assert!(!form.set_service(""));
        assert!(form.set_service("consulting"));

        form.reset();
        assert!(!form.service_has_value);
        assert_eq!(form.values, InquiryFields::default());
    }

    #[test]
    fn test_button_restore() {
        let mut button = SubmitButton::new("btn", "Send");
        button.label = "Sent!".to_string();
        button.disabled = true;
        button.sent = true;
        button.restore();
        assert_eq!(button, SubmitButton::new("btn", "Send"));
    }
}
