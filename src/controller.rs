//! 面板控制器：互斥开合、外部点击与 Esc 关闭、覆盖页面动画、询价提交。
//!
//! 所有处理函数都在单线程中顺序执行完毕；延后的界面变化登记在 [`Timeline`]
//! 中，由 [`PanelController::advance`] 驱动。

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use crate::config::layout::Layout;
use crate::events::UiEvent;
use crate::infrastructure::error::SiteError;
use crate::inquiry::{
    InquiryDispatcher, InquiryFields, InquiryForm, InquirySubmitter, MailtoMessage, SubmitOutcome,
    SubmitStrategy,
};
use crate::panels::{
    ElementId, FloatingButtonSpec, FormId, OverlaySpec, PanelId, PanelKind, PanelRegistry,
    PanelState, Rect, Viewport,
};
use crate::surface::{StyleProperty, Surface};
use crate::timeline::Timeline;

const ACTIVE_CLASS: &str = "active";
const SHOW_CLASS: &str = "show";
const HAS_VALUE_CLASS: &str = "has-value";
const SENT_CLASS: &str = "sent";

const REVEAL_DELAY: Duration = Duration::from_millis(10);
const FOCUS_DELAY: Duration = Duration::from_millis(100);
const FLOAT_INITIAL_DELAY: Duration = Duration::from_millis(100);
const FLOAT_RESIZE_DELAY: Duration = Duration::from_millis(150);
const LAUNCH_SCALE: f64 = 0.3;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Deferred {
    RevealOverlay(PanelId),
    FocusField(PanelId, ElementId),
    ResetOverlay(PanelId),
    RevertSubmit(FormId),
    RepositionFloat(u64),
}

/// `begin_submit` 的结果
pub enum Submission {
    /// 无需等待网络，已经得出结果
    Finished(SubmitOutcome),
    /// 需要等待接收端响应
    InFlight(InFlightSubmission),
    /// 已显示 Sent 提示，投递交给调用方后台执行，响应不被检查
    Detached(InFlightSubmission),
}

/// 正在发送的询价，不持有控制器借用
pub struct InFlightSubmission {
    form: FormId,
    submitter: Arc<dyn InquirySubmitter>,
    fields: InquiryFields,
}

impl InFlightSubmission {
    pub fn form(&self) -> &str {
        &self.form
    }

    pub async fn send(self) -> SubmissionReply {
        let result = self.submitter.submit(&self.fields).await;
        SubmissionReply {
            form: self.form,
            result,
        }
    }
}

/// 接收端的响应，交回 `finish_submit`
#[derive(Debug)]
pub struct SubmissionReply {
    pub form: FormId,
    pub result: Result<(), SiteError>,
}

pub struct PanelController<S: Surface> {
    registry: PanelRegistry,
    state: PanelState,
    surface: S,
    timeline: Timeline<Deferred>,
    forms: BTreeMap<FormId, InquiryForm>,
    dispatcher: InquiryDispatcher,
    viewport: Viewport,
    floating: Option<FloatingButtonSpec>,
    reposition_generation: u64,
}

impl<S: Surface> PanelController<S> {
    pub fn new(layout: &Layout, surface: S, dispatcher: InquiryDispatcher) -> Result<Self, SiteError> {
        let registry = PanelRegistry::from_layout(layout)?;

        let mut forms = BTreeMap::new();
        for spec in &layout.forms {
            if forms.contains_key(&spec.id) {
                return Err(SiteError::layout("duplicate form id", Some(spec.id.clone())));
            }
            forms.insert(spec.id.clone(), InquiryForm::new(spec.clone()));
        }

        let mut controller = Self {
            registry,
            state: PanelState::new(),
            surface,
            timeline: Timeline::new(),
            forms,
            dispatcher,
            viewport: layout.viewport,
            floating: layout.floating_button.clone(),
            reposition_generation: 0,
        };

        // 预选了服务的下拉框
        let preset: Vec<ElementId> = controller
            .forms
            .values()
            .filter(|f| f.service_has_value)
            .filter_map(|f| f.spec.service_select.clone())
            .collect();
        for select in preset {
            controller.surface.set_class(&select, HAS_VALUE_CLASS, true);
        }

        if controller.floating.is_some() {
            controller
                .timeline
                .schedule(FLOAT_INITIAL_DELAY, Deferred::RepositionFloat(0));
        }

        tracing::debug!(
            panels = controller.registry.panels().count(),
            forms = controller.forms.len(),
            "panel controller ready"
        );
        Ok(controller)
    }

    pub fn registry(&self) -> &PanelRegistry {
        &self.registry
    }

    pub fn state(&self) -> &PanelState {
        &self.state
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn now(&self) -> Duration {
        self.timeline.now()
    }

    pub fn pending_effects(&self) -> usize {
        self.timeline.pending()
    }

    pub fn is_open(&self, panel: &str) -> bool {
        self.state.is_open(panel)
    }

    pub fn is_trigger_active(&self, trigger: &str) -> bool {
        self.registry
            .trigger(trigger)
            .map(|t| self.state.is_open(&t.panel))
            .unwrap_or(false)
    }

    /// 触发器当前应显示的文字，无文字的触发器返回 `None`
    pub fn trigger_label(&self, trigger: &str) -> Option<&str> {
        let trigger = self.registry.trigger(trigger)?;
        let label = trigger.label.as_ref()?;
        if self.state.is_open(&trigger.panel) {
            Some(label.active.as_str())
        } else {
            Some(label.default.as_str())
        }
    }

    pub fn form(&self, id: &str) -> Option<&InquiryForm> {
        self.forms.get(id)
    }

    // ---- 面板开合 ----

    /// 关闭所有打开的非 sticky 面板，`except_group` 中的面板除外
    pub fn close_all(&mut self, except_group: Option<&str>) {
        let to_close: Vec<PanelId> = self
            .state
            .open_panels()
            .filter(|id| match self.registry.panel(id) {
                Some(panel) => !panel.sticky && Some(panel.group.as_str()) != except_group,
                None => false,
            })
            .cloned()
            .collect();

        for id in &to_close {
            self.close_panel(id);
        }

        let idle: Vec<ElementId> = self
            .registry
            .triggers()
            .filter(|t| !self.state.is_open(&t.panel))
            .map(|t| t.id.clone())
            .collect();
        for trigger in idle {
            self.reset_trigger(&trigger);
        }

        if !to_close.is_empty() {
            tracing::debug!(closed = ?to_close, "closed panels");
        }
    }

    /// 切换触发器对应的面板
    pub fn toggle(&mut self, trigger_id: &str) {
        let panel_id = match self.registry.trigger(trigger_id) {
            Some(trigger) => trigger.panel.clone(),
            None => {
                tracing::debug!(trigger = trigger_id, "unknown trigger, ignoring");
                return;
            }
        };

        if self.state.is_open(&panel_id) {
            let nested: Vec<PanelId> = self
                .state
                .open_panels()
                .filter(|id| self.registry.is_ancestor(&panel_id, id))
                .cloned()
                .collect();
            for id in nested {
                self.close_panel(&id);
            }
            self.close_panel(&panel_id);
            return;
        }

        let chain = self.registry.ancestors(&panel_id);
        let to_close: Vec<PanelId> = self
            .state
            .open_panels()
            .filter(|id| !chain.contains(*id))
            .filter(|id| self.registry.panel(id).map(|p| !p.sticky).unwrap_or(false))
            .cloned()
            .collect();
        for id in to_close {
            self.close_panel(&id);
        }

        self.open_panel(&panel_id);
    }

    /// 点击目标不在任何保持打开区域内时关闭全部面板
    pub fn close_on_outside_interaction(&mut self, target: &str) -> bool {
        if self.registry.in_keep_open_region(target) {
            return false;
        }
        self.close_all(None);
        true
    }

    pub fn close_on_escape(&mut self) {
        self.close_all(None);
    }

    fn open_panel(&mut self, id: &str) {
        let Some(panel) = self.registry.panel(id).cloned() else {
            return;
        };
        if !self.state.open(id) {
            return;
        }

        if let Some(trigger) = self.registry.trigger_for(id).cloned() {
            self.surface.set_class(&trigger.id, ACTIVE_CLASS, true);
            if let Some(label) = &trigger.label {
                self.surface.set_text(&trigger.id, &label.active);
            }
        }

        match panel.kind {
            PanelKind::Overlay => {
                let overlay = panel.overlay.clone().unwrap_or_default();
                self.open_overlay(id, &overlay);
            }
            PanelKind::Dropdown | PanelKind::InlineForm => {
                self.surface.set_class(id, ACTIVE_CLASS, true);
            }
        }
        tracing::debug!(panel = id, "opened panel");
    }

    fn close_panel(&mut self, id: &str) {
        let Some(panel) = self.registry.panel(id).cloned() else {
            return;
        };
        if !self.state.close(id) {
            return;
        }

        if let Some(trigger) = self.registry.trigger_for(id).map(|t| t.id.clone()) {
            self.reset_trigger(&trigger);
        }

        match panel.kind {
            PanelKind::Overlay => {
                let overlay = panel.overlay.clone().unwrap_or_default();
                self.close_overlay(id, &overlay);
            }
            PanelKind::Dropdown | PanelKind::InlineForm => {
                self.surface.set_class(id, ACTIVE_CLASS, false);
            }
        }
    }

    fn reset_trigger(&mut self, trigger_id: &str) {
        let Some(trigger) = self.registry.trigger(trigger_id) else {
            return;
        };
        let default_label = trigger.label.as_ref().map(|l| l.default.clone());
        self.surface.set_class(trigger_id, ACTIVE_CLASS, false);
        if let Some(label) = default_label {
            self.surface.set_text(trigger_id, &label);
        }
    }

    // ---- 覆盖页面 ----

    fn open_overlay(&mut self, id: &str, overlay: &OverlaySpec) {
        if let Some(nav) = &overlay.hides {
            self.surface.set_style(nav, StyleProperty::Display, Some("none"));
        }
        self.surface.set_style(id, StyleProperty::Opacity, Some("0"));

        if overlay.launch_from_trigger {
            let origin = self
                .registry
                .trigger_for(id)
                .and_then(|t| self.surface.rect(&t.id));
            if let Some(rect) = origin {
                let transform = launch_transform(rect, self.viewport);
                self.surface
                    .set_style(id, StyleProperty::Transform, Some(transform.as_str()));
            }
        }

        self.surface.set_style(id, StyleProperty::Display, Some("flex"));
        self.surface.set_class(id, SHOW_CLASS, false);
        self.surface.scroll_to_top();
        self.timeline
            .schedule(REVEAL_DELAY, Deferred::RevealOverlay(id.to_string()));
    }

    fn close_overlay(&mut self, id: &str, overlay: &OverlaySpec) {
        self.surface.set_class(id, SHOW_CLASS, false);
        if overlay.close_delay_ms == 0 {
            self.reset_overlay_style(id);
        } else {
            self.timeline.schedule(
                Duration::from_millis(overlay.close_delay_ms),
                Deferred::ResetOverlay(id.to_string()),
            );
        }
        if let Some(nav) = &overlay.hides {
            self.surface.set_style(nav, StyleProperty::Display, Some("flex"));
        }
        self.surface.scroll_to_top();
    }

    fn reset_overlay_style(&mut self, id: &str) {
        self.surface.set_style(id, StyleProperty::Display, Some("none"));
        self.surface.set_style(id, StyleProperty::Opacity, Some("0"));
        self.surface.set_style(id, StyleProperty::Transform, None);
    }

    // ---- 延后任务 ----

    /// 推进时间并执行期间到期的延后任务
    pub fn advance(&mut self, elapsed: Duration) {
        let until = self.timeline.now() + elapsed;
        while let Some(effect) = self.timeline.pop_due(until) {
            self.apply(effect);
        }
        self.timeline.set_now(until);
    }

    fn apply(&mut self, effect: Deferred) {
        match effect {
            Deferred::RevealOverlay(id) => {
                // 在 10ms 内又被关闭时不再显示
                if !self.state.is_open(&id) {
                    return;
                }
                self.surface.set_class(&id, SHOW_CLASS, true);
                let focus = self
                    .registry
                    .panel(&id)
                    .and_then(|p| p.overlay.as_ref())
                    .and_then(|o| o.focus_field.clone());
                if let Some(field) = focus {
                    self.timeline
                        .schedule(FOCUS_DELAY, Deferred::FocusField(id, field));
                }
            }
            Deferred::FocusField(panel, field) => {
                if self.state.is_open(&panel) {
                    self.surface.focus(&field);
                }
            }
            Deferred::ResetOverlay(id) => {
                // 关闭动画期间重新打开时保留新状态
                if self.state.is_open(&id) {
                    return;
                }
                self.reset_overlay_style(&id);
            }
            Deferred::RevertSubmit(form) => self.restore_button(&form),
            Deferred::RepositionFloat(generation) => {
                if generation == self.reposition_generation {
                    self.reposition_floating_button();
                }
            }
        }
    }

    fn reposition_floating_button(&mut self) {
        let Some(floating) = self.floating.clone() else {
            return;
        };
        let Some(footer) = self.surface.rect(&floating.footer) else {
            return;
        };
        let bottom = self.viewport.height - footer.top;
        self.surface.set_style(
            &floating.element,
            StyleProperty::Bottom,
            Some(format!("{}px", bottom).as_str()),
        );
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.reposition_generation += 1;
        self.timeline.schedule(
            FLOAT_RESIZE_DELAY,
            Deferred::RepositionFloat(self.reposition_generation),
        );
    }

    // ---- 表单 ----

    pub fn set_service_value(&mut self, form_id: &str, value: &str) {
        let Some(form) = self.forms.get_mut(form_id) else {
            tracing::debug!(form = form_id, "unknown form, ignoring");
            return;
        };
        let has_value = form.set_service(value);
        if let Some(select) = form.spec.service_select.clone() {
            self.surface.set_class(&select, HAS_VALUE_CLASS, has_value);
        }
    }

    pub fn set_field(&mut self, form_id: &str, field: &str, value: &str) {
        if field == "service" {
            self.set_service_value(form_id, value);
            return;
        }
        match self.forms.get_mut(form_id) {
            Some(form) => {
                if !form.values.set(field, value) {
                    tracing::debug!(form = form_id, field, "unknown field, ignoring");
                }
            }
            None => tracing::debug!(form = form_id, "unknown form, ignoring"),
        }
    }

    fn reset_form(&mut self, form_id: &str) {
        let Some(form) = self.forms.get_mut(form_id) else {
            return;
        };
        form.reset();
        if let Some(select) = form.spec.service_select.clone() {
            self.surface.set_class(&select, HAS_VALUE_CLASS, false);
        }
    }

    fn disable_button(&mut self, form_id: &str) {
        let Some(form) = self.forms.get_mut(form_id) else {
            return;
        };
        form.button.disabled = true;
        let element = form.button.element.clone();
        self.surface.set_disabled(&element, true);
    }

    fn restore_button(&mut self, form_id: &str) {
        let Some(form) = self.forms.get_mut(form_id) else {
            return;
        };
        form.button.restore();
        let element = form.button.element.clone();
        let label = form.button.label.clone();
        self.surface.set_text(&element, &label);
        self.surface.set_class(&element, SENT_CLASS, false);
        self.surface.set_disabled(&element, false);
    }

    /// 清空表单，显示 Sent 提示并登记恢复
    fn show_sent(&mut self, form_id: &str) {
        self.reset_form(form_id);
        let sent_label = self.dispatcher.settings.sent_label.clone();
        let Some(form) = self.forms.get_mut(form_id) else {
            return;
        };
        form.button.label = sent_label.clone();
        form.button.sent = true;
        form.button.disabled = true;
        let element = form.button.element.clone();
        self.surface.set_text(&element, &sent_label);
        self.surface.set_class(&element, SENT_CLASS, true);
        self.surface.set_disabled(&element, true);
        self.timeline.schedule(
            self.dispatcher.settings.sent_duration,
            Deferred::RevertSubmit(form_id.to_string()),
        );
    }

    // ---- 询价提交 ----

    /// 同步部分：按配置的方式处理，需要等待网络时返回 `InFlight`
    pub fn begin_submit(
        &mut self,
        form_id: &str,
        values: InquiryFields,
    ) -> Result<Submission, SiteError> {
        if !self.forms.contains_key(form_id) {
            tracing::debug!(form = form_id, "unknown form, ignoring submit");
            return Ok(Submission::Finished(SubmitOutcome::Skipped));
        }

        match self.dispatcher.strategy() {
            SubmitStrategy::Endpoint => {
                let submitter = self.dispatcher.submitter()?;
                self.disable_button(form_id);
                Ok(Submission::InFlight(InFlightSubmission {
                    form: form_id.to_string(),
                    submitter,
                    fields: values,
                }))
            }
            SubmitStrategy::Mailto => {
                let number = self.dispatcher.next_inquiry_number();
                let settings = &self.dispatcher.settings;
                let uri = MailtoMessage::compose(&settings.mail_to, number, &values, &settings.fallbacks)
                    .to_uri();

                if let Err(e) = self.dispatcher.composer()?.compose(&uri) {
                    tracing::warn!(form = form_id, error = %e, "mail composer failed");
                    return Ok(Submission::Finished(SubmitOutcome::Reverted {
                        reason: e.to_string(),
                    }));
                }
                tracing::info!(form = form_id, inquiry = number, "inquiry handed to mail composer");
                self.reset_form(form_id);
                Ok(Submission::Finished(SubmitOutcome::Composed { uri }))
            }
            SubmitStrategy::HiddenFrame => {
                let submitter = self.dispatcher.submitter()?;
                self.show_sent(form_id);
                Ok(Submission::Detached(InFlightSubmission {
                    form: form_id.to_string(),
                    submitter,
                    fields: values,
                }))
            }
        }
    }

    /// 应用接收端的响应
    pub fn finish_submit(&mut self, reply: SubmissionReply) -> SubmitOutcome {
        match reply.result {
            Ok(()) => {
                self.show_sent(&reply.form);
                SubmitOutcome::Sent
            }
            Err(e) => {
                tracing::warn!(form = %reply.form, error = %e, "inquiry submission failed");
                self.restore_button(&reply.form);
                SubmitOutcome::Reverted {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// 提交询价并等待结果
    pub async fn submit_inquiry(
        &mut self,
        form_id: &str,
        values: InquiryFields,
    ) -> Result<SubmitOutcome, SiteError> {
        match self.begin_submit(form_id, values)? {
            Submission::Finished(outcome) => Ok(outcome),
            Submission::InFlight(in_flight) => {
                let reply = in_flight.send().await;
                Ok(self.finish_submit(reply))
            }
            Submission::Detached(in_flight) => {
                match tokio::runtime::Handle::try_current() {
                    Ok(runtime) => {
                        runtime.spawn(in_flight.send());
                    }
                    // 不在 tokio 运行时中时就地等待，结果同样丢弃
                    Err(_) => {
                        in_flight.send().await;
                    }
                }
                Ok(SubmitOutcome::Sent)
            }
        }
    }

    // ---- 事件分发 ----

    /// 从点击目标向上找到的第一个触发器，即最内层的触发器
    fn trigger_containing(&self, target: &str) -> Option<String> {
        self.registry
            .element_chain(target)
            .into_iter()
            .find(|element| self.registry.trigger(element).is_some())
            .map(str::to_string)
    }

    pub async fn dispatch(&mut self, event: UiEvent) -> Result<Option<SubmitOutcome>, SiteError> {
        match event {
            UiEvent::Click { target } => match self.trigger_containing(&target) {
                // 触发器点击不再冒泡到文档
                Some(trigger) => self.toggle(&trigger),
                None => {
                    self.close_on_outside_interaction(&target);
                }
            },
            UiEvent::Key { key } => {
                if UiEvent::is_escape(&key) {
                    self.close_on_escape();
                }
            }
            UiEvent::ServiceChanged { form, value } => self.set_service_value(&form, &value),
            UiEvent::FieldInput { form, field, value } => self.set_field(&form, &field, &value),
            UiEvent::Submit { form } => {
                let values = match self.forms.get(&form) {
                    Some(f) => f.values.clone(),
                    None => InquiryFields::default(),
                };
                return self.submit_inquiry(&form, values).await.map(Some);
            }
            UiEvent::Resize { width, height } => self.resize(Viewport { width, height }),
            UiEvent::Advance { ms } => self.advance(Duration::from_millis(ms)),
        }
        Ok(None)
    }
}

/// 从触发按钮中心缩放到视口中心的起始变换
pub fn launch_transform(origin: Rect, viewport: Viewport) -> String {
    let (bx, by) = origin.center();
    let (vx, vy) = viewport.center();
    format!(
        "translate({}px, {}px) scale({})",
        bx - vx,
        by - vy,
        LAUNCH_SCALE
    )
}
