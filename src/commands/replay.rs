use std::path::Path;

use serde::Serialize;

use crate::config::{Config, Layout};
use crate::controller::PanelController;
use crate::events::EventScript;
use crate::infrastructure::error::SiteError;
use crate::inquiry::{InquiryDispatcher, SubmitOutcome};
use crate::surface::{MemorySurface, SurfaceWrite};

/// 回放结束时的页面状态
#[derive(Debug, Serialize)]
pub struct ReplayReport {
    pub now_ms: u128,
    pub open_panels: Vec<String>,
    pub surface: MemorySurface,
    pub outcomes: Vec<SubmitOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub journal: Option<Vec<SurfaceWrite>>,
}

/// 依次执行脚本中的事件
pub async fn replay(
    layout: &Layout,
    script: EventScript,
    dispatcher: InquiryDispatcher,
    keep_journal: bool,
) -> Result<ReplayReport, SiteError> {
    let mut surface = MemorySurface::new();
    for (element, rect) in script.rects {
        surface.set_rect(element, rect);
    }

    let mut controller = PanelController::new(layout, surface, dispatcher)?;
    let mut outcomes = Vec::new();
    let total = script.events.len();

    for event in script.events {
        tracing::trace!(?event, "replaying event");
        if let Some(outcome) = controller.dispatch(event).await? {
            tracing::info!(?outcome, "submission finished");
            outcomes.push(outcome);
        }
    }
    tracing::debug!(events = total, "replay finished");

    let now_ms = controller.now().as_millis();
    let open_panels = controller.state().open_panels().cloned().collect();
    let surface = controller.into_surface();
    let journal = keep_journal.then(|| surface.journal().to_vec());

    Ok(ReplayReport {
        now_ms,
        open_panels,
        surface,
        outcomes,
        journal,
    })
}

pub async fn run_replay(
    script: &Path,
    keep_journal: bool,
    config: &Config,
) -> anyhow::Result<ReplayReport> {
    let layout = Layout::load(config.layout_path.as_deref())?;
    let script = EventScript::from_file(script)?;
    let dispatcher = config.dispatcher()?;
    Ok(replay(&layout, script, dispatcher, keep_journal).await?)
}
