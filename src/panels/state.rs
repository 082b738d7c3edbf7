use std::collections::BTreeSet;

use super::{PanelId, PanelRegistry};

/// 当前页面的打开面板集合，只在控制器生命周期内存在
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PanelState {
    open: BTreeSet<PanelId>,
}

impl PanelState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self, panel: &str) -> bool {
        self.open.contains(panel)
    }

    pub fn open(&mut self, panel: &str) -> bool {
        self.open.insert(panel.to_string())
    }

    pub fn close(&mut self, panel: &str) -> bool {
        self.open.remove(panel)
    }

    pub fn open_panels(&self) -> impl Iterator<Item = &PanelId> {
        self.open.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }

    /// 分组内打开的非 sticky 面板
    pub fn open_exclusive_in_group<'a>(
        &'a self,
        registry: &'a PanelRegistry,
        group: &'a str,
    ) -> impl Iterator<Item = &'a PanelId> + 'a {
        registry.group(group).iter().filter(move |id| {
            self.is_open(id) && registry.panel(id).map(|p| !p.sticky).unwrap_or(false)
        })
    }
}
