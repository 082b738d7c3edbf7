use std::collections::{BTreeMap, HashMap, HashSet};

use super::{ElementId, GroupId, Panel, PanelId, Trigger, TriggerId};
use crate::config::layout::Layout;
use crate::infrastructure::error::SiteError;

/// 启动时构建一次的面板/触发器/分组索引
#[derive(Debug, Clone, Default)]
pub struct PanelRegistry {
    panels: BTreeMap<PanelId, Panel>,
    triggers: BTreeMap<TriggerId, Trigger>,
    trigger_of: HashMap<PanelId, TriggerId>,
    groups: BTreeMap<GroupId, Vec<PanelId>>,
    regions: Vec<ElementId>,
    parents: HashMap<ElementId, ElementId>,
}

impl PanelRegistry {
    pub fn from_layout(layout: &Layout) -> Result<Self, SiteError> {
        Self::build(
            layout.panels.clone(),
            layout.triggers.clone(),
            layout.regions.clone(),
            layout.parents.clone(),
        )
    }

    pub fn build(
        panels: Vec<Panel>,
        triggers: Vec<Trigger>,
        regions: Vec<ElementId>,
        parents: HashMap<ElementId, ElementId>,
    ) -> Result<Self, SiteError> {
        let mut registry = PanelRegistry {
            regions,
            parents,
            ..Default::default()
        };

        for panel in panels {
            if registry.panels.contains_key(&panel.id) {
                return Err(SiteError::layout("duplicate panel id", Some(panel.id)));
            }
            registry
                .groups
                .entry(panel.group.clone())
                .or_default()
                .push(panel.id.clone());
            registry.panels.insert(panel.id.clone(), panel);
        }

        for trigger in triggers {
            if registry.triggers.contains_key(&trigger.id) {
                return Err(SiteError::layout("duplicate trigger id", Some(trigger.id)));
            }
            if !registry.panels.contains_key(&trigger.panel) {
                return Err(SiteError::layout(
                    format!("trigger targets unknown panel '{}'", trigger.panel),
                    Some(trigger.id),
                ));
            }
            if let Some(parent) = &trigger.nested_in {
                if !registry.panels.contains_key(parent) {
                    return Err(SiteError::layout(
                        format!("trigger nested in unknown panel '{}'", parent),
                        Some(trigger.id),
                    ));
                }
            }
            if let Some(existing) = registry.trigger_of.get(&trigger.panel) {
                return Err(SiteError::layout(
                    format!("panel '{}' already toggled by '{}'", trigger.panel, existing),
                    Some(trigger.id),
                ));
            }
            registry
                .trigger_of
                .insert(trigger.panel.clone(), trigger.id.clone());
            registry.triggers.insert(trigger.id.clone(), trigger);
        }

        if let Some(orphan) = registry
            .panels
            .keys()
            .find(|id| !registry.trigger_of.contains_key(*id))
        {
            return Err(SiteError::layout("panel has no trigger", Some(orphan.clone())));
        }

        registry.validate_nesting()?;

        Ok(registry)
    }

    /// 嵌套链无环，且同组祖先必须是 sticky
    fn validate_nesting(&self) -> Result<(), SiteError> {
        for panel in self.panels.values() {
            let mut seen = HashSet::new();
            let mut current = self.parent_panel(&panel.id);
            while let Some(ancestor_id) = current {
                if ancestor_id == &panel.id || !seen.insert(ancestor_id.clone()) {
                    return Err(SiteError::layout("nesting cycle", Some(panel.id.clone())));
                }
                if let Some(ancestor) = self.panels.get(ancestor_id) {
                    if ancestor.group == panel.group && !ancestor.sticky {
                        return Err(SiteError::layout(
                            format!(
                                "same-group ancestor '{}' must be sticky",
                                ancestor_id
                            ),
                            Some(panel.id.clone()),
                        ));
                    }
                }
                current = self.parent_panel(ancestor_id);
            }
        }
        Ok(())
    }

    fn parent_panel(&self, panel: &str) -> Option<&PanelId> {
        self.trigger_of
            .get(panel)
            .and_then(|t| self.triggers.get(t))
            .and_then(|t| t.nested_in.as_ref())
    }

    pub fn panel(&self, id: &str) -> Option<&Panel> {
        self.panels.get(id)
    }

    pub fn trigger(&self, id: &str) -> Option<&Trigger> {
        self.triggers.get(id)
    }

    pub fn trigger_for(&self, panel: &str) -> Option<&Trigger> {
        self.trigger_of.get(panel).and_then(|t| self.triggers.get(t))
    }

    pub fn panels(&self) -> impl Iterator<Item = &Panel> {
        self.panels.values()
    }

    pub fn triggers(&self) -> impl Iterator<Item = &Trigger> {
        self.triggers.values()
    }

    pub fn group(&self, id: &str) -> &[PanelId] {
        self.groups.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// 面板的嵌套链，由近到远
    pub fn ancestors(&self, panel: &str) -> Vec<PanelId> {
        let mut chain = Vec::new();
        let mut current = self.parent_panel(panel);
        while let Some(id) = current {
            chain.push(id.clone());
            current = self.parent_panel(id);
        }
        chain
    }

    pub fn is_ancestor(&self, candidate: &str, of: &str) -> bool {
        self.ancestors(of).iter().any(|id| id == candidate)
    }

    /// 从 `target` 自身开始沿父元素向上的链，由内到外
    pub fn element_chain<'a>(&'a self, target: &'a str) -> Vec<&'a str> {
        let mut chain = Vec::new();
        let mut current = Some(target);
        while let Some(element) = current {
            chain.push(element);
            // parents 有环时最多走 parents.len() 步
            if chain.len() > self.parents.len() {
                break;
            }
            current = self.parents.get(element).map(String::as_str);
        }
        chain
    }

    /// `target` 是否位于 `container` 内（含自身）
    pub fn contains(&self, container: &str, target: &str) -> bool {
        self.element_chain(target).contains(&container)
    }

    pub fn in_keep_open_region(&self, target: &str) -> bool {
        self.regions.iter().any(|region| self.contains(region, target))
    }
}
