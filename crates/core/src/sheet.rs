use crate::{
    EventRecorder, GroupId, Lineup, LineupError, ListenerId, NullView, OptionView, PickerId,
    RngState, SequenceId, SheetConfig,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SheetError {
    #[error("unknown role {0}")]
    UnknownRole(String),
    #[error("unknown scheme {0}")]
    UnknownScheme(String),
    #[error("unknown slot {0}")]
    UnknownSlot(String),
    #[error("no player pool for role {0}")]
    MissingPool(String),
    #[error("role {0} is configured twice")]
    DuplicateRole(String),
    #[error("role {0} has no slots")]
    EmptyRole(String),
    #[error("slot label {0} is used twice")]
    DuplicateSlot(String),
    #[error("scheme {scheme} names unknown role {role}")]
    SchemeUnknownRole { scheme: String, role: String },
    #[error("scheme {scheme} asks for {requested} {role} starters but only {available} exist")]
    SchemeExceedsSlots {
        scheme: String,
        role: String,
        requested: usize,
        available: usize,
    },
    #[error("role {role} has no slot at position {position}")]
    NoSuchPosition { role: String, position: usize },
    #[error("role {0} has no substitute slots")]
    NoSubstitutes(String),
    #[error("lineup error: {0}")]
    Lineup(#[from] LineupError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotKind {
    Starter,
    Substitute,
}

#[derive(Debug, Clone, Copy)]
pub struct SlotSpec<'a> {
    pub role: &'a str,
    pub kind: SlotKind,
    pub position: usize,
    pub label: &'a str,
}

#[derive(Debug, Clone)]
pub struct RoleSlots {
    pub id: String,
    pub label: String,
    pub group: GroupId,
    pub starters: Vec<PickerId>,
    pub substitutes: Vec<PickerId>,
    pub sequence: Option<SequenceId>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SlotSummary {
    pub label: String,
    pub role: String,
    pub kind: SlotKind,
    pub position: usize,
    pub active: bool,
    pub next_fillable: bool,
    pub selection: Option<String>,
    pub offered: Vec<String>,
}

pub fn slot_label(role: &str, kind: SlotKind, position: usize) -> String {
    match kind {
        SlotKind::Starter => format!("{role}{}", position + 1),
        SlotKind::Substitute => format!("{role}-S{}", position + 1),
    }
}

fn check_layout(config: &SheetConfig) -> Result<(), SheetError> {
    let mut ids = HashSet::new();
    let mut labels = HashSet::new();
    for rule in &config.roles {
        if !ids.insert(rule.id.to_ascii_lowercase()) {
            return Err(SheetError::DuplicateRole(rule.id.clone()));
        }
        if rule.starter_slots + rule.substitute_slots == 0 {
            return Err(SheetError::EmptyRole(rule.id.clone()));
        }
        let starters = (0..rule.starter_slots).map(|position| (SlotKind::Starter, position));
        let substitutes =
            (0..rule.substitute_slots).map(|position| (SlotKind::Substitute, position));
        for (kind, position) in starters.chain(substitutes) {
            let label = slot_label(&rule.id, kind, position);
            if !labels.insert(label.to_ascii_lowercase()) {
                return Err(SheetError::DuplicateSlot(label));
            }
        }
    }
    Ok(())
}

/// A full team sheet: one dealing group per role over that role's players,
/// starter slots, and a substitute sequence per role.
#[derive(Debug)]
pub struct TeamSheet<T> {
    config: SheetConfig,
    lineup: Lineup<T>,
    roles: Vec<RoleSlots>,
    scheme: Option<String>,
}

impl<T> TeamSheet<T> {
    pub fn new<F>(
        config: SheetConfig,
        mut pools: BTreeMap<String, Vec<T>>,
        mut views: F,
    ) -> Result<Self, SheetError>
    where
        F: FnMut(&SlotSpec<'_>) -> Box<dyn OptionView<T>>,
    {
        check_layout(&config)?;
        let mut lineup = Lineup::new();
        let mut roles: Vec<RoleSlots> = Vec::with_capacity(config.roles.len());
        for rule in &config.roles {
            let pool = pools
                .remove(&rule.id)
                .ok_or_else(|| SheetError::MissingPool(rule.id.clone()))?;
            let mut add = |kind: SlotKind, position: usize| {
                let label = slot_label(&rule.id, kind, position);
                let view = views(&SlotSpec {
                    role: &rule.id,
                    kind,
                    position,
                    label: &label,
                });
                lineup.add_picker(label, view)
            };
            let starters: Vec<PickerId> = (0..rule.starter_slots)
                .map(|position| add(SlotKind::Starter, position))
                .collect();
            let substitutes: Vec<PickerId> = (0..rule.substitute_slots)
                .map(|position| add(SlotKind::Substitute, position))
                .collect();
            let members: Vec<PickerId> = starters.iter().chain(&substitutes).copied().collect();
            let group = lineup.initialize_group(&members, pool)?;
            let sequence = if substitutes.is_empty() {
                None
            } else {
                Some(lineup.create_sequence(&substitutes)?)
            };
            roles.push(RoleSlots {
                id: rule.id.clone(),
                label: rule.label.clone(),
                group,
                starters,
                substitutes,
                sequence,
            });
        }
        let default_scheme = config.default_scheme.clone();
        let mut sheet = Self {
            config,
            lineup,
            roles,
            scheme: None,
        };
        if let Some(name) = default_scheme {
            sheet.apply_scheme(&name)?;
        }
        Ok(sheet)
    }

    pub fn headless(
        config: SheetConfig,
        pools: BTreeMap<String, Vec<T>>,
    ) -> Result<Self, SheetError> {
        Self::new(config, pools, |_| Box::new(NullView))
    }

    pub fn config(&self) -> &SheetConfig {
        &self.config
    }

    pub fn lineup(&self) -> &Lineup<T> {
        &self.lineup
    }

    pub fn lineup_mut(&mut self) -> &mut Lineup<T> {
        &mut self.lineup
    }

    pub fn roles(&self) -> &[RoleSlots] {
        &self.roles
    }

    pub fn role(&self, id: &str) -> Result<&RoleSlots, SheetError> {
        self.roles
            .iter()
            .find(|role| role.id.eq_ignore_ascii_case(id))
            .ok_or_else(|| SheetError::UnknownRole(id.to_string()))
    }

    pub fn active_scheme(&self) -> Option<&str> {
        self.scheme.as_deref()
    }

    pub fn slot(&self, label: &str) -> Result<PickerId, SheetError> {
        self.lineup
            .pickers()
            .iter()
            .find(|picker| picker.label().eq_ignore_ascii_case(label))
            .map(|picker| picker.id())
            .ok_or_else(|| SheetError::UnknownSlot(label.to_string()))
    }

    pub fn starter(&self, role: &str, position: usize) -> Result<PickerId, SheetError> {
        let slots = self.role(role)?;
        slots
            .starters
            .get(position)
            .copied()
            .ok_or_else(|| SheetError::NoSuchPosition {
                role: slots.id.clone(),
                position,
            })
    }

    pub fn substitute(&self, role: &str, position: usize) -> Result<PickerId, SheetError> {
        let slots = self.role(role)?;
        if slots.substitutes.is_empty() {
            return Err(SheetError::NoSubstitutes(slots.id.clone()));
        }
        slots
            .substitutes
            .get(position)
            .copied()
            .ok_or_else(|| SheetError::NoSuchPosition {
                role: slots.id.clone(),
                position,
            })
    }

    /// Switches formation. Starter slots beyond the scheme's count are
    /// cleared and deactivated; the rest are activated. Every role is
    /// checked before any slot changes.
    pub fn apply_scheme(&mut self, name: &str) -> Result<(), SheetError> {
        let scheme = self
            .config
            .scheme_rule(name)
            .ok_or_else(|| SheetError::UnknownScheme(name.to_string()))?;
        if let Some(role) = scheme
            .starters
            .keys()
            .find(|role| self.config.role_rule(role).is_none())
        {
            return Err(SheetError::SchemeUnknownRole {
                scheme: name.to_string(),
                role: role.clone(),
            });
        }
        let mut plan = Vec::with_capacity(self.roles.len());
        for role in &self.roles {
            let requested = self
                .config
                .starters_for(name, &role.id)
                .unwrap_or(role.starters.len());
            if requested > role.starters.len() {
                return Err(SheetError::SchemeExceedsSlots {
                    scheme: name.to_string(),
                    role: role.id.clone(),
                    requested,
                    available: role.starters.len(),
                });
            }
            plan.push(requested);
        }
        for (role, active_count) in self.roles.iter().zip(plan) {
            for (position, starter) in role.starters.iter().enumerate() {
                self.lineup.set_active(*starter, position < active_count)?;
            }
        }
        log::debug!("scheme {name} applied");
        self.scheme = Some(name.to_string());
        Ok(())
    }

    pub fn promote(
        &mut self,
        role: &str,
        substitute: usize,
        starter: usize,
    ) -> Result<(), SheetError> {
        let from = self.substitute(role, substitute)?;
        let to = self.starter(role, starter)?;
        self.lineup.promote(from, to)?;
        Ok(())
    }

    pub fn swap(&mut self, role: &str, first: usize, second: usize) -> Result<(), SheetError> {
        let first = self.substitute(role, first)?;
        let second = self.substitute(role, second)?;
        self.lineup.swap(first, second)?;
        Ok(())
    }

    /// Fills every empty active starter and then each substitute frontier
    /// with a random offered player. Returns how many picks were made.
    pub fn autofill(&mut self, rng: &mut RngState) -> Result<usize, SheetError> {
        let mut picks = 0;
        for role in &self.roles {
            for starter in &role.starters {
                let picker = self.lineup.picker(*starter)?;
                if !picker.is_active() || picker.is_filled() {
                    continue;
                }
                if let Some(position) = rng.choose_index(picker.mask().len()) {
                    self.lineup.pick(*starter, position)?;
                    picks += 1;
                }
            }
            let Some(sequence) = role.sequence else {
                continue;
            };
            while let Some(next) = self.lineup.next_fillable(sequence)? {
                let offered = self.lineup.mask(next)?.len();
                let Some(position) = rng.choose_index(offered) else {
                    break;
                };
                self.lineup.pick(next, position)?;
                picks += 1;
            }
        }
        log::debug!("autofill made {picks} picks (seed {})", rng.seed());
        Ok(picks)
    }

    pub fn observe_all(&mut self, recorder: &EventRecorder) -> Result<Vec<ListenerId>, SheetError> {
        let mut ids = Vec::new();
        for role in &self.roles {
            for picker in role.starters.iter().chain(&role.substitutes) {
                ids.push(
                    self.lineup
                        .attach_listener(*picker, Box::new(recorder.clone()))?,
                );
            }
            if let Some(sequence) = role.sequence {
                ids.push(
                    self.lineup
                        .attach_sequence_listener(sequence, Box::new(recorder.clone()))?,
                );
            }
        }
        Ok(ids)
    }

    pub fn label_of(&self, picker: PickerId) -> Option<&str> {
        self.lineup
            .picker(picker)
            .ok()
            .map(|picker| picker.label())
    }
}

impl<T: fmt::Display> TeamSheet<T> {
    pub fn summaries(&self) -> Vec<SlotSummary> {
        let mut out = Vec::with_capacity(self.lineup.pickers().len());
        for role in &self.roles {
            let next = role
                .sequence
                .and_then(|sequence| self.lineup.next_fillable(sequence).ok().flatten());
            let slots = role
                .starters
                .iter()
                .enumerate()
                .map(|(position, id)| (SlotKind::Starter, position, *id))
                .chain(
                    role.substitutes
                        .iter()
                        .enumerate()
                        .map(|(position, id)| (SlotKind::Substitute, position, *id)),
                );
            for (kind, position, id) in slots {
                let Ok(picker) = self.lineup.picker(id) else {
                    continue;
                };
                out.push(SlotSummary {
                    label: picker.label().to_string(),
                    role: role.id.clone(),
                    kind,
                    position,
                    active: picker.is_active(),
                    next_fillable: next == Some(id),
                    selection: picker.selection().map(ToString::to_string),
                    offered: picker
                        .offered()
                        .into_iter()
                        .map(ToString::to_string)
                        .collect(),
                });
            }
        }
        out
    }
}
