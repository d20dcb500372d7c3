//! Towers and rungs.
//!
//! One `Node` exists per distinct value and owns its tower: the rung ids it
//! occupies on levels `0..height`. Every occurrence of the value is a rung on
//! level 0 holding its own copy of the value as inserted. The first
//! occurrence is the `Primary` one and is the rung recorded in `tower[0]`;
//! later occurrences are `Duplicate` rungs that share the node but never climb
//! above level 0. Rungs above level 0 are `Upper` and read their value through
//! the tower base.

use crate::arena::Idx;

pub(crate) type NodeId = Idx;
pub(crate) type RungId = Idx;

#[derive(Debug, Clone)]
pub(crate) enum Role<T> {
    Primary(T),
    Duplicate(T),
    Upper,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct Node {
    pub(crate) tower: Vec<RungId>,
}

impl Node {
    pub(crate) fn height(&self) -> usize {
        self.tower.len()
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Rung<T> {
    pub(crate) next: Option<RungId>,
    /// Back-link only, never owning.
    pub(crate) prev: Option<RungId>,
    pub(crate) level: usize,
    pub(crate) node: NodeId,
    pub(crate) role: Role<T>,
}

impl<T> Rung<T> {
    fn new(node: NodeId, level: usize, role: Role<T>) -> Self {
        Self {
            next: None,
            prev: None,
            level,
            node,
            role,
        }
    }

    pub(crate) fn primary(node: NodeId, value: T) -> Self {
        Self::new(node, 0, Role::Primary(value))
    }

    pub(crate) fn duplicate(node: NodeId, value: T) -> Self {
        Self::new(node, 0, Role::Duplicate(value))
    }

    pub(crate) fn upper(node: NodeId, level: usize) -> Self {
        Self::new(node, level, Role::Upper)
    }

    /// The occurrence's own value; `None` above level 0.
    pub(crate) fn value(&self) -> Option<&T> {
        match &self.role {
            Role::Primary(value) | Role::Duplicate(value) => Some(value),
            Role::Upper => None,
        }
    }

    pub(crate) fn is_duplicate(&self) -> bool {
        matches!(self.role, Role::Duplicate(_))
    }

    /// Turns a duplicate into the primary occurrence, keeping its value.
    pub(crate) fn promote(&mut self) {
        if let Role::Duplicate(_) = self.role {
            if let Role::Duplicate(value) = std::mem::replace(&mut self.role, Role::Upper) {
                self.role = Role::Primary(value);
            }
        }
    }
}
