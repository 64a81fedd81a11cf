//! Lineage - parent/child genealogy, grouped by family name
//!
//! Independent of the colony's family rosters: a character appears here once
//! registered under a family name, and stays (as an ancestor) after it leaves
//! the world. Both sides share only [`CharacterId`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::components::CharacterId;

/// Which parent slot a link fills
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParentRole {
    Father,
    Mother,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineageNode {
    pub character: CharacterId,
    pub father: Option<CharacterId>,
    pub mother: Option<CharacterId>,
    pub children: Vec<CharacterId>,
    /// Tree-wide registration sequence number, used for tie-breaks
    pub registered: u64,
}

impl LineageNode {
    fn new(character: CharacterId, registered: u64) -> Self {
        Self {
            character,
            father: None,
            mother: None,
            children: Vec::new(),
            registered,
        }
    }
}

/// Genealogy registry (singleton, stored in engine)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FamilyTree {
    families: BTreeMap<String, Vec<LineageNode>>,
    next_registration: u64,
}

impl FamilyTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a character as a member of `family`.
    ///
    /// No-op for a blank family name or a character already in that family.
    pub fn register_character(&mut self, character: CharacterId, family: &str) -> bool {
        let family = family.trim();
        if family.is_empty() {
            return false;
        }
        let nodes = self.families.entry(family.to_string()).or_default();
        if nodes.iter().any(|n| n.character == character) {
            return false;
        }
        nodes.push(LineageNode::new(character, self.next_registration));
        self.next_registration += 1;
        true
    }

    pub fn family(&self, name: &str) -> &[LineageNode] {
        self.families.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn node(&self, character: CharacterId) -> Option<&LineageNode> {
        self.families
            .values()
            .flatten()
            .find(|n| n.character == character)
    }

    fn node_mut(&mut self, character: CharacterId) -> Option<&mut LineageNode> {
        self.families
            .values_mut()
            .flatten()
            .find(|n| n.character == character)
    }

    /// Link `child` to `parent`. Both must already be registered (in any family).
    pub fn add_child(&mut self, parent: CharacterId, child: CharacterId, role: ParentRole) -> bool {
        if parent == child || self.node(parent).is_none() || self.node(child).is_none() {
            return false;
        }
        if let Some(node) = self.node_mut(child) {
            match role {
                ParentRole::Father => node.father = Some(parent),
                ParentRole::Mother => node.mother = Some(parent),
            }
        }
        if let Some(node) = self.node_mut(parent) {
            if !node.children.contains(&child) {
                node.children.push(child);
            }
        }
        true
    }

    /// Oldest living member of a family, earliest registration on ties.
    ///
    /// `age_of` returns `None` for characters no longer in the world.
    pub fn heir<F>(&self, family: &str, age_of: F) -> Option<CharacterId>
    where
        F: Fn(CharacterId) -> Option<u32>,
    {
        self.family(family)
            .iter()
            .filter_map(|node| age_of(node.character).map(|age| (age, node)))
            .min_by(|(age_a, a), (age_b, b)| {
                age_b
                    .cmp(age_a)
                    .then_with(|| a.registered.cmp(&b.registered))
            })
            .map(|(_, node)| node.character)
    }
}

#[cfg(test)]
mod tests {
    use super::*;


    #[test]
    fn test_register_requires_family_name() {
        let mut tree = FamilyTree::new();
        assert!(!tree.register_character(CharacterId(1), "  "));
        assert!(tree.register_character(CharacterId(2), "Vale"));
        assert!(!tree.register_character(CharacterId(2), "Vale"));
        assert_eq!(tree.family("Vale").len(), 1);
        assert!(tree.family("Nobody").is_empty());
    }

    #[test]
    fn test_add_child_links_both_sides() {
        let mut tree = FamilyTree::new();
        tree.register_character(CharacterId(1), "Vale");
        tree.register_character(CharacterId(2), "Vale");

        assert!(tree.add_child(CharacterId(1), CharacterId(2), ParentRole::Mother));
        assert!(tree.add_child(CharacterId(1), CharacterId(2), ParentRole::Mother));
        assert_eq!(tree.node(CharacterId(2)).unwrap().mother, Some(CharacterId(1)));
        assert_eq!(tree.node(CharacterId(1)).unwrap().children, vec![CharacterId(2)]);

        assert!(!tree.add_child(CharacterId(1), CharacterId(9), ParentRole::Father));
        assert!(!tree.add_child(CharacterId(1), CharacterId(1), ParentRole::Father));
    }

    #[test]
    fn test_heir_is_oldest_living() {
        let mut tree = FamilyTree::new();
        for id in 1..=4 {
            tree.register_character(CharacterId(id), "Vale");
        }
        let ages = |id: CharacterId| match id.0 {
            1 => None, // departed
            2 => Some(40),
            3 => Some(55),
            4 => Some(55),
            _ => None,
        };
        // 3 and 4 tie on age; 3 registered first
        assert_eq!(tree.heir("Vale", ages), Some(CharacterId(3)));
        assert_eq!(tree.heir("Vale", |_| None), None);
        assert_eq!(tree.heir("Nobody", ages), None);
    }
}
