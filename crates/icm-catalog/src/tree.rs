//! # Clause Tree
//!
//! An arena of one standard's clauses plus a parent→children index. Built
//! once per request from the flat clause list the catalog store returns, so
//! roll-up code never chases parent pointers through the store.
//!
//! ## Leaf Set
//!
//! Coverage is scored on leaves. When a standard has any sub-clauses
//! (`parent_id != None`) the leaf set is exactly those sub-clauses; when it
//! has none, each top-level clause stands in as its own leaf.

use std::collections::HashMap;

use icm_core::{ClauseId, ClauseOrdering};

use crate::model::Clause;

/// Arena-backed clause hierarchy for a single standard.
#[derive(Debug, Clone, Default)]
pub struct ClauseTree {
    /// Clauses sorted by the requested ordering.
    nodes: Vec<Clause>,
    /// Clause id → arena position.
    index: HashMap<ClauseId, usize>,
    /// Parent clause id → arena positions of its children, in arena order.
    children: HashMap<ClauseId, Vec<usize>>,
    top_level: Vec<usize>,
    sub_clauses: Vec<usize>,
}

impl ClauseTree {
    /// Build the tree, sorting clauses by `ordering`.
    ///
    /// The sort is stable, so clauses with equal numbers keep input order.
    pub fn build(clauses: &[Clause], ordering: ClauseOrdering) -> Self {
        let mut nodes = clauses.to_vec();
        nodes.sort_by(|a, b| ordering.compare(&a.clause_number, &b.clause_number));

        let mut index = HashMap::with_capacity(nodes.len());
        let mut children: HashMap<ClauseId, Vec<usize>> = HashMap::new();
        let mut top_level = Vec::new();
        let mut sub_clauses = Vec::new();

        for (pos, clause) in nodes.iter().enumerate() {
            index.insert(clause.id, pos);
            match clause.parent_id {
                None => top_level.push(pos),
                Some(parent) => {
                    sub_clauses.push(pos);
                    children.entry(parent).or_default().push(pos);
                }
            }
        }

        Self {
            nodes,
            index,
            children,
            top_level,
            sub_clauses,
        }
    }

    /// Look up a clause by id.
    pub fn get(&self, id: ClauseId) -> Option<&Clause> {
        self.index.get(&id).map(|&pos| &self.nodes[pos])
    }

    /// Clauses without a parent, in tree order.
    pub fn top_level(&self) -> impl Iterator<Item = &Clause> + '_ {
        self.top_level.iter().map(move |&pos| &self.nodes[pos])
    }

    /// Clauses with a parent, in tree order.
    pub fn sub_clauses(&self) -> impl Iterator<Item = &Clause> + '_ {
        self.sub_clauses.iter().map(move |&pos| &self.nodes[pos])
    }

    /// Direct children of `parent`, in tree order.
    pub fn children(&self, parent: ClauseId) -> impl Iterator<Item = &Clause> + '_ {
        self.children
            .get(&parent)
            .into_iter()
            .flatten()
            .map(move |&pos| &self.nodes[pos])
    }

    /// Whether any clause has a parent.
    pub fn has_sub_clauses(&self) -> bool {
        !self.sub_clauses.is_empty()
    }

    /// The clauses coverage is scored on.
    pub fn leaves(&self) -> Vec<&Clause> {
        if self.has_sub_clauses() {
            self.sub_clauses().collect()
        } else {
            self.top_level().collect()
        }
    }

    /// Number of clauses in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree holds no clauses.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use icm_core::{ClauseNumber, StandardId};

    fn clause(standard: StandardId, number: &str, parent: Option<ClauseId>) -> Clause {
        Clause {
            id: ClauseId::new(),
            standard_id: standard,
            clause_number: ClauseNumber::new(number).unwrap(),
            title: format!("Clause {number}"),
            description: None,
            parent_id: parent,
        }
    }

    fn numbers<'a>(it: impl Iterator<Item = &'a Clause>) -> Vec<&'a str> {
        it.map(|c| c.clause_number.as_str()).collect()
    }

    #[test]
    fn partitions_top_level_and_sub_clauses() {
        let std_id = StandardId::new();
        let four = clause(std_id, "4", None);
        let five = clause(std_id, "5", None);
        let clauses = vec![
            clause(std_id, "4.2", Some(four.id)),
            five.clone(),
            clause(std_id, "4.1", Some(four.id)),
            four.clone(),
        ];
        let tree = ClauseTree::build(&clauses, ClauseOrdering::Lexicographic);

        assert_eq!(numbers(tree.top_level()), vec!["4", "5"]);
        assert_eq!(numbers(tree.sub_clauses()), vec!["4.1", "4.2"]);
        assert_eq!(numbers(tree.children(four.id)), vec!["4.1", "4.2"]);
        assert_eq!(tree.children(five.id).count(), 0);
        assert_eq!(numbers(tree.leaves().into_iter()), vec!["4.1", "4.2"]);
        assert_eq!(tree.get(four.id).map(|c| c.title.as_str()), Some("Clause 4"));
    }

    #[test]
    fn top_level_clauses_are_leaves_without_sub_clauses() {
        let std_id = StandardId::new();
        let clauses = vec![clause(std_id, "5", None), clause(std_id, "4", None)];
        let tree = ClauseTree::build(&clauses, ClauseOrdering::Lexicographic);
        assert!(!tree.has_sub_clauses());
        assert_eq!(numbers(tree.leaves().into_iter()), vec!["4", "5"]);
    }

    #[test]
    fn ordering_controls_child_order() {
        let std_id = StandardId::new();
        let four = clause(std_id, "4", None);
        let clauses = vec![
            four.clone(),
            clause(std_id, "4.2", Some(four.id)),
            clause(std_id, "4.10", Some(four.id)),
        ];
        let lex = ClauseTree::build(&clauses, ClauseOrdering::Lexicographic);
        assert_eq!(numbers(lex.children(four.id)), vec!["4.10", "4.2"]);
        let natural = ClauseTree::build(&clauses, ClauseOrdering::Natural);
        assert_eq!(numbers(natural.children(four.id)), vec!["4.2", "4.10"]);
    }

    #[test]
    fn empty_tree() {
        let tree = ClauseTree::build(&[], ClauseOrdering::Natural);
        assert!(tree.is_empty());
        assert!(tree.leaves().is_empty());
    }
}
