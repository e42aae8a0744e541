//! The state tree arena.

use super::error::DeclarationError;
use super::node::{check, StateNode, Verification};
use crate::core::{Event, StateId, StateIndex};
use std::collections::HashMap;
use stillwater::validation::Validation;

/// Immutable arena of state nodes with O(1) navigation.
///
/// Built once by [`StateTreeBuilder`](crate::builder::StateTreeBuilder) and
/// read-only afterwards, so one tree can be shared by many machine
/// instances behind an `Arc`.
#[derive(Clone, Debug)]
pub struct StateTree<S, E> {
    nodes: Vec<StateNode<S, E>>,
    lookup: HashMap<S, StateIndex>,
    root: StateIndex,
    document_order: Vec<StateIndex>,
}

impl<S: StateId, E: Event> StateTree<S, E> {
    /// Assemble a tree from linked nodes. Callers verify afterwards.
    pub(crate) fn from_nodes(mut nodes: Vec<StateNode<S, E>>, root: StateIndex) -> Self {
        let regions: Vec<bool> = nodes
            .iter()
            .map(|node| {
                node.parent
                    .and_then(|parent| nodes.get(parent.0))
                    .is_some_and(|parent| parent.is_parallel())
            })
            .collect();
        for (node, region) in nodes.iter_mut().zip(regions) {
            node.region = region;
        }

        let lookup = nodes
            .iter()
            .map(|node| (node.id.clone(), node.index))
            .collect();

        let mut document_order = Vec::with_capacity(nodes.len());
        let mut stack = vec![root];
        while let Some(index) = stack.pop() {
            document_order.push(index);
            if let Some(node) = nodes.get(index.0) {
                stack.extend(node.children.iter().rev().copied());
            }
        }

        Self {
            nodes,
            lookup,
            root,
            document_order,
        }
    }

    pub fn root(&self) -> StateIndex {
        self.root
    }

    pub fn root_node(&self) -> &StateNode<S, E> {
        self.node(self.root)
    }

    /// Node at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` was issued by a different tree.
    pub fn node(&self, index: StateIndex) -> &StateNode<S, E> {
        &self.nodes[index.0]
    }

    pub fn get(&self, id: &S) -> Option<&StateNode<S, E>> {
        self.index_of(id).map(|index| self.node(index))
    }

    pub fn index_of(&self, id: &S) -> Option<StateIndex> {
        self.lookup.get(id).copied()
    }

    pub fn id(&self, index: StateIndex) -> &S {
        &self.node(index).id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in arena (declaration) order.
    pub fn nodes(&self) -> impl Iterator<Item = &StateNode<S, E>> {
        self.nodes.iter()
    }

    /// Depth-first pre-order over the tree, children in declaration order.
    pub fn document_order(&self) -> &[StateIndex] {
        &self.document_order
    }

    pub fn parent(&self, index: StateIndex) -> Option<StateIndex> {
        self.node(index).parent
    }

    /// Dotted id chain from the root down to `index`, e.g. `Root.P.R1`.
    pub fn path(&self, index: StateIndex) -> String {
        self.path_from(None, index)
            .into_iter()
            .map(|state| self.id(state).name())
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Whether `ancestor` is `index` or lies on its parent chain.
    pub fn is_ancestor_or_self(&self, ancestor: StateIndex, index: StateIndex) -> bool {
        let target_level = self.node(ancestor).level;
        let mut current = index;
        while self.node(current).level > target_level {
            match self.node(current).parent {
                Some(parent) => current = parent,
                None => return false,
            }
        }
        current == ancestor
    }

    /// Whether `descendant` lies strictly below `ancestor`.
    pub fn is_descendant(&self, descendant: StateIndex, ancestor: StateIndex) -> bool {
        descendant != ancestor && self.is_ancestor_or_self(ancestor, descendant)
    }

    /// Deepest state that is an ancestor-or-self of both `a` and `b`.
    pub fn lca(&self, a: StateIndex, b: StateIndex) -> StateIndex {
        let (mut a, mut b) = (a, b);
        while self.node(a).level > self.node(b).level {
            a = self.parent(a).unwrap_or(self.root);
        }
        while self.node(b).level > self.node(a).level {
            b = self.parent(b).unwrap_or(self.root);
        }
        while a != b {
            match (self.parent(a), self.parent(b)) {
                (Some(pa), Some(pb)) => {
                    a = pa;
                    b = pb;
                }
                _ => return self.root,
            }
        }
        a
    }

    /// States strictly below `ancestor` down to and including `descendant`,
    /// outermost first. Empty when the two are equal.
    pub fn path_from(&self, ancestor: Option<StateIndex>, descendant: StateIndex) -> Vec<StateIndex> {
        let mut path = Vec::new();
        let mut current = Some(descendant);
        while let Some(index) = current {
            if Some(index) == ancestor {
                break;
            }
            path.push(index);
            current = self.parent(index);
        }
        path.reverse();
        path
    }

    /// The child of `ancestor` on the way down to `descendant`.
    pub fn child_toward(&self, ancestor: StateIndex, descendant: StateIndex) -> Option<StateIndex> {
        self.path_from(Some(ancestor), descendant).first().copied()
    }

    /// Check every declaration invariant, accumulating all failures.
    pub fn verify(&self) -> Verification {
        let mut checks: Vec<Verification> = Vec::new();
        let name = |index: StateIndex| match self.nodes.get(index.0) {
            Some(node) => node.id.name().to_string(),
            None => format!("#{}", index.0),
        };

        checks.push(check(!self.nodes.is_empty(), || DeclarationError::Empty));

        for node in &self.nodes {
            checks.push(node.verify());

            if let Some(initial) = node.initial {
                checks.push(check(node.children.contains(&initial), || {
                    DeclarationError::ForeignInitialChild {
                        state: name(node.index),
                        initial: name(initial),
                    }
                }));
            }

            if !self.reaches_root(node.index) {
                checks.push(Validation::fail(DeclarationError::CyclicHierarchy {
                    state: name(node.index),
                }));
                continue;
            }

            let linked = match node.parent {
                None => node.index == self.root && node.level == 0,
                Some(parent) => self.nodes.get(parent.0).is_some_and(|p| {
                    p.children.contains(&node.index) && p.level + 1 == node.level
                }),
            };
            checks.push(check(linked, || DeclarationError::BrokenHierarchy {
                state: name(node.index),
            }));
        }

        Validation::all_vec(checks).map(|_| ())
    }

    fn reaches_root(&self, index: StateIndex) -> bool {
        let mut current = index;
        for _ in 0..=self.nodes.len() {
            match self.nodes.get(current.0).and_then(|node| node.parent) {
                Some(parent) => current = parent,
                None => return current == self.root,
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{StateBuilder, StateTreeBuilder};

    fn s(name: &str) -> String {
        name.to_string()
    }

    /// Root { A { A1, A2 { A2x } }, P || { R1 { P1 }, R2 { Q1 } } }
    fn sample() -> StateTree<String, &'static str> {
        let child = |name: &str, parent: &str| StateBuilder::new(s(name)).parent(s(parent));
        StateTreeBuilder::new()
            .state(StateBuilder::new(s("Root")).initial(s("A")))
            .state(child("A", "Root").initial(s("A1")))
            .state(child("A1", "A"))
            .state(child("A2", "A").initial(s("A2x")))
            .state(child("A2x", "A2"))
            .state(child("P", "Root").parallel())
            .state(child("R1", "P").initial(s("P1")))
            .state(child("P1", "R1"))
            .state(child("R2", "P").initial(s("Q1")))
            .state(child("Q1", "R2"))
            .build()
            .unwrap()
    }

    fn at(tree: &StateTree<String, &'static str>, name: &str) -> StateIndex {
        tree.index_of(&s(name)).unwrap()
    }

    #[test]
    fn lca_of_siblings_is_their_parent() {
        let tree = sample();
        assert_eq!(tree.lca(at(&tree, "A1"), at(&tree, "A2x")), at(&tree, "A"));
        assert_eq!(tree.lca(at(&tree, "P1"), at(&tree, "Q1")), at(&tree, "P"));
    }

    #[test]
    fn lca_with_an_ancestor_is_the_ancestor() {
        let tree = sample();
        assert_eq!(tree.lca(at(&tree, "A2x"), at(&tree, "A")), at(&tree, "A"));
        assert_eq!(tree.lca(at(&tree, "A"), at(&tree, "A")), at(&tree, "A"));
        assert_eq!(tree.lca(at(&tree, "A2x"), at(&tree, "Q1")), tree.root());
    }

    #[test]
    fn ancestry_queries() {
        let tree = sample();
        let (a, a2x) = (at(&tree, "A"), at(&tree, "A2x"));

        assert!(tree.is_ancestor_or_self(a, a2x));
        assert!(tree.is_ancestor_or_self(a, a));
        assert!(!tree.is_ancestor_or_self(a2x, a));
        assert!(!tree.is_ancestor_or_self(at(&tree, "P"), a2x));
        assert!(tree.is_descendant(a2x, a));
        assert!(!tree.is_descendant(a, a));
    }

    #[test]
    fn path_from_excludes_the_ancestor() {
        let tree = sample();
        let (a, a2, a2x) = (at(&tree, "A"), at(&tree, "A2"), at(&tree, "A2x"));

        assert_eq!(tree.path_from(Some(a), a2x), vec![a2, a2x]);
        assert!(tree.path_from(Some(a), a).is_empty());
        assert_eq!(tree.path_from(None, a2), vec![tree.root(), a, a2]);
        assert_eq!(tree.child_toward(a, a2x), Some(a2));
        assert_eq!(tree.child_toward(a, a), None);
    }

    #[test]
    fn dotted_path_and_regions() {
        let tree = sample();

        assert_eq!(tree.path(at(&tree, "Q1")), "Root.P.R2.Q1");
        assert_eq!(tree.path(tree.root()), "Root");
        assert!(tree.node(at(&tree, "R1")).is_region());
        assert!(tree.node(at(&tree, "R2")).is_region());
        assert!(!tree.node(at(&tree, "A1")).is_region());
        assert!(!tree.root_node().is_region());
    }

    #[test]
    fn document_order_is_depth_first() {
        let tree = sample();
        let names: Vec<&str> = tree
            .document_order()
            .iter()
            .map(|&index| tree.id(index).as_str())
            .collect();
        assert_eq!(
            names,
            vec!["Root", "A", "A1", "A2", "A2x", "P", "R1", "P1", "R2", "Q1"]
        );
    }
}
