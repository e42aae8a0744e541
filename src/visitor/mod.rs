//! Read-only structural traversal of a state tree.
//!
//! [`walk`] drives a [`Visitor`] through the tree in document order:
//!
//! 1. machine entry
//! 2. for each state, depth-first pre-order: state entry, then each of its
//!    transitions (entry immediately followed by exit) in declaration
//!    order, then its children, then state exit
//! 3. machine exit
//!
//! Exits therefore mirror entries in reverse, which is the nesting a
//! hierarchical export format needs.

mod outline;

pub use outline::{ModelOutline, OutlineVisitor, StateOutline, TransitionOutline};

use crate::core::{Event, StateId, StateIndex};
use crate::model::{StateNode, StateTree, Transition};

/// Enter/exit hooks per element kind. Every hook defaults to a no-op.
pub trait Visitor<S: StateId, E: Event> {
    fn visit_machine_entry(&mut self, _tree: &StateTree<S, E>) {}

    fn visit_machine_exit(&mut self, _tree: &StateTree<S, E>) {}

    fn visit_state_entry(&mut self, _tree: &StateTree<S, E>, _state: &StateNode<S, E>) {}

    fn visit_state_exit(&mut self, _tree: &StateTree<S, E>, _state: &StateNode<S, E>) {}

    fn visit_transition_entry(&mut self, _tree: &StateTree<S, E>, _edge: &Transition<S, E>) {}

    fn visit_transition_exit(&mut self, _tree: &StateTree<S, E>, _edge: &Transition<S, E>) {}
}

/// Visit every state and transition of `tree`.
pub fn walk<S, E, V>(tree: &StateTree<S, E>, visitor: &mut V)
where
    S: StateId,
    E: Event,
    V: Visitor<S, E> + ?Sized,
{
    visitor.visit_machine_entry(tree);
    walk_state(tree, tree.root(), visitor);
    visitor.visit_machine_exit(tree);
}

fn walk_state<S, E, V>(tree: &StateTree<S, E>, index: StateIndex, visitor: &mut V)
where
    S: StateId,
    E: Event,
    V: Visitor<S, E> + ?Sized,
{
    let node = tree.node(index);
    visitor.visit_state_entry(tree, node);
    for transition in node.all_transitions() {
        visitor.visit_transition_entry(tree, transition);
        visitor.visit_transition_exit(tree, transition);
    }
    for &child in node.children() {
        walk_state(tree, child, visitor);
    }
    visitor.visit_state_exit(tree, node);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{StateBuilder, StateTreeBuilder, TransitionBuilder};

    #[derive(Default)]
    struct Trace(Vec<String>);

    impl Visitor<String, &'static str> for Trace {
        fn visit_machine_entry(&mut self, _tree: &StateTree<String, &'static str>) {
            self.0.push("machine+".into());
        }

        fn visit_machine_exit(&mut self, _tree: &StateTree<String, &'static str>) {
            self.0.push("machine-".into());
        }

        fn visit_state_entry(
            &mut self,
            _tree: &StateTree<String, &'static str>,
            state: &StateNode<String, &'static str>,
        ) {
            self.0.push(format!("{}+", state.id()));
        }

        fn visit_state_exit(
            &mut self,
            _tree: &StateTree<String, &'static str>,
            state: &StateNode<String, &'static str>,
        ) {
            self.0.push(format!("{}-", state.id()));
        }

        fn visit_transition_entry(
            &mut self,
            _tree: &StateTree<String, &'static str>,
            transition: &Transition<String, &'static str>,
        ) {
            self.0.push(format!("{}>{}+", transition.source(), transition.target()));
        }

        fn visit_transition_exit(
            &mut self,
            _tree: &StateTree<String, &'static str>,
            transition: &Transition<String, &'static str>,
        ) {
            self.0.push(format!("{}>{}-", transition.source(), transition.target()));
        }
    }

    #[test]
    fn walk_visits_in_document_order() {
        let s = |name: &str| name.to_string();
        let tree = StateTreeBuilder::<String, &str>::new()
            .state(StateBuilder::new(s("Root")).initial(s("A")))
            .state(StateBuilder::new(s("A")).parent(s("Root")).initial(s("A1")))
            .state(StateBuilder::new(s("A1")).parent(s("A")))
            .state(StateBuilder::new(s("B")).parent(s("Root")))
            .transition(TransitionBuilder::new().from(s("A")).to(s("B")).on("go"))
            .unwrap()
            .transition(TransitionBuilder::new().from(s("A")).to(s("A1")).on("reset"))
            .unwrap()
            .build()
            .unwrap();

        let mut trace = Trace::default();
        walk(&tree, &mut trace);

        assert_eq!(
            trace.0,
            vec![
                "machine+", "Root+", "A+", "A>B+", "A>B-", "A>A1+", "A>A1-", "A1+", "A1-", "A-",
                "B+", "B-", "Root-", "machine-",
            ]
        );
    }

    #[test]
    fn default_hooks_do_nothing() {
        struct Silent;
        impl Visitor<String, &'static str> for Silent {}

        let tree = StateTreeBuilder::<String, &str>::new()
            .state(StateBuilder::new("Only".to_string()))
            .build()
            .unwrap();

        walk(&tree, &mut Silent);
    }
}
