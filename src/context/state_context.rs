//! Per-dispatch context handed to guards and actions.

use uuid::Uuid;

/// Value object for one dispatch call.
///
/// Created when an event is fired (or the machine starts), passed to every
/// guard and action invoked while processing it, and dropped when the call
/// returns. `event` is `None` while entering the initial configuration.
#[derive(Debug)]
pub struct StateContext<'a, S, E, C> {
    machine_id: Uuid,
    event: Option<E>,
    payload: &'a C,
    source: Option<S>,
    target: Option<S>,
    accepted: bool,
}

impl<'a, S, E, C> StateContext<'a, S, E, C> {
    pub fn new(machine_id: Uuid, event: Option<E>, payload: &'a C) -> Self {
        Self {
            machine_id,
            event,
            payload,
            source: None,
            target: None,
            accepted: false,
        }
    }

    /// Identity of the machine instance processing this event.
    pub fn machine_id(&self) -> Uuid {
        self.machine_id
    }

    pub fn event(&self) -> Option<&E> {
        self.event.as_ref()
    }

    pub fn payload(&self) -> &C {
        self.payload
    }

    /// Source of the transition currently executing.
    pub fn source(&self) -> Option<&S> {
        self.source.as_ref()
    }

    /// Target of the transition currently executing.
    pub fn target(&self) -> Option<&S> {
        self.target.as_ref()
    }

    /// Whether some transition fired for this event.
    pub fn is_accepted(&self) -> bool {
        self.accepted
    }

    pub(crate) fn accept(&mut self) {
        self.accepted = true;
    }

    pub(crate) fn set_route(&mut self, source: Option<S>, target: Option<S>) {
        self.source = source;
        self.target = target;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_context_is_not_accepted() {
        let payload = 7u32;
        let ctx: StateContext<'_, String, &str, u32> =
            StateContext::new(Uuid::nil(), Some("go"), &payload);

        assert!(!ctx.is_accepted());
        assert_eq!(ctx.event(), Some(&"go"));
        assert_eq!(*ctx.payload(), 7);
        assert!(ctx.source().is_none());
    }

    #[test]
    fn accept_and_route_are_visible() {
        let payload = ();
        let mut ctx: StateContext<'_, String, &str, ()> =
            StateContext::new(Uuid::nil(), None, &payload);

        ctx.set_route(Some("A".to_string()), Some("B".to_string()));
        ctx.accept();

        assert!(ctx.is_accepted());
        assert_eq!(ctx.source().map(String::as_str), Some("A"));
        assert_eq!(ctx.target().map(String::as_str), Some("B"));
    }
}
