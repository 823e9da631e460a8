//! Statement state machine.

use std::fmt;

/// The clause kind a builder has most recently appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    Initial,
    With,
    Distinct,
    Select,
    Join,
    Where,
    GroupBy,
    Having,
    OrderBy,
    Limit,
    Offset,
    Insert,
    Update,
    Delete,
    /// WHERE attached to an UPDATE or DELETE.
    MutationWhere,
    Returning,
    Finite,
}

impl State {
    /// States legally reachable from this one.
    pub fn successors(self) -> &'static [State] {
        use State::*;

        match self {
            Initial => &[With, Distinct, Select, Insert, Update, Delete],
            With => &[Distinct, Select, Insert, Update, Delete],
            Distinct => &[Select],
            Select | Join => &[Join, Where, GroupBy, OrderBy, Limit, Offset, Finite],
            Where => &[GroupBy, OrderBy, Limit, Offset, Finite],
            GroupBy => &[Having, OrderBy, Limit, Offset, Finite],
            Having => &[OrderBy, Limit, Offset, Finite],
            OrderBy => &[Limit, Offset, Finite],
            Limit => &[Offset, Finite],
            Offset => &[Finite],
            Insert => &[Returning, Finite],
            Update | Delete => &[MutationWhere, Returning, Finite],
            MutationWhere => &[Returning, Finite],
            Returning => &[Finite],
            Finite => &[],
        }
    }

    pub fn can_reach(self, target: State) -> bool {
        self.successors().contains(&target)
    }

    pub fn name(self) -> &'static str {
        match self {
            State::Initial => "Initial",
            State::With => "With",
            State::Distinct => "Distinct",
            State::Select => "Select",
            State::Join => "Join",
            State::Where => "Where",
            State::GroupBy => "GroupBy",
            State::Having => "Having",
            State::OrderBy => "OrderBy",
            State::Limit => "Limit",
            State::Offset => "Offset",
            State::Insert => "Insert",
            State::Update => "Update",
            State::Delete => "Delete",
            State::MutationWhere => "MutationWhere",
            State::Returning => "Returning",
            State::Finite => "Finite",
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of a transition request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Transition {
    /// Already in the target state; the call does nothing.
    Stay,
    Enter,
}

/// Current state plus the transition rule.
///
/// Checking and entering are separate steps; a builder renders its fragment
/// in between, so a fragment that fails to render never advances the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct StateMachine {
    state: State,
}

impl StateMachine {
    pub(crate) fn new() -> Self {
        Self {
            state: State::Initial,
        }
    }

    pub(crate) fn state(&self) -> State {
        self.state
    }

    /// Decide whether `target` may be entered.
    ///
    /// Re-entering the current state is a [`Transition::Stay`] unless the
    /// clause is `repeatable` (joins append one fragment per call).
    pub(crate) fn check(
        &self,
        target: State,
        repeatable: bool,
    ) -> Result<Transition, (State, State)> {
        if self.state == target {
            return Ok(if repeatable {
                Transition::Enter
            } else {
                Transition::Stay
            });
        }
        if self.state.can_reach(target) {
            Ok(Transition::Enter)
        } else {
            Err((self.state, target))
        }
    }

    pub(crate) fn enter(&mut self, target: State) {
        self.state = target;
    }

    pub(crate) fn reset(&mut self) {
        self.state = State::Initial;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_only_starts_statements() {
        assert!(State::Initial.can_reach(State::Select));
        assert!(State::Initial.can_reach(State::Insert));
        assert!(!State::Initial.can_reach(State::Where));
        assert!(!State::Initial.can_reach(State::Finite));
    }

    #[test]
    fn finite_is_terminal() {
        assert!(State::Finite.successors().is_empty());
    }

    #[test]
    fn same_state_is_a_stay() {
        let mut sm = StateMachine::new();
        assert_eq!(sm.check(State::Select, false), Ok(Transition::Enter));
        sm.enter(State::Select);
        assert_eq!(sm.check(State::Select, false), Ok(Transition::Stay));
        assert_eq!(sm.state(), State::Select);
    }

    #[test]
    fn refused_transition_names_both_states() {
        let mut sm = StateMachine::new();
        sm.enter(State::Select);
        sm.enter(State::Limit);
        assert_eq!(sm.check(State::Where, false), Err((State::Limit, State::Where)));
        assert_eq!(sm.state(), State::Limit);
    }

    #[test]
    fn joins_repeat() {
        let mut sm = StateMachine::new();
        sm.enter(State::Select);
        assert_eq!(sm.check(State::Join, true), Ok(Transition::Enter));
        sm.enter(State::Join);
        assert_eq!(sm.check(State::Join, true), Ok(Transition::Enter));
        sm.enter(State::Where);
        assert!(sm.check(State::Join, true).is_err());
    }

    #[test]
    fn reset_returns_to_initial() {
        let mut sm = StateMachine::new();
        sm.enter(State::Offset);
        sm.reset();
        assert_eq!(sm.state(), State::Initial);
    }

    #[test]
    fn mutations_take_where_and_returning() {
        assert!(State::Update.can_reach(State::MutationWhere));
        assert!(State::Delete.can_reach(State::Returning));
        assert!(!State::Insert.can_reach(State::MutationWhere));
        assert!(!State::Update.can_reach(State::Where));
    }
}
