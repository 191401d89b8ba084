#[cfg(test)]
mod condition {
    use crate::VariableCondition::*;

    #[test]
    fn check_condition_table() {
        assert!(Equal.check(1.0, 1.0));
        assert!(!Equal.check(0.0, 1.0));
        assert!(Equal.check(1.0 + 1e-9, 1.0));

        assert!(EqualOrGreater.check(1.0, 1.0));
        assert!(EqualOrGreater.check(1.5, 1.0));
        assert!(!EqualOrGreater.check(0.0, 1.0));

        assert!(EqualOrLess.check(0.0, 1.0));
        assert!(EqualOrLess.check(1.0, 1.0));
        assert!(!EqualOrLess.check(1.1, 1.0));

        assert!(Less.check(0.0, 1.0));
        assert!(!Less.check(1.0, 1.0));
        assert!(!Less.check(1.1, 1.0));

        assert!(Greater.check(1.5, 1.0));
        assert!(!Greater.check(1.0, 1.0));
        assert!(!Greater.check(0.0, 1.0));
    }
}

#[cfg(test)]
mod requirements {
    use hh_core::{LocationId, VariableId};

    use crate::{all_met, any_met, VariableCondition, VariableError, VariableRepository, VariableRequirement};

    #[test]
    fn requirement_follows_variable_value() {
        let mut repo = VariableRepository::new();
        let v = repo.register("varname", LocationId(0), 0.0).unwrap();
        let req = VariableRequirement::new(v, VariableCondition::Equal, 0.0);
        assert!(req.is_met(&repo).unwrap());
        repo.set_value(v, 1.0).unwrap();
        assert!(!req.is_met(&repo).unwrap());
    }

    #[test]
    fn all_and_any() {
        let mut repo = VariableRepository::new();
        let a = repo.register("a", LocationId(0), 1.0).unwrap();
        let b = repo.register("b", LocationId(0), 5.0).unwrap();
        let reqs = vec![
            VariableRequirement::new(a, VariableCondition::Equal, 1.0),
            VariableRequirement::new(b, VariableCondition::Less, 2.0),
        ];
        assert!(!all_met(&reqs, &repo).unwrap());
        assert!(any_met(&reqs, &repo).unwrap());
        assert!(all_met(&[], &repo).unwrap());
        assert!(any_met(&[], &repo).unwrap());
    }

    #[test]
    fn unknown_variable_is_an_error() {
        let repo = VariableRepository::new();
        let req = VariableRequirement::new(VariableId(3), VariableCondition::Equal, 0.0);
        assert!(matches!(req.is_met(&repo), Err(VariableError::Unknown(VariableId(3)))));
    }
}

#[cfg(test)]
mod repository {
    use hh_core::{LocationId, TimeStep};

    use crate::{
        VariableAction, VariableError, VariableExecutionTime, VariableOperation, VariableRepository,
    };

    #[test]
    fn names_are_unique() {
        let mut repo = VariableRepository::new();
        let id = repo.register("tank", LocationId(1), 3.0).unwrap();
        assert_eq!(repo.id_of("tank").unwrap(), id);
        assert!(matches!(repo.register("tank", LocationId(1), 0.0), Err(VariableError::DuplicateName(_))));
        assert!(matches!(repo.id_of("nope"), Err(VariableError::UnknownName(_))));
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn actions() {
        let mut repo = VariableRepository::new();
        let v = repo.register("v", LocationId(0), 10.0).unwrap();
        let op = |action, value| VariableOperation {
            variable: v,
            action,
            value,
            execution: VariableExecutionTime::AtStart,
        };
        repo.apply(&op(VariableAction::Add, 2.5)).unwrap();
        assert_eq!(repo.value(v).unwrap(), 12.5);
        repo.apply(&op(VariableAction::Subtract, 0.5)).unwrap();
        assert_eq!(repo.value(v).unwrap(), 12.0);
        repo.apply(&op(VariableAction::SetTo, 1.0)).unwrap();
        assert_eq!(repo.value(v).unwrap(), 1.0);
    }

    #[test]
    fn scheduled_operations_fire_when_due() {
        let mut repo = VariableRepository::new();
        let v = repo.register("v", LocationId(0), 0.0).unwrap();
        let at_end = VariableOperation {
            variable:  v,
            action:    VariableAction::SetTo,
            value:     7.0,
            execution: VariableExecutionTime::AtEnd,
        };
        let due = at_end.due_at(TimeStep::raw(10), 5);
        assert_eq!(due.internal_step, 15);
        repo.schedule(at_end, due).unwrap();

        assert_eq!(repo.apply_due(TimeStep::raw(14)).unwrap(), 0);
        assert_eq!(repo.value(v).unwrap(), 0.0);
        assert_eq!(repo.apply_due(TimeStep::raw(15)).unwrap(), 1);
        assert_eq!(repo.value(v).unwrap(), 7.0);
        assert_eq!(repo.pending_count(), 0);
    }

    #[test]
    fn operations_at_same_step_apply_in_order() {
        let mut repo = VariableRepository::new();
        let v = repo.register("v", LocationId(0), 0.0).unwrap();
        let mk = |action, value| VariableOperation {
            variable: v,
            action,
            value,
            execution: VariableExecutionTime::AtStart,
        };
        repo.schedule(mk(VariableAction::SetTo, 4.0), TimeStep::raw(2)).unwrap();
        repo.schedule(mk(VariableAction::Add, 1.0), TimeStep::raw(2)).unwrap();
        repo.apply_due(TimeStep::raw(3)).unwrap();
        assert_eq!(repo.value(v).unwrap(), 5.0);
    }
}
