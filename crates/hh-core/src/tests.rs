//! Unit tests for hh-core primitives.

#[cfg(test)]
mod ids {
    use crate::{DeviceId, LoadTypeId, PersonId};

    #[test]
    fn index_roundtrip() {
        let id = PersonId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(PersonId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(DeviceId::INVALID.0, u32::MAX);
        assert_eq!(LoadTypeId::INVALID.0, u16::MAX);
        assert_eq!(LoadTypeId::default(), LoadTypeId::INVALID);
    }

    #[test]
    fn load_type_id_rejects_overflow() {
        assert!(LoadTypeId::try_from(70_000usize).is_err());
    }

    #[test]
    fn display() {
        assert_eq!(DeviceId(7).to_string(), "DeviceId(7)");
    }
}

#[cfg(test)]
mod time {
    use std::collections::HashSet;

    use crate::{CalcParameters, HhError, TimeStep};

    fn params_with_settling(settling: u32, show: bool) -> CalcParameters {
        CalcParameters {
            settling_steps: settling,
            show_settling_period: show,
            ..CalcParameters::default()
        }
    }

    #[test]
    fn external_step_subtracts_settling() {
        let p = params_with_settling(60, false);
        let t = TimeStep::new(100, &p);
        assert_eq!(t.internal_step, 100);
        assert_eq!(t.external_step, 40);
        assert!(!t.is_absolute);
        assert_eq!(t.display_step(), 40);
        assert_eq!(TimeStep::new(10, &p).external_step, -50);
    }

    #[test]
    fn absolute_steps_display_internal_index() {
        let p = params_with_settling(60, true);
        let t = TimeStep::new(100, &p);
        assert!(t.is_absolute);
        assert_eq!(t.display_step(), 100);
    }

    #[test]
    fn equality_ignores_metadata() {
        let a = TimeStep::new(5, &params_with_settling(0, false));
        let b = TimeStep::new(5, &params_with_settling(3, true));
        assert_eq!(a, b);
        let set: HashSet<TimeStep> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn add_steps_and_ordering() {
        let t = TimeStep::raw(10);
        let later = t.add_steps(5);
        assert_eq!(later.internal_step, 15);
        assert_eq!(later.external_step, 15);
        assert!(t < later);
        assert_eq!(later.since(t), 5);
        assert_eq!(t.since(later), 0);
    }

    #[test]
    fn minute_offset_uses_step_length() {
        let p = CalcParameters {
            internal_step_secs: 30,
            external_step_secs: 60,
            ..CalcParameters::default()
        };
        assert_eq!(TimeStep::new(10, &p).minute_offset(&p), 5);
    }

    #[test]
    fn default_parameters_are_valid() {
        let p = CalcParameters::default();
        assert!(p.validate().is_ok());
        assert_eq!(p.internal_timesteps, 1_440);
        assert_eq!(p.steps_for_secs(3_600), 60);
        assert_eq!(p.steps_for_secs(61), 2);
    }

    #[test]
    fn validation_rejects_bad_step_sizes() {
        let zero = CalcParameters { internal_step_secs: 0, ..CalcParameters::default() };
        assert!(matches!(zero.validate(), Err(HhError::Config(_))));

        let misaligned = CalcParameters { external_step_secs: 90, ..CalcParameters::default() };
        assert!(misaligned.validate().is_err());

        let no_horizon = CalcParameters { internal_timesteps: 0, ..CalcParameters::default() };
        assert!(no_horizon.validate().is_err());
    }

    #[test]
    fn horizon_check() {
        let p = CalcParameters { internal_timesteps: 10, ..CalcParameters::default() };
        assert!(p.check_within_horizon(TimeStep::raw(9)).is_ok());
        assert!(matches!(
            p.check_within_horizon(TimeStep::raw(10)),
            Err(HhError::BeyondHorizon { step: 10, horizon: 10 })
        ));
        assert_eq!(p.remaining_steps(TimeStep::raw(7)), 3);
    }

    #[test]
    fn clock_elapsed() {
        let p = CalcParameters::default();
        let mut clock = p.make_clock();
        assert_eq!(clock.elapsed_secs(), 0);
        for _ in 0..(25 * 60 + 7) {
            clock.advance();
        }
        assert_eq!(clock.elapsed_dhm(), (1, 1, 7));
        assert_eq!(clock.now(&p).internal_step, 25 * 60 + 7);
        assert_eq!(clock.unix_secs_at(TimeStep::raw(2)), 120);
    }
}

#[cfg(test)]
mod busy {
    use crate::BusyArray;

    #[test]
    fn starts_free() {
        let arr = BusyArray::new(130);
        assert_eq!(arr.len(), 130);
        assert!(!arr.any_in(0..130));
        assert_eq!(arr.count_busy(), 0);
    }

    #[test]
    fn set_range_clamps_to_length() {
        let mut arr = BusyArray::new(100);
        arr.set_range(90..200);
        assert!(arr.get(99));
        assert!(!arr.get(89));
        assert!(!arr.get(150));
        assert_eq!(arr.count_busy(), 10);
    }

    #[test]
    fn word_boundaries() {
        let mut arr = BusyArray::new(200);
        arr.set(63);
        arr.set(64);
        assert!(arr.get(63));
        assert!(arr.get(64));
        assert!(!arr.get(65));
        assert!(arr.any_in(60..65));
        assert!(!arr.any_in(65..200));
    }

    #[test]
    fn from_bools_resizes() {
        let arr = BusyArray::from_bools(&[true, false, true, true], 3);
        assert_eq!(arr.len(), 3);
        assert!(arr.get(0));
        assert!(!arr.get(1));
        assert!(arr.get(2));
        assert!(!arr.get(3));

        let longer = BusyArray::from_bools(&[true], 10);
        assert_eq!(longer.len(), 10);
        assert_eq!(longer.count_busy(), 1);
    }
}

#[cfg(test)]
mod rng {
    use crate::{HouseholdId, HouseholdRng, NormalRandom};

    #[test]
    fn same_seed_same_sequence() {
        let mut a = HouseholdRng::new(7, HouseholdId(3));
        let mut b = HouseholdRng::new(7, HouseholdId(3));
        for _ in 0..16 {
            assert_eq!(a.gen_range(0..1000u32), b.gen_range(0..1000u32));
        }
    }

    #[test]
    fn households_get_distinct_streams() {
        let mut a = HouseholdRng::new(7, HouseholdId(0));
        let mut b = HouseholdRng::new(7, HouseholdId(1));
        let xs: Vec<u32> = (0..8).map(|_| a.gen_range(0..u32::MAX)).collect();
        let ys: Vec<u32> = (0..8).map(|_| b.gen_range(0..u32::MAX)).collect();
        assert_ne!(xs, ys);
    }

    #[test]
    fn choose_weighted_skips_zero_weights() {
        let mut rng = HouseholdRng::new(1, HouseholdId(0));
        for _ in 0..50 {
            assert_eq!(rng.choose_weighted(&[0.0, 2.0, 0.0]), Some(1));
        }
        assert_eq!(rng.choose_weighted(&[]), None);
        assert_eq!(rng.choose_weighted(&[0.0, 0.0]), None);
    }

    #[test]
    fn normal_zero_std_returns_mean() {
        let mut n = NormalRandom::from_seed(1);
        assert_eq!(n.next_double(3.5, 0.0), 3.5);
    }

    #[test]
    fn normal_sample_mean_is_close() {
        let mut n = NormalRandom::new(42, HouseholdId(0));
        let samples = 20_000;
        let mean: f64 = (0..samples).map(|_| n.next_double(10.0, 2.0)).sum::<f64>() / samples as f64;
        assert!((mean - 10.0).abs() < 0.1, "mean = {mean}");
    }
}

#[cfg(test)]
mod load_type {
    use crate::{CalcLoadType, LoadTypeId};

    #[test]
    fn unit_conversion_roundtrip() {
        let lt = CalcLoadType::new(LoadTypeId(0), "Electricity", "W", "kWh", 1.0 / 60_000.0);
        let sum = lt.to_sum_unit(600.0);
        assert!((sum - 0.01).abs() < 1e-12);
        assert!((lt.from_sum_unit(sum) - 600.0).abs() < 1e-9);
    }
}
