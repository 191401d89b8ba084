#[cfg(test)]
mod fixture {
    use hh_core::{CalcParameters, HouseholdId, NormalRandom};
    use hh_odap::Odap;
    use hh_profile::{CalcProfile, ProfileType};

    use crate::LoadTypeTable;

    pub struct Fixture {
        pub params:     CalcParameters,
        pub load_types: LoadTypeTable,
        pub odap:       Odap,
        pub normal:     NormalRandom,
    }

    impl Fixture {
        pub fn new(horizon: u32) -> Self {
            let params = CalcParameters { internal_timesteps: horizon, ..CalcParameters::default() };
            let mut load_types = LoadTypeTable::new();
            load_types.add("Electricity", "W", "Wh", 1.0).unwrap();
            load_types.add("Water", "l/min", "l", 1.0).unwrap();
            let odap = Odap::new(HouseholdId(0), &params);
            Self { params, load_types, odap, normal: NormalRandom::from_seed(5) }
        }
    }

    #[macro_export]
    macro_rules! device_env {
        ($f:expr) => {
            $crate::DeviceEnv {
                params:     &$f.params,
                load_types: &$f.load_types,
                odap:       &mut $f.odap,
                normal:     &mut $f.normal,
            }
        };
    }

    pub fn flat(steps: usize, value: f64) -> CalcProfile {
        CalcProfile::from_step_values("flat", ProfileType::Relative, "test", vec![value; steps])
    }

    pub fn hour_profile() -> CalcProfile {
        let mut p = CalcProfile::new("profile", ProfileType::Relative, "blub");
        p.add_time_point(0, 0.01).unwrap();
        p.add_time_point(3_600, 0.01).unwrap();
        p.convert_to_timesteps(60).unwrap();
        p
    }
}

#[cfg(test)]
mod devices {
    use hh_core::{HouseholdId, LoadTypeId, LocationId, TimeStep};
    use hh_odap::{row_for, ActivationProcessor, OefcDeviceType};

    use super::fixture::*;
    use crate::{device_env, CalcDeviceLoad, DeviceError, DeviceStore};

    fn stove_loads() -> Vec<CalcDeviceLoad> {
        vec![CalcDeviceLoad {
            name:      "stove power".into(),
            load_type: LoadTypeId(0),
            value:     1_000.0,
            std_dev:   0.0,
        }]
    }

    #[test]
    fn activation_writes_only_own_column() {
        let mut f = Fixture::new(20);
        let mut store = DeviceStore::new();
        let mut e = device_env!(f);
        let stove = store
            .add("stove", LocationId(0), "cooking", OefcDeviceType::Device, stove_loads(), HouseholdId(0), &mut e)
            .unwrap();
        let kettle = store
            .add("kettle", LocationId(0), "cooking", OefcDeviceType::Device, stove_loads(), HouseholdId(0), &mut e)
            .unwrap();

        let steps = store
            .get_mut(kettle)
            .unwrap()
            .activate(TimeStep::raw(0), &flat(3, 0.5), LoadTypeId(0), 1.0, &mut e)
            .unwrap();
        assert_eq!(steps, 3);

        let rows = f.odap.process_one_timestep(TimeStep::raw(0)).unwrap();
        let row = row_for(&rows, LoadTypeId(0)).unwrap();
        assert_eq!(row.energy_entries, vec![0.0, 500.0]);
        assert!(!store.get(stove).unwrap().is_busy(TimeStep::raw(0), LoadTypeId(0)).unwrap());
        assert!(store.get(kettle).unwrap().is_busy(TimeStep::raw(2), LoadTypeId(0)).unwrap());
        assert!(!store.get(kettle).unwrap().is_busy(TimeStep::raw(3), LoadTypeId(0)).unwrap());
    }

    #[test]
    fn activation_truncates_at_horizon() {
        let mut f = Fixture::new(10);
        let mut store = DeviceStore::new();
        let mut e = device_env!(f);
        let id = store
            .add("stove", LocationId(0), "cooking", OefcDeviceType::Device, stove_loads(), HouseholdId(0), &mut e)
            .unwrap();
        let steps = store
            .get_mut(id)
            .unwrap()
            .activate(TimeStep::raw(7), &flat(10, 1.0), LoadTypeId(0), 1.0, &mut e)
            .unwrap();
        assert_eq!(steps, 3);
    }

    #[test]
    fn busy_timespan_respects_time_factor() {
        let mut f = Fixture::new(20);
        let mut store = DeviceStore::new();
        let mut e = device_env!(f);
        let id = store
            .add("stove", LocationId(0), "cooking", OefcDeviceType::Device, stove_loads(), HouseholdId(0), &mut e)
            .unwrap();
        store
            .get_mut(id)
            .unwrap()
            .activate(TimeStep::raw(5), &flat(2, 1.0), LoadTypeId(0), 1.0, &mut e)
            .unwrap();
        let dev = store.get(id).unwrap();
        assert!(!dev.is_busy_during_timespan(TimeStep::raw(2), 2, 1.0, LoadTypeId(0)).unwrap());
        assert!(dev.is_busy_during_timespan(TimeStep::raw(2), 2, 2.0, LoadTypeId(0)).unwrap());
    }

    #[test]
    fn missing_load_is_an_error() {
        let mut f = Fixture::new(20);
        let mut store = DeviceStore::new();
        let mut e = device_env!(f);
        let id = store
            .add("stove", LocationId(0), "cooking", OefcDeviceType::Device, stove_loads(), HouseholdId(0), &mut e)
            .unwrap();
        let err = store
            .get_mut(id)
            .unwrap()
            .activate(TimeStep::raw(0), &flat(1, 1.0), LoadTypeId(1), 1.0, &mut e)
            .unwrap_err();
        assert!(matches!(err, DeviceError::NoLoadForType { .. }));
    }

    #[test]
    fn gaussian_variation_changes_power() {
        let mut f = Fixture::new(20);
        let mut store = DeviceStore::new();
        let mut e = device_env!(f);
        let loads = vec![CalcDeviceLoad {
            name:      "p".into(),
            load_type: LoadTypeId(0),
            value:     100.0,
            std_dev:   10.0,
        }];
        let id = store
            .add("noisy", LocationId(0), "misc", OefcDeviceType::Device, loads, HouseholdId(0), &mut e)
            .unwrap();
        store.get_mut(id).unwrap().activate(TimeStep::raw(0), &flat(1, 1.0), LoadTypeId(0), 1.0, &mut e).unwrap();
        let rows = f.odap.process_one_timestep(TimeStep::raw(0)).unwrap();
        let v = rows[0].get(0);
        assert!(v != 100.0 && (v - 100.0).abs() < 60.0, "sampled {v}");
    }

    #[test]
    fn overlapping_constant_runs_fill_only_free_steps() {
        let mut f = Fixture::new(30);
        let mut store = DeviceStore::new();
        let mut e = device_env!(f);
        let loads = vec![CalcDeviceLoad {
            name:      "lamp power".into(),
            load_type: LoadTypeId(0),
            value:     60.0,
            std_dev:   0.0,
        }];
        let lamp = store
            .add("lamp", LocationId(0), "Light", OefcDeviceType::Light, loads, HouseholdId(0), &mut e)
            .unwrap();
        store.get_mut(lamp).unwrap().activate_constant(TimeStep::raw(10), 10, &mut e).unwrap();
        store.get_mut(lamp).unwrap().activate_constant(TimeStep::raw(2), 10, &mut e).unwrap();

        for t in 0..30 {
            let rows = f.odap.process_one_timestep(TimeStep::raw(t)).unwrap();
            let expected = if (2..20).contains(&t) { 60.0 } else { 0.0 };
            assert_eq!(rows[0].get(0), expected, "lamp at step {t}");
        }
    }
}

#[cfg(test)]
mod auto_devices {
    use hh_core::{HouseholdId, LoadTypeId, LocationId, TimeStep};
    use hh_odap::{ActivationProcessor, OefcDeviceType};
    use hh_variables::{VariableCondition, VariableRepository, VariableRequirement};

    use super::fixture::*;
    use crate::{device_env, CalcAutoDevice, CalcDeviceLoad, DeviceStore};

    #[test]
    fn restarts_when_idle_and_permitted() {
        let mut f = Fixture::new(100);
        let mut store = DeviceStore::new();
        let mut vars = VariableRepository::new();
        let var = vars.register("varname", LocationId(0), 0.0).unwrap();
        let loads = vec![CalcDeviceLoad {
            name:      "cdevload".into(),
            load_type: LoadTypeId(0),
            value:     100.0,
            std_dev:   0.1,
        }];
        let mut e = device_env!(f);
        let dev = store
            .add("autodev", LocationId(0), "device category", OefcDeviceType::AutoDevice, loads, HouseholdId(0), &mut e)
            .unwrap();
        let auto = CalcAutoDevice::new(
            dev,
            hour_profile(),
            LoadTypeId(0),
            0.0,
            vec![VariableRequirement::new(var, VariableCondition::Equal, 0.0)],
        );

        let mut starts = Vec::new();
        for t in 0..100 {
            let mut e = device_env!(f);
            if auto.step(TimeStep::raw(t), &mut store, &vars, &mut e).unwrap() {
                starts.push(t);
            }
            let rows = f.odap.process_one_timestep(TimeStep::raw(t)).unwrap();
            assert!(rows[0].sum_fresh() > 0.0, "auto device idle at {t}");
        }
        assert_eq!(starts, vec![0, 60]);
    }

    #[test]
    fn blocked_by_requirement() {
        let mut f = Fixture::new(10);
        let mut store = DeviceStore::new();
        let mut vars = VariableRepository::new();
        let var = vars.register("v", LocationId(0), 1.0).unwrap();
        let loads = vec![CalcDeviceLoad {
            name:      "l".into(),
            load_type: LoadTypeId(0),
            value:     1.0,
            std_dev:   0.0,
        }];
        let mut e = device_env!(f);
        let dev = store
            .add("auto", LocationId(0), "c", OefcDeviceType::AutoDevice, loads, HouseholdId(0), &mut e)
            .unwrap();
        let auto = CalcAutoDevice::new(
            dev,
            flat(2, 1.0),
            LoadTypeId(0),
            0.0,
            vec![VariableRequirement::new(var, VariableCondition::Equal, 0.0)],
        );
        assert!(!auto.step(TimeStep::raw(0), &mut store, &vars, &mut e).unwrap());
    }

    #[test]
    fn waits_for_a_booking_further_ahead() {
        let mut f = Fixture::new(20);
        let mut store = DeviceStore::new();
        let vars = VariableRepository::new();
        let loads = vec![CalcDeviceLoad {
            name:      "pump".into(),
            load_type: LoadTypeId(0),
            value:     100.0,
            std_dev:   0.0,
        }];
        let mut e = device_env!(f);
        let dev = store
            .add("pump", LocationId(0), "c", OefcDeviceType::AutoDevice, loads, HouseholdId(0), &mut e)
            .unwrap();
        // An activity already runs the pump at 3..5.
        store.get_mut(dev).unwrap().activate(TimeStep::raw(3), &flat(2, 1.0), LoadTypeId(0), 1.0, &mut e).unwrap();
        let auto = CalcAutoDevice::new(dev, flat(5, 1.0), LoadTypeId(0), 0.0, Vec::new());

        let mut starts = Vec::new();
        for t in 0..20 {
            let mut e = device_env!(f);
            if auto.step(TimeStep::raw(t), &mut store, &vars, &mut e).unwrap() {
                starts.push(t);
            }
            let rows = f.odap.process_one_timestep(TimeStep::raw(t)).unwrap();
            assert!(rows[0].get(0) <= 100.0, "pump stacked at step {t}");
        }
        assert_eq!(starts, vec![5, 10, 15]);
    }
}

#[cfg(test)]
mod factory {
    use hh_core::{HouseholdId, LocationId, SiteId, TimeStep};

    use super::fixture::*;
    use crate::{
        device_env, make_load_types, make_locations, CalcDeviceDto, CalcDeviceLoadDto, CalcLoadTypeDto,
        CalcLocationDto, DeviceError, DeviceStore,
    };

    fn light(load_type: &str) -> CalcDeviceDto {
        CalcDeviceDto {
            name:     "ceiling light".into(),
            category: "Light".into(),
            loads:    vec![CalcDeviceLoadDto {
                name:      "bulb".into(),
                load_type: load_type.into(),
                value:     60.0,
                std_dev:   0.0,
            }],
        }
    }

    #[test]
    fn load_types_from_dtos() {
        let dtos = vec![
            CalcLoadTypeDto {
                name:              "Electricity".into(),
                unit_of_power:     "W".into(),
                unit_of_sum:       "kWh".into(),
                conversion_factor: 1.0 / 60_000.0,
                show_in_charts:    true,
            },
            CalcLoadTypeDto {
                name:              "Electricity".into(),
                unit_of_power:     "W".into(),
                unit_of_sum:       "kWh".into(),
                conversion_factor: 1.0,
                show_in_charts:    false,
            },
        ];
        assert!(matches!(make_load_types(&dtos), Err(DeviceError::DuplicateLoadType(_))));
        let table = make_load_types(&dtos[..1]).unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn locations_get_light_devices() {
        let mut f = Fixture::new(10);
        let mut store = DeviceStore::new();
        let dtos = vec![
            CalcLocationDto {
                name:          "kitchen".into(),
                id:            LocationId(0),
                site:          Some(SiteId(0)),
                light_devices: vec![light("Electricity")],
            },
            CalcLocationDto {
                name:          "garden".into(),
                id:            LocationId(1),
                site:          None,
                light_devices: vec![],
            },
        ];
        let mut e = device_env!(f);
        let locs = make_locations(&dtos, HouseholdId(0), &mut store, &mut e).unwrap();
        assert_eq!(locs.len(), 2);
        assert_eq!(locs[0].light_devices.len(), 1);
        assert_eq!(locs[0].site, Some(SiteId(0)));
        assert_eq!(store.len(), 1);

        locs[0].switch_on_lights(TimeStep::raw(1), 3, &mut store, &mut e).unwrap();
        let lamp = store.get(locs[0].light_devices[0]).unwrap();
        assert!(lamp.is_busy(TimeStep::raw(3), hh_core::LoadTypeId(0)).unwrap());
        assert!(!lamp.is_busy(TimeStep::raw(4), hh_core::LoadTypeId(0)).unwrap());
    }

    #[test]
    fn unknown_load_type_is_rejected() {
        let mut f = Fixture::new(10);
        let mut store = DeviceStore::new();
        let dtos = vec![CalcLocationDto {
            name:          "kitchen".into(),
            id:            LocationId(0),
            site:          None,
            light_devices: vec![light("Plasma")],
        }];
        let mut e = device_env!(f);
        assert!(matches!(
            make_locations(&dtos, HouseholdId(0), &mut store, &mut e),
            Err(DeviceError::UnknownLoadType(name)) if name == "Plasma"
        ));
    }
}
