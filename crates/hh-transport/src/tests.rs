#[cfg(test)]
mod fixture {
    use hh_affordance::{
        ActivationLog, AffordanceConfig, AffordanceSerialGenerator, BusyContext, CalcAffordance,
        Gender, PersonDescriptor,
    };
    use hh_core::{
        AffordanceId, CalcParameters, DeviceId, HouseholdId, HouseholdRng, LoadTypeId, LocationId,
        NormalRandom, PersonId, SiteId, TransportCategoryId,
    };
    use hh_device::{CalcDeviceLoad, CalcLocation, DeviceEnv, DeviceStore, LoadTypeTable};
    use hh_odap::{Odap, OefcDeviceType};
    use hh_profile::{CalcProfile, ProfileType};
    use hh_variables::VariableRepository;

    use crate::{RouteStep, TransportationHandler};

    pub const HOME: LocationId = LocationId(0);
    pub const OFFICE: LocationId = LocationId(1);
    pub const GARDEN: LocationId = LocationId(2);

    pub struct Fixture {
        pub params:     CalcParameters,
        pub load_types: LoadTypeTable,
        pub odap:       Odap,
        pub normal:     NormalRandom,
        pub rng:        HouseholdRng,
        pub devices:    DeviceStore,
        pub locations:  Vec<CalcLocation>,
        pub variables:  VariableRepository,
        pub log:        ActivationLog,
        pub handler:    TransportationHandler,
        pub serials:    AffordanceSerialGenerator,
        pub home:       SiteId,
        pub work:       SiteId,
        pub car_cat:    TransportCategoryId,
        pub car:        usize,
        pub car_energy: DeviceId,
    }

    impl Fixture {
        /// Home (home + garden) and work (office) sites, one car parked at
        /// home doing 10 m/s, a 6 km route home → work: 10 one-minute steps.
        pub fn new(horizon: u32) -> Self {
            let mut params = CalcParameters { internal_timesteps: horizon, ..CalcParameters::default() };
            params.options.transportation_log = true;
            let mut load_types = LoadTypeTable::new();
            load_types.add("Electricity", "W", "Wh", 1.0).unwrap();
            let mut odap = Odap::new(HouseholdId(0), &params);
            let mut normal = NormalRandom::from_seed(3);
            let mut devices = DeviceStore::new();
            let car_energy = {
                let mut env = DeviceEnv {
                    params:     &params,
                    load_types: &load_types,
                    odap:       &mut odap,
                    normal:     &mut normal,
                };
                let loads = vec![CalcDeviceLoad {
                    name:      "charging".into(),
                    load_type: LoadTypeId(0),
                    value:     5_000.0,
                    std_dev:   0.0,
                }];
                devices
                    .add("car", HOME, "vehicle", OefcDeviceType::Transportation, loads, HouseholdId(0), &mut env)
                    .unwrap()
            };

            let mut handler = TransportationHandler::new(&params);
            let home = handler.add_site("Home", vec![HOME, GARDEN]).unwrap();
            let work = handler.add_site("Work", vec![OFFICE]).unwrap();
            let car_cat = handler.add_category("Car");
            let car = handler.add_device("car", car_cat, 10.0, Some(home), Some(car_energy)).unwrap();
            handler
                .add_route(
                    "commute",
                    home,
                    work,
                    vec![RouteStep { name: "drive".into(), category: car_cat, distance_m: 6_000.0 }],
                )
                .unwrap();

            Self {
                params,
                load_types,
                odap,
                normal,
                rng: HouseholdRng::new(9, HouseholdId(0)),
                devices,
                locations: vec![
                    CalcLocation::new(HOME, "Home"),
                    CalcLocation::new(OFFICE, "Office"),
                    CalcLocation::new(GARDEN, "Garden"),
                ],
                variables: VariableRepository::new(),
                log: ActivationLog::new(),
                handler,
                serials: AffordanceSerialGenerator::new(),
                home,
                work,
                car_cat,
                car,
                car_energy,
            }
        }

        pub fn affordance(&mut self, name: &str, location: LocationId, steps: usize) -> CalcAffordance {
            let profile = CalcProfile::from_step_values(name, ProfileType::Relative, "survey", vec![0.5; steps]);
            let cfg = AffordanceConfig::new(name, location, profile);
            CalcAffordance::new(AffordanceId(self.serials.issued()), cfg, &mut self.serials, &self.params).unwrap()
        }

        pub fn busy(&self) -> BusyContext<'_> {
            BusyContext { params: &self.params, variables: &self.variables, devices: &self.devices }
        }
    }

    pub fn carla() -> PersonDescriptor {
        PersonDescriptor::new(PersonId(0), "Carla", 40, Gender::Female)
    }

    pub fn dan() -> PersonDescriptor {
        PersonDescriptor::new(PersonId(1), "Dan", 42, Gender::Male)
    }

    /// Split the fixture into the borrows a routed call needs and run
    /// `$body` with `$busy`, `$travel` (and `$ctx` for activation) bound.
    #[macro_export]
    macro_rules! travel {
        ($f:expr, |$busy:ident, $travel:ident| $body:expr) => {{
            let $busy = hh_affordance::BusyContext {
                params:    &$f.params,
                variables: &$f.variables,
                devices:   &$f.devices,
            };
            let mut $travel = $crate::TravelContext { handler: &mut $f.handler, rng: &mut $f.rng };
            $body
        }};
        ($f:expr, activate |$ctx:ident, $travel:ident| $body:expr) => {{
            let mut env = hh_device::DeviceEnv {
                params:     &$f.params,
                load_types: &$f.load_types,
                odap:       &mut $f.odap,
                normal:     &mut $f.normal,
            };
            let mut $ctx = hh_affordance::ActivationContext {
                devices:   &mut $f.devices,
                locations: &$f.locations,
                variables: &mut $f.variables,
                env:       &mut env,
                log:       &mut $f.log,
            };
            let mut $travel = $crate::TravelContext { handler: &mut $f.handler, rng: &mut $f.rng };
            $body
        }};
    }
}

#[cfg(test)]
mod handler {
    use hh_core::{LocationId, TimeStep};

    use super::fixture::*;
    use crate::{RouteChoice, RouteStep, TransportError};

    #[test]
    fn leg_duration_follows_speed_and_distance() {
        let mut f = Fixture::new(100);
        match f.handler.select_route(HOME, f.work, TimeStep::raw(0), &mut f.rng) {
            RouteChoice::Found(route) => {
                assert_eq!(route.duration_steps, 10);
                assert_eq!(route.legs.len(), 1);
                assert_eq!(route.legs[0].device, f.car);
                assert_eq!(route.name, "commute");
            }
            other => panic!("expected a route, got {other:?}"),
        }
    }

    #[test]
    fn same_site_needs_no_vehicle() {
        let mut f = Fixture::new(100);
        let RouteChoice::Found(route) = f.handler.select_route(GARDEN, f.home, TimeStep::raw(0), &mut f.rng) else {
            panic!("same-site trips always succeed");
        };
        assert_eq!(route.duration_steps, 0);
        assert!(route.route.is_none());
        assert!(route.legs.is_empty());
    }

    #[test]
    fn missing_route_and_missing_vehicle_differ() {
        let mut f = Fixture::new(100);
        let t = TimeStep::raw(0);
        assert_eq!(f.handler.select_route(OFFICE, f.home, t, &mut f.rng), RouteChoice::NoRoute);
        assert_eq!(f.handler.select_route(LocationId(7), f.work, t, &mut f.rng), RouteChoice::NoRoute);

        // Drive the car to work: the commute still exists but nothing at
        // home can take it.
        let RouteChoice::Found(route) = f.handler.select_route(HOME, f.work, t, &mut f.rng) else {
            panic!("car is at home");
        };
        let mut env = hh_device::DeviceEnv {
            params:     &f.params,
            load_types: &f.load_types,
            odap:       &mut f.odap,
            normal:     &mut f.normal,
        };
        f.handler.activate_route(&route, t, "Carla", &mut f.devices, &mut env).unwrap();
        assert_eq!(f.handler.device(f.car).unwrap().current_site, Some(f.work));
        assert_eq!(f.handler.select_route(HOME, f.work, TimeStep::raw(20), &mut f.rng), RouteChoice::NoTransportation);
    }

    #[test]
    fn busy_vehicle_is_not_planned() {
        let mut f = Fixture::new(100);
        let car_cat = f.car_cat;
        // A second, unparked car: the first trip takes one, the second the other.
        f.handler.add_device("taxi", car_cat, 20.0, None, None).unwrap();
        let t = TimeStep::raw(0);
        let mut used = Vec::new();
        for _ in 0..2 {
            let RouteChoice::Found(route) = f.handler.select_route(HOME, f.work, t, &mut f.rng) else {
                panic!("a vehicle should be free");
            };
            used.push(route.legs[0].device);
            let mut env = hh_device::DeviceEnv {
                params:     &f.params,
                load_types: &f.load_types,
                odap:       &mut f.odap,
                normal:     &mut f.normal,
            };
            f.handler.activate_route(&route, t, "Carla", &mut f.devices, &mut env).unwrap();
        }
        used.sort();
        assert_eq!(used, vec![0, 1]);
        assert_eq!(f.handler.select_route(HOME, f.work, t, &mut f.rng), RouteChoice::NoTransportation);
        assert!(f.handler.device(1).unwrap().is_busy_at(2));
        assert!(!f.handler.device(1).unwrap().is_busy_at(5));
    }

    #[test]
    fn invalid_network_is_rejected() {
        let mut f = Fixture::new(100);
        assert!(matches!(
            f.handler.add_site("Shed", vec![GARDEN]),
            Err(TransportError::InvalidConfig(_))
        ));
        assert!(matches!(
            f.handler.add_device("rocket", f.car_cat, 0.0, None, None),
            Err(TransportError::InvalidConfig(_))
        ));
        let cat = f.car_cat;
        assert!(matches!(
            f.handler.add_route(
                "warp",
                f.home,
                f.work,
                vec![RouteStep { name: "jump".into(), category: cat, distance_m: f64::NAN }]
            ),
            Err(TransportError::InvalidConfig(_))
        ));
        assert!(matches!(
            f.handler.add_route("void", f.home, hh_core::SiteId(9), Vec::new()),
            Err(TransportError::UnknownSite(_))
        ));
    }
}

#[cfg(test)]
mod routed {
    use hh_affordance::{AffordanceConfig, BusynessType, CalcAffordance};
    use hh_core::{AffordanceId, LoadTypeId, TimeStep};
    use hh_odap::{row_for, ActivationProcessor};
    use hh_profile::{CalcProfile, ProfileType};
    use hh_variables::{VariableCondition, VariableRequirement};

    use super::fixture::*;
    use crate::{RoutedActivity, TransportError};

    fn work(f: &mut Fixture) -> RoutedActivity {
        let inner = f.affordance("work", OFFICE, 20);
        let site = f.work;
        RoutedActivity::new(inner, site, &mut f.handler).unwrap()
    }

    #[test]
    fn wrapper_must_match_the_site() {
        let mut f = Fixture::new(100);
        let inner = f.affordance("work", OFFICE, 20);
        let home = f.home;
        assert!(RoutedActivity::new(inner, home, &mut f.handler).is_err());
    }

    #[test]
    fn busy_check_is_made_at_the_arrival_step() {
        let mut f = Fixture::new(100);
        let mut act = work(&mut f);
        assert_eq!(act.pretty_name(), "work (including transportation)");
        let r = crate::travel!(f, |busy, travel| {
            act.is_busy(TimeStep::raw(0), HOME, &carla(), &busy, &mut travel).unwrap()
        });
        assert_eq!(r, BusynessType::NotBusy);

        // Dan at the office needs no car and starts right away; Carla would
        // arrive at step 10, while Dan is still working.
        let r = crate::travel!(f, |busy, travel| {
            act.is_busy(TimeStep::raw(0), OFFICE, &dan(), &busy, &mut travel).unwrap()
        });
        assert_eq!(r, BusynessType::NotBusy);
        crate::travel!(f, activate |ctx, travel| {
            act.activate(TimeStep::raw(0), &dan(), OFFICE, &mut ctx, &mut travel).unwrap();
        });
        let r = crate::travel!(f, |busy, travel| {
            act.is_busy(TimeStep::raw(1), HOME, &carla(), &busy, &mut travel).unwrap()
        });
        assert_eq!(r, BusynessType::Occupied);
        let r = crate::travel!(f, |busy, travel| {
            act.is_busy(TimeStep::raw(10), HOME, &carla(), &busy, &mut travel).unwrap()
        });
        assert_eq!(r, BusynessType::NotBusy);
    }

    #[test]
    fn unreachable_site_reports_no_route() {
        let mut f = Fixture::new(100);
        let inner = f.affordance("garden work", GARDEN, 5);
        let home = f.home;
        let mut act = RoutedActivity::new(inner, home, &mut f.handler).unwrap();
        let r = crate::travel!(f, |busy, travel| {
            act.is_busy(TimeStep::raw(0), OFFICE, &carla(), &busy, &mut travel).unwrap()
        });
        assert_eq!(r, BusynessType::NoRoute);
        assert!(r.is_busy());
    }

    #[test]
    fn requirements_and_eligibility_are_checked_before_the_route() {
        let mut f = Fixture::new(100);
        let var = f.variables.register("garden dry", GARDEN, 0.0).unwrap();
        let profile = CalcProfile::from_step_values("water", ProfileType::Relative, "survey", vec![0.5; 5]);
        let mut cfg = AffordanceConfig::new("water plants", GARDEN, profile);
        cfg.requirements = vec![VariableRequirement::new(var, VariableCondition::Equal, 1.0)];
        cfg.min_age = 41;
        let inner = CalcAffordance::new(AffordanceId(0), cfg, &mut f.serials, &f.params).unwrap();
        let home = f.home;
        let mut act = RoutedActivity::new(inner, home, &mut f.handler).unwrap();

        // From the office there is no way home, and step 95 is close enough
        // to the end that any trip would count as free.
        let (from_office, late) = crate::travel!(f, |busy, travel| {
            (
                act.is_busy(TimeStep::raw(0), OFFICE, &carla(), &busy, &mut travel).unwrap(),
                act.is_busy(TimeStep::raw(95), HOME, &carla(), &busy, &mut travel).unwrap(),
            )
        });
        assert_eq!(from_office, BusynessType::VariableRequirementsNotMet);
        assert_eq!(late, BusynessType::VariableRequirementsNotMet);
        assert!(act.cache().is_none());

        f.variables.set_value(var, 1.0).unwrap();
        let (carla_r, dan_r) = crate::travel!(f, |busy, travel| {
            (
                act.is_busy(TimeStep::raw(0), OFFICE, &carla(), &busy, &mut travel).unwrap(),
                act.is_busy(TimeStep::raw(0), OFFICE, &dan(), &busy, &mut travel).unwrap(),
            )
        });
        assert_eq!(carla_r, BusynessType::Occupied);
        assert_eq!(dan_r, BusynessType::NoRoute);
    }

    #[test]
    fn route_cache_is_per_person_and_step() {
        let mut f = Fixture::new(100);
        let mut act = work(&mut f);
        crate::travel!(f, |busy, travel| {
            act.is_busy(TimeStep::raw(3), HOME, &carla(), &busy, &mut travel).unwrap();
            act.is_busy(TimeStep::raw(3), GARDEN, &carla(), &busy, &mut travel).unwrap();
            act.is_busy(TimeStep::raw(3), HOME, &carla(), &busy, &mut travel).unwrap();
        });
        let cache = act.cache().unwrap();
        assert!(cache.is_for(carla().id, TimeStep::raw(3)));
        assert_eq!(cache.len(), 2);

        crate::travel!(f, |busy, travel| {
            act.is_busy(TimeStep::raw(3), HOME, &dan(), &busy, &mut travel).unwrap();
        });
        let cache = act.cache().unwrap();
        assert!(cache.is_for(dan().id, TimeStep::raw(3)));
        assert_eq!(cache.len(), 1);

        crate::travel!(f, |busy, travel| {
            act.is_busy(TimeStep::raw(4), HOME, &dan(), &busy, &mut travel).unwrap();
        });
        assert!(act.cache().unwrap().is_for(dan().id, TimeStep::raw(4)));
    }

    #[test]
    fn activation_requires_a_matching_busy_check() {
        let mut f = Fixture::new(100);
        let mut act = work(&mut f);
        let err = crate::travel!(f, activate |ctx, travel| {
            act.activate(TimeStep::raw(0), &carla(), HOME, &mut ctx, &mut travel)
        });
        assert!(matches!(err, Err(TransportError::ActivateWithoutBusyCheck { .. })));

        crate::travel!(f, |busy, travel| {
            act.is_busy(TimeStep::raw(0), HOME, &carla(), &busy, &mut travel).unwrap();
        });
        let err = crate::travel!(f, activate |ctx, travel| {
            act.activate(TimeStep::raw(0), &dan(), HOME, &mut ctx, &mut travel)
        });
        assert!(matches!(err, Err(TransportError::ActivateWithoutBusyCheck { .. })));
        let err = crate::travel!(f, activate |ctx, travel| {
            act.activate(TimeStep::raw(0), &carla(), GARDEN, &mut ctx, &mut travel)
        });
        assert!(matches!(err, Err(TransportError::ActivateWithoutBusyCheck { .. })));
    }

    #[test]
    fn travel_time_prefixes_the_person_profile() {
        let mut f = Fixture::new(100);
        let mut act = work(&mut f);
        crate::travel!(f, |busy, travel| {
            act.is_busy(TimeStep::raw(0), HOME, &carla(), &busy, &mut travel).unwrap();
        });
        let profile = crate::travel!(f, activate |ctx, travel| {
            act.activate(TimeStep::raw(0), &carla(), HOME, &mut ctx, &mut travel).unwrap()
        });
        assert_eq!(profile.name, "Travel Profile for Route commute to affordance work");
        assert_eq!(profile.data_source, "survey");
        let values = profile.step_values().unwrap();
        assert_eq!(values.len(), 30);
        assert!(values[..10].iter().all(|v| *v == 1.0));
        assert!(values[10..].iter().all(|v| *v == 0.5));

        let busy = act.affordance().busy_array();
        assert!(!busy.get(9));
        assert!(busy.get(10));
        assert!(busy.get(29));
        assert!(f.handler.device(f.car).unwrap().is_busy_at(9));
        assert_eq!(f.handler.device(f.car).unwrap().current_site, Some(f.work));
        assert_eq!(f.log.entries()[0].time, TimeStep::raw(10));

        let event = &f.handler.log.events()[0];
        assert_eq!((event.src_site.as_str(), event.dst_site.as_str()), ("Home", "Work"));
        assert_eq!(event.used_devices, "car(10)");
        assert_eq!((event.duration_steps, event.activity_steps), (10, 20));

        // The car's energy load runs for the trip.
        let key = f.devices.get(f.car_energy).unwrap().key_for(LoadTypeId(0)).unwrap().clone();
        let col = f.odap.column_number(LoadTypeId(0), &key).unwrap();
        let rows = f.odap.process_one_timestep(TimeStep::raw(0)).unwrap();
        assert_eq!(row_for(&rows, LoadTypeId(0)).unwrap().get(col), 5_000.0);
    }

    #[test]
    fn zero_travel_returns_the_wrapped_profile() {
        let mut f = Fixture::new(100);
        let inner = f.affordance("weed", GARDEN, 7);
        let expected = inner.person_profile.clone();
        let home = f.home;
        let mut act = RoutedActivity::new(inner, home, &mut f.handler).unwrap();
        crate::travel!(f, |busy, travel| {
            act.is_busy(TimeStep::raw(2), HOME, &carla(), &busy, &mut travel).unwrap();
        });
        let profile = crate::travel!(f, activate |ctx, travel| {
            act.activate(TimeStep::raw(2), &carla(), HOME, &mut ctx, &mut travel).unwrap()
        });
        assert_eq!(profile, expected);
        assert!(f
            .handler
            .log
            .statuses()
            .iter()
            .any(|s| s.message.contains("with no transportation")));
        assert!(f.handler.log.events()[0].used_devices.is_empty());
    }

    #[test]
    fn run_ending_mid_trip_yields_dead_time_only() {
        let mut f = Fixture::new(100);
        let mut act = work(&mut f);
        let r = crate::travel!(f, |busy, travel| {
            act.is_busy(TimeStep::raw(95), HOME, &carla(), &busy, &mut travel).unwrap()
        });
        assert_eq!(r, BusynessType::NotBusy);
        let profile = crate::travel!(f, activate |ctx, travel| {
            act.activate(TimeStep::raw(95), &carla(), HOME, &mut ctx, &mut travel).unwrap()
        });
        assert_eq!(profile.step_values().unwrap(), &[1.0; 10]);
        assert_eq!(profile.data_source, "work");
        assert_eq!(act.affordance().busy_array().count_busy(), 0);
        assert!(f.log.is_empty());
    }
}

#[cfg(test)]
mod activity {
    use hh_affordance::BusynessType;
    use hh_core::TimeStep;

    use super::fixture::*;
    use crate::{Activity, RoutedActivity};

    #[test]
    fn direct_and_routed_dispatch() {
        let mut f = Fixture::new(100);
        let nap = f.affordance("nap", HOME, 4);
        let mut direct = Activity::Direct(nap);
        let inner = f.affordance("work", OFFICE, 20);
        let work_site = f.work;
        let mut routed = Activity::Routed(RoutedActivity::new(inner, work_site, &mut f.handler).unwrap());

        assert_eq!(direct.pretty_name(), "nap");
        assert_eq!(routed.pretty_name(), "work (including transportation)");
        assert_eq!(routed.name(), "work");
        assert_eq!(routed.location(), OFFICE);
        assert_eq!(direct.weight(), 1);

        // A direct activity ignores where the person is.
        let (d, r) = crate::travel!(f, |busy, travel| {
            (
                direct.is_busy(TimeStep::raw(0), OFFICE, &carla(), &busy, &mut travel).unwrap(),
                routed.is_busy(TimeStep::raw(0), OFFICE, &carla(), &busy, &mut travel).unwrap(),
            )
        });
        assert_eq!((d, r), (BusynessType::NotBusy, BusynessType::NotBusy));

        let profile = crate::travel!(f, activate |ctx, travel| {
            direct.activate(TimeStep::raw(0), &carla(), OFFICE, &mut ctx, &mut travel).unwrap()
        });
        assert_eq!(profile.len(), 4);
        assert_eq!(direct.affordance().busy_array().count_busy(), 4);
    }
}
