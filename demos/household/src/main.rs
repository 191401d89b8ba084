//! household — a small two-person household simulated for one day.
//!
//! Carla commutes to the office by car; Dan stays home.  Both cook, shower,
//! watch TV and wash up; a pile of dirty dishes gets someone off the sofa
//! mid-programme.  A rooftop PV array charges a battery, and a
//! control signal switches on whenever the battery runs low.  Two copies of
//! the household (different seeds via their ids) run side by side; with
//! `--features parallel` they run on Rayon's thread pool.
//!
//! ```text
//! cargo run -p household [-- params.json]
//! RUST_LOG=hh_sim=debug cargo run -p household
//! ```
//!
//! Output lands in `output/household_<id>/`.

use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use hh_affordance::{AffordanceConfig, DeviceProfile, Gender, PersonDescriptor, TimeLimit};
use hh_core::{CalcParameters, HouseholdId, LoadTypeId, PersonId};
use hh_device::{CalcDeviceLoad, LoadTypeTable};
use hh_output::{CsvWriter, HouseholdOutputObserver};
use hh_profile::{CalcProfile, ProfileType};
use hh_sim::{run_households, Household, HouseholdBuilder, RunOutcome, WeightedChooser};
use hh_storage::{EnergyStorageConfig, EnergyStorageSignalConfig};
use hh_transport::RouteStep;
use hh_variables::{
    VariableAction, VariableCondition, VariableExecutionTime, VariableOperation, VariableRequirement,
};

// ── Constants ─────────────────────────────────────────────────────────────────

const HOUSEHOLDS:    u32   = 2;
const START_UNIX:    i64   = 1_700_000_000; // Tuesday 2023-11-14 22:13 UTC
const STEPS_PER_DAY: usize = 1_440;
const COMMUTE_M:     f64   = 12_000.0;

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Power in watts on one load type.
fn load(name: &str, load_type: LoadTypeId, value: f64) -> Vec<CalcDeviceLoad> {
    vec![CalcDeviceLoad { name: name.into(), load_type, value, std_dev: value.abs() * 0.05 }]
}

fn flat(name: &str, steps: usize, value: f64) -> CalcProfile {
    CalcProfile::from_step_values(name, ProfileType::Absolute, "demo", vec![value; steps])
}

/// Daylight bell curve between 07:00 and 17:00.
fn sun(steps: usize) -> CalcProfile {
    let values = (0..steps)
        .map(|s| {
            let minute = s % STEPS_PER_DAY;
            if (420..1_020).contains(&minute) {
                let x = (minute - 420) as f64 / 600.0;
                (x * std::f64::consts::PI).sin()
            } else {
                0.0
            }
        })
        .collect();
    CalcProfile::from_step_values("sun", ProfileType::Absolute, "demo", values)
}

fn window(name: &str, horizon: usize, ranges: &[std::ops::Range<usize>]) -> TimeLimit {
    let mut limit = TimeLimit::new(name, horizon);
    for r in ranges {
        limit.allow_daily(r.clone(), STEPS_PER_DAY);
    }
    limit
}

fn load_params() -> Result<CalcParameters> {
    let Some(path) = std::env::args().nth(1) else {
        return Ok(CalcParameters { start_unix_secs: START_UNIX, ..CalcParameters::default() });
    };
    let text = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
    let params: CalcParameters = serde_json::from_str(&text).with_context(|| format!("parsing {path}"))?;
    Ok(params)
}

// ── Household ─────────────────────────────────────────────────────────────────

fn build_household(id: HouseholdId, params: CalcParameters) -> Result<Household<WeightedChooser>> {
    let horizon = params.internal_timesteps as usize;

    let mut load_types = LoadTypeTable::new();
    let electricity = load_types.add("Electricity", "W", "Wh", 1.0 / 60.0)?;
    let water = load_types.add("Water", "L/min", "L", 1.0)?;
    let control = load_types.add("Battery Low", "-", "-", 1.0)?;

    let mut b = HouseholdBuilder::new(id, params, load_types, WeightedChooser)?;

    // 1. Rooms and the office.
    let kitchen = b.add_location("Kitchen");
    let living = b.add_location("Living Room");
    let bathroom = b.add_location("Bathroom");
    let garage = b.add_location("Garage");
    let roof = b.add_location("Roof");
    let office = b.add_location("Office");

    // 2. Devices.
    let stove = b.add_device("stove", kitchen, "cooking", load("power", electricity, 2_000.0))?;
    let sink = b.add_device("sink", kitchen, "water", load("flow", water, 6.0))?;
    let shower = b.add_device("shower", bathroom, "water", load("flow", water, 9.0))?;
    let boiler = b.add_device("boiler", bathroom, "heating", load("power", electricity, 3_500.0))?;
    let tv = b.add_device("tv", living, "entertainment", load("power", electricity, 120.0))?;
    b.add_light("living room lamp", living, load("power", electricity, 60.0))?;
    let charger = b.add_device("wallbox", garage, "mobility", load("power", electricity, 3_700.0))?;

    let fridge = b.add_device("fridge", kitchen, "cooling", load("power", electricity, 90.0))?;
    let mut cycle = vec![1.0; 20];
    cycle.extend([0.0; 40]);
    let fridge_profile = CalcProfile::from_step_values("fridge cycle", ProfileType::Absolute, "demo", cycle);
    b.add_auto_device(fridge, fridge_profile, electricity, 2.0, Vec::new())?;

    let pv = b.add_device("pv", roof, "generation", load("power", electricity, -4_000.0))?;
    b.add_auto_device(pv, sun(horizon), electricity, 0.0, Vec::new())?;

    // 3. Battery with a low-fill signal.
    let battery = b.add_storage(&EnergyStorageConfig {
        name:                  "battery".into(),
        load_type:             electricity,
        capacity:              5_000.0,
        initial_fill:          1_000.0,
        minimum_storage_rate:  0.0,
        maximum_storage_rate:  3_000.0,
        minimum_withdraw_rate: 0.0,
        maximum_withdraw_rate: 3_000.0,
    })?;
    b.add_storage_signal(
        battery,
        EnergyStorageSignalConfig {
            name:                "battery low".into(),
            trigger_on_percent:  20.0,
            trigger_off_percent: 50.0,
            value:               1.0,
        },
        control,
    )?;

    // 4. Transport: the car lives in the garage and plugs in when it drives.
    let transport = b.transport_mut();
    let home = transport.add_site("Home", vec![kitchen, living, bathroom, garage, roof])?;
    let work = transport.add_site("Work", vec![office])?;
    let car = transport.add_category("Car");
    transport.add_device("car", car, 13.9, Some(home), Some(charger))?;
    for (name, from, to) in [("commute", home, work), ("commute home", work, home)] {
        let leg = RouteStep { name: "drive".into(), category: car, distance_m: COMMUTE_M };
        transport.add_route(name, from, to, vec![leg])?;
    }

    // 5. Variables: cooking makes dirty dishes, washing up clears them.
    let dishes = b.register_variable("dirty dishes", kitchen, 0.0)?;

    // 6. Affordances.
    let mut cook = AffordanceConfig::new("cook", kitchen, flat("cook", 40, 1.0));
    cook.device_profiles.push(DeviceProfile {
        device:            stove,
        profile:           flat("stove", 30, 1.0),
        load_type:         electricity,
        time_offset_steps: 5,
    });
    cook.variable_operations.push(VariableOperation {
        variable:  dishes,
        action:    VariableAction::Add,
        value:     1.0,
        execution: VariableExecutionTime::AtEnd,
    });
    cook.time_limit = Some(window("meal times", horizon, &[690..780, 1_050..1_200]));
    cook.weight = 4;
    b.add_affordance(cook)?;

    let mut wash_up = AffordanceConfig::new("wash up", kitchen, flat("wash up", 15, 1.0));
    wash_up.device_profiles.push(DeviceProfile {
        device:            sink,
        profile:           flat("rinse", 8, 1.0),
        load_type:         water,
        time_offset_steps: 0,
    });
    wash_up.requirements.push(VariableRequirement {
        variable:    dishes,
        condition:   VariableCondition::EqualOrGreater,
        value:       1.0,
        description: "dishes to wash".into(),
    });
    wash_up.require_all = true;
    wash_up.variable_operations.push(VariableOperation {
        variable:  dishes,
        action:    VariableAction::SetTo,
        value:     0.0,
        execution: VariableExecutionTime::AtEnd,
    });
    wash_up.weight = 6;
    wash_up.is_interrupting = true;
    b.add_affordance(wash_up)?;

    let mut shower_aff = AffordanceConfig::new("shower", bathroom, flat("shower", 12, 1.0));
    shower_aff.device_profiles.push(DeviceProfile {
        device:            shower,
        profile:           flat("shower flow", 10, 1.0),
        load_type:         water,
        time_offset_steps: 1,
    });
    shower_aff.device_profiles.push(DeviceProfile {
        device:            boiler,
        profile:           flat("reheat", 20, 1.0),
        load_type:         electricity,
        time_offset_steps: 1,
    });
    shower_aff.time_limit = Some(window("mornings", horizon, &[360..480]));
    shower_aff.weight = 8;
    b.add_affordance(shower_aff)?;

    let mut watch_tv = AffordanceConfig::new("watch tv", living, flat("watch tv", 60, 1.0));
    watch_tv.device_profiles.push(DeviceProfile {
        device:            tv,
        profile:           flat("tv", 60, 1.0),
        load_type:         electricity,
        time_offset_steps: 0,
    });
    watch_tv.needs_light = true;
    watch_tv.time_limit = Some(window("evenings", horizon, &[1_140..1_380]));
    watch_tv.weight = 3;
    watch_tv.is_interruptible = true;
    b.add_affordance(watch_tv)?;

    let mut sleep = AffordanceConfig::new("sleep", living, flat("sleep", 60, 1.0));
    sleep.time_limit = Some(window("nights", horizon, &[0..360, 1_380..1_440]));
    sleep.weight = 10;
    b.add_affordance(sleep)?;

    let relax = AffordanceConfig::new("relax", living, flat("relax", 30, 1.0));
    b.add_affordance(relax)?;

    let mut office_work = AffordanceConfig::new("office work", office, flat("office work", 240, 1.0));
    office_work.min_age = 18;
    office_work.time_limit = Some(window("office hours", horizon, &[480..960]));
    office_work.weight = 20;
    b.add_routed_affordance(office_work, work)?;

    // 7. Persons, both starting in the living room.
    b.add_person(PersonDescriptor::new(PersonId(0), "Carla", 41, Gender::Female), living)?;
    b.add_person(PersonDescriptor::new(PersonId(1), "Dan", 9, Gender::Male), living)?;

    Ok(b.build()?)
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let params = load_params()?;
    params.validate()?;
    info!(
        households = HOUSEHOLDS,
        steps = params.internal_timesteps,
        step_secs = params.internal_step_secs,
        seed = params.seed,
        "household demo starting"
    );

    let mut jobs = Vec::new();
    let mut dirs: Vec<PathBuf> = Vec::new();
    for i in 0..HOUSEHOLDS {
        let household = build_household(HouseholdId(i), params.clone())?;
        let dir = Path::new("output").join(format!("household_{i}"));
        std::fs::create_dir_all(&dir)?;
        let writer = CsvWriter::new(&dir, params.csv_delimiter)?;
        jobs.push((household, HouseholdOutputObserver::new(writer, &params)));
        dirs.push(dir);
    }

    let cancel = AtomicBool::new(false);
    let t0 = Instant::now();
    let outcomes = run_households(&mut jobs, &cancel);
    let elapsed = t0.elapsed();
    println!("Simulated {HOUSEHOLDS} households in {:.3} s", elapsed.as_secs_f64());
    println!();

    for ((household, observer), (outcome, dir)) in jobs.iter_mut().zip(outcomes.into_iter().zip(&dirs)) {
        match outcome? {
            RunOutcome::Completed => {}
            RunOutcome::Cancelled { at } => warn!(household = %household.id, %at, "run cancelled"),
        }
        if let Some(e) = observer.take_error() {
            eprintln!("output error for {}: {e}", household.id);
        }

        println!("{} → {}", household.id, dir.display());
        println!("  activations: {}", household.activation_log.len());
        println!("  trips:       {}", household.transport.log.events().len());
        println!("  battery:     {:.0} Wh", household.storages[0].fill_level());
        println!("  {:<14} {:>12}  {}", "Load type", "Total", "Unit");
        for total in household.odap.totals() {
            println!("  {:<14} {:>12.1}  {}", total.name, total.total, total.unit_of_sum);
        }
        println!();
    }

    Ok(())
}
