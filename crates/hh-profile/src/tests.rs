#[cfg(test)]
mod conversion {
    use crate::{CalcProfile, ProfileError, ProfileType};

    fn hour_profile(kind: ProfileType) -> CalcProfile {
        let mut p = CalcProfile::new("profile", kind, "blub");
        p.add_time_point(0, 0.01).unwrap();
        p.add_time_point(3_600, 0.01).unwrap();
        p
    }

    #[test]
    fn one_hour_at_one_minute_is_sixty_steps() {
        let mut p = hour_profile(ProfileType::Relative);
        p.convert_to_timesteps(60).unwrap();
        let v = p.step_values().unwrap();
        assert_eq!(v.len(), 60);
        assert!(v.iter().all(|&x| x == 0.01));
    }

    #[test]
    fn values_hold_until_next_point() {
        let mut p = CalcProfile::new("p", ProfileType::Absolute, "");
        p.add_time_point(0, 1.0).unwrap();
        p.add_time_point(120, 2.0).unwrap();
        p.add_time_point(300, 0.0).unwrap();
        p.convert_to_timesteps(60).unwrap();
        assert_eq!(p.step_values().unwrap(), &[1.0, 1.0, 2.0, 2.0, 2.0]);
    }

    #[test]
    fn partial_last_step_rounds_up() {
        let mut p = CalcProfile::new("p", ProfileType::Absolute, "");
        p.add_time_point(0, 3.0).unwrap();
        p.add_time_point(90, 0.0).unwrap();
        p.convert_to_timesteps(60).unwrap();
        assert_eq!(p.len(), 2);
    }

    #[test]
    fn unconverted_access_fails() {
        let p = hour_profile(ProfileType::Relative);
        assert!(matches!(p.step_values(), Err(ProfileError::NotConverted(_))));
        assert_eq!(p.len(), 0);
    }

    #[test]
    fn rejects_malformed_points() {
        let mut p = CalcProfile::new("p", ProfileType::Absolute, "");
        p.add_time_point(60, 1.0).unwrap();
        assert!(matches!(
            p.add_time_point(30, 1.0),
            Err(ProfileError::UnorderedPoint { offset_secs: 30, previous_secs: 60, .. })
        ));
        assert!(matches!(p.add_time_point(90, f64::NAN), Err(ProfileError::NonFiniteValue { .. })));
        assert!(matches!(p.convert_to_timesteps(60), Err(ProfileError::TooFewPoints { count: 1, .. })));
        assert!(matches!(p.convert_to_timesteps(0), Err(ProfileError::ZeroStepLength)));
    }

    #[test]
    fn span_must_be_covered() {
        let mut p = hour_profile(ProfileType::Relative);
        p.convert_to_timesteps(60).unwrap();
        assert_eq!(p.values_for_span(10).unwrap().len(), 10);
        assert!(matches!(
            p.values_for_span(61),
            Err(ProfileError::TooShort { available: 60, requested: 61, .. })
        ));
    }
}

#[cfg(test)]
mod derived {
    use crate::{CalcProfile, ProfileType};

    fn converted(kind: ProfileType, values: Vec<f64>) -> CalcProfile {
        CalcProfile::from_step_values("p", kind, "src", values)
    }

    #[test]
    fn relative_profiles_stretch() {
        let p = converted(ProfileType::Relative, vec![1.0, 2.0]);
        let stretched = p.compress_expand(2.0).unwrap();
        assert_eq!(stretched.step_values().unwrap(), &[1.0, 1.0, 2.0, 2.0]);

        let compressed = converted(ProfileType::Relative, vec![5.0; 10]).compress_expand(0.01).unwrap();
        assert_eq!(compressed.len(), 1);
    }

    #[test]
    fn absolute_profiles_ignore_time_factor() {
        let p = converted(ProfileType::Absolute, vec![1.0, 2.0]);
        assert_eq!(p.compress_expand(3.0).unwrap(), p);
    }

    #[test]
    fn dead_time_then_append() {
        let mut travel = CalcProfile::dead_time(3, "travel", "route");
        let activity = converted(ProfileType::Relative, vec![0.5, 0.25]);
        travel.append(&activity).unwrap();
        assert_eq!(travel.step_values().unwrap(), &[1.0, 1.0, 1.0, 0.5, 0.25]);
        assert_eq!(travel.data_source, "route");
    }

    #[test]
    fn truncation_keeps_prefix() {
        let p = converted(ProfileType::Absolute, vec![1.0, 2.0, 3.0]);
        assert_eq!(p.truncated(2).unwrap().step_values().unwrap(), &[1.0, 2.0]);
        assert_eq!(p.truncated(10).unwrap().len(), 3);
        assert_eq!(p.total(), 6.0);
    }
}

#[cfg(test)]
mod loader {
    use std::io::Cursor;

    use crate::loader::parse_offset;
    use crate::{load_profiles_reader, ProfileError, ProfileType};

    const CSV: &str = "\
name,type,offset,value,data_source
fridge,relative,0,1.0,measured
fridge,relative,00:20:00,0.1,measured
fridge,relative,01:00:00,0.0,measured
kettle,absolute,0,2000,
kettle,absolute,180,0,
";

    #[test]
    fn loads_profiles_in_order() {
        let mut profiles = load_profiles_reader(Cursor::new(CSV)).unwrap();
        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles[0].name, "fridge");
        assert_eq!(profiles[0].profile_type, ProfileType::Relative);
        assert_eq!(profiles[0].data_source, "measured");
        assert_eq!(profiles[0].points().len(), 3);
        assert_eq!(profiles[1].profile_type, ProfileType::Absolute);

        profiles[0].convert_to_timesteps(60).unwrap();
        let v = profiles[0].step_values().unwrap();
        assert_eq!(v.len(), 60);
        assert_eq!(v[19], 1.0);
        assert_eq!(v[20], 0.1);
    }

    #[test]
    fn mixed_types_are_rejected() {
        let csv = "name,type,offset,value\np,relative,0,1\np,absolute,60,0\n";
        assert!(matches!(load_profiles_reader(Cursor::new(csv)), Err(ProfileError::Parse(_))));
    }

    #[test]
    fn bad_type_is_rejected() {
        let csv = "name,type,offset,value\np,sometimes,0,1\n";
        assert!(load_profiles_reader(Cursor::new(csv)).is_err());
    }

    #[test]
    fn offsets() {
        assert_eq!(parse_offset("90").unwrap(), 90);
        assert_eq!(parse_offset("01:02:03").unwrap(), 3_723);
        assert!(parse_offset("1:70:00").is_err());
        assert!(parse_offset("noon").is_err());
    }
}
