#![forbid(unsafe_code)]
use brigade::{
    assign_round_robin, compute_work_history, week_dates_containing, Requirements, RoleTable,
    Schedule, Shift, Staff, StaffingChecker, WorkHistory,
};
use std::collections::BTreeMap;

fn schedule(entries: &[(&str, &[&str])]) -> Schedule {
    entries
        .iter()
        .map(|(role, names)| (role.to_string(), names.iter().map(|n| n.to_string()).collect()))
        .collect()
}

fn shift(date: &str, entries: &[(&str, &[&str])]) -> Shift {
    Shift::new(date, schedule(entries))
}

fn staff(names: &[&str], role: &str) -> Vec<Staff> {
    names.iter().map(|n| Staff::new(*n, role)).collect()
}

fn history(entries: &[(&str, u32)]) -> WorkHistory {
    entries.iter().map(|(n, c)| (n.to_string(), *c)).collect()
}

#[test]
fn history_counts_week_slots() {
    let shifts = vec![shift("2024-06-02", &[("servers", &["Ann", "Bo"])])];
    let week = week_dates_containing(Some("2024-06-02")).unwrap();

    let h = compute_work_history(&shifts, &week);
    assert_eq!(h.count("Ann"), 1);
    assert_eq!(h.count("Bo"), 1);
    assert_eq!(h.len(), 2);
}

#[test]
fn history_ignores_other_weeks_and_sums_slots() {
    let shifts = vec![
        shift("2024-06-01", &[("servers", &["Ann"])]), // semaine précédente
        shift("2024-06-03", &[("servers", &["Ann", "Bo"]), ("chefs", &["Cy"])]),
        shift("2024-06-08", &[("bartenders", &["Ann"]), ("dishwashers", &[])]),
        shift("2024-06-09", &[("servers", &["Bo"])]), // semaine suivante
    ];
    let week = week_dates_containing(Some("2024-06-05")).unwrap();

    let h = compute_work_history(&shifts, &week);
    assert_eq!(h.count("Ann"), 2);
    assert_eq!(h.count("Bo"), 1);
    assert_eq!(h.count("Cy"), 1);
    assert_eq!(h.count("Nobody"), 0);
    assert_eq!(h.total(), 4);
}

#[test]
fn history_is_order_independent() {
    let mut shifts = vec![
        shift("2024-06-03", &[("servers", &["Ann", "Bo"])]),
        shift("2024-06-04", &[("chefs", &["Bo"])]),
        shift("2024-06-05", &[("servers", &["Cy"]), ("chefs", &["Ann"])]),
    ];
    let week = week_dates_containing(Some("2024-06-04")).unwrap();
    let forward = compute_work_history(&shifts, &week);
    shifts.reverse();
    assert_eq!(compute_work_history(&shifts, &week), forward);
}

#[test]
fn history_empty_window_and_bad_dates() {
    let shifts = vec![
        shift("not a date", &[("servers", &["Ann"])]),
        shift("2020-01-01", &[("servers", &["Bo"])]),
    ];
    let week = week_dates_containing(Some("2024-06-04")).unwrap();
    assert!(compute_work_history(&shifts, &week).is_empty());
}

#[test]
fn history_accepts_loose_stored_dates() {
    let shifts = vec![shift("2024-6-4", &[("servers", &["Ann"])])];
    let week = week_dates_containing(Some("2024-06-04")).unwrap();
    assert_eq!(compute_work_history(&shifts, &week).count("Ann"), 1);
}

#[test]
fn round_robin_prefers_least_worked() {
    let mut available = BTreeMap::new();
    available.insert("servers".to_string(), staff(&["Ann", "Bo", "Cy"], "servers"));
    let requirements: Requirements = [("servers".to_string(), 2)].into();
    let h = history(&[("Ann", 0), ("Bo", 2), ("Cy", 1)]);

    let out = assign_round_robin(&available, &requirements, &h);
    assert_eq!(out["servers"], vec!["Ann", "Cy"]);
}

#[test]
fn round_robin_ties_keep_input_order() {
    let mut available = BTreeMap::new();
    available.insert("chefs".to_string(), staff(&["Dee", "Ed", "Flo", "Gus"], "chefs"));
    let requirements: Requirements = [("chefs".to_string(), 3)].into();
    let h = history(&[("Dee", 1), ("Gus", 1)]);

    let out = assign_round_robin(&available, &requirements, &h);
    assert_eq!(out["chefs"], vec!["Ed", "Flo", "Dee"]);
}

#[test]
fn round_robin_lengths_and_order() {
    let mut available = BTreeMap::new();
    available.insert("servers".to_string(), staff(&["A", "B", "C", "D", "E", "F"], "servers"));
    available.insert("bartenders".to_string(), staff(&["G"], "bartenders"));
    available.insert("chefs".to_string(), staff(&["H", "I"], "chefs"));
    available.insert("food_prep".to_string(), Vec::new());
    let requirements: Requirements = [
        ("servers".to_string(), 4),
        ("bartenders".to_string(), 2),
        ("food_prep".to_string(), 3),
    ]
    .into();
    let h = history(&[("A", 3), ("B", 0), ("C", 5), ("D", 1), ("E", 1), ("F", 2), ("G", 4)]);

    let out = assign_round_robin(&available, &requirements, &h);

    // une entrée par rôle disponible
    assert_eq!(out.len(), 4);
    assert_eq!(out["servers"], vec!["B", "D", "E", "F"]);
    assert_eq!(out["bartenders"], vec!["G"]);
    assert!(out["chefs"].is_empty(), "no requirement means nobody");
    assert!(out["food_prep"].is_empty());

    for (role, names) in &out {
        let required = requirements.get(role).copied().unwrap_or(0) as usize;
        assert_eq!(names.len(), required.min(available[role].len()));
        let counts: Vec<u32> = names.iter().map(|n| h.count(n)).collect();
        assert!(counts.windows(2).all(|w| w[0] <= w[1]), "{role}: {counts:?}");
    }
}

#[test]
fn round_robin_ignores_roles_only_in_requirements() {
    let available = BTreeMap::new();
    let requirements: Requirements = [("servers".to_string(), 2)].into();
    let out = assign_round_robin(&available, &requirements, &WorkHistory::new());
    assert!(out.is_empty());
}

#[test]
fn required_count_falls_back() {
    let roles = RoleTable::builtin();
    let requirements: Requirements = [("chefs".to_string(), 3), ("servers".to_string(), 0)].into();
    let checker = StaffingChecker::new(Some(&requirements), &roles);

    assert_eq!(checker.required_count("chefs"), 3);
    assert_eq!(checker.required_count("servers"), 5);
    assert_eq!(checker.required_count("food_prep"), 3);
    assert_eq!(checker.required_count("sommeliers"), 1);

    let defaults = StaffingChecker::new(None, &roles);
    assert_eq!(defaults.required_count("chefs"), 4);
    assert_eq!(defaults.required_count("bartenders"), 2);
    assert_eq!(defaults.required_count("dishwashers"), 2);
}

#[test]
fn understaffed_chefs() {
    let roles = RoleTable::builtin();
    let requirements: Requirements = [("chefs".to_string(), 4)].into();
    let checker = StaffingChecker::new(Some(&requirements), &roles);

    assert!(checker.is_understaffed("chefs", &["X", "Y"]));
    assert!(!checker.is_understaffed("chefs", &["W", "X", "Y", "Z"]));
}

#[test]
fn any_understaffed_is_or_over_roles() {
    let roles = RoleTable::builtin();
    let requirements: Requirements = [("servers".to_string(), 2), ("chefs".to_string(), 1)].into();
    let checker = StaffingChecker::new(Some(&requirements), &roles);

    let full = schedule(&[("servers", &["A", "B"]), ("chefs", &["C"])]);
    assert!(!checker.any_understaffed(&full));
    assert!(checker.shortfalls(&full).is_empty());

    let short = schedule(&[("servers", &["A"]), ("chefs", &["C"])]);
    assert!(checker.any_understaffed(&short));
    let shortfalls = checker.shortfalls(&short);
    assert_eq!(shortfalls.len(), 1);
    assert_eq!(shortfalls[0].role, "servers");
    assert_eq!(shortfalls[0].missing(), 1);

    assert!(!checker.any_understaffed(&Schedule::new()));
}
