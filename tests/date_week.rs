#![forbid(unsafe_code)]
use brigade::date::{shift_week, week_start};
use brigade::{parse_canonical_date, to_canonical_date, week_dates_containing, DateError};
use chrono::{Datelike, Duration, Local, NaiveDate, TimeZone, Weekday};

#[test]
fn canonical_string_round_trips() {
    for d in ["2024-06-02", "2023-12-31", "2024-02-29", "1999-01-01"] {
        let parsed = parse_canonical_date(d).unwrap();
        assert_eq!(to_canonical_date(&parsed).unwrap(), d);
        assert_eq!(to_canonical_date(d).unwrap(), d);
    }
}

#[test]
fn empty_or_absent_input_gives_empty_string() {
    assert_eq!(to_canonical_date("").unwrap(), "");
    assert_eq!(to_canonical_date("   ").unwrap(), "");
    let none: Option<NaiveDate> = None;
    assert_eq!(to_canonical_date(&none).unwrap(), "");
}

#[test]
fn loose_layouts_are_normalised() {
    assert_eq!(to_canonical_date("2024-6-2").unwrap(), "2024-06-02");
    assert_eq!(to_canonical_date("2024/06/02").unwrap(), "2024-06-02");
    assert_eq!(to_canonical_date("2024-06-02 18:45:00").unwrap(), "2024-06-02");
}

#[test]
fn slash_dates_read_month_first() {
    assert_eq!(to_canonical_date("06/02/2024").unwrap(), "2024-06-02");
    assert_eq!(to_canonical_date("12/31/2023").unwrap(), "2023-12-31");
    assert!(to_canonical_date("31/12/2023").is_err());
}

#[test]
fn local_datetime_uses_local_calendar_day() {
    let late = Local.with_ymd_and_hms(2024, 6, 2, 23, 30, 0).unwrap();
    assert_eq!(to_canonical_date(&late).unwrap(), "2024-06-02");
    let early = Local.with_ymd_and_hms(2024, 6, 3, 0, 15, 0).unwrap();
    assert_eq!(to_canonical_date(&early).unwrap(), "2024-06-03");
}

#[test]
fn unparseable_string_is_an_error() {
    let err = to_canonical_date("next tuesday").unwrap_err();
    assert_eq!(err, DateError::InvalidDateFormat("next tuesday".into()));
    assert!(to_canonical_date("2024-13-01").is_err());
}

#[test]
fn parse_rejects_malformed_components() {
    let bad_inputs = [
        "2024-06",
        "2024-06-02-01",
        "2024-00-10",
        "0-06-02",
        "2024-06-xx",
        "2024-02-30",
        "",
    ];
    for bad in bad_inputs {
        assert!(
            matches!(parse_canonical_date(bad), Err(DateError::InvalidDateFormat(_))),
            "{bad} should be rejected"
        );
    }
}

#[test]
fn week_runs_sunday_to_saturday() {
    let week = week_dates_containing(Some("2024-06-05")).unwrap();
    assert_eq!(
        week,
        [
            "2024-06-02",
            "2024-06-03",
            "2024-06-04",
            "2024-06-05",
            "2024-06-06",
            "2024-06-07",
            "2024-06-08",
        ]
    );
}

#[test]
fn week_contains_reference_and_is_consecutive() {
    let mut day = NaiveDate::from_ymd_opt(2023, 12, 20).unwrap();
    for _ in 0..30 {
        let canonical = to_canonical_date(&day).unwrap();
        let week = week_dates_containing(Some(canonical.as_str())).unwrap();
        assert!(week.contains(&canonical));

        let parsed: Vec<NaiveDate> =
            week.iter().map(|d| parse_canonical_date(d).unwrap()).collect();
        assert_eq!(parsed[0].weekday(), Weekday::Sun);
        for pair in parsed.windows(2) {
            assert_eq!(pair[1] - pair[0], Duration::days(1));
        }
        day = day.succ_opt().unwrap();
    }
}

#[test]
fn sunday_reference_starts_its_own_week() {
    let week = week_dates_containing(Some("2024-06-02")).unwrap();
    assert_eq!(week[0], "2024-06-02");
    assert_eq!(week[6], "2024-06-08");
}

#[test]
fn missing_reference_uses_current_week() {
    let today = Local::now().date_naive();
    let week = week_dates_containing(None).unwrap();
    assert!(week.contains(&to_canonical_date(&today).unwrap()));
}

#[test]
fn week_navigation_moves_by_seven_days() {
    let start = week_start(NaiveDate::from_ymd_opt(2024, 6, 5).unwrap());
    assert_eq!(shift_week(start, 1), NaiveDate::from_ymd_opt(2024, 6, 9));
    assert_eq!(shift_week(start, -1), NaiveDate::from_ymd_opt(2024, 5, 26));
}

#[test]
fn week_navigation_out_of_range_is_none() {
    let start = week_start(NaiveDate::from_ymd_opt(2024, 6, 5).unwrap());
    assert_eq!(shift_week(start, 100_000_000), None);
    assert_eq!(shift_week(start, i64::MIN), None);
    assert_eq!(shift_week(start, -106_000), None);
    assert_eq!(shift_week(start, 0), Some(start));
}

#[test]
fn weeks_reaching_year_zero_are_rejected() {
    assert!(week_dates_containing(Some("0001-01-01")).is_err());
    assert!(week_dates_containing(Some("9999-12-31")).is_err());
    let week = week_dates_containing(Some("0001-01-10")).unwrap();
    for d in &week {
        assert!(parse_canonical_date(d).is_ok(), "{d} should parse back");
    }
}
