//! Dates calendaires.
//!
//! Toute date qui traverse une frontière de module est une chaîne canonique
//! `YYYY-MM-DD` construite à partir des champs *locaux*. Les valeurs avec
//! fuseau sont ramenées au fuseau local avant lecture du jour ; jamais d'UTC.

use chrono::{
    DateTime, Datelike, Duration, FixedOffset, Local, NaiveDate, NaiveDateTime, TimeZone,
};
use thiserror::Error;

const CANONICAL_FORMAT: &str = "%Y-%m-%d";

/// Formats acceptés par [`to_canonical_date`] en plus du format canonique.
/// Les dates avec barres sont lues mois/jour/année (`06/02/2024` = 2 juin).
const DATE_LAYOUTS: &[&str] = &["%Y/%m/%d", "%Y.%m.%d", "%m/%d/%Y"];
const DATETIME_LAYOUTS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Années représentables en `YYYY-MM-DD`.
const MIN_YEAR: i32 = 1;
const MAX_YEAR: i32 = 9999;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    #[error("invalid date format: {0:?} (expected YYYY-MM-DD)")]
    InvalidDateFormat(String),
}

/// Tout ce qui se convertit en date canonique.
pub trait IntoCanonicalDate {
    fn canonical(&self) -> Result<String, DateError>;
}

impl IntoCanonicalDate for NaiveDate {
    fn canonical(&self) -> Result<String, DateError> {
        Ok(format_date(*self))
    }
}

impl IntoCanonicalDate for NaiveDateTime {
    fn canonical(&self) -> Result<String, DateError> {
        Ok(format_date(self.date()))
    }
}

impl<Tz: TimeZone> IntoCanonicalDate for DateTime<Tz> {
    fn canonical(&self) -> Result<String, DateError> {
        Ok(format_date(self.with_timezone(&Local).date_naive()))
    }
}

impl IntoCanonicalDate for str {
    fn canonical(&self) -> Result<String, DateError> {
        let raw = self.trim();
        if raw.is_empty() {
            return Ok(String::new());
        }
        if is_canonical(raw) && parse_canonical_date(raw).is_ok() {
            return Ok(raw.to_string());
        }
        parse_loose(raw)
            .map(format_date)
            .ok_or_else(|| DateError::InvalidDateFormat(self.to_string()))
    }
}

impl IntoCanonicalDate for String {
    fn canonical(&self) -> Result<String, DateError> {
        self.as_str().canonical()
    }
}

impl<T: IntoCanonicalDate + ?Sized> IntoCanonicalDate for &T {
    fn canonical(&self) -> Result<String, DateError> {
        (**self).canonical()
    }
}

impl<T: IntoCanonicalDate> IntoCanonicalDate for Option<T> {
    fn canonical(&self) -> Result<String, DateError> {
        match self {
            Some(v) => v.canonical(),
            None => Ok(String::new()),
        }
    }
}

/// Normalise une date en `YYYY-MM-DD`.
///
/// Une chaîne canonique est renvoyée telle quelle, une entrée vide ou absente
/// donne `""`, une chaîne illisible est une erreur.
pub fn to_canonical_date<D: IntoCanonicalDate + ?Sized>(input: &D) -> Result<String, DateError> {
    input.canonical()
}

/// Découpe `YYYY-MM-DD` en trois champs et construit le jour calendaire.
///
/// Chaque champ doit être numérique et non nul ; `2024-02-30` est rejeté
/// (pas de report sur le mois suivant).
pub fn parse_canonical_date(s: &str) -> Result<NaiveDate, DateError> {
    let invalid = || DateError::InvalidDateFormat(s.to_string());
    let parts: Vec<&str> = s.trim().split('-').collect();
    let [year, month, day] = parts.as_slice() else {
        return Err(invalid());
    };
    let year: i32 = parse_field(year).ok_or_else(invalid)?;
    let month: u32 = parse_field(month).ok_or_else(invalid)?;
    let day: u32 = parse_field(day).ok_or_else(invalid)?;
    if year == 0 || month == 0 || day == 0 {
        return Err(invalid());
    }
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

/// Les 7 jours canoniques (dimanche..samedi) de la semaine contenant
/// `reference`, ou de la semaine locale courante sans référence.
///
/// Une semaine qui déborde des années 0001..9999 (la semaine du
/// `0001-01-01` commence le `0000-12-31`) est une erreur.
pub fn week_dates_containing(reference: Option<&str>) -> Result<[String; 7], DateError> {
    let day = match reference {
        Some(s) if !s.trim().is_empty() => parse_canonical_date(&s.canonical()?)?,
        _ => today(),
    };
    let start = week_start(day);
    if !week_in_range(start) {
        return Err(DateError::InvalidDateFormat(format_date(day)));
    }
    Ok(week_days(start).map(format_date))
}

/// Dimanche précédent (ou égal à) `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_sunday()))
}

/// Sept jours consécutifs à partir de `start`.
pub fn week_days(start: NaiveDate) -> [NaiveDate; 7] {
    let mut out = [start; 7];
    for (offset, slot) in (0i64..).zip(out.iter_mut()) {
        *slot = start + Duration::days(offset);
    }
    out
}

/// Décale une date de `weeks` semaines (négatif = passé).
///
/// `None` si le calcul déborde ou si la semaine obtenue sort des années
/// 0001..9999.
pub fn shift_week(date: NaiveDate, weeks: i64) -> Option<NaiveDate> {
    let shifted = date.checked_add_signed(Duration::try_weeks(weeks)?)?;
    let in_years = (MIN_YEAR..=MAX_YEAR).contains(&shifted.year());
    (in_years && week_in_range(week_start(shifted))).then_some(shifted)
}

/// Jour calendaire local courant.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(CANONICAL_FORMAT).to_string()
}

fn week_in_range(start: NaiveDate) -> bool {
    let end = start.checked_add_signed(Duration::days(6));
    start.year() >= MIN_YEAR && end.is_some_and(|d| d.year() <= MAX_YEAR)
}

fn is_canonical(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() == 10
        && b[4] == b'-'
        && b[7] == b'-'
        && b.iter()
            .enumerate()
            .all(|(i, c)| i == 4 || i == 7 || c.is_ascii_digit())
}

fn parse_field<T: std::str::FromStr>(raw: &str) -> Option<T> {
    if raw.is_empty() || !raw.bytes().all(|c| c.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

fn parse_loose(raw: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::<FixedOffset>::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local).date_naive());
    }
    if let Ok(date) = parse_canonical_date(raw) {
        // unpadded `2024-6-2`
        return Some(date);
    }
    DATETIME_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(raw, layout).ok())
        .map(|dt| dt.date())
        .or_else(|| {
            DATE_LAYOUTS
                .iter()
                .find_map(|layout| NaiveDate::parse_from_str(raw, layout).ok())
        })
}
