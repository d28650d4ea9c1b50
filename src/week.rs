//! Vue hebdomadaire : totaux par rôle et affectations jour par jour.

use crate::date::{
    format_date, parse_canonical_date, shift_week, to_canonical_date, week_days, week_start,
    DateError,
};
use crate::model::Shift;
use crate::roles::RoleTable;
use chrono::{Datelike, NaiveDate};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub role: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayAssignments {
    pub date: String,
    pub weekday: String,
    pub assignments: Vec<Assignment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleTotal {
    pub role: String,
    pub display_name: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekOverview {
    pub start: NaiveDate,
    pub days: Vec<DayAssignments>,
    pub totals: Vec<RoleTotal>,
}

impl WeekOverview {
    /// Construit la vue de la semaine (dimanche..samedi) contenant `reference`.
    ///
    /// Les totaux listent tous les rôles de la table, dans son ordre, même à
    /// zéro ; les rôles inconnus de la table sont ajoutés à la suite.
    pub fn build(reference: NaiveDate, shifts: &[Shift], roles: &RoleTable) -> Self {
        let start = week_start(reference);
        let dates = week_days(start);

        let mut totals: Vec<RoleTotal> = roles
            .iter()
            .map(|r| RoleTotal {
                role: r.key.clone(),
                display_name: r.display_name.clone(),
                count: 0,
            })
            .collect();

        let mut days = Vec::with_capacity(dates.len());
        for day in dates {
            let date = format_date(day);
            let mut assignments = Vec::new();
            for shift in shifts.iter().filter(|s| same_day(&s.date, &date)) {
                for (role, names) in &shift.scheduled_staff {
                    let existing = totals.iter().position(|t| &t.role == role);
                    let total = match existing {
                        Some(pos) => &mut totals[pos],
                        None => {
                            totals.push(RoleTotal {
                                role: role.clone(),
                                display_name: roles.display_name(role).to_string(),
                                count: 0,
                            });
                            let last = totals.len() - 1;
                            &mut totals[last]
                        }
                    };
                    total.count += names.len();
                    assignments.extend(names.iter().map(|name| Assignment {
                        role: role.clone(),
                        name: name.clone(),
                    }));
                }
            }
            days.push(DayAssignments {
                date,
                weekday: day.weekday().to_string(),
                assignments,
            });
        }

        Self { start, days, totals }
    }

    /// Variante à partir d'une date canonique, dans les années 0001..9999.
    pub fn for_date(date: &str, shifts: &[Shift], roles: &RoleTable) -> Result<Self, DateError> {
        let reference = shift_week(parse_canonical_date(date)?, 0)
            .ok_or_else(|| DateError::InvalidDateFormat(date.to_string()))?;
        Ok(Self::build(reference, shifts, roles))
    }

    pub fn end(&self) -> NaiveDate {
        week_days(self.start)[6]
    }

    /// `YYYY-MM-DD - YYYY-MM-DD`
    pub fn range_label(&self) -> String {
        format!("{} - {}", format_date(self.start), format_date(self.end()))
    }

    pub fn total_slots(&self) -> usize {
        self.totals.iter().map(|t| t.count).sum()
    }
}

fn same_day(stored: &str, date: &str) -> bool {
    to_canonical_date(stored).is_ok_and(|d| d == date)
}
