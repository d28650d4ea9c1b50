//! Historique hebdomadaire : nombre de places occupées par chaque membre
//! du personnel sur une semaine donnée.

use crate::date::to_canonical_date;
use crate::model::Shift;
use std::collections::{HashMap, HashSet};

/// Nom -> nombre de places occupées sur la semaine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkHistory {
    counts: HashMap<String, u32>,
}

impl WorkHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compteur de `name` (0 si absent).
    pub fn count(&self, name: &str) -> u32 {
        self.counts.get(name).copied().unwrap_or(0)
    }

    pub fn record(&mut self, name: &str) {
        *self.counts.entry(name.to_string()).or_insert(0) += 1;
    }

    pub fn total(&self) -> u32 {
        self.counts.values().sum()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.counts.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Entrées triées par compteur croissant, puis par nom.
    pub fn sorted(&self) -> Vec<(&str, u32)> {
        let mut out: Vec<(&str, u32)> = self.iter().collect();
        out.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)));
        out
    }
}

impl FromIterator<(String, u32)> for WorkHistory {
    fn from_iter<I: IntoIterator<Item = (String, u32)>>(iter: I) -> Self {
        Self {
            counts: iter.into_iter().collect(),
        }
    }
}

/// Compte les places occupées dans les shifts datés dans `week_dates`.
///
/// Les shifts hors fenêtre sont ignorés ; une date illisible est sautée
/// avec un warning.
pub fn compute_work_history<S: AsRef<str>>(shifts: &[Shift], week_dates: &[S]) -> WorkHistory {
    let window: HashSet<&str> = week_dates.iter().map(|d| d.as_ref()).collect();
    let mut history = WorkHistory::new();

    for shift in shifts {
        let date = match to_canonical_date(shift.date.as_str()) {
            Ok(d) => d,
            Err(err) => {
                tracing::warn!(
                    shift = shift.id.as_str(),
                    %err,
                    "skipping shift with unreadable date"
                );
                continue;
            }
        };
        if !window.contains(date.as_str()) {
            continue;
        }
        for name in shift.scheduled_staff.values().flatten() {
            history.record(name);
        }
    }

    tracing::debug!(entries = history.len(), slots = history.total(), "work history computed");
    history
}
