use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Rôle -> noms du personnel (ordonnés). Sert aux shifts stockés comme à
/// la sélection en cours d'édition.
pub type Schedule = BTreeMap<String, Vec<String>>;

/// Rôle -> effectif requis.
pub type Requirements = BTreeMap<String, u32>;

/// Identifiant fort pour Staff
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StaffId(String);

impl StaffId {
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Membre du personnel.
///
/// L'historique et les affectations référencent le personnel par `name` :
/// les noms sont supposés uniques.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Staff {
    pub id: StaffId,
    pub name: String,
    pub position: String,
    /// Nom du jour de repos (`"Monday"`, `"mon"`...). Vide = pas de repos fixe.
    #[serde(default)]
    pub day_off: String,
}

impl Staff {
    pub fn new<N: Into<String>, P: Into<String>>(name: N, position: P) -> Self {
        Self {
            id: StaffId::random(),
            name: name.into(),
            position: position.into(),
            day_off: String::new(),
        }
    }

    pub fn with_day_off<D: Into<String>>(mut self, day_off: D) -> Self {
        self.day_off = day_off.into();
        self
    }

    /// `None` si aucun repos n'est défini ou si la valeur n'est pas un jour.
    pub fn day_off_weekday(&self) -> Option<Weekday> {
        let raw = self.day_off.trim();
        if raw.is_empty() {
            return None;
        }
        raw.parse().ok()
    }
}

/// Identifiant fort pour Shift
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShiftId(String);

impl ShiftId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Planning d'une journée (date canonique `YYYY-MM-DD`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shift {
    pub id: ShiftId,
    pub date: String,
    #[serde(default)]
    pub scheduled_staff: Schedule,
}

impl Shift {
    pub fn new<D: Into<String>>(date: D, scheduled_staff: Schedule) -> Self {
        Self {
            id: ShiftId::random(),
            date: date.into(),
            scheduled_staff,
        }
    }

    /// Nombre de places (rôle, personne) occupées.
    pub fn slot_count(&self) -> usize {
        self.scheduled_staff.values().map(Vec::len).sum()
    }
}

/// Personnel disponible et effectifs requis, par rôle, pour une date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailableStaff {
    #[serde(default)]
    pub available_staff: BTreeMap<String, Vec<Staff>>,
    #[serde(default)]
    pub requirements: Requirements,
}

impl AvailableStaff {
    pub fn for_role(&self, role: &str) -> &[Staff] {
        self.available_staff.get(role).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Contenu complet d'un magasin : personnel, shifts, effectifs requis.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub staff: Vec<Staff>,
    #[serde(default)]
    pub shifts: Vec<Shift>,
    #[serde(default)]
    pub requirements: Requirements,
}
