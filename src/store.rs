//! Frontière vers le magasin de shifts.
//!
//! [`ShiftStore`] regroupe tout ce dont le cœur de planification a besoin
//! de l'extérieur. [`JsonStore`] garde un [`Dataset`] dans un fichier JSON
//! (sauvegardes atomiques), [`MemoryStore`] le garde en mémoire.

use crate::date::{parse_canonical_date, to_canonical_date};
use crate::model::{AvailableStaff, Dataset, Schedule, Shift, ShiftId, Staff};
use crate::roles::RoleTable;
use anyhow::{bail, Context};
use chrono::Datelike;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub trait ShiftStore {
    /// Tous les shifts enregistrés, sans filtre.
    fn fetch_all_shifts(&self) -> anyhow::Result<Vec<Shift>>;
    /// Personnel disponible et effectifs requis pour une date canonique.
    fn fetch_available_staff(&self, date: &str) -> anyhow::Result<AvailableStaff>;
    /// Crée un shift ; remplace celui déjà enregistré pour la même date.
    fn submit_shift(&mut self, date: &str, schedule: &Schedule) -> anyhow::Result<Shift>;
    fn delete_shift(&mut self, id: &ShiftId) -> anyhow::Result<()>;
}

/// Magasin fichier JSON.
#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
    roles: RoleTable,
}

impl JsonStore {
    pub fn open<P: AsRef<Path>>(path: P, roles: RoleTable) -> anyhow::Result<Self> {
        Ok(Self {
            path: path.as_ref().to_path_buf(),
            roles,
        })
    }

    /// Charge le dataset ; un fichier absent donne un dataset vide.
    pub fn load(&self) -> anyhow::Result<Dataset> {
        if !self.path.exists() {
            return Ok(Dataset::default());
        }
        let data =
            fs::read(&self.path).with_context(|| format!("reading {}", self.path.display()))?;
        let dataset: Dataset = serde_json::from_slice(&data)
            .with_context(|| format!("parsing {}", self.path.display()))?;
        Ok(dataset)
    }

    /// Sauvegarde de manière atomique.
    pub fn save(&self, dataset: &Dataset) -> anyhow::Result<()> {
        let json = serde_json::to_vec_pretty(dataset)?;
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir).with_context(|| "creating temp file")?;
        tmp.write_all(&json)?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).with_context(|| "atomic rename")?;
        Ok(())
    }
}

impl ShiftStore for JsonStore {
    fn fetch_all_shifts(&self) -> anyhow::Result<Vec<Shift>> {
        Ok(self.load()?.shifts)
    }

    fn fetch_available_staff(&self, date: &str) -> anyhow::Result<AvailableStaff> {
        availability(&self.load()?, &self.roles, date)
    }

    fn submit_shift(&mut self, date: &str, schedule: &Schedule) -> anyhow::Result<Shift> {
        let mut dataset = self.load()?;
        let shift = insert_shift(&mut dataset, &self.roles, date, schedule)?;
        self.save(&dataset)?;
        Ok(shift)
    }

    fn delete_shift(&mut self, id: &ShiftId) -> anyhow::Result<()> {
        let mut dataset = self.load()?;
        remove_shift(&mut dataset, id)?;
        self.save(&dataset)
    }
}

/// Magasin en mémoire.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    dataset: Dataset,
    roles: RoleTable,
}

impl MemoryStore {
    pub fn new(dataset: Dataset, roles: RoleTable) -> Self {
        Self { dataset, roles }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }
}

impl ShiftStore for MemoryStore {
    fn fetch_all_shifts(&self) -> anyhow::Result<Vec<Shift>> {
        Ok(self.dataset.shifts.clone())
    }

    fn fetch_available_staff(&self, date: &str) -> anyhow::Result<AvailableStaff> {
        availability(&self.dataset, &self.roles, date)
    }

    fn submit_shift(&mut self, date: &str, schedule: &Schedule) -> anyhow::Result<Shift> {
        insert_shift(&mut self.dataset, &self.roles, date, schedule)
    }

    fn delete_shift(&mut self, id: &ShiftId) -> anyhow::Result<()> {
        remove_shift(&mut self.dataset, id)
    }
}

/// Personnel hors jour de repos, groupé par poste. Chaque rôle de la table
/// a une entrée, même vide ; les postes absents de la table sont ignorés.
fn availability(
    dataset: &Dataset,
    roles: &RoleTable,
    date: &str,
) -> anyhow::Result<AvailableStaff> {
    let day = parse_canonical_date(date)?;
    let weekday = day.weekday();

    let mut available_staff: BTreeMap<String, Vec<Staff>> =
        roles.keys().map(|k| (k.to_string(), Vec::new())).collect();

    for staff in &dataset.staff {
        let Some(slot) = available_staff.get_mut(&staff.position) else {
            tracing::warn!(
                staff = %staff.name,
                position = %staff.position,
                "unknown position, skipped"
            );
            continue;
        };
        if staff.day_off_weekday() == Some(weekday) {
            continue;
        }
        if !staff.day_off.trim().is_empty() && staff.day_off_weekday().is_none() {
            tracing::warn!(
                staff = %staff.name,
                day_off = %staff.day_off,
                "unreadable day_off, treated as available"
            );
        }
        slot.push(staff.clone());
    }

    Ok(AvailableStaff {
        available_staff,
        requirements: roles.merged_requirements(&dataset.requirements),
    })
}

fn insert_shift(
    dataset: &mut Dataset,
    roles: &RoleTable,
    date: &str,
    schedule: &Schedule,
) -> anyhow::Result<Shift> {
    let canonical = to_canonical_date(date)?;
    if canonical.is_empty() || canonical != date {
        bail!("shift date must be YYYY-MM-DD, got {date:?}");
    }
    if let Some(role) = schedule.keys().find(|r| !roles.contains(r)) {
        bail!("unknown role in schedule: {role}");
    }

    let replaced = dataset.shifts.len();
    dataset.shifts.retain(|s| s.date != canonical);
    if dataset.shifts.len() != replaced {
        tracing::info!(date = %canonical, "replacing existing shift");
    }

    let shift = Shift::new(canonical, schedule.clone());
    tracing::info!(
        id = shift.id.as_str(),
        date = %shift.date,
        slots = shift.slot_count(),
        "shift created"
    );
    dataset.shifts.push(shift.clone());
    Ok(shift)
}

fn remove_shift(dataset: &mut Dataset, id: &ShiftId) -> anyhow::Result<()> {
    let Some(pos) = dataset.shifts.iter().position(|s| &s.id == id) else {
        bail!("unknown shift: {}", id.as_str());
    };
    dataset.shifts.remove(pos);
    tracing::info!(id = id.as_str(), "shift deleted");
    Ok(())
}
