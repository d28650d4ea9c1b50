use super::{assign_round_robin, Proposal, SchedError, StaffingChecker};
use crate::date::{week_dates_containing, IntoCanonicalDate};
use crate::history::{compute_work_history, WorkHistory};
use crate::model::{AvailableStaff, Schedule, Shift, ShiftId};
use crate::roles::RoleTable;
use crate::store::ShiftStore;

/// Session de planification.
///
/// Seul propriétaire de l'état modifiable : date choisie, personnel
/// disponible, historique de la semaine et sélection en cours. Un appel au
/// magasin qui échoue laisse cet état intact.
#[derive(Debug)]
pub struct SchedulingSession<S: ShiftStore> {
    store: S,
    roles: RoleTable,
    selected_date: Option<String>,
    available: Option<AvailableStaff>,
    selected: Schedule,
    history: WorkHistory,
    shifts: Vec<Shift>,
}

impl<S: ShiftStore> SchedulingSession<S> {
    pub fn new(store: S, roles: RoleTable) -> Self {
        let selected = empty_selection(&roles, None);
        Self {
            store,
            roles,
            selected_date: None,
            available: None,
            selected,
            history: WorkHistory::default(),
            shifts: Vec::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }
    pub fn roles(&self) -> &RoleTable {
        &self.roles
    }
    pub fn selected_date(&self) -> Option<&str> {
        self.selected_date.as_deref()
    }
    pub fn available_staff(&self) -> Option<&AvailableStaff> {
        self.available.as_ref()
    }
    pub fn selected_staff(&self) -> &Schedule {
        &self.selected
    }
    pub fn work_history(&self) -> &WorkHistory {
        &self.history
    }
    pub fn shifts(&self) -> &[Shift] {
        &self.shifts
    }

    /// Choisit la date à planifier.
    ///
    /// Changer de date oublie le personnel chargé pour la précédente.
    pub fn select_date<D: IntoCanonicalDate + ?Sized>(
        &mut self,
        input: &D,
    ) -> Result<&str, SchedError> {
        let date = input.canonical()?;
        if date.is_empty() {
            return Err(SchedError::NoDateSelected);
        }
        if self.selected_date.as_deref() != Some(date.as_str()) {
            self.available = None;
        }
        Ok(self.selected_date.insert(date).as_str())
    }

    /// Charge le personnel disponible et l'historique de la semaine, puis
    /// remet la sélection à zéro.
    pub fn load_available_staff(&mut self) -> Result<&AvailableStaff, SchedError> {
        let date = self.require_date()?.to_string();
        let available = self
            .store
            .fetch_available_staff(&date)
            .map_err(SchedError::RemoteRequestFailed)?;
        let history = self.week_history(&date)?;

        tracing::debug!(%date, roles = available.available_staff.len(), "available staff loaded");
        self.selected = empty_selection(&self.roles, Some(&available));
        self.history = history;
        Ok(self.available.insert(available))
    }

    pub fn reset_selection(&mut self) {
        self.selected = empty_selection(&self.roles, self.available.as_ref());
    }

    /// Remplace la sélection manuelle d'un rôle.
    pub fn set_role_selection<I, N>(&mut self, role: &str, names: I) -> Result<(), SchedError>
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        self.check_role(role)?;
        self.selected
            .insert(role.to_string(), names.into_iter().map(Into::into).collect());
        Ok(())
    }

    /// Ajoute `name` au rôle s'il n'y est pas, le retire sinon. Renvoie
    /// `true` si la personne est sélectionnée après l'appel.
    pub fn toggle_staff(&mut self, role: &str, name: &str) -> Result<bool, SchedError> {
        self.check_role(role)?;
        let names = self.selected.entry(role.to_string()).or_default();
        if let Some(pos) = names.iter().position(|n| n == name) {
            names.remove(pos);
            Ok(false)
        } else {
            names.push(name.to_string());
            Ok(true)
        }
    }

    /// Première étape de l'auto-planification : recalcule l'historique de
    /// la semaine, applique la rotation et remplace toute la sélection.
    pub fn propose_schedule(&mut self) -> Result<Proposal, SchedError> {
        let date = self.require_date()?.to_string();
        let Some(available) = self.available.as_ref() else {
            return Err(SchedError::NoAvailableStaffLoaded);
        };
        let history = self.week_history(&date)?;

        let schedule =
            assign_round_robin(&available.available_staff, &available.requirements, &history);
        let shortfalls = self.checker().shortfalls(&schedule);
        if !shortfalls.is_empty() {
            tracing::warn!(%date, roles = shortfalls.len(), "proposed schedule is understaffed");
        }

        self.history = history;
        self.selected = schedule.clone();
        Ok(Proposal {
            date,
            schedule,
            shortfalls,
        })
    }

    /// Seconde étape : envoie la sélection courante comme nouveau shift.
    pub fn confirm_and_submit(&mut self) -> Result<Shift, SchedError> {
        let date = self.require_date()?.to_string();
        if self.available.is_none() {
            return Err(SchedError::NoAvailableStaffLoaded);
        }
        let shift = self
            .store
            .submit_shift(&date, &self.selected)
            .map_err(SchedError::RemoteRequestFailed)?;
        self.refresh_shifts();
        Ok(shift)
    }

    pub fn load_shifts(&mut self) -> Result<&[Shift], SchedError> {
        let shifts = self
            .store
            .fetch_all_shifts()
            .map_err(SchedError::RemoteRequestFailed)?;
        self.shifts = shifts;
        Ok(&self.shifts)
    }

    pub fn delete_shift(&mut self, id: &ShiftId) -> Result<(), SchedError> {
        self.store
            .delete_shift(id)
            .map_err(SchedError::RemoteRequestFailed)?;
        self.refresh_shifts();
        Ok(())
    }

    pub fn checker(&self) -> StaffingChecker<'_> {
        StaffingChecker::new(self.available.as_ref().map(|a| &a.requirements), &self.roles)
    }

    pub fn required_count(&self, role: &str) -> u32 {
        self.checker().required_count(role)
    }

    pub fn is_understaffed(&self, role: &str, names: &[String]) -> bool {
        self.checker().is_understaffed(role, names)
    }

    /// Sur la sélection courante.
    pub fn any_understaffed(&self) -> bool {
        self.checker().any_understaffed(&self.selected)
    }

    fn require_date(&self) -> Result<&str, SchedError> {
        self.selected_date.as_deref().ok_or(SchedError::NoDateSelected)
    }

    fn check_role(&self, role: &str) -> Result<(), SchedError> {
        let loaded = self
            .available
            .as_ref()
            .is_some_and(|a| a.available_staff.contains_key(role));
        if loaded || self.roles.contains(role) {
            Ok(())
        } else {
            Err(SchedError::UnknownRole(role.to_string()))
        }
    }

    fn week_history(&self, date: &str) -> Result<WorkHistory, SchedError> {
        let week = week_dates_containing(Some(date))?;
        let all = self
            .store
            .fetch_all_shifts()
            .map_err(SchedError::RemoteRequestFailed)?;
        Ok(compute_work_history(&all, &week))
    }

    // le shift est déjà enregistré : un échec laisse seulement la liste en cache périmée
    fn refresh_shifts(&mut self) {
        if let Err(err) = self.load_shifts() {
            tracing::warn!(%err, "could not refresh shift list");
        }
    }
}

fn empty_selection(roles: &RoleTable, available: Option<&AvailableStaff>) -> Schedule {
    let mut out: Schedule = roles.keys().map(|k| (k.to_string(), Vec::new())).collect();
    if let Some(a) = available {
        for role in a.available_staff.keys() {
            out.entry(role.clone()).or_default();
        }
    }
    out
}
