use super::Shortfall;
use crate::model::{Requirements, Schedule};
use crate::roles::{RoleTable, FALLBACK_REQUIREMENT};

/// Contrôle des effectifs.
///
/// Effectif requis : valeur du magasin (si > 0), sinon défaut de la table
/// des rôles, sinon 1.
#[derive(Debug, Clone, Copy)]
pub struct StaffingChecker<'a> {
    requirements: Option<&'a Requirements>,
    roles: &'a RoleTable,
}

impl<'a> StaffingChecker<'a> {
    pub fn new(requirements: Option<&'a Requirements>, roles: &'a RoleTable) -> Self {
        Self {
            requirements,
            roles,
        }
    }

    pub fn required_count(&self, role: &str) -> u32 {
        self.requirements
            .and_then(|r| r.get(role).copied())
            .filter(|&n| n > 0)
            .or_else(|| self.roles.default_requirement(role).filter(|&n| n > 0))
            .unwrap_or(FALLBACK_REQUIREMENT)
    }

    pub fn is_understaffed<S>(&self, role: &str, assigned: &[S]) -> bool {
        assigned.len() < self.required_count(role) as usize
    }

    pub fn any_understaffed(&self, schedule: &Schedule) -> bool {
        schedule
            .iter()
            .any(|(role, names)| self.is_understaffed(role, names.as_slice()))
    }

    /// Rôles en sous-effectif, dans l'ordre des clés.
    pub fn shortfalls(&self, schedule: &Schedule) -> Vec<Shortfall> {
        schedule
            .iter()
            .filter(|(role, names)| self.is_understaffed(role, names.as_slice()))
            .map(|(role, names)| Shortfall {
                role: role.clone(),
                assigned: names.len(),
                required: self.required_count(role),
            })
            .collect()
    }
}
