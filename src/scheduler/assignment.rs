use crate::history::WorkHistory;
use crate::model::{Requirements, Schedule, Staff};
use std::collections::BTreeMap;

/// Rotation « le moins travaillé d'abord », rôle par rôle.
///
/// Chaque rôle présent dans `available` a une entrée dans le résultat. Le
/// personnel est pris par compteur hebdomadaire croissant (absent = 0) ; tri
/// stable, donc l'ordre d'entrée départage les égalités. Un rôle en manque
/// garde ceux qu'il a, sans erreur.
pub fn assign_round_robin(
    available: &BTreeMap<String, Vec<Staff>>,
    requirements: &Requirements,
    history: &WorkHistory,
) -> Schedule {
    available
        .iter()
        .map(|(role, staff)| {
            let required = requirements.get(role).copied().unwrap_or(0) as usize;
            (role.clone(), pick_least_worked(staff, required, history))
        })
        .collect()
}

fn pick_least_worked(staff: &[Staff], required: usize, history: &WorkHistory) -> Vec<String> {
    if required == 0 || staff.is_empty() {
        return Vec::new();
    }

    let mut sorted: Vec<&Staff> = staff.iter().collect();
    sorted.sort_by_key(|s| history.count(&s.name));

    sorted
        .into_iter()
        .take(required.min(staff.len()))
        .map(|s| s.name.clone())
        .collect()
}
