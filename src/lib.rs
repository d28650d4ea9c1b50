#![forbid(unsafe_code)]
//! Brigade — planification du personnel d'un restaurant.
//!
//! - Dates canoniques `YYYY-MM-DD` en heure locale, semaines du dimanche au samedi.
//! - Historique de travail hebdomadaire par nom.
//! - Rotation round-robin « le moins travaillé d'abord ».
//! - Contrôle des sous-effectifs.
//! - Magasin de shifts derrière un trait (fichier JSON ou mémoire).

pub mod date;
pub mod history;
pub mod io;
pub mod model;
pub mod roles;
pub mod scheduler;
pub mod store;
pub mod week;

pub use date::{
    parse_canonical_date, to_canonical_date, week_dates_containing, DateError, IntoCanonicalDate,
};
pub use history::{compute_work_history, WorkHistory};
pub use model::{AvailableStaff, Dataset, Requirements, Schedule, Shift, ShiftId, Staff, StaffId};
pub use roles::{RoleInfo, RoleTable};
pub use scheduler::{
    assign_round_robin, Proposal, SchedError, SchedulingSession, Shortfall, StaffingChecker,
};
pub use store::{JsonStore, MemoryStore, ShiftStore};
pub use week::WeekOverview;
