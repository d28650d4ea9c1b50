use crate::date::DateError;
use crate::model::Schedule;
use thiserror::Error;

/// Rôle dont l'effectif affecté est inférieur à l'effectif requis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortfall {
    pub role: String,
    pub assigned: usize,
    pub required: u32,
}

impl Shortfall {
    pub fn missing(&self) -> usize {
        (self.required as usize).saturating_sub(self.assigned)
    }
}

/// Planning proposé par la rotation, en attente de confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proposal {
    pub date: String,
    pub schedule: Schedule,
    pub shortfalls: Vec<Shortfall>,
}

impl Proposal {
    pub fn is_understaffed(&self) -> bool {
        !self.shortfalls.is_empty()
    }
}

#[derive(Error, Debug)]
pub enum SchedError {
    #[error(transparent)]
    InvalidDateFormat(#[from] DateError),
    #[error("remote request failed: {0:#}")]
    RemoteRequestFailed(anyhow::Error),
    #[error("no date selected")]
    NoDateSelected,
    #[error("no available staff loaded for the selected date")]
    NoAvailableStaffLoaded,
    #[error("unknown role: {0}")]
    UnknownRole(String),
}
