use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Description statique d'un rôle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleInfo {
    pub key: String,
    pub display_name: String,
    pub icon: String,
    pub color: String,
    pub default_requirement: u32,
}

const BUILTIN: [(&str, &str, &str, &str, u32); 5] = [
    ("servers", "Servers", "🍽️", "#E8F5FF", 5),
    ("bartenders", "Bartenders", "🍸", "#FFF2E8", 2),
    ("chefs", "Chefs", "👨‍🍳", "#F0F9FF", 4),
    ("food_prep", "Food prep", "🥘", "#F7FAFC", 3),
    ("dishwashers", "Dishwashers", "🧽", "#FDF2F8", 2),
];

const FALLBACK_ICON: &str = "👤";
const FALLBACK_COLOR: &str = "#F7FAFC";

/// Effectif utilisé quand ni le magasin ni la table ne connaissent le rôle.
pub const FALLBACK_REQUIREMENT: u32 = 1;

/// Table des rôles, ordonnée et en lecture seule. Construite au démarrage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleTable {
    roles: Vec<RoleInfo>,
}

impl Default for RoleTable {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Surcharge partielle lue en JSON : `{ "chefs": { "default_requirement": 3 } }`.
#[derive(Debug, Clone, Default, Deserialize)]
struct RoleOverride {
    display_name: Option<String>,
    icon: Option<String>,
    color: Option<String>,
    default_requirement: Option<u32>,
}

impl RoleTable {
    /// servers, bartenders, chefs, food_prep, dishwashers.
    pub fn builtin() -> Self {
        let roles = BUILTIN
            .iter()
            .map(|&(key, display_name, icon, color, req)| RoleInfo {
                key: key.to_string(),
                display_name: display_name.to_string(),
                icon: icon.to_string(),
                color: color.to_string(),
                default_requirement: req,
            })
            .collect();
        Self { roles }
    }

    /// Table intégrée + surcharges d'un fichier JSON.
    ///
    /// Les clés inconnues sont ajoutées comme nouveaux rôles, en fin de table.
    pub fn load_with_overrides<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path)
            .with_context(|| format!("reading role table {}", path.display()))?;
        let overrides: BTreeMap<String, RoleOverride> = serde_json::from_slice(&data)
            .with_context(|| format!("parsing role table {}", path.display()))?;

        let mut table = Self::builtin();
        for (key, o) in overrides {
            if key.trim().is_empty() {
                bail!("role key cannot be empty");
            }
            let existing = table.roles.iter().position(|r| r.key == key);
            let pos = match existing {
                Some(pos) => pos,
                None => {
                    table.roles.push(RoleInfo {
                        display_name: key.clone(),
                        key,
                        icon: FALLBACK_ICON.to_string(),
                        color: FALLBACK_COLOR.to_string(),
                        default_requirement: FALLBACK_REQUIREMENT,
                    });
                    table.roles.len() - 1
                }
            };
            let role = &mut table.roles[pos];
            if let Some(v) = o.display_name {
                role.display_name = v;
            }
            if let Some(v) = o.icon {
                role.icon = v;
            }
            if let Some(v) = o.color {
                role.color = v;
            }
            if let Some(v) = o.default_requirement {
                role.default_requirement = v;
            }
        }
        Ok(table)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RoleInfo> {
        self.roles.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.roles.iter().map(|r| r.key.as_str())
    }

    pub fn get(&self, key: &str) -> Option<&RoleInfo> {
        self.roles.iter().find(|r| r.key == key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn default_requirement(&self, key: &str) -> Option<u32> {
        self.get(key).map(|r| r.default_requirement)
    }

    pub fn display_name<'a>(&'a self, key: &'a str) -> &'a str {
        self.get(key).map_or(key, |r| r.display_name.as_str())
    }

    pub fn icon(&self, key: &str) -> &str {
        self.get(key).map_or(FALLBACK_ICON, |r| r.icon.as_str())
    }

    /// `requirements` complété par les valeurs par défaut de la table.
    pub fn merged_requirements(
        &self,
        requirements: &BTreeMap<String, u32>,
    ) -> BTreeMap<String, u32> {
        let mut out: BTreeMap<String, u32> = self
            .roles
            .iter()
            .map(|r| (r.key.clone(), r.default_requirement))
            .collect();
        out.extend(requirements.iter().map(|(k, v)| (k.clone(), *v)));
        out
    }
}
