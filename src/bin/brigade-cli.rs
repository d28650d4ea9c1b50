#![forbid(unsafe_code)]
use anyhow::{bail, Context, Result};
use brigade::{
    date::{parse_canonical_date, shift_week, today, to_canonical_date},
    io,
    model::{Schedule, ShiftId},
    roles::RoleTable,
    scheduler::{SchedulingSession, StaffingChecker},
    store::{JsonStore, ShiftStore},
    week::WeekOverview,
};
use clap::{Parser, Subcommand};
use std::collections::HashSet;
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI de planification du personnel (rotation round-robin)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier JSON du magasin (personnel + shifts)
    #[arg(long, global = true, default_value = "brigade.json")]
    data: String,

    /// Surcharges JSON de la table des rôles
    #[arg(long, global = true)]
    roles: Option<String>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Importer du personnel depuis un CSV
    ImportStaff {
        #[arg(long)]
        csv: String,
    },

    /// Lister le personnel disponible pour une date
    Available {
        /// YYYY-MM-DD
        #[arg(long)]
        date: String,
    },

    /// Historique de travail de la semaine contenant la date
    History {
        #[arg(long)]
        date: String,
    },

    /// Proposer (et éventuellement créer) un planning en round-robin
    Auto {
        #[arg(long)]
        date: String,
        /// Créer le shift sans relecture
        #[arg(long)]
        yes: bool,
    },

    /// Créer un planning manuel
    Assign {
        #[arg(long)]
        date: String,
        /// "role=nom1,nom2" (répétable)
        #[arg(long = "role", value_parser = parse_role_arg)]
        picks: Vec<(String, Vec<String>)>,
    },

    /// Lister les shifts enregistrés
    Shifts {
        #[arg(long)]
        out_json: Option<String>,
    },

    /// Supprimer un shift
    Delete {
        #[arg(long)]
        id: String,
    },

    /// Vue de la semaine
    Week {
        /// Date de référence (défaut : aujourd'hui)
        #[arg(long)]
        date: Option<String>,
        /// Décalage en semaines (négatif = passé)
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        offset: i64,
        #[arg(long)]
        out_csv: Option<String>,
    },
}

fn parse_role_arg(raw: &str) -> std::result::Result<(String, Vec<String>), String> {
    let (role, names) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected role=name1,name2, got {raw:?}"))?;
    let role = role.trim();
    if role.is_empty() {
        return Err("role cannot be empty".to_string());
    }
    let names = names
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    Ok((role.to_string(), names))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let roles = match &cli.roles {
        Some(path) => RoleTable::load_with_overrides(path)?,
        None => RoleTable::builtin(),
    };
    let store = JsonStore::open(&cli.data, roles.clone())?;

    let code = match cli.cmd {
        Commands::ImportStaff { csv } => {
            let staff = io::import_staff_csv(csv)?;
            let mut dataset = store.load()?;
            let mut names: HashSet<&str> = dataset.staff.iter().map(|s| s.name.as_str()).collect();
            for s in &staff {
                if !roles.contains(&s.position) {
                    bail!("unknown position for {}: {}", s.name, s.position);
                }
                if !names.insert(s.name.as_str()) {
                    bail!("staff name already exists: {}", s.name);
                }
            }
            println!("Imported {} staff member(s)", staff.len());
            dataset.staff.extend(staff);
            store.save(&dataset)?;
            0
        }
        Commands::Available { date } => {
            let date = canonical_arg(&date)?;
            let available = store.fetch_available_staff(&date)?;
            let checker = StaffingChecker::new(Some(&available.requirements), &roles);
            for (role, staff) in &available.available_staff {
                let names: Vec<&str> = staff.iter().map(|s| s.name.as_str()).collect();
                println!(
                    "{} {} ({} available / {} required): {}",
                    roles.icon(role),
                    roles.display_name(role),
                    staff.len(),
                    checker.required_count(role),
                    names.join(", ")
                );
            }
            0
        }
        Commands::History { date } => {
            let date = canonical_arg(&date)?;
            let mut session = SchedulingSession::new(store, roles);
            session.select_date(date.as_str())?;
            session.load_available_staff()?;
            for (name, count) in session.work_history().sorted() {
                println!("{name}: {count}");
            }
            0
        }
        Commands::Auto { date, yes } => {
            let mut session = SchedulingSession::new(store, roles);
            session.select_date(date.as_str())?;
            session.load_available_staff()?;
            let proposal = session.propose_schedule()?;
            print_schedule(session.roles(), &session.checker(), &proposal.schedule);
            for s in &proposal.shortfalls {
                eprintln!(
                    "Warning: {} understaffed ({}/{}, {} missing)",
                    s.role,
                    s.assigned,
                    s.required,
                    s.missing()
                );
            }
            if yes {
                let shift = session.confirm_and_submit()?;
                println!("Shift {} created for {}", shift.id.as_str(), shift.date);
            } else {
                println!("Not submitted (re-run with --yes to create the shift)");
            }
            // Code 2 = WARNING/INCOMPLETE
            if proposal.is_understaffed() {
                2
            } else {
                0
            }
        }
        Commands::Assign { date, picks } => {
            let mut session = SchedulingSession::new(store, roles);
            session.select_date(date.as_str())?;
            session.load_available_staff()?;
            for (role, names) in picks {
                session.set_role_selection(&role, names)?;
            }
            let shortfalls = session.checker().shortfalls(session.selected_staff());
            for s in &shortfalls {
                eprintln!("Warning: {} understaffed ({}/{})", s.role, s.assigned, s.required);
            }
            let shift = session.confirm_and_submit()?;
            println!("Shift {} created for {}", shift.id.as_str(), shift.date);
            if shortfalls.is_empty() {
                0
            } else {
                2
            }
        }
        Commands::Shifts { out_json } => {
            if let Some(path) = out_json {
                io::export_dataset_json(path, &store.load()?)?;
            }
            let mut shifts = store.fetch_all_shifts()?;
            shifts.sort_by(|a, b| a.date.cmp(&b.date));
            // impression compacte
            for s in &shifts {
                println!("{} | {} | {} slot(s)", s.id.as_str(), s.date, s.slot_count());
            }
            0
        }
        Commands::Delete { id } => {
            let mut session = SchedulingSession::new(store, roles);
            session.delete_shift(&ShiftId::new(id))?;
            println!("Deleted");
            0
        }
        Commands::Week {
            date,
            offset,
            out_csv,
        } => {
            let reference = match date {
                Some(d) => parse_canonical_date(&canonical_arg(&d)?)?,
                None => today(),
            };
            let Some(reference) = shift_week(reference, offset) else {
                bail!("--offset {offset} moves the week out of range");
            };
            let shifts = store.fetch_all_shifts()?;
            let week = WeekOverview::build(reference, &shifts, &roles);
            println!("Week {}", week.range_label());
            for day in &week.days {
                let names: Vec<String> = day
                    .assignments
                    .iter()
                    .map(|a| format!("{}:{}", a.role, a.name))
                    .collect();
                println!("{} {} | {}", day.date, day.weekday, names.join(" "));
            }
            for t in &week.totals {
                println!("{} {}: {}", roles.icon(&t.role), t.display_name, t.count);
            }
            if let Some(path) = out_csv {
                io::export_week_csv(path, &week)?;
            }
            0
        }
    };

    std::process::exit(code);
}

fn canonical_arg(raw: &str) -> Result<String> {
    let date = to_canonical_date(raw).with_context(|| format!("invalid --date {raw:?}"))?;
    if date.is_empty() {
        bail!("--date cannot be empty");
    }
    Ok(date)
}

fn print_schedule(roles: &RoleTable, checker: &StaffingChecker<'_>, schedule: &Schedule) {
    for (role, names) in schedule {
        let flag = if checker.is_understaffed(role, names.as_slice()) {
            " (!)"
        } else {
            ""
        };
        println!(
            "{} {} ({}/{}){}: {}",
            roles.icon(role),
            roles.display_name(role),
            names.len(),
            checker.required_count(role),
            flag,
            names.join(", ")
        );
    }
}
