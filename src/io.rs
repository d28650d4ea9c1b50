use crate::model::{Dataset, Staff};
use crate::week::WeekOverview;
use anyhow::{bail, Context};
use csv::{ReaderBuilder, WriterBuilder};
use std::fs;
use std::path::Path;

/// Import du personnel depuis CSV: header `name,position[,day_off]`
pub fn import_staff_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Staff>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let name = rec.get(0).context("missing name")?.trim();
        let position = rec.get(1).context("missing position")?.trim();
        if name.is_empty() || position.is_empty() {
            bail!("invalid staff row (empty)");
        }
        let mut staff = Staff::new(name, position);
        if let Some(day_off) = rec.get(2) {
            let day_off = day_off.trim();
            if !day_off.is_empty() {
                staff = staff.with_day_off(day_off);
                if staff.day_off_weekday().is_none() {
                    bail!("invalid day_off value for {name}: {day_off}");
                }
            }
        }
        out.push(staff);
    }
    Ok(out)
}

/// Export CSV d'une semaine: header `date,weekday,role,staff`
pub fn export_week_csv<P: AsRef<Path>>(path: P, week: &WeekOverview) -> anyhow::Result<()> {
    let file = fs::File::create(path.as_ref())
        .with_context(|| format!("creating {}", path.as_ref().display()))?;
    write_week_csv(file, week)
}

/// Même format que [`export_week_csv`], vers n'importe quel writer.
pub fn write_week_csv<W: std::io::Write>(writer: W, week: &WeekOverview) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_writer(writer);
    w.write_record(["date", "weekday", "role", "staff"])?;
    for day in &week.days {
        for a in &day.assignments {
            w.write_record([
                day.date.as_str(),
                day.weekday.as_str(),
                a.role.as_str(),
                a.name.as_str(),
            ])?;
        }
    }
    w.flush()?;
    Ok(())
}

/// Export JSON du dataset (jolie mise en forme)
pub fn export_dataset_json<P: AsRef<Path>>(path: P, dataset: &Dataset) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(dataset)?;
    fs::write(path, s)?;
    Ok(())
}
