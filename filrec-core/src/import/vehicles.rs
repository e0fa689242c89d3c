use super::ImportReport;
use crate::domain::Vehicle;
use crate::repo::Datastore;
use std::collections::HashSet;
use tracing::{info, warn};

/// Day-book printouts that mention vehicle numbers, in scan order.
pub const DAYBOOK_FILES: [&str; 4] = ["OUTPUT.TXT", "F.TXT", "FOCU.TXT", "CMC.TXT"];

/// Find a `STATE-SERIES / REG` vehicle number around the first `/` of a
/// day-book line, e.g. `... UP-25E / T-8036 ...`.
pub fn parse_daybook_vehicle(line: &str) -> Option<Vehicle> {
    let (left, right) = line.split_once('/')?;
    let left_token = left.split_whitespace().last()?;
    let reg = right.split_whitespace().next()?;
    if !reg.contains('-') {
        return None;
    }
    let (state, series) = left_token.split_once('-')?;
    let (state, series) = (state.trim(), series.trim());
    if state.len() < 2 || series.is_empty() || reg.len() < 2 {
        return None;
    }
    Some(Vehicle {
        vehicle_number: format!("{state}-{series} / {reg}"),
        state_code: state.to_string(),
        series_code: series.to_string(),
        registration_number: reg.to_string(),
    })
}

/// Insert each vehicle number found in `lines` unless already present.
/// Duplicates within one run (ignoring case) are skipped without a store call.
pub fn import_vehicles<I, S>(store: &mut dyn Datastore, lines: I) -> ImportReport
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut report = ImportReport::default();
    let mut seen = HashSet::new();
    for (index, line) in lines.into_iter().enumerate() {
        let line = line.as_ref();
        if line.trim().is_empty() {
            continue;
        }
        report.seen += 1;
        let Some(v) = parse_daybook_vehicle(line) else {
            report.rejected += 1;
            continue;
        };
        if !seen.insert(v.vehicle_number.to_ascii_uppercase()) {
            continue;
        }
        let number = v.vehicle_number.clone();
        match store.insert_vehicle_if_absent(v) {
            Ok(true) => report.count_insert(),
            Ok(false) => {}
            Err(e) => {
                warn!(index, %number, error = %e, "vehicle insert failed");
                report.failed += 1;
            }
        }
    }
    info!(branch = store.branch(), %report, "vehicles imported");
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::inmem::MemStore;

    #[test]
    fn only_the_first_slash_is_considered() {
        assert!(parse_daybook_vehicle("12/03 RAM LAL UP-25E / T-8036").is_none());
    }

    #[test]
    fn parses_plain_line() {
        let v = parse_daybook_vehicle("RAM LAL   UP-25E /   T-8036  1500.00").unwrap();
        assert_eq!(v.vehicle_number, "UP-25E / T-8036");
        assert_eq!(v.state_code, "UP");
        assert_eq!(v.series_code, "25E");
        assert_eq!(v.registration_number, "T-8036");

        let v = parse_daybook_vehicle("MP-09-HX / 12-A").unwrap();
        assert_eq!(v.series_code, "09-HX");
    }

    #[test]
    fn rejects_malformed_tokens() {
        assert!(parse_daybook_vehicle("no slash here").is_none());
        assert!(parse_daybook_vehicle("ABC / 1234").is_none());
        assert!(parse_daybook_vehicle("U-25 / T-1").is_none());
        assert!(parse_daybook_vehicle("UP- / T-1").is_none());
        assert!(parse_daybook_vehicle("UP-25 /").is_none());
    }

    #[test]
    fn dedupes_case_insensitively() {
        let mut s = MemStore::new("main");
        let lines = ["X UP-25E / T-8036", "x up-25e / t-8036", "", "junk", "CG-04 / AB-12"];
        let r = import_vehicles(&mut s, lines);
        assert_eq!(r.inserted, 2);
        assert_eq!(r.seen, 4);
        assert_eq!(r.rejected, 1);
        let again = import_vehicles(&mut s, ["UP-25E / T-8036"]);
        assert_eq!(again.inserted, 0);
        assert_eq!(s.counts().unwrap().vehicles, 2);
    }
}
