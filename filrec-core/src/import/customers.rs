use super::{ImportReport, collapse_spaces};
use crate::domain::Upsert;
use crate::record::{GenericRecord, keys};
use crate::repo::Datastore;
use time::OffsetDateTime;
use tracing::{debug, info, warn};

/// Codes the legacy system used for blank or placeholder accounts.
const DEGENERATE_CODES: [&str; 2] = ["0", "0000"];

/// Upsert one customer per record with a usable code and name. Re-running
/// over the same records changes only names and `updated_at`.
pub fn import_customers<I>(store: &mut dyn Datastore, records: I, now: OffsetDateTime) -> ImportReport
where
    I: IntoIterator<Item = GenericRecord>,
{
    let mut report = ImportReport::default();
    for (index, rec) in records.into_iter().enumerate() {
        report.seen += 1;
        let code = rec.text(keys::CUSTOMER_CODE).unwrap_or_default();
        let name = collapse_spaces(&rec.text(keys::CUSTOMER_NAME).unwrap_or_default());
        if code.is_empty() || name.is_empty() || DEGENERATE_CODES.contains(&code.as_str()) {
            debug!(index, %code, "customer record rejected");
            report.rejected += 1;
            continue;
        }
        match store.upsert_customer(&code, &name, now) {
            Ok(Upsert::Inserted) => report.count_insert(),
            Ok(Upsert::Updated) => report.count_update(),
            Err(e) => {
                warn!(index, %code, error = %e, "customer upsert failed");
                report.failed += 1;
            }
        }
    }
    info!(branch = store.branch(), %report, "customers imported");
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::inmem::MemStore;
    use time::macros::datetime;

    fn rec(code: &str, name: &str) -> GenericRecord {
        GenericRecord::new()
            .with_text(keys::CUSTOMER_CODE, code)
            .with_text(keys::CUSTOMER_NAME, name)
    }

    #[test]
    fn cleans_rejects_and_upserts() {
        let mut s = MemStore::new("main");
        let now = datetime!(2024-01-01 0:00 UTC);
        let r = import_customers(
            &mut s,
            vec![
                rec(" 5494 ", "  UHA   TRADERS "),
                rec("0000", "NOBODY"),
                rec("0", "NOBODY"),
                rec("7001", "   "),
                GenericRecord::new().with_text(keys::CUSTOMER_NAME, "NO CODE"),
            ],
            now,
        );
        assert_eq!(r.seen, 5);
        assert_eq!(r.inserted, 1);
        assert_eq!(r.rejected, 4);
        let cs = s.customers().unwrap();
        assert_eq!(cs[0].code, "5494");
        assert_eq!(cs[0].name, "UHA TRADERS");
    }

    #[test]
    fn second_run_updates_in_place() {
        let mut s = MemStore::new("main");
        let t0 = datetime!(2024-01-01 0:00 UTC);
        let t1 = datetime!(2024-01-02 0:00 UTC);
        import_customers(&mut s, vec![rec("5494", "UHA")], t0);
        let r = import_customers(&mut s, vec![rec("5494", "UHA")], t1);
        assert_eq!((r.inserted, r.updated, r.imported), (0, 1, 1));
        let cs = s.customers().unwrap();
        assert_eq!(cs.len(), 1);
        assert_eq!(cs[0].updated_at, t1);
    }
}
