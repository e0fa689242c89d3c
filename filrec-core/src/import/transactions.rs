use super::ImportReport;
use crate::codec::{Decimal, MIN_DATE};
use crate::domain::{CASH_REFERENCE, NewTransaction, PAYMENT_CASH};
use crate::error::Result;
use crate::record::{GenericRecord, keys};
use crate::repo::Datastore;
use time::OffsetDateTime;
use tracing::{debug, info, warn};

const FALLBACK_DESCRIPTION: &str = "Legacy Cash Transaction";

/// `name - vehicle - Code: code` over whichever parts are present.
pub fn describe(name: Option<&str>, vehicle: Option<&str>, code: Option<&str>) -> String {
    let code = code.map(|c| format!("Code: {c}"));
    let parts: Vec<&str> = [name, vehicle, code.as_deref()].into_iter().flatten().collect();
    if parts.is_empty() {
        FALLBACK_DESCRIPTION.to_string()
    } else {
        parts.join(" - ")
    }
}

/// Build the row for one record, or `None` when it carries no amount,
/// vehicle or customer code. A voucher number is drawn from the store only
/// for records that will be written.
fn normalize(
    store: &mut dyn Datastore,
    rec: &GenericRecord,
    now: OffsetDateTime,
) -> Result<Option<NewTransaction>> {
    let amount = rec.decimal(keys::AMOUNT).unwrap_or(Decimal::zero(2));
    let vehicle = rec.text(keys::VEHICLE_NUMBER);
    let code = rec.text(keys::CUSTOMER_CODE);
    if !amount.is_positive() && vehicle.is_none() && code.is_none() {
        return Ok(None);
    }

    let name = rec.text(keys::CUSTOMER_NAME);
    let marker = rec
        .text(keys::TRANSACTION_TYPE)
        .unwrap_or_else(|| "C".into())
        .to_ascii_uppercase();
    let date = rec
        .date(keys::DATE)
        .filter(|d| *d != MIN_DATE)
        .unwrap_or_else(|| now.date());
    let voucher_number = match rec.text(keys::VOUCHER_NUMBER) {
        Some(v) => v,
        None => store.next_voucher_number()?.to_string(),
    };

    let zero = Decimal::zero(amount.scale);
    let (debit, credit) = if marker == "D" { (amount, zero) } else { (zero, amount) };

    Ok(Some(NewTransaction {
        voucher_number,
        date,
        description: describe(name.as_deref(), vehicle.as_deref(), code.as_deref()),
        vehicle_number: vehicle,
        customer_name: name,
        debit,
        credit,
        balance: zero,
        payment_method: PAYMENT_CASH.to_string(),
        reference: CASH_REFERENCE.to_string(),
    }))
}

/// Append one cash transaction per meaningful record. Not idempotent:
/// a second run over records without voucher numbers adds new rows.
pub fn import_transactions<I>(store: &mut dyn Datastore, records: I, now: OffsetDateTime) -> ImportReport
where
    I: IntoIterator<Item = GenericRecord>,
{
    let mut report = ImportReport::default();
    for (index, rec) in records.into_iter().enumerate() {
        report.seen += 1;
        let tx = match normalize(store, &rec, now) {
            Ok(Some(tx)) => tx,
            Ok(None) => {
                debug!(index, "cash record has no amount, vehicle or code");
                report.rejected += 1;
                continue;
            }
            Err(e) => {
                warn!(index, error = %e, "voucher allocation failed");
                report.failed += 1;
                continue;
            }
        };
        let voucher = tx.voucher_number.clone();
        match store.create_transaction(tx, now) {
            Ok(_) => report.count_insert(),
            Err(e) => {
                warn!(index, %voucher, error = %e, "transaction insert failed");
                report.failed += 1;
            }
        }
    }
    info!(branch = store.branch(), %report, "transactions imported");
    report
}
