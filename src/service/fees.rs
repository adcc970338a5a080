use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use super::{decode, encode, Api, ServiceError};
use crate::model::{fee_doc_id, FeePaymentRecord, FeeStructure};
use crate::store::collections;

const FEES_KEY: &str = "fees";

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FeeStructureDoc {
    class_fees: FeeStructure,
}

impl Api {
    /// Class-name -> monthly amount. Missing document reads as empty.
    pub async fn fee_structure(&self) -> Result<FeeStructure, ServiceError> {
        let doc = self.store().get(collections::CONFIG, FEES_KEY).await?;
        Ok(doc
            .and_then(|v| decode::<FeeStructureDoc>(collections::CONFIG, v))
            .map(|d| d.class_fees)
            .unwrap_or_default())
    }

    /// Overwritten wholesale; there is no per-class patching.
    pub async fn save_fee_structure(&self, fees: FeeStructure) -> Result<(), ServiceError> {
        let doc = encode(collections::CONFIG, &FeeStructureDoc { class_fees: fees })?;
        self.store().set(collections::CONFIG, FEES_KEY, doc).await?;
        Ok(())
    }

    /// Load-or-default: a student with no record for the year gets an empty
    /// payments map, never an error.
    pub async fn fee_record(
        &self,
        student_id: &str,
        year: &str,
    ) -> Result<FeePaymentRecord, ServiceError> {
        let doc_id = fee_doc_id(student_id, year);
        let doc = self.store().get(collections::FEES, &doc_id).await?;
        Ok(doc
            .and_then(|v| decode(collections::FEES, v))
            .unwrap_or_else(|| FeePaymentRecord::empty(student_id, year)))
    }

    pub async fn fee_records_for_year(
        &self,
        year: &str,
    ) -> Result<Vec<FeePaymentRecord>, ServiceError> {
        let docs = self
            .store()
            .query(collections::FEES, "year", &json!(year))
            .await?;
        Ok(docs
            .into_iter()
            .filter_map(|v| decode(collections::FEES, v))
            .collect())
    }

    /// Flip one month's paid flag and persist the whole record. Months due
    /// are a presentation concern; nothing derived is stored.
    pub async fn set_month_paid(
        &self,
        student_id: &str,
        year: &str,
        month: &str,
        paid: bool,
    ) -> Result<FeePaymentRecord, ServiceError> {
        let mut record = self.fee_record(student_id, year).await?;
        record.payments.insert(month.to_string(), paid);
        info!(student_id, year, month, paid, "fee payment updated");
        let doc = encode(collections::FEES, &record)?;
        self.store()
            .set(collections::FEES, &fee_doc_id(student_id, year), doc)
            .await?;
        Ok(record)
    }
}
