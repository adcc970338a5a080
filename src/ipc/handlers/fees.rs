use serde_json::json;

use crate::ipc::error::ok;
use crate::ipc::helpers::{get_required_bool, get_required_str, HandlerErr};
use crate::ipc::types::{AppState, Request};
use crate::model::FeeStructure;

async fn structure_get(state: &AppState) -> Result<serde_json::Value, HandlerErr> {
    let fees = state.api.fee_structure().await?;
    let config = state.api.config();
    Ok(json!({
        "classFees": fees,
        "classes": config.classes,
        "months": config.months,
    }))
}

async fn structure_save(
    state: &AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let raw = params
        .get("classFees")
        .cloned()
        .ok_or_else(|| HandlerErr::bad_params("missing classFees"))?;
    let fees: FeeStructure = serde_json::from_value(raw)
        .map_err(|e| HandlerErr::bad_params(format!("invalid classFees: {}", e)))?;
    state.api.save_fee_structure(fees).await?;
    Ok(json!({ "saved": true }))
}

async fn record_get(
    state: &AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let student_id = get_required_str(params, "studentId")?;
    let year = get_required_str(params, "year")?;
    let record = state.api.fee_record(&student_id, &year).await?;
    Ok(json!({ "record": record }))
}

async fn records_for_year(
    state: &AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let year = get_required_str(params, "year")?;
    let records = state.api.fee_records_for_year(&year).await?;
    Ok(json!({ "records": records }))
}

async fn set_month_paid(
    state: &AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let student_id = get_required_str(params, "studentId")?;
    let year = get_required_str(params, "year")?;
    let month = get_required_str(params, "month")?;
    let paid = get_required_bool(params, "paid")?;
    let record = state
        .api
        .set_month_paid(&student_id, &year, &month, paid)
        .await?;
    Ok(json!({ "record": record }))
}

pub async fn try_handle(state: &AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "fees.structureGet" => structure_get(state).await,
        "fees.structureSave" => structure_save(state, &req.params).await,
        "fees.recordGet" => record_get(state, &req.params).await,
        "fees.recordsForYear" => records_for_year(state, &req.params).await,
        "fees.setMonthPaid" => set_month_paid(state, &req.params).await,
        _ => return None,
    };
    Some(match result {
        Ok(value) => ok(&req.id, value),
        Err(e) => e.response(&req.id),
    })
}
