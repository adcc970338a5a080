use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_dir(prefix: &str) -> PathBuf {
    let p = std::env::temp_dir().join(format!(
        "{}-{}",
        prefix,
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos()
    ));
    std::fs::create_dir_all(&p).expect("create temp dir");
    p
}

fn spawn_daemon(data_dir: &Path) -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let exe = env!("CARGO_BIN_EXE_maktabd");
    let mut child = Command::new(exe)
        .env("MAKTAB_DATA_DIR", data_dir)
        .env("MAKTAB_LOCAL_LATENCY_MS", "0")
        .env_remove("MAKTAB_REMOTE_URL")
        .env_remove("MAKTAB_MEDIA_ENDPOINT")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn maktabd");
    let stdin = child.stdin.take().expect("child stdin");
    let stdout = child.stdout.take().expect("child stdout");
    (child, stdin, BufReader::new(stdout))
}

fn request_ok(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let payload = json!({
        "id": id,
        "method": method,
        "params": params,
    });
    writeln!(stdin, "{}", payload).expect("write request");
    stdin.flush().expect("flush request");

    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");
    assert!(!line.trim().is_empty(), "empty response for {}", method);
    let value: serde_json::Value = serde_json::from_str(line.trim()).expect("parse response json");
    assert_eq!(value.get("id").and_then(|v| v.as_str()), Some(id));
    assert!(
        value.get("ok").and_then(|v| v.as_bool()).unwrap_or(false),
        "{} failed: {}",
        method,
        value
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(|v| v.as_str())
            .unwrap_or("unknown error")
    );
    value.get("result").cloned().unwrap_or_else(|| json!({}))
}

#[test]
fn fee_ledger_flow() {
    let data_dir = temp_dir("maktab-fees");
    let (mut child, mut stdin, mut reader) = spawn_daemon(&data_dir);

    // Empty structure before anyone saves one; class and month lists ride along.
    let res = request_ok(&mut stdin, &mut reader, "1", "fees.structureGet", json!({}));
    assert_eq!(res.get("classFees"), Some(&json!({})));
    assert_eq!(
        res.get("months").and_then(|v| v.as_array()).map(|a| a.len()),
        Some(12)
    );
    assert_eq!(
        res.get("classes").and_then(|v| v.as_array()).map(|a| a.len()),
        Some(5)
    );

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "fees.structureSave",
        json!({ "classFees": { "Class I": 300, "Class V": 500 } }),
    );
    let res = request_ok(&mut stdin, &mut reader, "3", "fees.structureGet", json!({}));
    assert_eq!(
        res.get("classFees").and_then(|v| v.get("Class V")).and_then(|v| v.as_u64()),
        Some(500)
    );

    // A student with no ledger reads as an empty payments map.
    let res = request_ok(
        &mut stdin,
        &mut reader,
        "4",
        "fees.recordGet",
        json!({ "studentId": "900", "year": "2024" }),
    );
    assert_eq!(
        res.get("record").and_then(|r| r.get("payments")),
        Some(&json!({}))
    );

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "5",
        "fees.setMonthPaid",
        json!({ "studentId": "900", "year": "2024", "month": "January", "paid": true }),
    );
    let res = request_ok(
        &mut stdin,
        &mut reader,
        "6",
        "fees.setMonthPaid",
        json!({ "studentId": "900", "year": "2024", "month": "March", "paid": true }),
    );
    let payments = res
        .get("record")
        .and_then(|r| r.get("payments"))
        .expect("payments");
    assert_eq!(payments.get("January").and_then(|v| v.as_bool()), Some(true));
    assert_eq!(payments.get("March").and_then(|v| v.as_bool()), Some(true));
    assert!(payments.get("February").is_none());

    // Years are separate documents.
    let res = request_ok(
        &mut stdin,
        &mut reader,
        "7",
        "fees.recordGet",
        json!({ "studentId": "900", "year": "2025" }),
    );
    assert_eq!(
        res.get("record").and_then(|r| r.get("payments")),
        Some(&json!({}))
    );
    let res = request_ok(
        &mut stdin,
        &mut reader,
        "8",
        "fees.recordsForYear",
        json!({ "year": "2024" }),
    );
    assert_eq!(
        res.get("records").and_then(|v| v.as_array()).map(|a| a.len()),
        Some(1)
    );

    drop(stdin);
    let _ = child.wait();
    let _ = std::fs::remove_dir_all(data_dir);
}

#[test]
fn notices_and_feedback_flow() {
    let data_dir = temp_dir("maktab-notices");
    let (mut child, mut stdin, mut reader) = spawn_daemon(&data_dir);

    let res = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "notices.add",
        json!({ "text": "School closed Friday" }),
    );
    let first_id = res
        .get("notification")
        .and_then(|n| n.get("id"))
        .and_then(|v| v.as_str())
        .expect("notification id")
        .to_string();

    std::thread::sleep(std::time::Duration::from_millis(5));
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "notices.add",
        json!({ "text": "Exam routine published", "imageUrl": "https://cdn.example/routine.png" }),
    );

    let res = request_ok(&mut stdin, &mut reader, "3", "notices.list", json!({}));
    let notifications = res
        .get("notifications")
        .and_then(|v| v.as_array())
        .expect("notifications");
    assert_eq!(notifications.len(), 2);
    // Newest first.
    assert_eq!(
        notifications[0].get("text").and_then(|v| v.as_str()),
        Some("Exam routine published")
    );
    assert_eq!(
        notifications[0].get("imageUrl").and_then(|v| v.as_str()),
        Some("https://cdn.example/routine.png")
    );

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "4",
        "notices.delete",
        json!({ "id": first_id }),
    );
    let res = request_ok(&mut stdin, &mut reader, "5", "notices.list", json!({}));
    assert_eq!(
        res.get("notifications").and_then(|v| v.as_array()).map(|a| a.len()),
        Some(1)
    );

    let res = request_ok(
        &mut stdin,
        &mut reader,
        "6",
        "feedback.add",
        json!({ "name": "Guardian", "message": "Please share more photos" }),
    );
    let feedback_id = res
        .get("feedback")
        .and_then(|f| f.get("id"))
        .and_then(|v| v.as_str())
        .expect("feedback id")
        .to_string();

    let res = request_ok(&mut stdin, &mut reader, "7", "feedback.list", json!({}));
    assert_eq!(
        res.get("feedback").and_then(|v| v.as_array()).map(|a| a.len()),
        Some(1)
    );

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "8",
        "feedback.delete",
        json!({ "id": feedback_id }),
    );
    let res = request_ok(&mut stdin, &mut reader, "9", "feedback.list", json!({}));
    assert_eq!(
        res.get("feedback").and_then(|v| v.as_array()).map(|a| a.len()),
        Some(0)
    );

    drop(stdin);
    let _ = child.wait();
    let _ = std::fs::remove_dir_all(data_dir);
}
