use serde_json::Value;

/// What the platform's own payload said about an enrollment attempt.
///
/// Zoho answers 200 even for some failures, so every enrollment response is
/// interpreted against the payload's status/code fields and folded into this
/// tagged outcome; the raw payload rides along on rejection for logging.
#[derive(Debug)]
pub enum EnrollmentOutcome {
    Enrolled { list_name: Option<String> },
    Rejected { raw: Value },
}

/// Zoho Campaigns `listsubscribe` answers `{"status":"success","code":"0"}`
/// on success; the code arrives as a bare number or a string depending on
/// the datacenter.
pub fn interpret_list_subscribe(raw: Value) -> EnrollmentOutcome {
    let status = raw.get("status").and_then(Value::as_str);
    let code_ok = match raw.get("code") {
        Some(Value::String(code)) => code == "0",
        Some(Value::Number(code)) => code.as_i64() == Some(0),
        _ => false,
    };

    if status == Some("success") && code_ok {
        let list_name = raw
            .get("listname")
            .and_then(Value::as_str)
            .map(str::to_owned);
        EnrollmentOutcome::Enrolled { list_name }
    } else {
        EnrollmentOutcome::Rejected { raw }
    }
}

/// Zoho CRM lead creation answers a `data` array with one record per lead;
/// the record's `code` must be the literal `"SUCCESS"`.
pub fn interpret_lead_create(raw: Value) -> EnrollmentOutcome {
    let code = raw
        .get("data")
        .and_then(Value::as_array)
        .and_then(|records| records.first())
        .and_then(|record| record.get("code"))
        .and_then(Value::as_str);

    match code {
        Some("SUCCESS") => EnrollmentOutcome::Enrolled { list_name: None },
        _ => EnrollmentOutcome::Rejected { raw },
    }
}
