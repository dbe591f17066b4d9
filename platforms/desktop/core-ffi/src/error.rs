use hw_core::error::BridgeError;

pub fn err_json(code: &str, message: &str) -> String {
    serde_json::json!({
        "ok": false,
        "error": { "code": code, "message": message }
    })
        .to_string()
}

pub fn ok_json<T: serde::Serialize>(data: T) -> String {
    serde_json::json!({
        "ok": true,
        "data": data
    })
        .to_string()
}

/// BridgeError 用自己的错误码，其它错误用调用点给的兜底码
pub fn err_from(fallback_code: &str, e: &anyhow::Error) -> String {
    let code = e
        .downcast_ref::<BridgeError>()
        .map(BridgeError::code)
        .unwrap_or(fallback_code);
    err_json(code, &format!("{e:#}"))
}
