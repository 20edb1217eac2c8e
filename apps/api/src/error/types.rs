use std::collections::BTreeMap;

use serde::Serialize;
use ts_rs::TS;

/// API error payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/error-response.ts"
)]
pub struct ErrorResponse {
    ok: bool,
    error: ErrorBody,
}

impl ErrorResponse {
    pub(super) fn new(error: ErrorBody) -> Self {
        Self { ok: false, error }
    }
}

/// Error details nested in [`ErrorResponse`].
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/error-body.ts"
)]
pub struct ErrorBody {
    code: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    fields: Option<BTreeMap<String, String>>,
}

impl ErrorBody {
    pub(super) fn new(
        code: &str,
        message: String,
        fields: Option<BTreeMap<String, String>>,
    ) -> Self {
        Self {
            code: code.to_owned(),
            message,
            fields,
        }
    }
}
