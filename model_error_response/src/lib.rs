#![deny(missing_docs)]
//! Plain json error bodies shared by every handler in the workspace

/// A plain old json error response for use with axum.
#[derive(serde::Serialize, serde::Deserialize, Debug, utoipa::ToSchema)]
pub struct ErrorResponse<'a> {
    /// Message to explain failure
    pub message: &'a str,
}

/// An error response which points at the request field that failed validation
#[derive(serde::Serialize, serde::Deserialize, Debug, utoipa::ToSchema)]
pub struct FieldErrorResponse<'a> {
    /// Message to explain failure
    pub message: &'a str,
    /// The name of the offending request field
    pub field: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_serializes_the_field_name() {
        let body = serde_json::to_value(FieldErrorResponse {
            message: "This field is required.",
            field: "name",
        })
        .unwrap();

        assert_eq!(
            body,
            serde_json::json!({ "message": "This field is required.", "field": "name" })
        );
    }
}
