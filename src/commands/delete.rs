use crate::client::{DeleteResponse, OcmConnection};
use crate::error::DeleteError;
use crate::models::{BadReply, Cluster};
use crate::{config::Config, utils::Confirmation};
use anyhow::{Context, Result};
use colored::Colorize;
use reqwest::StatusCode;
use std::io::Write;

pub const DELETED_MESSAGE: &str = "Limited support reason deleted successfully";

#[derive(Debug, Clone, Default)]
pub struct DeleteOptions {
    pub cluster_id: String,
    pub limited_support_reason_id: String,
    pub dry_run: bool,
    pub verbose: bool,
}

pub async fn delete<W: Write>(
    config: &Config,
    options: &DeleteOptions,
    confirmation: &dyn Confirmation,
    out: &mut W,
) -> Result<()> {
    let connection = OcmConnection::new(config)?;

    if options.dry_run {
        writeln!(
            out,
            "{} Dry run: limited support reason {} on cluster {} was not deleted",
            "ℹ".bright_cyan(),
            options.limited_support_reason_id,
            options.cluster_id
        )?;
        return Ok(());
    }

    let message = format!(
        "Delete limited support reason '{}' from cluster '{}'?",
        options.limited_support_reason_id, options.cluster_id
    );
    if !confirmation.confirm(&message)? {
        writeln!(out, "{}", "Deletion cancelled".yellow())?;
        return Ok(());
    }

    let cluster = connection
        .get_cluster(&options.cluster_id)
        .await
        .context("Can't retrieve cluster")?;

    if options.verbose {
        writeln!(
            out,
            "Cluster: {} (name: {}, state: {})",
            cluster.id.bright_cyan(),
            cluster.name.as_deref().unwrap_or("-"),
            cluster.state.as_deref().unwrap_or("-")
        )?;
    }

    writeln!(
        out,
        "🗑  Deleting limited support reason: {}",
        options.limited_support_reason_id.bright_cyan()
    )?;

    match delete_reason(&connection, &cluster, &options.limited_support_reason_id, out).await {
        Ok(()) => Ok(()),
        Err(e) => {
            anyhow::bail!("Failed to delete limited support reason: {}", e)
        }
    }
}

async fn delete_reason<W: Write>(
    connection: &OcmConnection,
    cluster: &Cluster,
    reason_id: &str,
    out: &mut W,
) -> Result<(), DeleteError> {
    let request = connection.delete_request(cluster, reason_id)?;
    let response = connection.send(request).await?;
    check_delete(&response, out)
}

/// Interpret the reply to a delete call. Only `204 No Content` is a success;
/// any other reply must carry an OCM error body, which is surfaced as an error.
pub fn check_delete<W: Write>(response: &DeleteResponse, out: &mut W) -> Result<(), DeleteError> {
    if response.status == StatusCode::NO_CONTENT {
        writeln!(out, "{} {}", "✓".green().bold(), DELETED_MESSAGE)?;
        return Ok(());
    }

    let body: serde_json::Value =
        serde_json::from_slice(&response.body).map_err(|_| DeleteError::InvalidJson)?;
    let reply: BadReply = serde_json::from_value(body).map_err(DeleteError::MalformedReply)?;

    Err(DeleteError::Rejected {
        status: response.status,
        code: reply.code.unwrap_or_else(|| "-".to_string()),
        reason: reply.reason.unwrap_or_else(|| "no reason given".to_string()),
        operation_id: reply.operation_id.unwrap_or_else(|| "-".to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interpret(status: StatusCode, body: &str) -> (Result<(), DeleteError>, String) {
        let mut out = Vec::new();
        let result = check_delete(&DeleteResponse::new(status, body), &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_no_content_is_success() {
        let (result, output) = interpret(StatusCode::NO_CONTENT, "");
        assert!(result.is_ok());
        assert!(output.contains("Limited support reason deleted successfully"));
    }

    #[test]
    fn test_non_json_body_is_invalid_json() {
        let (result, output) = interpret(StatusCode::BAD_REQUEST, "not-json");
        let err = result.unwrap_err();
        assert!(matches!(err, DeleteError::InvalidJson));
        assert!(err.to_string().contains("server returned invalid JSON"));
        assert!(output.is_empty());
    }

    #[test]
    fn test_empty_body_without_no_content_is_invalid_json() {
        let (result, _) = interpret(StatusCode::OK, "");
        assert!(matches!(result, Err(DeleteError::InvalidJson)));
    }

    #[test]
    fn test_wrongly_shaped_reply_is_parse_error() {
        let (result, _) = interpret(StatusCode::BAD_REQUEST, r#"{"reason": 42}"#);
        let err = result.unwrap_err();
        assert!(matches!(err, DeleteError::MalformedReply(_)));
        let msg = err.to_string();
        assert!(msg.contains("cannot parse the error JSON message"));
        assert!(msg.contains("invalid type"));
    }

    #[test]
    fn test_error_reply_is_surfaced() {
        let body = r#"{
            "kind": "Error",
            "id": "404",
            "href": "/api/clusters_mgmt/v1/errors/404",
            "code": "CLUSTERS-MGMT-404",
            "reason": "Limited support reason 'abc' not found",
            "operation_id": "op-123"
        }"#;
        let (result, output) = interpret(StatusCode::NOT_FOUND, body);

        match result.unwrap_err() {
            DeleteError::Rejected {
                status,
                code,
                reason,
                operation_id,
            } => {
                assert_eq!(status, StatusCode::NOT_FOUND);
                assert_eq!(code, "CLUSTERS-MGMT-404");
                assert_eq!(reason, "Limited support reason 'abc' not found");
                assert_eq!(operation_id, "op-123");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!output.contains(DELETED_MESSAGE));
    }

    #[test]
    fn test_partial_error_reply_uses_placeholders() {
        let (result, _) = interpret(StatusCode::BAD_REQUEST, "{}");
        let msg = result.unwrap_err().to_string();
        assert!(msg.contains("400 Bad Request"));
        assert!(msg.contains("no reason given"));
    }
}
