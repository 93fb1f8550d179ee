use std::io::Write;
use std::process::ExitCode;

use serde::Serialize;

/// Minimal `{success, message|error}` object for runs that never reach
/// extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StatusReport {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            error: None,
        }
    }

    pub fn error(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: None,
            error: Some(error.into()),
        }
    }

    /// Report for the dependency-check-only mode.
    pub fn dependencies(missing: &[String]) -> Self {
        if missing.is_empty() {
            Self::ok("All dependencies installed")
        } else {
            Self::error(missing_dependencies_message(missing))
        }
    }
}

pub fn missing_dependencies_message(missing: &[String]) -> String {
    format!("Missing dependencies: {}", missing.join(", "))
}

/// Serialize `value` as the single JSON document on `w`.
pub fn write_json<T: Serialize>(w: &mut dyn Write, value: &T, pretty: bool) -> std::io::Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .unwrap_or_else(|e| {
        serde_json::json!({ "success": false, "error": format!("failed to serialize result: {e}") })
            .to_string()
    });
    writeln!(w, "{json}")?;
    w.flush()
}

/// Print `value` to stdout and map `success` to the process exit code.
pub fn emit<T: Serialize>(value: &T, success: bool, pretty: bool) -> ExitCode {
    let stdout = std::io::stdout();
    let mut lock = stdout.lock();
    if let Err(e) = write_json(&mut lock, value, pretty) {
        tracing::error!(error = %e, "failed to write JSON output");
        return ExitCode::FAILURE;
    }
    exit_code(success)
}

pub fn exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
