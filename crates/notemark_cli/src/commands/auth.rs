//! Auth status command implementation.

use notemark_client::{mask_token, DEFAULT_API_VERSION, DEFAULT_BASE_URL};
use serde_json::json;

/// Runs `auth status`.
///
/// Never fails: a missing token is reported, not raised, so the command is
/// usable to diagnose exactly that situation.
pub fn status(json: bool) {
    let token = std::env::var("NOTION_TOKEN").ok().filter(|t| !t.is_empty());
    let version = std::env::var("NOTION_VERSION")
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_API_VERSION.to_string());
    let base = std::env::var("NOTION_API_BASE")
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    let status = json!({
        "token_present": token.is_some(),
        "token_preview": token.as_deref().map(mask_token).unwrap_or_else(|| "missing".into()),
        "notion_version": version,
        "api_base": base,
    });

    if json {
        println!("{}", serde_json::to_string_pretty(&status).unwrap_or_default());
    } else {
        tracing::info!(
            token_present = token.is_some(),
            token_preview = %status["token_preview"].as_str().unwrap_or_default(),
            notion_version = %version,
            api_base = %base,
            "auth status"
        );
    }
}
