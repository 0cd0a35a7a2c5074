use serde_json::json;

use crate::auth::{issue_session_token, Claims};
use crate::cli::OutputFormat;
use crate::config::config;

/// Local-development tokens; production sessions come from the identity provider
pub fn handle(user_id: String, email: Option<String>, hours: i64, output_format: OutputFormat) -> anyhow::Result<()> {
    let claims = Claims::new(user_id, email, hours);
    let token = issue_session_token(&claims, &config().security.session_secret)?;

    match output_format {
        OutputFormat::Json => println!("{}", json!({ "token": token, "expires_at": claims.exp })),
        OutputFormat::Text => println!("{}", token),
    }
    Ok(())
}
