use anyhow::Result;
use prompt_library_core::Credential;

use crate::config::Config;

pub(crate) fn login(config: &Config, token: &str) -> Result<()> {
    let credential = Credential::new(token)?;
    let session = config.session_store().save(&credential)?;
    println!("Signed in at {}.", session.login_time.to_rfc3339());
    Ok(())
}

pub(crate) fn logout(config: &Config) -> Result<()> {
    if config.session_store().clear()? {
        println!("Signed out.");
    } else {
        println!("Not signed in.");
    }
    Ok(())
}

pub(crate) fn status(config: &Config) -> Result<()> {
    let session = config.session_store().load()?;
    let source = if config.env_token.is_some() {
        "environment"
    } else if session.is_some() {
        "session"
    } else {
        "none"
    };
    let report = serde_json::json!({
        "signedIn": source != "none",
        "credentialSource": source,
        "loginTime": session.map(|s| s.login_time.to_rfc3339()),
        "apiUrl": config.api_url,
        "dataDir": config.data_dir.display().to_string(),
        "timeoutSecs": config.timeout.as_secs(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
