//! Connect command - start a connection attempt

use anyhow::{bail, Result};
use appconnect_lib::uri::kebab_to_camel;
use appconnect_lib::ConnectionParams;

use super::Scope;
use crate::ui;

/// Parse a `key=value` argument. Keys may be given kebab- or camel-case.
pub fn parse_param(raw: &str) -> Result<(String, String)> {
    let Some((key, value)) = raw.split_once('=') else {
        bail!("Invalid parameter '{}': expected KEY=VALUE", raw);
    };
    let key = key.trim();
    if key.is_empty() {
        bail!("Invalid parameter '{}': empty key", raw);
    }
    Ok((kebab_to_camel(key), value.to_string()))
}

pub async fn run(
    scope: &Scope,
    url: &str,
    deep_link_type: &str,
    raw_params: &[String],
    redirect: Option<String>,
    new_tab: bool,
) -> Result<()> {
    let mut params = ConnectionParams::new(deep_link_type);
    for raw in raw_params {
        let (key, value) = parse_param(raw)?;
        if key == appconnect_lib::SESSION_ID_KEY {
            bail!("'session-id' is reserved and set automatically");
        }
        params = params.with_param(key, value);
    }

    let terminal = scope.open(new_tab)?;
    let session_id = terminal
        .connect
        .connect_to_app(url, params, redirect.clone())
        .await?;

    ui::header("Connection Started");
    ui::namespace(terminal.connect.namespace());
    ui::session_id(&session_id);
    if let Some(path) = redirect.as_deref().filter(|p| !p.is_empty()) {
        ui::key_value("Redirect", path);
    }
    if let Some((opened, target)) = terminal.browser.opened() {
        ui::key_value("Window", target.as_str());
        ui::key_value("URL", &opened);
    }

    println!();
    ui::success("Session saved");
    ui::info("Complete the flow in the companion app, then run:");
    println!(
        "  appconnect-demo callback '<deep link>#session-id={}'",
        session_id
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_param() {
        assert_eq!(
            parse_param("public-key=abc").unwrap(),
            ("publicKey".to_string(), "abc".to_string())
        );
        assert_eq!(
            parse_param("maxTimeToLive=a=b").unwrap(),
            ("maxTimeToLive".to_string(), "a=b".to_string())
        );
        assert!(parse_param("novalue").is_err());
        assert!(parse_param("=x").is_err());
    }
}
