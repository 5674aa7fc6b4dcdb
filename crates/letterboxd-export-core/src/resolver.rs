use letterboxd_export_config::AuthConfig;
use letterboxd_export_models::AccountIdentity;
use letterboxd_export_plex::{PlexError, PlexHttpClient, SharedUser};
use tracing::{debug, info};

use crate::error::ExportError;

/// Accounts eligible for export: the owner first (never flagged as a home
/// profile), then every non-managed shared account. Managed/home profiles
/// are excluded from the selectable set everywhere.
pub fn selectable_accounts(owner: &str, shared: &[SharedUser]) -> Vec<AccountIdentity> {
    let mut accounts = vec![AccountIdentity {
        username: owner.to_string(),
        home: false,
    }];
    accounts.extend(
        shared
            .iter()
            .filter(|user| !user.home)
            .map(|user| AccountIdentity {
                username: user.username.clone(),
                home: false,
            }),
    );
    accounts
}

/// List the accounts the delivery surfaces may offer for export.
pub async fn list_accounts(auth: &AuthConfig) -> Result<Vec<AccountIdentity>, ExportError> {
    let server = PlexHttpClient::new(auth.base_url.clone(), auth.token.clone())?;
    let owner = server.owner_username().await.map_err(auth_err)?;
    let shared = server.shared_users().await.map_err(auth_err)?;
    Ok(selectable_accounts(&owner, &shared))
}

/// Resolve a target username to an authenticated session scoped to that
/// account. No username means the owner; a non-owner name must match an
/// eligible shared account, whose per-user token is exchanged against this
/// server's machine identity. The session is fresh per export and never
/// cached.
pub async fn resolve_session(
    auth: &AuthConfig,
    username: Option<&str>,
) -> Result<PlexHttpClient, ExportError> {
    let server = PlexHttpClient::new(auth.base_url.clone(), auth.token.clone())?;

    let Some(target) = username else {
        return Ok(server);
    };

    let owner = server.owner_username().await.map_err(auth_err)?;
    if target == owner {
        debug!("export target {} is the owner account", target);
        return Ok(server);
    }

    let shared = server.shared_users().await.map_err(auth_err)?;
    let user = shared
        .iter()
        .find(|user| !user.home && user.username == target)
        .ok_or_else(|| ExportError::AccountNotFound(target.to_string()))?;

    let machine_id = server.machine_identifier().await?;
    let token = server
        .user_token(user.id, &machine_id)
        .await
        .map_err(auth_err)?
        .ok_or_else(|| {
            ExportError::Authentication(format!(
                "no access token granted to {} on this server",
                target
            ))
        })?;

    info!("impersonating shared account {}", target);
    Ok(PlexHttpClient::new(auth.base_url.clone(), token)?)
}

fn auth_err(err: PlexError) -> ExportError {
    match err {
        PlexError::Unauthorized => {
            ExportError::Authentication("access token rejected by the Plex service".to_string())
        }
        other => ExportError::Remote(other),
    }
}
