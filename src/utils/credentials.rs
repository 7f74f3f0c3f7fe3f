//! API credentials: env var → .env in dir.

use anyhow::{Result, bail};
use log::debug;
use std::path::Path;

use crate::utils::config::PackagePaths;

const CLIENT_ID_SUFFIX: &str = "CLIENT_ID";
const AUTH_TOKEN_SUFFIX: &str = "AUTH_TOKEN";

/// Header values sent with every API call.
#[derive(Clone)]
pub struct ApiCredentials {
    pub client_id: String,
    /// Full `Authorization` header value (e.g. `Bearer abc...`).
    pub auth_token: String,
}

impl std::fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiCredentials")
            .field("client_id", &self.client_id)
            .field("auth_token", &"<redacted>")
            .finish()
    }
}

fn non_empty(s: String) -> Option<String> {
    let s = s.trim().to_string();
    (!s.is_empty()).then_some(s)
}

/// Look up `key` in a `.env` file without touching the process environment.
pub fn read_dotenv_key(env_path: &Path, key: &str) -> Option<String> {
    let iter = dotenvy::from_path_iter(env_path).ok()?;
    iter.filter_map(|item| item.ok())
        .find(|(k, _)| k == key)
        .and_then(|(_, v)| non_empty(v))
}

fn try_env_then_dotenv(dir: &Path, key: &str) -> Option<String> {
    if let Some(s) = std::env::var(key).ok().and_then(non_empty) {
        debug!("{} found in environment", key);
        return Some(s);
    }
    let env_path = dir.join(".env");
    if env_path.is_file() {
        let found = read_dotenv_key(&env_path, key);
        if found.is_some() {
            debug!("{} found in {}", key, env_path.display());
        }
        return found;
    }
    None
}

/// Load credentials: env (`FOLLOWCRAWL_CLIENT_ID`, `FOLLOWCRAWL_AUTH_TOKEN`) → .env in `dir`.
/// Missing values are a configuration error.
pub fn load_credentials(dir: &Path) -> Result<ApiCredentials> {
    let paths = PackagePaths::get();
    let id_key = paths.env_key(CLIENT_ID_SUFFIX);
    let token_key = paths.env_key(AUTH_TOKEN_SUFFIX);
    let Some(client_id) = try_env_then_dotenv(dir, &id_key) else {
        bail!("missing {id_key} (set it in the environment or in .env)");
    };
    let Some(auth_token) = try_env_then_dotenv(dir, &token_key) else {
        bail!("missing {token_key} (set it in the environment or in .env)");
    };
    Ok(ApiCredentials {
        client_id,
        auth_token,
    })
}
