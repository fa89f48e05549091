use std::{
    net::{Ipv4Addr, SocketAddr},
    path::{Path, PathBuf},
};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use poem::web::cookie::CookieKey;
use quizbet_core::{game::DEFAULT_INITIAL_BALANCE, Backend, GameOptions};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512};

/// Prefix of environment overrides.
pub(crate) const ENV_PREFIX: &str = "QUIZBET_";

const MIN_SESSION_SECRET_LEN: usize = 32;

/// Config.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Config {
    /// Listen address.
    listen: SocketAddr,
    /// Directory holding the game documents.
    data_dir: PathBuf,
    /// Shared admin password.
    admin_password: String,
    /// Secret for signing session cookies.
    #[serde(skip_serializing_if = "Option::is_none")]
    session_secret: Option<String>,
    /// Balance given on first registration.
    initial_balance: i64,
    /// Mark the session cookie `Secure`.
    secure_cookies: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from((Ipv4Addr::LOCALHOST, 5000)),
            data_dir: PathBuf::from("./data"),
            admin_password: "admin123".to_string(),
            session_secret: None,
            initial_balance: DEFAULT_INITIAL_BALANCE,
            secure_cookies: false,
        }
    }
}

impl Config {
    /// Defaults, then the TOML file at `path` if it exists, then `QUIZBET_*` variables.
    pub(crate) fn load(path: &Path) -> eyre::Result<Self> {
        Self::figment(path).extract().map_err(eyre::Error::from)
    }

    fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    pub(crate) fn listen(&self) -> SocketAddr {
        self.listen
    }

    pub(crate) fn data_dir(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.data_dir.to_string_lossy()).as_ref())
    }

    pub(crate) fn backend(&self) -> Backend {
        Backend::file(self.data_dir())
    }

    pub(crate) fn admin_password(&self) -> &str {
        &self.admin_password
    }

    pub(crate) fn secure_cookies(&self) -> bool {
        self.secure_cookies
    }

    pub(crate) fn game_options(&self) -> GameOptions {
        GameOptions {
            initial_balance: self.initial_balance,
        }
    }

    /// Key for signing session cookies.
    ///
    /// Without a configured secret a random key is used and sessions do not
    /// survive a restart.
    pub(crate) fn session_key(&self) -> eyre::Result<CookieKey> {
        match &self.session_secret {
            Some(secret) => {
                eyre::ensure!(
                    secret.len() >= MIN_SESSION_SECRET_LEN,
                    "`session_secret` must be at least {MIN_SESSION_SECRET_LEN} bytes"
                );
                let digest = Sha512::digest(secret.as_bytes());
                Ok(CookieKey::from(digest.as_slice()))
            }
            None => {
                tracing::warn!("`session_secret` is not set, using a random key");
                Ok(CookieKey::generate())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::figment(Path::new("/nonexistent/quizbet.toml"))
            .extract::<Config>()
            .unwrap();
        assert_eq!(config.listen().port(), 5000);
        assert_eq!(config.admin_password(), "admin123");
        assert_eq!(config.game_options().initial_balance, 100);
    }

    #[test]
    fn toml_overrides_defaults() {
        let config: Config = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::string(
                r#"
                listen = "0.0.0.0:8080"
                admin_password = "hunter2"
                initial_balance = 50
                "#,
            ))
            .extract()
            .unwrap();
        assert_eq!(config.listen().port(), 8080);
        assert_eq!(config.admin_password(), "hunter2");
        assert_eq!(config.data_dir(), PathBuf::from("./data"));
        assert_eq!(config.game_options().initial_balance, 50);
    }

    #[test]
    fn short_session_secret_is_rejected() {
        let config = Config {
            session_secret: Some("short".into()),
            ..Default::default()
        };
        assert!(config.session_key().is_err());

        let config = Config {
            session_secret: Some("x".repeat(MIN_SESSION_SECRET_LEN)),
            ..Default::default()
        };
        assert!(config.session_key().is_ok());
    }
}
