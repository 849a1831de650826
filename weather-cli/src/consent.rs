//! Location permission backed by a consent prompt whose answer is kept in
//! the config file.

use async_trait::async_trait;
use std::{path::PathBuf, sync::Mutex};
use weather_core::{Config, PermissionController, PermissionState, WeatherError};

const ALLOW: &str = "Allow";
const NOT_NOW: &str = "Not now";
const NEVER: &str = "Never ask again";

#[derive(Debug)]
pub struct ConsentController {
    path: PathBuf,
    config: Mutex<Config>,
}

impl ConsentController {
    pub fn new(path: PathBuf, config: Config) -> Self {
        Self {
            path,
            config: Mutex::new(config),
        }
    }

    pub fn load() -> anyhow::Result<Self> {
        let path = Config::config_file_path()?;
        let config = Config::load_from(&path)?;
        Ok(Self::new(path, config))
    }

    fn persist(&self, answer: Option<PermissionState>) -> Result<(), WeatherError> {
        let mut config = self
            .config
            .lock()
            .map_err(|_| WeatherError::Unknown("config lock poisoned".to_string()))?;
        config.location_permission = answer;
        config
            .save_to(&self.path)
            .map_err(|e| WeatherError::Unknown(format!("{e:#}")))
    }
}

#[async_trait]
impl PermissionController for ConsentController {
    async fn state(&self) -> Result<PermissionState, WeatherError> {
        let config = self
            .config
            .lock()
            .map_err(|_| WeatherError::Unknown("config lock poisoned".to_string()))?;
        Ok(config.location_permission())
    }

    async fn provide(&self) -> Result<(), WeatherError> {
        let answer = tokio::task::spawn_blocking(|| {
            inquire::Select::new(
                "Allow weather to look up your approximate location from your IP address?",
                vec![ALLOW, NOT_NOW, NEVER],
            )
            .prompt()
        })
        .await
        .map_err(|e| WeatherError::Unknown(e.to_string()))?
        .map_err(|e| WeatherError::Unknown(e.to_string()))?;

        let state = match answer {
            ALLOW => PermissionState::Granted,
            NEVER => PermissionState::DeniedPermanently,
            _ => PermissionState::Denied,
        };
        self.persist(Some(state))?;

        match state {
            PermissionState::Granted => Ok(()),
            PermissionState::DeniedPermanently => Err(WeatherError::PermissionDeniedPermanently),
            _ => Err(WeatherError::PermissionDenied),
        }
    }

    /// There is no settings screen: forgetting the stored answer is the
    /// equivalent.
    async fn open_app_settings(&self) -> Result<(), WeatherError> {
        self.persist(None)?;
        eprintln!("Location consent cleared in {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use weather_core::PermissionGate;

    #[tokio::test]
    async fn stored_answer_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.location_permission = Some(PermissionState::Granted);

        let controller = ConsentController::new(dir.path().join("config.toml"), config);

        assert_eq!(controller.state().await.unwrap(), PermissionState::Granted);
        assert!(controller.is_granted().await.unwrap());
    }

    #[tokio::test]
    async fn settings_hook_forgets_permanent_denial() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = Config::default();
        config.location_permission = Some(PermissionState::DeniedPermanently);

        let gate = PermissionGate::new(Arc::new(ConsentController::new(path.clone(), config)));
        assert_eq!(gate.check_permission().await, PermissionState::DeniedPermanently);

        // never prompts while permanently denied
        assert_eq!(gate.request_permission().await, PermissionState::DeniedPermanently);

        assert_eq!(gate.open_settings().await, PermissionState::Undetermined);
        assert!(Config::load_from(&path).unwrap().location_permission.is_none());
    }
}
