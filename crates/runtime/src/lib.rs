use anyhow::{Context, Result};
use chitchat_config::AppConfig;
use chitchat_session::{HttpDirectory, SessionCoordinator, SessionUser};
use tracing::info;

pub mod telemetry {
    use anyhow::Result;
    use tracing_subscriber::{fmt::SubscriberBuilder, EnvFilter};

    pub fn init_tracing() -> Result<()> {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let subscriber = SubscriberBuilder::default()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .finish();

        tracing::subscriber::set_global_default(subscriber)
            .map_err(|error| anyhow::anyhow!("failed to set tracing subscriber: {error}"))
    }
}

/// A session talking to the REST backend.
pub type ClientSession = SessionCoordinator<HttpDirectory>;

#[derive(Clone)]
pub struct ClientServices {
    pub config: AppConfig,
    pub directory: HttpDirectory,
}

impl ClientServices {
    pub fn initialise(config: &AppConfig) -> Result<Self> {
        let directory =
            HttpDirectory::new(&config.api).context("failed to build chat directory client")?;

        info!(base_url = %config.api.base_url, "chat directory ready");

        Ok(Self {
            config: config.clone(),
            directory,
        })
    }

    /// Create a session for `user` and load their chats.
    pub async fn start_session(&self, user: SessionUser) -> Result<ClientSession> {
        let mut session =
            SessionCoordinator::new(self.directory.clone(), user, &self.config.session);
        session
            .start()
            .await
            .context("failed to load chats for session")?;
        Ok(session)
    }
}

pub async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!(?error, "failed to listen for shutdown signal");
    }
    info!("shutdown signal received");
}
