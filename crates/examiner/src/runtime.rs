use std::path::PathBuf;
use std::sync::Arc;

use app::AppContext;
use color_eyre::Result;
use portal_client::{ClientConfig, FileTokenStore, HttpPortal, Notifier, PortalApi, TokenStore};

use crate::output::ConsoleNotifier;

/// Everything a command needs, built once in `main`.
pub struct Runtime {
    pub ctx: AppContext,
    pub config: ClientConfig,
    pub token_path: PathBuf,
    pub tokens: Arc<dyn TokenStore>,
    pub notifier: Arc<dyn Notifier>,
    pub json: bool,
}

impl Runtime {
    pub fn new(ctx: AppContext, config: ClientConfig, json: bool) -> Self {
        let token_path = config
            .token_file
            .clone()
            .unwrap_or_else(|| ctx.path_context().token_file());
        Self {
            tokens: Arc::new(FileTokenStore::new(token_path.clone())),
            notifier: Arc::new(ConsoleNotifier),
            token_path,
            ctx,
            config,
            json,
        }
    }

    /// Portal client; fails fast when no token is stored.
    pub fn api(&self) -> Result<Arc<dyn PortalApi>> {
        self.tokens.require()?;
        Ok(Arc::new(HttpPortal::new(&self.config, self.tokens.clone())?))
    }

    pub fn per_page(&self, requested: Option<u32>) -> u32 {
        requested.unwrap_or(self.config.default_per_page).max(1)
    }
}
