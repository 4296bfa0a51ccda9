use std::sync::Arc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::services::{
    HttpImageStore, HttpMailSender, ImageStore, MailSender, MemoryImageStore, RecordingMailSender,
};
use crate::tenancy::MembershipService;
use shared::error::AppError;

/// Server state — shared references to every service
///
/// Cloning is shallow; everything non-trivial sits behind an Arc.
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    /// Embedded database (SurrealDB)
    pub db: Surreal<Db>,
    pub jwt_service: Arc<JwtService>,
    pub image_store: Arc<dyn ImageStore>,
    pub mail_sender: Arc<dyn MailSender>,
    pub membership: MembershipService,
}

impl ServerState {
    /// Initialize the server state: open the database, then wire the
    /// services. External collaborators fall back to in-process stubs when
    /// their URL is not configured, which keeps local development and tests
    /// off the network.
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        std::fs::create_dir_all(&config.work_dir)
            .map_err(|e| AppError::internal(format!("Cannot create work dir: {e}")))?;

        let db_service = DbService::new(&config.database_path()).await?;
        let db = db_service.db;

        let image_store: Arc<dyn ImageStore> = match &config.image_store_url {
            Some(url) => Arc::new(HttpImageStore::new(url.clone())),
            None => {
                tracing::warn!("IMAGE_STORE_URL not set, using in-memory image store");
                Arc::new(MemoryImageStore::new())
            }
        };
        let mail_sender: Arc<dyn MailSender> = match &config.mail_service_url {
            Some(url) => Arc::new(HttpMailSender::new(url.clone())),
            None => {
                tracing::warn!("MAIL_SERVICE_URL not set, mail will not be delivered");
                Arc::new(RecordingMailSender::new())
            }
        };

        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let membership = MembershipService::new(db.clone(), mail_sender.clone());

        Ok(Self {
            config: config.clone(),
            db,
            jwt_service,
            image_store,
            mail_sender,
            membership,
        })
    }

    /// State over an in-memory database with stub collaborators, for tests
    pub async fn for_tests() -> Result<Self, AppError> {
        let db_service = DbService::memory().await?;
        let db = db_service.db;
        let image_store: Arc<dyn ImageStore> = Arc::new(MemoryImageStore::new());
        let mail_sender: Arc<dyn MailSender> = Arc::new(RecordingMailSender::new());
        let membership = MembershipService::new(db.clone(), mail_sender.clone());

        Ok(Self {
            config: Config::from_env(),
            db,
            jwt_service: Arc::new(JwtService::default()),
            image_store,
            mail_sender,
            membership,
        })
    }

    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    pub fn jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }

    pub fn membership(&self) -> &MembershipService {
        &self.membership
    }
}
