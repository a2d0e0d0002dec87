use std::sync::Arc;

use log::info;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use fintrack_api_client::FinanceApiClient;
use fintrack_core::balances::BalanceService;
use fintrack_core::gateway::FinanceApiTrait;
use fintrack_core::overview::OverviewService;
use fintrack_core::session::{SessionHandle, SessionService, SessionStore};
use fintrack_core::sync::{ConnectivityMonitor, DrainReport, LocalStoreTrait, SyncReconciler};
use fintrack_core::transactions::TransactionService;
use fintrack_core::Result;
use fintrack_storage_sqlite::db::{self, write_actor::spawn_writer};
use fintrack_storage_sqlite::{LocalRecordRepository, SessionRepository};

use crate::config::RuntimeConfig;

#[derive(Debug, Default)]
pub struct SyncRuntimeState {
    pub background_task: Mutex<Option<JoinHandle<()>>>,
    pub last_report: Mutex<Option<DrainReport>>,
}

/// Everything an embedding application needs, wired once at startup.
pub struct ServiceContext {
    pub config: RuntimeConfig,
    pub session: SessionHandle,
    pub connectivity: ConnectivityMonitor,

    pub local_store: Arc<dyn LocalStoreTrait>,
    pub api: Arc<dyn FinanceApiTrait>,

    pub session_service: Arc<SessionService>,
    pub transaction_service: Arc<TransactionService>,
    pub balance_service: Arc<BalanceService>,
    pub overview_service: Arc<OverviewService>,
    pub reconciler: Arc<SyncReconciler>,
    pub sync_runtime: Arc<SyncRuntimeState>,
}

impl ServiceContext {
    /// Opens the database, runs migrations, builds the HTTP gateway and
    /// restores any persisted session.
    pub async fn initialize(config: RuntimeConfig) -> Result<Arc<Self>> {
        let session = SessionHandle::default();
        let api: Arc<dyn FinanceApiTrait> = Arc::new(FinanceApiClient::new(
            config.api_client_config(),
            session.clone(),
        ));
        Self::initialize_with_gateway(config, session, api).await
    }

    /// Same as [`ServiceContext::initialize`] with a caller-supplied gateway.
    /// The gateway must read its credential from `session`.
    pub async fn initialize_with_gateway(
        config: RuntimeConfig,
        session: SessionHandle,
        api: Arc<dyn FinanceApiTrait>,
    ) -> Result<Arc<Self>> {
        let db_path = db::init(&config.data_dir_string())?;
        db::run_migrations(&db_path)?;
        let pool = db::create_pool(&db_path)?;
        let writer = spawn_writer(pool.as_ref().clone());

        let local_store: Arc<dyn LocalStoreTrait> =
            Arc::new(LocalRecordRepository::new(pool.clone(), writer.clone()));
        let session_store: Arc<dyn SessionStore> =
            Arc::new(SessionRepository::new(pool, writer));

        let context = Self::from_parts(config, session, api, local_store, session_store);
        context.session_service.restore().await?;
        info!(
            "[Runtime] Context ready (db={}, api={})",
            db_path, context.config.api_base_url
        );
        Ok(context)
    }

    pub fn from_parts(
        config: RuntimeConfig,
        session: SessionHandle,
        api: Arc<dyn FinanceApiTrait>,
        local_store: Arc<dyn LocalStoreTrait>,
        session_store: Arc<dyn SessionStore>,
    ) -> Arc<Self> {
        let connectivity = ConnectivityMonitor::default();

        let session_service = Arc::new(SessionService::new(
            api.clone(),
            session_store,
            session.clone(),
        ));
        let transaction_service = Arc::new(TransactionService::new(
            api.clone(),
            local_store.clone(),
            connectivity.clone(),
            session.clone(),
        ));
        let balance_service = Arc::new(BalanceService::new(
            api.clone(),
            local_store.clone(),
            connectivity.clone(),
            session.clone(),
        ));
        let overview_service = Arc::new(OverviewService::new(api.clone()));
        let reconciler = Arc::new(SyncReconciler::new(
            local_store.clone(),
            api.clone(),
            session.clone(),
        ));

        Arc::new(Self {
            config,
            session,
            connectivity,
            local_store,
            api,
            session_service,
            transaction_service,
            balance_service,
            overview_service,
            reconciler,
            sync_runtime: Arc::new(SyncRuntimeState::default()),
        })
    }

    pub fn session_service(&self) -> Arc<SessionService> {
        Arc::clone(&self.session_service)
    }

    pub fn transaction_service(&self) -> Arc<TransactionService> {
        Arc::clone(&self.transaction_service)
    }

    pub fn balance_service(&self) -> Arc<BalanceService> {
        Arc::clone(&self.balance_service)
    }

    pub fn overview_service(&self) -> Arc<OverviewService> {
        Arc::clone(&self.overview_service)
    }

    pub fn reconciler(&self) -> Arc<SyncReconciler> {
        Arc::clone(&self.reconciler)
    }

    pub fn local_store(&self) -> Arc<dyn LocalStoreTrait> {
        Arc::clone(&self.local_store)
    }

    pub fn sync_runtime(&self) -> Arc<SyncRuntimeState> {
        Arc::clone(&self.sync_runtime)
    }
}
