use std::sync::Arc;

use crate::{
    config::Config,
    database::BlogDatabase,
    external::{HttpInteropForwarder, InteropForwarder, RawQueryEngine, SqlQueryEngine},
    seed,
};

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<BlogDatabase>,
    pub raw_query: Option<Arc<dyn RawQueryEngine>>,
    pub interop: Option<Arc<dyn InteropForwarder>>,
    pub config: Config,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        // An unreachable database is a fatal startup error; no retry.
        let database = BlogDatabase::new(&config.database.url).await?;
        database.init().await?;
        let database = Arc::new(database);

        if config.database.seed_demo_data {
            seed::seed_demo_data(&database).await?;
        }

        let raw_query: Option<Arc<dyn RawQueryEngine>> =
            match &config.external.vendor_database_url {
                Some(url) => Some(Arc::new(SqlQueryEngine::connect(url).await?)),
                None => None,
            };

        let interop: Option<Arc<dyn InteropForwarder>> = config
            .external
            .interop_adapter_url
            .as_ref()
            .map(|url| Arc::new(HttpInteropForwarder::new(url)) as Arc<dyn InteropForwarder>);

        Ok(Self {
            db: database,
            raw_query,
            interop,
            config,
        })
    }
}
