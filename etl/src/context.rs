use crate::lake::WarehouseConnection;
use anyhow::Result;
use datafusion::execution::{
    memory_pool::{GreedyMemoryPool, MemoryPool, TrackConsumersPool, UnboundedMemoryPool},
    runtime_env::{RuntimeEnv, RuntimeEnvBuilder},
};
use datafusion::prelude::{SessionConfig, SessionContext};
use std::{num::NonZeroUsize, sync::Arc};

/// Creates a new DataFusion `RuntimeEnv` with a configurable memory pool.
pub fn make_runtime_env() -> Result<RuntimeEnv> {
    let nb_top_consumers = NonZeroUsize::new(5).unwrap();
    let pool: Arc<dyn MemoryPool> = match std::env::var("PLAYLAKE_DATAFUSION_MEMORY_BUDGET_MB") {
        Ok(mb_str) => {
            let bytes = mb_str.parse::<usize>()? * 1024 * 1024;
            Arc::new(TrackConsumersPool::new(
                GreedyMemoryPool::new(bytes),
                nb_top_consumers,
            ))
        }
        Err(_) => Arc::new(TrackConsumersPool::new(
            UnboundedMemoryPool::default(),
            nb_top_consumers,
        )),
    };
    Ok(RuntimeEnvBuilder::new().with_memory_pool(pool).build()?)
}

/// Builds the session context for one run and registers the warehouse stores on it.
///
/// The context is passed explicitly through every stage; there is no ambient
/// engine session, which lets tests run against an isolated local warehouse.
pub fn make_session_context(lake: &WarehouseConnection) -> Result<SessionContext> {
    let runtime = Arc::new(make_runtime_env()?);
    let ctx = SessionContext::new_with_config_rt(SessionConfig::new(), runtime);
    ctx.register_object_store(&lake.input_url, lake.input_store.clone());
    ctx.register_object_store(&lake.output_url, lake.output_store.clone());
    Ok(ctx)
}
