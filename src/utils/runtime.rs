use anyhow::Result;

/// All planner mutations happen on one logical thread, so the runtime is single threaded too.
pub fn single_thread_runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}
