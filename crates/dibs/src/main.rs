use std::sync::Arc;

use dibs_core::config::Config;

#[tokio::main]
async fn main() -> Result<(), dibs_core::Error> {
    dibs_core::logging::init("dibs")?;

    let cfg = Arc::new(Config::load()?);

    dibs_shell::run(cfg)
        .await
        .map_err(|e| dibs_core::Error::External(format!("shell adapter failed: {e}")))?;

    Ok(())
}
