//! Builds the gnames PostgreSQL database from CSV dump files.
//!
//! The build is a fixed sequence of phases over a freshly reset schema:
//!
//! 1. name-strings: parse every scientific name, load `name_strings` and
//!    the three canonical tables, fill the sci KV store;
//! 2. data-sources: merge the dump with the static registry;
//! 3. name-string indices: resolve source ids through the sci KV store;
//! 4. vernacular strings and indices, with their own KV store;
//! 5. reconciliation: orphan pruning, word extraction, the verification
//!    materialized view, vernacular language normalization.
//!
//! Each import phase truncates its own target table before loading, so a
//! failed run can be restarted from scratch safely.

mod copy;
mod csv_input;
mod data_sources;
mod db;
mod error;
mod name_indices;
mod name_strings;
mod payload;
mod pipeline;
mod reconcile;
mod registry;
mod schema;
mod vern_indices;
mod vern_lang;
mod vern_strings;
mod words;

pub use error::{Error, Result};

use sqlx::PgPool;
use tracing::info;

use gnidump_core::Config;
use gnidump_kv::Store;

/// Owns the connection pool and runs the build phases in order.
pub struct Builder {
    cfg: Config,
    pool: PgPool,
}

impl Builder {
    /// Connects to the target database and resets its schema.
    pub async fn new(cfg: Config) -> Result<Self> {
        let pool = db::connect(&cfg).await?;
        db::reset_db(&pool, &cfg).await?;
        db::migrate(&pool).await?;
        Ok(Self { cfg, pool })
    }

    /// Runs the whole build. Phase order is strict: indices need the KV
    /// stores their string phases produce, reconciliation needs all five
    /// tables loaded.
    pub async fn build(&self) -> Result<()> {
        {
            let sci_kv = Store::open(&self.cfg.sci_kv_dir)?;
            name_strings::import_name_strings(&self.cfg, &self.pool, &sci_kv).await?;
            data_sources::import_data_sources(&self.cfg, &self.pool).await?;
            name_indices::import_name_indices(&self.cfg, &self.pool, &sci_kv).await?;
        }
        {
            let vern_kv = Store::open(&self.cfg.vern_kv_dir)?;
            vern_strings::import_vern_strings(&self.cfg, &self.pool, &vern_kv).await?;
            vern_indices::import_vern_indices(&self.cfg, &self.pool, &vern_kv).await?;
        }

        reconcile::remove_orphans(&self.pool).await?;
        words::create_words(&self.pool).await?;
        reconcile::create_verification(&self.pool).await?;
        vern_lang::fix_vern_lang(&self.pool).await?;

        info!("build finished");
        Ok(())
    }
}
