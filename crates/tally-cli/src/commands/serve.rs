//! Web server command

use std::path::Path;

use anyhow::Result;

use tally_server::ServerConfig;

use super::open_db;

pub async fn cmd_serve(
    db_path: &Path,
    host: &str,
    port: u16,
    no_auth: bool,
    no_encrypt: bool,
) -> Result<()> {
    let db = open_db(db_path, no_encrypt)?;

    if no_auth {
        println!("⚠️  Authentication disabled - every request maps to the local user");
    }

    let config = ServerConfig {
        require_auth: !no_auth,
        ..Default::default()
    };

    println!("🚀 Tally server starting on http://{}:{}", host, port);
    tally_server::serve(db, host, port, config).await
}
