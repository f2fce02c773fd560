use anyhow::Result;
use sani_config::Config;

pub async fn handle(mut config: Config, host: Option<String>, port: Option<u16>) -> Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    println!(
        "Starting sani server on {}:{}",
        config.server.host, config.server.port
    );
    sani_server::serve(config).await
}
