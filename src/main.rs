use std::net::TcpListener;

use anyhow::Context;

use finsight::app;
use finsight::crypto::TokenIssuer;
use finsight::database::Database;
use finsight::insights::Advisor;
use finsight::settings::Settings;
use finsight::telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine, the environment may already be set
    dotenvy::dotenv().ok();

    let subscriber = telemetry::create_subscriber("info", std::io::stdout);
    telemetry::set_subscriber(subscriber)?;

    let settings = Settings::load()?;
    settings.report_missing();

    let info = settings.app.info();
    tracing::info!(title = %info.title, version = %info.version, "{}", info.description);

    let database = Database::from_settings(&settings.supabase);
    let advisor = Advisor::from_settings(&settings.gemini);
    let token_issuer =
        TokenIssuer::from_settings(&settings.app).context("Failed to create token issuer")?;

    let listener = TcpListener::bind(settings.app.addr()).context("Failed to bind listener")?;
    tracing::info!(addr = ?listener.local_addr()?, "Listening");

    app::run(listener, database, advisor, token_issuer, info)?
        .await
        .context("Failed to run app")
}
