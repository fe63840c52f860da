use helthy_site::configuration::Settings;
use helthy_site::startup::Application;
use helthy_site::telemetry::config_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::get_configuration()?;

    config_tracing(&settings.application);

    let app = Application::build(settings)?;
    app.run_until_terminated().await?;
    Ok(())
}
