use crate::configuration::{CrmSettings, Settings};
use crate::crm::ZohoClient;
use crate::routes::{check_health, home, join_waitlist};
use actix_web::dev::Server;
use actix_web::web::Data;
use actix_web::{web, App, HttpResponse, HttpServer};
use anyhow::Context;
use std::net::TcpListener;
use tracing_actix_web::TracingLogger;

pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    pub fn build(settings: Settings) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(settings.application.get_url())
            .context("Failed to bind the application port")?;
        let port = listener.local_addr()?.port();

        let crm_client = ZohoClient::new(
            settings.crm.accounts_base_url(),
            settings.crm.api_base_url(),
            settings.crm.enrollment,
            settings.crm.timeout(),
        )
        .context("Failed to build the CRM client")?;

        let server = run(listener, crm_client, settings.crm)?;
        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_terminated(self) -> std::io::Result<()> {
        // await server is making server polling inner future command
        self.server.await
    }
}

pub fn run(
    listener: TcpListener,
    crm_client: ZohoClient,
    crm_settings: CrmSettings,
) -> Result<Server, std::io::Error> {
    // So to share data between threads, actix-web provide web::Data<T>(Arc<T>)
    // which is a thread-safe reference counting pointer to a value of type T
    let crm_client = Data::new(crm_client);
    let crm_settings = Data::new(crm_settings);

    // A body that is not JSON, or that is missing the email field, gets the
    // same 400 shape the validation path produces
    let json_config = web::JsonConfig::default().error_handler(|err, _req| {
        actix_web::error::InternalError::from_response(
            err,
            HttpResponse::BadRequest()
                .json(serde_json::json!({ "error": "Valid email address is required" })),
        )
        .into()
    });

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default()) // logger middleware
            .route("/", web::get().to(home))
            .route("/health", web::get().to(check_health))
            .route("/api/waitlist", web::post().to(join_waitlist))
            .app_data(json_config.clone())
            .app_data(crm_client.clone())
            .app_data(crm_settings.clone())
    })
    .listen(listener)?
    .run();
    // server is already running at this point

    Ok(server)
}
