// src/main.rs
use std::sync::Arc;

use env_logger::Env;
use log::info;
use structopt::StructOpt;

use notifeed::application::service::feed_service::NotificationFeedService;
use notifeed::infrastructure::repositories::sqlite_notification_repository::SqliteNotificationRepository;
use notifeed::infrastructure::web::notification_controller::create_notification_routes;
use notifeed::Settings;

#[derive(StructOpt, Debug)]
#[structopt(name = "notifeed")]
struct Opt {
    #[structopt(short, long, default_value = "config.toml")]
    config: String,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let opt = Opt::from_args();
    let settings = match Settings::load_from_file(&opt.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load configuration: {:?}", e);
            std::process::exit(1);
        }
    };

    info!("loaded configuration: {:?}", settings);

    let repository = match SqliteNotificationRepository::new(&settings.database_url).await {
        Ok(repo) => repo,
        Err(e) => {
            eprintln!("Failed to open notification store: {}", e);
            std::process::exit(1);
        }
    };

    let service = Arc::new(NotificationFeedService::new(Arc::new(repository)));
    let app = create_notification_routes(service);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    info!("listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await
}
