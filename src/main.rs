use actix_web::{App, HttpServer, web};
use dotenvy::dotenv;
use std::env;
use std::io;

use pow_chain::api::{self, AppState};
use pow_chain::config::Config;
use pow_chain::demo;

#[actix_web::main]
async fn main() -> io::Result<()> {
    let _ = dotenv();
    env_logger::init();

    let config = Config::from_env();

    // `pow_chain demo` prints the console walkthrough instead of serving.
    if env::args().nth(1).as_deref() == Some("demo") {
        return demo::run(&config).map_err(|e| io::Error::other(e.to_string()));
    }

    println!(
        "⛓️ Mining genesis block (difficulty {})...",
        config.difficulty
    );
    let state = AppState::new(&config).map_err(io::Error::other)?;
    let state = web::Data::new(state);

    println!(
        "⛓️ Starting PoW chain API at http://{}:{}",
        config.host, config.port
    );

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(api::init_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
