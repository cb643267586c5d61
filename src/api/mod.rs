mod chain;
mod health;
pub mod models;
mod pow;
mod wallet;

use actix_web::web::{self, ServiceConfig};

pub use models::AppState;

pub fn init_routes(cfg: &mut ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .service(health::health_check)
            .service(chain::get_chain)
            .service(chain::validate_chain)
            .service(chain::get_difficulty)
            .service(chain::append_block)
            .service(pow::solve_puzzle)
            .service(wallet::create_wallet)
            .service(wallet::sign_message)
            .service(wallet::verify_message),
    );
}
