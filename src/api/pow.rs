use std::time::Duration;

use actix_web::{HttpResponse, Responder, post, web};
use log::{debug, error};

use super::models::{AppState, ErrorResponse, PowRequest, PowResponse};
use crate::blockchain::DIFF_MAX;
use crate::pow::{Miner, MiningError};

/// Solve a standalone prefix puzzle: `prefix ∥ nonce` hashed until the
/// digest has `difficulty` leading hex zeros. Optional `max_attempts` and
/// `timeout_ms` bound the search.
#[post("/pow/")]
pub async fn solve_puzzle(state: web::Data<AppState>, req: web::Json<PowRequest>) -> impl Responder {
    let req = req.into_inner();
    let difficulty = req.difficulty.unwrap_or(state.default_difficulty);
    if difficulty > DIFF_MAX {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: format!("difficulty too high (max {DIFF_MAX})"),
        });
    }

    let mut miner = Miner::new(difficulty).with_progress_interval(state.progress_interval);
    if let Some(max) = req.max_attempts {
        miner = miner.with_max_attempts(max);
    }
    if let Some(ms) = req.timeout_ms {
        miner = miner.with_deadline(Duration::from_millis(ms));
    }

    debug!("POW - prefix={:?} difficulty={}", req.prefix, difficulty);
    let prefix = req.prefix;
    let outcome = web::block(move || miner.search(prefix.as_str())).await;

    match outcome {
        Ok(Ok(result)) => HttpResponse::Ok().json(PowResponse::new(&result, difficulty)),
        Ok(Err(e)) => mining_error(e),
        Err(e) => {
            error!("pow worker failed: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// A search stopped by its deadline or a cancel is a timeout; an exhausted
/// or unreachable search is unprocessable.
pub(super) fn mining_error(e: MiningError) -> HttpResponse {
    let body = ErrorResponse {
        error: e.to_string(),
    };
    match e {
        MiningError::DeadlineExceeded { .. } | MiningError::Cancelled { .. } => {
            HttpResponse::RequestTimeout().json(body)
        }
        MiningError::Exhausted { .. } | MiningError::DifficultyOutOfRange { .. } => {
            HttpResponse::UnprocessableEntity().json(body)
        }
    }
}
