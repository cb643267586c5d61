use actix_web::{HttpResponse, Responder, get, post, web};
use log::{error, info};

use super::models::{
    AppState, AppendRequest, ChainResponse, DifficultyResponse, ErrorResponse, ValidateResponse,
};
use super::pow::mining_error;

/// Get the full blockchain.
#[get("/chain/")]
pub async fn get_chain(state: web::Data<AppState>) -> impl Responder {
    let bc = state.blockchain.lock().expect("mutex poisoned");
    let resp = ChainResponse {
        length: bc.len(),
        difficulty: bc.difficulty(),
        chain: bc.blocks(),
    };
    HttpResponse::Ok().json(resp)
}

/// Validate the whole chain.
#[get("/validate/")]
pub async fn validate_chain(state: web::Data<AppState>) -> impl Responder {
    let bc = state.blockchain.lock().expect("mutex poisoned");
    let resp = ValidateResponse {
        valid: bc.is_valid_chain(),
        length: bc.len(),
        difficulty: bc.difficulty(),
    };
    HttpResponse::Ok().json(resp)
}

/// Get the chain's PoW difficulty (fixed at startup).
#[get("/difficulty/")]
pub async fn get_difficulty(state: web::Data<AppState>) -> impl Responder {
    let bc = state.blockchain.lock().expect("mutex poisoned");
    HttpResponse::Ok().json(DifficultyResponse {
        difficulty: bc.difficulty(),
    })
}

/// Mine a block carrying `payload` and append it to the chain.
///
/// The chain lock is only held to snapshot the tail and to append; mining
/// runs on the blocking pool in between, so readers are not stalled. If
/// another append lands first, the stale block is rejected with 422.
#[post("/blocks/")]
pub async fn append_block(
    state: web::Data<AppState>,
    body: web::Json<AppendRequest>,
) -> impl Responder {
    let payload = body.into_inner().payload;
    let (candidate, miner) = {
        let bc = state.blockchain.lock().expect("mutex poisoned");
        (bc.next_candidate(payload), bc.miner().clone())
    };

    let block = match web::block(move || candidate.mine_with(&miner)).await {
        Ok(Ok(block)) => block,
        Ok(Err(e)) => return mining_error(e),
        Err(e) => {
            error!("append worker failed: {e}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    let appended = {
        let mut bc = state.blockchain.lock().expect("mutex poisoned");
        bc.append_block(block).map(|b| b.clone())
    };

    match appended {
        Ok(block) => {
            info!("API - sealed block #{} (hash={})", block.index, block.hash);
            HttpResponse::Ok().json(block)
        }
        Err(e) => HttpResponse::UnprocessableEntity().json(ErrorResponse {
            error: e.to_string(),
        }),
    }
}
