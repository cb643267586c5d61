use actix_web::{HttpResponse, Responder, post, web};
use log::error;

use super::models::{
    ErrorResponse, NewWalletResponse, SignRequest, SignResponse, VerifyRequest, VerifyResponse,
};
use crate::signing::{self, SigningError};

#[post("/wallet/new/")]
pub async fn create_wallet() -> impl Responder {
    match signing::generate_keypair() {
        Ok(keys) => HttpResponse::Ok().json(NewWalletResponse {
            private_key: keys.secret_hex(),
            public_key: keys.public_hex(),
        }),
        Err(e) => {
            error!("{e}");
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: e.to_string(),
            })
        }
    }
}

/// Sign `message` (UTF-8, e.g. a winning PoW hash) with a hex private key.
#[post("/sign/")]
pub async fn sign_message(req: web::Json<SignRequest>) -> impl Responder {
    match signing::sign_hex(&req.private_key, req.message.as_bytes()) {
        Ok(signature) => HttpResponse::Ok().json(SignResponse { signature }),
        Err(e) => bad_request(e),
    }
}

/// A signature that does not match is `valid: false`; unparsable input is 400.
#[post("/verify/")]
pub async fn verify_message(req: web::Json<VerifyRequest>) -> impl Responder {
    match signing::verify_hex(&req.public_key, req.message.as_bytes(), &req.signature) {
        Ok(valid) => HttpResponse::Ok().json(VerifyResponse { valid }),
        Err(e) => bad_request(e),
    }
}

fn bad_request(e: SigningError) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: e.to_string(),
    })
}
