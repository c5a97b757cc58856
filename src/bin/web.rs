//! Single binary web server exposing the tournament engine as a REST API.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT.

use actix_web::{
    delete, get, post,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use serde::Deserialize;
use spikeball_tournament_web::{
    recompute, Engine, EntityStore, MemoryStore, StoreError, TournamentError, TournamentId,
    TournamentMode, TournamentSnapshot,
};
use std::sync::Arc;
use uuid::Uuid;

type AppEngine = Data<Engine<MemoryStore>>;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreateTournamentBody {
    name: String,
    #[serde(default)]
    mode: TournamentMode,
    players: Vec<String>,
}

#[derive(Deserialize)]
struct ResultBody {
    score_team_a: i64,
    score_team_b: i64,
}

#[derive(Deserialize)]
struct FinishBody {
    winner_team_id: Option<Uuid>,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

/// Path segments: tournament id and match id.
#[derive(Deserialize)]
struct TournamentMatchPath {
    id: TournamentId,
    match_id: Uuid,
}

fn error_response(e: &TournamentError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        TournamentError::TournamentNotFound(_)
        | TournamentError::MatchNotFound(_)
        | TournamentError::Store(StoreError::TournamentNotFound(_))
        | TournamentError::Store(StoreError::MatchNotFound(_)) => {
            HttpResponse::NotFound().json(body)
        }
        TournamentError::Store(_) | TournamentError::ConsistencyViolation(_) => {
            HttpResponse::InternalServerError().json(body)
        }
        _ => HttpResponse::BadRequest().json(body),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "spikeball-tournament-web",
    })
}

/// Create a tournament: players are drawn into random teams and the initial
/// matches are created (seed match or first league round).
#[post("/api/tournaments")]
async fn api_create_tournament(engine: AppEngine, body: Json<CreateTournamentBody>) -> HttpResponse {
    match engine.create_tournament(&body.name, body.mode, &body.players) {
        Ok(t) => match TournamentSnapshot::load(engine.store().as_ref(), t.id) {
            Ok(snapshot) => HttpResponse::Ok().json(snapshot),
            Err(e) => error_response(&e),
        },
        Err(e) => error_response(&e),
    }
}

/// List tournaments, newest first.
#[get("/api/tournaments")]
async fn api_list_tournaments(engine: AppEngine) -> HttpResponse {
    match engine.store().tournaments() {
        Ok(all) => HttpResponse::Ok().json(all),
        Err(e) => error_response(&TournamentError::Store(e)),
    }
}

/// Full snapshot plus the derived projection (standings, next match, on-deck
/// team, upcoming and recent matches).
#[get("/api/tournaments/{id}")]
async fn api_get_tournament(engine: AppEngine, path: Path<TournamentPath>) -> HttpResponse {
    let snapshot = match TournamentSnapshot::load(engine.store().as_ref(), path.id) {
        Ok(s) => s,
        Err(e) => return error_response(&e),
    };
    match recompute(&snapshot) {
        Ok(projection) => HttpResponse::Ok().json(serde_json::json!({
            "snapshot": snapshot,
            "projection": projection,
        })),
        Err(e) => error_response(&e),
    }
}

/// Record a match result. In winner-stays-on mode the follow-up match is
/// queued in the same operation.
#[post("/api/tournaments/{id}/matches/{match_id}/result")]
async fn api_record_result(
    engine: AppEngine,
    path: Path<TournamentMatchPath>,
    body: Json<ResultBody>,
) -> HttpResponse {
    match engine.record_result(path.id, path.match_id, body.score_team_a, body.score_team_b) {
        Ok(recorded) => HttpResponse::Ok().json(serde_json::json!({
            "winner_team_id": recorded.winner_team_id,
            "follow_up": recorded.follow_up,
        })),
        Err(e) => error_response(&e),
    }
}

/// Skip the pending match and queue a replacement (winner-stays-on only).
#[post("/api/tournaments/{id}/matches/{match_id}/skip")]
async fn api_skip_match(engine: AppEngine, path: Path<TournamentMatchPath>) -> HttpResponse {
    match engine.skip_match(path.id, path.match_id) {
        Ok(replacement) => HttpResponse::Ok().json(serde_json::json!({
            "replacement": replacement,
        })),
        Err(e) => error_response(&e),
    }
}

/// Append a new full round (league only).
#[post("/api/tournaments/{id}/rounds")]
async fn api_create_round(engine: AppEngine, path: Path<TournamentPath>) -> HttpResponse {
    match engine.create_round(path.id) {
        Ok(round) => HttpResponse::Ok().json(round),
        Err(e) => error_response(&e),
    }
}

/// Delete a tournament and all its players, teams and matches.
#[delete("/api/tournaments/{id}")]
async fn api_delete_tournament(engine: AppEngine, path: Path<TournamentPath>) -> HttpResponse {
    match engine.delete_tournament(path.id) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => error_response(&e),
    }
}

/// Finish the tournament. Without a body winner, the standings leader wins.
#[post("/api/tournaments/{id}/finish")]
async fn api_finish_tournament(
    engine: AppEngine,
    path: Path<TournamentPath>,
    body: Option<Json<FinishBody>>,
) -> HttpResponse {
    let winner = body.and_then(|b| b.winner_team_id);
    match engine.finish_tournament(path.id, winner) {
        Ok(t) => HttpResponse::Ok().json(t),
        Err(e) => error_response(&e),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    let engine = Data::new(Engine::new(Arc::new(MemoryStore::new())));
    log::info!("listening on {host}:{port}");

    HttpServer::new(move || {
        App::new()
            .app_data(engine.clone())
            .service(api_health)
            .service(api_create_tournament)
            .service(api_list_tournaments)
            .service(api_get_tournament)
            .service(api_record_result)
            .service(api_skip_match)
            .service(api_create_round)
            .service(api_delete_tournament)
            .service(api_finish_tournament)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
