//! Single binary web server: JSON API over the tournament engine.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT.
//! INACTIVITY_HOURS (default 12) sets when untouched tournaments are dropped.

use actix_web::{
    delete, get, post, put,
    web::{Data, Json, Path, Query},
    App, HttpResponse, HttpServer, Responder,
};
use chrono::NaiveDate;
use gamemaster_web::{
    end_ladder_cycle, get_champion, get_runner_up, get_third_place, parse_roster,
    record_match_result, reorder_tie_group, report_ladder_score, start_tournament,
    tournament_standings, Direction, LadderType, Match, MatchId, MemoryStore, ParticipantId,
    ParticipantRegistry, ParticipantType, Tournament, TournamentError, TournamentId,
    TournamentMode, TournamentStore,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

/// Store plus last activity per tournament (for auto-cleanup).
#[derive(Default)]
struct AppData {
    store: MemoryStore,
    last_activity: HashMap<TournamentId, Instant>,
}

/// Every request holds the write lock for its whole load/apply/save cycle, so
/// operations on a tournament never interleave.
type AppState = Data<RwLock<AppData>>;

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Serialize)]
struct SnapshotResponse<'a> {
    tournament: &'a Tournament,
    matches: &'a [Match],
}

#[derive(Serialize)]
struct PodiumResponse {
    champion: Option<ParticipantId>,
    runner_up: Option<ParticipantId>,
    third_place: Vec<ParticipantId>,
}

#[derive(Deserialize)]
struct CreateTournamentBody {
    name: String,
    #[serde(default)]
    mode: TournamentMode,
    #[serde(default)]
    participant_type: ParticipantType,
    ladder_type: Option<LadderType>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
}

#[derive(Deserialize)]
struct CreateParticipantBody {
    name: String,
    #[serde(rename = "type", default)]
    kind: ParticipantType,
    #[serde(default)]
    members: Vec<String>,
}

#[derive(Deserialize)]
struct UpdateParticipantBody {
    name: Option<String>,
    members: Option<Vec<String>>,
}

#[derive(Deserialize)]
struct AddParticipantBody {
    participant_id: ParticipantId,
}

#[derive(Deserialize)]
struct ReportResultBody {
    score_a: f64,
    score_b: f64,
}

#[derive(Deserialize)]
struct LadderScoreBody {
    participant_id: ParticipantId,
    value: f64,
}

#[derive(Deserialize)]
struct ReorderBody {
    participant_id: ParticipantId,
    direction: Direction,
}

/// Query for the tournament list: archived ones are hidden unless asked for.
#[derive(Deserialize)]
struct ListQuery {
    #[serde(default)]
    include_archived: bool,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

/// Path segments: tournament id and participant id
#[derive(Deserialize)]
struct TournamentParticipantPath {
    id: TournamentId,
    participant_id: ParticipantId,
}

/// Path segments: tournament id and match id
#[derive(Deserialize)]
struct TournamentMatchPath {
    id: TournamentId,
    match_id: MatchId,
}

#[derive(Deserialize)]
struct ParticipantPath {
    participant_id: ParticipantId,
}

fn error_json(status: actix_web::http::StatusCode, message: String) -> HttpResponse {
    HttpResponse::build(status).json(serde_json::json!({ "error": message }))
}

fn engine_error(e: &TournamentError) -> HttpResponse {
    use actix_web::http::StatusCode;
    let status = match e {
        TournamentError::MatchNotFound(_) | TournamentError::ParticipantNotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::BAD_REQUEST,
    };
    error_json(status, e.to_string())
}

fn no_tournament() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": "No tournament" }))
}

fn lock_error() -> HttpResponse {
    HttpResponse::InternalServerError().body("lock error")
}

/// Load a tournament snapshot, run one engine operation on it and, only if it
/// succeeds, save the whole snapshot back.
fn apply<F>(state: &AppState, id: TournamentId, op: F) -> HttpResponse
where
    F: FnOnce(&mut Tournament, &mut Vec<Match>, &mut MemoryStore) -> Result<(), TournamentError>,
{
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let Some(mut tournament) = g.store.load_tournament(id) else {
        return no_tournament();
    };
    g.last_activity.insert(id, Instant::now());
    let mut matches = g.store.load_matches(id);
    if let Err(e) = op(&mut tournament, &mut matches, &mut g.store) {
        log::debug!("tournament {}: rejected: {}", id, e);
        return engine_error(&e);
    }
    let response = HttpResponse::Ok().json(SnapshotResponse {
        tournament: &tournament,
        matches: &matches,
    });
    g.store.save_matches(id, matches);
    g.store.save_tournament(tournament);
    response
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "gamemaster-web",
    })
}

/// Create a new tournament in draft.
#[post("/api/tournaments")]
async fn api_create_tournament(state: AppState, body: Json<CreateTournamentBody>) -> HttpResponse {
    let body = body.into_inner();
    let tournament = Tournament::new(body.name, body.mode, body.participant_type)
        .with_ladder_type(body.ladder_type.unwrap_or_default())
        .with_dates(body.start_date, body.end_date);
    let tournament = match tournament {
        Ok(t) => t,
        Err(e) => return engine_error(&e),
    };
    if tournament.name.is_empty() {
        return engine_error(&TournamentError::EmptyName);
    }
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    g.last_activity.insert(tournament.id, Instant::now());
    let response = HttpResponse::Ok().json(&tournament);
    g.store.save_tournament(tournament);
    response
}

/// Get a tournament with its matches. Touching it refreshes last_activity.
#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    apply(&state, path.id, |_, _, _| Ok(()))
}

/// List tournaments, most recently updated first.
#[get("/api/tournaments")]
async fn api_list_tournaments(state: AppState, query: Query<ListQuery>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let tournaments: Vec<Tournament> = g
        .store
        .list_tournaments()
        .into_iter()
        .filter(|t| query.include_archived || !t.archived)
        .collect();
    HttpResponse::Ok().json(tournaments)
}

#[post("/api/tournaments/{id}/archive")]
async fn api_archive_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    apply(&state, path.id, |t, _, _| {
        t.archive();
        Ok(())
    })
}

#[post("/api/tournaments/{id}/unarchive")]
async fn api_unarchive_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    apply(&state, path.id, |t, _, _| {
        t.unarchive();
        Ok(())
    })
}

/// Delete a tournament and its matches.
#[delete("/api/tournaments/{id}")]
async fn api_delete_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    g.last_activity.remove(&path.id);
    match g.store.delete_tournament(path.id) {
        Some(t) => {
            log::info!("tournament {} deleted", t.id);
            HttpResponse::Ok().json(t)
        }
        None => no_tournament(),
    }
}

/// Register a participant (not yet in any tournament).
#[post("/api/participants")]
async fn api_create_participant(state: AppState, body: Json<CreateParticipantBody>) -> HttpResponse {
    let body = body.into_inner();
    let mut registry = ParticipantRegistry::new();
    let participant = match registry.create(body.name, body.kind, body.members) {
        Ok(p) => p,
        Err(e) => return engine_error(&e),
    };
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    g.store.save_participants(vec![participant.clone()]);
    HttpResponse::Ok().json(participant)
}

/// Rename a participant or change its members (refused once it has played).
#[put("/api/participants/{participant_id}")]
async fn api_update_participant(
    state: AppState,
    path: Path<ParticipantPath>,
    body: Json<UpdateParticipantBody>,
) -> HttpResponse {
    let body = body.into_inner();
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let mut registry = ParticipantRegistry::from_participants(g.store.load_participants(&[path.participant_id]));
    let matches = g.store.all_matches();
    match registry.update(path.participant_id, body.name, body.members, &matches) {
        Ok(p) => {
            let p = p.clone();
            g.store.save_participants(vec![p.clone()]);
            HttpResponse::Ok().json(p)
        }
        Err(e) => engine_error(&e),
    }
}

/// Delete a participant that never played a completed match.
#[delete("/api/participants/{participant_id}")]
async fn api_delete_participant(state: AppState, path: Path<ParticipantPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let mut registry = ParticipantRegistry::from_participants(g.store.load_participants(&[path.participant_id]));
    let matches = g.store.all_matches();
    match registry.delete(path.participant_id, &matches) {
        Ok(p) => {
            g.store.remove_participant(p.id);
            HttpResponse::Ok().json(p)
        }
        Err(e) => engine_error(&e),
    }
}

/// Add a registered participant to a draft tournament.
#[post("/api/tournaments/{id}/participants")]
async fn api_add_participant(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<AddParticipantBody>,
) -> HttpResponse {
    apply(&state, path.id, |t, _, store| {
        let registry = ParticipantRegistry::from_participants(store.load_participants(&[body.participant_id]));
        t.add_participant(&registry, body.participant_id)
    })
}

/// Remove a participant from a draft tournament.
#[delete("/api/tournaments/{id}/participants/{participant_id}")]
async fn api_remove_participant(state: AppState, path: Path<TournamentParticipantPath>) -> HttpResponse {
    apply(&state, path.id, |t, _, _| t.remove_participant(path.participant_id))
}

/// Import a CSV roster (`name[,member...]` per line) into a draft tournament.
#[post("/api/tournaments/{id}/roster")]
async fn api_import_roster(state: AppState, path: Path<TournamentPath>, body: String) -> HttpResponse {
    let kind = {
        let g = match state.read() {
            Ok(guard) => guard,
            Err(_) => return lock_error(),
        };
        match g.store.load_tournament(path.id) {
            Some(t) => t.participant_type,
            None => return no_tournament(),
        }
    };
    let participants = match parse_roster(body.as_bytes(), kind) {
        Ok(p) => p,
        Err(e) => return error_json(actix_web::http::StatusCode::BAD_REQUEST, e.to_string()),
    };
    apply(&state, path.id, move |t, _, store| {
        let registry = ParticipantRegistry::from_participants(participants.iter().cloned());
        let mut draft = t.clone();
        for p in &participants {
            draft.add_participant(&registry, p.id)?;
        }
        *t = draft;
        store.save_participants(participants);
        Ok(())
    })
}

/// Randomize the seed order (draft only).
#[post("/api/tournaments/{id}/shuffle")]
async fn api_shuffle_seeds(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    apply(&state, path.id, |t, _, _| t.shuffle_seeds())
}

/// Start the tournament: build the bracket or open the ladder.
#[post("/api/tournaments/{id}/start")]
async fn api_start_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    apply(&state, path.id, |t, matches, _| {
        *matches = start_tournament(t)?;
        Ok(())
    })
}

/// Report an elimination match result.
#[put("/api/tournaments/{id}/matches/{match_id}/result")]
async fn api_report_result(
    state: AppState,
    path: Path<TournamentMatchPath>,
    body: Json<ReportResultBody>,
) -> HttpResponse {
    apply(&state, path.id, |t, matches, _| {
        record_match_result(t, matches, path.match_id, body.score_a, body.score_b).map(|_| ())
    })
}

/// Report a ladder score or time.
#[post("/api/tournaments/{id}/ladder/scores")]
async fn api_report_ladder_score(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<LadderScoreBody>,
) -> HttpResponse {
    apply(&state, path.id, |t, matches, _| {
        report_ladder_score(t, matches, body.participant_id, body.value).map(|_| ())
    })
}

/// Move a participant within its tie group.
#[post("/api/tournaments/{id}/ladder/reorder")]
async fn api_reorder_tie_group(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<ReorderBody>,
) -> HttpResponse {
    apply(&state, path.id, |t, matches, _| {
        reorder_tie_group(t, matches, body.participant_id, body.direction).map(|_| ())
    })
}

/// End the ladder cycle (active -> completed).
#[post("/api/tournaments/{id}/ladder/end")]
async fn api_end_ladder_cycle(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    apply(&state, path.id, |t, _, _| end_ladder_cycle(t))
}

/// Current ladder standings.
#[get("/api/tournaments/{id}/standings")]
async fn api_standings(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.store.load_tournament(path.id) {
        Some(t) => HttpResponse::Ok().json(tournament_standings(&t, &g.store.load_matches(t.id))),
        None => no_tournament(),
    }
}

/// Champion, runner-up and third place (empty until completed).
#[get("/api/tournaments/{id}/podium")]
async fn api_podium(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let Some(t) = g.store.load_tournament(path.id) else {
        return no_tournament();
    };
    let matches = g.store.load_matches(t.id);
    HttpResponse::Ok().json(PodiumResponse {
        champion: get_champion(&t, &matches),
        runner_up: get_runner_up(&t, &matches),
        third_place: get_third_place(&t, &matches),
    })
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_inactivity_hours() -> u64 {
    12
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let inactivity_hours: u64 = std::env::var("INACTIVITY_HOURS")
        .ok()
        .and_then(|h| h.parse().ok())
        .unwrap_or_else(default_inactivity_hours);
    let inactivity_timeout = Duration::from_secs(inactivity_hours * 3600);
    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(RwLock::new(AppData::default()));

    // Background task: every 30 minutes, drop tournaments inactive for too long
    let state_cleanup = state.clone();
    actix_web::rt::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(30 * 60));
        loop {
            interval.tick().await;
            let mut g = match state_cleanup.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let stale: Vec<TournamentId> = g
                .store
                .tournament_ids()
                .into_iter()
                .filter(|id| {
                    g.last_activity
                        .get(id)
                        .map_or(true, |t| t.elapsed() >= inactivity_timeout)
                })
                .collect();
            for id in &stale {
                g.store.delete_tournament(*id);
                g.last_activity.remove(id);
            }
            if !stale.is_empty() {
                log::info!(
                    "Cleaned up {} inactive tournament(s) (no activity for {}h)",
                    stale.len(),
                    inactivity_hours
                );
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_create_tournament)
            .service(api_list_tournaments)
            .service(api_get_tournament)
            .service(api_archive_tournament)
            .service(api_unarchive_tournament)
            .service(api_delete_tournament)
            .service(api_create_participant)
            .service(api_update_participant)
            .service(api_delete_participant)
            .service(api_add_participant)
            .service(api_remove_participant)
            .service(api_import_roster)
            .service(api_shuffle_seeds)
            .service(api_start_tournament)
            .service(api_report_result)
            .service(api_report_ladder_score)
            .service(api_reorder_tie_group)
            .service(api_end_ladder_cycle)
            .service(api_standings)
            .service(api_podium)
    })
    .bind(bind)?
    .run()
    .await
}
