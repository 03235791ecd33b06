use super::{matching_error_response, store_error_response, user_not_found, AppState};
use crate::core::PreferenceStore;
use crate::models::{
    CreateMatchRequest, HealthResponse, MatchResponse, PotentialMatch, UserId, UserResponse,
};
use actix_web::{web, HttpResponse, Responder};

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/users/{id}/potential-matches", web::get().to(potential_matches))
        .route("/users/{id}/matches", web::get().to(list_matches))
        .route("/matches", web::post().to(create_match));
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

fn user_response(state: &AppState, user_id: UserId) -> Option<UserResponse> {
    state
        .store
        .get_user(user_id)
        .map(|profile| UserResponse::new(profile, state.store.get(user_id)))
}

/// Ranked potential matches for a user
///
/// GET /api/v1/users/{id}/potential-matches
///
/// Every other user with preferences is scored in both directions; those
/// whose mean score clears the threshold are returned, best first.
async fn potential_matches(state: web::Data<AppState>, path: web::Path<UserId>) -> impl Responder {
    let user_id = path.into_inner();

    if state.store.get_user(user_id).is_none() {
        return user_not_found(user_id);
    }

    tracing::info!("Finding potential matches for user: {}", user_id);

    let outcome = match state.ranker.rank_for_user(&*state.store, user_id) {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::info!("Cannot rank matches for {}: {}", user_id, e);
            return matching_error_response(&e);
        }
    };

    let matches: Vec<PotentialMatch> = outcome
        .candidates
        .into_iter()
        .filter_map(|scored| {
            // a candidate deleted since the snapshot is dropped
            user_response(&state, scored.user_id).map(|user| PotentialMatch {
                user,
                compatibility_score: scored.compatibility_score,
            })
        })
        .collect();

    tracing::info!(
        "Returning {} potential matches for user {} (from {} candidates, {} without preferences)",
        matches.len(),
        user_id,
        outcome.total_candidates,
        outcome.skipped_without_preferences
    );

    HttpResponse::Ok().json(matches)
}

/// Record a match between two users
///
/// POST /api/v1/matches
///
/// Request body:
/// ```json
/// { "user1": 1, "user2": 2 }
/// ```
///
/// The stored score is the mutual compatibility at creation time, or 0.0
/// when either user has no preferences yet.
async fn create_match(state: web::Data<AppState>, req: web::Json<CreateMatchRequest>) -> impl Responder {
    let CreateMatchRequest { user1, user2 } = req.into_inner();

    let score = match (state.store.get(user1), state.store.get(user2)) {
        (Some(a), Some(b)) => match state.ranker.combined_score(&a, &b) {
            Ok(score) => score,
            Err(e) => return matching_error_response(&e),
        },
        _ => 0.0,
    };

    let created = match state.store.create_match(user1, user2, score) {
        Ok(m) => m,
        Err(e) => {
            tracing::info!("Rejected match {} <-> {}: {}", user1, user2, e);
            return store_error_response(&e);
        }
    };

    tracing::info!("Created match {} <-> {} (score {:.1})", user1, user2, score);

    match (user_response(&state, user1), user_response(&state, user2)) {
        (Some(a), Some(b)) => HttpResponse::Created().json(MatchResponse::new(&created, a, b)),
        (None, _) => user_not_found(user1),
        (_, None) => user_not_found(user2),
    }
}

/// Matches a user takes part in
///
/// GET /api/v1/users/{id}/matches
async fn list_matches(state: web::Data<AppState>, path: web::Path<UserId>) -> impl Responder {
    let user_id = path.into_inner();

    if state.store.get_user(user_id).is_none() {
        return user_not_found(user_id);
    }

    let matches: Vec<MatchResponse> = state
        .store
        .matches_for(user_id)
        .iter()
        .filter_map(|m| {
            let a = user_response(&state, m.user1)?;
            let b = user_response(&state, m.user2)?;
            Some(MatchResponse::new(m, a, b))
        })
        .collect();

    HttpResponse::Ok().json(matches)
}
