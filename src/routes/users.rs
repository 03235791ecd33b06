use super::{store_error_response, user_not_found, validation_error, AppState};
use crate::core::PreferenceStore;
use crate::models::{ErrorResponse, RegisterUserRequest, UpdatePreferencesRequest, UserId, UserResponse};
use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

/// Configure user and preference routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/users", web::post().to(register_user))
        .route("/users", web::get().to(list_users))
        .route("/users/{id}", web::get().to(get_user))
        .route("/users/{id}", web::delete().to(delete_user))
        .route("/users/{id}/preferences", web::get().to(get_preferences))
        .route("/users/{id}/preferences", web::put().to(update_preferences))
        .route("/users/{id}/preferences", web::delete().to(delete_preferences));
}

/// Register a user
///
/// POST /api/v1/users
async fn register_user(state: web::Data<AppState>, req: web::Json<RegisterUserRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for register request: {}", errors);
        return validation_error(errors);
    }

    match state.store.create_user(req.into_inner().into()) {
        Ok(profile) => {
            tracing::info!("Registered user {} ({})", profile.id, profile.username);
            HttpResponse::Created().json(UserResponse::new(profile, None))
        }
        Err(e) => store_error_response(&e),
    }
}

/// GET /api/v1/users
async fn list_users(state: web::Data<AppState>) -> impl Responder {
    let users: Vec<UserResponse> = state
        .store
        .list_users()
        .into_iter()
        .map(|profile| {
            let prefs = state.store.get(profile.id);
            UserResponse::new(profile, prefs)
        })
        .collect();

    HttpResponse::Ok().json(users)
}

/// GET /api/v1/users/{id}
async fn get_user(state: web::Data<AppState>, path: web::Path<UserId>) -> impl Responder {
    let user_id = path.into_inner();

    match state.store.get_user(user_id) {
        Some(profile) => HttpResponse::Ok().json(UserResponse::new(profile, state.store.get(user_id))),
        None => user_not_found(user_id),
    }
}

/// Delete a user along with their preferences and matches
///
/// DELETE /api/v1/users/{id}
async fn delete_user(state: web::Data<AppState>, path: web::Path<UserId>) -> impl Responder {
    let user_id = path.into_inner();

    match state.store.delete_user(user_id) {
        Ok(()) => {
            tracing::info!("Deleted user {}", user_id);
            HttpResponse::NoContent().finish()
        }
        Err(e) => store_error_response(&e),
    }
}

/// GET /api/v1/users/{id}/preferences
async fn get_preferences(state: web::Data<AppState>, path: web::Path<UserId>) -> impl Responder {
    let user_id = path.into_inner();

    if state.store.get_user(user_id).is_none() {
        return user_not_found(user_id);
    }

    match state.store.get(user_id) {
        Some(prefs) => HttpResponse::Ok().json(prefs),
        None => HttpResponse::NotFound().json(ErrorResponse::new(
            "missing_preferences",
            format!("User {} has not set lifestyle preferences", user_id),
            404,
        )),
    }
}

/// Create or update lifestyle preferences
///
/// PUT /api/v1/users/{id}/preferences
///
/// Request body (all fields optional, each 1-5):
/// ```json
/// {
///   "smoking": 1,
///   "smoking_preference": 1,
///   "drinking": 2,
///   "drinking_preference": 2,
///   "exercise": 4,
///   "exercise_preference": 3,
///   "work_life_balance": 3,
///   "work_life_balance_preference": 4
/// }
/// ```
async fn update_preferences(
    state: web::Data<AppState>,
    path: web::Path<UserId>,
    req: web::Json<UpdatePreferencesRequest>,
) -> impl Responder {
    let user_id = path.into_inner();

    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for preferences of {}: {}", user_id, errors);
        return validation_error(errors);
    }

    let current = state.store.get(user_id);
    let created = current.is_none();
    let prefs = req.apply_to(current, &state.defaults);

    match state.store.upsert_preferences(user_id, prefs) {
        Ok(saved) => {
            tracing::debug!("Saved preferences for {}: {:?}", user_id, saved);
            if created {
                HttpResponse::Created().json(saved)
            } else {
                HttpResponse::Ok().json(saved)
            }
        }
        Err(e) => store_error_response(&e),
    }
}

/// DELETE /api/v1/users/{id}/preferences
async fn delete_preferences(state: web::Data<AppState>, path: web::Path<UserId>) -> impl Responder {
    let user_id = path.into_inner();

    match state.store.delete_preferences(user_id) {
        Ok(true) => HttpResponse::NoContent().finish(),
        Ok(false) => HttpResponse::NotFound().json(ErrorResponse::new(
            "missing_preferences",
            format!("User {} has not set lifestyle preferences", user_id),
            404,
        )),
        Err(e) => store_error_response(&e),
    }
}
