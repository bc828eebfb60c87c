use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use crate::handlers::{protected, public};
use crate::middleware::jwt_auth_middleware;
use crate::state::AppState;

/// Build the full router: public endpoints, `/api/v1` behind the JWT layer,
/// then CORS and request tracing.
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.security.cors_origins);

    Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .route("/api/v1/auth/login", post(public::auth::login))
        // Protected API
        .nest("/api/v1", api_routes(state.clone()))
        // Global middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(member_routes())
        .merge(business_routes())
        .merge(restaurant_routes())
        .merge(masjid_routes())
        .merge(education_routes())
        .merge(user_routes())
        .merge(analytics_routes())
        .route_layer(middleware::from_fn_with_state(state, jwt_auth_middleware))
}

fn member_routes() -> Router<AppState> {
    use protected::{life_events, members};

    Router::new()
        .route("/members", get(members::list).post(members::create))
        .route("/members/:id", get(members::get).put(members::update).delete(members::delete))
        .route("/life-events", get(life_events::list).post(life_events::create))
        .route(
            "/life-events/:id",
            get(life_events::get).put(life_events::update).delete(life_events::delete),
        )
}

fn business_routes() -> Router<AppState> {
    use protected::businesses;

    Router::new()
        .route("/businesses", get(businesses::list).post(businesses::create))
        .route("/businesses/categories/list", get(businesses::categories))
        .route(
            "/businesses/:id",
            get(businesses::get).put(businesses::update).delete(businesses::delete),
        )
}

fn restaurant_routes() -> Router<AppState> {
    use protected::restaurants;

    Router::new()
        .route("/restaurants", get(restaurants::list).post(restaurants::create))
        .route(
            "/restaurants/:id",
            get(restaurants::get).put(restaurants::update).delete(restaurants::delete),
        )
        .route("/restaurants/:id/menu", post(restaurants::add_menu))
        .route("/restaurants/:id/menu/:menu_id", delete(restaurants::delete_menu))
}

fn masjid_routes() -> Router<AppState> {
    use protected::masjids;

    Router::new()
        .route("/masjids", get(masjids::list).post(masjids::create))
        .route("/masjids/:id", get(masjids::get).put(masjids::update).delete(masjids::delete))
        .route("/masjids/:id/members", get(masjids::members))
}

fn education_routes() -> Router<AppState> {
    use protected::educations;

    Router::new()
        .route("/educations", get(educations::list).post(educations::create))
        .route(
            "/educations/:id",
            get(educations::get).put(educations::update).delete(educations::delete),
        )
        .route("/educations/member/:member_id", get(educations::for_member))
}

fn user_routes() -> Router<AppState> {
    use protected::users;

    Router::new()
        .route("/users", get(users::list).post(users::create))
        .route("/users/me", get(users::me))
}

fn analytics_routes() -> Router<AppState> {
    use protected::analytics;

    Router::new()
        .route("/analytics/dashboard", get(analytics::dashboard))
        .route("/analytics/members/statistics", get(analytics::member_statistics))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            // AllowOrigin::list panics on a wildcard
            Ok(value) if origin != "*" => Some(value),
            _ => {
                warn!("Ignoring invalid CORS origin {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    use crate::config::AppConfig;
    use crate::database::DatabaseManager;

    fn test_app() -> Router {
        let config = AppConfig::development();
        let pool = DatabaseManager::connect_lazy(&config).unwrap();
        app(AppState::new(pool, config))
    }

    async fn status_of(request: Request<Body>) -> StatusCode {
        test_app().oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn root_is_public() {
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        assert_eq!(status_of(request).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn protected_routes_require_token() {
        for uri in ["/api/v1/members", "/api/v1/restaurants", "/api/v1/analytics/dashboard", "/api/v1/users/me"] {
            let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
            assert_eq!(status_of(request).await, StatusCode::UNAUTHORIZED, "{}", uri);
        }
    }

    #[tokio::test]
    async fn malformed_token_is_rejected() {
        let request = Request::builder()
            .uri("/api/v1/businesses/categories/list")
            .header("authorization", "Bearer not.a.jwt")
            .body(Body::empty())
            .unwrap();
        assert_eq!(status_of(request).await, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn wildcard_cors_origin_does_not_break_router() {
        let mut config = AppConfig::development();
        config.security.cors_origins = vec!["*".to_string(), "http://localhost:5173".to_string()];
        let pool = DatabaseManager::connect_lazy(&config).unwrap();
        let router = app(AppState::new(pool, config));

        let request = Request::builder()
            .uri("/")
            .header("origin", "http://localhost:5173")
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("access-control-allow-origin").and_then(|v| v.to_str().ok()),
            Some("http://localhost:5173")
        );
    }

    #[tokio::test]
    async fn unknown_routes_are_not_found() {
        let request = Request::builder().uri("/api/v1/unknown").body(Body::empty()).unwrap();
        assert_eq!(status_of(request).await, StatusCode::NOT_FOUND);
    }
}
