use backend::{
    routes::{
        adjust_count, all_options, current_identity, delete_vote, fetch_vote, insert_vote, list_subjects,
        subject_count, subject_summary, update_vote, AppState,
    },
    catchers::{bad_request, conflict, forbidden, internal_error, not_found, too_many_requests, unauthorized, unprocessable},
    config::Settings,
    cors::CORS,
    queries::Queries,
};
use rocket::{routes, catchers};
use shuttle_runtime::CustomError;
use sqlx::PgPool;
use tokio::time::{interval, Duration};
use tracing::{info, error};

async fn run_session_sweep(pool: PgPool, every: Duration) {
    let mut interval = interval(every);
    info!("🧹 Session sweep started");

    loop {
        interval.tick().await;
        match Queries::purge_expired_sessions(&pool).await {
            Ok(0) => {}
            Ok(count) => info!("🗑️ Removed {} expired sessions", count),
            Err(e) => error!("Session sweep failed: {}", e),
        }
    }
}

#[shuttle_runtime::main]
async fn rocket(
    #[shuttle_shared_db::Postgres] pool: PgPool,
    #[shuttle_runtime::Secrets] secret_store: shuttle_runtime::SecretStore,
) -> shuttle_rocket::ShuttleRocket {
    info!("🚀 Starting Startupia vote service");

    let settings = Settings::from_secrets(&secret_store);

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(CustomError::new)?;

    info!("📋 Migrations complete");

    tokio::spawn(run_session_sweep(pool.clone(), Duration::from_secs(settings.session_sweep_seconds)));

    let cors = CORS::new(settings.allowed_origin.clone());
    let app_state = AppState::new(pool, settings);

    let rocket = rocket::build()
        .attach(cors)
        .manage(app_state)
        .mount(
            "/api",
            routes![
                current_identity,
                list_subjects,
                subject_count,
                subject_summary,
                fetch_vote,
                insert_vote,
                update_vote,
                delete_vote,
                adjust_count,
                all_options
            ],
        )
        .register(
            "/",
            catchers![
                unauthorized,
                forbidden,
                conflict,
                unprocessable,
                too_many_requests,
                bad_request,
                internal_error,
                not_found
            ],
        );

    Ok(rocket.into())
}
