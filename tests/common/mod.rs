#![allow(dead_code)]

use std::net::TcpListener;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration as StdDuration;

use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde::Deserialize;
use serde_json::{Value, json};

use hrm_portal::api::ApiClient;
use hrm_portal::attendance::AttendanceTracker;
use hrm_portal::auth::session::Session;
use hrm_portal::auth::token_store::MemoryTokenStore;
use hrm_portal::config::Config;
use hrm_portal::model::attendance::{PunchEvent, PunchType};
use hrm_portal::utils::time::{Clock, ManualClock};

/// In-process stand-in for the portal backend.
pub struct MockBackend {
    pub clock: Arc<ManualClock>,
    pub punches: Mutex<Vec<PunchEvent>>,
    /// Raw JSON served as today's record instead of `punches`.
    pub today_override: Mutex<Option<Value>>,
    /// Records for other days, served as-is.
    pub other_days: Mutex<Vec<Value>>,
    pub reject_punch: Mutex<Option<String>>,
    pub expired: AtomicBool,
    pub count_fails: AtomicBool,
    pub leaves: Mutex<Vec<Value>>,
    pub payments: Mutex<Vec<Value>>,
    pub punch_calls: AtomicUsize,
    pub manual_calls: AtomicUsize,
    pub logout_calls: AtomicUsize,
}

impl MockBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            clock: Arc::new(ManualClock::new(nine_am())),
            punches: Mutex::new(Vec::new()),
            today_override: Mutex::new(None),
            other_days: Mutex::new(Vec::new()),
            reject_punch: Mutex::new(None),
            expired: AtomicBool::new(false),
            count_fails: AtomicBool::new(false),
            leaves: Mutex::new(Vec::new()),
            payments: Mutex::new(Vec::new()),
            punch_calls: AtomicUsize::new(0),
            manual_calls: AtomicUsize::new(0),
            logout_calls: AtomicUsize::new(0),
        })
    }

    fn today_record(&self) -> Option<Value> {
        if let Some(raw) = self.today_override.lock().unwrap().clone() {
            return Some(raw);
        }
        let punches = self.punches.lock().unwrap();
        if punches.is_empty() {
            return None;
        }
        Some(json!({
            "_id": "today",
            "date": self.clock.today().to_string(),
            "punches": punches.clone(),
            "status": "partial",
        }))
    }
}

pub fn nine_am() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 16, 9, 0, 0).unwrap()
}

pub fn token(role: &str) -> String {
    let claims = json!({
        "id": format!("{role}-1"),
        "role": role,
        "name": "Test User",
        "exp": Utc::now().timestamp() + 3600,
    });
    encode(&Header::default(), &claims, &EncodingKey::from_secret(b"backend-only")).unwrap()
}

fn authorized(state: &MockBackend, req: &HttpRequest) -> bool {
    let bearer = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "));
    bearer.is_some() && !state.expired.load(Ordering::SeqCst)
}

fn unauthorized() -> HttpResponse {
    HttpResponse::Unauthorized().json(json!({"message": "Token expired"}))
}

#[derive(Deserialize)]
struct MonthYear {
    month: u32,
    year: i32,
}

async fn my_attendance(
    state: web::Data<MockBackend>,
    req: HttpRequest,
    query: web::Query<MonthYear>,
) -> HttpResponse {
    if !authorized(&state, &req) {
        return unauthorized();
    }
    let today = state.clock.today();
    if query.month != chrono::Datelike::month(&today) || query.year != chrono::Datelike::year(&today) {
        return HttpResponse::Ok().json(Vec::<Value>::new());
    }

    let mut records = state.other_days.lock().unwrap().clone();
    records.extend(state.today_record());
    HttpResponse::Ok().json(records)
}

async fn punch(state: &MockBackend, req: &HttpRequest, kind: PunchType) -> HttpResponse {
    if !authorized(state, req) {
        return unauthorized();
    }
    state.punch_calls.fetch_add(1, Ordering::SeqCst);

    if let Some(message) = state.reject_punch.lock().unwrap().clone() {
        return HttpResponse::BadRequest().json(json!({ "message": message }));
    }

    {
        let mut punches = state.punches.lock().unwrap();
        let last = punches.last().map(|p| p.kind);
        match (kind, last) {
            (PunchType::In, Some(PunchType::In)) => {
                return HttpResponse::BadRequest().json(json!({"message": "Already punched in"}));
            }
            (PunchType::Out, None | Some(PunchType::Out)) => {
                return HttpResponse::BadRequest()
                    .json(json!({"message": "Cannot punch out without punch in"}));
            }
            _ => {}
        }
        punches.push(PunchEvent { kind, time: state.clock.now() });
    }

    HttpResponse::Ok().json(state.today_record())
}

async fn punch_in(state: web::Data<MockBackend>, req: HttpRequest) -> HttpResponse {
    punch(&state, &req, PunchType::In).await
}

async fn punch_out(state: web::Data<MockBackend>, req: HttpRequest) -> HttpResponse {
    punch(&state, &req, PunchType::Out).await
}

async fn manual(state: web::Data<MockBackend>, req: HttpRequest, body: web::Json<Value>) -> HttpResponse {
    if !authorized(&state, &req) {
        return unauthorized();
    }
    state.manual_calls.fetch_add(1, Ordering::SeqCst);

    let date = body["date"].as_str().unwrap_or_default().to_string();
    if date >= state.clock.today().to_string() {
        return HttpResponse::BadRequest()
            .json(json!({"message": "Manual punch only allowed for previous days"}));
    }
    HttpResponse::Ok().json(json!({
        "_id": "manual",
        "date": date,
        "punches": body["punches"],
        "status": "present",
    }))
}

async fn user_count(state: web::Data<MockBackend>, req: HttpRequest) -> HttpResponse {
    if !authorized(&state, &req) {
        return unauthorized();
    }
    if state.count_fails.load(Ordering::SeqCst) {
        return HttpResponse::InternalServerError().finish();
    }
    HttpResponse::Ok().json(json!({"count": 42}))
}

async fn leaves(state: web::Data<MockBackend>, req: HttpRequest) -> HttpResponse {
    if !authorized(&state, &req) {
        return unauthorized();
    }
    HttpResponse::Ok().json(state.leaves.lock().unwrap().clone())
}

async fn all_payments(state: web::Data<MockBackend>, req: HttpRequest) -> HttpResponse {
    if !authorized(&state, &req) {
        return unauthorized();
    }
    HttpResponse::Ok().json(state.payments.lock().unwrap().clone())
}

#[derive(Deserialize)]
struct Login {
    email: String,
    password: String,
}

async fn login(body: web::Json<Login>) -> HttpResponse {
    if body.password != "secret" {
        return HttpResponse::Unauthorized().json(json!({"message": "Invalid credentials"}));
    }
    let role = if body.email.starts_with("admin") { "admin" } else { "employee" };
    HttpResponse::Ok().json(json!({ "token": token(role) }))
}

async fn logout(state: web::Data<MockBackend>) -> HttpResponse {
    state.logout_calls.fetch_add(1, Ordering::SeqCst);
    HttpResponse::NoContent().finish()
}

/// Starts the mock on an ephemeral port and returns its `/api` base URL.
pub fn spawn(state: Arc<MockBackend>) -> String {
    let data = web::Data::from(state);
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let server = HttpServer::new(move || {
        App::new().app_data(data.clone()).service(
            web::scope("/api")
                .route("/auth/login", web::post().to(login))
                .route("/auth/logout", web::post().to(logout))
                .route("/attendance/my-attendance", web::get().to(my_attendance))
                .route("/attendance/punch-in", web::post().to(punch_in))
                .route("/attendance/punch-out", web::post().to(punch_out))
                .route("/attendance/manual", web::post().to(manual))
                .route("/users/count", web::get().to(user_count))
                .route("/leaves", web::get().to(leaves))
                .route("/payment-Request/all", web::get().to(all_payments)),
        )
    })
    .workers(1)
    .disable_signals()
    .listen(listener)
    .unwrap()
    .run();

    actix_web::rt::spawn(server);
    format!("http://{addr}/api")
}

pub fn config(base_url: &str) -> Config {
    let base_url = base_url.to_string();
    Config::from_lookup(move |key| match key {
        "API_BASE_URL" => Some(base_url.clone()),
        "REQUEST_TIMEOUT_SECS" => Some("5".to_string()),
        _ => None,
    })
    .unwrap()
}

pub fn client_with_token(base_url: &str, token: Option<String>) -> ApiClient {
    let store = match token {
        Some(t) => MemoryTokenStore::with_token(t),
        None => MemoryTokenStore::default(),
    };
    let session = Session::load(Box::new(store)).unwrap();
    ApiClient::new(&config(base_url), Arc::new(session)).unwrap()
}

pub fn tracker(client: &ApiClient, backend: &MockBackend) -> AttendanceTracker {
    AttendanceTracker::new(client.clone(), backend.clock.clone(), StdDuration::from_secs(1))
}
