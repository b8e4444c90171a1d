use actix_session::storage::CookieSessionStore;
use actix_session::{Session, SessionMiddleware};
use actix_web::cookie::Key;
use actix_web::http::StatusCode;
use actix_web::{middleware, web, App, HttpResponse, HttpServer, ResponseError};
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::ServerConfig;
use crate::display::{teacher_name, SubjectPalette};
use crate::error::TimetableError;
use crate::form::{AddTeacherRequest, AssignRequest, RelocateRequest, SetupRequest, SlotRequest, SubstituteRequest};
use crate::roster::{Teacher, TeacherRegistry};
use crate::timetable::{GridConfig, Relocation, TeacherId, Timetable};

const SESSION_KEY: &str = "timetable_session";

/// Workspaces untouched for this long are dropped from the store.
pub const DEFAULT_IDLE_TIMEOUT_HOURS: i64 = 8;

/// Errors surfaced by the HTTP handlers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Timetable(#[from] TimetableError),

    #[error("timetable not set up")]
    NotSetUp,

    #[error("internal error: {0}")]
    Internal(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Timetable(err) => match err {
                TimetableError::Validation(_) | TimetableError::SameSlot { .. } => StatusCode::BAD_REQUEST,
                TimetableError::NotFound { .. } | TimetableError::OutOfBounds { .. } => StatusCode::NOT_FOUND,
                TimetableError::FixedSlot { .. }
                | TimetableError::SlotOccupied { .. }
                | TimetableError::EmptySlot { .. } => StatusCode::CONFLICT,
            },
            ApiError::NotSetUp => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        warn!(error = %self, "request rejected");
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "success": false,
            "error": self.to_string(),
        }))
    }
}

/// Where a session is: roster only, or roster plus a configured grid
enum Stage {
    Roster(TeacherRegistry),
    Ready(Timetable),
}

/// Per-session state
struct Workspace {
    stage: Stage,
    palette: SubjectPalette,
    last_seen: DateTime<Utc>,
}

impl Workspace {
    fn new(now: DateTime<Utc>) -> Self {
        Self {
            stage: Stage::Roster(TeacherRegistry::sample()),
            palette: SubjectPalette::new(),
            last_seen: now,
        }
    }

    fn registry(&self) -> &TeacherRegistry {
        match &self.stage {
            Stage::Roster(registry) => registry,
            Stage::Ready(timetable) => timetable.registry(),
        }
    }

    fn timetable(&self) -> Result<&Timetable, ApiError> {
        match &self.stage {
            Stage::Ready(timetable) => Ok(timetable),
            Stage::Roster(_) => Err(ApiError::NotSetUp),
        }
    }

    fn timetable_mut(&mut self) -> Result<&mut Timetable, ApiError> {
        match &mut self.stage {
            Stage::Ready(timetable) => Ok(timetable),
            Stage::Roster(_) => Err(ApiError::NotSetUp),
        }
    }

    /// Builds the grid, or rebuilds it keeping the roster
    fn setup(&mut self, config: &GridConfig) -> Result<(), TimetableError> {
        let timetable = match &mut self.stage {
            Stage::Ready(timetable) => return timetable.reinitialize(config),
            Stage::Roster(registry) => Timetable::new(registry.clone(), config)?,
        };
        self.stage = Stage::Ready(timetable);
        Ok(())
    }

    fn add_teacher(&mut self, name: &str, subjects: Vec<String>) -> Result<Teacher, TimetableError> {
        match &mut self.stage {
            Stage::Roster(registry) => registry.add(name, subjects).cloned(),
            Stage::Ready(timetable) => timetable.add_teacher(name, subjects).cloned(),
        }
    }

    fn remove_teacher(&mut self, id: TeacherId) -> Option<Teacher> {
        match &mut self.stage {
            Stage::Roster(registry) => registry.remove(id),
            Stage::Ready(timetable) => timetable.remove_teacher(id),
        }
    }

    fn toggle_absence(&mut self, id: TeacherId) -> Result<bool, TimetableError> {
        match &mut self.stage {
            Stage::Roster(registry) => registry.toggle_absence(id),
            Stage::Ready(timetable) => timetable.toggle_absence(id),
        }
    }

    fn view(&mut self) -> Result<TimetableView, ApiError> {
        let timetable = match &self.stage {
            Stage::Ready(timetable) => timetable,
            Stage::Roster(_) => return Err(ApiError::NotSetUp),
        };
        Ok(timetable_view(timetable, &mut self.palette))
    }
}

/// In-memory session store; one workspace per browser session.
///
/// A workspace is only created by setup and by roster changes. Idle
/// workspaces are evicted whenever the store is accessed.
pub struct AppState {
    sessions: Mutex<HashMap<String, Workspace>>,
    idle_timeout: Duration,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_idle_timeout(Duration::hours(DEFAULT_IDLE_TIMEOUT_HOURS))
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_idle_timeout(idle_timeout: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            idle_timeout,
        }
    }

    /// Number of workspaces currently held
    pub fn session_count(&self) -> usize {
        self.sessions.lock().map(|sessions| sessions.len()).unwrap_or(0)
    }

    fn lock_sessions(&self, now: DateTime<Utc>) -> Result<MutexGuard<'_, HashMap<String, Workspace>>, ApiError> {
        let mut sessions = self
            .sessions
            .lock()
            .map_err(|_| ApiError::Internal("session store poisoned".to_string()))?;
        let evicted = evict_idle(&mut sessions, now, self.idle_timeout);
        if evicted > 0 {
            debug!(evicted, remaining = sessions.len(), "idle sessions evicted");
        }
        Ok(sessions)
    }

    /// Runs `f` on the caller's workspace, creating it on first use.
    /// The lock is held for the whole call, so operations never interleave.
    fn with_workspace<T>(
        &self,
        session: &Session,
        f: impl FnOnce(&mut Workspace) -> Result<T, ApiError>,
    ) -> Result<T, ApiError> {
        let id = session_id(session)?;
        let now = Utc::now();
        let mut sessions = self.lock_sessions(now)?;
        let workspace = sessions.entry(id).or_insert_with(|| Workspace::new(now));
        workspace.last_seen = now;
        f(workspace)
    }

    /// Runs `f` on the caller's workspace if one exists. Otherwise answers
    /// with `fallback` and stores nothing.
    fn with_existing_workspace<T>(
        &self,
        session: &Session,
        f: impl FnOnce(&mut Workspace) -> Result<T, ApiError>,
        fallback: impl FnOnce() -> Result<T, ApiError>,
    ) -> Result<T, ApiError> {
        let Some(id) = existing_session_id(session)? else {
            return fallback();
        };
        let now = Utc::now();
        let mut sessions = self.lock_sessions(now)?;
        match sessions.get_mut(&id) {
            Some(workspace) => {
                workspace.last_seen = now;
                f(workspace)
            }
            None => fallback(),
        }
    }
}

/// Drops workspaces idle for at least `timeout`; returns how many went.
fn evict_idle(sessions: &mut HashMap<String, Workspace>, now: DateTime<Utc>, timeout: Duration) -> usize {
    let before = sessions.len();
    sessions.retain(|_, ws| now.signed_duration_since(ws.last_seen) < timeout);
    before - sessions.len()
}

fn existing_session_id(session: &Session) -> Result<Option<String>, ApiError> {
    session
        .get::<String>(SESSION_KEY)
        .map_err(|e| ApiError::Internal(e.to_string()))
}

fn session_id(session: &Session) -> Result<String, ApiError> {
    if let Some(id) = existing_session_id(session)? {
        return Ok(id);
    }
    let id = format!("{:032x}", rand::thread_rng().gen::<u128>());
    session
        .insert(SESSION_KEY, &id)
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(id)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellView {
    time: String,
    subject: Option<String>,
    teacher_id: Option<TeacherId>,
    teacher_name: Option<String>,
    is_fixed: bool,
    is_absent: bool,
    color: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayRow {
    day: String,
    cells: Vec<CellView>,
}

/// Grid with days as rows and time slots as columns
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableView {
    time_slots: Vec<String>,
    days: Vec<String>,
    lunch_slot: Option<String>,
    rows: Vec<DayRow>,
}

fn timetable_view(timetable: &Timetable, palette: &mut SubjectPalette) -> TimetableView {
    let grid = timetable.grid();
    let registry = timetable.registry();

    let mut rows: Vec<DayRow> = grid
        .days()
        .iter()
        .map(|day| DayRow {
            day: day.clone(),
            cells: Vec::with_capacity(grid.time_slots().len()),
        })
        .collect();

    // slots() walks time-major, which is also the column order of every row
    let day_count = rows.len();
    for (index, slot) in grid.slots().enumerate() {
        let teacher = slot.cell.teacher_id.and_then(|id| registry.get(id));
        let name = teacher_name(registry, slot.cell);
        rows[index % day_count].cells.push(CellView {
            time: slot.time.to_string(),
            subject: slot.cell.subject.clone(),
            teacher_id: slot.cell.teacher_id,
            teacher_name: (!name.is_empty()).then(|| name.to_string()),
            is_fixed: slot.fixed,
            is_absent: teacher.map_or(false, |t| t.is_absent),
            color: palette.class_for(slot.cell.subject.as_deref()),
        });
    }

    TimetableView {
        time_slots: grid.time_slots().to_vec(),
        days: grid.days().to_vec(),
        lunch_slot: grid.lunch_slot().map(str::to_string),
        rows,
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SubstitutesResponse {
    time: String,
    day: String,
    subject: Option<String>,
    substitutes: Vec<Teacher>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AbsentSlot {
    time: String,
    day: String,
    subject: Option<String>,
    teacher_id: Option<TeacherId>,
}

fn success() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({"success": true}))
}

async fn setup(
    req: web::Json<SetupRequest>,
    session: Session,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let config = req.to_config()?;
    let view = state.with_workspace(&session, |ws| {
        ws.setup(&config)?;
        ws.view()
    })?;
    Ok(HttpResponse::Ok().json(view))
}

async fn get_timetable(session: Session, state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let view = state.with_existing_workspace(&session, |ws| ws.view(), || Err(ApiError::NotSetUp))?;
    Ok(HttpResponse::Ok().json(view))
}

async fn assign(
    req: web::Json<AssignRequest>,
    session: Session,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    state.with_existing_workspace(
        &session,
        |ws| {
            ws.timetable_mut()?
                .assign(&req.time, &req.day, req.teacher_id, &req.subject)?;
            Ok(())
        },
        || Err(ApiError::NotSetUp),
    )?;
    Ok(success())
}

async fn relocate(
    req: web::Json<RelocateRequest>,
    session: Session,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let outcome: Relocation = state.with_existing_workspace(
        &session,
        |ws| {
            Ok(ws
                .timetable_mut()?
                .relocate(&req.from_time, &req.from_day, &req.to_time, &req.to_day)?)
        },
        || Err(ApiError::NotSetUp),
    )?;
    Ok(HttpResponse::Ok().json(serde_json::json!({"success": true, "outcome": outcome})))
}

async fn remove_assignment(
    req: web::Json<SlotRequest>,
    session: Session,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    state.with_existing_workspace(
        &session,
        |ws| {
            ws.timetable_mut()?.remove_assignment(&req.time, &req.day)?;
            Ok(())
        },
        || Err(ApiError::NotSetUp),
    )?;
    Ok(success())
}

async fn list_teachers(session: Session, state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let teachers: Vec<Teacher> = state.with_existing_workspace(
        &session,
        |ws| Ok(ws.registry().iter().cloned().collect()),
        || Ok(TeacherRegistry::sample().iter().cloned().collect()),
    )?;
    Ok(HttpResponse::Ok().json(teachers))
}

async fn add_teacher(
    req: web::Json<AddTeacherRequest>,
    session: Session,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let teacher = state.with_workspace(&session, |ws| Ok(ws.add_teacher(&req.name, req.subject_list())?))?;
    Ok(HttpResponse::Created().json(teacher))
}

async fn remove_teacher(
    id: web::Path<u32>,
    session: Session,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let id = TeacherId(id.into_inner());
    let removed = state.with_workspace(&session, |ws| Ok(ws.remove_teacher(id).is_some()))?;
    Ok(HttpResponse::Ok().json(serde_json::json!({"success": true, "removed": removed})))
}

async fn toggle_absence(
    id: web::Path<u32>,
    session: Session,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let id = TeacherId(id.into_inner());
    let is_absent = state.with_workspace(&session, |ws| Ok(ws.toggle_absence(id)?))?;
    Ok(HttpResponse::Ok().json(serde_json::json!({"success": true, "isAbsent": is_absent})))
}

async fn get_substitutes(
    query: web::Query<SlotRequest>,
    session: Session,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let response = state.with_existing_workspace(
        &session,
        |ws| {
            let timetable = ws.timetable()?;
            let substitutes: Vec<Teacher> = timetable
                .substitutes_for(&query.time, &query.day)?
                .into_iter()
                .cloned()
                .collect();
            Ok(SubstitutesResponse {
                time: query.time.clone(),
                day: query.day.clone(),
                subject: timetable.cell(&query.time, &query.day)?.subject.clone(),
                substitutes,
            })
        },
        || Err(ApiError::NotSetUp),
    )?;
    Ok(HttpResponse::Ok().json(response))
}

async fn apply_substitute(
    req: web::Json<SubstituteRequest>,
    session: Session,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    state.with_existing_workspace(
        &session,
        |ws| {
            ws.timetable_mut()?
                .apply_substitute(&req.time, &req.day, req.teacher_id)?;
            Ok(())
        },
        || Err(ApiError::NotSetUp),
    )?;
    Ok(success())
}

async fn absent_slots(session: Session, state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let slots: Vec<AbsentSlot> = state.with_existing_workspace(
        &session,
        |ws| {
            Ok(ws
                .timetable()?
                .absent_slots()
                .into_iter()
                .map(|slot| AbsentSlot {
                    time: slot.time.to_string(),
                    day: slot.day.to_string(),
                    subject: slot.cell.subject.clone(),
                    teacher_id: slot.cell.teacher_id,
                })
                .collect())
        },
        || Err(ApiError::NotSetUp),
    )?;
    Ok(HttpResponse::Ok().json(slots))
}

/// Registers every API route
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/setup", web::post().to(setup))
        .route("/api/timetable", web::get().to(get_timetable))
        .route("/api/assign", web::post().to(assign))
        .route("/api/relocate", web::post().to(relocate))
        .route("/api/remove", web::post().to(remove_assignment))
        .route("/api/teachers", web::get().to(list_teachers))
        .route("/api/teachers", web::post().to(add_teacher))
        .service(web::resource("/api/teachers/{id}").route(web::delete().to(remove_teacher)))
        .service(web::resource("/api/teachers/{id}/absence").route(web::post().to(toggle_absence)))
        .route("/api/substitutes", web::get().to(get_substitutes))
        .route("/api/substitute", web::post().to(apply_substitute))
        .route("/api/absent", web::get().to(absent_slots));
}

/// Cookie session middleware holding only the opaque session id
pub fn session_middleware(key: Key) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_secure(false)
        .build()
}

pub async fn start_server(config: ServerConfig) -> std::io::Result<()> {
    let app_state = web::Data::new(AppState::new());
    // sessions do not outlive the process, so a fresh key per run is enough
    let key = Key::generate();

    info!(host = %config.host, port = config.port, "starting web server");

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(session_middleware(key.clone()))
            .wrap(middleware::Logger::default())
            .configure(configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
