mod assets;
mod session;

use std::{convert::Infallible, net::SocketAddr, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{
        sse::{Event, KeepAlive, Sse},
        Html, IntoResponse, Response,
    },
    routing::{get, post},
    Json, Router,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio_stream::{wrappers::BroadcastStream, Stream, StreamExt};
use tracing::{debug, info};

use crate::{
    chat::{ChatMessage, ChatSession, Submission},
    palette::{legend, ElevationScale, LegendEntry},
    region::{RegionId, RegionRegistry},
    scene::{SceneComposer, SceneDescription, SceneSettings},
    season::SeasonType,
    state::{Action, PanelView, VizState},
};

pub use session::{InvalidSessionId, Session, SessionId, SessionStore};

/// Sessions untouched for this long are dropped.
pub const DEFAULT_SESSION_IDLE: Duration = Duration::from_secs(30 * 60);

#[derive(Clone, Serialize)]
pub struct SeasonOption {
    pub value: SeasonType,
    pub label: &'static str,
}

#[derive(Clone, Serialize)]
pub struct StateEnvelope {
    pub season: SeasonType,
    pub season_options: Vec<SeasonOption>,
    pub selection: Option<RegionId>,
    pub legend: Vec<LegendEntry>,
    pub view: PanelView,
}

#[derive(Clone, Serialize)]
pub struct ChatEnvelope {
    pub messages: Vec<ChatMessage>,
    pub typing: bool,
}

#[derive(Deserialize)]
struct SeasonRequest {
    season: SeasonType,
}

#[derive(Deserialize)]
struct SelectionRequest {
    #[serde(default)]
    region_id: Option<RegionId>,
}

#[derive(Deserialize)]
struct ChatRequest {
    text: String,
}

#[derive(Deserialize)]
struct SessionQuery {
    session: String,
}

/// Everything the handlers share. The registry and scene composer are
/// global; season, selection and chat belong to a [`Session`].
pub struct AppState {
    registry: RegionRegistry,
    composer: SceneComposer,
    sessions: SessionStore,
}

impl AppState {
    pub fn new(registry: RegionRegistry, scene: SceneSettings, typing_delay: Duration) -> Self {
        Self {
            registry,
            composer: SceneComposer::standard(scene),
            sessions: SessionStore::new(typing_delay, DEFAULT_SESSION_IDLE),
        }
    }

    pub fn with_session_idle(mut self, idle: Duration) -> Self {
        self.sessions = SessionStore::new(self.sessions.typing_delay(), idle);
        self
    }

    pub fn registry(&self) -> &RegionRegistry {
        &self.registry
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Opens the session, creating it in the default state on first use.
    pub fn session(&self, id: &SessionId) -> SessionView<'_> {
        SessionView {
            app: self,
            session: self.sessions.get_or_create(id),
        }
    }

    fn elevation(&self) -> &ElevationScale {
        &self.composer.settings().elevation
    }

    fn envelope_for(&self, viz: &VizState) -> StateEnvelope {
        StateEnvelope {
            season: viz.season,
            season_options: SeasonType::ALL
                .iter()
                .map(|season| SeasonOption {
                    value: *season,
                    label: season.label(),
                })
                .collect(),
            selection: viz.selection,
            legend: legend(),
            view: viz.view(&self.registry, self.elevation()),
        }
    }
}

/// One visitor's session, read and updated against the shared registry.
pub struct SessionView<'a> {
    app: &'a AppState,
    session: Arc<Session>,
}

impl SessionView<'_> {
    pub fn viz(&self) -> VizState {
        self.session.viz()
    }

    pub fn chat(&self) -> &ChatSession {
        self.session.chat()
    }

    /// Runs the reducer and announces the new state when it changed.
    pub fn apply(&self, action: Action) -> StateEnvelope {
        let (next, changed) = self.session.reduce(action, &self.app.registry);
        let envelope = self.app.envelope_for(&next);
        if changed {
            if let Ok(payload) = serde_json::to_string(&envelope) {
                self.session.announce(payload);
            }
        }
        envelope
    }

    pub fn envelope(&self) -> StateEnvelope {
        self.app.envelope_for(&self.viz())
    }

    pub fn scene(&self) -> SceneDescription {
        self.app.composer.compose(&self.viz(), &self.app.registry)
    }

    pub fn chat_envelope(&self) -> ChatEnvelope {
        let chat = self.chat();
        ChatEnvelope {
            messages: chat.messages(),
            typing: chat.pending() > 0,
        }
    }
}

pub struct WebServerConfig {
    pub registry: RegionRegistry,
    pub scene: SceneSettings,
    pub typing_delay: Duration,
    pub session_idle: Duration,
    pub host: String,
    pub port: u16,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/styles.css", get(styles))
        .route("/app.js", get(script))
        .route("/icons/:name", get(icon))
        .route("/api/regions", get(regions))
        .route("/api/state", get(latest_state))
        .route("/api/season", post(select_season))
        .route(
            "/api/selection",
            post(select_region).delete(clear_selection),
        )
        .route("/api/scene", get(scene))
        .route(
            "/api/chat",
            get(transcript).post(submit_chat).delete(reset_chat),
        )
        .route("/api/events", get(stream_events))
        .with_state(state)
}

pub async fn run(config: WebServerConfig) -> Result<()> {
    let WebServerConfig {
        registry,
        scene,
        typing_delay,
        session_idle,
        host,
        port,
    } = config;

    let regions = registry.len();
    let state = Arc::new(
        AppState::new(registry, scene, typing_delay).with_session_idle(session_idle),
    );
    let app = router(state);

    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .with_context(|| format!("invalid listen address {host}:{port}"))?;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, regions, "yield gap map live at http://{addr} (Ctrl+C to stop)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutting down web UI");
}

/// Every session-scoped route carries `?session=<id>`.
fn open(state: &AppState, query: SessionQuery) -> Result<SessionView<'_>, StatusCode> {
    match query.session.parse::<SessionId>() {
        Ok(id) => Ok(state.session(&id)),
        Err(err) => {
            debug!(%err, "rejecting request");
            Err(StatusCode::BAD_REQUEST)
        }
    }
}

async fn index() -> Html<&'static str> {
    Html(assets::INDEX_HTML)
}

async fn styles() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        assets::STYLES_CSS,
    )
}

async fn script() -> impl IntoResponse {
    (
        [(
            header::CONTENT_TYPE,
            "application/javascript; charset=utf-8",
        )],
        assets::APP_JS,
    )
}

async fn icon(Path(name): Path<String>) -> Response {
    match assets::icon(&name) {
        Some(bytes) => (
            [(header::CONTENT_TYPE, "image/svg+xml")],
            Bytes::from_static(bytes),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn regions(State(state): State<Arc<AppState>>) -> Json<RegionRegistry> {
    Json(state.registry.clone())
}

async fn latest_state(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SessionQuery>,
) -> Result<Json<StateEnvelope>, StatusCode> {
    Ok(Json(open(&state, query)?.envelope()))
}

async fn select_season(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SessionQuery>,
    Json(request): Json<SeasonRequest>,
) -> Result<Json<StateEnvelope>, StatusCode> {
    let session = open(&state, query)?;
    Ok(Json(session.apply(Action::SelectSeason(request.season))))
}

async fn select_region(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SessionQuery>,
    Json(request): Json<SelectionRequest>,
) -> Result<Json<StateEnvelope>, StatusCode> {
    let session = open(&state, query)?;
    Ok(Json(session.apply(Action::SelectRegion(request.region_id))))
}

async fn clear_selection(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SessionQuery>,
) -> Result<Json<StateEnvelope>, StatusCode> {
    Ok(Json(open(&state, query)?.apply(Action::ClearSelection)))
}

async fn scene(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SessionQuery>,
) -> Result<Json<SceneDescription>, StatusCode> {
    Ok(Json(open(&state, query)?.scene()))
}

async fn transcript(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SessionQuery>,
) -> Result<Json<ChatEnvelope>, StatusCode> {
    Ok(Json(open(&state, query)?.chat_envelope()))
}

async fn submit_chat(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SessionQuery>,
    Json(request): Json<ChatRequest>,
) -> Result<Response, StatusCode> {
    let session = open(&state, query)?;
    let response = match session.chat().submit(&request.text) {
        Submission::Ignored => {
            debug!("blank chat message ignored");
            StatusCode::NO_CONTENT.into_response()
        }
        Submission::Accepted(message) => (StatusCode::ACCEPTED, Json(message)).into_response(),
    };
    Ok(response)
}

async fn reset_chat(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SessionQuery>,
) -> Result<StatusCode, StatusCode> {
    open(&state, query)?.chat().reset();
    Ok(StatusCode::NO_CONTENT)
}

async fn stream_events(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SessionQuery>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, StatusCode> {
    let session = open(&state, query)?.session;
    let states = BroadcastStream::new(session.subscribe_updates()).filter_map(|msg| match msg {
        Ok(payload) => Some(Ok::<_, Infallible>(Event::default().event("state").data(payload))),
        Err(_) => None,
    });
    let chats = BroadcastStream::new(session.chat().subscribe()).filter_map(|msg| {
        let message = msg.ok()?;
        let payload = serde_json::to_string(&message).ok()?;
        Some(Ok::<_, Infallible>(Event::default().event("chat").data(payload)))
    });
    Ok(Sse::new(states.merge(chats)).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(2))
            .text("keep-alive"),
    ))
}
