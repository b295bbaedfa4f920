use std::{
    net::SocketAddr,
    sync::{Arc, RwLock},
    thread,
};

use seismocore::prelude::DefiningType;
use serde::Deserialize;
use serde_json::json;
use tokio::runtime::Builder;
use warp::{http::StatusCode, Filter};

use crate::session::state::AnalystSession;

fn bridge_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 9600))
}

#[derive(Debug, Deserialize)]
struct DefiningRequest {
    detection_id: String,
    defining_type: DefiningType,
    defining: bool,
}

#[derive(Debug, Deserialize)]
struct DefiningAllRequest {
    defining_type: DefiningType,
    defining: bool,
}

/// Bridge that exposes the review table to an attached front end and
/// accepts its defining toggles.
pub struct SessionBridge {
    state: Arc<RwLock<AnalystSession>>,
}

impl SessionBridge {
    pub fn new(state: Arc<RwLock<AnalystSession>>) -> Self {
        let state_for_filter = state.clone();
        let state_filter = warp::any().map(move || state_for_filter.clone());

        let rows_route = warp::path("rows")
            .and(warp::get())
            .and(state_filter.clone())
            .map(|state: Arc<RwLock<AnalystSession>>| {
                warp::reply::json(&state.read().unwrap().rows())
            });

        let gate_route = warp::path("gate")
            .and(warp::get())
            .and(state_filter.clone())
            .map(|state: Arc<RwLock<AnalystSession>>| {
                warp::reply::json(&state.read().unwrap().locate_eligibility())
            });

        let defining_route = warp::path("defining")
            .and(warp::post())
            .and(warp::body::json())
            .and(state_filter.clone())
            .map(
                |request: DefiningRequest, state: Arc<RwLock<AnalystSession>>| {
                    state.write().unwrap().set_defining(
                        request.defining_type,
                        &request.detection_id,
                        request.defining,
                    );
                    warp::reply::json(&json!({"status": "ok"}))
                },
            );

        let defining_all_route = warp::path("defining-all")
            .and(warp::post())
            .and(warp::body::json())
            .and(state_filter.clone())
            .map(
                |request: DefiningAllRequest, state: Arc<RwLock<AnalystSession>>| {
                    state
                        .write()
                        .unwrap()
                        .set_all_defining(request.defining_type, request.defining);
                    warp::reply::json(&json!({"status": "ok"}))
                },
            );

        let locate_route = warp::path("locate")
            .and(warp::post())
            .and(state_filter)
            .map(|state: Arc<RwLock<AnalystSession>>| {
                match state.read().unwrap().locate_payload() {
                    Ok(payload) => warp::reply::with_status(
                        warp::reply::json(&payload),
                        StatusCode::OK,
                    ),
                    Err(err) => warp::reply::with_status(
                        warp::reply::json(&json!({
                            "status": "blocked",
                            "reason": err.to_string()
                        })),
                        StatusCode::UNPROCESSABLE_ENTITY,
                    ),
                }
            });

        thread::spawn(move || {
            let routes = rows_route
                .or(gate_route)
                .or(defining_route)
                .or(defining_all_route)
                .or(locate_route);
            let runtime = Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("failed to build runtime");
            runtime.block_on(async move {
                warp::serve(routes).run(bridge_bind_address()).await;
            });
        });

        Self { state }
    }

    pub fn publish_status(&self, message: &str) {
        println!("[BRIDGE] {}", message);
    }

    #[cfg(test)]
    pub fn row_count(&self) -> usize {
        self.state.read().unwrap().rows().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::generator::{build_scenario, ScenarioConfig};
    use crate::session::config::WorkstationConfig;

    #[test]
    fn bridge_reads_rows_through_shared_state() {
        let scenario = build_scenario(&ScenarioConfig {
            stations: 3,
            ..ScenarioConfig::default()
        })
        .unwrap();
        let mut session = AnalystSession::new(WorkstationConfig::from_args(1));
        session.open_event(scenario.event);
        session.ingest_detections(scenario.detections);

        let state = Arc::new(RwLock::new(session));
        let bridge = SessionBridge::new(state.clone());

        assert_eq!(bridge.row_count(), 3);
        state
            .write()
            .unwrap()
            .set_defining(DefiningType::Slowness, "sd-1", true);
        assert_eq!(bridge.row_count(), 3);
        bridge.publish_status("bridge state verified");
    }
}
