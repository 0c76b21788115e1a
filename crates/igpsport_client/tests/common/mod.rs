#![allow(dead_code)]

use igpsport_client::config::Config;
use igpsport_client::http_client::ReqwestIgpsportClient;
use igpsport_client::pacer::RecordingPacer;
use secrecy::SecretString;
use serde_json::{Value, json};
use std::sync::Arc;
use wiremock::MockServer;

pub const TOKEN: &str = "Bearer test-token";

pub fn client(server: &MockServer) -> (ReqwestIgpsportClient, Arc<RecordingPacer>) {
    let pacer = Arc::new(RecordingPacer::new());
    let cfg = Config::new(SecretString::new(TOKEN.into())).with_base_url(server.uri());
    let client = ReqwestIgpsportClient::new(cfg)
        .expect("client")
        .with_pacer(pacer.clone());
    (client, pacer)
}

pub fn activity_json(ride_id: i64, title: &str) -> Value {
    json!({
        "id": format!("id-{ride_id}"),
        "rideId": ride_id,
        "exerciseType": 0,
        "title": title,
        "startTime": format!("2024-03-{ride_id:02}"),
        "rideDistance": 10_000.0 * ride_id as f64,
        "totalMovingTime": 1800.0,
        "avgSpeed": 20.0,
        "dataStatus": 1,
        "errorType": 0,
        "analysisStatus": 1,
        "label": 0,
        "isOpen": 0,
        "unRead": false,
        "icon": "",
        "totalAscent": 100
    })
}

pub fn page_json(page_no: u32, page_size: u32, total_page: u32, total_rows: u32, rows: Vec<Value>) -> Value {
    json!({
        "code": 0,
        "msg": "success",
        "data": {
            "pageNo": page_no,
            "pageSize": page_size,
            "totalPage": total_page,
            "totalRows": total_rows,
            "rows": rows
        }
    })
}
