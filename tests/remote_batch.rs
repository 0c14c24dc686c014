//! End-to-end runs of the remote strategy against an in-process detection API.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use finsec_threat_detection::io::{read_transactions, write_results};
use finsec_threat_detection::{
    BatchAnalyzer, NoProgress, ProgressUpdate, ScorerSettings, ScoringStrategy,
};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::time::Duration;

/// Scores by amount: rows above 1000 are rejected with a 500, rows with a
/// "slow" note time out, everything else is echoed back with a verdict.
async fn detect(Json(body): Json<Value>) -> Response {
    if body["note"] == "slow" {
        tokio::time::sleep(Duration::from_secs(5)).await;
    }
    let amount = body["amount"].as_f64().unwrap_or_default();
    if amount > 1000.0 {
        return (StatusCode::INTERNAL_SERVER_ERROR, "model unavailable").into_response();
    }
    Json(json!({
        "status": "ok",
        "risk_score": amount / 100.0,
        "severity": "Low",
        "recommendation": "none",
        "model": "gbm-v3"
    }))
    .into_response()
}

async fn serve() -> SocketAddr {
    let app = Router::new().route("/detect", post(detect));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn analyzer(addr: SocketAddr) -> BatchAnalyzer {
    let strategy = ScoringStrategy::Remote {
        endpoint: format!("http://{}/detect", addr),
        credential: "supersecret".to_string(),
    };
    let settings = ScorerSettings {
        timeout: Duration::from_millis(500),
        ..ScorerSettings::default()
    };
    BatchAnalyzer::new(strategy, &settings).unwrap()
}

#[tokio::test]
async fn mixed_outcomes_keep_order_and_length() {
    let addr = serve().await;
    let csv = "id,amount,note\na,42,\nb,5000,\nc,10,slow\nd,7,\n";
    let table = read_transactions(csv.as_bytes()).unwrap();

    let mut progress = Vec::new();
    let result = analyzer(addr)
        .run(&table, &mut |u: ProgressUpdate| progress.push(u.completed))
        .await;

    assert_eq!(result.len(), 4);
    assert_eq!(progress, vec![1, 2, 3, 4]);

    let records = result.records();
    let ids: Vec<&Value> = records.iter().map(|r| r.get("id").unwrap()).collect();
    assert_eq!(ids, vec!["a", "b", "c", "d"]);

    assert_eq!(records[0].get("status"), Some(&json!("ok")));
    assert_eq!(records[0].get("risk_score"), Some(&json!(0.42)));
    assert_eq!(records[0].get("model"), Some(&json!("gbm-v3")));

    assert_eq!(records[1].get("status"), Some(&json!("API Error")));
    assert_eq!(records[1].get("risk_score"), Some(&Value::Null));
    assert_eq!(records[1].get("severity"), Some(&json!("Unknown")));
    assert_eq!(records[1].get("recommendation"), Some(&json!("Check API")));

    assert_eq!(records[2].get("status"), Some(&json!("Connection Failed")));
    assert_eq!(records[2].get("severity"), Some(&json!("Unknown")));

    assert_eq!(records[3].get("status"), Some(&json!("ok")));

    for record in records {
        assert!(!record.get("status").unwrap().is_null());
        assert!(!record.get("severity").unwrap().is_null());
    }
}

#[tokio::test]
async fn export_includes_extra_remote_columns() {
    let addr = serve().await;
    let table = read_transactions("id,amount\na,1\nb,2000\n".as_bytes()).unwrap();

    let result = analyzer(addr).run(&table, &mut NoProgress).await;

    let mut out = Vec::new();
    write_results(&mut out, &result).unwrap();
    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines[0], "id,amount,status,risk_score,severity,recommendation,model");
    assert_eq!(lines[1], "a,1,ok,0.01,Low,none,gbm-v3");
    assert_eq!(lines[2], "b,2000,API Error,,Unknown,Check API,");
}
