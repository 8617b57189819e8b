// Integration tests: HTTP endpoints

mod common;

use axum_test::TestServer;
use common::{flight_json, test_engine};
use fleetwatch::routes;
use serde_json::{Value, json};

fn test_server() -> TestServer {
    let t = test_engine(10);
    TestServer::new(routes::app(t.engine, t.queries))
}

async fn post_flight(server: &TestServer, body: &Value) -> Value {
    let response = server.post("/flight-update").json(body).await;
    response.assert_status_ok();
    response.json()
}

#[tokio::test]
async fn test_health_endpoint() {
    let server = test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["service"], "fleetwatch");
    assert_eq!(json["service"], fleetwatch::version::NAME);
}

#[tokio::test]
async fn test_version_endpoint() {
    let server = test_server();
    let response = server.get("/version").await;
    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json.get("name").and_then(|v| v.as_str()), Some("fleetwatch"));
    assert_eq!(json["version"], fleetwatch::version::VERSION);
}

#[tokio::test]
async fn test_dashboard_served() {
    let server = test_server();
    let response = server.get("/").await;
    response.assert_status_ok();
    assert!(response.text().contains("/api/v1/alerts/active"));
}

#[tokio::test]
async fn test_flight_update_acknowledges() {
    let server = test_server();
    let json = post_flight(&server, &flight_json("abc123", "DL100", "1200", 1.0, 1.0)).await;
    assert_eq!(json, json!({ "status": "success" }));
}

#[tokio::test]
async fn test_malformed_update_is_acknowledged_with_error_status() {
    let server = test_server();
    let response = server.post("/flight-update").text("{not json").await;
    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["status"], "error");
    assert!(json["message"].as_str().is_some());

    let json = post_flight(&server, &json!({})).await;
    assert_eq!(json["status"], "error");
    assert_eq!(json["message"], "no flight data found");
}

#[tokio::test]
async fn test_fleet_stats_end_to_end() {
    let server = test_server();
    post_flight(&server, &flight_json("aa0001", "DL100", "1200", 10_000.0, 250.0)).await;
    post_flight(&server, &flight_json("aa0002", "DL101", "1200", 11_000.0, 260.0)).await;
    post_flight(&server, &flight_json("aa0003", "UA200", "1200", 9_000.0, 240.0)).await;

    let summary: Value = server.get("/api/v1/fleet/stats/summary").await.json();
    assert_eq!(summary["total_active_flights"], 3);
    assert_eq!(summary["by_airline"]["Delta"]["count"], 2);
    assert_eq!(summary["by_airline"]["Delta"]["avg_altitude"], 10_500.0);
    assert_eq!(summary["by_airline"]["Delta"]["avg_velocity"], 255.0);
    assert_eq!(summary["by_airline"]["United"]["avg_altitude"], 9_000.0);
    assert_eq!(summary["airlines_with_10_plus_flights"], json!([]));
    assert!(summary["timestamp"].as_f64().is_some());

    let by_airline: Value = server.get("/api/v1/fleet/stats/by-airline").await.json();
    assert_eq!(by_airline["United"]["count"], 1);

    let by_destination: Value = server.get("/api/v1/fleet/stats/by-destination").await.json();
    assert_eq!(by_destination["OMDB"]["count"], 1);

    let by_type: Value = server.get("/api/v1/fleet/stats/by-aircraft-type").await.json();
    let typed: u64 = by_type
        .as_object()
        .unwrap()
        .values()
        .map(|s| s["count"].as_u64().unwrap())
        .sum();
    assert_eq!(typed, 3);

    let by_origin: Value = server.get("/api/v1/fleet/stats/by-origin").await.json();
    assert!(by_origin.as_object().unwrap().len() >= 1);
}

#[tokio::test]
async fn test_airlines_with_min_flights_query() {
    let server = test_server();
    for i in 0..3 {
        post_flight(&server, &flight_json(&format!("aa{i:04}"), "EK1", "1200", 1.0, 1.0)).await;
    }
    post_flight(&server, &flight_json("bb0001", "QF1", "1200", 1.0, 1.0)).await;

    let json: Value = server
        .get("/api/v1/fleet/stats/airlines-with-min-flights")
        .add_query_param("min_flights", 1)
        .await
        .json();
    assert_eq!(json["min_flights"], 1);
    assert_eq!(json["count"], 1);
    assert_eq!(json["airlines"][0]["airline"], "Emirates");
    assert_eq!(json["airlines"][0]["count"], 3);

    let json: Value = server
        .get("/api/v1/fleet/stats/airlines-with-min-flights")
        .await
        .json();
    assert_eq!(json["min_flights"], 10);
    assert_eq!(json["count"], 0);

    let json: Value = server
        .get("/api/v1/fleet/stats/airlines-with-min-flights")
        .add_query_param("min_flights", -1)
        .await
        .json();
    assert_eq!(json["min_flights"], -1);
    assert_eq!(json["count"], 2);
    assert_eq!(json["airlines"][1]["airline"], "Qantas");
}

#[tokio::test]
async fn test_emergency_alert_lifecycle() {
    let server = test_server();
    let ack = post_flight(&server, &flight_json("abc123", "DL100", "7700", 3_000.0, 150.0)).await;
    assert_eq!(ack["status"], "success");
    assert_eq!(ack["squawk_code"], "7700");
    let alert_id = ack["alert_id"].as_str().unwrap().to_string();
    assert!(alert_id.starts_with("abc123-"));

    let active: Value = server.get("/api/v1/alerts/active").await.json();
    assert_eq!(active["count"], 1);
    assert_eq!(active["alerts"][&alert_id]["description"], "General Emergency");
    assert_eq!(active["alerts"][&alert_id]["flight"]["callsign"], "DL100");

    let cleared: Value = server
        .delete(&format!("/api/v1/alerts/{alert_id}"))
        .await
        .json();
    assert_eq!(cleared["status"], "success");
    assert_eq!(cleared["message"], format!("Alert {alert_id} cleared"));

    let missing: Value = server
        .delete(&format!("/api/v1/alerts/{alert_id}"))
        .await
        .json();
    assert_eq!(missing, json!({ "status": "error", "message": "Alert not found" }));

    let active: Value = server.get("/api/v1/alerts/active").await.json();
    assert_eq!(active["count"], 0);

    let history: Value = server.get("/api/v1/alerts/history").await.json();
    assert_eq!(history["count"], 1);
    assert_eq!(history["total"], 1);
}

#[tokio::test]
async fn test_non_emergency_squawk_raises_no_alert() {
    let server = test_server();
    let ack = post_flight(&server, &flight_json("abc123", "DL100", "1200", 1.0, 1.0)).await;
    assert!(ack.get("alert_id").is_none());
    let active: Value = server.get("/api/v1/alerts/active").await.json();
    assert_eq!(active["count"], 0);
    let summary: Value = server.get("/api/v1/fleet/stats/summary").await.json();
    assert_eq!(summary["total_active_flights"], 1);
}

#[tokio::test]
async fn test_clear_all_and_history_limit() {
    let server = test_server();
    for (i, squawk) in ["7700", "7500", "7600"].iter().enumerate() {
        post_flight(&server, &flight_json(&format!("ab{i:04}"), "UA1", squawk, 1.0, 1.0)).await;
    }

    let history: Value = server
        .get("/api/v1/alerts/history")
        .add_query_param("limit", 2)
        .await
        .json();
    assert_eq!(history["count"], 2);
    assert_eq!(history["total"], 3);
    assert_eq!(history["history"][0]["squawk_code"], "7600");

    let cleared: Value = server.delete("/api/v1/alerts/clear-all").await.json();
    assert_eq!(cleared, json!({ "status": "success", "message": "Cleared 3 alerts" }));

    let active: Value = server.get("/api/v1/alerts/active").await.json();
    assert_eq!(active["count"], 0);
}

#[tokio::test]
async fn test_airport_tracker_endpoints() {
    let server = test_server();
    let mut arriving = flight_json("a00001", "DL100", "1200", 1_000.0, 80.0);
    arriving["latitude"] = json!(40.625);
    arriving["longitude"] = json!(-73.75);
    let mut departing = flight_json("a00002", "UA200", "1200", 4_000.0, 150.0);
    departing["latitude"] = json!(40.625);
    departing["longitude"] = json!(-73.75);
    post_flight(&server, &arriving).await;
    post_flight(&server, &departing).await;

    let airports: Value = server.get("/api/v1/airports").await.json();
    assert_eq!(airports[0]["icao"], "KJFK");

    let arrivals: Value = server.get("/api/v1/airports/KJFK/arrivals").await.json();
    assert_eq!(arrivals["airport_code"], "KJFK");
    assert_eq!(arrivals["count"], 1);
    assert_eq!(arrivals["arrivals"][0]["icao24"], "a00001");
    assert_eq!(arrivals["arrivals"][0]["status"], "arriving");
    assert!(arrivals["arrivals"][0]["last_seen"].as_str().unwrap().ends_with('Z'));

    let departures: Value = server.get("/api/v1/airports/kjfk/departures").await.json();
    assert_eq!(departures["count"], 1);
    assert_eq!(departures["departures"][0]["callsign"], "UA200");

    // Nearby lists everything inside the geofence, arriving and departing included.
    let nearby: Value = server.get("/api/v1/airports/KJFK/nearby").await.json();
    assert_eq!(nearby["airport_code"], "KJFK");
    assert_eq!(nearby["count"], 2);
    assert_eq!(nearby["flights"][0]["icao24"], "a00001");
    assert_eq!(nearby["flights"][1]["icao24"], "a00002");

    let elsewhere: Value = server.get("/api/v1/airports/EGLL/nearby").await.json();
    assert_eq!(elsewhere["count"], 0);
    assert_eq!(elsewhere["flights"], json!([]));

    let all: Value = server.get("/api/v1/flights/all").await.json();
    assert_eq!(all["count"], 2);
}
