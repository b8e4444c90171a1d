use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use serde_json::{json, Value};

use class_timetable::logging;
use class_timetable::web::{configure, session_middleware, AppState};

fn session_cookie<B>(resp: &ServiceResponse<B>) -> Cookie<'static> {
    resp.response()
        .cookies()
        .next()
        .expect("session cookie")
        .into_owned()
}

#[actix_web::test]
async fn setup_assign_and_render() {
    logging::init_test();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(AppState::new()))
            .wrap(session_middleware(Key::generate()))
            .configure(configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/setup")
        .set_json(json!({
            "numPeriods": 2,
            "timeSlots": ["09:00-10:00", "10:00-11:00"],
            "includeSaturday": false,
            "lunchSlot": "10:00-11:00"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let cookie = session_cookie(&resp);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["days"].as_array().map(Vec::len), Some(5));
    assert_eq!(body["rows"][0]["cells"][1]["subject"], "Lunch");
    assert_eq!(body["rows"][0]["cells"][1]["isFixed"], true);
    assert_eq!(body["lunchSlot"], "10:00-11:00");
    assert_eq!(body["timeSlots"].as_array().map(Vec::len), Some(2));
    assert!(body.get("lunch_slot").is_none());

    let assign = |teacher_id: u32, subject: &str| {
        test::TestRequest::post()
            .uri("/api/assign")
            .cookie(cookie.clone())
            .set_json(json!({"time": "09:00-10:00", "day": "Monday", "teacherId": teacher_id, "subject": subject}))
            .to_request()
    };
    let resp = test::call_service(&app, assign(1, "Math")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let resp = test::call_service(&app, assign(2, "English")).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);

    let req = test::TestRequest::get()
        .uri("/api/timetable")
        .cookie(cookie.clone())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let cell = &body["rows"][0]["cells"][0];
    assert_eq!(cell["subject"], "Math");
    assert_eq!(cell["teacherId"], 1);
    assert_eq!(cell["teacherName"], "Mr. John Smith");
    assert_eq!(cell["color"], "color-1");

    // lunch is never a relocation target
    let req = test::TestRequest::post()
        .uri("/api/relocate")
        .cookie(cookie.clone())
        .set_json(json!({"fromTime": "09:00-10:00", "fromDay": "Monday", "toTime": "10:00-11:00", "toDay": "Monday"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::post()
        .uri("/api/relocate")
        .cookie(cookie.clone())
        .set_json(json!({"fromTime": "09:00-10:00", "fromDay": "Monday", "toTime": "09:00-10:00", "toDay": "Friday"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["outcome"], "moved");
}

#[actix_web::test]
async fn timetable_requires_setup() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(AppState::new()))
            .wrap(session_middleware(Key::generate()))
            .configure(configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/teachers").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.response().cookies().next().is_none());
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body.as_array().map(Vec::len), Some(5));
    assert_eq!(body[4]["isAbsent"], true);

    let req = test::TestRequest::get().uri("/api/timetable").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::post()
        .uri("/api/setup")
        .set_json(json!({"numPeriods": 0}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn reads_without_a_session_store_nothing() {
    let state = web::Data::new(AppState::new());
    let app = test::init_service(
        App::new()
            .app_data(state.clone())
            .wrap(session_middleware(Key::generate()))
            .configure(configure),
    )
    .await;

    for uri in ["/api/teachers", "/api/timetable", "/api/absent"] {
        for _ in 0..20 {
            let req = test::TestRequest::get().uri(uri).to_request();
            test::call_service(&app, req).await;
        }
    }
    assert_eq!(state.session_count(), 0);

    let req = test::TestRequest::post()
        .uri("/api/setup")
        .set_json(json!({"numPeriods": 2}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let cookie = session_cookie(&resp);
    assert_eq!(state.session_count(), 1);

    let req = test::TestRequest::get()
        .uri("/api/teachers")
        .cookie(cookie)
        .to_request();
    test::call_service(&app, req).await;
    assert_eq!(state.session_count(), 1);
}

#[actix_web::test]
async fn substitute_an_absent_teacher() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(AppState::new()))
            .wrap(session_middleware(Key::generate()))
            .configure(configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/setup")
        .set_json(json!({"numPeriods": 3, "lunchSlot": "none"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let cookie = session_cookie(&resp);

    let req = test::TestRequest::post()
        .uri("/api/assign")
        .cookie(cookie.clone())
        .set_json(json!({"time": "09:00-10:00", "day": "Monday", "teacherId": 1, "subject": "Math"}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/api/teachers/1/absence")
        .cookie(cookie.clone())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["isAbsent"], true);

    let req = test::TestRequest::get()
        .uri("/api/absent")
        .cookie(cookie.clone())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.as_array().map(Vec::len), Some(1));
    assert_eq!(body[0]["teacherId"], 1);
    assert!(body[0].get("teacher_id").is_none());

    let req = test::TestRequest::get()
        .uri("/api/substitutes?time=09:00-10:00&day=Monday")
        .cookie(cookie.clone())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["subject"], "Math");
    let names: Vec<&str> = body["substitutes"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|t| t["name"].as_str())
        .collect();
    assert_eq!(names, vec!["Mrs. Sarah Jones"]);

    let req = test::TestRequest::post()
        .uri("/api/substitute")
        .cookie(cookie.clone())
        .set_json(json!({"time": "09:00-10:00", "day": "Monday", "teacherId": 4}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::delete()
        .uri("/api/teachers/4")
        .cookie(cookie.clone())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["removed"], true);

    let req = test::TestRequest::get()
        .uri("/api/timetable")
        .cookie(cookie.clone())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["rows"][0]["cells"][0]["subject"], Value::Null);
}
