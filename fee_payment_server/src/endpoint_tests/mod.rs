mod mocks;
mod payments;
mod transactions;
mod webhook;

mod misc {
    use actix_web::{
        body::MessageBody,
        http::{header, StatusCode},
        test,
        test::TestRequest,
        App,
    };

    use crate::{config::CorsConfig, routes::health, server::cors_policy};

    const DASHBOARD: &str = "https://dashboard.example.com";

    #[actix_web::test]
    async fn health_check() {
        let app = test::init_service(App::new().service(health)).await;
        let req = TestRequest::get().uri("/health").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body = res.into_body().try_into_bytes().unwrap();
        assert_eq!(body, "👍️\n");
    }

    #[actix_web::test]
    async fn cors_preflight() {
        let config = CorsConfig::from_list(&format!("http://localhost:5173,{DASHBOARD}"));
        let app = test::init_service(App::new().wrap(cors_policy(&config)).service(health)).await;
        let req = TestRequest::default()
            .method(actix_web::http::Method::OPTIONS)
            .uri("/api/transactions")
            .insert_header((header::ORIGIN, DASHBOARD))
            .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "GET"))
            .insert_header((header::ACCESS_CONTROL_REQUEST_HEADERS, "authorization"))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        let headers = res.headers();
        assert_eq!(headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(), DASHBOARD);
        assert_eq!(headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(), "true");
        let allowed = headers.get(header::ACCESS_CONTROL_ALLOW_HEADERS).unwrap().to_str().unwrap().to_lowercase();
        assert!(allowed.contains("authorization"), "{allowed}");

        let req = TestRequest::get().uri("/health").insert_header((header::ORIGIN, DASHBOARD)).to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(), DASHBOARD);
    }

    #[actix_web::test]
    async fn cors_rejects_unknown_origins() {
        let app = test::init_service(App::new().wrap(cors_policy(&CorsConfig::default())).service(health)).await;
        let req = TestRequest::default()
            .method(actix_web::http::Method::OPTIONS)
            .uri("/health")
            .insert_header((header::ORIGIN, "https://evil.example.com"))
            .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "GET"))
            .to_request();
        let res = test::try_call_service(&app, req).await;
        let status = match res {
            Ok(res) => {
                assert!(res.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
                res.status()
            },
            Err(e) => e.error_response().status(),
        };
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
