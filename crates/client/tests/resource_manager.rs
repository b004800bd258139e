//! The CRUD state machine driven against a mock backend.

mod support;

use gearbook_auth::{UserFields, Users};
use gearbook_catalog::{AccessoryTypes, Brands, Models, NameFields};
use gearbook_client::{EditTarget, OperationError};
use gearbook_core::RecordId;
use serde_json::json;
use support::{admin_storage, admin_token, config, manager, plain_storage, plain_token, raw_config, session_store};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn brands_body() -> serde_json::Value {
    json!({ "marcas": [ { "id": 7, "nombre": "Acme" }, { "id": 8, "nombre": "Zeta" } ] })
}

async fn mount_brand_list(server: &MockServer, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/marca_list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(brands_body()))
        .expect(expected_calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn refresh_replaces_list_with_server_snapshot() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/marca_list"))
        .and(header("authorization", format!("Bearer {}", plain_token()).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(brands_body()))
        .expect(1)
        .mount(&server)
        .await;

    let config = config(&server);
    let session = session_store(&config, plain_storage());
    let mut brands = manager::<Brands>(&config, &session);

    brands.refresh().await.unwrap();

    let names: Vec<&str> = brands.records().iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Acme", "Zeta"]);
    assert!(brands.status().is_none());
}

#[tokio::test]
async fn save_without_pointer_creates_then_refreshes_once() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/marca"))
        .and(body_json(json!({ "nombre": "Acme" })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    mount_brand_list(&server, 1).await;

    let config = config(&server);
    let session = session_store(&config, admin_storage());
    let mut brands = manager::<Brands>(&config, &session);

    brands.save(&NameFields::new("Acme")).await.unwrap();

    assert_eq!(brands.status(), Some("Brand saved successfully."));
    assert_eq!(brands.records().len(), 2);
    assert_eq!(brands.editing(), None);
}

#[tokio::test]
async fn save_with_pointer_updates_that_record() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/marca/7/editar"))
        .and(body_json(json!({ "nombre": "Acme Gear" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    mount_brand_list(&server, 2).await;

    let config = config(&server);
    let session = session_store(&config, admin_storage());
    let mut brands = manager::<Brands>(&config, &session);
    brands.refresh().await.unwrap();

    brands.begin_edit(RecordId::new(7));
    let form = brands.form();
    assert_eq!(form.editing, Some(RecordId::new(7)));
    assert_eq!(form.values, NameFields::new("Acme"));

    brands.save(&NameFields::new("Acme Gear")).await.unwrap();

    assert_eq!(brands.editing(), None);
    assert_eq!(brands.form().values, NameFields::default());
}

#[tokio::test]
async fn failed_save_keeps_pointer_and_list() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/marca/7/editar"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "Mensaje": "duplicate" })))
        .mount(&server)
        .await;
    mount_brand_list(&server, 1).await;

    let config = config(&server);
    let session = session_store(&config, admin_storage());
    let mut brands = manager::<Brands>(&config, &session);
    brands.refresh().await.unwrap();
    let before = brands.records().to_vec();

    brands.begin_edit(RecordId::new(7));
    let err = brands.save(&NameFields::new("Zeta")).await.unwrap_err();

    let fetch = err.as_fetch().unwrap();
    assert_eq!(fetch.status, Some(500));
    assert_eq!(fetch.message, "duplicate");
    assert_eq!(brands.status(), Some("Error saving brand: duplicate"));
    assert_eq!(brands.editing(), Some(RecordId::new(7)));
    assert_eq!(brands.records(), before.as_slice());
}

#[tokio::test]
async fn removing_a_vanished_record_reports_and_keeps_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/modelo_list"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "modelos": [ { "id": 1, "nombre": "X1" } ] })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/modelo/99/delete"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let config = config(&server);
    let session = session_store(&config, admin_storage());
    let mut models = manager::<Models>(&config, &session);
    models.refresh().await.unwrap();

    let err = models.remove(RecordId::new(99)).await.unwrap_err();

    assert_eq!(err.as_fetch().and_then(|e| e.status), Some(404));
    assert_eq!(
        models.status(),
        Some("Error deleting model: Unknown error deleting model.")
    );
    assert_eq!(models.records().len(), 1);
}

#[tokio::test]
async fn remove_uses_the_catalog_delete_verb_and_refreshes() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/accesorio/3/borrar"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/accesorio_list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "accesorios": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let config = config(&server);
    let session = session_store(&config, admin_storage());
    let mut accessories = manager::<AccessoryTypes>(&config, &session);

    accessories.remove(RecordId::new(3)).await.unwrap();

    assert_eq!(accessories.status(), Some("Accessory type deleted successfully."));
    assert!(accessories.records().is_empty());
}

#[tokio::test]
async fn refresh_failure_after_mutation_wins_the_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/marca"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/marca_list"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "Mensaje": "db down" })))
        .mount(&server)
        .await;

    let config = config(&server);
    let session = session_store(&config, admin_storage());
    let mut brands = manager::<Brands>(&config, &session);

    brands.save(&NameFields::new("Acme")).await.unwrap();

    assert_eq!(brands.status(), Some("Error fetching brands: db down"));
}

#[tokio::test]
async fn unauthorized_response_clears_the_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/marca_list"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let config = config(&server);
    let session = session_store(&config, admin_storage());
    let mut brands = manager::<Brands>(&config, &session);

    let err = brands.refresh().await.unwrap_err();

    assert!(err.as_fetch().is_some_and(|e| e.is_unauthorized()));
    assert!(!session.current().is_authenticated());
    assert!(!brands.can_mutate());
}

#[tokio::test]
async fn raw_scheme_sends_the_bare_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/modelo"))
        .and(header("authorization", admin_token().as_str()))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/modelo_list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "modelos": [] })))
        .mount(&server)
        .await;

    let config = raw_config(&server);
    let session = session_store(&config, admin_storage());
    let mut models = manager::<Models>(&config, &session);

    models.save(&NameFields::new("X2")).await.unwrap();
}

#[tokio::test]
async fn unprivileged_mutation_is_refused_locally() {
    let server = MockServer::start().await;
    let config = config(&server);
    let session = session_store(&config, plain_storage());
    let mut brands = manager::<Brands>(&config, &session);

    assert!(brands.can_view());
    assert!(!brands.can_mutate());

    let err = brands.save(&NameFields::new("Acme")).await.unwrap_err();
    assert!(matches!(err, OperationError::Forbidden(_)));
    assert_eq!(brands.status(), Some("You are not authorized to manage brands."));

    let err = brands.remove(RecordId::new(7)).await.unwrap_err();
    assert!(matches!(err, OperationError::Forbidden(_)));

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn user_screen_is_gated_entirely() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "username": "admin", "is_admin": 1 },
            { "id": 2, "username": "ana", "is_admin": 0 }
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/users"))
        .and(body_json(json!({ "username": "bo", "password": "pw", "is_admin": 0 })))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = config(&server);

    let plain = session_store(&config, plain_storage());
    let mut denied = manager::<Users>(&config, &plain);
    assert!(!denied.can_view());
    let err = denied.refresh().await.unwrap_err();
    assert!(matches!(err, OperationError::Forbidden(_)));
    assert_eq!(denied.status(), Some("You are not authorized to manage users."));
    assert!(denied
        .save(&UserFields {
            username: "bo".into(),
            password: "pw".into(),
            is_admin: false,
        })
        .await
        .is_err());

    let admin = session_store(&config, admin_storage());
    let mut users = manager::<Users>(&config, &admin);
    users.refresh().await.unwrap();
    let admins: Vec<bool> = users.records().iter().map(|u| u.is_admin).collect();
    assert_eq!(admins, vec![true, false]);
}

#[tokio::test]
async fn stale_edit_pointer_yields_an_empty_form() {
    let server = MockServer::start().await;
    mount_brand_list(&server, 1).await;

    let config = config(&server);
    let session = session_store(&config, admin_storage());
    let mut brands = manager::<Brands>(&config, &session);
    brands.refresh().await.unwrap();

    brands.begin_edit(RecordId::new(99));
    assert_eq!(brands.edit_target(), EditTarget::Missing(RecordId::new(99)));
    let form = brands.form();
    assert_eq!(form.editing, Some(RecordId::new(99)));
    assert_eq!(form.values, NameFields::default());

    brands.cancel_edit();
    assert_eq!(brands.edit_target(), EditTarget::New);
}

#[tokio::test]
async fn unreachable_backend_surfaces_transport_errors() {
    let server = MockServer::builder().start().await;
    mount_brand_list(&server, 1).await;

    let config = config(&server);
    let session = session_store(&config, admin_storage());
    let mut brands = manager::<Brands>(&config, &session);
    brands.refresh().await.unwrap();
    let before = brands.records().to_vec();
    drop(server);

    let err = brands.refresh().await.unwrap_err();
    assert_eq!(err.as_fetch().unwrap().status, None);
    assert!(brands.status().unwrap().starts_with("Error fetching brands:"));
    assert_eq!(brands.records(), before.as_slice());

    let err = brands.save(&NameFields::new("Acme")).await.unwrap_err();
    assert_eq!(err.as_fetch().unwrap().status, None);
    assert!(brands.status().unwrap().starts_with("Error saving brand:"));

    let err = brands.remove(RecordId::new(7)).await.unwrap_err();
    assert_eq!(err.as_fetch().unwrap().status, None);
    assert!(brands.status().unwrap().starts_with("Error deleting brand:"));
    assert_eq!(brands.records(), before.as_slice());
    assert!(session.current().is_authenticated());
}

#[tokio::test]
async fn failed_create_keeps_list_and_reports_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/marca"))
        .and(body_json(json!({ "nombre": "USB-C Cable" })))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "Mensaje": "duplicate" })))
        .expect(1)
        .mount(&server)
        .await;
    mount_brand_list(&server, 1).await;

    let config = config(&server);
    let session = session_store(&config, admin_storage());
    let mut brands = manager::<Brands>(&config, &session);
    brands.refresh().await.unwrap();
    let before = brands.records().to_vec();

    let err = brands.save(&NameFields::new("USB-C Cable")).await.unwrap_err();

    assert_eq!(err.as_fetch().and_then(|e| e.status), Some(500));
    assert!(brands.status().unwrap().contains("duplicate"));
    assert_eq!(brands.editing(), None);
    assert_eq!(brands.records(), before.as_slice());
}

#[tokio::test]
async fn successful_refresh_clears_an_earlier_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/marca_list"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    mount_brand_list(&server, 1).await;

    let config = config(&server);
    let session = session_store(&config, plain_storage());
    let mut brands = manager::<Brands>(&config, &session);

    assert!(brands.refresh().await.is_err());
    assert!(brands.status().unwrap().starts_with("Error fetching brands:"));

    brands.refresh().await.unwrap();
    assert!(brands.status().is_none());
    assert_eq!(brands.records().len(), 2);
}

#[tokio::test]
async fn delete_shows_server_confirmation_when_present() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/users/2/borrar"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Mensaje": "Usuario eliminado exitosamente." })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "username": "admin", "is_admin": 1 }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let config = config(&server);
    let session = session_store(&config, admin_storage());
    let mut users = manager::<Users>(&config, &session);

    users.remove(RecordId::new(2)).await.unwrap();

    assert_eq!(users.status(), Some("Usuario eliminado exitosamente."));
    assert_eq!(users.records().len(), 1);
}
