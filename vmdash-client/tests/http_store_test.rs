// VmStore over real HTTP against the API router backed by an in-memory collection

use std::sync::Arc;
use std::time::Duration;
use vmdash_api::repository::InMemoryVmRepository;
use vmdash_api::routes::create_app;
use vmdash_api::AppState;
use vmdash_client::{ClientConfig, HttpVmApi, StoreMode, VmApi, VmStore};
use vmdash_common::{demo::demo_vms, NewVm, Region, StatusAction, UpdateVmRequest, VmStatus};

async fn spawn_api(repo: Arc<InMemoryVmRepository>) -> String {
    let app = create_app(AppState::new(repo, true));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("No local address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Test server failed");
    });
    format!("http://{}", addr)
}

async fn unreachable_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind port listener");
    let addr = listener.local_addr().expect("No local address");
    drop(listener);
    format!("http://{}", addr)
}

fn config(url: &str) -> ClientConfig {
    ClientConfig {
        api_url: url.to_string(),
        timeout: Duration::from_secs(5),
    }
}

fn new_vm(name: &str) -> NewVm {
    NewVm {
        name: name.to_string(),
        region: Region::EuCentralFrankfurt.to_string(),
        status: VmStatus::Starting,
        cpu: 0,
        memory: 0,
        storage: 0,
        ip_address: "10.0.0.9".to_string(),
    }
}

#[tokio::test]
async fn store_goes_live_and_round_trips_mutations() {
    let repo = Arc::new(InMemoryVmRepository::with_vms(demo_vms()));
    let url = spawn_api(repo.clone()).await;
    let store = vmdash_client::connect(&config(&url)).await.unwrap();

    assert_eq!(store.mode().await, StoreMode::Live);
    assert_eq!(store.vms().await.len(), 5);

    let created = store.create(new_vm("client-created")).await.unwrap();
    assert_eq!(store.vms().await[0].id, created.id);

    let before = store.get("vm-001").await.unwrap();
    let updated = store
        .apply_action("vm-001", StatusAction::Stop)
        .await
        .unwrap();
    assert_eq!(updated.status, VmStatus::Stopping);
    assert_eq!(updated.cpu, before.cpu);
    assert!(updated.updated_at > before.updated_at);

    store.delete(&created.id).await.unwrap();
    assert!(store.get(&created.id).await.is_none());

    // A fresh fetch agrees with the cache.
    let cached = store.vms().await;
    store.refresh().await;
    assert_eq!(store.vms().await, cached);
}

#[tokio::test]
async fn unreachable_api_falls_back_to_demo_data() {
    let url = unreachable_url().await;
    let store = vmdash_client::connect(&config(&url)).await.unwrap();

    assert_eq!(store.mode().await, StoreMode::Fallback);
    assert_eq!(store.vms().await, demo_vms());
    assert!(store.error().await.is_some());

    let vm = store
        .update_status("vm-002", VmStatus::Running)
        .await
        .unwrap();
    assert_eq!(vm.status, VmStatus::Running);
}

#[tokio::test]
async fn server_failure_rolls_back_optimistic_update() {
    let repo = Arc::new(InMemoryVmRepository::with_vms(demo_vms()));
    let url = spawn_api(repo.clone()).await;
    let store = vmdash_client::connect(&config(&url)).await.unwrap();
    let before = store.vms().await;

    repo.set_outage(Some("connection refused"));
    let err = store
        .update_status("vm-004", VmStatus::Running)
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "datastore unavailable: connection refused");
    assert_eq!(store.vms().await, before);
    assert_eq!(store.mode().await, StoreMode::Live);

    // Fetch failure after going live switches to fallback.
    assert_eq!(store.refresh().await, StoreMode::Fallback);
    repo.set_outage(None);
    assert_eq!(store.refresh().await, StoreMode::Live);
}

#[tokio::test]
async fn http_api_reports_server_messages() {
    let repo = Arc::new(InMemoryVmRepository::new());
    let url = spawn_api(repo).await;
    let api = HttpVmApi::new(&config(&url)).unwrap();

    let err = api
        .update_vm(
            "no-such-id",
            &UpdateVmRequest {
                status: Some(VmStatus::Running),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "VM not found");

    let err = api.delete_vm("no-such-id").await.unwrap_err();
    assert!(err.is_not_found());

    let mut blank = new_vm("");
    blank.region = String::new();
    let err = api.create_vm(&blank).await.unwrap_err();
    assert_eq!(err.to_string(), "Missing required fields: name, region");
}

#[tokio::test]
async fn store_over_http_is_generic_over_transport() {
    let repo = Arc::new(InMemoryVmRepository::new());
    let url = spawn_api(repo).await;
    let store = VmStore::new(HttpVmApi::new(&config(&url)).unwrap());

    assert_eq!(store.mode().await, StoreMode::Loading);
    assert_eq!(store.refresh().await, StoreMode::Live);
    assert!(store.vms().await.is_empty());
}

#[tokio::test]
async fn ids_with_reserved_characters_reach_their_record() {
    let mut vm = demo_vms()[0].clone();
    vm.id = "rack-1/vm-a".to_string();
    let repo = Arc::new(InMemoryVmRepository::with_vms(vec![vm]));
    let url = spawn_api(repo).await;
    let store = vmdash_client::connect(&config(&url)).await.unwrap();
    assert_eq!(store.mode().await, StoreMode::Live);

    let updated = store
        .update_status("rack-1/vm-a", VmStatus::Stopping)
        .await
        .unwrap();
    assert_eq!(updated.id, "rack-1/vm-a");
    assert_eq!(updated.status, VmStatus::Stopping);

    store.delete("rack-1/vm-a").await.unwrap();
    store.refresh().await;
    assert!(store.vms().await.is_empty());
}
