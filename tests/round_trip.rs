//! Client, state store and view against a real server on a loopback port.

use calboard::state::{Action, Status, settle};
use calboard::{CalendarView, EventClient, EventStateStore, Slot, UpdateOutcome, Viewport};
use calboard_core::{Category, EventFields, time};
use calboard_server::AppState;
use calboard_server::store::MemoryStore;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use tokio::task;

async fn spawn_server() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    task::spawn(async move {
        calboard_server::serve(listener, AppState::new(MemoryStore::new()))
            .await
            .unwrap();
    });
    format!("http://{}/api/events", addr)
}

fn at(hour: u32) -> DateTime<Utc> {
    time::parse(&format!("2024-01-01T{:02}:00:00.000Z", hour)).unwrap()
}

fn mount(url: &str) -> CalendarView<EventClient> {
    let store = EventStateStore::new(EventClient::new(url));
    CalendarView::new(store, Viewport::new(160), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
}

#[tokio::test]
async fn slot_selection_creates_an_event() {
    let url = spawn_server().await;
    let mut view = mount(&url);

    assert_eq!(settle(view.refresh()).await.unwrap(), 0);

    view.select_slot(Slot {
        start: at(6),
        end: at(7),
    });
    view.dialog_mut().set_title("Run");
    let created = settle(view.submit_dialog().unwrap()).await.unwrap();

    assert!(!created.id.is_empty());
    assert_eq!(created.start, at(6));
    assert_eq!(view.store().events(), vec![created.clone()]);

    // A second client sees the same record after its own fetch.
    let other = mount(&url);
    settle(other.refresh()).await.unwrap();
    assert_eq!(other.store().events(), vec![created]);
}

#[tokio::test]
async fn drag_and_resize_update_in_place() {
    let url = spawn_server().await;
    let view = mount(&url);

    let fields = EventFields {
        title: "Meeting".to_string(),
        category: Category::Work,
        start: at(9),
        end: at(10),
    };
    let event = settle(view.store().dispatch_add_one(fields)).await.unwrap();

    let moved = settle(view.drop_event(&event, at(11), at(12))).await.unwrap();
    assert_eq!(moved, UpdateOutcome::Applied);

    let current = view.store().events()[0].clone();
    let resized = settle(view.resize_event(&current, current.start, current.end + Duration::minutes(30)))
        .await
        .unwrap();
    assert_eq!(resized, UpdateOutcome::Applied);

    let events = view.store().events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].id, event.id);
    assert_eq!(events[0].title, "Meeting");
    assert_eq!(events[0].category, Category::Work);
    assert_eq!(events[0].start, at(11));
    assert_eq!(events[0].end, at(12) + Duration::minutes(30));
}

#[tokio::test]
async fn rejected_update_leaves_table_alone() {
    let url = spawn_server().await;
    let view = mount(&url);

    let fields = EventFields {
        title: "Lunch".to_string(),
        category: Category::Eating,
        start: at(12),
        end: at(13),
    };
    let event = settle(view.store().dispatch_add_one(fields)).await.unwrap();

    // Dragging the end edge before the start is refused by the server.
    let result = settle(view.resize_event(&event, event.start, at(11))).await;
    assert!(result.is_err());

    assert_eq!(view.store().events(), vec![event]);
    assert!(matches!(view.store().status(Action::Update), Status::Rejected(_)));
    assert!(view.store().last_error().is_some());
}

#[tokio::test]
async fn unreachable_server_is_reported() {
    // Bind then drop to get a port nothing listens on.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let view = mount(&format!("http://{}/api/events", addr));
    assert!(settle(view.refresh()).await.is_err());

    assert!(view.store().events().is_empty());
    assert!(matches!(view.store().status(Action::Fetch), Status::Rejected(_)));
    assert!(view.store().last_error().unwrap().contains("Failed to connect"));
}
