use shipspot::prelude::*;

fn session_on(store: &MemoryStore) -> QuizSession {
    QuizSession::new(
        AppConfig::default(),
        ScenarioCatalog::predefined("42"),
        EquipmentRegistry::standard(),
        Box::new(store.clone()),
    )
}

/// Select a scenario and let its first equipment become active
fn open_scenario(session: &mut QuizSession, id: &str) {
    let now = Instant::now();
    session.select_scenario(id, now).unwrap();
    session.tick(now + Duration::from_millis(300));
    assert!(session.selected_equipment().is_some());
}

fn fit_image(session: &mut QuizSession) {
    session.handle_input(InputEvent::Resize {
        origin: Point::new(300.0, 0.0),
        size: Point::new(800.0, 600.0),
    });
    let loads = session.take_pending_loads();
    let image = Arc::new(DecodedImage {
        width: 1600,
        height: 1200,
        rgba: vec![0; 1600 * 1200 * 4],
    });
    assert!(session.complete_load(&loads[0], Ok(image)));
}

#[test]
fn test_click_places_marker_for_selected_equipment() {
    let store = MemoryStore::new();
    let mut session = session_on(&store);
    open_scenario(&mut session, "h3deck");
    fit_image(&mut session);

    let actions = session.handle_input(InputEvent::Click {
        position: Point::new(700.0, 300.0),
        button: MouseButton::Left,
    });
    assert_eq!(actions, vec![ViewerAction::PlaceMarker { x: 50.0, y: 50.0 }]);

    let markers = session.current_markers();
    assert_eq!(markers.len(), 1);
    assert_eq!(markers[0].equipment.id, "Halon");
    assert!(store.get(keys::USER_PROGRESS).unwrap().contains("h3deck"));
}

#[test]
fn test_place_and_remove_round_trip() {
    let store = MemoryStore::new();
    let mut session = session_on(&store);
    open_scenario(&mut session, "01deck");

    let id = session.place_marker_at(12.5, 80.0).unwrap();
    assert_eq!(session.progress().total(), 1);
    assert!(session.remove_marker(id));
    assert!(!session.remove_marker(id));
    assert!(session.progress().is_empty());

    let reloaded = session_on(&store);
    assert!(reloaded.progress().is_empty());
}

#[test]
fn test_clear_all_only_touches_current_scenario() {
    let store = MemoryStore::new();
    let mut session = session_on(&store);

    open_scenario(&mut session, "h1deck");
    session.place_marker_at(10.0, 10.0).unwrap();
    session.place_marker_at(20.0, 20.0).unwrap();

    open_scenario(&mut session, "h2deck");
    session.place_marker_at(30.0, 30.0).unwrap();

    assert_eq!(session.clear_all(), 1);
    assert!(session.current_markers().is_empty());
    assert_eq!(session.progress().markers("h1deck").len(), 2);
}

#[test]
fn test_progress_and_last_scenario_restored_on_reload() {
    let store = MemoryStore::new();
    {
        let mut session = session_on(&store);
        open_scenario(&mut session, "h4deck");
        session.place_marker_at(40.0, 60.0).unwrap();
        session.set_marker_size(32);
        session.toggle_scenarios_expanded();
    }

    let session = session_on(&store);
    assert_eq!(session.storage_state(), StorageState::Restored);
    assert_eq!(session.current_scenario().map(|s| s.id.as_str()), Some("h4deck"));
    assert_eq!(session.current_markers().len(), 1);
    assert_eq!(session.marker_size(), 32);
    assert!(!session.navigator().scenarios_expanded);
    assert_eq!(session.navigator().last_category(), Some("halifax"));
}

#[test]
fn test_version_bump_wipes_stored_state() {
    let store = MemoryStore::new();
    {
        let mut session = session_on(&store);
        open_scenario(&mut session, "h1deck");
        session.place_marker_at(50.0, 50.0).unwrap();
    }

    let bumped = AppConfig {
        app_version: "2.0.0".to_string(),
        ..AppConfig::default()
    };
    let session = QuizSession::new(
        bumped,
        ScenarioCatalog::predefined("42"),
        EquipmentRegistry::standard(),
        Box::new(store.clone()),
    );

    assert_eq!(session.storage_state(), StorageState::Fresh);
    assert!(session.progress().is_empty());
    assert!(session.current_scenario().is_none());
    assert_eq!(store.keys(), vec![keys::APP_VERSION.to_string()]);
    assert_eq!(store.get(keys::APP_VERSION).as_deref(), Some("\"2.0.0\""));
}

#[test]
fn test_restored_max_marker_id_does_not_block_placement() {
    let store = MemoryStore::new();
    {
        let mut session = session_on(&store);
        open_scenario(&mut session, "h1deck");
        let id = session.place_marker_with_timestamp(5.0, 5.0, u64::MAX);
        assert_eq!(id, Some(u64::MAX));
    }

    let mut session = session_on(&store);
    assert_eq!(session.storage_state(), StorageState::Restored);
    open_scenario(&mut session, "h1deck");

    let id = session.place_marker_at(10.0, 10.0).unwrap();
    assert_ne!(id, u64::MAX);
    let again = session.place_marker_at(20.0, 20.0).unwrap();
    assert_ne!(again, id);
    assert_eq!(session.current_markers().len(), 3);
}

#[test]
fn test_malformed_progress_is_discarded() {
    let mut store = MemoryStore::new();
    drop(session_on(&store));
    store.set(keys::USER_PROGRESS, "{not json").unwrap();

    let session = session_on(&store);
    assert!(session.progress().is_empty());
    assert!(store.get(keys::USER_PROGRESS).is_none());
}

#[test]
fn test_removed_scenario_is_not_restored() {
    let store = MemoryStore::new();
    {
        let mut session = session_on(&store);
        open_scenario(&mut session, "h2deck");
    }

    let json = r#"[{"id": "h1deck", "title": "1 Deck", "category": "halifax",
        "questionImage": "images/Halifax/1Deck.png",
        "availableEquipment": ["Halon"]}]"#;
    let catalog = ScenarioCatalog::from_json(json, "42").unwrap();
    let session = QuizSession::new(
        AppConfig::default(),
        catalog,
        EquipmentRegistry::standard(),
        Box::new(store.clone()),
    );
    assert!(session.current_scenario().is_none());
}

#[test]
fn test_hand_tool_blocks_marker_placement() {
    let store = MemoryStore::new();
    let mut session = session_on(&store);
    open_scenario(&mut session, "h1deck");
    fit_image(&mut session);

    session.set_hand_tool(true);
    let actions = session.handle_input(InputEvent::Click {
        position: Point::new(700.0, 300.0),
        button: MouseButton::Left,
    });
    assert!(actions.is_empty());
    assert!(session.current_markers().is_empty());
}

#[test]
fn test_wheel_zoom_switches_to_hand_tool() {
    let store = MemoryStore::new();
    let mut session = session_on(&store);
    open_scenario(&mut session, "h1deck");
    fit_image(&mut session);

    let actions = session.handle_input(InputEvent::Scroll {
        delta: 200.0,
        position: Point::new(700.0, 300.0),
    });
    assert!(actions.contains(&ViewerAction::ZoomPanChanged {
        zoomed_or_panned: true
    }));
    assert!(session.hand_tool_active());
    assert!(session.selected_equipment().is_none());

    // Picking a scenario resets the view
    session.select_scenario("h2deck", Instant::now()).unwrap();
    assert!(!session.viewport().is_zoomed_or_panned());
}
