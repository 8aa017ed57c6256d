use calorie_core::store::{CALORIE_LIMIT_KEY, TOTAL_CALORIES_KEY};
use calorie_core::{
    Entry, EntryId, EntryKind, KeyValueBackend, MemoryBackend, PersistenceStore, StoreError,
};

fn empty_store() -> PersistenceStore<MemoryBackend> {
    PersistenceStore::new(MemoryBackend::new())
}

#[test]
fn absent_keys_read_as_defaults() {
    let store = empty_store();

    assert_eq!(store.get_calorie_limit(2000).unwrap(), 2000);
    assert_eq!(store.get_total_calories(0).unwrap(), 0);
    assert!(store.get_meals().unwrap().is_empty());
    assert!(store.get_workouts().unwrap().is_empty());
}

#[test]
fn scalars_are_stored_as_decimal_text() {
    let mut store = empty_store();
    store.set_calorie_limit(2500).unwrap();
    store.update_total_calories(-150).unwrap();

    let backend = store.backend();
    assert_eq!(
        backend.get_item(CALORIE_LIMIT_KEY).unwrap().as_deref(),
        Some("2500")
    );
    assert_eq!(
        backend.get_item(TOTAL_CALORIES_KEY).unwrap().as_deref(),
        Some("-150")
    );
    assert_eq!(store.get_calorie_limit(2000).unwrap(), 2500);
    assert_eq!(store.get_total_calories(0).unwrap(), -150);
}

#[test]
fn non_numeric_scalars_fall_back_to_defaults() {
    let store = PersistenceStore::new(MemoryBackend::with_items([
        (CALORIE_LIMIT_KEY, "two thousand"),
        (TOTAL_CALORIES_KEY, "NaN"),
    ]));

    assert_eq!(store.get_calorie_limit(1800).unwrap(), 1800);
    assert_eq!(store.get_total_calories(0).unwrap(), 0);
}

#[test]
fn empty_text_is_treated_as_absent() {
    let store = PersistenceStore::new(MemoryBackend::with_items([
        (CALORIE_LIMIT_KEY, ""),
        ("meals", ""),
    ]));

    assert_eq!(store.get_calorie_limit(2000).unwrap(), 2000);
    assert!(store.try_entries(EntryKind::Meal).unwrap().is_empty());
}

#[test]
fn collections_preserve_insertion_order() {
    let mut store = empty_store();
    let breakfast = Entry::new("Breakfast", 400);
    let lunch = Entry::new("Lunch", 600);
    let dinner = Entry::new("Dinner", 700);
    store.save_meal(&breakfast).unwrap();
    store.save_meal(&lunch).unwrap();
    store.save_meal(&dinner).unwrap();

    let meals = store.get_meals().unwrap();
    assert_eq!(meals, vec![breakfast, lunch, dinner]);
    assert!(store.get_workouts().unwrap().is_empty());
}

#[test]
fn reads_collections_written_by_earlier_sessions() {
    let store = PersistenceStore::new(MemoryBackend::with_items([(
        "workouts",
        r#"[{"id":"9c1e4b7a2f","name":"Run","calories":300},{"id":"1d2e","name":"Yoga","calories":120}]"#,
    )]));

    let workouts = store.get_workouts().unwrap();
    assert_eq!(workouts.len(), 2);
    assert_eq!(workouts[0].id, EntryId::from("9c1e4b7a2f"));
    assert_eq!(workouts[1].name, "Yoga");
}

#[test]
fn corrupt_collection_is_reported_strictly_and_read_as_empty() {
    let store = PersistenceStore::new(MemoryBackend::with_items([("meals", "{not json")]));

    let err = store.try_entries(EntryKind::Meal).unwrap_err();
    match err {
        StoreError::Corrupt(corrupt) => assert_eq!(corrupt.key, "meals"),
        other => panic!("unexpected error: {other}"),
    }
    assert!(store.get_meals().unwrap().is_empty());
}

#[test]
fn wrongly_shaped_entries_count_as_corrupt() {
    let store = PersistenceStore::new(MemoryBackend::with_items([
        ("meals", r#"[{"id":"a","name":"Soup","calories":"lots"}]"#),
        ("workouts", r#"[{"id":"","name":"Row","calories":50}]"#),
    ]));

    assert!(matches!(
        store.try_entries(EntryKind::Meal),
        Err(StoreError::Corrupt(_))
    ));
    assert!(matches!(
        store.try_entries(EntryKind::Workout),
        Err(StoreError::Corrupt(_))
    ));
    assert!(store.get_meals().unwrap().is_empty());
    assert!(store.get_workouts().unwrap().is_empty());
}

#[test]
fn saving_over_corrupt_collection_replaces_it() {
    let mut store = PersistenceStore::new(MemoryBackend::with_items([("meals", "[broken")]));
    let meal = Entry::new("Salad", 250);

    store.save_meal(&meal).unwrap();

    assert_eq!(store.try_entries(EntryKind::Meal).unwrap(), vec![meal]);
}

#[test]
fn remove_deletes_only_the_first_match() {
    let mut store = empty_store();
    let first = Entry::with_id("dup", "Snack", 100);
    let second = Entry::with_id("dup", "Snack again", 150);
    store.save_meal(&first).unwrap();
    store.save_meal(&second).unwrap();

    assert!(store.remove_meal(&EntryId::from("dup")).unwrap());
    assert_eq!(store.get_meals().unwrap(), vec![second]);
}

#[test]
fn remove_unknown_id_leaves_store_unchanged() {
    let mut store = empty_store();
    let workout = Entry::new("Bike", 500);
    store.save_workout(&workout).unwrap();

    assert!(!store.remove_workout(&EntryId::from("missing")).unwrap());
    assert!(!store.remove_meal(&EntryId::from("missing")).unwrap());
    assert_eq!(store.get_workouts().unwrap(), vec![workout]);
    assert!(!store.backend().contains_key("meals"));
}

#[test]
fn clear_all_keeps_the_limit() {
    let mut store = empty_store();
    store.set_calorie_limit(1900).unwrap();
    store.update_total_calories(400).unwrap();
    store.save_meal(&Entry::new("Wrap", 400)).unwrap();
    store.save_workout(&Entry::new("Walk", 100)).unwrap();

    store.clear_all().unwrap();

    let backend = store.backend();
    assert_eq!(backend.len(), 1);
    assert!(backend.contains_key(CALORIE_LIMIT_KEY));
    assert_eq!(store.get_calorie_limit(2000).unwrap(), 1900);
    assert_eq!(store.get_total_calories(0).unwrap(), 0);
}
