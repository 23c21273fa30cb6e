use callqa::api::{build_url, feedback_list_params, FeedbackScope};
use callqa::feedback::PageRequest;
use callqa::filters::period::Period;
use callqa::filters::*;
use chrono::NaiveDate;

#[test]
fn test_start_date_survives_reload() {
    let storage = MemoryStorage::new();
    storage.set(END_DATE_KEY, "2024-01-31").unwrap();
    storage.set(WALLET_KEY, "varejo").unwrap();

    let mut store = FilterStore::new(&storage);
    let before = store.load();
    store.update(FilterPatch::start("2024-01-01"));

    // A fresh store over the same storage stands in for a page reload
    let mut reloaded = FilterStore::new(&storage);
    let after = reloaded.load();

    assert_eq!(after.start.as_deref(), Some("2024-01-01"));
    assert_eq!(after.end, before.end);
    assert_eq!(after.wallet, before.wallet);
}

#[test]
fn test_empty_wallet_is_unset_and_not_sent() {
    let storage = MemoryStorage::new();
    let mut store = FilterStore::new(&storage);
    store.update(FilterPatch::wallet("varejo"));
    store.update(FilterPatch::wallet(""));

    assert_eq!(storage.get(WALLET_KEY).unwrap().as_deref(), Some(""));

    let filter = FilterStore::new(&storage).load();
    assert_eq!(filter.wallet, None);
    assert!(filter.query_params().iter().all(|(k, _)| *k != "wallet"));

    let params = feedback_list_params(
        PageRequest { limit: 50, offset: 0 },
        &filter,
        &FeedbackScope::default(),
    );
    let url = build_url("https://qa.example.com/api", "/feedbacks", &params);
    assert_eq!(url, "https://qa.example.com/api/feedbacks?limit=50&offset=0");
}

#[test]
fn test_set_fields_reach_the_listing_url() {
    let mut filter = Filter::default();
    filter.apply(FilterPatch::start("2024-05-01"));
    filter.apply(FilterPatch::wallet("Cobrança Norte"));

    let scope = FeedbackScope {
        agent_id: Some("1011".to_string()),
        status: None,
    };
    let params = feedback_list_params(PageRequest { limit: 20, offset: 40 }, &filter, &scope);
    let url = build_url("https://qa.example.com/api/", "feedbacks", &params);

    assert!(url.starts_with("https://qa.example.com/api/feedbacks?limit=20&offset=40"));
    assert!(url.contains("start=2024-05-01"));
    assert!(url.contains("wallet=Cobran%C3%A7a%20Norte"));
    assert!(url.contains("agent_id=1011"));
    assert!(!url.contains("end="));
}

#[test]
fn test_period_preset_persists_and_is_detected() {
    let today = NaiveDate::from_ymd_opt(2024, 5, 15).unwrap();
    let storage = MemoryStorage::new();
    let mut store = FilterStore::new(&storage);

    let filter = store.update(Period::LastMonth.patch(today));
    assert_eq!(filter.start.as_deref(), Some("2024-04-01"));
    assert_eq!(filter.end.as_deref(), Some("2024-04-30"));
    assert_eq!(Period::detect(&filter, today), Some(Period::LastMonth));

    let reloaded = FilterStore::new(&storage).load();
    assert_eq!(Period::detect(&reloaded, today), Some(Period::LastMonth));
}

#[test]
fn test_reset_then_reload_is_all_unset() {
    let storage = MemoryStorage::new();
    let mut store = FilterStore::new(&storage);
    store.update(FilterPatch::start("2024-01-01"));
    store.update(FilterPatch::active_only(true));
    store.reset();

    let filter = FilterStore::new(&storage).load();
    assert!(filter.is_empty());
    assert!(storage.contains(START_DATE_KEY));
}
