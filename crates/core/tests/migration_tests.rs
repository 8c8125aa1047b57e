// ═══════════════════════════════════════════════════════════════════
// Migration Tests — first launch, legacy import, repair on load
// ═══════════════════════════════════════════════════════════════════

use uuid::Uuid;
use watchlist_core::lookup::static_table::StaticSymbolTable;
use watchlist_core::models::color::ThemeColor;
use watchlist_core::models::settings::StoreSettings;
use watchlist_core::services::migration_service::InitOutcome;
use watchlist_core::storage::backend::{KeyValueStore, MemoryStore};
use watchlist_core::storage::format::{
    ACTIVE_WATCHLIST_KEY, LEGACY_ITEMS_KEY, LEGACY_SYMBOLS_KEY, WATCHLISTS_KEY,
};
use watchlist_core::WatchlistStore;

fn backend_with(entries: &[(&str, &str)]) -> MemoryStore {
    let mut backend = MemoryStore::new();
    for (key, value) in entries {
        backend.set(key, value.as_bytes()).unwrap();
    }
    backend
}

fn active_symbols(store: &WatchlistStore) -> Vec<String> {
    store
        .active_items()
        .iter()
        .map(|i| i.symbol.clone())
        .collect()
}

const LEGACY_ITEMS: &str = r#"[
    {"symbol":"SAP","name":"SAP SE","price":"€168.34","change":"+2.15","changePercent":"+1.29%","isPositive":true},
    {"symbol":"vow3","name":"Volkswagen AG","price":"€112.45","change":"-2.34","changePercent":"-2.04%","isPositive":false},
    {"symbol":"SAP","name":"SAP duplicate","price":"€1","change":"0","changePercent":"0%","isPositive":true}
]"#;

// ═══════════════════════════════════════════════════════════════════
// Fresh install
// ═══════════════════════════════════════════════════════════════════

mod seeding {
    use super::*;

    #[test]
    fn empty_backend_seeds_default_watchlist() {
        let backend = MemoryStore::new();
        let store = WatchlistStore::open(backend.clone());

        assert_eq!(store.init_outcome(), &InitOutcome::Seeded);
        assert_eq!(store.watchlist_count(), 1);
        assert_eq!(store.active_watchlist().name, "My Watchlist");
        assert_eq!(store.active_watchlist().theme_color, ThemeColor::blue());
        assert_eq!(active_symbols(&store), vec!["AAPL", "MSFT", "NVDA"]);
        assert!(backend.contains(WATCHLISTS_KEY).unwrap());
        assert!(backend.contains(ACTIVE_WATCHLIST_KEY).unwrap());
    }

    #[test]
    fn seed_items_are_positive_movers() {
        let store = WatchlistStore::open(MemoryStore::new());
        assert!(store.active_items().iter().all(|i| i.is_positive));
        assert_eq!(store.active_items()[0].price, 182.52);
    }

    #[test]
    fn seeding_can_be_disabled() {
        let settings = StoreSettings {
            seed_defaults: false,
            default_watchlist_name: "Start".into(),
            ..StoreSettings::default()
        };
        let store = WatchlistStore::open_with(
            Box::new(MemoryStore::new()),
            Box::new(StaticSymbolTable::builtin()),
            settings,
        );
        assert_eq!(store.init_outcome(), &InitOutcome::Seeded);
        assert_eq!(store.active_watchlist().name, "Start");
        assert!(store.active_items().is_empty());
    }

    #[test]
    fn second_open_loads_instead_of_seeding() {
        let backend = MemoryStore::new();
        let first = WatchlistStore::open(backend.clone());
        let snapshot = first.snapshot();
        drop(first);

        let second = WatchlistStore::open(backend);
        assert_eq!(second.init_outcome(), &InitOutcome::Loaded);
        assert_eq!(second.snapshot(), snapshot);
    }

    #[test]
    fn empty_persisted_array_is_reseeded() {
        let backend = backend_with(&[(WATCHLISTS_KEY, "[]")]);
        let store = WatchlistStore::open(backend);
        assert_eq!(store.init_outcome(), &InitOutcome::Seeded);
        assert_eq!(store.watchlist_count(), 1);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Onboarding symbols
// ═══════════════════════════════════════════════════════════════════

mod onboarding_symbols {
    use super::*;

    #[test]
    fn imports_into_default_watchlist_and_clears_artifact() {
        let backend = backend_with(&[(LEGACY_SYMBOLS_KEY, r#"["AAPL","MSFT"]"#)]);
        let store = WatchlistStore::open(backend.clone());

        assert_eq!(
            store.init_outcome(),
            &InitOutcome::MigratedSymbols {
                imported: 2,
                dropped: 0
            }
        );
        assert_eq!(store.watchlist_count(), 1);
        assert_eq!(store.active_watchlist().name, "My Watchlist");
        assert_eq!(active_symbols(&store), vec!["AAPL", "MSFT"]);
        assert_eq!(store.active_items()[1].name, "Microsoft Corp.");
        assert!(!backend.contains(LEGACY_SYMBOLS_KEY).unwrap());
    }

    #[test]
    fn import_runs_once() {
        let backend = backend_with(&[(LEGACY_SYMBOLS_KEY, r#"["AAPL","MSFT"]"#)]);
        let first = WatchlistStore::open(backend.clone());
        let snapshot = first.snapshot();
        drop(first);

        let second = WatchlistStore::open(backend);
        assert_eq!(second.init_outcome(), &InitOutcome::Loaded);
        assert_eq!(second.snapshot(), snapshot);
        assert_eq!(second.active_items().len(), 2);
    }

    #[test]
    fn unknown_and_repeated_symbols_are_dropped() {
        let backend = backend_with(&[(
            LEGACY_SYMBOLS_KEY,
            r#"["tsla","NOPE","TSLA","DBK"]"#,
        )]);
        let store = WatchlistStore::open(backend);
        assert_eq!(
            store.init_outcome(),
            &InitOutcome::MigratedSymbols {
                imported: 2,
                dropped: 2
            }
        );
        assert_eq!(active_symbols(&store), vec!["TSLA", "DBK"]);
    }

    #[test]
    fn only_unknown_symbols_give_empty_watchlist() {
        let backend = backend_with(&[(LEGACY_SYMBOLS_KEY, r#"["NOPE"]"#)]);
        let store = WatchlistStore::open(backend.clone());
        assert_eq!(
            store.init_outcome(),
            &InitOutcome::MigratedSymbols {
                imported: 0,
                dropped: 1
            }
        );
        assert!(store.active_items().is_empty());
        assert!(!backend.contains(LEGACY_SYMBOLS_KEY).unwrap());
    }

    #[test]
    fn empty_symbol_list_is_ignored() {
        let backend = backend_with(&[(LEGACY_SYMBOLS_KEY, "[]")]);
        let store = WatchlistStore::open(backend.clone());
        assert_eq!(store.init_outcome(), &InitOutcome::Seeded);
        assert!(!backend.contains(LEGACY_SYMBOLS_KEY).unwrap());
    }

    #[test]
    fn unreadable_symbol_list_falls_through() {
        let backend = backend_with(&[(LEGACY_SYMBOLS_KEY, "{broken")]);
        let store = WatchlistStore::open(backend);
        assert_eq!(store.init_outcome(), &InitOutcome::Seeded);
    }

    #[test]
    fn symbols_take_precedence_over_item_records() {
        let backend = backend_with(&[
            (LEGACY_SYMBOLS_KEY, r#"["NVDA"]"#),
            (LEGACY_ITEMS_KEY, LEGACY_ITEMS),
        ]);
        let store = WatchlistStore::open(backend.clone());
        assert_eq!(active_symbols(&store), vec!["NVDA"]);
        assert!(backend.keys().unwrap().iter().all(|k| k != LEGACY_ITEMS_KEY));
    }
}

// ═══════════════════════════════════════════════════════════════════
// Single-list item records
// ═══════════════════════════════════════════════════════════════════

mod item_records {
    use super::*;

    #[test]
    fn imports_records_with_parsed_numbers() {
        let backend = backend_with(&[(LEGACY_ITEMS_KEY, LEGACY_ITEMS)]);
        let store = WatchlistStore::open(backend.clone());

        assert_eq!(
            store.init_outcome(),
            &InitOutcome::MigratedItems { imported: 2 }
        );
        assert_eq!(active_symbols(&store), vec!["SAP", "VOW3"]);

        let vow = &store.active_items()[1];
        assert_eq!(vow.price, 112.45);
        assert_eq!(vow.change_percent, -2.04);
        assert!(!vow.is_positive);
        assert!(!backend.contains(LEGACY_ITEMS_KEY).unwrap());
    }

    #[test]
    fn unreadable_records_fall_through_to_seed() {
        let backend = backend_with(&[(LEGACY_ITEMS_KEY, r#"[{"symbol":1}]"#)]);
        let store = WatchlistStore::open(backend);
        assert_eq!(store.init_outcome(), &InitOutcome::Seeded);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Loading persisted state
// ═══════════════════════════════════════════════════════════════════

mod loading {
    use super::*;

    #[test]
    fn dangling_active_id_is_repaired() {
        let backend = MemoryStore::new();
        let mut store = WatchlistStore::open(backend.clone());
        let first = store.active_watchlist_id();
        let second = store.create_watchlist("Second", None).unwrap();
        store.switch_active(second).unwrap();
        drop(store);

        let mut raw = backend.clone();
        let stray = Uuid::new_v4();
        raw.set(ACTIVE_WATCHLIST_KEY, format!("\"{stray}\"").as_bytes())
            .unwrap();

        let store = WatchlistStore::open(backend.clone());
        assert_eq!(store.init_outcome(), &InitOutcome::Loaded);
        assert_eq!(store.active_watchlist_id(), first);
        assert_eq!(
            backend.get(ACTIVE_WATCHLIST_KEY).unwrap(),
            Some(format!("\"{first}\"").into_bytes())
        );
    }

    #[test]
    fn missing_active_id_falls_back_to_first() {
        let backend = MemoryStore::new();
        let mut store = WatchlistStore::open(backend.clone());
        let first = store.active_watchlist_id();
        store.create_watchlist("Second", None).unwrap();
        drop(store);

        let mut raw = backend.clone();
        raw.remove(ACTIVE_WATCHLIST_KEY).unwrap();

        let store = WatchlistStore::open(backend);
        assert_eq!(store.active_watchlist_id(), first);
        assert_eq!(store.watchlist_count(), 2);
    }

    #[test]
    fn corrupt_state_is_replaced() {
        let backend = backend_with(&[(WATCHLISTS_KEY, "this is not json")]);
        let store = WatchlistStore::open(backend.clone());
        assert_eq!(store.init_outcome(), &InitOutcome::Seeded);
        assert_eq!(store.watchlist_count(), 1);

        let reopened = WatchlistStore::open(backend);
        assert_eq!(reopened.init_outcome(), &InitOutcome::Loaded);
    }

    #[test]
    fn corrupt_state_falls_back_to_legacy_symbols() {
        let backend = backend_with(&[
            (WATCHLISTS_KEY, "[{\"id\":"),
            (LEGACY_SYMBOLS_KEY, r#"["ALV"]"#),
        ]);
        let store = WatchlistStore::open(backend);
        assert!(matches!(
            store.init_outcome(),
            InitOutcome::MigratedSymbols { imported: 1, .. }
        ));
        assert_eq!(active_symbols(&store), vec!["ALV"]);
    }

    #[test]
    fn stale_legacy_artifacts_are_removed() {
        let backend = MemoryStore::new();
        let store = WatchlistStore::open(backend.clone());
        let snapshot = store.snapshot();
        drop(store);

        let mut raw = backend.clone();
        raw.set(LEGACY_SYMBOLS_KEY, br#"["TSLA"]"#).unwrap();
        raw.set(LEGACY_ITEMS_KEY, LEGACY_ITEMS.as_bytes()).unwrap();

        let store = WatchlistStore::open(backend.clone());
        assert_eq!(store.init_outcome(), &InitOutcome::Loaded);
        assert_eq!(store.snapshot(), snapshot);
        assert_eq!(
            backend.keys().unwrap(),
            vec![ACTIVE_WATCHLIST_KEY.to_string(), WATCHLISTS_KEY.to_string()]
        );
    }
}
