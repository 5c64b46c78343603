//! Leadbook Test Utilities
//!
//! Shared generators, fixtures, and assertions for testing the Leadbook
//! crates. The in-memory [`MockRecordStore`] is re-exported so tests only
//! need this crate and the crate under test.

// Re-export commonly used items
pub use leadbook_core::*;
pub use leadbook_storage::{
    MockRecordStore, Query, RecordStore, StoreCall, StoreOperation, StoreResult, Table,
};

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    use super::*;
    use proptest::prelude::*;

    pub fn arb_remark() -> impl Strategy<Value = Remark> {
        proptest::sample::select(Remark::ALL.to_vec())
    }

    pub fn arb_contact_remark() -> impl Strategy<Value = Remark> {
        proptest::sample::select(PipelineKind::Contact.statuses().to_vec())
    }

    pub fn arb_pipeline() -> impl Strategy<Value = PipelineKind> {
        prop_oneof![Just(PipelineKind::Contact), Just(PipelineKind::Property)]
    }

    pub fn arb_name() -> impl Strategy<Value = String> {
        "[A-Z][a-z]{1,11}"
    }

    pub fn arb_phone() -> impl Strategy<Value = String> {
        "[0-9]{3}-[0-9]{3}-[0-9]{4}"
    }

    pub fn arb_lead_id() -> impl Strategy<Value = LeadId> {
        any::<[u8; 16]>().prop_map(|bytes| LeadId::new(uuid::Uuid::from_bytes(bytes)))
    }

    pub fn arb_timestamp() -> impl Strategy<Value = Timestamp> {
        // 2020-01-01 .. 2030-01-01
        (1_577_836_800i64..1_893_456_000i64).prop_map(|secs| {
            chrono::DateTime::from_timestamp(secs, 0).unwrap_or_default()
        })
    }

    /// Valid drafts with a mix of optional contact fields.
    pub fn arb_lead_draft() -> impl Strategy<Value = LeadDraft> {
        (
            arb_name(),
            proptest::option::of(arb_name()),
            arb_remark(),
            proptest::option::of(arb_name()),
            proptest::option::of(arb_phone()),
            proptest::option::of("(web|referral|cold call)"),
        )
            .prop_map(|(first, last, remark, called_by, phone, source)| {
                let mut draft = LeadDraft::new(first, remark);
                draft.last_name = last;
                draft.called_by = called_by;
                draft.contact.work_phone = phone;
                draft.source = source;
                draft
            })
    }

    /// Stored leads, as they come back from the record store.
    pub fn arb_lead() -> impl Strategy<Value = Lead> {
        (arb_lead_id(), arb_lead_draft(), arb_timestamp()).prop_map(|(id, draft, created_at)| {
            Lead {
                id,
                first_name: draft.first_name,
                last_name: draft.last_name,
                contact: draft.contact,
                source: draft.source,
                lead_type: draft.lead_type,
                remarks: draft.remarks,
                called_by: draft.called_by,
                last_contact: draft.last_contact,
                pipeline: draft.pipeline,
                created_at,
                updated_at: created_at,
            }
        })
    }

    pub fn arb_filters() -> impl Strategy<Value = LeadFilters> {
        (
            proptest::option::of("[a-z]{1,3}"),
            proptest::option::of("[a-z]{1,3}"),
            proptest::option::of("[a-z]{1,3}"),
        )
            .prop_map(|(search_term, first_name, called_by)| LeadFilters {
                search_term,
                first_name,
                called_by,
                ..LeadFilters::default()
            })
    }
}

// ============================================================================
// TEST FIXTURES
// ============================================================================

pub mod fixtures {
    use super::*;
    use serde_json::Value;

    pub const KNOWN_USERS: [&str; 3] = ["Alice", "Bob", "Carol"];

    pub fn known_users() -> Vec<String> {
        KNOWN_USERS.iter().map(|name| name.to_string()).collect()
    }

    pub fn alice() -> User {
        User::new("Alice").unwrap_or_else(|| unreachable!("fixture name is not blank"))
    }

    pub fn jane_doe() -> LeadDraft {
        LeadDraft::new("Jane", Remark::Leads).with_last_name("Doe")
    }

    /// Contact drafts spread over the contact statuses, with two callers.
    pub fn contact_drafts() -> Vec<LeadDraft> {
        let mut john = LeadDraft::new("John", Remark::Approved)
            .with_last_name("Smith")
            .with_called_by("Mike");
        john.source = Some("Referral".to_string());
        john.contact.work_phone = Some("555-0101".to_string());

        let mut ann = LeadDraft::new("Ann", Remark::Leads)
            .with_last_name("Lee")
            .with_called_by("Sara");
        ann.source = Some("Web".to_string());
        ann.contact.email = Some("ann@example.com".to_string());

        vec![jane_doe(), john, ann]
    }

    pub fn property_draft() -> LeadDraft {
        let mut draft = LeadDraft::new("Tom", Remark::Lead1).with_last_name("Baker");
        for (field, value) in [
            (LeadField::PropertyAddress, "12 Elm St"),
            (LeadField::City, "Austin"),
            (LeadField::State, "TX"),
            (LeadField::ZipCode, "73301"),
            (LeadField::Links, "https://example.com/a, https://example.com/b"),
        ] {
            if let Err(err) = draft.set_field(field, value) {
                unreachable!("fixture value for {field} rejected: {err}");
            }
        }
        draft
    }

    /// A store seeded with `drafts` (and their called-by names), with the
    /// call log cleared. Returns the stored lead rows in insertion order.
    pub async fn seeded_store(drafts: &[LeadDraft]) -> (MockRecordStore, Vec<Value>) {
        let store = MockRecordStore::new();
        let mut names: Vec<&str> = drafts
            .iter()
            .filter_map(|draft| draft.called_by.as_deref())
            .collect();
        names.sort_unstable();
        names.dedup();
        if !names.is_empty() {
            let rows = names
                .iter()
                .map(|name| serde_json::json!({ "name": name }))
                .collect();
            if let Err(err) = store.insert(Table::CalledByUsers, rows).await {
                panic!("seeding called_by_users failed: {err}");
            }
        }
        let rows = drafts.iter().map(LeadDraft::to_row).collect();
        let stored = match store.insert(Table::Leads, rows).await {
            Ok(stored) => stored,
            Err(err) => panic!("seeding leads failed: {err}"),
        };
        store.clear_calls();
        (store, stored)
    }

    /// Id of a stored lead row.
    pub fn row_lead_id(row: &Value) -> LeadId {
        row.get("id")
            .and_then(Value::as_str)
            .and_then(|id| id.parse().ok())
            .unwrap_or_else(|| panic!("row has no lead id: {row}"))
    }

    pub const CONTACT_CSV: &str = "\
First Name,Last Name,Work Phone,Source,Called By
Jane,Doe,555-0100,Web,Mike
John,Smith,555-0101,Referral,Sara
";

    pub const PROPERTY_CSV: &str = "\
Full Name,Property Address,City,State,Zip Code,Links
Tom Baker,12 Elm St,Austin,TX,73301,https://example.com/a
";

    pub fn sample_config_toml(session_path: &str) -> String {
        format!(
            r#"
store_url = "https://leads.example.com"
session_path = "{session_path}"
known_users = ["Alice", "Bob", "Carol"]

[auth]
api_key = "anon-key"

[logging]
filter = "info"
format = "text"
"#
        )
    }
}

// ============================================================================
// ASSERTION HELPERS
// ============================================================================

pub mod assertions {
    use super::*;

    /// Assert that a store result is an injected failure.
    #[track_caller]
    pub fn assert_injected<T: std::fmt::Debug>(result: &StoreResult<T>) {
        match result {
            Err(StoreError::Injected { .. }) => {}
            other => panic!("Expected injected failure, got {:?}", other),
        }
    }

    /// Assert that a store result is a NotFound error.
    #[track_caller]
    pub fn assert_not_found<T: std::fmt::Debug>(result: &StoreResult<T>) {
        match result {
            Err(StoreError::NotFound { .. }) => {}
            other => panic!("Expected NotFound error, got {:?}", other),
        }
    }

    /// Assert that leads are ordered newest first.
    #[track_caller]
    pub fn assert_newest_first(leads: &[Lead]) {
        for pair in leads.windows(2) {
            assert!(
                pair[0].created_at >= pair[1].created_at,
                "lead {} is older than the lead after it",
                pair[0].id
            );
        }
    }

    /// Assert that no write reached the store.
    #[track_caller]
    pub fn assert_no_writes(store: &MockRecordStore) {
        let writes: Vec<StoreCall> = store
            .calls()
            .into_iter()
            .filter(|call| call.operation != StoreOperation::Select)
            .collect();
        assert!(writes.is_empty(), "Expected no writes, got {:?}", writes);
    }
}
