//! Property-based tests for filtering, patches and import.

use chrono::Utc;
use leadbook_core::{
    filter_leads, join_links, parse_leads_csv, split_links, CalledByUser, ContactDetails, Lead,
    LeadField, LeadFilters, LeadId, LeadPatch, PipelineKind, PipelinePayload, Remark,
};
use proptest::prelude::*;
use serde_json::Value;

fn remark_strategy() -> impl Strategy<Value = Remark> {
    prop::sample::select(Remark::ALL.to_vec())
}

fn lead_strategy() -> impl Strategy<Value = Lead> {
    (
        "[A-Za-z]{1,8}",
        prop::option::of("[A-Za-z]{1,8}"),
        prop::option::of("[a-z]{1,6}"),
        prop::option::of("[0-9]{3}-[0-9]{4}"),
        remark_strategy(),
    )
        .prop_map(|(first, last, source, phone, remarks)| Lead {
            id: LeadId::now_v7(),
            first_name: first,
            last_name: last,
            contact: ContactDetails {
                work_phone: phone,
                ..ContactDetails::default()
            },
            source,
            lead_type: None,
            remarks,
            called_by: None,
            last_contact: None,
            pipeline: PipelinePayload::empty(remarks.pipeline_kind()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Empty criteria keep every lead in its original order.
    #[test]
    fn prop_empty_filters_are_identity(leads in prop::collection::vec(lead_strategy(), 0..20)) {
        let hits = filter_leads(&leads, &LeadFilters::new());
        prop_assert_eq!(hits.len(), leads.len());
        for (hit, lead) in hits.iter().zip(leads.iter()) {
            prop_assert_eq!(hit.id, lead.id);
        }
    }

    /// Filtered results are an order-preserving subset where every hit
    /// contains the criterion, ignoring case.
    #[test]
    fn prop_filter_results_match_criterion(
        leads in prop::collection::vec(lead_strategy(), 0..20),
        needle in "[a-z]{1,2}",
    ) {
        let mut filters = LeadFilters::new();
        filters.set(LeadField::FirstName, needle.clone());
        let hits = filter_leads(&leads, &filters);

        let mut cursor = 0;
        for hit in &hits {
            prop_assert!(hit.first_name.to_lowercase().contains(&needle));
            let position = leads[cursor..].iter().position(|lead| lead.id == hit.id);
            prop_assert!(position.is_some());
            cursor += position.unwrap_or(0) + 1;
        }
        let expected = leads
            .iter()
            .filter(|lead| lead.first_name.to_lowercase().contains(&needle))
            .count();
        prop_assert_eq!(hits.len(), expected);
    }

    /// Blank patch values always clear the column.
    #[test]
    fn prop_blank_patch_values_become_null(blank in "[ \t]{0,4}") {
        let patch = LeadPatch::new().set(LeadField::Source, &blank).unwrap();
        prop_assert_eq!(patch.get(LeadField::Source), Some(None));
        prop_assert_eq!(&patch.to_row()["source"], &Value::Null);
    }

    /// Joined links split back into the same list.
    #[test]
    fn prop_links_survive_join(links in prop::collection::vec("[a-z]{1,6}\\.example", 0..5)) {
        prop_assert_eq!(split_links(&join_links(&links)), links);
    }

    /// Unseen names never repeat and never include known ones.
    #[test]
    fn prop_unseen_names_are_unique(
        known in prop::collection::vec("[A-C][a-c]{0,2}", 0..5),
        candidates in prop::collection::vec("[A-C][a-c]{0,2}", 0..10),
    ) {
        let unseen = CalledByUser::unseen(&known, candidates.iter().map(String::as_str));
        for (index, name) in unseen.iter().enumerate() {
            prop_assert!(!known.contains(name));
            prop_assert!(!unseen[index + 1..].contains(name));
        }
    }

    /// Every imported contact row carries a contact-pipeline status.
    #[test]
    fn prop_import_statuses_stay_in_pipeline(
        remarks in prop::collection::vec(prop::sample::select(vec![
            "Leads", "Approved", "Decline", "No Answer", "Lead 1", "Lead 2", "Hot", "",
        ]), 1..10),
    ) {
        let mut csv = String::from("First Name,Last Name,Remarks\n");
        for (index, remark) in remarks.iter().enumerate() {
            csv.push_str(&format!("Name{},Last{},{}\n", index, index, remark));
        }
        let import = parse_leads_csv(csv.as_bytes(), PipelineKind::Contact, Remark::Leads).unwrap();
        prop_assert_eq!(import.drafts.len(), remarks.len());
        for draft in &import.drafts {
            prop_assert!(PipelineKind::Contact.contains(draft.remarks));
        }
    }
}
