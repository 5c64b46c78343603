//! Client-side lead filtering
//!
//! Filtering is a pure function over already-fetched leads. Matching is
//! case-insensitive substring containment; an absent or empty criterion
//! always matches.

use crate::{Lead, LeadField};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Filter criteria. `search_term` is matched against the searchable fields
/// (any of them); every other criterion is matched against its own field.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct LeadFilters {
    pub search_term: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub work_phone: Option<String>,
    pub cell_phone_1: Option<String>,
    pub home_phone: Option<String>,
    pub source: Option<String>,
    pub lead_type: Option<String>,
    pub remarks: Option<String>,
    pub called_by: Option<String>,
}

impl LeadFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search_term: Some(term.into()),
            ..Self::default()
        }
    }

    /// Field-specific criteria paired with their field.
    pub fn criteria(&self) -> [(LeadField, Option<&str>); 9] {
        [
            (LeadField::FirstName, self.first_name.as_deref()),
            (LeadField::LastName, self.last_name.as_deref()),
            (LeadField::WorkPhone, self.work_phone.as_deref()),
            (LeadField::CellPhone1, self.cell_phone_1.as_deref()),
            (LeadField::HomePhone, self.home_phone.as_deref()),
            (LeadField::Source, self.source.as_deref()),
            (LeadField::LeadType, self.lead_type.as_deref()),
            (LeadField::Remarks, self.remarks.as_deref()),
            (LeadField::CalledBy, self.called_by.as_deref()),
        ]
    }

    /// Set the criterion for a filterable field. Blank values clear it.
    /// Returns `false` when the field is not filterable.
    pub fn set(&mut self, field: LeadField, value: impl Into<String>) -> bool {
        let value = Some(value.into()).filter(|v| !v.is_empty());
        let slot = match field {
            LeadField::FirstName => &mut self.first_name,
            LeadField::LastName => &mut self.last_name,
            LeadField::WorkPhone => &mut self.work_phone,
            LeadField::CellPhone1 => &mut self.cell_phone_1,
            LeadField::HomePhone => &mut self.home_phone,
            LeadField::Source => &mut self.source,
            LeadField::LeadType => &mut self.lead_type,
            LeadField::Remarks => &mut self.remarks,
            LeadField::CalledBy => &mut self.called_by,
            _ => return false,
        };
        *slot = value;
        true
    }

    /// True when any criterion, including the search term, is non-empty.
    pub fn is_active(&self) -> bool {
        is_present(self.search_term.as_deref())
            || self.criteria().iter().any(|(_, value)| is_present(*value))
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn matches(&self, lead: &Lead) -> bool {
        if let Some(term) = self.search_term.as_deref().filter(|t| !t.is_empty()) {
            let needle = term.to_lowercase();
            let hit = LeadField::SEARCHABLE
                .iter()
                .any(|field| field_contains(lead, *field, &needle));
            if !hit {
                return false;
            }
        }

        self.criteria().iter().all(|(field, value)| match value {
            Some(value) if !value.is_empty() => field_contains(lead, *field, &value.to_lowercase()),
            _ => true,
        })
    }
}

/// Leads matching every criterion, in their original order.
pub fn filter_leads<'a>(leads: &'a [Lead], filters: &LeadFilters) -> Vec<&'a Lead> {
    leads.iter().filter(|lead| filters.matches(lead)).collect()
}

/// Sorted distinct non-empty values of a field, for filter option lists.
pub fn distinct_values(leads: &[Lead], field: LeadField) -> Vec<String> {
    leads
        .iter()
        .filter_map(|lead| lead.field_text(field))
        .filter(|value| !value.is_empty())
        .map(|value| value.into_owned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Suggestions for a called-by input: names containing the input,
/// excluding one that already equals it. Empty input suggests nothing.
pub fn suggest_called_by<'a>(names: &'a [String], input: &str) -> Vec<&'a str> {
    if input.is_empty() {
        return Vec::new();
    }
    let needle = input.to_lowercase();
    names
        .iter()
        .map(String::as_str)
        .filter(|name| {
            let lowered = name.to_lowercase();
            lowered.contains(&needle) && lowered != needle
        })
        .collect()
}

fn field_contains(lead: &Lead, field: LeadField, needle: &str) -> bool {
    lead.field_text(field)
        .map(|value| value.to_lowercase().contains(needle))
        .unwrap_or(false)
}

fn is_present(value: Option<&str>) -> bool {
    value.map(|v| !v.is_empty()).unwrap_or(false)
}
