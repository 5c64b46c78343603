//! Core record structures
//!
//! A [`Lead`] is a common envelope plus a pipeline payload. On the wire it is
//! the flat [`LeadRow`] the `leads` table stores; conversion in both
//! directions goes through `serde(try_from, into)` so every decoded lead has
//! a known status and a non-blank first name.

use crate::{LeadField, LeadId, NoteId, PipelineKind, Remark, Timestamp, User, ValidationError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::collections::{BTreeMap, HashSet};

// ============================================================================
// LEAD
// ============================================================================

/// Phone and email details shared by both pipelines.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContactDetails {
    pub email: Option<String>,
    pub work_phone: Option<String>,
    pub home_phone: Option<String>,
    pub cell_phone_1: Option<String>,
    pub cell_phone_2: Option<String>,
}

/// Extra fields carried by property-pipeline leads.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PropertyDetails {
    pub property_address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub links: Vec<String>,
}

/// Pipeline-specific payload, selected by [`PipelineKind`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "pipeline_kind", rename_all = "snake_case")]
pub enum PipelinePayload {
    Contact,
    Property(PropertyDetails),
}

impl PipelinePayload {
    /// Empty payload for a pipeline.
    pub fn empty(kind: PipelineKind) -> Self {
        match kind {
            PipelineKind::Contact => PipelinePayload::Contact,
            PipelineKind::Property => PipelinePayload::Property(PropertyDetails::default()),
        }
    }

    pub fn kind(&self) -> PipelineKind {
        match self {
            PipelinePayload::Contact => PipelineKind::Contact,
            PipelinePayload::Property(_) => PipelineKind::Property,
        }
    }

    pub fn property(&self) -> Option<&PropertyDetails> {
        match self {
            PipelinePayload::Property(details) => Some(details),
            PipelinePayload::Contact => None,
        }
    }

    fn property_mut(&mut self) -> &mut PropertyDetails {
        if let PipelinePayload::Contact = self {
            *self = PipelinePayload::Property(PropertyDetails::default());
        }
        match self {
            PipelinePayload::Property(details) => details,
            PipelinePayload::Contact => unreachable!("payload was promoted above"),
        }
    }
}

/// A sales contact tracked through one of the status pipelines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "LeadRow", into = "LeadRow")]
pub struct Lead {
    pub id: LeadId,
    pub first_name: String,
    pub last_name: Option<String>,
    pub contact: ContactDetails,
    pub source: Option<String>,
    pub lead_type: Option<String>,
    pub remarks: Remark,
    pub called_by: Option<String>,
    pub last_contact: Option<String>,
    pub pipeline: PipelinePayload,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Lead {
    pub fn pipeline_kind(&self) -> PipelineKind {
        self.pipeline.kind()
    }

    /// First and last name joined by a space.
    pub fn full_name(&self) -> String {
        match self.last_name.as_deref() {
            Some(last) if !last.is_empty() => format!("{} {}", self.first_name, last),
            _ => self.first_name.clone(),
        }
    }

    /// Text value of a field, or `None` when the field is unset or does not
    /// exist on this lead's pipeline.
    pub fn field_text(&self, field: LeadField) -> Option<Cow<'_, str>> {
        let property = self.pipeline.property();
        match field {
            LeadField::FirstName => Some(Cow::Borrowed(self.first_name.as_str())),
            LeadField::LastName => borrowed(&self.last_name),
            LeadField::Email => borrowed(&self.contact.email),
            LeadField::WorkPhone => borrowed(&self.contact.work_phone),
            LeadField::CellPhone1 => borrowed(&self.contact.cell_phone_1),
            LeadField::HomePhone => borrowed(&self.contact.home_phone),
            LeadField::CellPhone2 => borrowed(&self.contact.cell_phone_2),
            LeadField::Source => borrowed(&self.source),
            LeadField::LeadType => borrowed(&self.lead_type),
            LeadField::Remarks => Some(Cow::Borrowed(self.remarks.as_db_str())),
            LeadField::CalledBy => borrowed(&self.called_by),
            LeadField::LastContact => borrowed(&self.last_contact),
            LeadField::PropertyAddress => property.and_then(|p| borrowed(&p.property_address)),
            LeadField::City => property.and_then(|p| borrowed(&p.city)),
            LeadField::State => property.and_then(|p| borrowed(&p.state)),
            LeadField::ZipCode => property.and_then(|p| borrowed(&p.zip_code)),
            LeadField::Links => property
                .filter(|p| !p.links.is_empty())
                .map(|p| Cow::Owned(join_links(&p.links))),
        }
    }
}

/// Flat wire representation of a row in the `leads` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadRow {
    pub id: LeadId,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub emailaddress: Option<String>,
    pub workphone: Option<String>,
    pub cellphone1: Option<String>,
    pub homephone: Option<String>,
    pub cellphone2: Option<String>,
    pub source: Option<String>,
    pub leadtype: Option<String>,
    pub remarks: Option<String>,
    pub lastcontact: Option<String>,
    pub calledby: Option<String>,
    pub property_address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub link: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<LeadRow> for Lead {
    type Error = ValidationError;

    fn try_from(row: LeadRow) -> Result<Self, Self::Error> {
        let first_name = non_blank(row.firstname).ok_or_else(|| {
            ValidationError::RequiredFieldMissing {
                field: LeadField::FirstName.column().to_string(),
            }
        })?;
        let remark_text = row.remarks.ok_or_else(|| ValidationError::RequiredFieldMissing {
            field: LeadField::Remarks.column().to_string(),
        })?;
        let remarks = Remark::from_db_str(&remark_text)
            .map_err(|_| ValidationError::UnknownRemark { value: remark_text })?;

        let pipeline = match remarks.pipeline_kind() {
            PipelineKind::Contact => PipelinePayload::Contact,
            PipelineKind::Property => PipelinePayload::Property(PropertyDetails {
                property_address: row.property_address,
                city: row.city,
                state: row.state,
                zip_code: row.zip_code,
                links: row.link.as_deref().map(split_links).unwrap_or_default(),
            }),
        };

        Ok(Lead {
            id: row.id,
            first_name,
            last_name: row.lastname,
            contact: ContactDetails {
                email: row.emailaddress,
                work_phone: row.workphone,
                home_phone: row.homephone,
                cell_phone_1: row.cellphone1,
                cell_phone_2: row.cellphone2,
            },
            source: row.source,
            lead_type: row.leadtype,
            remarks,
            called_by: row.calledby,
            last_contact: row.lastcontact,
            pipeline,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl From<Lead> for LeadRow {
    fn from(lead: Lead) -> Self {
        let property = match lead.pipeline {
            PipelinePayload::Property(details) => details,
            PipelinePayload::Contact => PropertyDetails::default(),
        };
        LeadRow {
            id: lead.id,
            firstname: Some(lead.first_name),
            lastname: lead.last_name,
            emailaddress: lead.contact.email,
            workphone: lead.contact.work_phone,
            cellphone1: lead.contact.cell_phone_1,
            homephone: lead.contact.home_phone,
            cellphone2: lead.contact.cell_phone_2,
            source: lead.source,
            leadtype: lead.lead_type,
            remarks: Some(lead.remarks.as_db_str().to_string()),
            lastcontact: lead.last_contact,
            calledby: lead.called_by,
            property_address: property.property_address,
            city: property.city,
            state: property.state,
            zip_code: property.zip_code,
            link: if property.links.is_empty() {
                None
            } else {
                Some(join_links(&property.links))
            },
            created_at: lead.created_at,
            updated_at: lead.updated_at,
        }
    }
}

// ============================================================================
// INSERT AND UPDATE PAYLOADS
// ============================================================================

/// A lead that has not been stored yet. The store assigns id and timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadDraft {
    pub first_name: String,
    pub last_name: Option<String>,
    pub contact: ContactDetails,
    pub source: Option<String>,
    pub lead_type: Option<String>,
    pub remarks: Remark,
    pub called_by: Option<String>,
    pub last_contact: Option<String>,
    pub pipeline: PipelinePayload,
}

impl LeadDraft {
    /// Start a draft with the payload matching the status's pipeline.
    pub fn new(first_name: impl Into<String>, remarks: Remark) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: None,
            contact: ContactDetails::default(),
            source: None,
            lead_type: None,
            remarks,
            called_by: None,
            last_contact: None,
            pipeline: PipelinePayload::empty(remarks.pipeline_kind()),
        }
    }

    pub fn with_last_name(mut self, last_name: impl Into<String>) -> Self {
        self.last_name = non_blank(Some(last_name.into()));
        self
    }

    pub fn with_called_by(mut self, called_by: impl Into<String>) -> Self {
        self.called_by = non_blank(Some(called_by.into()));
        self
    }

    /// Set one field from its text form. Blank text clears optional fields.
    /// Property fields promote the payload to the property pipeline.
    pub fn set_field(&mut self, field: LeadField, value: &str) -> Result<(), ValidationError> {
        let text = non_blank(Some(value.to_string()));
        match field {
            LeadField::FirstName => self.first_name = text.unwrap_or_default(),
            LeadField::LastName => self.last_name = text,
            LeadField::Email => self.contact.email = text,
            LeadField::WorkPhone => self.contact.work_phone = text,
            LeadField::CellPhone1 => self.contact.cell_phone_1 = text,
            LeadField::HomePhone => self.contact.home_phone = text,
            LeadField::CellPhone2 => self.contact.cell_phone_2 = text,
            LeadField::Source => self.source = text,
            LeadField::LeadType => self.lead_type = text,
            LeadField::Remarks => self.remarks = parse_remark(value)?,
            LeadField::CalledBy => self.called_by = text,
            LeadField::LastContact => self.last_contact = text,
            LeadField::PropertyAddress => self.pipeline.property_mut().property_address = text,
            LeadField::City => self.pipeline.property_mut().city = text,
            LeadField::State => self.pipeline.property_mut().state = text,
            LeadField::ZipCode => self.pipeline.property_mut().zip_code = text,
            LeadField::Links => self.pipeline.property_mut().links = split_links(value),
        }
        Ok(())
    }

    /// Check the record invariants before it is sent anywhere.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.first_name.trim().is_empty() {
            return Err(ValidationError::RequiredFieldMissing {
                field: LeadField::FirstName.column().to_string(),
            });
        }
        if self.pipeline.kind() == PipelineKind::Property
            && self.remarks.pipeline_kind() != PipelineKind::Property
        {
            return Err(ValidationError::InvalidValue {
                field: LeadField::Remarks.column().to_string(),
                reason: format!(
                    "status '{}' does not belong to the property pipeline",
                    self.remarks
                ),
            });
        }
        Ok(())
    }

    /// Row payload for an insert. Unset columns are omitted.
    pub fn to_row(&self) -> Value {
        let mut row = Map::new();
        let mut put = |field: LeadField, value: Option<&str>| {
            if let Some(value) = value {
                row.insert(field.column().to_string(), Value::String(value.to_string()));
            }
        };
        put(LeadField::FirstName, Some(self.first_name.trim()));
        put(LeadField::LastName, self.last_name.as_deref());
        put(LeadField::Email, self.contact.email.as_deref());
        put(LeadField::WorkPhone, self.contact.work_phone.as_deref());
        put(LeadField::CellPhone1, self.contact.cell_phone_1.as_deref());
        put(LeadField::HomePhone, self.contact.home_phone.as_deref());
        put(LeadField::CellPhone2, self.contact.cell_phone_2.as_deref());
        put(LeadField::Source, self.source.as_deref());
        put(LeadField::LeadType, self.lead_type.as_deref());
        put(LeadField::Remarks, Some(self.remarks.as_db_str()));
        put(LeadField::CalledBy, self.called_by.as_deref());
        put(LeadField::LastContact, self.last_contact.as_deref());
        if let Some(details) = self.pipeline.property() {
            put(LeadField::PropertyAddress, details.property_address.as_deref());
            put(LeadField::City, details.city.as_deref());
            put(LeadField::State, details.state.as_deref());
            put(LeadField::ZipCode, details.zip_code.as_deref());
            if !details.links.is_empty() {
                put(LeadField::Links, Some(join_links(&details.links).as_str()));
            }
        }
        Value::Object(row)
    }
}

/// Partial update of a stored lead.
///
/// Values are normalised when set: blank text becomes a `null` column,
/// statuses are checked against the enumeration and link lists are
/// re-joined. A blank first name is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LeadPatch {
    values: BTreeMap<LeadField, Option<String>>,
}

impl LeadPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, field: LeadField, value: impl AsRef<str>) -> Result<Self, ValidationError> {
        let value = value.as_ref();
        let normalized = match field {
            LeadField::FirstName => Some(
                non_blank(Some(value.to_string())).ok_or_else(|| {
                    ValidationError::RequiredFieldMissing {
                        field: field.column().to_string(),
                    }
                })?,
            ),
            LeadField::Remarks => Some(parse_remark(value)?.as_db_str().to_string()),
            LeadField::Links => {
                let links = split_links(value);
                if links.is_empty() {
                    None
                } else {
                    Some(join_links(&links))
                }
            }
            _ => non_blank(Some(value.to_string())),
        };
        self.values.insert(field, normalized);
        Ok(self)
    }

    pub fn with_remarks(mut self, remarks: Remark) -> Self {
        self.values
            .insert(LeadField::Remarks, Some(remarks.as_db_str().to_string()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Normalised value for a field, `Some(None)` when the patch clears it.
    pub fn get(&self, field: LeadField) -> Option<Option<&str>> {
        self.values.get(&field).map(|value| value.as_deref())
    }

    pub fn remarks(&self) -> Option<Remark> {
        self.get(LeadField::Remarks)
            .flatten()
            .and_then(|value| Remark::from_db_str(value).ok())
    }

    /// Non-blank called-by name this patch introduces, if any.
    pub fn called_by(&self) -> Option<&str> {
        self.get(LeadField::CalledBy).flatten()
    }

    pub fn fields(&self) -> impl Iterator<Item = LeadField> + '_ {
        self.values.keys().copied()
    }

    /// Row payload for an update. Cleared fields are sent as `null`.
    pub fn to_row(&self) -> Value {
        let row: Map<String, Value> = self
            .values
            .iter()
            .map(|(field, value)| {
                let value = value
                    .as_ref()
                    .map(|text| Value::String(text.clone()))
                    .unwrap_or(Value::Null);
                (field.column().to_string(), value)
            })
            .collect();
        Value::Object(row)
    }
}

// ============================================================================
// NOTES
// ============================================================================

/// Free-text note attached to a lead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadNote {
    pub id: NoteId,
    pub lead_id: LeadId,
    pub content: String,
    #[serde(default)]
    pub user_name: Option<String>,
    pub created_at: Timestamp,
}

impl LeadNote {
    /// Only the author edits or deletes a note. The store does not enforce
    /// this; callers consult it before offering the action.
    pub fn is_editable_by(&self, user: &User) -> bool {
        self.user_name.as_deref() == Some(user.name())
    }
}

/// Insert payload for a note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteDraft {
    pub lead_id: LeadId,
    pub content: String,
    pub user_name: String,
}

impl NoteDraft {
    pub fn new(lead_id: LeadId, content: &str, author: &User) -> Result<Self, ValidationError> {
        Ok(Self {
            lead_id,
            content: note_content(content)?,
            user_name: author.name().to_string(),
        })
    }

    /// Row payload for an insert.
    pub fn to_row(&self) -> Value {
        let mut row = Map::new();
        row.insert("lead_id".to_string(), Value::String(self.lead_id.to_string()));
        row.insert("content".to_string(), Value::String(self.content.clone()));
        row.insert("user_name".to_string(), Value::String(self.user_name.clone()));
        Value::Object(row)
    }
}

/// Trimmed note content, rejecting blank text.
pub fn note_content(content: &str) -> Result<String, ValidationError> {
    non_blank(Some(content.to_string())).ok_or_else(|| ValidationError::RequiredFieldMissing {
        field: "content".to_string(),
    })
}

// ============================================================================
// CALLED-BY DIRECTORY
// ============================================================================

/// Entry of the append-only `called_by_users` suggestion list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalledByUser {
    pub name: String,
}

impl CalledByUser {
    /// Names among `candidates` that are not in `known`, trimmed, blank
    /// names dropped, each reported once in first-seen order.
    pub fn unseen<'a>(
        known: &[String],
        candidates: impl IntoIterator<Item = &'a str>,
    ) -> Vec<String> {
        let mut seen: HashSet<&str> = known.iter().map(String::as_str).collect();
        let mut unseen = Vec::new();
        for candidate in candidates {
            let name = candidate.trim();
            if name.is_empty() || seen.contains(name) {
                continue;
            }
            seen.insert(name);
            unseen.push(name.to_string());
        }
        unseen
    }
}

// ============================================================================
// HELPERS
// ============================================================================

/// Split comma-joined link text into trimmed, non-empty links.
pub fn split_links(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|link| !link.is_empty())
        .map(str::to_string)
        .collect()
}

/// Join links into the stored comma-joined form.
pub fn join_links(links: &[String]) -> String {
    links.join(",")
}

fn borrowed(value: &Option<String>) -> Option<Cow<'_, str>> {
    value.as_deref().map(Cow::Borrowed)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

fn parse_remark(value: &str) -> Result<Remark, ValidationError> {
    value
        .parse::<Remark>()
        .map_err(|_| ValidationError::UnknownRemark {
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row_json(remarks: &str) -> Value {
        json!({
            "id": "0190f5a2-7c1e-7d3a-9b1e-1a2b3c4d5e6f",
            "firstname": "Jane",
            "lastname": "Doe",
            "emailaddress": "jane@example.com",
            "remarks": remarks,
            "property_address": "12 Elm St",
            "city": "Springfield",
            "link": "https://a.example, https://b.example",
            "created_at": "2024-05-01T10:00:00+00:00",
            "updated_at": "2024-05-01T10:00:00+00:00"
        })
    }

    #[test]
    fn contact_row_decodes_without_property_payload() {
        let lead: Lead = serde_json::from_value(row_json("Approved")).unwrap();
        assert_eq!(lead.remarks, Remark::Approved);
        assert_eq!(lead.pipeline, PipelinePayload::Contact);
        assert_eq!(lead.field_text(LeadField::City), None);
        assert_eq!(lead.full_name(), "Jane Doe");
    }

    #[test]
    fn property_row_decodes_links() {
        let lead: Lead = serde_json::from_value(row_json("Lead 2")).unwrap();
        let details = lead.pipeline.property().unwrap();
        assert_eq!(details.city.as_deref(), Some("Springfield"));
        assert_eq!(
            details.links,
            vec!["https://a.example".to_string(), "https://b.example".to_string()]
        );
        assert_eq!(
            lead.field_text(LeadField::Links).as_deref(),
            Some("https://a.example,https://b.example")
        );
    }

    #[test]
    fn unknown_status_is_rejected() {
        let err = serde_json::from_value::<Lead>(row_json("Maybe")).unwrap_err();
        assert!(err.to_string().contains("Unknown lead status"));
    }

    #[test]
    fn blank_first_name_is_rejected() {
        let mut row = row_json("Leads");
        row["firstname"] = json!("  ");
        assert!(serde_json::from_value::<Lead>(row).is_err());
    }

    #[test]
    fn lead_serializes_back_to_flat_row() {
        let lead: Lead = serde_json::from_value(row_json("Lead 1")).unwrap();
        let value = serde_json::to_value(&lead).unwrap();
        assert_eq!(value["firstname"], "Jane");
        assert_eq!(value["remarks"], "Lead 1");
        assert_eq!(value["link"], "https://a.example,https://b.example");
    }

    #[test]
    fn draft_row_omits_unset_columns() {
        let draft = LeadDraft::new("Jane", Remark::Leads).with_last_name("Doe");
        let row = draft.to_row();
        assert_eq!(row, json!({"firstname": "Jane", "lastname": "Doe", "remarks": "Leads"}));
    }

    #[test]
    fn draft_property_fields_require_property_status() {
        let mut draft = LeadDraft::new("Jane", Remark::Leads);
        draft.set_field(LeadField::City, "Springfield").unwrap();
        assert!(draft.validate().is_err());

        draft.set_field(LeadField::Remarks, "Lead 1").unwrap();
        assert!(draft.validate().is_ok());
        assert_eq!(draft.to_row()["city"], "Springfield");
    }

    #[test]
    fn draft_requires_first_name() {
        let draft = LeadDraft::new("  ", Remark::Leads);
        assert!(matches!(
            draft.validate(),
            Err(ValidationError::RequiredFieldMissing { .. })
        ));
    }

    #[test]
    fn patch_clears_blank_values_and_rejects_blank_first_name() {
        let patch = LeadPatch::new()
            .set(LeadField::Email, "   ")
            .unwrap()
            .set(LeadField::Source, "Referral")
            .unwrap();
        assert_eq!(
            patch.to_row(),
            json!({"emailaddress": null, "source": "Referral"})
        );
        assert!(LeadPatch::new().set(LeadField::FirstName, "").is_err());
    }

    #[test]
    fn patch_normalises_status() {
        let patch = LeadPatch::new().set(LeadField::Remarks, "no answer").unwrap();
        assert_eq!(patch.remarks(), Some(Remark::NoAnswer));
        assert_eq!(patch.to_row(), json!({"remarks": "No Answer"}));
        assert!(LeadPatch::new().set(LeadField::Remarks, "Hot").is_err());
    }

    #[test]
    fn empty_patch_is_empty_object() {
        let patch = LeadPatch::new();
        assert!(patch.is_empty());
        assert_eq!(patch.to_row(), json!({}));
    }

    #[test]
    fn note_editable_only_by_author() {
        let note = LeadNote {
            id: NoteId::now_v7(),
            lead_id: LeadId::now_v7(),
            content: "Call back Tuesday".to_string(),
            user_name: Some("Ian".to_string()),
            created_at: chrono::Utc::now(),
        };
        assert!(note.is_editable_by(&User::new("Ian").unwrap()));
        assert!(!note.is_editable_by(&User::new("Luisa").unwrap()));
    }

    #[test]
    fn note_draft_rejects_blank_content() {
        let author = User::new("Ian").unwrap();
        assert!(NoteDraft::new(LeadId::now_v7(), " \n ", &author).is_err());
        let draft = NoteDraft::new(LeadId::now_v7(), " hello ", &author).unwrap();
        assert_eq!(draft.content, "hello");
    }

    #[test]
    fn unseen_called_by_names_are_deduplicated() {
        let known = vec!["Ian".to_string()];
        let unseen = CalledByUser::unseen(&known, ["Ian", "Luisa", " Luisa ", "", "Yhome"]);
        assert_eq!(unseen, vec!["Luisa".to_string(), "Yhome".to_string()]);
    }
}
