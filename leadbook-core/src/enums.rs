//! Enum types for Leadbook records

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// STATUS
// ============================================================================

/// Status of a lead. The store keeps these as a fixed enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum Remark {
    #[serde(rename = "Leads")]
    Leads,
    #[serde(rename = "Approved")]
    Approved,
    #[serde(rename = "Decline")]
    Decline,
    #[serde(rename = "No Answer")]
    NoAnswer,
    #[serde(rename = "Lead 1")]
    Lead1,
    #[serde(rename = "Lead 2")]
    Lead2,
}

impl Remark {
    pub const ALL: [Remark; 6] = [
        Remark::Leads,
        Remark::Approved,
        Remark::Decline,
        Remark::NoAnswer,
        Remark::Lead1,
        Remark::Lead2,
    ];

    /// Convert to the store's string representation.
    pub fn as_db_str(&self) -> &'static str {
        match self {
            Remark::Leads => "Leads",
            Remark::Approved => "Approved",
            Remark::Decline => "Decline",
            Remark::NoAnswer => "No Answer",
            Remark::Lead1 => "Lead 1",
            Remark::Lead2 => "Lead 2",
        }
    }

    /// Parse the store's exact string representation.
    pub fn from_db_str(s: &str) -> Result<Self, RemarkParseError> {
        Self::ALL
            .iter()
            .copied()
            .find(|remark| remark.as_db_str() == s)
            .ok_or_else(|| RemarkParseError(s.to_string()))
    }

    /// Pipeline this status belongs to.
    pub fn pipeline_kind(&self) -> PipelineKind {
        match self {
            Remark::Lead1 | Remark::Lead2 => PipelineKind::Property,
            Remark::Leads | Remark::Approved | Remark::Decline | Remark::NoAnswer => {
                PipelineKind::Contact
            }
        }
    }
}

impl fmt::Display for Remark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_db_str())
    }
}

/// Lenient parse: case, whitespace, `-` and `_` are ignored, so `no_answer`
/// and `lead-1` are accepted alongside the exact store strings.
impl FromStr for Remark {
    type Err = RemarkParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize_token(s);
        Self::ALL
            .iter()
            .copied()
            .find(|remark| normalize_token(remark.as_db_str()) == normalized)
            .ok_or_else(|| RemarkParseError(s.to_string()))
    }
}

/// Error when parsing an invalid status string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemarkParseError(pub String);

impl fmt::Display for RemarkParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid lead status: {}", self.0)
    }
}

impl std::error::Error for RemarkParseError {}

// ============================================================================
// PIPELINE
// ============================================================================

/// Discriminant selecting the pipeline-specific payload of a lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum PipelineKind {
    /// Plain sales contacts (Leads, Approved, Decline, No Answer).
    #[default]
    Contact,
    /// Address-bearing leads (Lead 1, Lead 2).
    Property,
}

impl PipelineKind {
    /// Statuses that belong to this pipeline, in display order.
    pub fn statuses(&self) -> &'static [Remark] {
        match self {
            PipelineKind::Contact => &[
                Remark::Leads,
                Remark::Approved,
                Remark::Decline,
                Remark::NoAnswer,
            ],
            PipelineKind::Property => &[Remark::Lead1, Remark::Lead2],
        }
    }

    /// Status given to records that arrive without a usable one.
    pub fn default_remark(&self) -> Remark {
        match self {
            PipelineKind::Contact => Remark::Leads,
            PipelineKind::Property => Remark::Lead1,
        }
    }

    pub fn contains(&self, remark: Remark) -> bool {
        remark.pipeline_kind() == *self
    }
}

impl fmt::Display for PipelineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            PipelineKind::Contact => "contact",
            PipelineKind::Property => "property",
        };
        f.write_str(value)
    }
}

impl FromStr for PipelineKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "contact" | "contacts" => Ok(PipelineKind::Contact),
            "property" | "properties" => Ok(PipelineKind::Property),
            _ => Err(format!("Invalid pipeline kind: {}", s)),
        }
    }
}

// ============================================================================
// FIELDS
// ============================================================================

/// Addressable lead fields, keyed by their store column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadField {
    FirstName,
    LastName,
    Email,
    WorkPhone,
    CellPhone1,
    HomePhone,
    CellPhone2,
    Source,
    LeadType,
    Remarks,
    CalledBy,
    LastContact,
    PropertyAddress,
    City,
    State,
    ZipCode,
    Links,
}

impl LeadField {
    pub const ALL: [LeadField; 17] = [
        LeadField::FirstName,
        LeadField::LastName,
        LeadField::Email,
        LeadField::WorkPhone,
        LeadField::CellPhone1,
        LeadField::HomePhone,
        LeadField::CellPhone2,
        LeadField::Source,
        LeadField::LeadType,
        LeadField::Remarks,
        LeadField::CalledBy,
        LeadField::LastContact,
        LeadField::PropertyAddress,
        LeadField::City,
        LeadField::State,
        LeadField::ZipCode,
        LeadField::Links,
    ];

    /// Fields consulted by the free-text search term.
    pub const SEARCHABLE: [LeadField; 9] = [
        LeadField::FirstName,
        LeadField::LastName,
        LeadField::Email,
        LeadField::WorkPhone,
        LeadField::CellPhone1,
        LeadField::HomePhone,
        LeadField::CellPhone2,
        LeadField::Source,
        LeadField::LeadType,
    ];

    /// Column name in the `leads` table.
    pub fn column(&self) -> &'static str {
        match self {
            LeadField::FirstName => "firstname",
            LeadField::LastName => "lastname",
            LeadField::Email => "emailaddress",
            LeadField::WorkPhone => "workphone",
            LeadField::CellPhone1 => "cellphone1",
            LeadField::HomePhone => "homephone",
            LeadField::CellPhone2 => "cellphone2",
            LeadField::Source => "source",
            LeadField::LeadType => "leadtype",
            LeadField::Remarks => "remarks",
            LeadField::CalledBy => "calledby",
            LeadField::LastContact => "lastcontact",
            LeadField::PropertyAddress => "property_address",
            LeadField::City => "city",
            LeadField::State => "state",
            LeadField::ZipCode => "zip_code",
            LeadField::Links => "link",
        }
    }

    /// Whether the field only exists on the property pipeline.
    pub fn is_property_field(&self) -> bool {
        matches!(
            self,
            LeadField::PropertyAddress
                | LeadField::City
                | LeadField::State
                | LeadField::ZipCode
                | LeadField::Links
        )
    }
}

impl fmt::Display for LeadField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// Accepts the column name or a loose spelling of the variant
/// (`first_name`, `first-name`, `FirstName`).
impl FromStr for LeadField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize_token(s);
        Self::ALL
            .iter()
            .copied()
            .find(|field| {
                normalize_token(field.column()) == normalized
                    || normalize_token(&format!("{:?}", field)) == normalized
            })
            .ok_or_else(|| format!("Unknown lead field: {}", s))
    }
}

fn normalize_token(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remark_db_strings_round_trip() {
        for remark in Remark::ALL {
            assert_eq!(Remark::from_db_str(remark.as_db_str()), Ok(remark));
        }
    }

    #[test]
    fn remark_serde_uses_store_labels() {
        let json = serde_json::to_string(&Remark::NoAnswer).unwrap();
        assert_eq!(json, "\"No Answer\"");
        let parsed: Remark = serde_json::from_str("\"Lead 2\"").unwrap();
        assert_eq!(parsed, Remark::Lead2);
    }

    #[test]
    fn remark_lenient_parse() {
        assert_eq!("no_answer".parse::<Remark>(), Ok(Remark::NoAnswer));
        assert_eq!("LEAD-1".parse::<Remark>(), Ok(Remark::Lead1));
        assert!("Maybe".parse::<Remark>().is_err());
        assert!(Remark::from_db_str("no answer").is_err());
    }

    #[test]
    fn pipelines_partition_statuses() {
        for remark in Remark::ALL {
            let kind = remark.pipeline_kind();
            assert!(kind.statuses().contains(&remark));
            assert!(kind.contains(remark));
        }
        assert_eq!(PipelineKind::Contact.default_remark(), Remark::Leads);
        assert_eq!(PipelineKind::Property.default_remark(), Remark::Lead1);
    }

    #[test]
    fn lead_field_parses_column_and_variant_names() {
        assert_eq!("emailaddress".parse::<LeadField>(), Ok(LeadField::Email));
        assert_eq!("cell_phone_1".parse::<LeadField>(), Ok(LeadField::CellPhone1));
        assert_eq!("zip-code".parse::<LeadField>(), Ok(LeadField::ZipCode));
        assert!("nickname".parse::<LeadField>().is_err());
    }
}
