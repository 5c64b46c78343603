//! CSV import of leads
//!
//! Each pipeline has an import profile: the header names it requires, and a
//! fixed header-name to field table for the optional columns. Header names
//! are matched ignoring surrounding whitespace and ASCII case. Empty cells
//! are treated as absent. Rows that lack a required value after mapping are
//! dropped; a file that leaves no rows at all is a structural failure.

use crate::{ImportError, LeadDraft, LeadField, PipelineKind, Remark};
use std::io::Read;

const FULL_NAME: &str = "Full Name";

const CONTACT_COLUMNS: &[(&str, LeadField)] = &[
    ("First Name", LeadField::FirstName),
    ("Last Name", LeadField::LastName),
    ("Email", LeadField::Email),
    ("Work Phone", LeadField::WorkPhone),
    ("Cell Phone 1", LeadField::CellPhone1),
    ("Home Phone", LeadField::HomePhone),
    ("Cell Phone 2", LeadField::CellPhone2),
    ("Source", LeadField::Source),
    ("Lead Type", LeadField::LeadType),
    ("Remarks", LeadField::Remarks),
    ("Last Contact", LeadField::LastContact),
    ("Called by", LeadField::CalledBy),
];

const PROPERTY_COLUMNS: &[(&str, LeadField)] = &[
    ("Email", LeadField::Email),
    ("Work Phone", LeadField::WorkPhone),
    ("Cell Phone 1", LeadField::CellPhone1),
    ("Home Phone", LeadField::HomePhone),
    ("Cell Phone 2", LeadField::CellPhone2),
    ("Property Address", LeadField::PropertyAddress),
    ("City", LeadField::City),
    ("State", LeadField::State),
    ("Zip Code", LeadField::ZipCode),
    ("Links", LeadField::Links),
    ("Source", LeadField::Source),
    ("Lead Type", LeadField::LeadType),
    ("Remarks", LeadField::Remarks),
    ("Last Contact", LeadField::LastContact),
    ("Called by", LeadField::CalledBy),
];

/// Column layout accepted for one pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportProfile {
    pipeline: PipelineKind,
}

impl ImportProfile {
    pub fn for_pipeline(pipeline: PipelineKind) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> PipelineKind {
        self.pipeline
    }

    /// Header names that must all be present.
    pub fn required_columns(&self) -> &'static [&'static str] {
        match self.pipeline {
            PipelineKind::Contact => &["First Name", "Last Name"],
            PipelineKind::Property => &[FULL_NAME],
        }
    }

    /// Header-name to field table for this pipeline.
    pub fn column_map(&self) -> &'static [(&'static str, LeadField)] {
        match self.pipeline {
            PipelineKind::Contact => CONTACT_COLUMNS,
            PipelineKind::Property => PROPERTY_COLUMNS,
        }
    }

    /// Header names that may be present but are not required.
    pub fn optional_columns(&self) -> Vec<&'static str> {
        let required = self.required_columns();
        self.column_map()
            .iter()
            .map(|(header, _)| *header)
            .filter(|header| !required.contains(header))
            .collect()
    }
}

/// Outcome of parsing an import file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvImport {
    pub drafts: Vec<LeadDraft>,
    /// Data rows dropped for lacking a required value.
    pub skipped_rows: usize,
}

/// Parse a CSV file into lead drafts for `pipeline`.
///
/// `default_remark` is the active pipeline label; rows whose `Remarks` cell
/// is empty or names a status outside the pipeline get it. A default that
/// itself lies outside the pipeline falls back to the pipeline's own
/// default status.
pub fn parse_leads_csv<R: Read>(
    reader: R,
    pipeline: PipelineKind,
    default_remark: Remark,
) -> Result<CsvImport, ImportError> {
    let profile = ImportProfile::for_pipeline(pipeline);
    let default_remark = if pipeline.contains(default_remark) {
        default_remark
    } else {
        pipeline.default_remark()
    };

    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();
    let position = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));

    let missing: Vec<String> = profile
        .required_columns()
        .iter()
        .filter(|name| position(**name).is_none())
        .map(|name| name.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ImportError::MissingColumns { columns: missing });
    }

    let mapped: Vec<(usize, LeadField)> = profile
        .column_map()
        .iter()
        .filter_map(|(name, field)| position(*name).map(|index| (index, *field)))
        .collect();
    let full_name_index = match pipeline {
        PipelineKind::Property => position(FULL_NAME),
        PipelineKind::Contact => None,
    };

    let mut drafts = Vec::new();
    let mut skipped_rows = 0;
    for record in rdr.records() {
        let record = record?;
        let cell = |index: usize| record.get(index).filter(|value| !value.is_empty());

        let mut draft = LeadDraft::new(String::new(), default_remark);
        if let Some(full_name) = full_name_index.and_then(cell) {
            let (first, last) = split_full_name(full_name);
            draft.first_name = first.to_string();
            draft.last_name = last.map(str::to_string);
        }
        for (index, field) in &mapped {
            let Some(value) = cell(*index) else {
                continue;
            };
            match field {
                LeadField::Remarks => {
                    if let Ok(remark) = value.parse::<Remark>() {
                        if pipeline.contains(remark) {
                            draft.remarks = remark;
                        }
                    }
                }
                _ => draft.set_field(*field, value).map_err(|err| ImportError::Parse {
                    reason: err.to_string(),
                })?,
            }
        }

        let has_required = match pipeline {
            PipelineKind::Contact => !draft.first_name.is_empty() && draft.last_name.is_some(),
            PipelineKind::Property => !draft.first_name.is_empty(),
        };
        if has_required {
            drafts.push(draft);
        } else {
            skipped_rows += 1;
        }
    }

    if drafts.is_empty() {
        return Err(ImportError::NoValidRows);
    }
    Ok(CsvImport {
        drafts,
        skipped_rows,
    })
}

/// Split a full name at the first run of whitespace.
pub fn split_full_name(full_name: &str) -> (&str, Option<&str>) {
    let trimmed = full_name.trim();
    match trimmed.split_once(char::is_whitespace) {
        Some((first, rest)) => {
            let rest = rest.trim();
            (first, if rest.is_empty() { None } else { Some(rest) })
        }
        None => (trimmed, None),
    }
}

/// Downloadable template: the header row of a pipeline's profile and one
/// example row.
pub fn csv_template(pipeline: PipelineKind) -> Result<String, ImportError> {
    let profile = ImportProfile::for_pipeline(pipeline);
    let mut headers: Vec<&str> = profile.required_columns().to_vec();
    headers.extend(profile.optional_columns());

    let example: Vec<&str> = headers
        .iter()
        .map(|header| example_value(header, pipeline))
        .collect();

    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(&headers)?;
    writer.write_record(&example)?;
    let bytes = writer.into_inner().map_err(|err| ImportError::Parse {
        reason: err.to_string(),
    })?;
    String::from_utf8(bytes).map_err(|err| ImportError::Parse {
        reason: err.to_string(),
    })
}

fn example_value(header: &str, pipeline: PipelineKind) -> &'static str {
    match header {
        "First Name" => "Jane",
        "Last Name" => "Doe",
        FULL_NAME => "Jane Doe",
        "Email" => "jane.doe@example.com",
        "Work Phone" => "555-0100",
        "Cell Phone 1" => "555-0101",
        "Home Phone" => "555-0102",
        "Cell Phone 2" => "",
        "Property Address" => "12 Elm Street",
        "City" => "Springfield",
        "State" => "IL",
        "Zip Code" => "62701",
        "Links" => "https://example.com/listing",
        "Source" => "Website",
        "Lead Type" => "Buyer",
        "Remarks" => pipeline.default_remark().as_db_str(),
        "Last Contact" => "2024-01-15",
        "Called by" => "Ian",
        _ => "",
    }
}
