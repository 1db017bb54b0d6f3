use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Structured CV as typed into the form. Missing fields are empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CvFields {
    pub name: String,
    pub email: String,
    pub summary: String,
    pub experience: String,
    pub education: String,
    pub skills: String,
}

/// One field of `CvFields`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CvField {
    Name,
    Email,
    #[default]
    Summary,
    Experience,
    Education,
    Skills,
}

impl CvField {
    pub const ALL: [CvField; 6] = [
        CvField::Name,
        CvField::Email,
        CvField::Summary,
        CvField::Experience,
        CvField::Education,
        CvField::Skills,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CvField::Name => "name",
            CvField::Email => "email",
            CvField::Summary => "summary",
            CvField::Experience => "experience",
            CvField::Education => "education",
            CvField::Skills => "skills",
        }
    }

    /// Label used in the prompt.
    pub fn label(&self) -> &'static str {
        match self {
            CvField::Name => "Name",
            CvField::Email => "Email",
            CvField::Summary => "Summary",
            CvField::Experience => "Experience",
            CvField::Education => "Education",
            CvField::Skills => "Skills",
        }
    }
}

impl fmt::Display for CvField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown CV field '{0}'")]
pub struct UnknownCvField(String);

impl FromStr for CvField {
    type Err = UnknownCvField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        CvField::ALL
            .into_iter()
            .find(|field| field.as_str() == wanted)
            .ok_or_else(|| UnknownCvField(s.to_string()))
    }
}

impl CvFields {
    pub fn get(&self, field: CvField) -> &str {
        match field {
            CvField::Name => &self.name,
            CvField::Email => &self.email,
            CvField::Summary => &self.summary,
            CvField::Experience => &self.experience,
            CvField::Education => &self.education,
            CvField::Skills => &self.skills,
        }
    }

    pub fn set(&mut self, field: CvField, value: String) {
        let slot = match field {
            CvField::Name => &mut self.name,
            CvField::Email => &mut self.email,
            CvField::Summary => &mut self.summary,
            CvField::Experience => &mut self.experience,
            CvField::Education => &mut self.education,
            CvField::Skills => &mut self.skills,
        };
        *slot = value;
    }

    pub fn is_blank(&self) -> bool {
        CvField::ALL.iter().all(|f| self.get(*f).trim().is_empty())
    }
}

/// The CV representation used for one tailoring request.
#[derive(Debug, Clone, PartialEq)]
pub enum CvInput {
    Structured(CvFields),
    /// Opaque text extracted from an uploaded document.
    Extracted(String),
}

impl CvInput {
    /// Picks the representation for a request.
    ///
    /// Uploaded text alone is used as-is. Uploaded text alongside form fields replaces
    /// `uploaded_field` in the form. Blank uploaded text counts as absent.
    pub fn resolve(
        cv: Option<CvFields>,
        uploaded: Option<String>,
        uploaded_field: CvField,
    ) -> Option<CvInput> {
        let uploaded = uploaded.filter(|text| !text.trim().is_empty());

        match (cv, uploaded) {
            (None, None) => None,
            (None, Some(text)) => Some(CvInput::Extracted(text)),
            (Some(fields), None) => Some(CvInput::Structured(fields)),
            (Some(mut fields), Some(text)) => {
                fields.set(uploaded_field, text);
                Some(CvInput::Structured(fields))
            }
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            CvInput::Structured(fields) => fields.is_blank(),
            CvInput::Extracted(text) => text.trim().is_empty(),
        }
    }
}

/// Body of `POST /api/tailor`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TailorRequest {
    pub cv: Option<CvFields>,
    pub job_url: Option<String>,
    pub job_description_text: Option<String>,
    pub uploaded_cv_content: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TailorResponse {
    pub tailored_cv: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}
