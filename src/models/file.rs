use std::fmt;
use std::path::PathBuf;

/// Multipart file fields the onboarding form may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileField {
    Aadhaar,
    Pan,
    Signature,
    EducationDocs,
    EmploymentDocs,
}

impl FileField {
    pub const ALL: [FileField; 5] = [
        FileField::Aadhaar,
        FileField::Pan,
        FileField::Signature,
        FileField::EducationDocs,
        FileField::EmploymentDocs,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.name() == name)
    }

    pub fn name(&self) -> &'static str {
        match self {
            FileField::Aadhaar => "aadhaarFile",
            FileField::Pan => "panFile",
            FileField::Signature => "signatureFile",
            FileField::EducationDocs => "educationDocs",
            FileField::EmploymentDocs => "employmentDocs",
        }
    }

    /// How many files the field accepts; repeated fields share `max_docs`.
    pub fn max_count(&self, max_docs: usize) -> usize {
        match self {
            FileField::EducationDocs | FileField::EmploymentDocs => max_docs,
            _ => 1,
        }
    }
}

impl fmt::Display for FileField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An accepted upload. It sits at `staged_path` until the submission
/// commits, then moves to `final_path`, which is what the database stores.
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub field: FileField,
    pub original_name: String,
    pub staged_path: PathBuf,
    pub final_path: PathBuf,
}

impl StoredFile {
    pub fn stored_path(&self) -> String {
        self.final_path.to_string_lossy().into_owned()
    }
}
