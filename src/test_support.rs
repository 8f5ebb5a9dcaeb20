//! Fixtures shared by the unit and handler tests.

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::header;
use actix_web::{test, web, App};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

use crate::config::Config;
use crate::db::memory::MemoryStore;
use crate::db::OnboardingStore;
use crate::handlers;
use crate::models::file::FileField;
use crate::utils::upload::StagedUploads;

pub const PDF_BYTES: &[u8] = b"%PDF-1.4\n1 0 obj\n<< /Type /Catalog >>\nendobj\ntrailer\n%%EOF\n";
pub const PNG_BYTES: &[u8] =
    b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR\x00\x00\x00\x01\x00\x00\x00\x01\x08\x06\x00\x00\x00";

const BOUNDARY: &str = "----onboarding-test-boundary";

/// Every text field of a valid experienced-hire submission.
pub fn onboarding_fields() -> HashMap<String, String> {
    [
        ("fullName", "Asha Verma"),
        ("email", "asha.verma@example.com"),
        ("phoneNo", "9876543210"),
        ("alternateNumber", "9876500000"),
        ("guardianName", "Ravi Verma"),
        ("guardianContact", "9812345678"),
        ("maritalStatus", "Single"),
        ("gender", "Female"),
        ("bloodGroup", "B+"),
        ("dateOfBirth", "1996-08-14"),
        ("employmentStatus", "Experienced"),
        ("aadharNo", "123412341234"),
        ("panNo", "ABCDE1234F"),
        ("currentAddress", "12 MG Road"),
        ("currentCity", "Pune"),
        ("currentState", "Maharashtra"),
        ("currentPincode", "411001"),
        ("permanentAddress", "4 Civil Lines"),
        ("permanentCity", "Jaipur"),
        ("permanentState", "Rajasthan"),
        ("permanentPincode", "302006"),
        ("bankNameAsPerForm", "State Bank"),
        ("accountNo", "00112233445566"),
        ("ifscCode", "SBIN0000123"),
        ("branchName", "Camp"),
        (
            "educationDetails",
            r#"[{"level":"HSC","stream":"Science","institution":"City College","year":"2014","score":"82.5"},
                {"level":"B.E.","stream":"Computer","institution":"Pune University","year":2018,"score":7.9}]"#,
        ),
        (
            "employmentDetails",
            r#"[{"companyName":"Acme Corp","designation":"Engineer","lastProject":"Billing","companyStartDate":"2018-07-01"}]"#,
        ),
        ("consentCheckbox", "on"),
    ]
    .into_iter()
    .map(|(name, value)| (name.to_string(), value.to_string()))
    .collect()
}

/// Stages one PDF per listed field under `dir`.
pub fn staged_uploads(dir: &Path, fields: &[FileField]) -> StagedUploads {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    let mut uploads = StagedUploads::new(&dir.join("staging"), &dir.join("uploads"));
    runtime.block_on(async {
        for field in fields {
            uploads.stage(*field, "scan.pdf", PDF_BYTES).await.unwrap();
        }
    });
    uploads
}

/// Names of everything directly inside `dir`; empty when it does not exist.
pub fn file_names(dir: &Path) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

enum Part {
    Text { name: String, value: String },
    File { name: String, file_name: String, data: Vec<u8> },
}

/// Hand-built `multipart/form-data` body.
pub struct MultipartBody {
    parts: Vec<Part>,
}

impl MultipartBody {
    pub fn empty() -> Self {
        Self { parts: Vec::new() }
    }

    /// All text fields of [`onboarding_fields`], without files.
    pub fn onboarding() -> Self {
        let mut fields: Vec<_> = onboarding_fields().into_iter().collect();
        fields.sort();
        fields
            .into_iter()
            .fold(Self::empty(), |body, (name, value)| body.text(&name, &value))
    }

    /// Sets a text field, replacing an earlier value of the same name.
    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.parts
            .retain(|part| !matches!(part, Part::Text { name: n, .. } if n == name));
        self.parts.push(Part::Text {
            name: name.to_string(),
            value: value.to_string(),
        });
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, data: &[u8]) -> Self {
        self.parts.push(Part::File {
            name: name.to_string(),
            file_name: file_name.to_string(),
            data: data.to_vec(),
        });
        self
    }

    fn to_bytes(&self) -> Vec<u8> {
        let mut body = Vec::new();
        for part in &self.parts {
            body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
            match part {
                Part::Text { name, value } => {
                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name)
                            .as_bytes(),
                    );
                    body.extend_from_slice(value.as_bytes());
                }
                Part::File {
                    name,
                    file_name,
                    data,
                } => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                             Content-Type: application/octet-stream\r\n\r\n",
                            name, file_name
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(data);
                }
            }
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
        body
    }

    pub fn post(&self, uri: &str) -> test::TestRequest {
        test::TestRequest::post()
            .uri(uri)
            .insert_header((
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            ))
            .set_payload(self.to_bytes())
    }
}

/// A submission that passes every check, with all three required files.
pub fn complete_submission() -> MultipartBody {
    MultipartBody::onboarding()
        .file(FileField::Aadhaar.name(), "aadhaar.pdf", PDF_BYTES)
        .file(FileField::Pan.name(), "pan.png", PNG_BYTES)
        .file(FileField::Signature.name(), "signature.png", PNG_BYTES)
}

/// In-memory store plus throwaway upload and staging directories.
pub struct TestEnv {
    pub store: Arc<MemoryStore>,
    pub config: Config,
    _dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self::with_config(|_| {})
    }

    pub fn accepting_any_file() -> Self {
        Self::with_config(|config| config.accept_any_file = true)
    }

    pub fn with_config(adjust: impl FnOnce(&mut Config)) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let upload_dir: PathBuf = dir.path().join("uploads");
        let staging_dir: PathBuf = dir.path().join("staging");
        std::fs::create_dir_all(&upload_dir).unwrap();
        std::fs::create_dir_all(&staging_dir).unwrap();

        let mut config = Config {
            database_url: "postgres://unused".to_string(),
            database_max_connections: 1,
            bind_address: "127.0.0.1:0".to_string(),
            upload_dir,
            staging_dir,
            max_file_size: 64 * 1024,
            max_docs: 10,
            accept_any_file: false,
            serve_uploads: true,
        };
        adjust(&mut config);

        Self {
            store: Arc::new(MemoryStore::new()),
            config,
            _dir: dir,
        }
    }

    pub fn upload_dir(&self) -> &Path {
        &self.config.upload_dir
    }

    pub fn staging_dir(&self) -> &Path {
        &self.config.staging_dir
    }
}

pub fn init_app(
    env: &TestEnv,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let store: Arc<dyn OnboardingStore> = env.store.clone();
    let config = env.config.clone();

    App::new()
        .app_data(web::Data::from(store))
        .app_data(web::Data::new(config.clone()))
        .configure(move |cfg| handlers::configure(cfg, &config))
}
