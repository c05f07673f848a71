use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use ethics_review::error::ReviewError;
use ethics_review::models::{ChecklistStatus, DocumentType, ReportFormat};
use ethics_review::{App, AppError, Config, GenerationSettings, ReviewFlow, ReviewModel, RunRequest};

const MODEL_ANSWER: &str = "\
## 1. Document Review Summary
Application form and questionnaire received.

## 2. Guideline Compliance
| Guideline | Status | Comments |
|---|---|---|
| Voluntary participation | Met | Clear withdrawal clause |
| Confidentiality | Not Met | No anonymisation plan |

## 3. Ethical Concerns
Participants' data is stored on personal laptops.

## 4. Recommendations
Provide a data management plan.

## 5. Overall Assessment
Revise and resubmit.
";

/// 本地审查模型：记录收到的提示词，按需返回固定回答或网络错误
#[derive(Clone)]
struct StubModel {
    answer: Result<String, String>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl StubModel {
    fn answering(answer: &str) -> Self {
        Self {
            answer: Ok(answer.to_string()),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn failing(message: &str) -> Self {
        Self {
            answer: Err(message.to_string()),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl ReviewModel for StubModel {
    fn model_name(&self) -> &str {
        "stub"
    }

    async fn complete(
        &self,
        user_message: &str,
        _system_message: Option<&str>,
        _settings: GenerationSettings,
    ) -> Result<String, ReviewError> {
        self.prompts.lock().unwrap().push(user_message.to_string());
        self.answer.clone().map_err(|message| ReviewError::ApiCallFailed {
            model: "stub".to_string(),
            message,
        })
    }
}

struct Workspace {
    _root: tempfile::TempDir,
    uploads: PathBuf,
    references: PathBuf,
    output: PathBuf,
}

impl Workspace {
    fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        let uploads = root.path().join("uploads");
        let references = root.path().join("reference_docs");
        let output = root.path().join("reports");
        std::fs::create_dir_all(&uploads).unwrap();
        std::fs::create_dir_all(&references).unwrap();
        std::fs::write(
            references.join("national_guidelines.txt"),
            "National guidelines on informed consent and data protection.",
        )
        .unwrap();
        Self {
            _root: root,
            uploads,
            references,
            output,
        }
    }

    fn upload(&self, name: &str, content: &[u8]) -> PathBuf {
        let path = self.uploads.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    fn config(&self, format: ReportFormat) -> Config {
        Config {
            llm_api_key: "sk-test".to_string(),
            reference_docs_dir: self.references.clone(),
            output_dir: self.output.clone(),
            output_format: format,
            ..Config::default()
        }
    }
}

fn app(config: Config, model: StubModel) -> App {
    App::with_flow(config, ReviewFlow::new(Box::new(model)))
}

fn list_dir(dir: &Path) -> Vec<PathBuf> {
    match std::fs::read_dir(dir) {
        Ok(entries) => entries.map(|e| e.unwrap().path()).collect(),
        Err(_) => Vec::new(),
    }
}

#[tokio::test]
async fn test_full_run_writes_text_report() {
    let ws = Workspace::new();
    let form = ws.upload("form.txt", b"Ethics Committee Application Form");
    let proposal = ws.upload(
        "proposal.txt",
        b"This is our Research Proposal... see attached Questionnaire section",
    );
    let model = StubModel::answering(MODEL_ANSWER);

    let outcome = app(ws.config(ReportFormat::Text), model.clone())
        .run(RunRequest {
            uploads: vec![form, proposal],
            applicant: "Dr. Amal Hassan".to_string(),
            format: None,
            output: None,
        })
        .await
        .unwrap();

    // 提案里提到问卷，按规则顺序归为问卷
    assert_eq!(outcome.documents[1].detected_type(), DocumentType::Questionnaire);

    let missing: Vec<DocumentType> = outcome
        .checklist
        .iter()
        .filter(|e| e.status == ChecklistStatus::Missing)
        .map(|e| e.expected_type)
        .collect();
    assert_eq!(missing, vec![DocumentType::ResearchProposal]);
    assert_eq!(outcome.recovered_sections, 5);

    assert!(outcome.artifact_path.starts_with(&ws.output));
    assert_eq!(outcome.artifact_path.extension().unwrap(), "txt");
    let report = std::fs::read_to_string(&outcome.artifact_path).unwrap();
    assert!(report.contains("Applicant: Dr. Amal Hassan"));
    assert!(report.contains("| Confidentiality | Not Met | No anonymisation plan |"));
    assert!(report.contains("Revise and resubmit."));

    let prompts = model.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("--- Application Form (form.txt) ---"));
    assert!(prompts[0].contains("--- Questionnaire (proposal.txt) ---"));
    assert!(prompts[0].contains("national_guidelines.txt"));
}

#[tokio::test]
async fn test_service_failure_produces_no_artifact() {
    let ws = Workspace::new();
    let form = ws.upload("form.txt", b"Application");

    let result = app(ws.config(ReportFormat::Pdf), StubModel::failing("network unreachable"))
        .run(RunRequest {
            uploads: vec![form],
            applicant: "A".to_string(),
            format: None,
            output: None,
        })
        .await;

    let err = result.unwrap_err();
    assert!(matches!(err, AppError::Review(ReviewError::ApiCallFailed { .. })));
    assert!(err.user_message().contains("network unreachable"));
    assert!(list_dir(&ws.output).is_empty());
}

#[tokio::test]
async fn test_unreadable_upload_is_warning_not_failure() {
    let ws = Workspace::new();
    let bad = ws.upload("consent.txt", &[0xff, 0xfe, 0xfd]);
    let target = ws.output.join("custom").join("report.docx");

    let outcome = app(ws.config(ReportFormat::Text), StubModel::answering("no structure here"))
        .run(RunRequest {
            uploads: vec![bad],
            applicant: String::new(),
            format: Some(ReportFormat::Docx),
            output: Some(target.clone()),
        })
        .await
        .unwrap();

    assert_eq!(outcome.artifact_path, target);
    assert!(target.exists());
    assert_eq!(outcome.warnings.len(), 1);
    assert_eq!(outcome.warnings[0].filename, "consent.txt");
    assert_eq!(outcome.documents[0].detected_type(), DocumentType::Unknown);
    assert_eq!(outcome.recovered_sections, 0);
}

#[tokio::test]
async fn test_every_required_type_present() {
    let ws = Workspace::new();
    let uploads = vec![
        ws.upload("a.txt", b"Application form"),
        ws.upload("b.txt", b"Research proposal: background"),
        ws.upload("c.txt", b"Participant survey"),
        ws.upload("d.txt", b"Informed consent form"),
    ];

    let outcome = app(ws.config(ReportFormat::Pdf), StubModel::answering(MODEL_ANSWER))
        .run(RunRequest {
            uploads,
            applicant: "B".to_string(),
            format: None,
            output: None,
        })
        .await
        .unwrap();

    assert!(outcome
        .checklist
        .iter()
        .all(|e| e.status != ChecklistStatus::Missing));
    let rac = outcome
        .checklist
        .iter()
        .find(|e| e.expected_type == DocumentType::RACConfirmationLetter)
        .unwrap();
    assert_eq!(rac.status, ChecklistStatus::OptionalNotProvided);

    let bytes = std::fs::read(&outcome.artifact_path).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}
