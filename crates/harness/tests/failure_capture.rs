//! Failure capture hook tests
//!
//! The hook attaches a screenshot only for a failure in the call phase
//! with a live session, labels it "screenshot-on-failure" as image/png,
//! and never turns a capture problem into a case failure of its own.

use std::sync::Arc;

use anyhow::Result;
use test_case::test_case;

use vigil_harness::testkit::{FailingSink, FakeTransport, RecordingSink};
use vigil_harness::{
    BrowserConfig, Case, CaseContext, CaseFuture, CasePhase, CaseStatus, DirSink, FailureCapture,
    HarnessError, ModuleRunner, Session, SCREENSHOT_LABEL, SCREENSHOT_MEDIA_TYPE,
};

const PNG_MAGIC: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

async fn live_session(transport: &Arc<FakeTransport>) -> Session {
    Session::create(transport.clone(), &BrowserConfig::default())
        .await
        .expect("fake session comes up")
}

fn ctx() -> CaseContext {
    CaseContext {
        page_url: "http://127.0.0.1:1/".to_string(),
    }
}

fn passing_case<'a>(_ctx: &'a CaseContext, _session: &'a Session) -> CaseFuture<'a> {
    Box::pin(async { Ok(()) })
}

fn failing_case<'a>(_ctx: &'a CaseContext, _session: &'a Session) -> CaseFuture<'a> {
    Box::pin(async { Err(HarnessError::CaseFailed("wrong title".to_string())) })
}

#[test_case(CasePhase::Call, true, true ; "call phase failure attaches")]
#[test_case(CasePhase::Call, false, false ; "call phase pass attaches nothing")]
#[test_case(CasePhase::Setup, true, false ; "setup failure attaches nothing")]
#[test_case(CasePhase::Teardown, true, false ; "teardown failure attaches nothing")]
#[tokio::test]
async fn attaches_only_for_call_phase_failures(phase: CasePhase, failed: bool, expected: bool) {
    let transport = Arc::new(FakeTransport::new());
    let session = live_session(&transport).await;
    let sink = RecordingSink::new();
    let hook = FailureCapture::new(&sink);

    let attached = hook.observe("case", phase, failed, Some(&session)).await;

    assert_eq!(attached, expected);
    assert_eq!(sink.len(), usize::from(expected));
    session.close().await.unwrap();
}

#[tokio::test]
async fn no_session_means_no_attachment() {
    let sink = RecordingSink::new();
    let hook = FailureCapture::new(&sink);

    let attached = hook.observe("case", CasePhase::Call, true, None).await;

    assert!(!attached);
    assert!(sink.is_empty());
}

#[tokio::test]
async fn attachment_uses_the_fixed_label_and_media_type() {
    let transport = Arc::new(FakeTransport::new());
    transport.set_screenshot(PNG_MAGIC.to_vec());
    let session = live_session(&transport).await;
    let sink = RecordingSink::new();
    let hook = FailureCapture::new(&sink);

    let attached = hook.observe("case", CasePhase::Call, true, Some(&session)).await;
    assert!(attached);

    let attachments = sink.attachments();
    assert_eq!(attachments.len(), 1);
    assert_eq!(attachments[0].label, SCREENSHOT_LABEL);
    assert_eq!(attachments[0].media_type, SCREENSHOT_MEDIA_TYPE);
    assert_eq!(attachments[0].bytes, PNG_MAGIC);
    session.close().await.unwrap();
}

#[tokio::test]
async fn broken_screenshot_path_never_masks_the_verdict() {
    let transport = Arc::new(FakeTransport::new());
    let session = live_session(&transport).await;
    transport.fail_on("screenshot");
    let sink = RecordingSink::new();
    let hook = FailureCapture::new(&sink);

    let attached = hook.observe("case", CasePhase::Call, true, Some(&session)).await;

    assert!(!attached);
    assert!(sink.is_empty());
    session.close().await.unwrap();
}

#[tokio::test]
async fn rejecting_sink_never_masks_the_verdict() {
    let transport = Arc::new(FakeTransport::new());
    let session = live_session(&transport).await;
    let sink = FailingSink;
    let hook = FailureCapture::new(&sink);

    let attached = hook.observe("case", CasePhase::Call, true, Some(&session)).await;

    assert!(!attached);
    session.close().await.unwrap();
}

#[tokio::test]
async fn middle_failure_attaches_once_and_later_cases_still_run() -> Result<()> {
    let transport = Arc::new(FakeTransport::new());
    let sink = RecordingSink::new();
    let runner = ModuleRunner::new(transport.clone(), BrowserConfig::default(), &sink);

    let cases = [
        Case::new("before", passing_case),
        Case::new("breaks", failing_case),
        Case::new("after", passing_case),
    ];
    let report = runner.run_module("capture", &ctx(), &cases).await?;

    assert_eq!(sink.len(), 1);
    let statuses: Vec<CaseStatus> = report.cases.iter().map(|c| c.status).collect();
    assert_eq!(
        statuses,
        [CaseStatus::Passed, CaseStatus::Failed, CaseStatus::Passed]
    );
    assert!(!report.cases[0].screenshot_attached);
    assert!(report.cases[1].screenshot_attached);
    assert!(!report.cases[2].screenshot_attached);
    assert_eq!(transport.sessions_created(), 1);
    assert_eq!(transport.sessions_deleted(), 1);
    Ok(())
}

#[tokio::test]
async fn failure_evidence_lands_in_the_report_directory() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let sink = DirSink::new(dir.path())?;
    let transport = Arc::new(FakeTransport::new());
    transport.set_screenshot(PNG_MAGIC.to_vec());
    let runner = ModuleRunner::new(transport.clone(), BrowserConfig::default(), &sink);

    let cases = [Case::new("breaks", failing_case)];
    let report = runner.run_module("capture", &ctx(), &cases).await?;

    assert!(report.cases[0].screenshot_attached);

    let manifest = sink.manifest()?;
    assert_eq!(manifest.len(), 1);
    assert_eq!(manifest[0].label, SCREENSHOT_LABEL);
    assert_eq!(manifest[0].media_type, SCREENSHOT_MEDIA_TYPE);
    assert!(dir.path().join(&manifest[0].file).exists());
    Ok(())
}
