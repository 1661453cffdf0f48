//! Runs against the real store with Playwright: `cargo test -- --ignored`

use std::sync::Arc;

use storefront_e2e::driver::web::PlaywrightAutomation;
use storefront_e2e::runner::{run_suite, state::TestStatus, RunOptions};
use storefront_e2e::utils::config::{Overrides, ProjectConfig, RunConfiguration};

#[tokio::test]
#[ignore = "needs installed browsers and network access"]
async fn test_invalid_login_against_live_store() {
    let dir = tempfile::tempdir().unwrap();
    let project = ProjectConfig {
        reports_dir: Some(dir.path().to_path_buf()),
        ..Default::default()
    };
    let config = RunConfiguration::resolve(&Overrides::default(), &project).unwrap();
    let options = RunOptions {
        filter: Some("test_invalid_userlogin".into()),
        login_data: dir.path().join("none.csv"),
        ..Default::default()
    };

    let state = run_suite(Arc::new(PlaywrightAutomation::new()), config, &project, &options)
        .await
        .unwrap();

    assert_eq!(state.tests.len(), 1);
    assert_eq!(state.tests[0].status, TestStatus::Passed);
    assert!(dir
        .path()
        .join("traces/test_invalid_userlogin_trace.zip")
        .exists());
}
