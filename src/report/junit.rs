use super::types::SuiteResults;
use crate::runner::state::{TestReport, TestStatus};
use anyhow::Result;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Cursor;
use std::path::Path;

/// Generate JUnit XML report string from SuiteResults
pub fn generate_junit_xml(results: &SuiteResults) -> Result<String> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let total = results.tests.len().to_string();
    let failures = results.summary.failed.to_string();
    let skipped = results.summary.skipped.to_string();
    let total_duration: u64 = results.tests.iter().map(|t| t.duration_ms).sum();
    let time = seconds(total_duration);

    let mut suites_start = BytesStart::new("testsuites");
    suites_start.push_attribute(("name", "storefront-e2e"));
    suites_start.push_attribute(("tests", total.as_str()));
    suites_start.push_attribute(("failures", failures.as_str()));
    suites_start.push_attribute(("skipped", skipped.as_str()));
    suites_start.push_attribute(("time", time.as_str()));
    writer.write_event(Event::Start(suites_start))?;

    let mut suite_start = BytesStart::new("testsuite");
    suite_start.push_attribute(("name", "storefront"));
    suite_start.push_attribute(("tests", total.as_str()));
    suite_start.push_attribute(("failures", failures.as_str()));
    suite_start.push_attribute(("skipped", skipped.as_str()));
    suite_start.push_attribute(("id", results.session_id.as_str()));
    suite_start.push_attribute(("time", time.as_str()));
    suite_start.push_attribute(("timestamp", results.generated_at.as_str()));
    writer.write_event(Event::Start(suite_start))?;

    for test in &results.tests {
        write_test_case(&mut writer, test)?;
    }

    writer.write_event(Event::End(BytesEnd::new("testsuite")))?;
    writer.write_event(Event::End(BytesEnd::new("testsuites")))?;

    let xml = String::from_utf8(writer.into_inner().into_inner())?;
    Ok(xml)
}

fn seconds(ms: u64) -> String {
    (ms as f64 / 1000.0).to_string()
}

fn write_test_case<W: std::io::Write>(writer: &mut Writer<W>, test: &TestReport) -> Result<()> {
    let mut case_start = BytesStart::new("testcase");
    case_start.push_attribute(("name", test.name.as_str()));
    case_start.push_attribute(("classname", "storefront"));
    case_start.push_attribute(("time", seconds(test.duration_ms).as_str()));
    writer.write_event(Event::Start(case_start))?;

    match test.status {
        TestStatus::Failed => {
            let message = test.error.as_deref().unwrap_or("Unknown error");
            let mut fail_start = BytesStart::new("failure");
            fail_start.push_attribute(("message", message));
            fail_start.push_attribute(("type", "AssertionError"));
            writer.write_event(Event::Start(fail_start))?;
            writer.write_event(Event::Text(BytesText::new(message)))?;
            writer.write_event(Event::End(BytesEnd::new("failure")))?;
        }
        TestStatus::Skipped => {
            let mut skip = BytesStart::new("skipped");
            if let Some(reason) = &test.error {
                skip.push_attribute(("message", reason.as_str()));
            }
            writer.write_event(Event::Empty(skip))?;
        }
        TestStatus::Passed => {}
    }

    if !test.artifacts.is_empty() {
        let listing = test
            .artifacts
            .iter()
            .map(|a| format!("[[ATTACHMENT|{}]]", a.path.display()))
            .collect::<Vec<_>>()
            .join("\n");
        writer.write_event(Event::Start(BytesStart::new("system-out")))?;
        writer.write_event(Event::Text(BytesText::new(&listing)))?;
        writer.write_event(Event::End(BytesEnd::new("system-out")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("testcase")))?;
    Ok(())
}

/// Write report to file
pub fn write_report(results: &SuiteResults, output_dir: &Path) -> Result<std::path::PathBuf> {
    std::fs::create_dir_all(output_dir)?;
    let xml = generate_junit_xml(results)?;
    let path = output_dir.join("junit.xml");
    std::fs::write(&path, xml)?;
    Ok(path)
}

/// Generate JUnit report to a file or stdout
pub async fn generate(results: &SuiteResults, output: Option<&Path>) -> Result<()> {
    let xml = generate_junit_xml(results)?;
    if let Some(path) = output {
        std::fs::write(path, xml)?;
        println!("JUnit report saved to: {}", path.display());
    } else {
        println!("{}", xml);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::artifacts::{ArtifactKind, ArtifactRecord};
    use crate::runner::state::RunSummary;
    use std::path::PathBuf;

    #[test]
    fn test_generate_junit_xml() {
        let results = SuiteResults {
            session_id: "test-session".to_string(),
            tests: vec![
                TestReport {
                    name: "test_valid_user_login".to_string(),
                    tags: vec!["sanity".to_string()],
                    status: TestStatus::Passed,
                    duration_ms: 1500,
                    error: None,
                    teardown_error: None,
                    phases: vec![],
                    artifacts: vec![],
                },
                TestReport {
                    name: "test_add_product_to_cart".to_string(),
                    tags: vec![],
                    status: TestStatus::Failed,
                    duration_ms: 2000,
                    error: Some("Element not found".to_string()),
                    teardown_error: None,
                    phases: vec![],
                    artifacts: vec![ArtifactRecord {
                        kind: ArtifactKind::Screenshot,
                        path: PathBuf::from("reports/screenshots/test_add_product_to_cart.png"),
                    }],
                },
                TestReport {
                    name: "test_valid_user_logout".to_string(),
                    tags: vec![],
                    status: TestStatus::Skipped,
                    duration_ms: 0,
                    error: Some("no account configured".to_string()),
                    teardown_error: None,
                    phases: vec![],
                    artifacts: vec![],
                },
            ],
            summary: RunSummary {
                session_id: "test-session".to_string(),
                total: 3,
                passed: 1,
                failed: 1,
                skipped: 1,
                total_duration_ms: Some(3500),
            },
            generated_at: "2025-01-01 12:00:00".to_string(),
        };

        let xml = generate_junit_xml(&results).expect("Failed to generate XML");

        assert!(xml.contains(r#"<testsuites name="storefront-e2e""#));
        assert!(xml.contains(r#"tests="3""#));
        assert!(xml.contains(r#"failures="1""#));
        assert!(xml.contains(r#"<testcase name="test_valid_user_login""#));
        assert!(xml.contains(r#"message="Element not found""#));
        assert!(xml.contains(r#"<skipped message="no account configured"/>"#));
        assert!(xml.contains("[[ATTACHMENT|reports/screenshots/test_add_product_to_cart.png]]"));
    }
}
