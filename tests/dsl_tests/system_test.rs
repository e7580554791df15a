use std::io::Write;

use pretty_assertions::assert_eq;
use speckle::{
    config::SpeckleConfig,
    formatter::{FormatterKind, SpecStatus},
    loader::MemoryLoader,
    Error, SpeckleResult, System,
};

const LISTS: &str = "describe 'lists'
  before
    let items = [1, 2, 3]
  end
  it 'has three items'
    items.should_have_length 3
  end
  it 'lacks four'
    items.should_include 4
  end
  it 'is pending'
  end
end
";

#[test]
fn test_exec_from_disk_and_render_terminal() -> SpeckleResult<()> {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(LISTS.as_bytes()).unwrap();

    let mut system = System::new(&SpeckleConfig::default())?;
    system.exec(file.path())?;
    system.run()?;

    let stats = system.stats();
    assert_eq!(stats.specs, 3);
    assert_eq!(stats.assertions, 2);
    assert_eq!(stats.passes, 1);
    assert_eq!(stats.failures, 1);

    let output = system.render()?;
    assert_eq!(
        output,
        "lists
  pass  has three items (1)
  FAIL  lacks four (1): expected [1,2,3] to include 4
  todo  is pending

Specs: 3  Assertions: 2  Passes: 1  Failures: 1  Pending: 1
"
    );
    Ok(())
}

#[test]
fn test_report_snapshot() -> SpeckleResult<()> {
    let mut system = System::new(&SpeckleConfig::default())?
        .with_loader(MemoryLoader::new().with_source("lists.spec", LISTS));
    system.exec("lists.spec")?;
    system.run()?;

    let report = system.report();
    let statuses: Vec<_> = report.suites[0].specs.iter().map(|s| s.status).collect();
    assert_eq!(
        statuses,
        vec![SpecStatus::Passed, SpecStatus::Failed, SpecStatus::Pending]
    );
    assert_eq!(report.failed(), 1);
    assert_eq!(report.pending(), 1);
    Ok(())
}

#[test]
fn test_json_output_is_valid_json() -> SpeckleResult<()> {
    let config = SpeckleConfig {
        formatter: FormatterKind::Json,
        ..Default::default()
    };
    let mut system = System::new(&config)?;
    system.parse_dsl(LISTS)?;
    system.run()?;

    let json: serde_json::Value = serde_json::from_str(&system.render()?).unwrap();
    assert_eq!(json["stats"]["failures"], 1);
    assert_eq!(json["suites"][0]["specs"][1]["status"], "failed");
    Ok(())
}

#[test]
fn test_user_matchers_from_config_and_code() -> SpeckleResult<()> {
    let config = SpeckleConfig::from_str(
        r#"{ "matchers": { "be_within_ten": "actual <= 10 && actual >= 0" } }"#,
    )?;
    let mut system = System::new(&config)?;
    system.add_matchers([("be_tiny", "alias be_within_ten"), ("outrank", ">")])?;

    system.parse_dsl(
        "describe 'custom'
  it 'uses config matchers' 7.should_be_within_ten
  end
  it 'uses added matchers'
    3.should_be_tiny
    9.should_outrank 2
  end
end",
    )?;
    system.run()?;

    assert_eq!(system.stats().passes, 3);
    assert_eq!(system.stats().failures, 0);
    Ok(())
}

#[test]
fn test_errors_carry_the_speckle_prefix() -> SpeckleResult<()> {
    let mut system = System::new(&SpeckleConfig::default())?;

    let err = system.parse_dsl("describe 'x' it 'y'").unwrap_err();
    assert!(err.to_string().starts_with("speckle: Unterminated it"));

    system.parse_dsl("describe 'x' it 'y' 1.should_sparkle 2\n end end")?;
    let err = system.run().unwrap_err();
    assert!(matches!(err, Error::Run(_)));
    assert_eq!(
        err.to_string(),
        "speckle: Error in spec 'y', suite 'x': unknown matcher 'sparkle'"
    );
    Ok(())
}
