use anyhow::Result;
use enroller::{EnrollerConfig, EnrollmentError, Selector};
use std::io::Write;
use std::time::Duration;
use tempfile::{Builder, TempDir};

fn write_config(dir: &TempDir, name: &str, contents: &str) -> Result<std::path::PathBuf> {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path)?;
    file.write_all(contents.as_bytes())?;
    Ok(path)
}

#[test]
fn loads_yaml_deployment_overrides() -> Result<()> {
    let dir = TempDir::new()?;
    let path = write_config(
        &dir,
        "spire.yaml",
        r#"
selectors:
  add_by_id_field: "name:CLASS_NBR"
timeouts:
  default_wait_ms: 5000
  finish_wait_ms: 60000
layout:
  cart_name_column: 2
"#,
    )?;

    let config = EnrollerConfig::from_path(&path)?;
    assert_eq!(
        config.selectors.add_by_id_field,
        Selector::Name("CLASS_NBR".to_string())
    );
    assert_eq!(config.timeouts.default_wait(), Duration::from_secs(5));
    assert_eq!(config.timeouts.finish_wait(), Duration::from_secs(60));
    assert_eq!(config.layout.cart_name_column, 2);
    Ok(())
}

#[test]
fn loads_json_and_yml_extensions() -> Result<()> {
    let dir = TempDir::new()?;
    let json = write_config(&dir, "spire.json", r#"{"sequence": {"stop_on_failure": false}}"#)?;
    assert!(!EnrollerConfig::from_path(&json)?.sequence.stop_on_failure);

    let yml = write_config(&dir, "spire.yml", "markers:\n  result_attribute: outerHTML\n")?;
    assert_eq!(EnrollerConfig::from_path(&yml)?.markers.result_attribute, "outerHTML");
    Ok(())
}

#[test]
fn rejects_unknown_extensions_and_missing_files() -> Result<()> {
    let file = Builder::new().suffix(".toml").tempfile()?;
    let err = EnrollerConfig::from_path(file.path()).unwrap_err();
    assert!(matches!(err, EnrollmentError::InvalidConfig(msg) if msg.contains("toml")));

    let dir = TempDir::new()?;
    let err = EnrollerConfig::from_path(dir.path().join("absent.yaml")).unwrap_err();
    assert!(matches!(err, EnrollmentError::Io(_)));
    Ok(())
}

#[test]
fn invalid_file_contents_are_refused() -> Result<()> {
    let dir = TempDir::new()?;
    let path = write_config(
        &dir,
        "broken.yaml",
        "timeouts:\n  default_wait_ms: 40000\n",
    )?;
    let err = EnrollerConfig::from_path(&path).unwrap_err();
    assert!(matches!(err, EnrollmentError::InvalidConfig(_)));
    Ok(())
}
