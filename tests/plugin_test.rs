//! Nushell plugin commands driven through an in-process engine.

#![cfg(feature = "plugin")]

use nu_plugin_test_support::PluginTest;
use nu_plugin_trends::TrendsPlugin;
use nu_protocol::{ShellError, Span, Value};

fn plugin() -> Result<PluginTest, ShellError> {
    PluginTest::new("trends", TrendsPlugin.into())
}

fn eval(source: &str) -> Result<Value, ShellError> {
    plugin()?.eval(source)?.into_value(Span::test_data())
}

fn field(value: &Value, key: &str) -> Value {
    value
        .get_data_by_key(key)
        .unwrap_or_else(|| panic!("missing field {key} in {value:?}"))
}

#[test]
fn normalize_command() -> Result<(), ShellError> {
    let value = eval(r#"trends normalize "Breaking: AI Chatbots!!""#)?;
    assert_eq!(field(&value, "normalized").as_str()?, "breaking ai chatbots");
    Ok(())
}

#[test]
fn similarity_command() -> Result<(), ShellError> {
    let value = eval(r#"trends similarity "AI chatbots" "ai chatbots!""#)?;
    assert_eq!(field(&value, "similarity").as_float()?, 1.0);
    assert_eq!(field(&value, "metric").as_str()?, "topic");
    Ok(())
}

#[test]
fn similarity_rejects_unknown_metric() -> Result<(), ShellError> {
    let result = eval(r#"trends similarity a b --metric soundex"#);
    assert!(matches!(result, Err(_) | Ok(Value::Error { .. })));
    Ok(())
}

#[test]
fn aggregate_table_input() -> Result<(), ShellError> {
    let value = eval(
        r#"[[topic source]; ["AI chatbots" hn] ["ai chatbots!" reddit] ["crypto regulation" hn]] | trends aggregate"#,
    )?;
    assert_eq!(field(&value, "total_raw").as_int()?, 3);
    assert_eq!(field(&value, "unique_count").as_int()?, 2);

    let trends = field(&value, "trends");
    let first = &trends.as_list()?[0];
    assert_eq!(field(first, "source_count").as_int()?, 2);
    assert_eq!(field(first, "rank").as_int()?, 1);
    Ok(())
}

#[test]
fn aggregate_rejects_out_of_range_threshold() -> Result<(), ShellError> {
    let result = eval(r#"[[topic source]; [a b]] | trends aggregate --threshold 1.5"#);
    assert!(matches!(result, Err(_) | Ok(Value::Error { .. })));
    Ok(())
}

#[test]
fn query_after_aggregate() -> Result<(), ShellError> {
    let value = eval(
        r#"[[topic source region]; ["AI chatbots" hn US] ["ai chatbots!" reddit US] ["crypto regulation" hn EU]] | trends aggregate | trends query --region US"#,
    )?;
    let rows = value.as_list()?;
    assert_eq!(rows.len(), 1);
    assert_eq!(field(&rows[0], "normalized_topic").as_str()?, "ai chatbots");
    Ok(())
}
