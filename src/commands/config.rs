use super::Context;
use crate::config::{parse_value, ConfigStore};
use crate::ui;
use anyhow::{bail, Context as _, Result};
use serde_json::Value;

fn render(value: &Value) -> Result<String> {
    match value {
        Value::String(text) => Ok(text.clone()),
        other => serde_json::to_string_pretty(other).context("Failed to format config value"),
    }
}

pub fn get(ctx: &Context, key: Option<&str>, app: Option<&str>) -> Result<()> {
    let store = ConfigStore::new(&ctx.layout);
    let config = store.load(app)?;

    match key {
        Some(key) => match config.get(key) {
            Some(value) => println!("{}", render(value)?),
            None => bail!("Config key '{key}' is not set"),
        },
        None => println!("{}", render(&Value::Object(config))?),
    }
    Ok(())
}

pub fn set(ctx: &Context, key: &str, raw: &str, app: Option<&str>) -> Result<()> {
    let value = parse_value(raw);
    let store = ConfigStore::new(&ctx.layout);
    store.set(key, value.clone(), app)?;

    let scope = app.unwrap_or("global");
    ui::success("Set", format!("{key} = {value} ({scope})"));
    Ok(())
}
