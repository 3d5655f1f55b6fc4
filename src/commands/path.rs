use super::Context;
use crate::path_registry;
use crate::path_store::{PathLookup, PathStore};
use anyhow::Result;

pub fn set(ctx: &Context, key: &str, value: &str) -> Result<()> {
    PathStore::new(&ctx.layout).set(key, value)?;
    println!("Set {key} = {value}");
    Ok(())
}

pub fn get(
    ctx: &Context,
    key: &str,
    override_value: Option<&str>,
    save: bool,
    default: Option<&str>,
    expand: bool,
) -> Result<()> {
    let lookup = PathLookup {
        override_value,
        save_override: save,
        default,
    };
    let value = PathStore::new(&ctx.layout).get(key, lookup)?;

    if expand {
        println!("{}", ctx.layout.expand(&value).display());
    } else {
        println!("{value}");
    }
    Ok(())
}

pub fn list(ctx: &Context) -> Result<()> {
    let entries = PathStore::new(&ctx.layout).entries()?;
    if entries.is_empty() {
        println!("No paths configured");
        return Ok(());
    }

    for (key, value) in entries {
        println!("{key}: {value}");
    }
    Ok(())
}

pub fn available() -> Result<()> {
    println!("Available path keys:");
    for key in path_registry::available_keys() {
        if let Some(info) = path_registry::describe(key) {
            println!("  {}: {}", info.key, info.description);
            println!("    Example: {}", info.example);
            println!("    Used by: {}", info.used_by.join(", "));
            println!();
        }
    }
    Ok(())
}

pub fn suggest(partial: &str) -> Result<()> {
    for key in path_registry::suggest(partial) {
        println!("{key}");
    }
    Ok(())
}
