use super::Context;
use crate::installer::{resolve_install_dir, InstallationRecord};
use crate::{integration, ui};
use anyhow::{Context as _, Result};
use std::env;

pub fn execute(ctx: &Context, path: Option<&str>, reset: bool) -> Result<()> {
    if reset {
        if InstallationRecord::clear(&ctx.layout)? {
            ui::info("Install directory reset to default");
        }
        println!("{}", resolve_install_dir(&ctx.layout).display());
        return Ok(());
    }

    let Some(path) = path else {
        println!("{}", resolve_install_dir(&ctx.layout).display());
        return Ok(());
    };

    let mut dir = ctx.layout.expand(path);
    if dir.is_relative() {
        dir = env::current_dir()
            .context("Failed to determine current directory")?
            .join(dir);
    }

    InstallationRecord::new(&dir).save(&ctx.layout)?;
    ui::success("Install dir", dir.display());
    Ok(())
}

pub fn data_dir(ctx: &Context, app: &str) -> Result<()> {
    println!("{}", integration::app_data_dir(&ctx.layout, app)?.display());
    Ok(())
}
