use super::Context;
use crate::environment::PathUpdate;
use crate::error::ZelError;
use crate::installer::{CloneOutcome, Installer};
use crate::{integration, ui};
use anyhow::{bail, Result};

pub fn list(ctx: &Context) -> Result<()> {
    if ctx.registry.is_empty() {
        ui::info("No modules configured.");
        return Ok(());
    }

    println!("Available zel modules:");
    for module in ctx.registry.iter() {
        println!("  • {} - {}", module.name, module.description);
    }
    Ok(())
}

pub fn get(ctx: &Context, name: &str) -> Result<()> {
    let installer = ctx.installer()?;

    let step = ui::Step::start("Fetching", name);
    match installer.clone_registered(&ctx.registry, name) {
        Ok(outcome) => {
            let label = match outcome {
                CloneOutcome::Cloned { .. } => "Cloned",
                CloneOutcome::AlreadyExists { .. } => "Present",
            };
            step.finish(label);
            ui::info(outcome);
            Ok(())
        }
        Err(err @ ZelError::ModuleNotFound { .. }) => {
            step.fail("Unknown", name);
            Err(err.into())
        }
        Err(err @ ZelError::ExternalTool { .. }) => {
            step.fail("Failed", &err);
            bail!("Failed to clone {name}")
        }
        Err(err) => {
            step.fail("Failed", &err);
            Err(err.into())
        }
    }
}

pub fn install(ctx: &Context) -> Result<()> {
    if ctx.registry.is_empty() {
        ui::info("No modules configured.");
        return Ok(());
    }

    let installer = ctx.installer()?;
    install_modules(ctx, &installer)
}

fn install_modules(ctx: &Context, installer: &Installer) -> Result<()> {
    let step = ui::Step::start(
        "Installing",
        format!("zel modules into {}", installer.env_dir().display()),
    );
    let report = match installer.install_all(&ctx.registry) {
        Ok(report) => report,
        Err(err) => {
            step.fail("Failed", &err);
            return Err(err.into());
        }
    };
    step.finish("Finished");

    if report.created_env {
        ui::status("Created", format!("environment at {}", report.env_dir.display()));
    }
    for name in &report.installed {
        ui::success("Installed", name);
    }
    for name in &report.skipped {
        ui::status("Skipped", format!("{name} (not cloned)"));
    }
    for (name, failure) in &report.failed {
        ui::error(format!("Failed to install {name}: {failure}"));
    }

    match &report.path_update {
        PathUpdate::Added(profile) => ui::success(
            "PATH",
            format!(
                "Added to {}\nRestart your shell or run: source {}",
                profile.display(),
                profile.display()
            ),
        ),
        PathUpdate::AlreadyPresent(_) => ui::info("Already in PATH"),
        PathUpdate::Manual(bin) => {
            ui::warn(format!("Add to PATH manually: {}", bin.display()))
        }
    }

    if !report.is_success() {
        bail!("{} module(s) failed to install", report.failed.len());
    }
    ui::success("Done", "All cloned modules installed");
    Ok(())
}

pub fn update(ctx: &Context) -> Result<()> {
    let installer = ctx.installer()?;
    let report = match installer.update_all(&ctx.registry) {
        Ok(report) => report,
        Err(ZelError::NoModulesConfigured) => {
            ui::info("No modules configured.");
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    if report.is_empty() {
        ui::info("No modules found to update.");
        return Ok(());
    }

    if !report.updated.is_empty() {
        ui::success("Updated", report.updated.join(", "));
    }
    for (name, failure) in &report.failed {
        ui::error(format!("Failed to update {name}: {failure}"));
    }

    if !report.updated.is_empty() {
        ui::status("Reinstall", "updated modules");
        install_modules(ctx, &installer)?;
    }

    if !report.failed.is_empty() {
        bail!("{} module(s) failed to update", report.failed.len());
    }
    Ok(())
}

pub fn installed(ctx: &Context) -> Result<()> {
    let installer = ctx.installer()?;
    let names = integration::installed_apps_in(installer.install_dir(), &ctx.registry);
    if names.is_empty() {
        ui::info(format!(
            "No modules installed in {}",
            installer.install_dir().display()
        ));
    } else {
        for name in names {
            println!("{name}");
        }
    }
    Ok(())
}
